use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use oftalmo_auth::jwt::bearer_token;

use crate::error::ApiError;
use crate::state::AppState;

/// Bearer token middleware.
///
/// Validates the `Authorization: Bearer <token>` header and inserts
/// [`AuthUser`] into request extensions for handlers to use.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

    let token = bearer_token(header)?;
    let claims = state.verifier.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected token");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(AuthUser { sub: claims.sub });

    Ok(next.run(req).await)
}

/// Authenticated user extracted from token claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
}
