use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use oftalmo_core::models::collaborator::Collaborator;
use oftalmo_core::session;

use crate::error::ApiError;
use crate::repo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectCollaborator {
    pub collaborator_id: Uuid,
}

/// Collaborator id carried by the request's selection cookie, if any.
pub(crate) fn cookie_collaborator(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(session::selected_collaborator)
}

pub async fn get_selected(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Collaborator>, ApiError> {
    let id = cookie_collaborator(&headers)
        .ok_or_else(|| ApiError::NotFound("no collaborator selected".to_string()))?;
    Ok(Json(repo::get_collaborator(&state, id).await?))
}

pub async fn select(
    State(state): State<AppState>,
    Json(body): Json<SelectCollaborator>,
) -> Result<impl IntoResponse, ApiError> {
    let collaborator = repo::get_collaborator(&state, body.collaborator_id).await?;
    if !collaborator.active {
        return Err(ApiError::BadRequest(format!(
            "collaborator {} is inactive",
            collaborator.id
        )));
    }
    Ok((
        [(header::SET_COOKIE, session::set_cookie(collaborator.id))],
        Json(collaborator),
    ))
}

pub async fn clear() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session::clear_cookie())],
    )
}
