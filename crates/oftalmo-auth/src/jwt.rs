use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Claims carried by an API access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    pub iat: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Shared-secret token verifier.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier for HS256 tokens. When `issuer` is set, the `iss`
    /// claim must match it.
    pub fn new(secret: &[u8], issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        validate_token(token, &self.decoding_key, &self.validation)
    }
}

/// Decode and validate a token. Rejects tokens with an empty `sub`.
pub fn validate_token(
    token: &str,
    decoding_key: &DecodingKey,
    validation: &Validation,
) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(token, decoding_key, validation)?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(AuthError::InvalidToken("empty subject".to_string()));
    }

    Ok(token_data.claims)
}

/// Extract the token from an `Authorization` header value.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Sign a token for `sub` valid for `ttl_secs`. Used for local development
/// and tests; production tokens come from the identity provider.
pub fn issue_token(
    secret: &[u8],
    sub: &str,
    issuer: Option<&str>,
    ttl_secs: u64,
) -> Result<String, AuthError> {
    let now = jiff::Timestamp::now().as_second().max(0) as u64;
    let claims = Claims {
        sub: sub.to_string(),
        exp: now + ttl_secs,
        iat: now,
        iss: issuer.map(str::to_string),
        email: None,
        name: None,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?;
    tracing::debug!(sub = sub, "issued token");
    Ok(token)
}
