//! Collaborator-selection cookie.
//!
//! The web client remembers which collaborator is working at the terminal so
//! new evaluations can be attributed without asking every time. The cookie
//! only holds the collaborator id.

use uuid::Uuid;

pub const COOKIE_NAME: &str = "oftalmo_collaborator";

/// Thirty days.
pub const MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Extract the selected collaborator from a `Cookie` request header value.
///
/// Returns `None` if the cookie is missing or does not hold a UUID.
pub fn selected_collaborator(cookie_header: &str) -> Option<Uuid> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == COOKIE_NAME)
        .and_then(|(_, value)| value.trim().trim_matches('"').parse().ok())
}

/// `Set-Cookie` header value selecting `id`.
pub fn set_cookie(id: Uuid) -> String {
    format!("{COOKIE_NAME}={id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={MAX_AGE_SECS}")
}

/// `Set-Cookie` header value that expires the selection.
pub fn clear_cookie() -> String {
    format!("{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
