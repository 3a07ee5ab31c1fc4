//! Admin key check for write endpoints other than POST /add_music_selection

use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the admin key
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Without a configured ADMIN_KEY, admin routes are closed (403).
/// With one, a missing or wrong header is 401.
pub fn require_admin_key(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.config.admin_key.as_deref() else {
        return Err(ApiError::Forbidden);
    };

    match headers.get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(provided) if provided == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
