//! Cookie-carried player identity.

use crate::error::ApiError;
use axum::http::header::{COOKIE, HeaderMap};
use axum::http::HeaderValue;

/// Name of the cookie holding the player's identifier.
pub const PLAYER_COOKIE: &str = "Player";

/// Length of newly minted player identifiers.
pub(crate) const PLAYER_ID_LENGTH: usize = 16;

/// Reads the player identifier from the request's cookies, if present.
pub(crate) fn player_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == PLAYER_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Builds the `Set-Cookie` value carrying `player_id`.
pub(crate) fn cookie(player_id: &str, max_age_secs: u64) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!(
        "{PLAYER_COOKIE}={player_id}; Path=/; HttpOnly; Max-Age={max_age_secs}"
    ))
    .map_err(|e| ApiError::Internal(format!("invalid cookie value: {}", e)))
}
