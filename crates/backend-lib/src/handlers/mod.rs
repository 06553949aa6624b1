// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.

pub mod accounts;
pub mod api;
pub mod reset;
pub mod sessions;

use axum::http::HeaderValue;

use crate::error::AppError;

/// A form field that must be present and non-empty.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing(field))
}

/// `Set-Cookie` value carrying a fresh session id.
pub(crate) fn session_cookie_header(name: &str, session_id: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!("{name}={session_id}; Path=/; HttpOnly"))
        .map_err(|_| AppError::Internal("session cookie is not a valid header value".to_string()))
}

/// `Set-Cookie` value that expires the session cookie.
pub(crate) fn clear_cookie_header(name: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!("{name}=; Path=/; HttpOnly; Max-Age=0"))
        .map_err(|_| AppError::Internal("session cookie is not a valid header value".to_string()))
}
