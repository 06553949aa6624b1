// ============================
// crates/backend-lib/src/middleware/auth.rs
// ============================
//! Request guard for the `/api/v1` routes.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};
use metrics::counter;
use tracing::debug;

use crate::auth::credentials_from_header;
use crate::config::AuthType;
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::User;
use crate::AppState;

/// The authenticated user, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Raw `Authorization` header value
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Value of cookie `name`, if the request carries it.
pub fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Resolve the requesting user the way the configured auth mode says to.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, AppError> {
    match state.settings.auth.auth_type {
        AuthType::None => Ok(None),
        AuthType::Basic => {
            let Some(credentials) = authorization_header(headers).and_then(credentials_from_header)
            else {
                return Ok(None);
            };
            Ok(state
                .auth
                .user_from_credentials(&credentials.email, &credentials.password)
                .await?)
        },
        AuthType::Session | AuthType::SessionExp => {
            let cookie = session_cookie(headers, &state.settings.auth.session_cookie_name);
            Ok(state.auth.get_user_from_session_id(cookie.as_deref()).await?)
        },
    }
}

/// 401 when the request carries no credentials at all, 403 when they do not
/// resolve to a user. Excluded paths and the `none` mode pass straight through.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.settings.auth.auth_type == AuthType::None
        || !state.authorizer.requires_auth(request.uri().path())
    {
        return Ok(next.run(request).await);
    }

    // owned copy: the request body is not Sync, so no borrow of it may cross an await
    let headers = request.headers().clone();
    if authorization_header(&headers).is_none()
        && session_cookie(&headers, &state.settings.auth.session_cookie_name).is_none()
    {
        counter!(keys::REQUEST_UNAUTHORIZED).increment(1);
        debug!(path = %request.uri().path(), "no credentials");
        return Err(AppError::Unauthorized);
    }

    let Some(user) = current_user(&state, &headers).await? else {
        counter!(keys::REQUEST_FORBIDDEN).increment(1);
        debug!(path = %request.uri().path(), "credentials did not resolve to a user");
        return Err(AppError::Forbidden);
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
