// ============================
// crates/backend-lib/src/handlers/api.rs
// ============================
//! Versioned JSON API under `/api/v1`.
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use gatekeep_common::{CredentialsForm, Status, UserView};
use serde_json::{json, Value};

use super::{clear_cookie_header, required, session_cookie_header};
use crate::error::AppError;
use crate::middleware::{session_cookie, CurrentUser};
use crate::storage::User;
use crate::AppState;

fn view(user: User) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
    }
}

/// `GET /api/v1/status`
pub async fn status() -> Json<Status> {
    Json(Status {
        status: "OK".to_string(),
    })
}

/// `GET /api/v1/unauthorized`
pub async fn unauthorized() -> AppError {
    AppError::Unauthorized
}

/// `GET /api/v1/forbidden`
pub async fn forbidden() -> AppError {
    AppError::Forbidden
}

/// `GET /api/v1/users/me`; 404 when the guard attached no user.
pub async fn me(user: Option<Extension<CurrentUser>>) -> Result<Json<UserView>, AppError> {
    let Extension(CurrentUser(user)) = user.ok_or(AppError::NotFound)?;
    Ok(Json(view(user)))
}

/// `POST /api/v1/auth_session/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let email = required(form.email, "email")?;
    let password = required(form.password, "password")?;
    let user = state
        .auth
        .user_from_credentials(&email, &password)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let session_id = state
        .auth
        .create_session(&user.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let cookie = session_cookie_header(&state.settings.auth.session_cookie_name, &session_id)?;
    Ok(([(SET_COOKIE, cookie)], Json(view(user))).into_response())
}

/// `DELETE /api/v1/auth_session/logout`; 404 without a live session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let name = &state.settings.auth.session_cookie_name;
    let session_id = session_cookie(&headers, name);
    let user = state
        .auth
        .get_user_from_session_id(session_id.as_deref())
        .await?
        .ok_or(AppError::NotFound)?;
    state.auth.destroy_session(&user.id).await?;

    let body: Value = json!({});
    Ok(([(SET_COOKIE, clear_cookie_header(name)?)], Json(body)).into_response())
}
