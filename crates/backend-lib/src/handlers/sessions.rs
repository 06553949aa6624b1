// ============================
// crates/backend-lib/src/handlers/sessions.rs
// ============================
//! Login and logout on `/sessions`.
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use gatekeep_common::{CredentialsForm, EmailMessage, LOGGED_IN};

use super::{clear_cookie_header, required, session_cookie_header};
use crate::error::AppError;
use crate::middleware::session_cookie;
use crate::AppState;

/// `POST /sessions`: 401 unless the credentials are valid.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let email = required(form.email, "email")?;
    let password = required(form.password, "password")?;
    if !state.auth.valid_login(&email, &password).await? {
        return Err(AppError::Unauthorized);
    }
    // the user can only vanish between the two calls if the store lost it
    let session_id = state
        .auth
        .create_session(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let cookie = session_cookie_header(&state.settings.auth.session_cookie_name, &session_id)?;
    Ok((
        [(SET_COOKIE, cookie)],
        Json(EmailMessage::new(email, LOGGED_IN)),
    )
        .into_response())
}

/// `DELETE /sessions`: end the session and redirect home; 403 without one.
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
        .ok_or(AppError::Forbidden)?;
    state.auth.destroy_session(&user.id).await?;

    Ok(([(SET_COOKIE, clear_cookie_header(name)?)], Redirect::to("/")).into_response())
}
