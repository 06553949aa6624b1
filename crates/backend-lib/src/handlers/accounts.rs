// ============================
// crates/backend-lib/src/handlers/accounts.rs
// ============================
//! Index, registration and profile.
use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Form, Json};
use gatekeep_common::{CredentialsForm, EmailMessage, Message, Profile, USER_CREATED};

use super::required;
use crate::error::AppError;
use crate::middleware::session_cookie;
use crate::AppState;

/// `GET /`
pub async fn index() -> Json<Message> {
    Json(Message {
        message: "Bienvenue".to_string(),
    })
}

/// `POST /users`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Json<EmailMessage>, AppError> {
    let email = required(form.email, "email")?;
    let password = required(form.password, "password")?;
    let user = state.auth.register_user(&email, &password).await?;
    Ok(Json(EmailMessage::new(user.email, USER_CREATED)))
}

/// `GET /profile`: the session owner's email, 403 without a live session.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Profile>, AppError> {
    let session_id = session_cookie(&headers, &state.settings.auth.session_cookie_name);
    let user = state
        .auth
        .get_user_from_session_id(session_id.as_deref())
        .await?
        .ok_or(AppError::Forbidden)?;
    Ok(Json(Profile { email: user.email }))
}
