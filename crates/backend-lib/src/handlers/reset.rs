// ============================
// crates/backend-lib/src/handlers/reset.rs
// ============================
//! Password reset on `/reset_password`.
use std::sync::Arc;

use axum::{extract::State, Form, Json};
use gatekeep_common::{
    EmailMessage, ResetTokenForm, ResetTokenIssued, UpdatePasswordForm, PASSWORD_UPDATED,
};

use super::required;
use crate::error::AppError;
use crate::AppState;

/// `POST /reset_password`: issue a token; 403 for an unknown email.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ResetTokenForm>,
) -> Result<Json<ResetTokenIssued>, AppError> {
    let email = required(form.email, "email")?;
    let reset_token = state.auth.get_reset_password_token(&email).await?;
    Ok(Json(ResetTokenIssued { email, reset_token }))
}

/// `PUT /reset_password`: consume a token; 403 if it matches no user.
///
/// `email` is echoed back; the token alone identifies the account.
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Form(form): Form<UpdatePasswordForm>,
) -> Result<Json<EmailMessage>, AppError> {
    let email = required(form.email, "email")?;
    let reset_token = required(form.reset_token, "reset_token")?;
    let new_password = required(form.new_password, "new_password")?;
    state.auth.update_password(&reset_token, &new_password).await?;
    Ok(Json(EmailMessage::new(email, PASSWORD_UPDATED)))
}
