// ================
// common/src/lib.rs
// ================
//! Request and response bodies shared by the `gatekeep` server and its clients.
//! Request bodies arrive form-encoded; responses are JSON.

use serde::{Deserialize, Serialize};

/// Message returned on successful registration.
pub const USER_CREATED: &str = "user created";
/// Message returned on successful login.
pub const LOGGED_IN: &str = "logged in";
/// Message returned after a password change.
pub const PASSWORD_UPDATED: &str = "Password updated";
/// Message returned when the email is already taken.
pub const EMAIL_REGISTERED: &str = "email already registered";

/// Email and password, as posted to `/users` and `/sessions`.
///
/// Fields are optional so a missing field can be reported as a bad request
/// instead of a deserialization failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CredentialsForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /reset_password`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ResetTokenForm {
    pub email: Option<String>,
}

/// Body of `PUT /reset_password`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdatePasswordForm {
    pub email: Option<String>,
    pub reset_token: Option<String>,
    pub new_password: Option<String>,
}

/// `{email, message}` acknowledgement used by register, login and password update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub email: String,
    pub message: String,
}

impl EmailMessage {
    pub fn new(email: impl Into<String>, message: &str) -> Self {
        Self {
            email: email.into(),
            message: message.to_string(),
        }
    }
}

/// Body of `GET /profile`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub email: String,
}

/// Body of a successful `POST /reset_password`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResetTokenIssued {
    pub email: String,
    pub reset_token: String,
}

/// Public view of a user; never carries the password hash or tokens.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: String,
    pub email: String,
}

/// Plain `{message}` body, used by the index route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

/// Body of `GET /api/v1/status`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub status: String,
}

/// Error body returned for every failed request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// Client-safe message
    pub message: String,
    /// Stable error code, e.g. `AUTH_001`
    pub code: String,
}
