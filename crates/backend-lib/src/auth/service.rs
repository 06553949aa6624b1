// =============
// gatekeep-backend/src/auth/service.rs
// =============
//! The `AuthService` trait: the account and session state machine behind
//! every route.
use async_trait::async_trait;
use thiserror::Error;

use crate::storage::{StoreError, User};

/// Outcomes of auth operations that callers must distinguish.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User {0} already exists")]
    AlreadyExists(String),

    #[error("no matching user")]
    NotFound,

    #[error("reset token does not match any user")]
    InvalidToken,

    /// Programmer error: a filter or update named an unsupported field.
    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AuthError::NotFound,
            StoreError::AlreadyExists(email) => AuthError::AlreadyExists(email),
            StoreError::InvalidField(field) => AuthError::InvalidField(field),
            other => AuthError::Store(other),
        }
    }
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user; fails with `AlreadyExists` if the email is taken.
    async fn register_user(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// `true` iff the email exists and the password matches. Unknown email
    /// and wrong password are indistinguishable.
    async fn valid_login(&self, email: &str, password: &str) -> Result<bool, AuthError>;

    /// Start a session for `email`, replacing any previous one. `None` if no
    /// such user.
    async fn create_session(&self, email: &str) -> Result<Option<String>, AuthError>;

    /// Resolve a live session to its user.
    async fn get_user_from_session_id(
        &self,
        session_id: Option<&str>,
    ) -> Result<Option<User>, AuthError>;

    /// End the user's session; unknown users are ignored.
    async fn destroy_session(&self, user_id: &str) -> Result<(), AuthError>;

    /// Issue a fresh reset token; fails with `NotFound` for unknown email.
    async fn get_reset_password_token(&self, email: &str) -> Result<String, AuthError>;

    /// Set a new password and consume the reset token; fails with
    /// `InvalidToken` if the token matches no user.
    async fn update_password(&self, reset_token: &str, new_password: &str)
        -> Result<(), AuthError>;

    /// The user owning these credentials, for Basic authentication.
    async fn user_from_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError>;
}
