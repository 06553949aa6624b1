// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gatekeep_common::{ErrorBody, EMAIL_REGISTERED};
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::storage::StoreError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Shorthand for a missing form field.
    pub fn missing(field: &str) -> Self {
        AppError::BadRequest(format!("{field} missing"))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::EmailTaken(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "AUTH_001",
            AppError::Forbidden => "AUTH_002",
            AppError::EmailTaken(_) => "USER_001",
            AppError::BadRequest(_) => "VAL_001",
            AppError::NotFound => "NF_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Message safe to send to clients.
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Forbidden => "Forbidden".to_string(),
            AppError::EmailTaken(_) => EMAIL_REGISTERED.to_string(),
            // names the missing field only, never echoes input
            AppError::BadRequest(reason) => reason.clone(),
            AppError::NotFound => "Not found".to_string(),
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            message: self.sanitized_message(),
            code: self.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyExists(email) => AppError::EmailTaken(email),
            AuthError::NotFound | AuthError::InvalidToken => AppError::Forbidden,
            AuthError::InvalidField(field) => AppError::Internal(format!("invalid field {field}")),
            AuthError::Hash(e) => AppError::Internal(format!("hashing failed: {e}")),
            AuthError::Store(StoreError::Io(e)) => AppError::Io(e),
            AuthError::Store(StoreError::Json(e)) => AppError::Json(e),
            AuthError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}
