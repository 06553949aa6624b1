// ==========================
// tests/unit/error_tests.rs
// ==========================
//! Error translation from the auth layer to HTTP
use axum::{http::StatusCode, response::IntoResponse};
use backend_lib::auth::AuthError;
use backend_lib::error::AppError;
use backend_lib::storage::StoreError;
use gatekeep_common::ErrorBody;

use crate::test_utils::body_json;

#[tokio::test]
async fn test_invalid_token_is_forbidden_without_detail() {
    let response = AppError::from(AuthError::InvalidToken).into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: ErrorBody = body_json(response).await;
    assert_eq!(body.message, "Forbidden");
    assert_eq!(body.code, "AUTH_002");
}

#[tokio::test]
async fn test_store_failures_are_opaque() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = AppError::from(AuthError::from(StoreError::Json(json_err)));
    assert!(matches!(err, AppError::Json(_)));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorBody = body_json(response).await;
    assert_eq!(body.message, "An internal server error occurred");
    assert_eq!(body.code, "JSON_001");
}

#[test]
fn test_missing_field_names_the_field() {
    let err = AppError::missing("password");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.sanitized_message(), "password missing");
}
