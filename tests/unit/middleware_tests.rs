// ==============================
// tests/unit/middleware_tests.rs
// ==============================
//! The request guard as mounted by the real router
use axum::http::{Method, StatusCode};
use backend_lib::config::AuthType;
use gatekeep_common::{ErrorBody, Status};
use tower::ServiceExt;

use crate::test_utils::{body_json, empty_request, test_app};

#[tokio::test]
async fn test_excluded_routes_need_no_credentials() {
    let (app, _state) = test_app(AuthType::SessionExp).await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/status", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Status = body_json(response).await;
    assert_eq!(body.status, "OK");

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/unauthorized", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/forbidden", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guarded_route_status_codes() {
    let (app, _state) = test_app(AuthType::SessionExp).await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/users/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = body_json(response).await;
    assert_eq!(body.code, "AUTH_001");

    let response = app
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/users/me",
            Some("session_id=not-a-session"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_top_level_routes_are_not_guarded() {
    let (app, _state) = test_app(AuthType::SessionExp).await;
    let response = app
        .oneshot(empty_request(Method::GET, "/", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_none_mode_me_is_not_found() {
    let (app, _state) = test_app(AuthType::None).await;
    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/users/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
