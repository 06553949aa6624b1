// ==================================
// tests/integration/http_flow_tests.rs
// ==================================
//! End-to-end walks through the HTTP surface
use axum::http::{header, Method, StatusCode};
use backend_lib::config::AuthType;
use backend_lib::create_router;
use gatekeep_common::{EmailMessage, ErrorBody, Message, Profile, ResetTokenIssued, UserView};
use serde_json::Value;
use tower::ServiceExt;

use crate::test_utils::{
    body_json, cookie_pair, empty_request, form_request, setup_flat_file_env, test_app,
};

const EMAIL: &str = "guillaume@holberton.io";
const PASSWD: &str = "b4l0u";
const NEW_PASSWD: &str = "t4rt1fl3tt3";

#[tokio::test]
async fn test_account_lifecycle() {
    let (app, _state) = test_app(AuthType::SessionExp).await;
    let creds = format!("email={EMAIL}&password={PASSWD}");

    // index
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/", None))
        .await
        .unwrap();
    let body: Message = body_json(response).await;
    assert_eq!(body.message, "Bienvenue");

    // register, then duplicate
    let response = app
        .clone()
        .oneshot(form_request(Method::POST, "/users", &creds, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: EmailMessage = body_json(response).await;
    assert_eq!(body, EmailMessage::new(EMAIL, "user created"));

    let response = app
        .clone()
        .oneshot(form_request(Method::POST, "/users", &creds, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(response).await;
    assert_eq!(body.message, "email already registered");

    // wrong password
    let response = app
        .clone()
        .oneshot(form_request(
            Method::POST,
            "/sessions",
            &format!("email={EMAIL}&password={NEW_PASSWD}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // profile without a session
    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/profile", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // log in
    let response = app
        .clone()
        .oneshot(form_request(Method::POST, "/sessions", &creds, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = cookie_pair(&response, "session_id").expect("session cookie");
    let body: EmailMessage = body_json(response).await;
    assert_eq!(body.message, "logged in");

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Profile = body_json(response).await;
    assert_eq!(body.email, EMAIL);

    // log out redirects home and kills the session
    let response = app
        .clone()
        .oneshot(empty_request(Method::DELETE, "/sessions", Some(&cookie)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/");

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(empty_request(Method::DELETE, "/sessions", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // reset the password
    let response = app
        .clone()
        .oneshot(form_request(
            Method::POST,
            "/reset_password",
            &format!("email={EMAIL}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let issued: ResetTokenIssued = body_json(response).await;
    assert_eq!(issued.email, EMAIL);

    let update = format!(
        "email={EMAIL}&reset_token={}&new_password={NEW_PASSWD}",
        issued.reset_token
    );
    let response = app
        .clone()
        .oneshot(form_request(Method::PUT, "/reset_password", &update, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: EmailMessage = body_json(response).await;
    assert_eq!(body, EmailMessage::new(EMAIL, "Password updated"));

    // the token is spent
    let response = app
        .clone()
        .oneshot(form_request(Method::PUT, "/reset_password", &update, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(form_request(
            Method::POST,
            "/sessions",
            &format!("email={EMAIL}&password={NEW_PASSWD}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_fields_and_unknown_email() {
    let (app, _state) = test_app(AuthType::SessionExp).await;

    let response = app
        .clone()
        .oneshot(form_request(Method::POST, "/users", "email=a@b.com", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(response).await;
    assert_eq!(body.message, "password missing");

    let response = app
        .clone()
        .oneshot(form_request(
            Method::POST,
            "/reset_password",
            "email=nobody@b.com",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(form_request(
            Method::PUT,
            "/reset_password",
            "email=a@b.com&reset_token=bogus&new_password=x",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_api_session_login_and_logout() {
    let (app, state) = test_app(AuthType::SessionExp).await;
    let user = state.auth.register_user("a@b.com", "pw").await.unwrap();

    for form in ["password=pw", "email=a@b.com"] {
        let response = app
            .clone()
            .oneshot(form_request(Method::POST, "/api/v1/auth_session/login", form, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    for form in ["email=a@b.com&password=nope", "email=x@b.com&password=pw"] {
        let response = app
            .clone()
            .oneshot(form_request(Method::POST, "/api/v1/auth_session/login", form, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .clone()
        .oneshot(form_request(
            Method::POST,
            "/api/v1/auth_session/login",
            "email=a@b.com&password=pw",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = cookie_pair(&response, "session_id").expect("session cookie");
    let body: UserView = body_json(response).await;
    assert_eq!(body.id, user.id);

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/users/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: UserView = body_json(response).await;
    assert_eq!(body.email, "a@b.com");

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::DELETE,
            "/api/v1/auth_session/logout",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = body_json(response).await;
    assert_eq!(body, serde_json::json!({}));

    // the cookie is dead: the guard now rejects it
    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/users/me", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cors_only_on_api_routes() {
    let (app, _state) = test_app(AuthType::SessionExp).await;
    let request = |uri: &str| {
        axum::http::Request::builder()
            .uri(uri)
            .header(header::ORIGIN, "http://example.com")
            .body(axum::body::Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(request("/api/v1/status")).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let response = app.oneshot(request("/")).await.unwrap();
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_flat_file_backed_router() {
    let (state, dir) = setup_flat_file_env(AuthType::Session).await;
    let app = create_router(state);

    let response = app
        .oneshot(form_request(
            Method::POST,
            "/users",
            "email=a@b.com&password=pw",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let raw = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
    assert!(raw.contains("a@b.com"));
    assert!(!raw.contains("\"pw\""));
}

#[tokio::test]
async fn test_custom_cookie_name() {
    let mut settings = crate::test_utils::test_settings(AuthType::Session);
    settings.auth.session_cookie_name = "_my_session_id".to_string();
    let state = crate::test_utils::test_state(settings).await;
    state.auth.register_user("a@b.com", "pw").await.unwrap();
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(form_request(
            Method::POST,
            "/sessions",
            "email=a@b.com&password=pw",
            None,
        ))
        .await
        .unwrap();
    let cookie = cookie_pair(&response, "_my_session_id").expect("custom cookie");

    let response = app
        .oneshot(empty_request(Method::GET, "/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
