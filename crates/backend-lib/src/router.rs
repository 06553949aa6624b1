// ============================
// gatekeep-backend/src/router.rs
// ============================
//! Route table.
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{accounts, api, reset, sessions};
use crate::middleware::require_auth;
use crate::AppState;

/// Build the full application router.
///
/// The request guard only wraps the `/api/v1` routes; the top-level routes
/// check the session cookie themselves.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/v1/status", get(api::status))
        .route("/api/v1/unauthorized", get(api::unauthorized))
        .route("/api/v1/forbidden", get(api::forbidden))
        .route("/api/v1/users/me", get(api::me))
        .route("/api/v1/auth_session/login", post(api::login))
        .route("/api/v1/auth_session/logout", delete(api::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(cors);

    Router::new()
        .route("/", get(accounts::index))
        .route("/users", post(accounts::register))
        .route("/profile", get(accounts::profile))
        .route("/sessions", post(sessions::login).delete(sessions::logout))
        .route(
            "/reset_password",
            post(reset::issue_token).put(reset::update_password),
        )
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
