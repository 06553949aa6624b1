// crates/backend-lib/src/middleware/mod.rs

//! Request middleware for the `gatekeep` server.

pub mod auth;

pub use auth::{authorization_header, current_user, require_auth, session_cookie, CurrentUser};
