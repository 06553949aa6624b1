// ==============
// gatekeep-backend/src/metrics.rs

//! Central place for metric keys
pub const USER_REGISTERED: &str = "auth.user.registered";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const SESSION_CREATED: &str = "auth.session.created";
pub const SESSION_DESTROYED: &str = "auth.session.destroyed";
pub const SESSION_EXPIRED: &str = "auth.session.expired";
pub const RESET_TOKEN_ISSUED: &str = "auth.reset_token.issued";
pub const PASSWORD_UPDATED: &str = "auth.password.updated";
pub const REQUEST_UNAUTHORIZED: &str = "http.request.unauthorized";
pub const REQUEST_FORBIDDEN: &str = "http.request.forbidden";
