// ============================
// gatekeep-backend/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod basic;
pub mod password;
pub mod session;
pub mod token_generator;
mod service;
mod service_impl;

pub use basic::{credentials_from_header, Credentials};
pub use password::{hash_params, hash_password, verify_password, DEFAULT_LOG_N};
pub use service::{AuthError, AuthService};
pub use service_impl::DefaultAuth;
pub use session::{policy_for, Clock, FixedLifetime, ManualClock, NoExpiry, SessionPolicy, SystemClock};
