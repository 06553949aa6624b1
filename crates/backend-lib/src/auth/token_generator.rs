// ============================
// gatekeep-backend/src/auth/token_generator.rs
// ============================
//! Random identifiers for sessions and password resets.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

/// Reset tokens carry 128 bits of entropy
const RESET_TOKEN_BYTES: usize = 16;

/// Generate a session identifier (random UUID v4).
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/** Generate a password-reset token from OS entropy.
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_reset_token() -> String {
    let mut buffer = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
