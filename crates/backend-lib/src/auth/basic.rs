// ============================
// gatekeep-backend/src/auth/basic.rs
// ============================
//! HTTP Basic authentication header parsing.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use zeroize::Zeroize;

const BASIC_PREFIX: &str = "Basic ";

/// Email/password pair taken from a Basic header.
///
/// The password is wiped from memory when the value is dropped.
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Return the base64 part of a `Basic <b64>` authorization header.
pub fn extract_base64_authorization_header(header: &str) -> Option<&str> {
    header.strip_prefix(BASIC_PREFIX)
}

/// Decode the base64 part of a Basic header into UTF-8 text.
pub fn decode_base64_authorization_header(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    match String::from_utf8(bytes) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            let mut bytes = err.into_bytes();
            bytes.zeroize();
            None
        },
    }
}

/// Split `email:password` at the first colon; the password may contain colons.
pub fn extract_user_credentials(decoded: &str) -> Option<Credentials> {
    let (email, password) = decoded.split_once(':')?;
    Some(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Run the whole header pipeline.
pub fn credentials_from_header(header: &str) -> Option<Credentials> {
    let encoded = extract_base64_authorization_header(header)?;
    let mut decoded = decode_base64_authorization_header(encoded)?;
    let credentials = extract_user_credentials(&decoded);
    decoded.zeroize();
    credentials
}
