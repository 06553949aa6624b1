// ============================
// gatekeep-backend/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are PHC strings (`$scrypt$ln=..,r=..,p=..$salt$hash`), so the cost
//! parameters travel with each hash and verification does not need them.
use rand::rngs::OsRng;
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};

/// Default scrypt cost (log2 of N)
pub const DEFAULT_LOG_N: u8 = 15;

/// Build scrypt parameters for cost `log_n` with the recommended block size,
/// parallelism and output length.
pub fn hash_params(log_n: u8) -> Result<Params, scrypt::errors::InvalidParams> {
    Params::new(
        log_n,
        Params::RECOMMENDED_R,
        Params::RECOMMENDED_P,
        Params::RECOMMENDED_LEN,
    )
}

/// Hash a password with a fresh random salt.
///
/// Two calls with the same input produce different hashes.
pub fn hash_password(plain: &str, params: Params) -> Result<String, scrypt::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored hash.
///
/// An unparsable hash verifies as `false`.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}
