// ============================
// tests/unit/password_tests.rs
// ============================
//! Password hashing and Basic header credentials
use backend_lib::auth::{
    basic::{decode_base64_authorization_header, extract_base64_authorization_header},
    credentials_from_header, hash_params, hash_password, verify_password,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::test_utils::TEST_LOG_N;

#[test]
fn test_hash_is_salted_phc_string() {
    let params = hash_params(TEST_LOG_N).unwrap();
    let first = hash_password("hunter2", params.clone()).unwrap();
    let second = hash_password("hunter2", params).unwrap();

    assert!(first.starts_with("$scrypt$"));
    assert_ne!(first, second, "fresh salt per hash");
    assert!(verify_password(&first, "hunter2"));
    assert!(verify_password(&second, "hunter2"));
    assert!(!verify_password(&first, "hunter3"));
}

#[test]
fn test_verify_rejects_garbage_hash() {
    assert!(!verify_password("not a phc string", "pw"));
    assert!(!verify_password("", ""));
}

#[test]
fn test_basic_header_pipeline_step_by_step() {
    let header = format!("Basic {}", STANDARD.encode("bob@dylan.com:toto1234"));
    let encoded = extract_base64_authorization_header(&header).unwrap();
    let decoded = decode_base64_authorization_header(encoded).unwrap();
    assert_eq!(decoded, "bob@dylan.com:toto1234");

    let creds = credentials_from_header(&header).unwrap();
    assert_eq!(creds.email, "bob@dylan.com");
    assert_eq!(creds.password, "toto1234");
}

#[test]
fn test_basic_header_rejections() {
    assert!(credentials_from_header("Bearer abc").is_none());
    assert!(credentials_from_header("Basic !!!").is_none());
    let no_colon = format!("Basic {}", STANDARD.encode("bob@dylan.com"));
    assert!(credentials_from_header(&no_colon).is_none());
}
