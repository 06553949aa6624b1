// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Configuration loading and the state it produces
use backend_lib::auth::{policy_for, FixedLifetime};
use backend_lib::config::{AuthType, LogFormat, Settings};
use chrono::{Duration, Utc};
use figment::Jail;

use crate::test_utils::{test_settings, test_state};

#[test]
fn test_full_toml_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
            [server]
            host = "127.0.0.1"
            port = 7000

            [auth]
            auth_type = "session_exp_auth"
            session_duration = 300
            session_cookie_name = "sid"
            excluded_paths = ["/api/v1/status/", "/api/v1/public*"]

            [storage]
            path = "data"

            [logging]
            level = "debug"
            format = "json"
            pii_fields = ["email"]
            "#,
        )?;

        let settings = Settings::load_from("custom.toml").expect("settings");
        assert_eq!(settings.server.port, 7000);
        assert_eq!(settings.auth.session_duration, 300);
        assert_eq!(settings.auth.session_cookie_name, "sid");
        assert_eq!(settings.auth.excluded_paths.len(), 2);
        assert_eq!(settings.storage.path.as_deref(), Some(std::path::Path::new("data")));
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.pii_fields, vec!["email".to_string()]);
        // untouched keys keep their defaults
        assert_eq!(settings.logging.redaction, "***");
        assert!(settings.validate().is_ok());
        Ok(())
    });
}

#[test]
fn test_unknown_auth_type_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("AUTH_TYPE", "kerberos");
        assert!(Settings::load().is_err());
        Ok(())
    });
}

#[test]
fn test_policy_follows_auth_type_and_duration() {
    let now = Utc::now();
    let stale = Some(now - Duration::seconds(10));

    // expiring mode with a positive duration stamps and expires
    let policy = policy_for(AuthType::SessionExp, 5);
    assert!(policy.stamp(now).is_some());
    assert!(!policy.is_live(stale, now));

    // zero duration never expires
    let policy = policy_for(AuthType::SessionExp, 0);
    assert!(policy.stamp(now).is_none());
    assert!(policy.is_live(stale, now));

    // the non-expiring session mode ignores the duration
    let policy = policy_for(AuthType::Session, 5);
    assert!(policy.is_live(stale, now));

    assert_eq!(FixedLifetime::from_secs(5).lifetime(), Duration::seconds(5));
}

#[tokio::test]
async fn test_state_carries_exclusions() {
    let mut settings = test_settings(AuthType::Session);
    settings.auth.excluded_paths = vec!["/api/v1/open*".to_string()];
    let state = test_state(settings).await;
    assert!(!state.authorizer.requires_auth("/api/v1/open/anything"));
    assert!(state.authorizer.requires_auth("/api/v1/status"));
}
