// ============================
// gatekeep-backend/src/config.rs
// ============================
//! Configuration management.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file,
//! `GATEKEEP_`-prefixed environment variables (`__` separates sections, e.g.
//! `GATEKEEP_AUTH__SESSION_DURATION`), then the flat variable names
//! `API_HOST`, `API_PORT`, `SESSION_DURATION`, `SESSION_NAME` and `AUTH_TYPE`.
use std::{net::SocketAddr, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::auth::password;
use crate::redact::{RedactionSpec, PII_FIELDS, REDACTION, SEPARATOR};

/// Default configuration file name
pub const CONFIG_FILE: &str = "gatekeep.toml";
/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "GATEKEEP_";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Listen address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// How requests under `/api/v1` are authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    /// No request guard
    #[serde(rename = "none", alias = "auth")]
    None,
    /// `Authorization: Basic` credentials
    #[serde(rename = "basic_auth")]
    Basic,
    /// Session cookie, sessions never expire
    #[serde(rename = "session_auth")]
    Session,
    /// Session cookie, sessions expire after `session_duration` seconds
    #[default]
    #[serde(rename = "session_exp_auth")]
    SessionExp,
}

/// Authentication settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub auth_type: AuthType,
    /// Session lifetime in seconds; zero or negative disables expiry
    pub session_duration: i64,
    pub session_cookie_name: String,
    /// Paths under `/api/v1` that skip the request guard
    pub excluded_paths: Vec<String>,
    /// scrypt cost, log2(N)
    pub scrypt_log_n: u8,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            auth_type: AuthType::default(),
            session_duration: 0,
            session_cookie_name: "session_id".to_string(),
            excluded_paths: vec![
                "/api/v1/status/".to_string(),
                "/api/v1/unauthorized/".to_string(),
                "/api/v1/forbidden/".to_string(),
                "/api/v1/auth_session/login/".to_string(),
            ],
            scrypt_log_n: password::DEFAULT_LOG_N,
        }
    }
}

/// Where users are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for the flat-file store; in-memory when unset
    pub path: Option<PathBuf>,
}

/// Log output shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
    /// Fields masked in `key=value;` log lines
    pub pii_fields: Vec<String>,
    pub redaction: String,
    pub separator: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            pii_fields: PII_FIELDS.iter().map(|f| f.to_string()).collect(),
            redaction: REDACTION.to_string(),
            separator: SEPARATOR.to_string(),
        }
    }
}

impl LoggingSettings {
    pub fn redaction_spec(&self) -> RedactionSpec {
        RedactionSpec {
            fields: self.pii_fields.clone(),
            redaction: self.redaction.clone(),
            separator: self.separator.clone(),
        }
    }
}

/// Maps the flat variable names onto settings keys.
fn legacy_env() -> Env {
    Env::raw()
        .only(&[
            "API_HOST",
            "API_PORT",
            "SESSION_DURATION",
            "SESSION_NAME",
            "AUTH_TYPE",
        ])
        .map(|key| {
            match key.as_str().to_ascii_uppercase().as_str() {
                "API_HOST" => "server.host",
                "API_PORT" => "server.port",
                "SESSION_DURATION" => "auth.session_duration",
                "SESSION_NAME" => "auth.session_cookie_name",
                _ => "auth.auth_type",
            }
            .into()
        })
}

impl Settings {
    fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(legacy_env())
    }

    /// Load from `gatekeep.toml` in the working directory (if present) and
    /// the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load with `path` as the TOML file. A missing file is not an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings: Settings = Self::figment(path)
            .extract()
            .with_context(|| format!("loading configuration ({})", path.display()))?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        let cookie = &self.auth.session_cookie_name;
        if cookie.is_empty()
            || cookie
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '=' | ','))
        {
            bail!("auth.session_cookie_name {cookie:?} is not a valid cookie name");
        }
        password::hash_params(self.auth.scrypt_log_n)
            .map_err(|_| anyhow::anyhow!("auth.scrypt_log_n {} is out of range", self.auth.scrypt_log_n))?;
        EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("logging.level {:?}", self.logging.level))?;
        if self.logging.separator.is_empty() {
            bail!("logging.separator must not be empty");
        }
        // audit values are percent-encoded, so they can never contain a separator
        // that has at least one reserved character
        if self
            .logging
            .separator
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%'))
        {
            bail!(
                "logging.separator {:?} needs a character outside [A-Za-z0-9-_.~%]",
                self.logging.separator
            );
        }
        Ok(())
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.server.host, self.server.port))
    }
}
