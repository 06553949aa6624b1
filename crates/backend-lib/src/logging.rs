// ============================
// gatekeep-backend/src/logging.rs
// ============================
//! Process-wide tracing subscriber with PII redaction on every line.
use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingSettings};
use crate::redact::{RedactingFormatter, Redactor};

/// `RUST_LOG` if set, the configured level otherwise.
fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("invalid log level {:?}", settings.level)),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let filter = env_filter(settings)?;
    let redactor =
        Redactor::new(settings.redaction_spec()).context("compiling redaction patterns")?;

    match settings.format {
        LogFormat::Full => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .event_format(RedactingFormatter::new(redactor)),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .event_format(RedactingFormatter::with_inner(
                        fmt::format().json(),
                        redactor,
                    )),
            )
            .try_init(),
    }
    .context("installing tracing subscriber")
}
