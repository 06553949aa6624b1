// ============================
// gatekeep-backend/src/redact.rs
// ============================
//! PII redaction for structured log lines of the form `key=value<sep>`.
//!
//! [`filter_datum`] is the one-shot text transform. [`Redactor`] compiles the
//! patterns once for a fixed [`RedactionSpec`], and [`RedactingFormatter`]
//! plugs a `Redactor` into `tracing-subscriber` so every formatted event is
//! scrubbed before it is written.
//!
//! A value is the shortest run of characters (newlines excluded) ending at the
//! next separator; a `key=value` with no separator after it is left alone.
//! Patterns are built from escaped literals, so failing to compile one means
//! a size limit was hit. In that case the whole line is replaced by the
//! redaction literal rather than emitted unredacted.
use std::fmt::{self, Write as _};

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{self, Format, FormatEvent, FormatFields, Full},
        time::SystemTime,
        FmtContext,
    },
    registry::LookupSpan,
};

/// Fields treated as PII by default
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];
/// Default replacement text
pub const REDACTION: &str = "***";
/// Default field separator
pub const SEPARATOR: &str = ";";

/// What to redact and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionSpec {
    /// Field names to obfuscate, applied in order
    pub fields: Vec<String>,
    /// Replacement for each redacted value
    pub redaction: String,
    /// Terminates each `key=value`
    pub separator: String,
}

impl Default for RedactionSpec {
    fn default() -> Self {
        Self {
            fields: PII_FIELDS.iter().map(|f| f.to_string()).collect(),
            redaction: REDACTION.to_string(),
            separator: SEPARATOR.to_string(),
        }
    }
}

/// Replace the value of every `field=value<separator>` in `message` for each
/// of `fields` with `redaction`, keeping the separator.
pub fn filter_datum<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: &str,
) -> String {
    let spec = RedactionSpec {
        fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        redaction: redaction.to_string(),
        separator: separator.to_string(),
    };
    match Redactor::new(spec) {
        Ok(redactor) => redactor.redact(message),
        Err(_) => redaction.to_string(),
    }
}

/// Precompiled patterns for one [`RedactionSpec`].
#[derive(Debug, Clone)]
pub struct Redactor {
    spec: RedactionSpec,
    rules: Vec<(Regex, String)>,
}

impl Redactor {
    pub fn new(spec: RedactionSpec) -> Result<Self, regex::Error> {
        let sep = regex::escape(&spec.separator);
        let rules = spec
            .fields
            .iter()
            .map(|field| {
                let pattern = Regex::new(&format!("{}=.*?{}", regex::escape(field), sep))?;
                let replacement = format!("{}={}{}", field, spec.redaction, spec.separator);
                Ok((pattern, replacement))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { spec, rules })
    }

    pub fn spec(&self) -> &RedactionSpec {
        &self.spec
    }

    /// Redact a copy of `message`.
    pub fn redact(&self, message: &str) -> String {
        self.rules
            .iter()
            .fold(message.to_string(), |line, (pattern, replacement)| {
                pattern
                    .replace_all(&line, NoExpand(replacement))
                    .into_owned()
            })
    }
}

/// Event formatter that runs the wrapped formatter, then redacts its output.
#[derive(Debug, Clone)]
pub struct RedactingFormatter<F = Format<Full, SystemTime>> {
    inner: F,
    redactor: Redactor,
}

impl RedactingFormatter {
    /// Wrap the default full-text formatter.
    pub fn new(redactor: Redactor) -> Self {
        Self::with_inner(tracing_subscriber::fmt::format(), redactor)
    }
}

impl<F> RedactingFormatter<F> {
    pub fn with_inner(inner: F, redactor: Redactor) -> Self {
        Self { inner, redactor }
    }

    /// Redact an already formatted line.
    pub fn format_line(&self, line: &str) -> String {
        self.redactor.redact(line)
    }
}

impl<S, N, F> FormatEvent<S, N> for RedactingFormatter<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut line = String::new();
        self.inner
            .format_event(ctx, format::Writer::new(&mut line), event)?;
        writer.write_str(&self.format_line(&line))
    }
}
