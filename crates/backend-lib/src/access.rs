// ============================
// gatekeep-backend/src/access.rs
// ============================
//! Path exclusion matching: which request paths skip authentication.

/// Strip a single trailing `/`, leaving the root path alone.
fn trim_slash(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

/// Whether `path` needs authentication given `exclusions`.
///
/// A missing or empty path always requires authentication. Exclusions are
/// checked in order and the first match wins: an exclusion ending in `*`
/// matches any path starting with the text before the star, anything else
/// must equal the path once a trailing `/` is dropped from both.
pub fn requires_auth<S: AsRef<str>>(path: Option<&str>, exclusions: &[S]) -> bool {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return true;
    };
    let path = trim_slash(path);

    !exclusions.iter().any(|rule| {
        let rule = trim_slash(rule.as_ref());
        if rule.is_empty() {
            return false;
        }
        match rule.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => path == rule,
        }
    })
}

/// A fixed exclusion list.
#[derive(Debug, Clone, Default)]
pub struct PathAuthorizer {
    exclusions: Vec<String>,
}

impl PathAuthorizer {
    pub fn new<I, S>(exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclusions: exclusions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn requires_auth(&self, path: &str) -> bool {
        requires_auth(Some(path), &self.exclusions)
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }
}
