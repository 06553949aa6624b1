// ============================
// gatekeep-backend/src/storage.rs
// ============================
//! Credential storage abstraction with in-memory and flat-file implementations.
//!
//! Lookups are exact-match over a fixed set of user fields. A lookup that
//! matches zero records and one that matches several both report
//! [`StoreError::NotFound`]; the non-null values of `id`, `email`,
//! `session_id` and `reset_token` are unique, so "several" only happens on
//! filters over `hashed_password`.
use std::{fmt, str::FromStr};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod flat_file;
mod memory;

pub use flat_file::FlatFileStore;
pub use memory::InMemoryStore;

/// Storage-layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no single user matches the filter")]
    NotFound,

    #[error("a user with email {0} already exists")]
    AlreadyExists(String),

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored user record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier
    pub id: String,
    /// Unique, immutable after creation
    pub email: String,
    /// PHC-format scrypt hash
    pub hashed_password: String,
    /// Current session, if logged in
    #[serde(default)]
    pub session_id: Option<String>,
    /// Creation time of `session_id`, written only under an expiring policy
    #[serde(default)]
    pub session_created_at: Option<DateTime<Utc>>,
    /// Outstanding password-reset token
    #[serde(default)]
    pub reset_token: Option<String>,
}

impl User {
    fn new(email: &str, hashed_password: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            session_id: None,
            session_created_at: None,
            reset_token: None,
        }
    }
}

/// Fields a filter or an update may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    Email,
    HashedPassword,
    SessionId,
    ResetToken,
}

impl UserField {
    pub fn as_str(self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Email => "email",
            UserField::HashedPassword => "hashed_password",
            UserField::SessionId => "session_id",
            UserField::ResetToken => "reset_token",
        }
    }

    fn value_of(self, user: &User) -> Option<&str> {
        match self {
            UserField::Id => Some(&user.id),
            UserField::Email => Some(&user.email),
            UserField::HashedPassword => Some(&user.hashed_password),
            UserField::SessionId => user.session_id.as_deref(),
            UserField::ResetToken => user.reset_token.as_deref(),
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserField {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(UserField::Id),
            "email" => Ok(UserField::Email),
            "hashed_password" => Ok(UserField::HashedPassword),
            "session_id" => Ok(UserField::SessionId),
            "reset_token" => Ok(UserField::ResetToken),
            other => Err(StoreError::InvalidField(other.to_string())),
        }
    }
}

/// Conjunction of exact-match conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    conditions: Vec<(UserField, String)>,
}

impl UserFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(field: UserField, value: impl Into<String>) -> Self {
        Self::new().and(field, value)
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::by(UserField::Id, value)
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self::by(UserField::Email, value)
    }

    pub fn session_id(value: impl Into<String>) -> Self {
        Self::by(UserField::SessionId, value)
    }

    pub fn reset_token(value: impl Into<String>) -> Self {
        Self::by(UserField::ResetToken, value)
    }

    pub fn and(mut self, field: UserField, value: impl Into<String>) -> Self {
        self.conditions.push((field, value.into()));
        self
    }

    /// Build a filter from `(field name, value)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |filter, (name, value)| {
                Ok(filter.and(name.parse()?, value))
            })
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, user: &User) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| field.value_of(user) == Some(value.as_str()))
    }
}

/// Partial update of the mutable user fields.
///
/// `None` leaves a field untouched; `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub hashed_password: Option<String>,
    pub session_id: Option<Option<String>>,
    pub session_created_at: Option<Option<DateTime<Utc>>>,
    pub reset_token: Option<Option<String>>,
}

impl UserUpdate {
    /// Start a new session, replacing any previous one.
    pub fn start_session(session_id: String, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            session_id: Some(Some(session_id)),
            session_created_at: Some(created_at),
            ..Self::default()
        }
    }

    pub fn end_session() -> Self {
        Self {
            session_id: Some(None),
            session_created_at: Some(None),
            ..Self::default()
        }
    }

    pub fn reset_token(token: String) -> Self {
        Self {
            reset_token: Some(Some(token)),
            ..Self::default()
        }
    }

    /// Store a new hash and consume the reset token.
    pub fn new_password(hashed_password: String) -> Self {
        Self {
            hashed_password: Some(hashed_password),
            reset_token: Some(None),
            ..Self::default()
        }
    }

    /// Build an update from `(field name, value)` pairs; `None` clears the field.
    /// `id` and `email` are immutable and rejected like unknown names.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut update = Self::default();
        for (name, value) in pairs {
            let value = value.map(str::to_string);
            match name.parse::<UserField>()? {
                UserField::HashedPassword => {
                    update.hashed_password =
                        Some(value.ok_or_else(|| StoreError::InvalidField(name.to_string()))?);
                },
                UserField::SessionId => update.session_id = Some(value),
                UserField::ResetToken => update.reset_token = Some(value),
                UserField::Id | UserField::Email => {
                    return Err(StoreError::InvalidField(name.to_string()))
                },
            }
        }
        Ok(update)
    }

    fn apply(self, user: &mut User) {
        if let Some(hash) = self.hashed_password {
            user.hashed_password = hash;
        }
        if let Some(session_id) = self.session_id {
            user.session_id = session_id;
        }
        if let Some(created_at) = self.session_created_at {
            user.session_created_at = created_at;
        }
        if let Some(token) = self.reset_token {
            user.reset_token = token;
        }
    }
}

/// Trait for credential storage backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user; fails with `AlreadyExists` if the email is taken.
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, StoreError>;

    /// Return the single user matching every condition of `filter`.
    async fn find_one_by(&self, filter: &UserFilter) -> Result<User, StoreError>;

    /// Apply `update` to the user with id `user_id`.
    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<(), StoreError>;

    /// Find the single user matching `filter` and apply `update` to it in
    /// one step, returning the updated record.
    async fn find_and_update(
        &self,
        filter: &UserFilter,
        update: UserUpdate,
    ) -> Result<User, StoreError>;
}

/// The unsynchronised user table both backends wrap in their own lock.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct UserTable {
    users: Vec<User>,
}

impl UserTable {
    pub(crate) fn insert(&mut self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        if email.is_empty() || hashed_password.is_empty() {
            return Err(StoreError::InvalidField("email".to_string()));
        }
        if self.users.iter().any(|u| u.email == email) {
            return Err(StoreError::AlreadyExists(email.to_string()));
        }
        let user = User::new(email, hashed_password);
        self.users.push(user.clone());
        Ok(user)
    }

    fn position(&self, filter: &UserFilter) -> Result<usize, StoreError> {
        if filter.is_empty() {
            return Err(StoreError::InvalidField("empty filter".to_string()));
        }
        let mut hits = self
            .users
            .iter()
            .enumerate()
            .filter(|(_, user)| filter.matches(user))
            .map(|(idx, _)| idx);
        match (hits.next(), hits.next()) {
            (Some(idx), None) => Ok(idx),
            _ => Err(StoreError::NotFound),
        }
    }

    pub(crate) fn find_one_by(&self, filter: &UserFilter) -> Result<User, StoreError> {
        self.position(filter).map(|idx| self.users[idx].clone())
    }

    pub(crate) fn update(&mut self, user_id: &str, update: UserUpdate) -> Result<(), StoreError> {
        self.find_and_update(&UserFilter::id(user_id), update)
            .map(|_| ())
    }

    pub(crate) fn find_and_update(
        &mut self,
        filter: &UserFilter,
        update: UserUpdate,
    ) -> Result<User, StoreError> {
        let idx = self.position(filter)?;
        let user = &mut self.users[idx];
        update.apply(user);
        Ok(user.clone())
    }
}
