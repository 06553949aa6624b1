// ============================
// gatekeep-backend/src/auth/session.rs
// ============================
//! Session expiry policies and the clock they read.
//!
//! Expiry is lazy: a session is checked against its policy when it is looked
//! up and nothing ever sweeps stale sessions out of the store.
use std::{fmt, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::config::AuthType;

/// Source of the current time
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Decides whether a stored session is still usable.
pub trait SessionPolicy: Send + Sync + fmt::Debug {
    /// Creation time to record for a session started at `now`, if this
    /// policy tracks one.
    fn stamp(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Whether a session created at `created_at` is live at `now`.
    fn is_live(&self, created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool;
}

/// Sessions last until they are destroyed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExpiry;

impl SessionPolicy for NoExpiry {
    fn stamp(&self, _now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        None
    }

    fn is_live(&self, _created_at: Option<DateTime<Utc>>, _now: DateTime<Utc>) -> bool {
        true
    }
}

/// Sessions expire a fixed time after they were created.
#[derive(Debug, Clone, Copy)]
pub struct FixedLifetime {
    lifetime: Duration,
}

impl FixedLifetime {
    pub fn new(lifetime: Duration) -> Self {
        Self { lifetime }
    }

    /// Lifetime of `secs` seconds; values too large for a `Duration` saturate.
    pub fn from_secs(secs: i64) -> Self {
        Self::new(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl SessionPolicy for FixedLifetime {
    fn stamp(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        Some(now)
    }

    fn is_live(&self, created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        // a session without a creation stamp cannot be proven fresh
        let Some(created_at) = created_at else {
            return false;
        };
        match created_at.checked_add_signed(self.lifetime) {
            Some(expires_at) => expires_at >= now,
            None => true,
        }
    }
}

/// Pick the policy for an auth mode and a configured duration in seconds.
///
/// Only the expiring session mode with a positive duration expires sessions.
pub fn policy_for(auth_type: AuthType, duration_secs: i64) -> Arc<dyn SessionPolicy> {
    match auth_type {
        AuthType::SessionExp if duration_secs > 0 => {
            Arc::new(FixedLifetime::from_secs(duration_secs))
        },
        _ => Arc::new(NoExpiry),
    }
}
