// ============================
// gatekeep-backend/src/lib.rs
// ============================
//! Core library for the `gatekeep` session authentication server.

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod redact;
pub mod router;
pub mod storage;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::access::PathAuthorizer;
use crate::auth::{hash_params, policy_for, AuthService, DefaultAuth};
use crate::config::Settings;
use crate::storage::{FlatFileStore, InMemoryStore};

pub use router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Paths that skip the request guard
    pub authorizer: PathAuthorizer,
}

impl AppState {
    /// Create a new application state around an existing service.
    pub fn new(auth: Arc<dyn AuthService>, settings: Settings) -> Self {
        let authorizer = PathAuthorizer::new(settings.auth.excluded_paths.iter().cloned());
        Self {
            auth,
            settings: Arc::new(settings),
            authorizer,
        }
    }

    /// Build the store and auth service described by `settings`.
    pub async fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let params = hash_params(settings.auth.scrypt_log_n)
            .map_err(|e| anyhow::anyhow!("invalid scrypt cost: {e}"))?;
        let policy = policy_for(settings.auth.auth_type, settings.auth.session_duration);

        let auth: Arc<dyn AuthService> = match &settings.storage.path {
            Some(path) => {
                let store = FlatFileStore::open(path)
                    .await
                    .with_context(|| format!("opening store at {}", path.display()))?;
                info!(path = %store.path().display(), "using flat-file store");
                Arc::new(DefaultAuth::new(store).with_policy(policy).with_hash_params(params))
            },
            None => {
                info!("using in-memory store");
                Arc::new(
                    DefaultAuth::new(InMemoryStore::new())
                        .with_policy(policy)
                        .with_hash_params(params),
                )
            },
        };

        Ok(Self::new(auth, settings))
    }
}
