// =============
// gatekeep-backend/src/auth/service_impl.rs
// =============
use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use scrypt::Params;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::{
    password::{self, hash_password, verify_password},
    session::{Clock, NoExpiry, SessionPolicy, SystemClock},
    token_generator::{generate_reset_token, generate_session_id},
    AuthError, AuthService,
};
use crate::metrics as keys;
use crate::storage::{CredentialStore, StoreError, User, UserFilter, UserUpdate};

/// Target for `key=value;` audit lines, which pass through the log redactor.
const AUDIT: &str = "gatekeep::audit";

/// Audit values are percent-encoded so a crafted email cannot end its
/// `key=value;` pair early or start a new line.
fn audit_value(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Plaintext password handed to a blocking worker, wiped when dropped.
fn secret(plain: &str) -> Zeroizing<String> {
    Zeroizing::new(plain.to_owned())
}

/// Run scrypt verification off the async workers.
async fn verify_blocking(hash: String, plain: &str) -> bool {
    let plain = secret(plain);
    tokio::task::spawn_blocking(move || verify_password(&hash, &plain))
        .await
        .unwrap_or(false)
}

/// `AuthService` over any `CredentialStore`.
pub struct DefaultAuth<S> {
    store: S,
    policy: Arc<dyn SessionPolicy>,
    clock: Arc<dyn Clock>,
    params: Params,
    /// Hash checked against when the email is unknown, so a miss costs as
    /// much as a wrong password
    dummy_hash: OnceCell<Option<String>>,
}

impl<S: CredentialStore> DefaultAuth<S> {
    /// Sessions never expire and hashing uses the default scrypt cost.
    pub fn new(store: S) -> Self {
        let params = password::hash_params(password::DEFAULT_LOG_N).unwrap_or_default();
        Self {
            store,
            policy: Arc::new(NoExpiry),
            clock: Arc::new(SystemClock),
            params,
            dummy_hash: OnceCell::new(),
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn SessionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_hash_params(mut self, params: Params) -> Self {
        self.params = params;
        self.dummy_hash = OnceCell::new();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look a user up, folding "no such user" into `None`.
    async fn find(&self, filter: &UserFilter) -> Result<Option<User>, AuthError> {
        match self.store.find_one_by(filter).await {
            Ok(user) => Ok(Some(user)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn hash(&self, plain: &str) -> Result<String, AuthError> {
        let plain = secret(plain);
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || hash_password(&plain, params))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// `None` only if hashing itself fails, in which case misses stay fast.
    async fn dummy_hash(&self) -> Option<&str> {
        self.dummy_hash
            .get_or_init(|| async {
                match self.hash("gatekeep-unknown-user").await {
                    Ok(hash) => Some(hash),
                    Err(e) => {
                        warn!(error = %e, "could not build dummy hash");
                        None
                    },
                }
            })
            .await
            .as_deref()
    }

    /// Verify `password` for `user`, spending the same scrypt work when there
    /// is no such user.
    async fn check_password(&self, user: Option<&User>, password: &str) -> bool {
        match user {
            Some(user) => verify_blocking(user.hashed_password.clone(), password).await,
            None => {
                if let Some(hash) = self.dummy_hash().await {
                    verify_blocking(hash.to_owned(), password).await;
                }
                false
            },
        }
    }
}

#[async_trait]
impl<S: CredentialStore> AuthService for DefaultAuth<S> {
    async fn register_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if self.find(&UserFilter::email(email)).await?.is_some() {
            info!(target: AUDIT, "event=register_conflict;email={};", audit_value(email));
            return Err(AuthError::AlreadyExists(email.to_string()));
        }
        let hashed = self.hash(password).await?;
        // the store re-checks uniqueness under its lock
        let user = self.store.insert(email, &hashed).await?;

        counter!(keys::USER_REGISTERED).increment(1);
        info!(
            target: AUDIT,
            "event=register;user_id={};email={};",
            user.id,
            audit_value(email)
        );
        Ok(user)
    }

    async fn valid_login(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let user = self.find(&UserFilter::email(email)).await?;
        let valid = self.check_password(user.as_ref(), password).await;
        if !valid {
            counter!(keys::LOGIN_FAILED).increment(1);
            warn!(target: AUDIT, "event=login_failed;email={};", audit_value(email));
        }
        Ok(valid)
    }

    async fn create_session(&self, email: &str) -> Result<Option<String>, AuthError> {
        let Some(user) = self.find(&UserFilter::email(email)).await? else {
            return Ok(None);
        };
        let session_id = generate_session_id();
        let created_at = self.policy.stamp(self.clock.now());
        self.store
            .update(&user.id, UserUpdate::start_session(session_id.clone(), created_at))
            .await?;

        counter!(keys::SESSION_CREATED).increment(1);
        info!(user_id = %user.id, "session created");
        Ok(Some(session_id))
    }

    async fn get_user_from_session_id(
        &self,
        session_id: Option<&str>,
    ) -> Result<Option<User>, AuthError> {
        let Some(session_id) = session_id.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let Some(user) = self.find(&UserFilter::session_id(session_id)).await? else {
            debug!("unknown session id");
            return Ok(None);
        };
        if !self.policy.is_live(user.session_created_at, self.clock.now()) {
            counter!(keys::SESSION_EXPIRED).increment(1);
            debug!(user_id = %user.id, "session expired");
            return Ok(None);
        }
        Ok(Some(user))
    }

    async fn destroy_session(&self, user_id: &str) -> Result<(), AuthError> {
        match self.store.update(user_id, UserUpdate::end_session()).await {
            Ok(()) => {
                counter!(keys::SESSION_DESTROYED).increment(1);
                info!(user_id, "session destroyed");
                Ok(())
            },
            Err(StoreError::NotFound) => {
                debug!(user_id, "destroy_session for unknown user");
                Ok(())
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn get_reset_password_token(&self, email: &str) -> Result<String, AuthError> {
        let user = self
            .find(&UserFilter::email(email))
            .await?
            .ok_or(AuthError::NotFound)?;
        let token = generate_reset_token();
        self.store
            .update(&user.id, UserUpdate::reset_token(token.clone()))
            .await?;

        counter!(keys::RESET_TOKEN_ISSUED).increment(1);
        info!(
            target: AUDIT,
            "event=reset_token;user_id={};email={};",
            user.id,
            audit_value(email)
        );
        Ok(token)
    }

    async fn update_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if reset_token.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        let hashed = self.hash(new_password).await?;
        let user = match self
            .store
            .find_and_update(
                &UserFilter::reset_token(reset_token),
                UserUpdate::new_password(hashed),
            )
            .await
        {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(AuthError::InvalidToken),
            Err(e) => return Err(e.into()),
        };

        counter!(keys::PASSWORD_UPDATED).increment(1);
        info!(user_id = %user.id, "password updated");
        Ok(())
    }

    async fn user_from_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let user = self.find(&UserFilter::email(email)).await?;
        if self.check_password(user.as_ref(), password).await {
            Ok(user)
        } else {
            Ok(None)
        }
    }
}
