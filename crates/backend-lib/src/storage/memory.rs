//! In-memory credential store.
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use super::{CredentialStore, StoreError, User, UserFilter, UserTable, UserUpdate};

/// Process-local store; every operation is one critical section on the table.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users
    pub fn len(&self) -> usize {
        self.table.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        self.table.write().insert(email, hashed_password)
    }

    async fn find_one_by(&self, filter: &UserFilter) -> Result<User, StoreError> {
        self.table.read().find_one_by(filter)
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<(), StoreError> {
        self.table.write().update(user_id, update)
    }

    async fn find_and_update(
        &self,
        filter: &UserFilter,
        update: UserUpdate,
    ) -> Result<User, StoreError> {
        self.table.write().find_and_update(filter, update)
    }
}
