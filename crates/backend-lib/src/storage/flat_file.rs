//! Flat-file credential store: the whole user table as one JSON document.
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs as tokio_fs, io::AsyncWriteExt, sync::Mutex};
use tracing::debug;

use super::{CredentialStore, StoreError, User, UserFilter, UserTable, UserUpdate};

const USERS_FILE: &str = "users.json";
/// The file holds password hashes and live tokens
#[cfg(unix)]
const OWNER_ONLY: u32 = 0o600;

/// Store backed by `<root>/users.json`.
///
/// Mutations are applied to a copy of the table, written to a temporary file
/// and renamed into place, and only then become visible; a failed write
/// leaves both the file and the in-memory table unchanged.
pub struct FlatFileStore {
    path: PathBuf,
    table: Mutex<UserTable>,
}

impl FlatFileStore {
    /// Open (or create) the store under `root`.
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref();
        tokio_fs::create_dir_all(root).await?;
        let path = root.join(USERS_FILE);

        let table = match tokio_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => UserTable::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), users = table.users.len(), "opened flat-file store");

        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    /// Path of the backing JSON document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the table beside the live file, owner-only, then swap it in.
    async fn persist(&self, table: &UserTable) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");

        let mut options = tokio_fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(OWNER_ONLY);
        let mut file = options.open(&tmp).await?;
        // a stale temp file keeps its old mode through `create`
        #[cfg(unix)]
        file.set_permissions(std::fs::Permissions::from_mode(OWNER_ONLY))
            .await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut UserTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        let out = op(&mut next)?;
        self.persist(&next).await?;
        *table = next;
        Ok(out)
    }
}

#[async_trait]
impl CredentialStore for FlatFileStore {
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        self.mutate(|table| table.insert(email, hashed_password))
            .await
    }

    async fn find_one_by(&self, filter: &UserFilter) -> Result<User, StoreError> {
        self.table.lock().await.find_one_by(filter)
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<(), StoreError> {
        self.mutate(|table| table.update(user_id, update)).await
    }

    async fn find_and_update(
        &self,
        filter: &UserFilter,
        update: UserUpdate,
    ) -> Result<User, StoreError> {
        self.mutate(|table| table.find_and_update(filter, update))
            .await
    }
}
