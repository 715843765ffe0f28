//! Credential storage.
//!
//! The client never touches persisted tokens directly; it goes through a
//! [`CredentialStore`]. Two implementations ship with the crate:
//!
//! - [`MemoryCredentialStore`]: process-local, for tests and throwaway sessions.
//! - [`FileCredentialStore`]: a JSON file that survives restarts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Errors that can occur during credential store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be read or written.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Which of the two credentials to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    /// Short-lived bearer credential.
    Access,
    /// Long-lived credential exchanged for a new access token.
    Refresh,
}

impl TokenKey {
    /// Key name used in persisted storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::Access => "accessToken",
            TokenKey::Refresh => "refreshToken",
        }
    }
}

impl std::fmt::Display for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokens written to the store in a single operation.
///
/// A `None` refresh token keeps whatever refresh token is already stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// New access token.
    pub access: String,
    /// New refresh token, if the server rotated it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl TokenPair {
    /// Create a pair with both tokens.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: Some(refresh.into()),
        }
    }

    /// Create a pair that only replaces the access token.
    pub fn access_only(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: None,
        }
    }
}

// Tokens are credentials; keep them out of logs.
impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Storage for the access/refresh token pair.
///
/// `set` must apply both tokens atomically from a reader's point of view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read one token.
    async fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError>;

    /// Overwrite the stored tokens.
    async fn set(&self, pair: TokenPair) -> Result<(), StoreError>;

    /// Remove both tokens.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// On-disk and in-memory layout of the two token slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Slots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl Slots {
    fn get(&self, key: TokenKey) -> Option<String> {
        match key {
            TokenKey::Access => self.access_token.clone(),
            TokenKey::Refresh => self.refresh_token.clone(),
        }
    }

    fn apply(&mut self, pair: TokenPair) {
        self.access_token = Some(pair.access);
        if let Some(refresh) = pair.refresh {
            self.refresh_token = Some(refresh);
        }
    }
}

/// In-memory credential store.
///
/// Suitable for tests and for sessions that should not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slots: RwLock<Slots>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `pair`.
    pub fn with_tokens(pair: TokenPair) -> Self {
        let mut slots = Slots::default();
        slots.apply(pair);
        Self {
            slots: RwLock::new(slots),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError> {
        Ok(self.slots.read().await.get(key))
    }

    async fn set(&self, pair: TokenPair) -> Result<(), StoreError> {
        self.slots.write().await.apply(pair);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slots.write().await = Slots::default();
        Ok(())
    }
}

/// Credential store backed by a JSON file.
///
/// The file holds `{"accessToken": ..., "refreshToken": ...}`. Writes go to a
/// sibling temp file that is then renamed over the original.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Create a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Slots, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Slots::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Slots::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, slots: &Slots) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(slots)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError> {
        Ok(self.load().await?.get(key))
    }

    async fn set(&self, pair: TokenPair) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut slots = self.load().await?;
        slots.apply(pair);
        self.persist(&slots).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
