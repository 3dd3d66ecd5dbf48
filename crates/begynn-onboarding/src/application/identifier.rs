//! Installation identifier resolution.
//!
//! Every installation of the host app is named by one UUID-shaped string.
//! The first [`IdentifierProvider::resolve`] generates it and writes it to a
//! [`KeyValueStore`]; every later call reads it back.
//!
//! Storage is best effort.  A store that cannot be read looks the same as an
//! empty one, and a failed write is logged and forgotten, so `resolve` always
//! produces an identifier even when persistence is completely broken.  The
//! price is that such an installation gets a fresh identifier on every run.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use begynn_core::generate_uid;

/// Key under which the identifier is persisted.
pub const UID_STORAGE_KEY: &str = "@begynn/uid";

/// Error type for key-value store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused or could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A file system I/O error occurred.
    #[error("I/O error accessing store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted data could not be parsed or written back.
    #[error("store data corrupted: {0}")]
    Corrupted(String),

    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformDir,
}

/// String key → string value persistence, supplied by the host.
///
/// Infrastructure implementations write a TOML file or keep values in memory;
/// tests use mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// A [`KeyValueStore`] that lives as long as the process.
///
/// The component falls back to it when the host supplies no store, so an
/// identifier is stable for one run only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Resolves the installation identifier through a [`KeyValueStore`].
///
/// There is no locking: two concurrent `resolve` calls on an empty store may
/// each generate and store a different identifier.  The last write wins.
#[derive(Clone)]
pub struct IdentifierProvider {
    store: Arc<dyn KeyValueStore>,
}

impl IdentifierProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the persisted identifier, generating and storing one first if
    /// the store has none.  Never fails.
    pub async fn resolve(&self) -> String {
        match self.store.get(UID_STORAGE_KEY).await {
            Ok(Some(uid)) if !uid.is_empty() => {
                debug!("using stored installation identifier");
                return uid;
            }
            Ok(_) => {}
            Err(e) => warn!("failed to read installation identifier: {e}"),
        }

        let uid = generate_uid();
        if let Err(e) = self.store.set(UID_STORAGE_KEY, &uid).await {
            warn!("failed to persist installation identifier: {e}");
        }
        uid
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
