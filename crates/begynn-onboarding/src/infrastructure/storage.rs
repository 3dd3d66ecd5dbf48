//! TOML-file persistence for the installation identifier.
//!
//! [`FileStore`] keeps every key in one flat TOML table:
//!
//! ```toml
//! "@begynn/uid" = "3f2b8c1e-9d4a-4e7b-a1c2-5f6e7d8c9b0a"
//! ```
//!
//! The default location is the platform config directory:
//! - Windows:  `%APPDATA%\Begynn\store.toml`
//! - Linux:    `~/.config/begynn/store.toml`
//! - macOS:    `~/Library/Application Support/Begynn/store.toml`
//!
//! A missing file reads as an empty store; the file and its directory are
//! created on the first write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::identifier::{KeyValueStore, StoreError};

/// File name of the store inside the platform config directory.
pub const STORE_FILE_NAME: &str = "store.toml";

type Table = BTreeMap<String, String>;

/// A [`KeyValueStore`] backed by a TOML file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the store at [`default_store_path`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoPlatformDir`] when the platform config base
    /// directory cannot be determined.
    pub fn at_default_path() -> Result<Self, StoreError> {
        Ok(Self::new(default_store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Table, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| StoreError::Corrupted(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Table::new()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    async fn save(&self, table: &Table) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StoreError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }
        let content =
            toml::to_string_pretty(table).map_err(|e| StoreError::Corrupted(e.to_string()))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut table = self.load().await?;
        Ok(table.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        table.insert(key.to_string(), value.to_string());
        self.save(&table).await?;
        debug!("stored {key} in {}", self.path.display());
        Ok(())
    }
}

/// Returns the default store file path.
///
/// # Errors
///
/// Returns [`StoreError::NoPlatformDir`] if the base directory cannot be
/// determined.
pub fn default_store_path() -> Result<PathBuf, StoreError> {
    platform_config_dir()
        .map(|dir| dir.join(STORE_FILE_NAME))
        .ok_or(StoreError::NoPlatformDir)
}

/// Resolves the platform config directory including the `Begynn` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Begynn"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("begynn"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Begynn")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::identifier::{IdentifierProvider, UID_STORAGE_KEY};
    use std::sync::Arc;

    /// A store path in a fresh directory under the system temp dir.
    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("begynn-store-{}", begynn_core::generate_uid()))
            .join(STORE_FILE_NAME)
    }

    async fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        // Arrange
        let path = scratch_path();
        let store = FileStore::new(&path);

        // Act
        let value = store.get(UID_STORAGE_KEY).await.unwrap();

        // Assert
        assert_eq!(value, None);
        assert!(!path.exists(), "reading must not create the file");
    }

    #[tokio::test]
    async fn test_set_creates_directory_and_persists_value() {
        // Arrange
        let path = scratch_path();
        let store = FileStore::new(&path);

        // Act
        store.set(UID_STORAGE_KEY, "abc-123").await.unwrap();
        let reopened = FileStore::new(&path);
        let value = reopened.get(UID_STORAGE_KEY).await.unwrap();

        // Assert
        assert_eq!(value.as_deref(), Some("abc-123"));
        let on_disk = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(on_disk.contains("\"@begynn/uid\" = \"abc-123\""), "{on_disk}");
        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_set_keeps_other_keys() {
        let path = scratch_path();
        let store = FileStore::new(&path);

        store.set("other", "1").await.unwrap();
        store.set(UID_STORAGE_KEY, "abc").await.unwrap();

        assert_eq!(store.get("other").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get(UID_STORAGE_KEY).await.unwrap().as_deref(), Some("abc"));
        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_corrupted_file_is_reported() {
        // Arrange
        let path = scratch_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "this is = = not toml").await.unwrap();
        let store = FileStore::new(&path);

        // Act
        let result = store.get(UID_STORAGE_KEY).await;

        // Assert
        assert!(matches!(result, Err(StoreError::Corrupted(_))));
        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_identifier_survives_a_new_provider() {
        // Arrange: two providers over the same file simulate two app launches
        let path = scratch_path();
        let first = IdentifierProvider::new(Arc::new(FileStore::new(&path)));
        let second = IdentifierProvider::new(Arc::new(FileStore::new(&path)));

        // Act
        let uid = first.resolve().await;
        let again = second.resolve().await;

        // Assert
        assert_eq!(uid, again);
        cleanup(&path).await;
    }

    #[test]
    fn test_default_store_path_ends_with_store_file() {
        // The platform dir depends on the environment; only check the shape.
        if let Ok(path) = default_store_path() {
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(STORE_FILE_NAME));
        }
    }
}
