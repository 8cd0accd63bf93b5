// SPDX-License-Identifier: AGPL-3.0
// Art Catalog Core - Durable key-value storage
//
// One string value per string key, shared across the whole process.

use crate::types::AppError;
use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Scoped get/set-by-key persistence.
///
/// Implementations must make `set` durable before the returned future
/// resolves, and a failed `set` must leave the previous value in place.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value for `key`, or `None` if nothing was ever stored
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// File-backed storage: one file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the platform data directory
    pub fn in_default_dir() -> Result<Self, AppError> {
        Ok(Self::new(Self::default_dir()?))
    }

    /// Get the platform data directory for durable state
    pub fn default_dir() -> Result<PathBuf, AppError> {
        directories::ProjectDirs::from("com", "artcatalog", "ArtCatalog")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| AppError::FileIo("Could not determine data directory".to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(AppError::InvalidConfig(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::FileIo(format!("Failed to read {:?}: {}", path, e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.key_path(key)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::FileIo(format!("Failed to create data dir: {}", e)))?;

        // Write beside the target and rename so readers never see a partial record
        let tmp_path = self.dir.join(format!(".{}.tmp", key));
        if let Err(e) = write_synced(&tmp_path, value).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AppError::FileIo(format!("Failed to write {:?}: {}", tmp_path, e)));
        }

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AppError::FileIo(format!("Failed to replace {:?}: {}", path, e)));
        }

        tracing::debug!("Stored {} bytes under {:?}", value.len(), path);
        Ok(())
    }
}

/// Write `value` to `path` and flush it to disk before returning
async fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(value.as_bytes()).await?;
    file.sync_all().await
}

/// In-memory storage. Clones share one namespace.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
