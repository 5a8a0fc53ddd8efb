use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{KeyValueTier, StorageError};

type Entries = BTreeMap<String, String>;

// Durable key/value tier persisted as a single JSON object on disk.
pub struct FileTier {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process only.
    write_lock: Mutex<()>,
}

impl FileTier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| StorageError::Corrupt(err.to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(io_error(err)),
        }
    }

    async fn load_for_write(&self) -> Result<Entries, StorageError> {
        match self.load().await {
            Err(StorageError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), %reason, "discarding corrupt backup store");
                Ok(Entries::new())
            }
            other => other,
        }
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let bytes =
            serde_json::to_vec_pretty(entries).map_err(|err| StorageError::Io(err.to_string()))?;

        // Write then rename so a crash never leaves a half-written file.
        let staging = self.path.with_extension("tmp");
        tokio::fs::write(&staging, bytes).await.map_err(io_error)?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(io_error)
    }
}

fn io_error(err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::StorageFull | ErrorKind::QuotaExceeded => StorageError::QuotaExceeded,
        _ => StorageError::Io(err.to_string()),
    }
}

#[async_trait]
impl KeyValueTier for FileTier {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write().await?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries).await
    }
}
