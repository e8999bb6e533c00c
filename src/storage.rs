//! Backends for the host's opaque settings blob.
//!
//! The store only ever sees a `serde_json::Value`; where and how it is kept is
//! up to the backend.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::StorageError;

/// Load/save primitive supplied by the host application.
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Returns `None` when nothing has been persisted yet.
    async fn load(&self) -> Result<Option<Value>, StorageError>;

    async fn save(&self, data: &Value) -> Result<(), StorageError>;
}

/// Keeps the blob as a pretty-printed JSON file.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<Value>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn save(&self, data: &Value) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

/// In-process storage, for embedding hosts without a filesystem and for tests.
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<Option<Value>>,
    saves: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Value) -> Self {
        Self { data: Mutex::new(Some(data)), saves: Mutex::new(0) }
    }

    pub fn snapshot(&self) -> Option<Value> {
        self.data.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

#[async_trait]
impl SettingsStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<Value>, StorageError> {
        Ok(self.data.lock().clone())
    }

    async fn save(&self, data: &Value) -> Result<(), StorageError> {
        *self.data.lock() = Some(data.clone());
        *self.saves.lock() += 1;
        Ok(())
    }
}
