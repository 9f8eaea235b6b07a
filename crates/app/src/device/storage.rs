//! Persisted key-value storage.

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tokio::{fs, sync::Mutex};

#[derive(Debug, Error)]
pub enum KeyValueError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A small string map that survives restarts.
#[automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError>;

    async fn remove(&self, key: &str) -> Result<(), KeyValueError>;
}

/// Process-lifetime storage, for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueError> {
        self.entries.lock().await.remove(key);

        Ok(())
    }
}

/// Storage backed by a single JSON object on disk.
///
/// Every write replaces the file through a temporary sibling so a crash never
/// leaves half a map behind.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<BTreeMap<String, String>, KeyValueError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error.into()),
        }
    }

    async fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), KeyValueError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temporary = self.path.with_extension("tmp");

        fs::write(&temporary, serde_json::to_vec_pretty(entries)?).await?;
        fs::rename(&temporary, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        let _guard = self.lock.lock().await;

        Ok(self.read().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueError> {
        let _guard = self.lock.lock().await;

        let mut entries = self.read().await?;
        entries.insert(key.to_string(), value.to_string());

        self.write(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueError> {
        let _guard = self.lock.lock().await;

        let mut entries = self.read().await?;

        if entries.remove(key).is_some() {
            self.write(&entries).await?;
        }

        Ok(())
    }
}
