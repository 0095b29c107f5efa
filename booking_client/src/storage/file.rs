use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::storage::config::AUTH_STATE_FILE;
use crate::storage::errors::StorageError;

use super::types::{JsonFileStore, StateMap, StateStore};

impl JsonFileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::info!("Creating JSON file state store at {}", path.display());
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub(crate) fn from_env() -> Self {
        Self::new(AUTH_STATE_FILE.as_str())
    }

    async fn read_map(&self) -> Result<StateMap, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(StateMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(StorageError::from),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StateMap::new()),
            Err(e) => Err(StorageError::Storage(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    // A corrupted file must not make writes impossible; it is replaced.
    async fn read_map_for_write(&self) -> StateMap {
        match self.read_map().await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    "State file {} unreadable, rewriting: {}",
                    self.path.display(),
                    e
                );
                StateMap::new()
            }
        }
    }

    async fn write_map(&self, map: &StateMap) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, raw).await.map_err(|e| {
            StorageError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn init(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let map = self.read_map().await?;
        tracing::debug!(
            "JSON state store {} holds {} keys",
            self.path.display(),
            map.len()
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map_for_write().await;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map_for_write().await;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}
