use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::storage::errors::StorageError;

use super::types::{InMemoryStore, StateStore};

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        tracing::info!("Creating new in-memory state store");
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Storage("State store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.locked()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.locked()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.locked()?.remove(key);
        Ok(())
    }
}
