use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

/// One physical key-value store holding persisted client state.
///
/// Two implementations back the credential record (cookie jar and JSON file);
/// the in-memory variant exists for tests.
#[async_trait]
pub(crate) trait StateStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Get a value from the store.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Put a value into the store.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value from the store.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub(crate) struct InMemoryStore {
    pub(super) entries: StdMutex<HashMap<String, String>>,
}

pub(crate) struct JsonFileStore {
    pub(super) path: PathBuf,
    pub(super) lock: Mutex<()>,
}

pub(crate) struct CookieJarStore {
    pub(super) path: PathBuf,
    pub(super) max_age: u64,
    pub(super) lock: Mutex<()>,
}

// Serialization shape of the JSON file store: a flat string map. BTreeMap
// keeps the on-disk order stable across rewrites.
pub(super) type StateMap = BTreeMap<String, String>;
