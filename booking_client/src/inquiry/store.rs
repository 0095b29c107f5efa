use std::sync::Arc;

use crate::storage::{JsonFileStore, StateStore, StorageError};

/// Key of the token list in the durable JSON store.
const ANONYMOUS_TOKENS_KEY: &str = "anonymousInquiryTokens";

/// The ordered set of anonymous inquiry tokens awaiting association with an
/// authenticated account. Lives only in the durable JSON store; the cookie
/// jar is reserved for the credential record.
#[derive(Clone)]
pub struct InquiryTokenStore {
    store: Arc<dyn StateStore>,
}

impl InquiryTokenStore {
    pub(crate) fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Token store over the JSON state file at its configured path.
    pub fn from_env() -> Self {
        Self::new(Arc::new(JsonFileStore::from_env()))
    }

    /// All pending tokens, oldest first. A corrupted list is treated as
    /// empty: the tokens are unrecoverable and must not poison every read.
    pub(crate) async fn all(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.store.get(ANONYMOUS_TOKENS_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(tokens) => Ok(tokens),
            Err(e) => {
                tracing::warn!("Anonymous inquiry token list unreadable, treating as empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    pub(crate) async fn append(&self, token: &str) -> Result<(), StorageError> {
        let mut tokens = self.all().await?;
        tokens.push(token.to_string());
        let raw = serde_json::to_string(&tokens)?;
        self.store.put(ANONYMOUS_TOKENS_KEY, &raw).await
    }

    pub(crate) async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(ANONYMOUS_TOKENS_KEY).await
    }
}
