use std::sync::Arc;

use crate::session::Role;
use crate::storage::{CookieJarStore, JsonFileStore, StateStore, StorageError};

use super::types::{CredentialRecord, KEY_ROLE, KEY_TOKEN, KEY_USER};

/// Persistence for the credential record, fanned out over two redundant
/// physical stores. Writes and clears always hit both; reads prefer the
/// cookie jar and fall back to the JSON file. Callers never see the
/// duplication.
pub struct CredentialStore {
    primary: Arc<dyn StateStore>,
    secondary: Arc<dyn StateStore>,
}

impl CredentialStore {
    pub(crate) fn new(primary: Arc<dyn StateStore>, secondary: Arc<dyn StateStore>) -> Self {
        Self { primary, secondary }
    }

    /// Cookie jar plus JSON state file at their configured paths.
    pub fn from_env() -> Self {
        Self::new(
            Arc::new(CookieJarStore::from_env()),
            Arc::new(JsonFileStore::from_env()),
        )
    }

    /// Read the stored record, preferring the primary store.
    ///
    /// A record with an unreadable user snapshot is an error, not `None`:
    /// the session initializer must wipe it rather than resurrect half a
    /// session from it.
    pub(crate) async fn load(&self) -> Result<Option<CredentialRecord>, StorageError> {
        match Self::load_from(self.primary.as_ref()).await? {
            Some(record) => Ok(Some(record)),
            None => {
                tracing::debug!("No credentials in primary store, trying fallback");
                Self::load_from(self.secondary.as_ref()).await
            }
        }
    }

    async fn load_from(store: &dyn StateStore) -> Result<Option<CredentialRecord>, StorageError> {
        let Some(token) = store.get(KEY_TOKEN).await? else {
            return Ok(None);
        };

        let user = match store.get(KEY_USER).await? {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        };

        let role = store
            .get(KEY_ROLE).await?
            .map(|raw| raw.parse::<Role>())
            .transpose()
            .map_err(|e| StorageError::Serde(e.to_string()))?;

        Ok(Some(CredentialRecord { token, user, role }))
    }

    /// Write the record through to both stores.
    pub(crate) async fn save(&self, record: &CredentialRecord) -> Result<(), StorageError> {
        Self::save_to(self.primary.as_ref(), record).await?;
        Self::save_to(self.secondary.as_ref(), record).await?;
        Ok(())
    }

    async fn save_to(store: &dyn StateStore, record: &CredentialRecord) -> Result<(), StorageError> {
        store.put(KEY_TOKEN, &record.token).await?;

        match &record.user {
            Some(user) => {
                let raw = serde_json::to_string(user)?;
                store.put(KEY_USER, &raw).await?;
            }
            None => store.remove(KEY_USER).await?,
        }

        match record.effective_role() {
            Some(role) => store.put(KEY_ROLE, role.as_str()).await?,
            None => store.remove(KEY_ROLE).await?,
        }

        Ok(())
    }

    /// Erase the record from both stores. Both are attempted even when the
    /// first fails.
    pub(crate) async fn clear(&self) -> Result<(), StorageError> {
        let primary = Self::clear_from(self.primary.as_ref()).await;
        let secondary = Self::clear_from(self.secondary.as_ref()).await;
        primary.and(secondary)
    }

    async fn clear_from(store: &dyn StateStore) -> Result<(), StorageError> {
        store.remove(KEY_TOKEN).await?;
        store.remove(KEY_USER).await?;
        store.remove(KEY_ROLE).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use crate::storage::InMemoryStore;
    use crate::test_utils::sample_profile;

    fn memory_store() -> (CredentialStore, Arc<InMemoryStore>, Arc<InMemoryStore>) {
        let primary = Arc::new(InMemoryStore::new());
        let secondary = Arc::new(InMemoryStore::new());
        (
            CredentialStore::new(primary.clone(), secondary.clone()),
            primary,
            secondary,
        )
    }

    fn sample_record(role: Role) -> CredentialRecord {
        CredentialRecord {
            token: "tok-1".to_string(),
            user: Some(sample_profile(role)),
            role: Some(role),
        }
    }

    #[tokio::test]
    async fn test_save_writes_through_to_both_stores() {
        let (store, primary, secondary) = memory_store();

        store.save(&sample_record(Role::User)).await.unwrap();

        for backend in [primary, secondary] {
            assert_eq!(
                backend.get(KEY_TOKEN).await.unwrap().as_deref(),
                Some("tok-1")
            );
            assert!(backend.get(KEY_USER).await.unwrap().is_some());
            assert_eq!(backend.get(KEY_ROLE).await.unwrap().as_deref(), Some("user"));
        }
    }

    #[tokio::test]
    async fn test_load_prefers_primary() {
        let (store, primary, secondary) = memory_store();
        primary.put(KEY_TOKEN, "primary-token").await.unwrap();
        secondary.put(KEY_TOKEN, "secondary-token").await.unwrap();

        let record = store.load().await.unwrap().unwrap();
        assert_eq!(record.token, "primary-token");
    }

    #[tokio::test]
    async fn test_load_falls_back_to_secondary() {
        let (store, _primary, secondary) = memory_store();
        secondary.put(KEY_TOKEN, "secondary-token").await.unwrap();
        secondary.put(KEY_ROLE, "admin").await.unwrap();

        let record = store.load().await.unwrap().unwrap();
        assert_eq!(record.token, "secondary-token");
        assert_eq!(record.role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_load_absent_everywhere() {
        let (store, _primary, _secondary) = memory_store();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_surfaces_corrupt_user_snapshot() {
        let (store, primary, _secondary) = memory_store();
        primary.put(KEY_TOKEN, "tok-1").await.unwrap();
        primary.put(KEY_USER, "{broken json").await.unwrap();

        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_load_surfaces_unknown_role() {
        let (store, primary, _secondary) = memory_store();
        primary.put(KEY_TOKEN, "tok-1").await.unwrap();
        primary.put(KEY_ROLE, "superuser").await.unwrap();

        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_clear_erases_both_stores() {
        let (store, primary, secondary) = memory_store();
        store.save(&sample_record(Role::Admin)).await.unwrap();

        store.clear().await.unwrap();

        for backend in [primary, secondary] {
            assert!(backend.get(KEY_TOKEN).await.unwrap().is_none());
            assert!(backend.get(KEY_USER).await.unwrap().is_none());
            assert!(backend.get(KEY_ROLE).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_token_only_record_removes_stale_user_keys() {
        let (store, primary, _secondary) = memory_store();
        store.save(&sample_record(Role::User)).await.unwrap();

        // A token-only record (post-login, profile not yet fetched) must not
        // leave the previous account's snapshot behind.
        let partial = CredentialRecord {
            token: "tok-2".to_string(),
            user: None,
            role: None,
        };
        store.save(&partial).await.unwrap();

        assert_eq!(primary.get(KEY_TOKEN).await.unwrap().as_deref(), Some("tok-2"));
        assert!(primary.get(KEY_USER).await.unwrap().is_none());
        assert!(primary.get(KEY_ROLE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_record() {
        let (store, _primary, _secondary) = memory_store();
        let record = sample_record(Role::Admin);

        store.save(&record).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, record);
    }
}
