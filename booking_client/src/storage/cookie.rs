use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::storage::config::{AUTH_COOKIE_FILE, AUTH_COOKIE_MAX_AGE};
use crate::storage::errors::StorageError;
use crate::utils::{format_cookie_line, parse_cookie_line};

use super::types::{CookieJarStore, StateStore};

struct CookieEntry {
    name: String,
    value: String,
    expires_at: DateTime<Utc>,
}

impl CookieJarStore {
    pub(crate) fn new(path: impl Into<PathBuf>, max_age: u64) -> Self {
        let path = path.into();
        tracing::info!("Creating cookie-jar state store at {}", path.display());
        Self {
            path,
            max_age,
            lock: Mutex::new(()),
        }
    }

    pub(crate) fn from_env() -> Self {
        Self::new(AUTH_COOKIE_FILE.as_str(), *AUTH_COOKIE_MAX_AGE)
    }

    // Unparseable lines are skipped, not fatal; a damaged jar degrades to
    // "cookie absent" and the fallback store takes over.
    async fn read_jar(&self) -> Result<Vec<CookieEntry>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::Storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let mut entries = Vec::new();
        for line in raw.lines().filter(|l| !l.trim().is_empty()) {
            match parse_cookie_line(line) {
                Ok((name, value, expires_at)) => entries.push(CookieEntry {
                    name,
                    value,
                    expires_at,
                }),
                Err(e) => tracing::debug!("Skipping malformed cookie line: {}", e),
            }
        }
        Ok(entries)
    }

    async fn write_jar(&self, entries: &[CookieEntry]) -> Result<(), StorageError> {
        let mut raw = String::new();
        for entry in entries {
            raw.push_str(&format_cookie_line(
                &entry.name,
                &entry.value,
                entry.expires_at,
                self.max_age as i64,
            ));
            raw.push('\n');
        }
        tokio::fs::write(&self.path, raw).await.map_err(|e| {
            StorageError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl StateStore for CookieJarStore {
    async fn init(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let entries = self.read_jar().await?;
        tracing::debug!(
            "Cookie jar {} holds {} entries",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        let now = Utc::now();
        let entries = self.read_jar().await?;
        for entry in entries {
            if entry.name == key {
                if entry.expires_at <= now {
                    tracing::debug!("Cookie '{}' expired at {}", key, entry.expires_at);
                    return Ok(None);
                }
                return Ok(Some(entry.value));
            }
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = match self.read_jar().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Cookie jar {} unreadable, rewriting: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        };

        let expires_at = Utc::now() + Duration::seconds(self.max_age as i64);
        entries.retain(|entry| entry.name != key);
        entries.push(CookieEntry {
            name: key.to_string(),
            value: value.to_string(),
            expires_at,
        });
        self.write_jar(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = match self.read_jar().await {
            Ok(entries) => entries,
            Err(_) => Vec::new(),
        };
        let before = entries.len();
        entries.retain(|entry| entry.name != key);
        if entries.len() != before {
            self.write_jar(&entries).await?;
        }
        Ok(())
    }
}
