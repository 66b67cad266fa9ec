//! Process-local implementation of TokenCache

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::credential::CacheEntry;
use crate::errors::DomainError;

use super::r#trait::TokenCache;

/// In-memory token cache backed by a map guarded by an async RwLock
///
/// Entries are replaced whole, so readers never see a partially written entry.
/// Locks are held only for the map operation itself.
#[derive(Clone, Default)]
pub struct InMemoryTokenCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryTokenCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, subject: &str) -> Result<Option<CacheEntry>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.get(subject).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.insert(entry.subject.clone(), entry);
        Ok(())
    }

    async fn compare_and_put(
        &self,
        expected_token: Option<&str>,
        entry: CacheEntry,
    ) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().await;

        let current = entries.get(&entry.subject).map(|e| e.token.as_str());
        if current != expected_token {
            debug!(subject = %entry.subject, "compare_and_put lost race");
            return Ok(false);
        }

        entries.insert(entry.subject.clone(), entry);
        Ok(true)
    }

    async fn remove(&self, subject: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(subject).is_some())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok(before - entries.len())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.entries.read().await.len())
    }
}
