//! Token cache trait defining the store of currently valid credentials.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::credential::CacheEntry;
use crate::errors::DomainError;

/// Store holding at most one active credential per subject
///
/// The cache is the only owner of issued-token state; every mutation goes
/// through these operations. Implementations must be safe under concurrent
/// issuance, validation and sweeping, and a reader must observe either the
/// previous entry or the new one in full, never a mix of fields.
///
/// A process-local map is enough for a single node. Multi-node deployments
/// plug in a shared store with native per-key expiry.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Get the entry cached for a subject
    ///
    /// # Returns
    /// * `Ok(Some(CacheEntry))` - An entry exists (it may already be past its expiry)
    /// * `Ok(None)` - Nothing cached for this subject
    /// * `Err(DomainError)` - The backing store failed
    async fn get(&self, subject: &str) -> Result<Option<CacheEntry>, DomainError>;

    /// Store an entry, unconditionally replacing any existing one for the same subject
    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError>;

    /// Store an entry only if the subject's current token still equals `expected_token`
    ///
    /// `None` means "only if nothing is cached". The check and the write are atomic.
    ///
    /// # Returns
    /// * `Ok(true)` - The entry was written
    /// * `Ok(false)` - Another writer got there first; nothing was changed
    async fn compare_and_put(
        &self,
        expected_token: Option<&str>,
        entry: CacheEntry,
    ) -> Result<bool, DomainError>;

    /// Remove the entry for a subject
    ///
    /// # Returns
    /// * `Ok(true)` - An entry was removed
    /// * `Ok(false)` - Nothing was cached
    async fn remove(&self, subject: &str) -> Result<bool, DomainError>;

    /// Evict every entry whose expiry is at or before `now`
    ///
    /// # Returns
    /// The number of entries removed
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Number of entries currently held, expired or not
    async fn len(&self) -> Result<usize, DomainError>;
}
