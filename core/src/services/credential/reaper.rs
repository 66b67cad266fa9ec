//! Background eviction of expired credential cache entries
//!
//! Validation re-checks expiry on its own, so the reaper only bounds memory
//! held by abandoned entries.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use carnet_shared::CredentialConfig;

use crate::errors::DomainError;
use crate::repositories::TokenCache;

/// Result of a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of expired entries evicted
    pub removed: usize,
    /// Instant used as "now" for the sweep
    pub swept_at: DateTime<Utc>,
}

/// Periodic sweeper for a token cache
pub struct CredentialReaper<C: TokenCache + 'static> {
    cache: Arc<C>,
    interval: Duration,
}

impl<C: TokenCache> CredentialReaper<C> {
    pub fn new(cache: Arc<C>, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// Create a reaper using the configured sweep interval
    pub fn from_config(cache: Arc<C>, config: &CredentialConfig) -> Self {
        Self::new(cache, config.sweep_interval())
    }

    /// Run a single sweep
    ///
    /// # Returns
    /// * `Ok(SweepResult)` - Number of entries removed and the sweep instant
    /// * `Err(DomainError)` - The cache could not be swept
    pub async fn run_sweep(&self) -> Result<SweepResult, DomainError> {
        let swept_at = Utc::now();
        let removed = self.cache.sweep_expired(swept_at).await?;

        if removed > 0 {
            info!("Evicted {} expired credentials", removed);
        } else {
            debug!("Credential sweep found nothing to evict");
        }

        Ok(SweepResult { removed, swept_at })
    }

    /// Start the reaper as a background task
    ///
    /// The first sweep runs immediately, then once per interval until the
    /// returned handle is aborted or the runtime shuts down.
    pub fn start_background_task(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Credential reaper started - will sweep every {} seconds",
                self.interval.as_secs()
            );

            let mut interval_timer = tokio::time::interval(self.interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_sweep().await {
                    error!("Credential sweep failed: {}", e);
                }
            }
        })
    }
}
