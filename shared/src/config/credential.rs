//! Credential (QR token) configuration

use serde::{Deserialize, Serialize};

use super::{parse_env_or, ConfigError};

/// Default token validity window (1 hour)
pub const DEFAULT_VALIDITY_SECONDS: u64 = 3600;

/// Upper bound on the validity window (one year)
pub const MAX_VALIDITY_SECONDS: u64 = 365 * 24 * 3600;

/// Default interval between reaper sweeps (10 minutes)
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 600;

/// Marker prefixed to every token before QR rendering
pub const DEFAULT_NAMESPACE_MARKER: &str = "UFPSCARNET:";

/// Issuer claim embedded in every credential
pub const DEFAULT_ISSUER: &str = "ufps-carnet";

/// Default bound on the external enrollment lookup
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5000;

/// Where issued credentials are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map, single node only
    Memory,
    /// Shared Redis store with native per-key expiry
    Redis,
}

impl Default for CacheBackend {
    fn default() -> Self {
        CacheBackend::Memory
    }
}

impl std::str::FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "local" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            _ => Err(format!("Invalid cache backend: {}", s)),
        }
    }
}

/// Configuration consumed by the credential services
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialConfig {
    /// HMAC secret used to sign credentials
    #[serde(skip_serializing)]
    pub signing_secret: String,

    /// Token validity in seconds
    #[serde(default = "default_validity_seconds")]
    pub validity_seconds: u64,

    /// Reaper sweep interval in seconds
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,

    /// Prefix placed in front of the token inside the QR payload
    #[serde(default = "default_namespace_marker")]
    pub namespace_marker: String,

    /// Issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Timeout for the enrollment lookup in milliseconds
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,

    /// Token cache backend
    #[serde(default)]
    pub cache_backend: CacheBackend,
}

impl CredentialConfig {
    /// Create a configuration with defaults around the given secret
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            validity_seconds: DEFAULT_VALIDITY_SECONDS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            namespace_marker: default_namespace_marker(),
            issuer: default_issuer(),
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            cache_backend: CacheBackend::default(),
        }
    }

    /// Create from environment variables
    ///
    /// `QR_JWT_SECRET` is mandatory; every other setting falls back to its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_secret = std::env::var("QR_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar {
                name: "QR_JWT_SECRET".to_string(),
            })?;

        let validity_seconds = parse_env_or("QR_TOKEN_VALIDITY_SECONDS", DEFAULT_VALIDITY_SECONDS)?;
        let sweep_interval_seconds =
            parse_env_or("QR_SWEEP_INTERVAL_SECONDS", DEFAULT_SWEEP_INTERVAL_SECONDS)?;
        let lookup_timeout_ms = parse_env_or("QR_LOOKUP_TIMEOUT_MS", DEFAULT_LOOKUP_TIMEOUT_MS)?;
        let cache_backend = parse_env_or("QR_CACHE_BACKEND", CacheBackend::Memory)?;
        let namespace_marker = std::env::var("QR_NAMESPACE_MARKER")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_namespace_marker);

        let config = Self {
            signing_secret,
            validity_seconds,
            sweep_interval_seconds,
            namespace_marker,
            issuer: default_issuer(),
            lookup_timeout_ms,
            cache_backend,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the services cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing_secret.trim().is_empty() {
            return Err(ConfigError::MissingVar {
                name: "QR_JWT_SECRET".to_string(),
            });
        }
        if self.validity_seconds == 0 || self.validity_seconds > MAX_VALIDITY_SECONDS {
            return Err(ConfigError::InvalidValue {
                name: "QR_TOKEN_VALIDITY_SECONDS".to_string(),
                value: self.validity_seconds.to_string(),
            });
        }
        if self.sweep_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                name: "QR_SWEEP_INTERVAL_SECONDS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Set the validity window in seconds
    pub fn with_validity_seconds(mut self, seconds: u64) -> Self {
        self.validity_seconds = seconds;
        self
    }

    /// Set the sweep interval in seconds
    pub fn with_sweep_interval_seconds(mut self, seconds: u64) -> Self {
        self.sweep_interval_seconds = seconds;
        self
    }

    /// Set the lookup timeout in milliseconds
    pub fn with_lookup_timeout_ms(mut self, millis: u64) -> Self {
        self.lookup_timeout_ms = millis;
        self
    }

    pub fn validity(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.validity_seconds)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_seconds)
    }

    pub fn lookup_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.lookup_timeout_ms)
    }
}

fn default_validity_seconds() -> u64 {
    DEFAULT_VALIDITY_SECONDS
}

fn default_sweep_interval_seconds() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECONDS
}

fn default_namespace_marker() -> String {
    String::from(DEFAULT_NAMESPACE_MARKER)
}

fn default_issuer() -> String {
    String::from(DEFAULT_ISSUER)
}

fn default_lookup_timeout_ms() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_MS
}
