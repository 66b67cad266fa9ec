//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `credential` - QR credential signing, validity and sweep settings
//! - `cache` - Redis configuration for the shared token cache
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod cache;
pub mod credential;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use cache::CacheConfig;
pub use credential::{CacheBackend, CredentialConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use server::ServerConfig;

/// Errors raised while loading configuration at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}")]
    MissingVar { name: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration (student directory)
    pub database: DatabaseConfig,

    /// Credential configuration
    pub credential: CredentialConfig,

    /// Cache configuration (only used with the Redis backend)
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment
    ///
    /// Fails when the signing secret is absent, which must abort startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        Ok(Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            credential: CredentialConfig::from_env()?,
            cache: CacheConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        })
    }
}

/// Reads an optional numeric variable, rejecting malformed values
pub(crate) fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(default),
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
