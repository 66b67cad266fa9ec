//! # Infrastructure Layer
//!
//! Concrete adapters for the systems the credential core talks to.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL student directory using SQLx
//! - **Cache**: Redis-backed token cache for multi-node deployments
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis caching support (default)

use carnet_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and token cache
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Configuration module for infrastructure services
pub mod config {
    //! Re-exports of the shared configuration consumed by the adapters

    pub use carnet_shared::config::{CacheConfig, DatabaseConfig};
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e) => DomainError::Cache {
                message: e.to_string(),
            },
            InfrastructureError::Serialization(message) => DomainError::Cache { message },
            other => DomainError::Internal {
                message: other.to_string(),
            },
        }
    }
}
