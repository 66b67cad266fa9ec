//! Shared utilities and common types for the UFPS Carnet server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and environment loaders
//! - Error response structures and error codes
//! - Input validation helpers

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheBackend, CacheConfig, ConfigError, CredentialConfig, DatabaseConfig,
    Environment, LoggingConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::validation;
