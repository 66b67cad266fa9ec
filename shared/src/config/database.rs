//! Student directory database settings

use serde::{Deserialize, Serialize};

use super::{parse_env_or, ConfigError};

const DEFAULT_DATABASE_URL: &str = "mysql://localhost:3306/carnet";

/// MySQL pool settings for the read-only student directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: String,

    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub connect_timeout: u64,

    /// Lookups slower than this are logged as warnings
    pub slow_statement_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            connect_timeout: 5,
            slow_statement_ms: 500,
        }
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`,
    /// `DATABASE_CONNECT_TIMEOUT` and `DATABASE_SLOW_STATEMENT_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.url),
            max_connections: parse_env_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            connect_timeout: parse_env_or("DATABASE_CONNECT_TIMEOUT", defaults.connect_timeout)?,
            slow_statement_ms: parse_env_or(
                "DATABASE_SLOW_STATEMENT_MS",
                defaults.slow_statement_ms,
            )?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DATABASE_MAX_CONNECTIONS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(config)
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}
