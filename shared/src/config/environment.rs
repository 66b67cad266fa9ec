//! Deployment environment and the log filter it implies

use serde::{Deserialize, Serialize};

/// Variables consulted, in order, to find the deployment environment
const ENVIRONMENT_VARS: [&str; 3] = ["ENVIRONMENT", "ENV", "RUST_ENV"];

/// Where the carnet service is deployed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    /// Serves the student portal and the gate scanners; CORS is locked down
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// First of `ENVIRONMENT`, `ENV`, `RUST_ENV` that is set
    ///
    /// An unset or unrecognised value falls back to development.
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// env_logger defaults; `RUST_LOG` still wins when set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directives
    pub filter: String,

    /// Prefix each line with a timestamp
    pub timestamp: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Filter for the given environment
    ///
    /// Production keeps the credential services and the request log at info.
    pub fn for_environment(env: Environment) -> Self {
        let filter = match env {
            Environment::Development => "debug,sqlx=info,actix_server=info",
            Environment::Staging => "info,sqlx=warn",
            Environment::Production => {
                "warn,carnet_api=info,carnet_core::services=info,actix_web::middleware::logger=info"
            }
        };

        Self {
            filter: filter.to_string(),
            timestamp: env != Environment::Development,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(" Local ".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_production_filter_keeps_credential_logs() {
        let logging = LoggingConfig::for_environment(Environment::Production);

        assert!(logging.filter.starts_with("warn,"));
        assert!(logging.filter.contains("carnet_core::services=info"));
        assert!(logging.filter.contains("actix_web::middleware::logger=info"));
        assert!(logging.timestamp);
    }

    #[test]
    fn test_development_logging_is_verbose_without_timestamps() {
        let logging = LoggingConfig::default();

        assert!(logging.filter.starts_with("debug,"));
        assert!(!logging.timestamp);
    }
}
