//! MySQL pool for the student directory

use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, MySqlPool};

use crate::config::DatabaseConfig;
use crate::database::MySqlStudentDirectory;
use crate::InfrastructureError;

/// Pool shared by every directory lookup
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        let connect_options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?
            .log_statements(LevelFilter::Trace)
            .log_slow_statements(
                LevelFilter::Warn,
                Duration::from_millis(config.slow_statement_ms),
            );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!("Student directory database unreachable: {}", e);
                InfrastructureError::Database(e)
            })?;

        tracing::info!(
            "Student directory pool ready (max {} connections)",
            config.max_connections
        );

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Directory backed by this pool
    pub fn student_directory(&self) -> MySqlStudentDirectory {
        MySqlStudentDirectory::new(self.pool.clone())
    }

    /// `SELECT 1` round trip
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::warn!("Student directory health check failed: {}", e);
                InfrastructureError::Database(e)
            })
    }
}
