mod filters;
mod restaker_repository;
mod reward_repository;
mod schema;
mod seed;
mod validator_repository;

pub use restaker_repository::SqliteRestakerRepository;
pub use reward_repository::{Clock, SqliteRewardRepository};
pub use schema::initialize_schema;
pub use seed::{seed_initial_data, seed_initial_data_at, SeedOutcome};
pub use validator_repository::SqliteValidatorRepository;

use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, warn};

use crate::utils::{RegistryError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub query_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/eigenlayer.db".to_string(),
            max_connections: 5,
            query_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// On-disk location of the database, `None` for in-memory URLs.
    pub fn file_path(&self) -> Option<PathBuf> {
        let path = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))
            .unwrap_or(&self.url);
        let path = path.split('?').next().unwrap_or_default();

        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

/// Shared handle to the relational store.
///
/// Cheap to clone: every clone shares the same pool. Each round-trip issued
/// through [`Database::run`] is bounded by the handle's query timeout.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if config.query_timeout_secs == 0 || config.max_connections == 0 {
            return Err(RegistryError::Config(
                "query_timeout_secs and max_connections must be at least 1".to_string(),
            ));
        }

        if let Some(parent) = config.file_path().as_ref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RegistryError::Config(format!(
                        "cannot create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.query_timeout())
            .connect_with(options)
            .await?;

        info!(url = %config.url, max_connections = config.max_connections, "Connected to SQLite database");

        Ok(Self {
            pool,
            query_timeout: config.query_timeout(),
        })
    }

    /// A private in-memory database. The pool pins a single connection, since
    /// every SQLite connection to `:memory:` opens a distinct database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool,
            query_timeout: DatabaseConfig::default().query_timeout(),
        })
    }

    /// Same pool, different deadline per storage call.
    pub fn with_timeout(&self, query_timeout: Duration) -> Self {
        Self {
            pool: self.pool.clone(),
            query_timeout,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Drives one storage round-trip under the handle's deadline.
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(RegistryError::from),
            Err(_) => {
                warn!(operation, timeout = ?self.query_timeout, "Storage operation timed out");
                Err(RegistryError::Timeout {
                    operation,
                    after: self.query_timeout,
                })
            }
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path() {
        let mut config = DatabaseConfig::default();
        assert_eq!(config.file_path(), Some(PathBuf::from("data/eigenlayer.db")));

        config.url = "sqlite::memory:".into();
        assert_eq!(config.file_path(), None);

        config.url = "sqlite:/tmp/registry.db?mode=rwc".into();
        assert_eq!(config.file_path(), Some(PathBuf::from("/tmp/registry.db")));
    }

    #[tokio::test]
    async fn test_connect_rejects_zero_timeout() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".into(),
            query_timeout_secs: 0,
            ..Default::default()
        };
        let err = Database::connect(&config).await.unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let db = Database::in_memory()
            .await
            .unwrap()
            .with_timeout(Duration::from_millis(10));

        let err = db
            .run("sleep", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, sqlx::Error>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Timeout { operation: "sleep", .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_run_maps_storage_errors() {
        let db = Database::in_memory().await.unwrap();
        let err = db
            .run(
                "bad_sql",
                sqlx::query("SELECT * FROM no_such_table").execute(db.pool()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Database(_)));
        assert!(!err.is_retryable());
    }
}
