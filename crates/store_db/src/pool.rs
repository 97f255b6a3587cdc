//! Store connection management
//!
//! A [`Store`] wraps a shared connection pool for one of the supported
//! drivers. Opening a store validates that the data source name actually
//! belongs to the requested driver before handing it to the engine, since a
//! mismatch would silently render statements in the wrong dialect.

use std::fmt;
use std::sync::Once;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use store_kernel::Dialect;
use tracing::info;

use crate::error::StoreError;

/// The closed set of supported storage drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// Embedded file (or in-memory) SQLite database
    Sqlite,
    /// Networked PostgreSQL database
    Postgres,
}

impl DriverKind {
    /// The SQL dialect statements are rendered in for this driver
    pub fn dialect(self) -> Dialect {
        match self {
            DriverKind::Sqlite => Dialect::Sqlite,
            DriverKind::Postgres => Dialect::Postgres,
        }
    }

    fn matches_dsn(self, dsn: &str) -> bool {
        match self {
            DriverKind::Sqlite => dsn.starts_with("sqlite:"),
            DriverKind::Postgres => {
                dsn.starts_with("postgres://") || dsn.starts_with("postgresql://")
            }
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverKind::Sqlite => f.write_str("sqlite"),
            DriverKind::Postgres => f.write_str("postgres"),
        }
    }
}

/// Configuration options for a store connection pool
///
/// # Example
///
/// ```rust,ignore
/// use store_db::{DriverKind, Store, StoreConfig};
///
/// let config = StoreConfig::new(DriverKind::Postgres, "postgres://localhost/app")
///     .pool_size(20)
///     .log_queries(true);
/// let store = Store::open(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Which driver the data source name belongs to
    pub driver: DriverKind,
    /// Driver-specific data source name
    pub dsn: String,
    /// Maximum number of pooled connections
    pub pool_size: u32,
    /// Log every executed statement at debug level
    pub log_queries: bool,
    /// How long to wait when acquiring a connection
    pub connect_timeout: Duration,
    /// Idle time before a pooled connection is closed
    pub idle_timeout: Duration,
    /// Maximum lifetime of a pooled connection
    pub max_lifetime: Duration,
}

impl StoreConfig {
    /// Creates a configuration with sensible defaults
    pub fn new(driver: DriverKind, dsn: impl Into<String>) -> Self {
        Self {
            driver,
            dsn: dsn.into(),
            pool_size: 10,
            log_queries: false,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }

    /// Sets the maximum number of pooled connections (minimum 1)
    pub fn pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    /// Enables or disables per-statement debug logging
    pub fn log_queries(mut self, log_queries: bool) -> Self {
        self.log_queries = log_queries;
        self
    }

    /// Sets the connection acquire timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the idle timeout for pooled connections
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets the maximum lifetime of a pooled connection
    pub fn max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = lifetime;
        self
    }
}

/// A handle to an open store
///
/// Cloning is cheap (the pool is shared), and every repository or schema
/// call borrows the handle only for the duration of that call; no
/// connection is retained across calls. Concurrent callers each use their
/// own clone.
#[derive(Debug, Clone)]
pub struct Store {
    pool: AnyPool,
    driver: DriverKind,
    log_queries: bool,
}

impl Store {
    /// Opens a store from the individual connection parameters
    pub async fn connect(
        driver: DriverKind,
        dsn: impl Into<String>,
        pool_size: u32,
        log_queries: bool,
    ) -> Result<Self, StoreError> {
        Self::open(
            StoreConfig::new(driver, dsn)
                .pool_size(pool_size)
                .log_queries(log_queries),
        )
        .await
    }

    /// Opens a store with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` if the data source name does
    /// not match the driver or the pool cannot be created.
    pub async fn open(config: StoreConfig) -> Result<Self, StoreError> {
        ensure_drivers_installed();

        if !config.driver.matches_dsn(&config.dsn) {
            return Err(StoreError::ConnectionFailed(format!(
                "data source name does not match driver '{}'",
                config.driver
            )));
        }

        info!(
            driver = %config.driver,
            pool_size = config.pool_size,
            "opening store"
        );

        let pool = AnyPoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.dsn)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            pool,
            driver: config.driver,
            log_queries: config.log_queries,
        })
    }

    /// The driver this store was opened with
    pub fn driver(&self) -> DriverKind {
        self.driver
    }

    pub(crate) fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub(crate) fn log_queries_enabled(&self) -> bool {
        self.log_queries
    }

    /// Closes the pool, waiting for checked-out connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn ensure_drivers_installed() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(install_default_drivers);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_dsn_validation() {
        assert!(DriverKind::Sqlite.matches_dsn("sqlite::memory:"));
        assert!(DriverKind::Postgres.matches_dsn("postgres://localhost/app"));
        assert!(DriverKind::Postgres.matches_dsn("postgresql://localhost/app"));
        assert!(!DriverKind::Sqlite.matches_dsn("postgres://localhost/app"));
        assert!(!DriverKind::Postgres.matches_dsn("sqlite::memory:"));
    }

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new(DriverKind::Sqlite, "sqlite::memory:")
            .pool_size(0)
            .log_queries(true)
            .connect_timeout(Duration::from_secs(5));

        assert_eq!(config.pool_size, 1);
        assert!(config.log_queries);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }
}
