//! Database access for mitto-connect `PostgreSQL`.
//!
//! ## Tables
//!
//! - `shops` - Installed shops keyed by domain, with the sealed offline token
//!
//! # Client lifecycle
//!
//! [`Database`] owns at most one connection pool. The pool is built on the
//! first [`Database::client`] call and lives until [`Database::shutdown`].
//! Share one `Database` per process (see [`crate::state::AppState`]).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/app/migrations/` and run via:
//! ```bash
//! cargo run -p mitto-connect-cli -- migrate
//! ```

pub mod memory;
pub mod shops;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::crypto::CryptoError;

pub use memory::MemoryShopStore;
pub use shops::{ShopRepository, ShopStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error from sqlx.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Sealing or opening a token failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The caller supplied data that cannot be stored.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Connection pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// How long a query waits for a connection before failing.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// Process-wide holder of the database client.
pub struct Database {
    database_url: SecretString,
    settings: PoolSettings,
    pool: OnceCell<PgPool>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("database_url", &"[REDACTED]")
            .field("settings", &self.settings)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Database {
    /// Create a holder with default pool settings. No connection is made yet.
    #[must_use]
    pub fn new(database_url: SecretString) -> Self {
        Self::with_settings(database_url, PoolSettings::default())
    }

    /// Create a holder with explicit pool settings. No connection is made yet.
    #[must_use]
    pub fn with_settings(database_url: SecretString, settings: PoolSettings) -> Self {
        Self {
            database_url,
            settings,
            pool: OnceCell::new(),
        }
    }

    /// Get the shared connection pool, creating it on first use.
    ///
    /// Every call on the same holder returns the same pool. Connections are
    /// opened lazily by the pool itself.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection string cannot be parsed.
    pub async fn client(&self) -> Result<&PgPool, sqlx::Error> {
        self.pool
            .get_or_try_init(|| async {
                let pool = PgPoolOptions::new()
                    .max_connections(self.settings.max_connections)
                    .acquire_timeout(self.settings.acquire_timeout)
                    .connect_lazy(self.database_url.expose_secret())?;
                tracing::info!(
                    max_connections = self.settings.max_connections,
                    "Database pool created"
                );
                Ok::<_, sqlx::Error>(pool)
            })
            .await
    }

    /// Whether the pool has been created.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// Best-effort liveness probe.
    ///
    /// Runs `SELECT 1` and reports whether it succeeded. Never returns an
    /// error: a bad connection string, an unreachable server and a timeout all
    /// yield `false`.
    pub async fn check_healthy(&self) -> bool {
        let result = match self.client().await {
            Ok(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Database health check failed");
                false
            }
        }
    }

    /// Close the pool if one was created.
    ///
    /// Waits for checked-out connections to be returned. Calling this before
    /// any [`Database::client`] call is a no-op.
    pub async fn shutdown(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            tracing::info!("Database pool closed");
        }
    }

    /// Run the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the pool cannot be created or a migration fails.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        let pool = self.client().await?;
        tracing::info!("Running migrations");
        sqlx::migrate!("./migrations").run(pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}
