//! Application state shared across commands.
//!
//! The explicit process-scoped context: one configuration, one database
//! holder and one token cipher. Repositories borrow from it.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::crypto::AesGcmCipher;
use crate::db::{Database, ShopRepository};
use crate::error::AppError;

/// Application state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: AppConfig,
    database: Database,
    cipher: AesGcmCipher,
}

impl AppState {
    /// Build the state from validated configuration.
    ///
    /// No database connection is opened here.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Crypto` if `ENCRYPTION_KEY` is not a usable key.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let cipher = AesGcmCipher::from_encoded_key(&config.encryption_key)?;
        let database = Database::new(config.database_url.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                database,
                cipher,
            }),
        })
    }

    /// Validated configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Shared database holder.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    /// Offline token cipher.
    #[must_use]
    pub fn cipher(&self) -> &AesGcmCipher {
        &self.inner.cipher
    }

    /// Shop repository backed by the shared database and cipher.
    #[must_use]
    pub fn shops(&self) -> ShopRepository<'_> {
        ShopRepository::new(self.database(), self.cipher())
    }

    /// Release the database connection, if one was opened.
    pub async fn shutdown(&self) {
        self.inner.database.shutdown().await;
    }
}
