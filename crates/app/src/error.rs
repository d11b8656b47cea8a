//! Unified error handling for mitto-connect.

use mitto_connect_core::ShopDomain;
use thiserror::Error;

use crate::config::ConfigErrors;
use crate::crypto::CryptoError;
use crate::db::RepositoryError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigErrors),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Token cipher could not be set up or used.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl AppError {
    /// Log the error, forwarding infrastructure failures to Sentry.
    pub fn report(&self) {
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::error!(error = %self, "Command failed");
        }
    }
}

/// Tag subsequent Sentry events with the shop being worked on.
pub fn set_sentry_shop(domain: &ShopDomain) {
    sentry::configure_scope(|scope| {
        scope.set_tag("shop", domain.as_str());
    });
}
