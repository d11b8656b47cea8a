//! Subcommand implementations.

pub mod check_env;
pub mod health;
pub mod migrate;
pub mod shop;

use mitto_connect::db::RepositoryError;
use mitto_connect::error::AppError;
use mitto_connect_core::ShopDomainError;
use thiserror::Error;

/// Errors that end a command with exit code 1.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration, database or crypto failure.
    #[error(transparent)]
    App(#[from] AppError),

    /// The shop domain argument is not a valid hostname.
    #[error("invalid shop domain: {0}")]
    InvalidDomain(#[from] ShopDomainError),

    /// A command-line value could not be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No shop is stored under the domain.
    #[error("shop not found: {0}")]
    NotFound(String),

    /// The database did not answer the health probe.
    #[error("database is unhealthy")]
    Unhealthy,

    /// Reading stdin failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<RepositoryError> for CommandError {
    fn from(err: RepositoryError) -> Self {
        Self::App(AppError::from(err))
    }
}

impl CommandError {
    /// Log the error; application failures also go to Sentry.
    pub fn report(&self) {
        match self {
            Self::App(e) => e.report(),
            other => tracing::error!(error = %other, "Command failed"),
        }
    }
}
