//! Storage error types for civi-store.

use civi_core::CoreError;
use thiserror::Error;

/// Errors from settings and mapping storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A stored value could not be decoded.
    #[error("Corrupt setting '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// A submitted mapping broke a domain rule.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
