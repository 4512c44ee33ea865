//! Error types for the sync layer.

use civi_api::ApiError;
use civi_core::Operation;
use civi_resolver::ResolverError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised while mirroring one event across the bridge.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Resolving the entity type or its descriptor failed.
    #[error("resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// Writing the change to the CRM failed.
    #[error("CRM write failed: {0}")]
    Api(#[from] ApiError),

    /// The event carried no snapshot to read the record from.
    #[error("{entity} {operation} event has no snapshot")]
    MissingSnapshot { entity: String, operation: Operation },

    /// The snapshot was not a JSON object.
    #[error("malformed snapshot: {0}")]
    Snapshot(String),

    /// The field-management collaborator rejected the update.
    #[error("field sink error: {0}")]
    Sink(String),
}
