//! Resolver error types.

use civi_api::ApiError;
use civi_core::EntityKind;
use civi_store::StoreError;
use thiserror::Error;

/// Errors surfaced by resolver operations that touch the CRM or the store.
///
/// "Not found" is never an error: lookups return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The CRM call failed.
    #[error("CRM call failed: {0}")]
    Api(#[from] ApiError),

    /// The mapping table could not be loaded or saved.
    #[error("mapping store failed: {0}")]
    Store(#[from] StoreError),

    /// A CRM row lacked a field every descriptor needs.
    #[error("malformed {kind} row: {reason}")]
    MalformedRow { kind: EntityKind, reason: String },
}
