//! Cross-cutting error types for civibridge.
//!
//! Domain-specific errors (`ApiError`, `StoreError`, `ResolverError`) live in
//! their respective crates. The binary converges everything into `anyhow`.

use thiserror::Error;

use crate::ids::{EntityTypeId, PostType};

/// Errors that can be raised by any civibridge crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity kind slug did not name any known kind.
    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),

    /// Two entity types were submitted for the same post type.
    #[error("Post type '{post_type}' is already mapped to {existing}, cannot also map {rejected}")]
    MappingConflict {
        post_type: PostType,
        existing: EntityTypeId,
        rejected: EntityTypeId,
    },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_names_both_ids() {
        let err = CoreError::MappingConflict {
            post_type: PostType::from("student"),
            existing: EntityTypeId(5),
            rejected: EntityTypeId(9),
        };
        assert_eq!(
            err.to_string(),
            "Post type 'student' is already mapped to 5, cannot also map 9"
        );
    }
}
