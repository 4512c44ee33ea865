//! The seam to the field-management collaborator on the post side.

use async_trait::async_trait;
use civi_core::{EntityTypeId, Operation, PostType};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SyncError;

/// A CRM record change, translated for the post it is mirrored into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostUpdate {
    pub post_type: PostType,
    /// CRM entity the values came from (`Activity`, `Contact`, ...).
    pub entity: String,
    /// CRM record id.
    pub record_id: i64,
    pub entity_type_id: EntityTypeId,
    pub operation: Operation,
    /// Field values to write, limited to fields the post type carries.
    /// Empty for deletes.
    pub values: Map<String, Value>,
}

/// Reads and writes field values on posts.
#[async_trait]
pub trait FieldSink: Send + Sync {
    /// Names of the fields attached to posts of `post_type`.
    async fn fields_for_post(&self, post_type: &PostType) -> Result<Vec<String>, SyncError>;

    /// Write the update into the mirrored post.
    async fn apply(&self, update: &PostUpdate) -> Result<(), SyncError>;
}
