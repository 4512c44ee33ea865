//! Sync event payloads carried through the observer bus.
//!
//! An event lives for one synchronization pass and is never persisted.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::kinds::EntityKind;

/// What happened to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Edit,
    Delete,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the bridge the change originated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Crm,
    Post,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Crm => "crm",
            Self::Post => "post",
        })
    }
}

/// A single record change to mirror across the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyncEvent {
    /// CRM entity the record belongs to (`Activity`, `Contact`, ...).
    pub entity: String,
    /// Record id on the originating side: a CRM id for [`Origin::Crm`], a
    /// post id for [`Origin::Post`].
    pub record_id: i64,
    pub operation: Operation,
    pub origin: Origin,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
    #[serde(default = "Utc::now")]
    pub occurred_at: DateTime<Utc>,
}

impl SyncEvent {
    #[must_use]
    pub fn new(entity: impl Into<String>, record_id: i64, operation: Operation, origin: Origin) -> Self {
        Self {
            entity: entity.into(),
            record_id,
            operation,
            origin,
            before: None,
            after: None,
            occurred_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_before(mut self, before: Value) -> Self {
        self.before = Some(before);
        self
    }

    #[must_use]
    pub fn with_after(mut self, after: Value) -> Self {
        self.after = Some(after);
        self
    }

    /// The snapshot describing the record: `after` for create/edit, falling
    /// back to `before` (the only snapshot a delete carries).
    #[must_use]
    pub fn snapshot(&self) -> Option<&Value> {
        match self.operation {
            Operation::Delete => self.before.as_ref().or(self.after.as_ref()),
            Operation::Create | Operation::Edit => self.after.as_ref().or(self.before.as_ref()),
        }
    }

    /// Entity kind classifying this record, if the entity is one civibridge maps.
    #[must_use]
    pub fn kind(&self) -> Option<EntityKind> {
        EntityKind::for_record_entity(&self.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delete_prefers_before_snapshot() {
        let event = SyncEvent::new("Activity", 3, Operation::Delete, Origin::Crm)
            .with_before(json!({"activity_type_id": 5}))
            .with_after(json!({}));
        assert_eq!(event.snapshot(), Some(&json!({"activity_type_id": 5})));
    }

    #[test]
    fn edit_prefers_after_snapshot() {
        let event = SyncEvent::new("Activity", 3, Operation::Edit, Origin::Crm)
            .with_before(json!({"subject": "old"}))
            .with_after(json!({"subject": "new"}));
        assert_eq!(event.snapshot(), Some(&json!({"subject": "new"})));
    }

    #[test]
    fn kind_follows_record_entity() {
        let event = SyncEvent::new("Case", 1, Operation::Create, Origin::Crm);
        assert_eq!(event.kind(), Some(EntityKind::CaseType));
        let event = SyncEvent::new("Grant", 1, Operation::Create, Origin::Crm);
        assert_eq!(event.kind(), None);
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let event: SyncEvent = serde_json::from_value(json!({
            "entity": "Event",
            "record_id": 12,
            "operation": "edit",
            "origin": "post"
        }))
        .unwrap();
        assert_eq!(event.origin, Origin::Post);
        assert!(event.before.is_none());
    }
}
