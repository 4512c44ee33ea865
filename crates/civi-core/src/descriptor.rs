//! Live entity-type metadata fetched from the CRM.

use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::EntityTypeId;
use crate::kinds::ChoiceOrder;

/// One CRM lookup value (an activity type, a case type, a contact sub-type).
///
/// Not owned by civibridge: a read-only reference value, cached for at most
/// one synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityTypeDescriptor {
    pub id: EntityTypeId,
    /// Machine name (`Meeting`, `Student`).
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub weight: i64,
    /// Set for contact sub-types.
    #[serde(default)]
    pub parent_id: Option<EntityTypeId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl EntityTypeDescriptor {
    /// Compare two descriptors under the given choice ordering.
    #[must_use]
    pub fn cmp_by(&self, other: &Self, order: ChoiceOrder) -> Ordering {
        let by_label = || {
            self.label
                .to_lowercase()
                .cmp(&other.label.to_lowercase())
                .then_with(|| self.id.cmp(&other.id))
        };
        match order {
            ChoiceOrder::Weight => self.weight.cmp(&other.weight).then_with(by_label),
            ChoiceOrder::Label => by_label(),
        }
    }
}

/// A `(value, label)` pair for a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Choice {
    pub id: EntityTypeId,
    pub label: String,
}

impl From<&EntityTypeDescriptor> for Choice {
    fn from(descriptor: &EntityTypeDescriptor) -> Self {
        Self {
            id: descriptor.id,
            label: descriptor.label.clone(),
        }
    }
}

/// Number of CRM records of one entity type.
///
/// `Unknown` means the count could not be obtained, which is distinct from a
/// known count of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", content = "count", rename_all = "snake_case")]
pub enum RecordCount {
    Known(u64),
    Unknown,
}

impl RecordCount {
    /// Collapse to a plain number, treating `Unknown` as zero.
    #[must_use]
    pub const fn or_zero(self) -> u64 {
        match self {
            Self::Known(n) => n,
            Self::Unknown => 0,
        }
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: i64, label: &str, weight: i64) -> EntityTypeDescriptor {
        EntityTypeDescriptor {
            id: EntityTypeId(id),
            name: label.replace(' ', "_"),
            label: label.to_string(),
            weight,
            parent_id: None,
            is_active: true,
        }
    }

    #[test]
    fn weight_order_breaks_ties_by_label() {
        let a = descriptor(1, "Zebra", 1);
        let b = descriptor(2, "apple", 1);
        let c = descriptor(3, "Mango", 0);
        let mut all = vec![a, b, c];
        all.sort_by(|x, y| x.cmp_by(y, ChoiceOrder::Weight));
        let labels: Vec<_> = all.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Mango", "apple", "Zebra"]);
    }

    #[test]
    fn label_order_ignores_case_and_weight() {
        let mut all = vec![descriptor(1, "beta", 0), descriptor(2, "Alpha", 9)];
        all.sort_by(|x, y| x.cmp_by(y, ChoiceOrder::Label));
        assert_eq!(all[0].label, "Alpha");
    }

    #[test]
    fn unknown_count_collapses_to_zero() {
        assert_eq!(RecordCount::Unknown.or_zero(), 0);
        assert_eq!(RecordCount::Known(7).or_zero(), 7);
        assert!(!RecordCount::Unknown.is_known());
    }

    #[test]
    fn record_count_serializes_tagged() {
        let json = serde_json::to_value(RecordCount::Known(7)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "known", "count": 7}));
        let json = serde_json::to_value(RecordCount::Unknown).unwrap();
        assert_eq!(json, serde_json::json!({"status": "unknown"}));
    }
}
