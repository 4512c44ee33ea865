//! Entity kinds and their static per-kind configuration.
//!
//! Every kind is served by the same generic resolver; what differs between
//! kinds is captured here as data: where descriptors come from, how records of
//! a type are counted, which field on a CRM record carries the type, and how
//! select-control choices are ordered.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// CRM entity-type classifications that can be mapped to post types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    ActivityType,
    CaseType,
    EventType,
    ParticipantRole,
    ContactType,
}

impl EntityKind {
    /// All kinds, in settings-screen order.
    pub const ALL: [Self; 5] = [
        Self::ActivityType,
        Self::CaseType,
        Self::EventType,
        Self::ParticipantRole,
        Self::ContactType,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActivityType => "activity_type",
            Self::CaseType => "case_type",
            Self::EventType => "event_type",
            Self::ParticipantRole => "participant_role",
            Self::ContactType => "contact_type",
        }
    }

    /// Static configuration for this kind.
    #[must_use]
    pub const fn spec(self) -> &'static KindSpec {
        match self {
            Self::ActivityType => &ACTIVITY_TYPE,
            Self::CaseType => &CASE_TYPE,
            Self::EventType => &EVENT_TYPE,
            Self::ParticipantRole => &PARTICIPANT_ROLE,
            Self::ContactType => &CONTACT_TYPE,
        }
    }

    /// Find the kind whose records live in the given CRM entity
    /// (`Activity` -> `ActivityType`).
    #[must_use]
    pub fn for_record_entity(entity: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.spec().record_entity.eq_ignore_ascii_case(entity))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownKind(s.to_string()))
    }
}

/// Where the live list of entity types is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorSource {
    /// Active values of a CRM option group (`OptionValue.get`). The option
    /// `value` is the entity-type id.
    OptionGroup(&'static str),
    /// Rows of a dedicated CRM entity (`CaseType.get`, `ContactType.get`).
    Entity(&'static str),
}

/// How records of a given type are counted on the CRM side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFilter {
    /// Filter `<record_entity>.getcount` by this field equal to the type id.
    ById(&'static str),
    /// Contacts are filtered by type *name*: `contact_type` for top-level
    /// types, `contact_sub_type` for sub-types.
    ByContactTypeName,
}

/// Where a CRM record carries its entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeField {
    /// Numeric type id in the named field.
    Id(&'static str),
    /// Contact type names in `contact_sub_type` (string or list), falling
    /// back to `contact_type`.
    ContactTypeName,
}

/// Ordering applied to select-control choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceOrder {
    /// Weight ascending, ties broken by label.
    Weight,
    /// Label ascending, case-insensitive.
    Label,
}

/// Static per-kind configuration driving the generic resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    pub kind: EntityKind,
    /// Human label for settings screens and table output.
    pub label: &'static str,
    /// Settings-store key holding this kind's mapping table.
    pub settings_key: &'static str,
    pub source: DescriptorSource,
    /// CRM entity whose records are classified by this kind.
    pub record_entity: &'static str,
    pub type_field: TypeField,
    pub count_filter: CountFilter,
    pub order: ChoiceOrder,
}

pub static ACTIVITY_TYPE: KindSpec = KindSpec {
    kind: EntityKind::ActivityType,
    label: "Activity Type",
    settings_key: "civibridge.mapping.activity_type",
    source: DescriptorSource::OptionGroup("activity_type"),
    record_entity: "Activity",
    type_field: TypeField::Id("activity_type_id"),
    count_filter: CountFilter::ById("activity_type_id"),
    order: ChoiceOrder::Weight,
};

pub static CASE_TYPE: KindSpec = KindSpec {
    kind: EntityKind::CaseType,
    label: "Case Type",
    settings_key: "civibridge.mapping.case_type",
    source: DescriptorSource::Entity("CaseType"),
    record_entity: "Case",
    type_field: TypeField::Id("case_type_id"),
    count_filter: CountFilter::ById("case_type_id"),
    order: ChoiceOrder::Weight,
};

pub static EVENT_TYPE: KindSpec = KindSpec {
    kind: EntityKind::EventType,
    label: "Event Type",
    settings_key: "civibridge.mapping.event_type",
    source: DescriptorSource::OptionGroup("event_type"),
    record_entity: "Event",
    type_field: TypeField::Id("event_type_id"),
    count_filter: CountFilter::ById("event_type_id"),
    order: ChoiceOrder::Weight,
};

pub static PARTICIPANT_ROLE: KindSpec = KindSpec {
    kind: EntityKind::ParticipantRole,
    label: "Participant Role",
    settings_key: "civibridge.mapping.participant_role",
    source: DescriptorSource::OptionGroup("participant_role"),
    record_entity: "Participant",
    type_field: TypeField::Id("role_id"),
    count_filter: CountFilter::ById("role_id"),
    order: ChoiceOrder::Weight,
};

pub static CONTACT_TYPE: KindSpec = KindSpec {
    kind: EntityKind::ContactType,
    label: "Contact Type",
    settings_key: "civibridge.mapping.contact_type",
    source: DescriptorSource::Entity("ContactType"),
    record_entity: "Contact",
    type_field: TypeField::ContactTypeName,
    count_filter: CountFilter::ByContactTypeName,
    order: ChoiceOrder::Label,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("activity_type", EntityKind::ActivityType)]
    #[case("activity-type", EntityKind::ActivityType)]
    #[case("Case_Type", EntityKind::CaseType)]
    #[case("participant-role", EntityKind::ParticipantRole)]
    #[case(" contact_type ", EntityKind::ContactType)]
    fn parses_kind_slugs(#[case] raw: &str, #[case] expected: EntityKind) {
        assert_eq!(raw.parse::<EntityKind>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "membership_type".parse::<EntityKind>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownKind(_)));
    }

    #[test]
    fn every_kind_has_matching_spec() {
        for kind in EntityKind::ALL {
            let spec = kind.spec();
            assert_eq!(spec.kind, kind);
            assert!(spec.settings_key.ends_with(kind.as_str()));
        }
    }

    #[test]
    fn settings_keys_are_unique() {
        let mut keys: Vec<_> = EntityKind::ALL.iter().map(|k| k.spec().settings_key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), EntityKind::ALL.len());
    }

    #[test]
    fn record_entity_lookup() {
        assert_eq!(
            EntityKind::for_record_entity("Activity"),
            Some(EntityKind::ActivityType)
        );
        assert_eq!(
            EntityKind::for_record_entity("participant"),
            Some(EntityKind::ParticipantRole)
        );
        assert_eq!(EntityKind::for_record_entity("Membership"), None);
    }
}
