//! Serde roundtrip and JsonSchema validation for the public domain types.

use chrono::Utc;
use civi_core::{
    Choice, EntityKind, EntityTypeDescriptor, EntityTypeId, Operation, Origin, RecordCount,
    SyncEvent,
};
use schemars::schema_for;
use serde_json::json;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    descriptor_roundtrip,
    EntityTypeDescriptor,
    EntityTypeDescriptor {
        id: EntityTypeId(14),
        name: "Student".into(),
        label: "Student".into(),
        weight: 0,
        parent_id: Some(EntityTypeId(1)),
        is_active: true,
    }
);

roundtrip_and_validate!(
    choice_roundtrip,
    Choice,
    Choice {
        id: EntityTypeId(5),
        label: "Phone Call".into(),
    }
);

roundtrip_and_validate!(record_count_known_roundtrip, RecordCount, RecordCount::Known(7));

roundtrip_and_validate!(record_count_unknown_roundtrip, RecordCount, RecordCount::Unknown);

roundtrip_and_validate!(kind_roundtrip, EntityKind, EntityKind::ParticipantRole);

roundtrip_and_validate!(
    sync_event_roundtrip,
    SyncEvent,
    SyncEvent {
        entity: "Activity".into(),
        record_id: 301,
        operation: Operation::Edit,
        origin: Origin::Crm,
        before: Some(json!({"activity_type_id": 5, "subject": "Intro"})),
        after: Some(json!({"activity_type_id": 5, "subject": "Intro call"})),
        occurred_at: Utc::now(),
    }
);

#[test]
fn descriptor_defaults_fill_missing_fields() {
    let descriptor: EntityTypeDescriptor = serde_json::from_value(json!({
        "id": 3,
        "name": "Meeting",
        "label": "Meeting"
    }))
    .unwrap();
    assert_eq!(descriptor.weight, 0);
    assert!(descriptor.parent_id.is_none());
    assert!(descriptor.is_active);
}
