//! Resolver behaviour against a scripted CRM and an in-memory settings store.

use std::sync::Arc;

use civi_api::testing::ScriptedCrm;
use civi_core::{Choice, EntityKind, EntityTypeId, MappingTable, PostType, RecordCount};
use civi_resolver::{RequestCache, ResolverSet};
use civi_store::{MappingStore, MemorySettings};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn activity_types_crm() -> ScriptedCrm {
    ScriptedCrm::new().on(
        "OptionValue",
        "get",
        json!({
            "is_error": 0,
            "count": 4,
            "values": {
                "40": {"id": "40", "value": "5", "name": "Tutoring", "label": "Tutoring", "weight": "3"},
                "41": {"id": "41", "value": "1", "name": "Meeting", "label": "Meeting", "weight": "1"},
                "42": {"id": "42", "value": "2", "name": "Phone Call", "label": "Phone Call", "weight": "1"},
                "43": {"id": "43", "value": "9", "name": "Retired", "label": "Retired", "weight": "0", "is_active": "0"}
            }
        }),
    )
}

async fn load(crm: ScriptedCrm, seed: &[(EntityKind, i64, &str)]) -> (ResolverSet, Arc<ScriptedCrm>) {
    let store = MappingStore::new(Arc::new(MemorySettings::new()));
    for (kind, id, post_type) in seed {
        store
            .upsert_entry(*kind, EntityTypeId(*id), PostType::from(*post_type))
            .await
            .unwrap();
    }
    let crm = Arc::new(crm);
    let set = ResolverSet::load(store, crm.clone()).await.unwrap();
    (set, crm)
}

#[rstest]
#[case(EntityKind::ActivityType)]
#[case(EntityKind::CaseType)]
#[case(EntityKind::EventType)]
#[case(EntityKind::ParticipantRole)]
#[case(EntityKind::ContactType)]
#[tokio::test]
async fn post_type_roundtrips_through_id(#[case] kind: EntityKind) {
    let (set, _) = load(
        ScriptedCrm::new(),
        &[(kind, 5, "student"), (kind, 8, "mentor")],
    )
    .await;
    let resolver = set.get(kind);

    for post_type in ["student", "mentor"] {
        let id = resolver.id_for_post_type(post_type).expect("mapped post type");
        assert_eq!(
            resolver.post_type_for_id(id).map(PostType::as_str),
            Some(post_type)
        );
    }
    assert_eq!(resolver.id_for_post_type("alumnus"), None);
}

#[tokio::test]
async fn is_mapped_answers_post_type_or_none() {
    let (set, _) = load(ScriptedCrm::new(), &[(EntityKind::EventType, 3, "conference")]).await;
    let resolver = set.get(EntityKind::EventType);
    assert_eq!(
        resolver.is_mapped(EntityTypeId(3)).map(PostType::as_str),
        Some("conference")
    );
    assert_eq!(resolver.is_mapped(EntityTypeId(4)), None);
    assert_eq!(set.get(EntityKind::CaseType).is_mapped(EntityTypeId(3)), None);
}

#[tokio::test]
async fn choices_are_sorted_and_fetched_once_per_pass() {
    let (set, crm) = load(activity_types_crm(), &[]).await;
    let resolver = set.get(EntityKind::ActivityType);
    let mut cache = RequestCache::new();

    let first = resolver.choices_for_select(&mut cache).await.unwrap();
    let second = resolver.choices_for_select(&mut cache).await.unwrap();

    assert_eq!(
        first,
        vec![
            Choice { id: EntityTypeId(1), label: "Meeting".into() },
            Choice { id: EntityTypeId(2), label: "Phone Call".into() },
            Choice { id: EntityTypeId(5), label: "Tutoring".into() },
        ]
    );
    assert_eq!(first, second);
    assert_eq!(crm.call_count("OptionValue", "get"), 1);
    assert_eq!(cache.hits(), 1);
}

#[tokio::test]
async fn a_new_pass_fetches_again() {
    let (set, crm) = load(activity_types_crm(), &[]).await;
    let resolver = set.get(EntityKind::ActivityType);

    resolver.choices_for_select(&mut RequestCache::new()).await.unwrap();
    resolver.choices_for_select(&mut RequestCache::new()).await.unwrap();
    assert_eq!(crm.call_count("OptionValue", "get"), 2);
}

#[tokio::test]
async fn contact_type_choices_sort_by_label() {
    let crm = ScriptedCrm::new().on(
        "ContactType",
        "get",
        json!({"is_error": 0, "values": [
            {"id": 1, "name": "Individual", "label": "Individual"},
            {"id": 9, "name": "Student", "label": "Student", "parent_id": 1},
            {"id": 3, "name": "Organization", "label": "Organization"},
            {"id": 10, "name": "Alumnus", "label": "alumnus", "parent_id": 1}
        ]}),
    );
    let (set, _) = load(crm, &[]).await;
    let labels: Vec<String> = set
        .get(EntityKind::ContactType)
        .choices_for_select(&mut RequestCache::new())
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.label)
        .collect();
    assert_eq!(labels, ["alumnus", "Individual", "Organization", "Student"]);
}

#[tokio::test]
async fn count_passes_through_crm_value() {
    let crm = ScriptedCrm::new().on_with("Activity", "getcount", |req| {
        assert_eq!(req.params["activity_type_id"], json!(5));
        Ok(json!({"is_error": 0, "result": 7}))
    });
    let (set, _) = load(crm, &[]).await;
    let count = set.get(EntityKind::ActivityType).count(EntityTypeId(5)).await;
    assert_eq!(count, RecordCount::Known(7));
    assert_eq!(count.or_zero(), 7);
}

#[tokio::test]
async fn count_failure_is_unknown_and_collapses_to_zero() {
    let crm = ScriptedCrm::new().fail("Activity", "getcount", "DB Error: no such table");
    let (set, _) = load(crm, &[]).await;
    let count = set.get(EntityKind::ActivityType).count(EntityTypeId(5)).await;
    assert_eq!(count, RecordCount::Unknown);
    assert_eq!(count.or_zero(), 0);
}

#[tokio::test]
async fn participant_role_counts_by_role_id() {
    let crm = ScriptedCrm::new().on_with("Participant", "getcount", |req| {
        assert_eq!(req.params["role_id"], json!(2));
        Ok(json!(3))
    });
    let (set, _) = load(crm, &[]).await;
    assert_eq!(
        set.get(EntityKind::ParticipantRole).count(EntityTypeId(2)).await,
        RecordCount::Known(3)
    );
}

#[tokio::test]
async fn removing_a_mapping_clears_both_lookups_after_reload() {
    let (mut set, _) = load(ScriptedCrm::new(), &[(EntityKind::ActivityType, 5, "student")]).await;
    assert!(set.get(EntityKind::ActivityType).is_mapped(EntityTypeId(5)).is_some());

    set.store()
        .remove_entry(EntityKind::ActivityType, EntityTypeId(5))
        .await
        .unwrap();
    set.reload(EntityKind::ActivityType).await.unwrap();

    let resolver = set.get(EntityKind::ActivityType);
    assert_eq!(resolver.is_mapped(EntityTypeId(5)), None);
    assert_eq!(resolver.id_for_post_type("student"), None);
}

#[tokio::test]
async fn mapped_descriptors_skip_ids_the_crm_no_longer_knows() {
    let (set, _) = load(
        activity_types_crm(),
        &[(EntityKind::ActivityType, 1, "meeting"), (EntityKind::ActivityType, 77, "ghost")],
    )
    .await;
    let mapped = set
        .get(EntityKind::ActivityType)
        .mapped_descriptors(&mut RequestCache::new())
        .await
        .unwrap();
    assert_eq!(mapped.len(), 1);
    assert_eq!(mapped[0].0.name, "Meeting");
    assert_eq!(mapped[0].1, PostType::from("meeting"));
}

#[tokio::test]
async fn table_set_through_store_is_what_resolver_sees() {
    let store = MappingStore::new(Arc::new(MemorySettings::new()));
    let table: MappingTable = [(EntityTypeId(5), PostType::from("student"))]
        .into_iter()
        .collect();
    store.set_table(EntityKind::CaseType, &table).await.unwrap();

    let set = ResolverSet::load(store, Arc::new(ScriptedCrm::new())).await.unwrap();
    assert_eq!(set.get(EntityKind::CaseType).all_mapped(), &table);
}
