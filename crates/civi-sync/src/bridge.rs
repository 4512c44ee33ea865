//! Mirrors record changes between CRM entities and mapped posts.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use civi_api::{ApiRequest, as_i64_lenient};
use civi_config::SyncConfig;
use civi_core::{
    EntityTypeDescriptor, EntityTypeId, Operation, Origin, PostType, SyncEvent,
    TypeField,
};
use civi_resolver::{EntityResolver, RequestCache, ResolverSet};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::bus::{SyncObserver, SyncPass};
use crate::error::{SyncError, SyncResult};
use crate::field_sink::{FieldSink, PostUpdate};

/// Snapshot key naming the post type on post-side events.
pub const POST_TYPE_KEY: &str = "post_type";

/// Separator the CRM uses inside multi-valued string fields.
const VALUE_SEPARATOR: char = '\u{1}';

/// Why the bridge left an event alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The event's entity is not classified by any mapped kind.
    UnmappedEntity { entity: String },
    /// The direction is switched off in `[sync]`.
    DirectionDisabled { origin: Origin },
    /// The snapshot does not say which entity type or post type it is.
    NoTypeField { field: String },
    /// The entity type is not mapped to any post type.
    UnmappedType { id: EntityTypeId },
    /// None of the contact's types or sub-types is mapped.
    UnmappedContactTypes { names: Vec<String> },
    /// The post type is not mapped to any entity type.
    UnmappedPostType { post_type: String },
    /// The CRM has no entity type with the mapped id.
    UnknownType { id: EntityTypeId },
    /// None of the record's fields exist on the post type.
    NoFields { post_type: PostType },
    /// A delete without the CRM record id.
    NoRecordId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedEntity { entity } => write!(f, "{entity} records are not mapped"),
            Self::DirectionDisabled { origin } => write!(f, "sync from {origin} is disabled"),
            Self::NoTypeField { field } => write!(f, "snapshot has no '{field}'"),
            Self::UnmappedType { id } => write!(f, "entity type {id} is not mapped"),
            Self::UnmappedContactTypes { names } => {
                write!(f, "contact types {} are not mapped", names.join(", "))
            }
            Self::UnmappedPostType { post_type } => write!(f, "post type '{post_type}' is not mapped"),
            Self::UnknownType { id } => write!(f, "entity type {id} does not exist in the CRM"),
            Self::NoFields { post_type } => write!(f, "no fields on '{post_type}' to update"),
            Self::NoRecordId => f.write_str("delete carries no CRM record id"),
        }
    }
}

/// What the bridge did with one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BridgeOutcome {
    /// Field values were written into a post.
    Applied { post_type: PostType, fields: usize },
    /// The change was written to the CRM.
    Pushed {
        entity: String,
        action: String,
        entity_type_id: EntityTypeId,
        crm_id: Option<i64>,
    },
    Skipped(SkipReason),
}

/// Observer translating events through the mapping tables.
///
/// CRM-side changes are written into the mapped post through the
/// [`FieldSink`]; post-side changes become `<Entity>.create` or
/// `<Entity>.delete` calls on the CRM.
pub struct MappingBridge {
    resolvers: ResolverSet,
    sink: Arc<dyn FieldSink>,
    config: SyncConfig,
}

impl MappingBridge {
    pub fn new(resolvers: ResolverSet, sink: Arc<dyn FieldSink>, config: SyncConfig) -> Self {
        Self {
            resolvers,
            sink,
            config,
        }
    }

    #[must_use]
    pub const fn resolvers(&self) -> &ResolverSet {
        &self.resolvers
    }

    /// Handle one event and say what was done.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the event has no usable snapshot, a CRM
    /// lookup or write fails, or the field sink rejects the update. Events the
    /// mapping does not cover are not errors; they come back as
    /// [`BridgeOutcome::Skipped`].
    pub async fn handle(&self, event: &SyncEvent, pass: &mut SyncPass) -> SyncResult<BridgeOutcome> {
        let Some(kind) = event.kind() else {
            return Ok(skip(SkipReason::UnmappedEntity {
                entity: event.entity.clone(),
            }));
        };
        let enabled = match event.origin {
            Origin::Crm => self.config.push_to_posts,
            Origin::Post => self.config.push_to_crm,
        };
        if !enabled {
            return Ok(skip(SkipReason::DirectionDisabled {
                origin: event.origin,
            }));
        }

        let snapshot = event
            .snapshot()
            .ok_or_else(|| SyncError::MissingSnapshot {
                entity: event.entity.clone(),
                operation: event.operation,
            })?
            .as_object()
            .ok_or_else(|| SyncError::Snapshot(format!("{} snapshot is not an object", event.entity)))?;

        let resolver = self.resolvers.get(kind);
        match event.origin {
            Origin::Crm => self.to_post(resolver, event, snapshot, pass.cache()).await,
            Origin::Post => self.to_crm(resolver, event, snapshot, pass.cache()).await,
        }
    }

    async fn to_post(
        &self,
        resolver: &EntityResolver,
        event: &SyncEvent,
        snapshot: &Map<String, Value>,
        cache: &mut RequestCache,
    ) -> SyncResult<BridgeOutcome> {
        let type_id = match resolver.spec().type_field {
            TypeField::Id(field) => {
                let Some(id) = snapshot.get(field).and_then(as_i64_lenient) else {
                    return Ok(skip(SkipReason::NoTypeField {
                        field: field.to_string(),
                    }));
                };
                EntityTypeId(id)
            }
            TypeField::ContactTypeName => {
                let names = contact_type_names(snapshot);
                if names.is_empty() {
                    return Ok(skip(SkipReason::NoTypeField {
                        field: "contact_type".to_string(),
                    }));
                }
                match first_mapped_contact_type(resolver, &names, cache).await? {
                    Some(id) => id,
                    None => return Ok(skip(SkipReason::UnmappedContactTypes { names })),
                }
            }
        };

        let Some(post_type) = resolver.post_type_for_id(type_id).cloned() else {
            return Ok(skip(SkipReason::UnmappedType { id: type_id }));
        };

        let values = if event.operation == Operation::Delete {
            Map::new()
        } else {
            let fields = self.sink.fields_for_post(&post_type).await?;
            let values: Map<String, Value> = snapshot
                .iter()
                .filter(|(key, _)| fields.iter().any(|f| f == *key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            if values.is_empty() {
                return Ok(skip(SkipReason::NoFields { post_type }));
            }
            values
        };

        let update = PostUpdate {
            post_type: post_type.clone(),
            entity: event.entity.clone(),
            record_id: event.record_id,
            entity_type_id: type_id,
            operation: event.operation,
            values,
        };
        self.sink.apply(&update).await?;
        tracing::debug!(
            entity = %event.entity,
            record_id = event.record_id,
            %post_type,
            fields = update.values.len(),
            "crm change applied to post"
        );
        Ok(BridgeOutcome::Applied {
            post_type,
            fields: update.values.len(),
        })
    }

    async fn to_crm(
        &self,
        resolver: &EntityResolver,
        event: &SyncEvent,
        snapshot: &Map<String, Value>,
        cache: &mut RequestCache,
    ) -> SyncResult<BridgeOutcome> {
        let Some(post_type) = snapshot.get(POST_TYPE_KEY).and_then(Value::as_str) else {
            return Ok(skip(SkipReason::NoTypeField {
                field: POST_TYPE_KEY.to_string(),
            }));
        };
        let Some(type_id) = resolver.id_for_post_type(post_type) else {
            return Ok(skip(SkipReason::UnmappedPostType {
                post_type: post_type.to_string(),
            }));
        };
        let entity = resolver.spec().record_entity;

        let request = if event.operation == Operation::Delete {
            let Some(crm_id) = snapshot.get("id").and_then(as_i64_lenient) else {
                return Ok(skip(SkipReason::NoRecordId));
            };
            ApiRequest::new(entity, "delete").param("id", crm_id)
        } else {
            let mut params: Map<String, Value> = snapshot
                .iter()
                .filter(|(key, _)| key.as_str() != POST_TYPE_KEY)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            match resolver.spec().type_field {
                TypeField::Id(field) => {
                    params.insert(field.to_string(), Value::from(type_id.get()));
                }
                TypeField::ContactTypeName => {
                    let Some(descriptor) = resolver.descriptor(type_id, cache).await? else {
                        return Ok(skip(SkipReason::UnknownType { id: type_id }));
                    };
                    stamp_contact_type(resolver, &descriptor, &mut params, cache).await?;
                }
            }
            ApiRequest::new(entity, "create").params_from(&Value::Object(params))
        };

        let action = request.action.clone();
        let response = self.resolvers.api().call(&request).await?;
        tracing::debug!(
            entity,
            action = %action,
            post_id = event.record_id,
            crm_id = ?response.id,
            "post change pushed to crm"
        );
        Ok(BridgeOutcome::Pushed {
            entity: entity.to_string(),
            action,
            entity_type_id: type_id,
            crm_id: response.id,
        })
    }
}

#[async_trait]
impl SyncObserver for MappingBridge {
    fn name(&self) -> &str {
        "mapping-bridge"
    }

    async fn on_event(&self, event: &SyncEvent, pass: &mut SyncPass) -> Result<(), SyncError> {
        if let BridgeOutcome::Skipped(reason) = self.handle(event, pass).await? {
            tracing::debug!(entity = %event.entity, record_id = event.record_id, %reason, "event skipped");
        }
        Ok(())
    }
}

const fn skip(reason: SkipReason) -> BridgeOutcome {
    BridgeOutcome::Skipped(reason)
}

/// Contact type names on a contact, most specific first: every sub-type,
/// then the top-level type.
fn contact_type_names(snapshot: &Map<String, Value>) -> Vec<String> {
    let mut names = Vec::new();
    match snapshot.get("contact_sub_type") {
        Some(Value::Array(items)) => {
            names.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
        }
        Some(Value::String(joined)) => {
            names.extend(
                joined
                    .split(VALUE_SEPARATOR)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        _ => {}
    }
    if let Some(top) = snapshot
        .get("contact_type")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        names.push(top.to_string());
    }
    names
}

async fn first_mapped_contact_type(
    resolver: &EntityResolver,
    names: &[String],
    cache: &mut RequestCache,
) -> SyncResult<Option<EntityTypeId>> {
    for name in names {
        let descriptor = resolver.descriptor_by_name(name, cache).await?;
        if let Some(id) = descriptor.map(|d| d.id).filter(|id| resolver.is_mapped(*id).is_some()) {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

/// Write a contact type into create params: a sub-type also names its parent
/// as the top-level type.
async fn stamp_contact_type(
    resolver: &EntityResolver,
    descriptor: &EntityTypeDescriptor,
    params: &mut Map<String, Value>,
    cache: &mut RequestCache,
) -> SyncResult<()> {
    let parent = match descriptor.parent_id {
        Some(parent_id) => resolver.descriptor(parent_id, cache).await?,
        None => None,
    };
    match parent {
        Some(parent) => {
            params.insert("contact_type".into(), Value::from(parent.name));
            params.insert("contact_sub_type".into(), Value::from(descriptor.name.clone()));
        }
        None => {
            params.insert("contact_type".into(), Value::from(descriptor.name.clone()));
        }
    }
    Ok(())
}
