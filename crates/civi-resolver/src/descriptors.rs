//! Fetching live entity-type descriptors from the CRM.

use civi_api::{ApiRequest, CrmApi, as_i64_lenient};
use civi_core::{DescriptorSource, EntityTypeDescriptor, EntityTypeId, KindSpec};
use serde_json::Value;

use crate::error::ResolverError;

/// Build the `get` request listing every active entity type of a kind.
pub(crate) fn list_request(spec: &KindSpec) -> ApiRequest {
    match spec.source {
        DescriptorSource::OptionGroup(group) => ApiRequest::new("OptionValue", "get")
            .param("option_group_id", group)
            .param("is_active", 1)
            .return_fields(&["id", "value", "name", "label", "weight", "is_active"])
            .limit(0)
            .sort("weight ASC"),
        DescriptorSource::Entity(entity) => ApiRequest::new(entity, "get")
            .param("is_active", 1)
            .limit(0),
    }
}

/// Fetch and sort the descriptors for a kind. Inactive rows are dropped.
pub(crate) async fn fetch(
    api: &dyn CrmApi,
    spec: &KindSpec,
) -> Result<Vec<EntityTypeDescriptor>, ResolverError> {
    let response = api.call(&list_request(spec)).await?;
    let mut descriptors = response
        .values
        .iter()
        .map(|row| parse_row(spec, row))
        .collect::<Result<Vec<_>, _>>()?;
    descriptors.retain(|d| d.is_active);
    descriptors.sort_by(|a, b| a.cmp_by(b, spec.order));
    tracing::debug!(kind = %spec.kind, count = descriptors.len(), "descriptors fetched");
    Ok(descriptors)
}

/// Map one CRM row onto a descriptor.
///
/// Option values are identified by their `value`; dedicated entities by `id`.
/// Labels fall back from `label` to `title` to `name`.
pub(crate) fn parse_row(spec: &KindSpec, row: &Value) -> Result<EntityTypeDescriptor, ResolverError> {
    let malformed = |reason: &str| ResolverError::MalformedRow {
        kind: spec.kind,
        reason: format!("{reason} in {row}"),
    };

    let id_field = match spec.source {
        DescriptorSource::OptionGroup(_) => "value",
        DescriptorSource::Entity(_) => "id",
    };
    let id = row
        .get(id_field)
        .and_then(as_i64_lenient)
        .ok_or_else(|| malformed(&format!("missing numeric '{id_field}'")))?;

    let name = text(row, "name").ok_or_else(|| malformed("missing 'name'"))?;
    let label = text(row, "label")
        .or_else(|| text(row, "title"))
        .unwrap_or_else(|| name.clone());

    Ok(EntityTypeDescriptor {
        id: EntityTypeId(id),
        name,
        label,
        weight: row.get("weight").and_then(as_i64_lenient).unwrap_or(0),
        parent_id: row
            .get("parent_id")
            .and_then(as_i64_lenient)
            .map(EntityTypeId),
        is_active: row.get("is_active").is_none_or(|v| match v {
            Value::Bool(b) => *b,
            other => as_i64_lenient(other).is_none_or(|n| n != 0),
        }),
    })
}

fn text(row: &Value, field: &str) -> Option<String> {
    row.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
