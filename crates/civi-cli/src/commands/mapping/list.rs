use civi_core::{Choice, EntityKind, EntityTypeId, PostType};
use civi_resolver::{EntityResolver, RequestCache};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct MappingRow {
    kind: &'static str,
    id: EntityTypeId,
    post_type: PostType,
    /// CRM label, when the CRM is reachable and still knows the id.
    label: Option<String>,
}

#[derive(Debug, Serialize)]
struct MappingListResponse {
    mappings: Vec<MappingRow>,
}

pub async fn run(kind: Option<EntityKind>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let with_labels = ctx.config.crm.is_configured();
    let mut cache = RequestCache::new();
    let mut mappings = Vec::new();

    for resolver in ctx.resolvers.iter().filter(|r| kind.is_none_or(|k| r.kind() == k)) {
        if resolver.all_mapped().is_empty() {
            continue;
        }
        let choices = if with_labels {
            resolver.choices_or_empty(&mut cache).await
        } else {
            Vec::new()
        };
        mappings.extend(rows(resolver, &choices));
    }

    output(&MappingListResponse { mappings }, flags.format)
}

fn rows(resolver: &EntityResolver, choices: &[Choice]) -> Vec<MappingRow> {
    resolver
        .all_mapped()
        .iter()
        .map(|(id, post_type)| MappingRow {
            kind: resolver.kind().as_str(),
            id,
            post_type: post_type.clone(),
            label: choices
                .iter()
                .find(|choice| choice.id == id)
                .map(|choice| choice.label.clone()),
        })
        .collect()
}
