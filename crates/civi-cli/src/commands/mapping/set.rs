use anyhow::Context;
use civi_core::{EntityKind, EntityTypeId};
use civi_resolver::RequestCache;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_post_type;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    kind: EntityKind,
    id: i64,
    post_type: &str,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let post_type = parse_post_type(post_type)?;
    let id = EntityTypeId(id);

    if ctx.config.crm.is_configured() {
        match ctx.resolvers.get(kind).descriptor(id, &mut RequestCache::new()).await {
            Ok(Some(_)) => {}
            Ok(None) => tracing::warn!(%kind, %id, "the CRM has no active entity type with this id"),
            Err(error) => tracing::warn!(%kind, %id, %error, "could not verify entity type"),
        }
    }

    let table = ctx
        .store
        .upsert_entry(kind, id, post_type.clone())
        .await
        .with_context(|| format!("failed to map {kind} {id} to '{post_type}'"))?;
    ctx.resolvers.reload(kind).await?;

    output(
        &json!({"kind": kind, "id": id, "post_type": post_type, "entries": table.len()}),
        flags.format,
    )
}
