use anyhow::Context;
use civi_core::{EntityKind, EntityTypeId};
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(kind: EntityKind, id: i64, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let id = EntityTypeId(id);
    let removed = ctx
        .store
        .remove_entry(kind, id)
        .await
        .with_context(|| format!("failed to unmap {kind} {id}"))?;
    ctx.resolvers.reload(kind).await?;

    output(&json!({"kind": kind, "id": id, "removed": removed}), flags.format)
}
