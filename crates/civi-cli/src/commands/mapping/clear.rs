use anyhow::Context;
use civi_core::EntityKind;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(kind: EntityKind, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let cleared = ctx.resolvers.get(kind).all_mapped().len();
    ctx.store
        .clear_table(kind)
        .await
        .with_context(|| format!("failed to clear {kind} mappings"))?;
    ctx.resolvers.reload(kind).await?;

    output(&json!({"kind": kind, "cleared": cleared}), flags.format)
}
