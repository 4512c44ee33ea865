use civi_core::EntityTypeId;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ResolveCommands;
use crate::commands::shared::parse::parse_kind;
use crate::context::AppContext;
use crate::output::output;

/// Handle `civibridge resolve`. Answers from the mapping table alone.
pub fn handle(action: &ResolveCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ResolveCommands::PostType { kind, id } => {
            let kind = parse_kind(kind)?;
            let post_type = ctx.resolvers.get(kind).post_type_for_id(EntityTypeId(*id));
            output(
                &json!({"kind": kind, "id": id, "post_type": post_type}),
                flags.format,
            )
        }
        ResolveCommands::Id { kind, post_type } => {
            let kind = parse_kind(kind)?;
            let id = ctx.resolvers.get(kind).id_for_post_type(post_type);
            output(
                &json!({"kind": kind, "post_type": post_type, "id": id}),
                flags.format,
            )
        }
    }
}
