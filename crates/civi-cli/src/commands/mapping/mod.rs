mod clear;
mod list;
mod remove;
mod set;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MappingCommands;
use crate::commands::shared::parse::parse_kind;
use crate::context::AppContext;

/// Handle `civibridge mapping`.
pub async fn handle(
    action: &MappingCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MappingCommands::List { kind } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            list::run(kind, ctx, flags).await
        }
        MappingCommands::Set {
            kind,
            id,
            post_type,
        } => set::run(parse_kind(kind)?, *id, post_type, ctx, flags).await,
        MappingCommands::Remove { kind, id } => {
            remove::run(parse_kind(kind)?, *id, ctx, flags).await
        }
        MappingCommands::Clear { kind } => clear::run(parse_kind(kind)?, ctx, flags).await,
    }
}
