use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Mapping { action } => commands::mapping::handle(&action, ctx, flags).await,
        Commands::Resolve { action } => commands::resolve::handle(&action, ctx, flags),
        Commands::Choices(args) => commands::choices::handle(&args, ctx, flags).await,
        Commands::Count(args) => commands::count::handle(&args, ctx, flags).await,
        Commands::Replay(args) => commands::replay::handle(&args, ctx, flags).await,
    }
}
