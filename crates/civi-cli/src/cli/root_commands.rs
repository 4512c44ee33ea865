use clap::{Args, Subcommand};

use crate::cli::subcommands::{MappingCommands, ResolveCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Inspect and edit mapping tables.
    Mapping {
        #[command(subcommand)]
        action: MappingCommands,
    },
    /// Resolve a mapping in either direction.
    Resolve {
        #[command(subcommand)]
        action: ResolveCommands,
    },
    /// List the CRM's entity types of a kind, as a select control would.
    Choices(ChoicesArgs),
    /// Count CRM records of one entity type.
    Count(CountArgs),
    /// Replay recorded sync events through the mapping bridge.
    Replay(ReplayArgs),
}

/// Arguments for `civibridge choices`.
#[derive(Clone, Debug, Args)]
pub struct ChoicesArgs {
    /// Entity kind (activity_type, case_type, event_type, participant_role, contact_type).
    pub kind: String,
}

/// Arguments for `civibridge count`.
#[derive(Clone, Debug, Args)]
pub struct CountArgs {
    pub kind: String,
    /// Entity type id.
    pub id: i64,
}

/// Arguments for `civibridge replay`.
#[derive(Clone, Debug, Args)]
pub struct ReplayArgs {
    /// JSON file holding one event or an array of events.
    pub file: String,
    /// Field carried by the target post type; repeat per field.
    #[arg(long = "field")]
    pub fields: Vec<String>,
    /// Forward CRM reads but only record writes.
    #[arg(long)]
    pub dry_run: bool,
}
