use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `civibridge` binary.
#[derive(Debug, Parser)]
#[command(
    name = "civibridge",
    version,
    about = "civibridge - CRM entity type to post type mapping"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .civibridge)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{MappingCommands, ResolveCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["civibridge", "--format", "table", "--verbose", "choices", "activity_type"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Choices(ref args) if args.kind == "activity_type"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["civibridge", "mapping", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Mapping { action: MappingCommands::List { kind: None } }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["civibridge", "--format", "xml", "mapping", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn mapping_set_takes_kind_id_and_post_type() {
        let cli = Cli::try_parse_from(["civibridge", "mapping", "set", "case-type", "5", "student"])
            .expect("cli should parse");
        let Commands::Mapping { action: MappingCommands::Set { kind, id, post_type } } = cli.command else {
            panic!("expected mapping set");
        };
        assert_eq!((kind.as_str(), id, post_type.as_str()), ("case-type", 5, "student"));
    }

    #[test]
    fn resolve_has_both_directions() {
        let cli = Cli::try_parse_from(["civibridge", "resolve", "id", "event_type", "conference"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Resolve { action: ResolveCommands::Id { ref post_type, .. } } if post_type == "conference"
        ));

        let cli = Cli::try_parse_from(["civibridge", "resolve", "post-type", "event_type", "3"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Resolve { action: ResolveCommands::PostType { id: 3, .. } }
        ));
    }

    #[test]
    fn replay_accepts_repeated_fields_and_dry_run() {
        let cli = Cli::try_parse_from([
            "civibridge", "replay", "event.json", "--field", "subject", "--field", "details", "--dry-run",
        ])
        .expect("cli should parse");
        let Commands::Replay(args) = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(args.fields, ["subject", "details"]);
        assert!(args.dry_run);
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["civibridge", "--project", "/tmp/demo", "mapping", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}
