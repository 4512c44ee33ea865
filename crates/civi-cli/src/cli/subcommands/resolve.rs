use clap::Subcommand;

/// Mapping lookups.
#[derive(Clone, Debug, Subcommand)]
pub enum ResolveCommands {
    /// Post type an entity type is synced to.
    PostType { kind: String, id: i64 },
    /// Entity type a post type is synced from.
    Id { kind: String, post_type: String },
}
