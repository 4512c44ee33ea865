use clap::Subcommand;

/// Mapping table management.
#[derive(Clone, Debug, Subcommand)]
pub enum MappingCommands {
    /// List mapped entity types.
    List {
        /// Only this kind (all kinds if omitted).
        kind: Option<String>,
    },
    /// Map an entity type to a post type.
    Set {
        kind: String,
        id: i64,
        post_type: String,
    },
    /// Unmap one entity type.
    Remove { kind: String, id: i64 },
    /// Remove every mapping of a kind.
    Clear { kind: String },
}
