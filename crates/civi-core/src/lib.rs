//! # civi-core
//!
//! Core types shared across all civibridge crates:
//! - Entity-type identifiers and post type names
//! - The closed set of entity kinds and their static per-kind configuration
//! - The bijective mapping table between entity types and post types
//! - Entity-type descriptors and select-control choices
//! - Sync event payloads passed through the observer bus
//! - Cross-cutting error types

pub mod descriptor;
pub mod errors;
pub mod events;
pub mod ids;
pub mod kinds;
pub mod mapping;

pub use descriptor::{Choice, EntityTypeDescriptor, RecordCount};
pub use errors::CoreError;
pub use events::{Operation, Origin, SyncEvent};
pub use ids::{EntityTypeId, PostType};
pub use kinds::{ChoiceOrder, CountFilter, DescriptorSource, EntityKind, KindSpec, TypeField};
pub use mapping::MappingTable;
