mod mapping;
mod resolve;

pub use mapping::MappingCommands;
pub use resolve::ResolveCommands;
