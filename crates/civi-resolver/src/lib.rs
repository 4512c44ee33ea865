//! # civi-resolver
//!
//! The entity-to-post-type mapping resolver.
//!
//! One generic [`EntityResolver`] serves every entity kind; the differences
//! between kinds (descriptor source, count filter, choice order) come from the
//! kind's static `KindSpec`. Lookups over the mapping table are pure. The
//! operations that reach the CRM take an explicit [`RequestCache`] scoped to
//! one synchronization pass.

mod cache;
mod descriptors;
mod error;
mod resolver;
mod set;

pub use cache::RequestCache;
pub use error::ResolverError;
pub use resolver::EntityResolver;
pub use set::ResolverSet;
