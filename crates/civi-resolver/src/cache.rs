//! Per-pass memoization of CRM lookups.

use std::collections::HashMap;
use std::sync::Arc;

use civi_core::{EntityKind, EntityTypeDescriptor};

/// Short-lived cache for one synchronization pass.
///
/// Created by whoever starts the pass and handed to resolver calls by
/// reference; dropping it (or calling [`RequestCache::clear`]) is the
/// invalidation boundary. Nothing is shared across passes.
#[derive(Debug, Default)]
pub struct RequestCache {
    descriptors: HashMap<EntityKind, Arc<[EntityTypeDescriptor]>>,
    hits: usize,
    fetches: usize,
}

impl RequestCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn descriptors(&mut self, kind: EntityKind) -> Option<Arc<[EntityTypeDescriptor]>> {
        let cached = self.descriptors.get(&kind).cloned();
        if cached.is_some() {
            self.hits += 1;
            tracing::debug!(%kind, "descriptor cache hit");
        }
        cached
    }

    pub(crate) fn store_descriptors(
        &mut self,
        kind: EntityKind,
        descriptors: Vec<EntityTypeDescriptor>,
    ) -> Arc<[EntityTypeDescriptor]> {
        self.fetches += 1;
        let shared: Arc<[EntityTypeDescriptor]> = descriptors.into();
        self.descriptors.insert(kind, Arc::clone(&shared));
        shared
    }

    /// Lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that went to the CRM and were stored.
    #[must_use]
    pub const fn fetches(&self) -> usize {
        self.fetches
    }

    /// Drop everything cached so far.
    pub fn clear(&mut self) {
        self.descriptors.clear();
    }
}
