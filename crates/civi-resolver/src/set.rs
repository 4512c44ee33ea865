//! All resolvers, loaded together from the mapping store.

use std::collections::BTreeMap;
use std::sync::Arc;

use civi_api::CrmApi;
use civi_core::EntityKind;
use civi_store::MappingStore;

use crate::error::ResolverError;
use crate::resolver::EntityResolver;

/// One [`EntityResolver`] per entity kind, sharing a CRM handle and store.
#[derive(Clone)]
pub struct ResolverSet {
    store: MappingStore,
    api: Arc<dyn CrmApi>,
    resolvers: BTreeMap<EntityKind, EntityResolver>,
}

impl ResolverSet {
    /// Load every kind's mapping table.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Store`] if any table cannot be read.
    pub async fn load(store: MappingStore, api: Arc<dyn CrmApi>) -> Result<Self, ResolverError> {
        let mut resolvers = BTreeMap::new();
        for kind in EntityKind::ALL {
            let table = store.get_table(kind).await?;
            resolvers.insert(kind, EntityResolver::new(kind, table, Arc::clone(&api)));
        }
        Ok(Self {
            store,
            api,
            resolvers,
        })
    }

    /// The resolver for `kind`.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> &EntityResolver {
        // `load` inserts every kind.
        &self.resolvers[&kind]
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityResolver> {
        self.resolvers.values()
    }

    #[must_use]
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    #[must_use]
    pub fn api(&self) -> &Arc<dyn CrmApi> {
        &self.api
    }

    /// Re-read one kind's table, e.g. after a settings save.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Store`] if the table cannot be read; the
    /// previously loaded table is kept in that case.
    pub async fn reload(&mut self, kind: EntityKind) -> Result<(), ResolverError> {
        let table = self.store.get_table(kind).await?;
        if let Some(resolver) = self.resolvers.get_mut(&kind) {
            resolver.replace_table(table);
        }
        tracing::debug!(%kind, "mapping table reloaded");
        Ok(())
    }
}
