//! The generic per-kind resolver.

use std::sync::Arc;

use civi_api::{ApiRequest, CrmApi};
use civi_core::{
    Choice, CountFilter, EntityKind, EntityTypeDescriptor, EntityTypeId, KindSpec, MappingTable,
    PostType, RecordCount,
};

use crate::cache::RequestCache;
use crate::descriptors;
use crate::error::ResolverError;

/// Answers "which post type is this entity type synced to, and vice versa"
/// for one entity kind.
///
/// Mapping lookups are pure functions of the loaded [`MappingTable`]. Only
/// [`Self::descriptors`], [`Self::choices_for_select`] and [`Self::count`]
/// reach the CRM.
#[derive(Clone)]
pub struct EntityResolver {
    spec: &'static KindSpec,
    table: MappingTable,
    api: Arc<dyn CrmApi>,
}

impl EntityResolver {
    pub fn new(kind: EntityKind, table: MappingTable, api: Arc<dyn CrmApi>) -> Self {
        Self {
            spec: kind.spec(),
            table,
            api,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.spec.kind
    }

    #[must_use]
    pub const fn spec(&self) -> &'static KindSpec {
        self.spec
    }

    /// The whole mapping table.
    #[must_use]
    pub const fn all_mapped(&self) -> &MappingTable {
        &self.table
    }

    pub(crate) fn replace_table(&mut self, table: MappingTable) {
        self.table = table;
    }

    #[must_use]
    pub fn id_for_post_type(&self, post_type: &str) -> Option<EntityTypeId> {
        self.table.id_for(post_type)
    }

    #[must_use]
    pub fn post_type_for_id(&self, id: EntityTypeId) -> Option<&PostType> {
        self.table.post_type_for(id)
    }

    /// The post type `id` is synced to; `None` when it is not mapped.
    #[must_use]
    pub fn is_mapped(&self, id: EntityTypeId) -> Option<&PostType> {
        self.table.post_type_for(id)
    }

    /// Distinct post types this kind syncs to.
    pub fn mapped_post_types(&self) -> impl Iterator<Item = &PostType> {
        self.table.post_types()
    }

    /// Every active entity type of this kind, in choice order. Fetched from
    /// the CRM at most once per pass.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError`] when the CRM call fails or returns rows that
    /// cannot be read. Failures are not cached.
    pub async fn descriptors(
        &self,
        cache: &mut RequestCache,
    ) -> Result<Arc<[EntityTypeDescriptor]>, ResolverError> {
        if let Some(cached) = cache.descriptors(self.kind()) {
            return Ok(cached);
        }
        let fetched = descriptors::fetch(self.api.as_ref(), self.spec).await?;
        Ok(cache.store_descriptors(self.kind(), fetched))
    }

    /// Look up one entity type by id.
    ///
    /// `Ok(None)` means the CRM has no active entity type with that id.
    ///
    /// # Errors
    ///
    /// Same as [`Self::descriptors`].
    pub async fn descriptor(
        &self,
        id: EntityTypeId,
        cache: &mut RequestCache,
    ) -> Result<Option<EntityTypeDescriptor>, ResolverError> {
        Ok(self
            .descriptors(cache)
            .await?
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    /// Look up one entity type by machine name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Same as [`Self::descriptors`].
    pub async fn descriptor_by_name(
        &self,
        name: &str,
        cache: &mut RequestCache,
    ) -> Result<Option<EntityTypeDescriptor>, ResolverError> {
        Ok(self
            .descriptors(cache)
            .await?
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    /// `(id, label)` pairs for a select control, sorted by the kind's order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::descriptors`]. An empty `Ok` means the CRM has no
    /// active entity types of this kind.
    pub async fn choices_for_select(
        &self,
        cache: &mut RequestCache,
    ) -> Result<Vec<Choice>, ResolverError> {
        Ok(self.descriptors(cache).await?.iter().map(Choice::from).collect())
    }

    /// Like [`Self::choices_for_select`] but logs a failure and returns an
    /// empty list, for callers that render a control either way.
    pub async fn choices_or_empty(&self, cache: &mut RequestCache) -> Vec<Choice> {
        self.choices_for_select(cache).await.unwrap_or_else(|error| {
            tracing::warn!(kind = %self.kind(), %error, "choices unavailable");
            Vec::new()
        })
    }

    /// Mapped entity types with their descriptors, in choice order. Mapped ids
    /// the CRM no longer knows are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::descriptors`].
    pub async fn mapped_descriptors(
        &self,
        cache: &mut RequestCache,
    ) -> Result<Vec<(EntityTypeDescriptor, PostType)>, ResolverError> {
        Ok(self
            .descriptors(cache)
            .await?
            .iter()
            .filter_map(|d| self.table.post_type_for(d.id).map(|pt| (d.clone(), pt.clone())))
            .collect())
    }

    /// Count CRM records of entity type `id`.
    ///
    /// Never fails: a CRM failure is logged and reported as
    /// [`RecordCount::Unknown`], which callers can tell apart from a real zero.
    pub async fn count(&self, id: EntityTypeId) -> RecordCount {
        match self.try_count(id).await {
            Ok(n) => RecordCount::Known(n),
            Err(error) => {
                tracing::warn!(kind = %self.kind(), %id, %error, "record count unavailable");
                RecordCount::Unknown
            }
        }
    }

    async fn try_count(&self, id: EntityTypeId) -> Result<u64, ResolverError> {
        let request = match self.spec.count_filter {
            CountFilter::ById(field) => {
                ApiRequest::new(self.spec.record_entity, "getcount").param(field, id.get())
            }
            CountFilter::ByContactTypeName => {
                let Some(contact_type) = self.contact_type_by_id(id).await? else {
                    return Ok(0);
                };
                let field = if contact_type.parent_id.is_some() {
                    "contact_sub_type"
                } else {
                    "contact_type"
                };
                ApiRequest::new(self.spec.record_entity, "getcount").param(field, contact_type.name)
            }
        };
        Ok(self.api.call(&request).await?.count_value()?)
    }

    /// Fetch a single contact type by id without touching the pass cache.
    async fn contact_type_by_id(
        &self,
        id: EntityTypeId,
    ) -> Result<Option<EntityTypeDescriptor>, ResolverError> {
        let request = ApiRequest::new("ContactType", "get").param("id", id.get());
        match self.api.call(&request).await?.single()? {
            Some(row) => Ok(Some(descriptors::parse_row(self.spec, &row)?)),
            None => Ok(None),
        }
    }
}
