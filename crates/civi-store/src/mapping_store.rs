//! Per-kind mapping tables persisted in the settings store.

use std::sync::Arc;

use civi_core::{CoreError, EntityKind, EntityTypeId, MappingTable, PostType};

use crate::error::StoreError;
use crate::settings::SettingsStore;

/// Reads and writes one [`MappingTable`] per entity kind.
///
/// Tables are stored as JSON objects under the kind's settings key and are
/// always replaced wholesale. An absent key reads back as an empty table.
#[derive(Clone)]
pub struct MappingStore {
    settings: Arc<dyn SettingsStore>,
}

impl MappingStore {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// Load the table for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored value is not a JSON object
    /// of id → post type, or a storage error from the backend.
    pub async fn get_table(&self, kind: EntityKind) -> Result<MappingTable, StoreError> {
        let key = kind.spec().settings_key;
        let Some(raw) = self.settings.get(key).await? else {
            return Ok(MappingTable::new());
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Replace the table for `kind`. Saving an empty table deletes the key.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the backend.
    pub async fn set_table(&self, kind: EntityKind, table: &MappingTable) -> Result<(), StoreError> {
        let key = kind.spec().settings_key;
        if table.is_empty() {
            return self.settings.delete(key).await;
        }
        for (post_type, ids) in table.conflicts() {
            tracing::warn!(%kind, %post_type, ?ids, "post type mapped from more than one entity type");
        }
        let raw = serde_json::to_string(table).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.settings.set(key, &raw).await?;
        tracing::debug!(%kind, entries = table.len(), "mapping table saved");
        Ok(())
    }

    /// Remove every mapping for `kind`.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the backend.
    pub async fn clear_table(&self, kind: EntityKind) -> Result<(), StoreError> {
        self.settings.delete(kind.spec().settings_key).await
    }

    /// Drop the mapping for a single id and save the table. Returns the post
    /// type that was unmapped, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage or decode error from [`Self::get_table`] /
    /// [`Self::set_table`].
    pub async fn remove_entry(
        &self,
        kind: EntityKind,
        id: EntityTypeId,
    ) -> Result<Option<PostType>, StoreError> {
        let mut table = self.get_table(kind).await?;
        let removed = table.remove(id);
        if removed.is_some() {
            self.set_table(kind, &table).await?;
        }
        Ok(removed)
    }

    /// Map a single id to a post type, keeping the rest of the table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] when another id already owns `post_type`,
    /// or a storage error.
    pub async fn upsert_entry(
        &self,
        kind: EntityKind,
        id: EntityTypeId,
        post_type: PostType,
    ) -> Result<MappingTable, StoreError> {
        let mut table = self.get_table(kind).await?;
        // Only the post type being written is checked; conflicts already in
        // the stored table are left for `set_table` to warn about.
        if let Some((existing, _)) = table
            .iter()
            .find(|(other, pt)| *other != id && **pt == post_type)
        {
            return Err(CoreError::MappingConflict {
                post_type,
                existing,
                rejected: id,
            }
            .into());
        }
        table.insert(id, post_type);
        self.set_table(kind, &table).await?;
        Ok(table)
    }

    /// Save a settings-form submission for `kind`: the whole table is replaced
    /// by the submitted pairs, which must not map one post type twice.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] on a duplicated post type (nothing is
    /// saved), or a storage error.
    pub async fn apply_submission<I>(
        &self,
        kind: EntityKind,
        pairs: I,
    ) -> Result<MappingTable, StoreError>
    where
        I: IntoIterator<Item = (EntityTypeId, PostType)> + Send,
    {
        let table = MappingTable::try_from_pairs(pairs)?;
        self.set_table(kind, &table).await?;
        Ok(table)
    }
}
