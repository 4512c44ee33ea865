//! Bidirectional mapping between entity-type ids and post types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{EntityTypeId, PostType};

/// Persisted association between entity-type ids and post type names for
/// one entity kind.
///
/// The forward map is authoritative. The reverse map is rebuilt on every
/// mutation so lookups by post type never invert the table. When more than
/// one id names the same post type, the reverse entry points at the highest
/// id; [`MappingTable::conflicts`] reports those cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<EntityTypeId, PostType>",
    into = "BTreeMap<EntityTypeId, PostType>"
)]
pub struct MappingTable {
    forward: BTreeMap<EntityTypeId, PostType>,
    reverse: BTreeMap<PostType, EntityTypeId>,
}

impl MappingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from admin-submitted pairs, rejecting any post type
    /// claimed by two different ids.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MappingConflict`] on the first duplicated post type.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (EntityTypeId, PostType)>,
    {
        let mut table = Self::new();
        for (id, post_type) in pairs {
            if let Some(&existing) = table.reverse.get(&post_type) {
                if existing != id {
                    return Err(CoreError::MappingConflict {
                        post_type,
                        existing,
                        rejected: id,
                    });
                }
            }
            table.insert(id, post_type);
        }
        Ok(table)
    }

    /// Map `id` to `post_type`, replacing any previous post type for `id`.
    /// Returns the replaced post type.
    pub fn insert(&mut self, id: EntityTypeId, post_type: PostType) -> Option<PostType> {
        let previous = self.forward.insert(id, post_type);
        self.rebuild_reverse();
        previous
    }

    /// Remove the mapping for `id` from both directions.
    pub fn remove(&mut self, id: EntityTypeId) -> Option<PostType> {
        let removed = self.forward.remove(&id);
        if removed.is_some() {
            self.rebuild_reverse();
        }
        removed
    }

    #[must_use]
    pub fn post_type_for(&self, id: EntityTypeId) -> Option<&PostType> {
        self.forward.get(&id)
    }

    #[must_use]
    pub fn id_for(&self, post_type: &str) -> Option<EntityTypeId> {
        self.reverse.get(post_type).copied()
    }

    #[must_use]
    pub fn contains_id(&self, id: EntityTypeId) -> bool {
        self.forward.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityTypeId, &PostType)> {
        self.forward.iter().map(|(id, pt)| (*id, pt))
    }

    /// Distinct mapped post types, sorted by name.
    pub fn post_types(&self) -> impl Iterator<Item = &PostType> {
        self.reverse.keys()
    }

    /// Post types claimed by more than one id, with every claiming id.
    #[must_use]
    pub fn conflicts(&self) -> Vec<(PostType, Vec<EntityTypeId>)> {
        let mut claims: BTreeMap<&PostType, Vec<EntityTypeId>> = BTreeMap::new();
        for (id, post_type) in &self.forward {
            claims.entry(post_type).or_default().push(*id);
        }
        claims
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(post_type, ids)| (post_type.clone(), ids))
            .collect()
    }

    fn rebuild_reverse(&mut self) {
        // Ascending id order, so the highest id wins a shared post type.
        self.reverse = self
            .forward
            .iter()
            .map(|(id, post_type)| (post_type.clone(), *id))
            .collect();
    }
}

impl From<BTreeMap<EntityTypeId, PostType>> for MappingTable {
    fn from(forward: BTreeMap<EntityTypeId, PostType>) -> Self {
        let mut table = Self {
            forward,
            reverse: BTreeMap::new(),
        };
        table.rebuild_reverse();
        table
    }
}

impl From<MappingTable> for BTreeMap<EntityTypeId, PostType> {
    fn from(table: MappingTable) -> Self {
        table.forward
    }
}

impl FromIterator<(EntityTypeId, PostType)> for MappingTable {
    fn from_iter<T: IntoIterator<Item = (EntityTypeId, PostType)>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(pairs: &[(i64, &str)]) -> MappingTable {
        pairs
            .iter()
            .map(|(id, pt)| (EntityTypeId(*id), PostType::from(*pt)))
            .collect()
    }

    #[test]
    fn lookups_work_in_both_directions() {
        let t = table(&[(5, "student"), (9, "mentor")]);
        assert_eq!(t.post_type_for(EntityTypeId(5)).map(PostType::as_str), Some("student"));
        assert_eq!(t.id_for("mentor"), Some(EntityTypeId(9)));
        assert_eq!(t.id_for("tutor"), None);
        assert_eq!(t.post_type_for(EntityTypeId(1)), None);
    }

    #[test]
    fn remove_clears_forward_and_reverse() {
        let mut t = table(&[(5, "student")]);
        assert_eq!(t.remove(EntityTypeId(5)), Some(PostType::from("student")));
        assert!(!t.contains_id(EntityTypeId(5)));
        assert_eq!(t.id_for("student"), None);
        assert!(t.is_empty());
    }

    #[test]
    fn insert_replaces_and_drops_stale_reverse_entry() {
        let mut t = table(&[(5, "student")]);
        let previous = t.insert(EntityTypeId(5), PostType::from("alumnus"));
        assert_eq!(previous, Some(PostType::from("student")));
        assert_eq!(t.id_for("student"), None);
        assert_eq!(t.id_for("alumnus"), Some(EntityTypeId(5)));
    }

    #[test]
    fn shared_post_type_resolves_to_highest_id_and_is_reported() {
        let t = table(&[(3, "event"), (8, "event"), (4, "talk")]);
        assert_eq!(t.id_for("event"), Some(EntityTypeId(8)));
        assert_eq!(
            t.conflicts(),
            vec![(PostType::from("event"), vec![EntityTypeId(3), EntityTypeId(8)])]
        );
    }

    #[test]
    fn strict_constructor_rejects_duplicates() {
        let err = MappingTable::try_from_pairs([
            (EntityTypeId(1), PostType::from("event")),
            (EntityTypeId(2), PostType::from("event")),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::MappingConflict { existing: EntityTypeId(1), rejected: EntityTypeId(2), .. }
        ));
    }

    #[test]
    fn strict_constructor_accepts_repeated_identical_pair() {
        let t = MappingTable::try_from_pairs([
            (EntityTypeId(1), PostType::from("event")),
            (EntityTypeId(1), PostType::from("event")),
        ])
        .unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn serializes_as_string_keyed_object() {
        let t = table(&[(5, "student"), (12, "mentor")]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"5":"student","12":"mentor"}"#);

        let back: MappingTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.id_for("mentor"), Some(EntityTypeId(12)));
    }
}
