//! Local replica of the server-owned unit collection.
//!
//! - Insertion order is display order.
//! - Updates replace in place and never reorder.
//! - Every apply is idempotent under redelivery.
//! - The last message processed wins; the server is the only ordering
//!   authority, arrival order is taken as logical order.
//!
//! The store never emits outbound traffic. Consumers poll [`CollectionStore::revision`]
//! to learn that the replica changed.

use indexmap::IndexMap;

use crate::unit::{GeneratorUnit, UnitId};

/// Authoritative local replica.
#[derive(Debug, Default)]
pub struct CollectionStore {
    units: IndexMap<UnitId, GeneratorUnit>,

    /// Bumped on every apply that changed the replica.
    revision: u64,
}

impl CollectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        CollectionStore::default()
    }

    /// Replace the entire replica. Prior contents are discarded, no diffing.
    pub fn apply_snapshot(&mut self, units: Vec<GeneratorUnit>) {
        self.units = units.into_iter().map(|u| (u.id, u)).collect();
        self.bump();
    }

    /// Append a new unit, or replace in place if this id was already
    /// delivered.
    pub fn apply_insert(&mut self, unit: GeneratorUnit) {
        if self.units.get(&unit.id) == Some(&unit) {
            return;
        }
        // `IndexMap::insert` keeps the slot of an existing key.
        self.units.insert(unit.id, unit);
        self.bump();
    }

    /// Replace the unit with the same id. Unknown ids are ignored.
    ///
    /// Returns false for an unknown id. A redelivered identical unit is
    /// accepted without bumping the revision.
    pub fn apply_update(&mut self, unit: GeneratorUnit) -> bool {
        match self.units.get_mut(&unit.id) {
            Some(slot) => {
                if *slot != unit {
                    *slot = unit;
                    self.bump();
                }
                true
            }
            None => false,
        }
    }

    /// Remove the unit with `id`, keeping the relative order of the rest.
    /// Unknown ids are ignored.
    ///
    /// Returns whether anything changed.
    pub fn apply_delete(&mut self, id: UnitId) -> bool {
        if self.units.shift_remove(&id).is_some() {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Current units in display order.
    pub fn snapshot(&self) -> Vec<&GeneratorUnit> {
        self.units.values().collect()
    }

    pub fn get(&self, id: UnitId) -> Option<&GeneratorUnit> {
        self.units.get(&id)
    }

    /// Unit at display position `index`.
    pub fn get_index(&self, index: usize) -> Option<&GeneratorUnit> {
        self.units.get_index(index).map(|(_, u)| u)
    }

    pub fn ids(&self) -> Vec<UnitId> {
        self.units.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Change counter for polling consumers.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit(id: i64, name: &str) -> GeneratorUnit {
        GeneratorUnit::new(id, name, 1, 100, vec![5, 6])
    }

    fn names(store: &CollectionStore) -> Vec<String> {
        store.snapshot().into_iter().map(|u| u.name.clone()).collect()
    }

    #[test]
    fn insert_appends_in_arrival_order() {
        let mut store = CollectionStore::new();
        store.apply_insert(unit(3, "c"));
        store.apply_insert(unit(1, "a"));

        assert_eq!(names(&store), vec!["c", "a"]);
    }

    #[test]
    fn duplicate_insert_replaces_in_place() {
        let mut store = CollectionStore::new();
        store.apply_insert(unit(1, "a"));
        store.apply_insert(unit(2, "b"));
        store.apply_insert(unit(1, "a2"));

        assert_eq!(names(&store), vec!["a2", "b"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn redelivery_keeps_revision() {
        let mut store = CollectionStore::new();
        store.apply_insert(unit(1, "a"));
        let revision = store.revision();

        store.apply_insert(unit(1, "a"));
        assert!(store.apply_update(unit(1, "a")));
        assert_eq!(store.revision(), revision);

        store.apply_insert(unit(1, "a2"));
        assert_eq!(store.revision(), revision + 1);
    }

    #[test]
    fn update_preserves_position() {
        let mut store = CollectionStore::new();
        store.apply_snapshot(vec![unit(1, "a"), unit(2, "b"), unit(3, "c")]);

        assert!(store.apply_update(unit(2, "B")));
        assert_eq!(names(&store), vec!["a", "B", "c"]);
    }

    #[test]
    fn update_of_unknown_id_is_noop() {
        let mut store = CollectionStore::new();
        store.apply_insert(unit(1, "a"));
        let before = store.revision();

        assert!(!store.apply_update(unit(9, "ghost")));
        assert_eq!(store.revision(), before);
        assert!(store.get(UnitId(9)).is_none());
    }

    #[test]
    fn delete_keeps_relative_order() {
        let mut store = CollectionStore::new();
        store.apply_snapshot(vec![unit(1, "a"), unit(2, "b"), unit(3, "c")]);

        assert!(store.apply_delete(UnitId(1)));
        assert!(!store.apply_delete(UnitId(1)));
        assert_eq!(names(&store), vec!["b", "c"]);
    }

    #[test]
    fn delete_then_stale_update_leaves_id_absent() {
        let mut store = CollectionStore::new();
        store.apply_insert(unit(1, "A"));
        store.apply_delete(UnitId(1));
        store.apply_update(unit(1, "late"));

        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_is_absorbing() {
        let mut store = CollectionStore::new();
        store.apply_insert(unit(1, "a"));
        store.apply_insert(unit(2, "b"));
        store.apply_delete(UnitId(1));
        store.apply_update(unit(2, "b2"));

        store.apply_snapshot(vec![unit(7, "x"), unit(8, "y")]);

        assert_eq!(store.ids(), vec![UnitId(7), UnitId(8)]);
        assert_eq!(names(&store), vec!["x", "y"]);
    }

    #[test]
    fn revision_tracks_changes() {
        let mut store = CollectionStore::new();
        assert_eq!(store.revision(), 0);

        store.apply_snapshot(vec![]);
        store.apply_insert(unit(1, "a"));
        store.apply_delete(UnitId(5));

        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn get_index_follows_display_order() {
        let mut store = CollectionStore::new();
        store.apply_snapshot(vec![unit(4, "d"), unit(2, "b")]);

        assert_eq!(store.get_index(0).map(|u| u.id), Some(UnitId(4)));
        assert_eq!(store.get_index(2), None);
    }
}
