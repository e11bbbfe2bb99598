//! Generic entity store with tombstoning.
//!
//! ## Id namespace is append-only
//!
//! Once an id has been used it can never be used again, even after
//! deletion. `delete` replaces the record with a tombstone: the id becomes
//! invisible to `get`/`update`/`delete` but still blocks `create`. This is
//! a deliberate simplification standing in for what a real backend would
//! enforce with a unique index over all history, soft-deleted rows
//! included.
//!
//! ## Thread safety
//!
//! All rows live behind one `parking_lot::RwLock`. `create` is a
//! check-then-insert under a single write lock, so two concurrent creates
//! can never both succeed with the same id.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracevault_core::{Error, Result};

/// A row slot: either a live record or the tombstone left by a delete.
#[derive(Debug, Clone)]
enum Slot<T> {
    Live(T),
    Tombstone,
}

/// In-memory `<id, record>` store for one entity type.
#[derive(Debug)]
pub struct EntityStore<T> {
    /// Entity type name used in error messages ("ModelClass", …)
    kind: &'static str,
    rows: RwLock<HashMap<String, Slot<T>>>,
}

impl<T: Clone> EntityStore<T> {
    /// Create an empty store for the named entity type.
    pub fn new(kind: &'static str) -> Self {
        EntityStore {
            kind,
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// The entity type name this store reports in errors.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Insert a new record under `id`.
    ///
    /// Fails with `AlreadyExists` if the id has EVER been used, live or
    /// tombstoned. Atomic: the existence check and the insert happen under
    /// one write lock.
    pub fn create(&self, id: &str, record: T) -> Result<()> {
        let mut rows = self.rows.write();
        if rows.contains_key(id) {
            return Err(Error::AlreadyExists {
                kind: self.kind,
                id: id.to_string(),
            });
        }
        rows.insert(id.to_string(), Slot::Live(record));
        Ok(())
    }

    /// Read the live record under `id`.
    ///
    /// `NotFound` if the id is absent or tombstoned.
    pub fn get(&self, id: &str) -> Result<T> {
        match self.rows.read().get(id) {
            Some(Slot::Live(record)) => Ok(record.clone()),
            _ => Err(self.not_found(id)),
        }
    }

    /// Apply a mutation to the live record under `id`.
    ///
    /// `NotFound` under the same visibility rule as [`EntityStore::get`].
    pub fn update(&self, id: &str, mutate: impl FnOnce(&mut T)) -> Result<()> {
        let mut rows = self.rows.write();
        match rows.get_mut(id) {
            Some(Slot::Live(record)) => {
                mutate(record);
                Ok(())
            }
            _ => Err(self.not_found(id)),
        }
    }

    /// Tombstone the live record under `id`.
    ///
    /// The id stays consumed forever; `NotFound` if the id never existed or
    /// is already tombstoned.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.write();
        match rows.get_mut(id) {
            Some(slot @ Slot::Live(_)) => {
                *slot = Slot::Tombstone;
                Ok(())
            }
            _ => Err(self.not_found(id)),
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.rows
            .read()
            .values()
            .filter(|slot| matches!(slot, Slot::Live(_)))
            .count()
    }

    /// Whether the store holds no live records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn not_found(&self, id: &str) -> Error {
        Error::NotFound {
            kind: self.kind,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store() -> EntityStore<String> {
        EntityStore::new("Widget")
    }

    #[test]
    fn test_create_then_get() {
        let s = store();
        s.create("w1", "blue".to_string()).unwrap();
        assert_eq!(s.get("w1").unwrap(), "blue");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_get_missing_is_not_found_with_kind() {
        let s = store();
        let err = s.get("nope").unwrap_err();
        assert_eq!(err.to_string(), "Widget nope not found");
    }

    #[test]
    fn test_create_duplicate_fails() {
        let s = store();
        s.create("w1", "blue".to_string()).unwrap();
        let err = s.create("w1", "red".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Widget w1 already exists");
        // Original record untouched
        assert_eq!(s.get("w1").unwrap(), "blue");
    }

    #[test]
    fn test_update_mutates_live_record() {
        let s = store();
        s.create("w1", "blue".to_string()).unwrap();
        s.update("w1", |v| v.push_str("-ish")).unwrap();
        assert_eq!(s.get("w1").unwrap(), "blue-ish");
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let s = store();
        assert!(s.update("nope", |_| {}).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_hides_record() {
        let s = store();
        s.create("w1", "blue".to_string()).unwrap();
        s.delete("w1").unwrap();
        assert!(s.get("w1").unwrap_err().is_not_found());
        assert!(s.update("w1", |_| {}).unwrap_err().is_not_found());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn test_deleted_id_is_never_reusable() {
        let s = store();
        s.create("w1", "blue".to_string()).unwrap();
        s.delete("w1").unwrap();
        // get says NotFound, yet the id is still consumed.
        assert!(s.get("w1").unwrap_err().is_not_found());
        let err = s.create("w1", "red".to_string()).unwrap_err();
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_delete_missing_or_tombstoned_is_not_found() {
        let s = store();
        assert!(s.delete("never").unwrap_err().is_not_found());
        s.create("w1", "blue".to_string()).unwrap();
        s.delete("w1").unwrap();
        assert!(s.delete("w1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_concurrent_creates_same_id_one_winner() {
        let s = Arc::new(EntityStore::<u32>::new("Widget"));
        let mut handles = Vec::new();
        for i in 0..8u32 {
            let s = Arc::clone(&s);
            handles.push(std::thread::spawn(move || s.create("contested", i).is_ok()));
        }
        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(wins, 1, "exactly one create may win");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EntityStore<String>>();
    }
}
