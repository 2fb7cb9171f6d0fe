//! In-memory [`KeyValueStore`] implementation.

use crate::{KeyValueStore, StorageError, StorageResult};
use parking_lot::RwLock;
use std::collections::HashMap;

type Records = HashMap<String, Vec<Vec<u8>>>;

/// An ephemeral key-value store guarded by a single reader-writer lock.
///
/// Readers proceed in parallel; `put`, `delete` and `close` take the lock exclusively. After
/// [`KeyValueStore::close`] the inner map is dropped and the store is permanently unusable.
#[derive(Debug)]
pub struct InMemoryDatabase {
    inner: RwLock<Option<Records>>,
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDatabase {
    /// Creates a new, empty [`InMemoryDatabase`].
    pub fn new() -> Self {
        Self { inner: RwLock::new(Some(HashMap::new())) }
    }

    /// Returns true once [`KeyValueStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.read().is_none()
    }
}

impl KeyValueStore for InMemoryDatabase {
    fn has(&self, key: &str) -> StorageResult<bool> {
        let guard = self.inner.read();
        let records = guard.as_ref().ok_or(StorageError::Unavailable)?;
        Ok(records.contains_key(key))
    }

    fn get(&self, key: &str) -> StorageResult<Vec<Vec<u8>>> {
        let guard = self.inner.read();
        let records = guard.as_ref().ok_or(StorageError::Unavailable)?;
        records.get(key).cloned().ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, values: Vec<Vec<u8>>) -> StorageResult<()> {
        let mut guard = self.inner.write();
        let records = guard.as_mut().ok_or(StorageError::Unavailable)?;
        let count = values.len();
        records.entry(key.to_string()).or_default().extend(values);
        trace!(target: "storage", key, count, "Appended records");
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut guard = self.inner.write();
        let records = guard.as_mut().ok_or(StorageError::Unavailable)?;
        records.remove(key);
        Ok(())
    }

    fn close(&self) {
        let mut guard = self.inner.write();
        if guard.take().is_some() {
            debug!(target: "storage", "In-memory database closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread};

    const KEY: &str = "0x388c818ca8b9251b393131c08a736a67ccb19297";

    #[test]
    fn test_has_is_false_for_fresh_store() {
        let db = InMemoryDatabase::new();
        assert!(!db.has(KEY).unwrap());
    }

    #[test]
    fn test_put_then_get_roundtrip() {
        let db = InMemoryDatabase::new();
        db.put(KEY, vec![b"some value".to_vec()]).unwrap();

        assert!(db.has(KEY).unwrap());
        assert_eq!(db.get(KEY).unwrap(), vec![b"some value".to_vec()]);
    }

    #[test]
    fn test_put_appends_in_call_order() {
        let db = InMemoryDatabase::new();
        db.put(KEY, vec![b"a".to_vec(), b"b".to_vec()]).unwrap();
        db.put(KEY, vec![]).unwrap();
        db.put(KEY, vec![b"c".to_vec()]).unwrap();

        assert_eq!(db.get(KEY).unwrap(), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_empty_put_materializes_key() {
        let db = InMemoryDatabase::new();
        db.put(KEY, Vec::new()).unwrap();

        assert!(db.has(KEY).unwrap());
        assert!(db.get(KEY).unwrap().is_empty());
    }

    #[test]
    fn test_get_missing_key_is_not_found() {
        let db = InMemoryDatabase::new();
        assert_eq!(db.get(KEY), Err(StorageError::NotFound(KEY.to_string())));
    }

    #[test]
    fn test_delete_removes_key_and_history() {
        let db = InMemoryDatabase::new();
        db.put(KEY, vec![b"old".to_vec()]).unwrap();
        db.delete(KEY).unwrap();
        assert!(!db.has(KEY).unwrap());

        // A fresh put after delete starts a new history.
        db.put(KEY, vec![b"new".to_vec()]).unwrap();
        assert_eq!(db.get(KEY).unwrap(), vec![b"new".to_vec()]);
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let db = InMemoryDatabase::new();
        assert!(db.delete(KEY).is_ok());
    }

    #[test]
    fn test_get_returns_a_copy() {
        let db = InMemoryDatabase::new();
        db.put(KEY, vec![b"x".to_vec()]).unwrap();

        let mut copy = db.get(KEY).unwrap();
        copy.push(b"y".to_vec());
        copy[0] = b"changed".to_vec();

        assert_eq!(db.get(KEY).unwrap(), vec![b"x".to_vec()]);
    }

    #[test]
    fn test_close_makes_every_operation_unavailable() {
        let db = InMemoryDatabase::new();
        db.put(KEY, vec![b"x".to_vec()]).unwrap();
        db.close();

        assert!(db.is_closed());
        assert_eq!(db.has(KEY), Err(StorageError::Unavailable));
        assert_eq!(db.get(KEY), Err(StorageError::Unavailable));
        assert_eq!(db.put(KEY, vec![]), Err(StorageError::Unavailable));
        assert_eq!(db.delete(KEY), Err(StorageError::Unavailable));

        // Closing twice is harmless and the store stays closed.
        db.close();
        assert_eq!(db.has(KEY), Err(StorageError::Unavailable));
    }

    #[test]
    fn test_panicking_holder_leaves_store_usable() {
        let db = Arc::new(InMemoryDatabase::new());
        db.put(KEY, vec![b"a".to_vec()]).unwrap();

        let holder = Arc::clone(&db);
        let result = thread::spawn(move || {
            let _guard = holder.inner.write();
            panic!("writer died");
        })
        .join();
        assert!(result.is_err());

        db.put(KEY, vec![b"b".to_vec()]).unwrap();
        assert_eq!(db.get(KEY).unwrap(), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_concurrent_appends_are_all_visible() {
        let db = Arc::new(InMemoryDatabase::new());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    for j in 0..50u8 {
                        db.put(KEY, vec![vec![i, j]]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = db.get(KEY).unwrap();
        assert_eq!(records.len(), 8 * 50);
        // Per-writer order is preserved even though writers interleave.
        for i in 0..8u8 {
            let seen: Vec<u8> = records.iter().filter(|r| r[0] == i).map(|r| r[1]).collect();
            assert_eq!(seen, (0..50u8).collect::<Vec<_>>());
        }
    }
}
