use crate::StorageResult;
use std::fmt::Debug;

/// Provides an interface for a multi-value key-value store.
///
/// Each key holds an ordered sequence of byte records. Implementations must be safe to share
/// between threads and must make every successful [`KeyValueStore::put`] visible to all
/// readers as soon as it returns.
pub trait KeyValueStore: Debug + Send + Sync {
    /// Returns whether `key` is present in the store.
    ///
    /// # Returns
    /// * `Ok(true)` if at least one `put` on `key` happened since creation or the last `delete`.
    /// * `Err(StorageError::Unavailable)` once the store has been closed.
    fn has(&self, key: &str) -> StorageResult<bool>;

    /// Returns a copy of the records stored under `key`, in append order.
    ///
    /// # Returns
    /// * `Err(StorageError::NotFound)` if the key is absent.
    /// * `Err(StorageError::Unavailable)` once the store has been closed.
    fn get(&self, key: &str) -> StorageResult<Vec<Vec<u8>>>;

    /// Appends `values` to the records stored under `key`, creating the key if needed.
    ///
    /// Passing an empty `values` is a valid write that only materializes the key.
    fn put(&self, key: &str, values: Vec<Vec<u8>>) -> StorageResult<()>;

    /// Removes `key` and all of its records. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Releases the store's contents. Every subsequent operation fails with
    /// [`crate::StorageError::Unavailable`].
    fn close(&self);
}
