//! Key-value store traits for stats counters and the list cache.

use crate::Result;
use crate::models::Todo;

/// Named integer counters with a fixed time-to-live.
pub trait CounterStore: Send + Sync {
    /// Atomically adds one to the counter under `key`, creating it at 1.
    ///
    /// The counter's expiry is reset to the store's configured TTL.
    ///
    /// # Returns
    ///
    /// The new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn increment(&self, key: &str) -> Result<i64>;

    /// Returns the counter under `key`, or 0 if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn get_value(&self, key: &str) -> Result<i64>;

    /// Deletes every counter whose key starts with `prefix`.
    ///
    /// Keys outside the prefix, including the list cache, are untouched.
    ///
    /// # Returns
    ///
    /// The number of keys removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn delete_matching(&self, prefix: &str) -> Result<usize>;
}

/// Single-slot cache for the full todo list.
///
/// Every invalidation advances a generation number. A snapshot is stored
/// together with the generation observed before the list was read, and is
/// only served while that generation is still current. A read that raced a
/// mutation therefore can never publish a snapshot that outlives it.
pub trait ListCache: Send + Sync {
    /// Returns the current cache generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn generation(&self) -> Result<u64>;

    /// Returns the cached list if present and stamped with the current generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the snapshot is unreadable.
    fn get_cached_list(&self) -> Result<Option<Vec<Todo>>>;

    /// Stores `todos` as the snapshot for `generation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn set_cached_list(&self, generation: u64, todos: &[Todo]) -> Result<()>;

    /// Removes the snapshot and advances the generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn invalidate_cached_list(&self) -> Result<()>;
}
