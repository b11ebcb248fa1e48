//! Key-value backends for stats counters and the list cache.
//!
//! # Key Layout
//!
//! | Key | Content |
//! |-----|---------|
//! | `todo:stats:{name}` | Integer counter, expires 24h after its last increment |
//! | `todos::all` | JSON snapshot of the full todo list, stamped with a generation |
//! | `todos::generation` | Integer bumped on every list invalidation |
//!
//! Stats reset deletes `todo:stats:*` only; the cache keys live outside that
//! namespace.

mod memory;
mod redis;

pub use memory::InMemoryCounterStore;
pub use redis::RedisCounterStore;

use crate::Result;
use crate::models::{StatName, Stats, Todo};
use crate::storage::CounterStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Namespace prefix of every stats counter key.
pub const STATS_KEY_PREFIX: &str = "todo:stats:";

/// Key of the cached full-list snapshot.
pub const LIST_CACHE_KEY: &str = "todos::all";

/// Key of the list cache generation number.
pub const LIST_GENERATION_KEY: &str = "todos::generation";

/// Default time-to-live of a stats counter.
pub const DEFAULT_STATS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Builds the stats counter key for `name`.
#[must_use]
pub fn stats_key(name: &str) -> String {
    format!("{STATS_KEY_PREFIX}{name}")
}

/// Reads every tracked counter; absent or expired counters read as 0.
///
/// # Errors
///
/// Returns an error if the counter store is unreachable.
pub fn read_stats(counters: &dyn CounterStore) -> Result<Stats> {
    let mut stats = Stats::default();
    for name in StatName::ALL {
        stats.set(name, counters.get_value(&stats_key(name.as_str()))?);
    }
    Ok(stats)
}

/// Deletes every key under [`STATS_KEY_PREFIX`] and returns how many were removed.
///
/// # Errors
///
/// Returns an error if the counter store is unreachable.
pub fn reset_stats(counters: &dyn CounterStore) -> Result<usize> {
    let removed = counters.delete_matching(STATS_KEY_PREFIX)?;
    tracing::info!(removed, "Stats reset");
    Ok(removed)
}

/// Cached list snapshot as stored in the key-value backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CachedSnapshot {
    /// Generation observed before the list was read from the repository.
    pub generation: u64,
    /// The cached list.
    pub todos: Vec<Todo>,
}
