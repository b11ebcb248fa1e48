//! In-process counter store and list cache.

use super::{CachedSnapshot, DEFAULT_STATS_TTL};
use crate::Result;
use crate::models::Todo;
use crate::storage::acquire_lock;
use crate::storage::{CounterStore, ListCache};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Counter {
    value: i64,
    expires_at: Option<Instant>,
}

impl Counter {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Debug)]
struct Snapshot {
    cached: CachedSnapshot,
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct State {
    counters: HashMap<String, Counter>,
    generation: u64,
    snapshot: Option<Snapshot>,
}

/// Counter store and list cache kept in process memory.
///
/// Used when no Redis URL is configured, and throughout the tests. All
/// operations take one mutex, so increments are atomic.
#[derive(Debug)]
pub struct InMemoryCounterStore {
    state: Mutex<State>,
    stats_ttl: Duration,
    list_ttl: Option<Duration>,
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCounterStore {
    /// Creates a store with the default 24h counter TTL and no list TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_STATS_TTL, None)
    }

    /// Creates a store with explicit TTLs.
    #[must_use]
    pub fn with_ttl(stats_ttl: Duration, list_ttl: Option<Duration>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            stats_ttl,
            list_ttl,
        }
    }

    fn deadline(now: Instant, ttl: Duration) -> Option<Instant> {
        now.checked_add(ttl)
    }
}

impl CounterStore for InMemoryCounterStore {
    fn increment(&self, key: &str) -> Result<i64> {
        let now = Instant::now();
        let mut state = acquire_lock(&self.state);

        let counter = state.counters.entry(key.to_string()).or_insert(Counter {
            value: 0,
            expires_at: None,
        });
        if !counter.is_live(now) {
            counter.value = 0;
        }
        counter.value += 1;
        counter.expires_at = Self::deadline(now, self.stats_ttl);

        Ok(counter.value)
    }

    fn get_value(&self, key: &str) -> Result<i64> {
        let now = Instant::now();
        let state = acquire_lock(&self.state);

        Ok(state
            .counters
            .get(key)
            .filter(|counter| counter.is_live(now))
            .map_or(0, |counter| counter.value))
    }

    fn delete_matching(&self, prefix: &str) -> Result<usize> {
        let mut state = acquire_lock(&self.state);

        let before = state.counters.len();
        state.counters.retain(|key, _| !key.starts_with(prefix));
        Ok(before - state.counters.len())
    }
}

impl ListCache for InMemoryCounterStore {
    fn generation(&self) -> Result<u64> {
        Ok(acquire_lock(&self.state).generation)
    }

    fn get_cached_list(&self) -> Result<Option<Vec<Todo>>> {
        let now = Instant::now();
        let state = acquire_lock(&self.state);

        Ok(state
            .snapshot
            .as_ref()
            .filter(|snapshot| snapshot.cached.generation == state.generation)
            .filter(|snapshot| snapshot.expires_at.is_none_or(|at| at > now))
            .map(|snapshot| snapshot.cached.todos.clone()))
    }

    fn set_cached_list(&self, generation: u64, todos: &[Todo]) -> Result<()> {
        let now = Instant::now();
        let mut state = acquire_lock(&self.state);

        state.snapshot = Some(Snapshot {
            cached: CachedSnapshot {
                generation,
                todos: todos.to_vec(),
            },
            expires_at: self.list_ttl.and_then(|ttl| Self::deadline(now, ttl)),
        });
        Ok(())
    }

    fn invalidate_cached_list(&self) -> Result<()> {
        let mut state = acquire_lock(&self.state);

        state.generation += 1;
        state.snapshot = None;
        Ok(())
    }
}
