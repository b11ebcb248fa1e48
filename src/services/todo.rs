//! Todo service.
//!
//! Orchestrates the todo repository, the list cache, and the stats counters.
//!
//! # Cache Contract
//!
//! | Operation | List cache | Counter |
//! |-----------|------------|---------|
//! | `list` | read-through, populated on miss | `db_reads` on miss |
//! | `get_by_id` | bypassed | none |
//! | `create` | invalidated | `todos_created` |
//! | `update` | invalidated | `todos_updated` (not on `NotFound`) |
//! | `delete` | invalidated | `todos_deleted` (also for missing ids) |
//! | `list_completed` | bypassed | none |
//!
//! Mutations invalidate the snapshot before touching the repository and
//! again once the write has landed. `list` stamps the snapshot it writes with
//! the generation it observed before reading, so a read that overlaps a
//! mutation cannot leave a servable stale snapshot behind.
//!
//! # Example
//!
//! ```rust,ignore
//! let service = TodoService::from_config(&config)?;
//! let todo = service.create(NewTodo::titled("Ship it"))?;
//! let all = service.list()?;
//! ```

use crate::config::TodoConfig;
use crate::models::{NewTodo, StatName, Stats, Todo, TodoId};
use crate::storage::counters::{self, stats_key};
use crate::storage::{CacheStores, CounterStore, ListCache, StorageFactory, TodoRepository};
use crate::{Error, Result};
use std::sync::Arc;

/// Service for todo operations.
///
/// Cheap to clone; all state lives in the injected stores.
#[derive(Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
    counters: Arc<dyn CounterStore>,
    list_cache: Arc<dyn ListCache>,
}

impl TodoService {
    /// Creates a service over the given stores.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TodoRepository>,
        counters: Arc<dyn CounterStore>,
        list_cache: Arc<dyn ListCache>,
    ) -> Self {
        Self {
            repository,
            counters,
            list_cache,
        }
    }

    /// Creates a service from a repository and a pair of cache stores.
    #[must_use]
    pub fn from_stores(repository: Arc<dyn TodoRepository>, stores: CacheStores) -> Self {
        Self::new(repository, stores.counters, stores.list_cache)
    }

    /// Creates a service with the backends selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if either store cannot be initialized.
    pub fn from_config(config: &TodoConfig) -> Result<Self> {
        let repository = StorageFactory::repository(&config.storage)?;
        let stores = StorageFactory::cache(&config.cache)?;
        Ok(Self::from_stores(repository, stores))
    }

    /// Returns every todo, served from the list cache when possible.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache or the repository is unreachable.
    pub fn list(&self) -> Result<Vec<Todo>> {
        if let Some(todos) = self.list_cache.get_cached_list()? {
            tracing::debug!(count = todos.len(), "Todo list served from cache");
            metrics::counter!("todo_cache_hits_total").increment(1);
            return Ok(todos);
        }

        metrics::counter!("todo_cache_misses_total").increment(1);
        let generation = self.list_cache.generation()?;
        let todos = self.repository.find_all()?;
        tracing::debug!(count = todos.len(), generation, "Todo list read from database");

        self.bump(StatName::DbReads)?;
        self.list_cache.set_cached_list(generation, &todos)?;

        Ok(todos)
    }

    /// Returns the todo with `id`, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository is unreachable.
    pub fn get_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        self.repository.find_by_id(id)
    }

    /// Creates a todo and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if any store is unreachable.
    pub fn create(&self, fields: NewTodo) -> Result<Todo> {
        self.list_cache.invalidate_cached_list()?;

        let todo = self.repository.save(&Todo::from_new(fields))?;
        self.list_cache.invalidate_cached_list()?;
        self.bump(StatName::TodosCreated)?;

        tracing::info!(id = ?todo.id, title = %todo.title, "Todo created");
        Ok(todo)
    }

    /// Replaces title, description, and completed flag of the todo with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no todo has `id`, or an error if any
    /// store is unreachable.
    pub fn update(&self, id: TodoId, fields: NewTodo) -> Result<Todo> {
        self.list_cache.invalidate_cached_list()?;

        let mut todo = self
            .repository
            .find_by_id(id)?
            .ok_or(Error::NotFound { id })?;
        todo.apply(fields);

        let todo = self.repository.save(&todo)?;
        self.list_cache.invalidate_cached_list()?;
        self.bump(StatName::TodosUpdated)?;

        tracing::info!(%id, completed = todo.completed, "Todo updated");
        Ok(todo)
    }

    /// Deletes the todo with `id`. Deleting a missing id succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if any store is unreachable.
    pub fn delete(&self, id: TodoId) -> Result<()> {
        self.list_cache.invalidate_cached_list()?;

        let existed = self.repository.delete_by_id(id)?;
        self.list_cache.invalidate_cached_list()?;
        self.bump(StatName::TodosDeleted)?;

        tracing::info!(%id, existed, "Todo deleted");
        Ok(())
    }

    /// Returns every completed todo, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository is unreachable.
    pub fn list_completed(&self) -> Result<Vec<Todo>> {
        self.repository.find_by_completed(true)
    }

    /// Returns a single counter, 0 if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store is unreachable.
    pub fn get_stat(&self, name: StatName) -> Result<i64> {
        self.counters.get_value(&stats_key(name.as_str()))
    }

    /// Returns all tracked counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store is unreachable.
    pub fn stats(&self) -> Result<Stats> {
        counters::read_stats(self.counters.as_ref())
    }

    /// Deletes every stats counter. The list cache is left alone.
    ///
    /// # Returns
    ///
    /// The number of counters removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store is unreachable.
    pub fn reset_stats(&self) -> Result<usize> {
        counters::reset_stats(self.counters.as_ref())
    }

    fn bump(&self, name: StatName) -> Result<i64> {
        self.counters.increment(&stats_key(name.as_str()))
    }
}
