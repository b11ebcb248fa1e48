//! Storage layer abstraction.
//!
//! Two independent stores sit behind this module:
//!
//! - **Repository**: authoritative todo records ([`SqliteTodoRepository`], [`InMemoryTodoRepository`])
//! - **Counters**: stats counters and the cached list snapshot
//!   ([`RedisCounterStore`], [`InMemoryCounterStore`])
//!
//! [`StorageFactory`] builds both from configuration.

// Allow significant_drop_tightening - holding a guard for the rest of a short
// method keeps each critical section readable.
#![allow(clippy::significant_drop_tightening)]

pub mod counters;
mod lock;
pub mod repository;
pub mod sqlite;
pub mod traits;

pub use counters::{InMemoryCounterStore, RedisCounterStore};
pub use lock::acquire_lock;
pub use repository::{InMemoryTodoRepository, SqliteTodoRepository};
pub use traits::{CounterStore, ListCache, TodoRepository};

use crate::config::{CacheConfig, RepositoryBackend, StorageConfig};
use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// Path value selecting an in-memory `SQLite` database.
const SQLITE_MEMORY_PATH: &str = ":memory:";

/// Key-value stores handed to the service.
///
/// Both usually point at the same backend instance.
#[derive(Clone)]
pub struct CacheStores {
    /// Stats counters.
    pub counters: Arc<dyn CounterStore>,
    /// Full-list cache.
    pub list_cache: Arc<dyn ListCache>,
}

impl CacheStores {
    /// Uses one backend for both roles.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CounterStore + ListCache + 'static,
    {
        Self {
            counters: store.clone(),
            list_cache: store,
        }
    }
}

/// Factory for the configured storage backends.
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the todo repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or no default
    /// location can be determined.
    pub fn repository(config: &StorageConfig) -> Result<Arc<dyn TodoRepository>> {
        match config.backend {
            RepositoryBackend::Memory => Ok(Arc::new(InMemoryTodoRepository::new())),
            RepositoryBackend::Sqlite => {
                let path = config
                    .database_path
                    .clone()
                    .or_else(SqliteTodoRepository::default_path)
                    .ok_or_else(|| {
                        Error::InvalidInput(
                            "database_path not configured and no data directory available"
                                .to_string(),
                        )
                    })?;

                let repo = if path == Path::new(SQLITE_MEMORY_PATH) {
                    SqliteTodoRepository::in_memory()?
                } else {
                    SqliteTodoRepository::new(&path)?
                };
                tracing::info!(path = %repo.db_path().display(), "Opened SQLite todo repository");
                Ok(Arc::new(repo))
            },
        }
    }

    /// Creates the counter store and list cache.
    ///
    /// Uses Redis when a URL is configured, otherwise process memory.
    ///
    /// # Errors
    ///
    /// Returns an error if Redis is configured but unreachable, or the
    /// `redis` feature is not compiled in.
    pub fn cache(config: &CacheConfig) -> Result<CacheStores> {
        match config.redis_url.as_deref() {
            Some(url) => {
                let store = RedisCounterStore::new(url, config.stats_ttl, config.list_ttl)?;
                tracing::info!("Connected to Redis counter store");
                Ok(CacheStores::shared(Arc::new(store)))
            },
            None => {
                tracing::info!("No Redis URL configured, keeping counters in memory");
                Ok(CacheStores::shared(Arc::new(InMemoryCounterStore::with_ttl(
                    config.stats_ttl,
                    config.list_ttl,
                ))))
            },
        }
    }

    /// Creates the shared Redis counter store, without a repository.
    ///
    /// Used by out-of-process tools that inspect or reset the counters a
    /// running server writes. Process-local counters would be empty there,
    /// so a Redis URL is required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no Redis URL is configured, or an
    /// error if Redis is unreachable.
    pub fn shared_counters(config: &CacheConfig) -> Result<Arc<dyn CounterStore>> {
        if config.redis_url.is_none() {
            return Err(Error::InvalidInput(
                "no shared counter store: set cache.redis_url or TODO_REDIS_URL".to_string(),
            ));
        }
        Ok(Self::cache(config)?.counters)
    }
}
