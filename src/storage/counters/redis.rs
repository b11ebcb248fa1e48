//! Redis-based counter store and list cache.
//!
//! Counters use `INCR` + `EXPIRE` inside a `MULTI` block so the increment and
//! its TTL refresh land together. Stats reset walks the key space with `SCAN`
//! rather than `KEYS`, so it never blocks the server.

#[cfg(feature = "redis")]
mod implementation {
    use crate::storage::counters::{CachedSnapshot, LIST_CACHE_KEY, LIST_GENERATION_KEY};
    use crate::models::Todo;
    use crate::storage::{CounterStore, ListCache, acquire_lock};
    use crate::{Error, Result};
    use redis::{Client, Connection, RedisResult};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Default timeout for Redis operations.
    const REDIS_TIMEOUT: Duration = Duration::from_secs(5);

    /// Keys fetched per `SCAN` round trip.
    const SCAN_BATCH: usize = 100;

    /// Redis-based counter store and list cache.
    ///
    /// Maintains one reusable connection; a connection that fails a command is
    /// dropped and the next call opens a fresh one.
    pub struct RedisCounterStore {
        /// Redis client.
        client: Client,
        /// Cached connection for reuse.
        connection: Mutex<Option<Connection>>,
        /// TTL refreshed on every counter increment.
        stats_ttl: Duration,
        /// Optional TTL of the list snapshot.
        list_ttl: Option<Duration>,
    }

    impl RedisCounterStore {
        /// Creates a new Redis store and checks that the server answers `PING`.
        ///
        /// # Errors
        ///
        /// Returns an error if the URL is invalid or the server is unreachable.
        pub fn new(
            connection_url: &str,
            stats_ttl: Duration,
            list_ttl: Option<Duration>,
        ) -> Result<Self> {
            let client =
                Client::open(connection_url).map_err(|e| Error::operation("redis_connect", e))?;

            let store = Self {
                client,
                connection: Mutex::new(None),
                stats_ttl,
                list_ttl,
            };
            store.ping()?;

            Ok(store)
        }

        /// Sends `PING`.
        ///
        /// # Errors
        ///
        /// Returns an error if the server is unreachable.
        pub fn ping(&self) -> Result<()> {
            self.run("redis_ping", |conn| {
                redis::cmd("PING").query::<String>(conn).map(|_| ())
            })
        }

        /// Gets a connection, reusing the cached one if available.
        fn get_connection(&self) -> Result<Connection> {
            if let Some(conn) = acquire_lock(&self.connection).take() {
                return Ok(conn);
            }

            let conn = self
                .client
                .get_connection()
                .map_err(|e| Error::operation("redis_get_connection", e))?;
            conn.set_read_timeout(Some(REDIS_TIMEOUT))
                .map_err(|e| Error::operation("redis_set_read_timeout", e))?;
            conn.set_write_timeout(Some(REDIS_TIMEOUT))
                .map_err(|e| Error::operation("redis_set_write_timeout", e))?;

            Ok(conn)
        }

        /// Returns a healthy connection to the cache for reuse.
        fn return_connection(&self, conn: Connection) {
            *acquire_lock(&self.connection) = Some(conn);
        }

        /// Runs `f` on a pooled connection, mapping failures to [`Error::OperationFailed`].
        fn run<T>(
            &self,
            operation: &'static str,
            f: impl FnOnce(&mut Connection) -> RedisResult<T>,
        ) -> Result<T> {
            let mut conn = self.get_connection()?;
            match f(&mut conn) {
                Ok(value) => {
                    self.return_connection(conn);
                    Ok(value)
                },
                Err(e) => {
                    tracing::warn!(operation, error = %e, "Redis command failed");
                    metrics::counter!("todo_redis_errors_total", "operation" => operation)
                        .increment(1);
                    Err(Error::operation(operation, e))
                },
            }
        }

        fn ttl_secs(ttl: Duration) -> i64 {
            i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1)
        }
    }

    /// Escapes glob metacharacters so `prefix` matches literally in `SCAN MATCH`.
    fn escape_glob(prefix: &str) -> String {
        let mut escaped = String::with_capacity(prefix.len());
        for c in prefix.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    impl CounterStore for RedisCounterStore {
        fn increment(&self, key: &str) -> Result<i64> {
            let ttl = Self::ttl_secs(self.stats_ttl);
            self.run("redis_increment", |conn| {
                let (value,): (i64,) = redis::pipe()
                    .atomic()
                    .cmd("INCR")
                    .arg(key)
                    .cmd("EXPIRE")
                    .arg(key)
                    .arg(ttl)
                    .ignore()
                    .query(conn)?;
                Ok(value)
            })
        }

        fn get_value(&self, key: &str) -> Result<i64> {
            self.run("redis_get_counter", |conn| {
                redis::cmd("GET")
                    .arg(key)
                    .query::<Option<i64>>(conn)
                    .map(Option::unwrap_or_default)
            })
        }

        fn delete_matching(&self, prefix: &str) -> Result<usize> {
            let pattern = format!("{}*", escape_glob(prefix));
            self.run("redis_delete_matching", |conn| {
                let mut cursor: u64 = 0;
                let mut removed = 0;
                loop {
                    let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query(conn)?;
                    if !keys.is_empty() {
                        removed += redis::cmd("DEL").arg(&keys).query::<usize>(conn)?;
                    }
                    if next == 0 {
                        return Ok(removed);
                    }
                    cursor = next;
                }
            })
        }
    }

    impl ListCache for RedisCounterStore {
        fn generation(&self) -> Result<u64> {
            self.run("redis_get_generation", |conn| {
                redis::cmd("GET")
                    .arg(LIST_GENERATION_KEY)
                    .query::<Option<u64>>(conn)
                    .map(Option::unwrap_or_default)
            })
        }

        fn get_cached_list(&self) -> Result<Option<Vec<Todo>>> {
            let (generation, raw): (Option<u64>, Option<String>) =
                self.run("redis_get_cached_list", |conn| {
                    redis::cmd("MGET")
                        .arg(LIST_GENERATION_KEY)
                        .arg(LIST_CACHE_KEY)
                        .query(conn)
                })?;

            let Some(raw) = raw else {
                return Ok(None);
            };

            match serde_json::from_str::<CachedSnapshot>(&raw) {
                Ok(snapshot) if snapshot.generation == generation.unwrap_or_default() => {
                    Ok(Some(snapshot.todos))
                },
                Ok(_) => Ok(None),
                Err(e) => {
                    // Treated as a miss; the next list read overwrites it.
                    tracing::warn!(error = %e, key = LIST_CACHE_KEY, "Unreadable list snapshot");
                    Ok(None)
                },
            }
        }

        fn set_cached_list(&self, generation: u64, todos: &[Todo]) -> Result<()> {
            let snapshot = CachedSnapshot {
                generation,
                todos: todos.to_vec(),
            };
            let json = serde_json::to_string(&snapshot)
                .map_err(|e| Error::operation("serialize_list_snapshot", e))?;

            self.run("redis_set_cached_list", |conn| {
                let mut cmd = redis::cmd("SET");
                cmd.arg(LIST_CACHE_KEY).arg(&json);
                if let Some(ttl) = self.list_ttl {
                    cmd.arg("EX").arg(Self::ttl_secs(ttl));
                }
                cmd.query::<()>(conn)
            })
        }

        fn invalidate_cached_list(&self) -> Result<()> {
            self.run("redis_invalidate_cached_list", |conn| {
                redis::pipe()
                    .atomic()
                    .cmd("INCR")
                    .arg(LIST_GENERATION_KEY)
                    .ignore()
                    .cmd("DEL")
                    .arg(LIST_CACHE_KEY)
                    .ignore()
                    .query::<()>(conn)
            })
        }
    }

}

#[cfg(feature = "redis")]
pub use implementation::RedisCounterStore;

#[cfg(not(feature = "redis"))]
mod stub {
    use crate::models::Todo;
    use crate::storage::{CounterStore, ListCache};
    use crate::{Error, Result};
    use std::time::Duration;

    /// Stub Redis store when the feature is not enabled.
    pub struct RedisCounterStore;

    impl RedisCounterStore {
        /// Creates a new Redis store (stub).
        ///
        /// # Errors
        ///
        /// Always returns an error because the feature is not enabled.
        pub fn new(
            _connection_url: &str,
            _stats_ttl: Duration,
            _list_ttl: Option<Duration>,
        ) -> Result<Self> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }
    }

    impl CounterStore for RedisCounterStore {
        fn increment(&self, _key: &str) -> Result<i64> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn get_value(&self, _key: &str) -> Result<i64> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn delete_matching(&self, _prefix: &str) -> Result<usize> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }
    }

    impl ListCache for RedisCounterStore {
        fn generation(&self) -> Result<u64> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn get_cached_list(&self) -> Result<Option<Vec<Todo>>> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn set_cached_list(&self, _generation: u64, _todos: &[Todo]) -> Result<()> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn invalidate_cached_list(&self) -> Result<()> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }
    }
}

#[cfg(not(feature = "redis"))]
pub use stub::RedisCounterStore;
