//! Configuration management.
//!
//! Configuration is layered:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config <path>`, else `<config_dir>/todo-backend/config.toml`)
//! 3. `TODO_*` environment variables (a `.env` file is loaded first)
//!
//! # Example TOML
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! base_path = "/api/todos"
//!
//! [storage]
//! backend = "sqlite"
//! database_path = "/var/lib/todo-backend/todos.db"
//!
//! [cache]
//! redis_url = "redis://localhost:6379"
//! stats_ttl_secs = 86400
//!
//! [logging]
//! format = "json"
//! filter = "info,tower_http=debug"
//!
//! [metrics]
//! enabled = true
//! port = 9090
//! ```

use crate::storage::counters::DEFAULT_STATS_TTL;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default path prefix of the todo API.
pub const DEFAULT_BASE_PATH: &str = "/api/todos";

/// Main configuration for todo-backend.
#[derive(Debug, Clone, Default)]
pub struct TodoConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Todo repository settings.
    pub storage: StorageConfig,
    /// Counter store and list cache settings.
    pub cache: CacheConfig,
    /// Logging and metrics settings, resolved by [`crate::observability`].
    pub observability: ObservabilitySettings,
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Path prefix of the todo routes, without trailing slash.
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Resolves the bind address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .host
            .parse()
            .map_err(|e| Error::InvalidInput(format!("invalid host '{}': {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Todo repository backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepositoryBackend {
    /// `SQLite` database.
    #[default]
    Sqlite,
    /// Process memory, lost on exit.
    Memory,
}

impl RepositoryBackend {
    /// Parses a backend name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unknown names.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" | "in-memory" | "in_memory" => Ok(Self::Memory),
            other => Err(Error::InvalidInput(format!(
                "unknown storage backend '{other}' (expected sqlite or memory)"
            ))),
        }
    }

    /// Returns the backend name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

/// Todo repository settings.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Backend type.
    pub backend: RepositoryBackend,
    /// Database file; `None` uses the per-user data directory, `:memory:` an in-memory database.
    pub database_path: Option<PathBuf>,
}

/// Counter store and list cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis URL. Without one, counters and the list cache live in process memory.
    pub redis_url: Option<String>,
    /// Expiry of a stats counter after its last increment.
    pub stats_ttl: Duration,
    /// Optional expiry of the cached list snapshot.
    pub list_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            stats_ttl: DEFAULT_STATS_TTL,
            list_ttl: None,
        }
    }
}

/// Observability settings as read from the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObservabilitySettings {
    /// Logging section.
    pub logging: Option<LoggingSettings>,
    /// Metrics section.
    pub metrics: Option<MetricsSettings>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: Option<String>,
}

/// `[metrics]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsSettings {
    /// Whether the Prometheus exporter is installed.
    pub enabled: Option<bool>,
    /// Port of the Prometheus scrape endpoint.
    pub port: Option<u16>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    /// `[server]` section.
    pub server: Option<ConfigFileServer>,
    /// `[storage]` section.
    pub storage: Option<ConfigFileStorage>,
    /// `[cache]` section.
    pub cache: Option<ConfigFileCache>,
    /// `[logging]` section.
    pub logging: Option<LoggingSettings>,
    /// `[metrics]` section.
    pub metrics: Option<MetricsSettings>,
}

/// `[server]` section.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConfigFileServer {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Path prefix of the todo routes.
    pub base_path: Option<String>,
}

/// `[storage]` section.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConfigFileStorage {
    /// `sqlite` or `memory`.
    pub backend: Option<String>,
    /// Database file.
    pub database_path: Option<String>,
}

/// `[cache]` section.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConfigFileCache {
    /// Redis URL.
    pub redis_url: Option<String>,
    /// Counter expiry in seconds.
    pub stats_ttl_secs: Option<u64>,
    /// List snapshot expiry in seconds.
    pub list_ttl_secs: Option<u64>,
}

impl TodoConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_config_file", e))?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| Error::operation("parse_config_file", e))?;

        Self::from_config_file(file)
    }

    /// Returns the default config file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|d| d.config_dir().join("todo-backend").join("config.toml"))
    }

    /// Loads configuration for a process: explicit file or default location, then env overrides.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed or an override is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env_overrides_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Converts a `ConfigFile` to `TodoConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range.
    pub fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(server) = file.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
            if let Some(base_path) = server.base_path {
                config.server.base_path = normalize_base_path(&base_path)?;
            }
        }
        if let Some(storage) = file.storage {
            if let Some(backend) = storage.backend {
                config.storage.backend = RepositoryBackend::parse(&backend)?;
            }
            config.storage.database_path = storage.database_path.map(PathBuf::from);
        }
        if let Some(cache) = file.cache {
            config.cache.redis_url = cache.redis_url.filter(|url| !url.is_empty());
            if let Some(secs) = cache.stats_ttl_secs {
                config.cache.stats_ttl = Duration::from_secs(secs);
            }
            config.cache.list_ttl = cache.list_ttl_secs.map(Duration::from_secs);
        }
        config.observability = ObservabilitySettings {
            logging: file.logging,
            metrics: file.metrics,
        };

        Ok(config)
    }

    /// Converts back to the file representation, for display.
    #[must_use]
    pub fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            server: Some(ConfigFileServer {
                host: Some(self.server.host.clone()),
                port: Some(self.server.port),
                base_path: Some(self.server.base_path.clone()),
            }),
            storage: Some(ConfigFileStorage {
                backend: Some(self.storage.backend.as_str().to_string()),
                database_path: self
                    .storage
                    .database_path
                    .as_ref()
                    .map(|p| p.display().to_string()),
            }),
            cache: Some(ConfigFileCache {
                redis_url: self.cache.redis_url.clone(),
                stats_ttl_secs: Some(self.cache.stats_ttl.as_secs()),
                list_ttl_secs: self.cache.list_ttl.map(|ttl| ttl.as_secs()),
            }),
            logging: self.observability.logging.clone(),
            metrics: self.observability.metrics.clone(),
        }
    }

    /// Applies `TODO_*` overrides read through `lookup`.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `TODO_HOST` | `server.host` |
    /// | `TODO_PORT` | `server.port` |
    /// | `TODO_BASE_PATH` | `server.base_path` |
    /// | `TODO_STORAGE_BACKEND` | `storage.backend` |
    /// | `TODO_DATABASE_PATH` | `storage.database_path` |
    /// | `TODO_REDIS_URL` | `cache.redis_url` (empty disables Redis) |
    /// | `TODO_STATS_TTL_SECS` | `cache.stats_ttl` |
    /// | `TODO_LIST_TTL_SECS` | `cache.list_ttl` |
    ///
    /// Logging and metrics variables are read by [`crate::observability`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a numeric variable does not parse.
    pub fn apply_env_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(host) = lookup("TODO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("TODO_PORT") {
            self.server.port = parse_env("TODO_PORT", &port)?;
        }
        if let Some(base_path) = lookup("TODO_BASE_PATH") {
            self.server.base_path = normalize_base_path(&base_path)?;
        }
        if let Some(backend) = lookup("TODO_STORAGE_BACKEND") {
            self.storage.backend = RepositoryBackend::parse(&backend)?;
        }
        if let Some(path) = lookup("TODO_DATABASE_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("TODO_REDIS_URL") {
            self.cache.redis_url = Some(url).filter(|url| !url.is_empty());
        }
        if let Some(secs) = lookup("TODO_STATS_TTL_SECS") {
            self.cache.stats_ttl = Duration::from_secs(parse_env("TODO_STATS_TTL_SECS", &secs)?);
        }
        if let Some(secs) = lookup("TODO_LIST_TTL_SECS") {
            self.cache.list_ttl = Some(Duration::from_secs(parse_env(
                "TODO_LIST_TTL_SECS",
                &secs,
            )?));
        }
        Ok(())
    }

    /// Sets the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the Redis URL.
    #[must_use]
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.cache.redis_url = Some(url.into());
        self
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::InvalidInput(format!("{key}={value}: {e}")))
}

/// Normalizes a route prefix to `/segment[/segment...]` without a trailing slash.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the prefix is empty or `/`.
pub fn normalize_base_path(path: &str) -> Result<String> {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "base_path must contain at least one segment".to_string(),
        ));
    }
    Ok(format!("/{trimmed}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;
    use test_case::test_case;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TodoConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.base_path, "/api/todos");
        assert_eq!(config.storage.backend, RepositoryBackend::Sqlite);
        assert_eq!(config.cache.redis_url, None);
        assert_eq!(config.cache.stats_ttl, Duration::from_secs(86_400));
        assert_eq!(config.cache.list_ttl, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9000
base_path = "todos/"

[storage]
backend = "memory"

[cache]
redis_url = "redis://cache:6379"
stats_ttl_secs = 60
list_ttl_secs = 5

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = TodoConfig::load_from_file(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.base_path, "/todos");
        assert_eq!(config.storage.backend, RepositoryBackend::Memory);
        assert_eq!(config.cache.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.cache.stats_ttl, Duration::from_secs(60));
        assert_eq!(config.cache.list_ttl, Some(Duration::from_secs(5)));
        assert_eq!(
            config
                .observability
                .logging
                .and_then(|l| l.format)
                .as_deref(),
            Some("json")
        );
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = TodoConfig::load_from_file(Path::new("/nonexistent/todo.toml"));
        assert!(matches!(
            result,
            Err(Error::OperationFailed { ref operation, .. }) if operation == "read_config_file"
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = TodoConfig::default();
        config
            .apply_env_overrides_from(env(&[
                ("TODO_PORT", "3000"),
                ("TODO_REDIS_URL", "redis://localhost"),
                ("TODO_DATABASE_PATH", ":memory:"),
                ("TODO_STATS_TTL_SECS", "10"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.redis_url.as_deref(), Some("redis://localhost"));
        assert_eq!(config.storage.database_path, Some(PathBuf::from(":memory:")));
        assert_eq!(config.cache.stats_ttl, Duration::from_secs(10));
    }

    #[test]
    fn test_empty_redis_url_disables_redis() {
        let mut config = TodoConfig::default().with_redis_url("redis://localhost");
        config
            .apply_env_overrides_from(env(&[("TODO_REDIS_URL", "")]))
            .unwrap();
        assert_eq!(config.cache.redis_url, None);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = TodoConfig::default();
        let result = config.apply_env_overrides_from(env(&[("TODO_PORT", "eighty")]));
        assert!(matches!(result, Err(Error::InvalidInput(ref msg)) if msg.contains("TODO_PORT")));
    }

    #[test_case("/api/todos", "/api/todos")]
    #[test_case("api/todos/", "/api/todos")]
    #[test_case(" /todos ", "/todos")]
    fn test_normalize_base_path(input: &str, expected: &str) {
        assert_eq!(normalize_base_path(input).unwrap(), expected);
    }

    #[test]
    fn test_normalize_base_path_rejects_root() {
        assert!(normalize_base_path("/").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:8080");

        let bad = ServerConfig {
            host: "localhost".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_to_config_file_round_trip() {
        let config = TodoConfig::default()
            .with_port(8181)
            .with_redis_url("redis://r:6379");
        let rendered = toml::to_string_pretty(&config.to_config_file()).unwrap();
        let parsed: ConfigFile = toml::from_str(&rendered).unwrap();
        let reloaded = TodoConfig::from_config_file(parsed).unwrap();

        assert_eq!(reloaded.server.port, 8181);
        assert_eq!(reloaded.cache.redis_url.as_deref(), Some("redis://r:6379"));
        assert_eq!(reloaded.cache.stats_ttl, config.cache.stats_ttl);
    }
}
