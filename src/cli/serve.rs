//! Serve CLI command.

use crate::config::TodoConfig;
use crate::services::TodoService;
use crate::{Error, Result, http};

/// Serve command handler.
#[derive(Debug, Clone, Default)]
pub struct ServeCommand {
    host: Option<String>,
    port: Option<u16>,
}

impl ServeCommand {
    /// Creates a serve command using the configured address.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            host: None,
            port: None,
        }
    }

    /// Overrides the bind host.
    #[must_use]
    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    /// Overrides the bind port.
    #[must_use]
    pub const fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Applies the command line overrides to `config`.
    #[must_use]
    pub fn resolve(&self, mut config: TodoConfig) -> TodoConfig {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config
    }

    /// Opens the stores and serves HTTP until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if a store cannot be opened or the server fails.
    pub async fn run(&self, config: TodoConfig) -> Result<()> {
        let config = self.resolve(config);
        let service = open_service(config.clone()).await?;
        http::serve(service, &config.server, shutdown_signal()).await
    }
}

/// Builds the service off the async runtime; store setup does blocking I/O.
async fn open_service(config: TodoConfig) -> Result<TodoService> {
    tokio::task::spawn_blocking(move || TodoService::from_config(&config))
        .await
        .map_err(|e| Error::operation("open_stores", e))?
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_config_without_overrides() {
        let config = ServeCommand::new().resolve(TodoConfig::default());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let config = ServeCommand::new()
            .with_host(Some("127.0.0.1".to_string()))
            .with_port(Some(3000))
            .resolve(TodoConfig::default());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }
}
