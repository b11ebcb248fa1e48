//! Structured logging configuration.

use crate::config::LoggingSettings;
use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "debug";

/// Output format of the `fmt` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for anything other than `pretty` or `json`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidInput(format!(
                "unknown log format '{other}' (expected 'pretty' or 'json')"
            ))),
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// Filter precedence: `TODO_LOG`, then `--verbose`, then the config file.
    /// `TODO_LOG_FORMAT` overrides the configured format.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured format is unknown.
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Result<Self> {
        Self::from_settings_with(settings, verbose, |key| std::env::var(key).ok())
    }

    /// Like [`Self::from_settings`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured format is unknown.
    pub fn from_settings_with(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(format) = settings.and_then(|s| s.format.as_deref()) {
            config.format = LogFormat::parse(format)?;
        }
        if let Some(filter) = settings.and_then(|s| s.filter.clone()) {
            config.filter = filter;
        }
        if verbose {
            config.filter = VERBOSE_LOG_FILTER.to_string();
        }

        if let Some(format) = lookup("TODO_LOG_FORMAT") {
            config.format = LogFormat::parse(&format)?;
        }
        if let Some(filter) = lookup("TODO_LOG").filter(|f| !f.trim().is_empty()) {
            config.filter = filter;
        }

        Ok(config)
    }

    /// Builds the `EnvFilter` for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the directive does not parse.
    pub fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.filter)
            .map_err(|e| Error::InvalidInput(format!("invalid log filter '{}': {e}", self.filter)))
    }
}
