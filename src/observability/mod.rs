//! Observability and telemetry.
//!
//! Sets up the process-wide `tracing` subscriber and, when enabled, the
//! Prometheus exporter. Both can be installed once per process.

mod logging;
mod metrics;
mod request_context;

pub use logging::{DEFAULT_LOG_FILTER, LogFormat, LoggingConfig, VERBOSE_LOG_FILTER};
pub use metrics::{DEFAULT_METRICS_PORT, MetricsConfig, install_prometheus};
pub use request_context::{
    REQUEST_ID_HEADER, RequestContext, RequestContextGuard, current_request_id,
    enter_request_context, scope_request_context,
};

use crate::config::ObservabilitySettings;
use crate::{Error, Result};
use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Full observability configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

/// Options coming from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Whether verbose output was requested.
    pub verbose: bool,
    /// Whether the Prometheus exporter may be installed. One-shot commands
    /// leave it off.
    pub metrics_expose: bool,
}

static OBSERVABILITY_INIT: OnceLock<()> = OnceLock::new();

impl ObservabilityConfig {
    /// Resolves configuration from config settings with env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a logging setting is invalid.
    pub fn from_settings(settings: &ObservabilitySettings, options: InitOptions) -> Result<Self> {
        let logging = LoggingConfig::from_settings(settings.logging.as_ref(), options.verbose)?;
        let mut metrics = MetricsConfig::from_settings(settings.metrics.as_ref());
        metrics.enabled &= options.metrics_expose;

        Ok(Self { logging, metrics })
    }
}

/// Initializes observability from config settings with env overrides.
///
/// # Errors
///
/// Returns an error if observability has already been initialized or if any
/// component fails to initialize.
pub fn init_from_config(
    settings: &ObservabilitySettings,
    options: InitOptions,
) -> Result<()> {
    init(ObservabilityConfig::from_settings(settings, options)?)
}

/// Initializes logging and metrics for the process.
///
/// # Errors
///
/// Returns an error if observability has already been initialized or if any
/// component fails to initialize.
pub fn init(config: ObservabilityConfig) -> Result<()> {
    if OBSERVABILITY_INIT.get().is_some() {
        return Err(Error::operation(
            "observability_init",
            "observability already initialized",
        ));
    }

    let filter = config.logging.env_filter()?;

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true)
                    .with_thread_names(true),
            )
            .with(filter)
            .try_init()
            .map_err(init_error)?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_names(true),
            )
            .with(filter)
            .try_init()
            .map_err(init_error)?,
    }

    let exporter = metrics::install_prometheus(&config.metrics)?;

    OBSERVABILITY_INIT.set(()).map_err(|()| {
        Error::operation(
            "observability_init",
            "failed to mark observability initialized",
        )
    })?;

    tracing::debug!(
        format = ?config.logging.format,
        filter = %config.logging.filter,
        exporter,
        "Observability initialized"
    );

    Ok(())
}

#[allow(clippy::needless_pass_by_value)]
fn init_error(e: tracing_subscriber::util::TryInitError) -> Error {
    Error::operation("observability_init", e)
}
