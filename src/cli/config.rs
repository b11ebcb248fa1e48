//! Config CLI command.

use crate::config::TodoConfig;
use crate::{Error, Result};
use std::io::Write;

/// Config command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigCommand {
    show: bool,
}

impl ConfigCommand {
    /// Creates a new config command.
    #[must_use]
    pub const fn new(show: bool) -> Self {
        Self { show }
    }

    /// Writes the effective configuration as TOML, or a usage hint.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or `out` fails.
    pub fn run(&self, config: &TodoConfig, out: &mut impl Write) -> Result<()> {
        let text = if self.show {
            toml::to_string_pretty(&config.to_config_file())
                .map_err(|e| Error::operation("serialize_config", e))?
        } else {
            let location = TodoConfig::default_path()
                .map_or_else(|| "(unavailable)".to_string(), |p| p.display().to_string());
            format!(
                "Default config file: {location}\n\
                 Use --show to display the effective configuration\n"
            )
        };
        write!(out, "{text}").map_err(|e| Error::operation("write_output", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_round_trips_through_toml() {
        let config = TodoConfig::default()
            .with_port(9000)
            .with_redis_url("redis://cache:6379");

        let mut out = Vec::new();
        ConfigCommand::new(true).run(&config, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("port = 9000"));
        let parsed = TodoConfig::from_config_file(toml::from_str(&text).unwrap()).unwrap();
        assert_eq!(parsed.server.port, 9000);
        assert_eq!(parsed.cache.redis_url.as_deref(), Some("redis://cache:6379"));
    }

    #[test]
    fn test_without_show_prints_hint() {
        let mut out = Vec::new();
        ConfigCommand::new(false)
            .run(&TodoConfig::default(), &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("--show"));
    }
}
