//! Stats CLI commands.
//!
//! Both commands talk to the shared counter store only; they never open the
//! todo repository.

use crate::models::StatName;
use crate::storage::CounterStore;
use crate::storage::counters::{read_stats, reset_stats};
use crate::{Error, Result};
use std::io::Write;

/// Prints the stats counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsCommand {
    name: Option<StatName>,
}

impl StatsCommand {
    /// Creates a command printing all four counters as pretty JSON.
    #[must_use]
    pub const fn new() -> Self {
        Self { name: None }
    }

    /// Restricts the output to the bare value of one counter.
    #[must_use]
    pub const fn with_name(mut self, name: Option<StatName>) -> Self {
        self.name = name;
        self
    }

    /// Parses a counter name given on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] listing the known names.
    pub fn parse_name(s: &str) -> Result<StatName> {
        StatName::parse(s).ok_or_else(|| {
            let known: Vec<&str> = StatName::ALL.iter().map(|name| name.as_str()).collect();
            Error::InvalidInput(format!(
                "unknown stat '{s}', expected one of: {}",
                known.join(", ")
            ))
        })
    }

    /// Writes the current counters to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store is unreachable or `out` fails.
    pub fn run(&self, counters: &dyn CounterStore, out: &mut impl Write) -> Result<()> {
        let stats = read_stats(counters)?;
        let rendered = match self.name {
            Some(name) => stats.get(name).to_string(),
            None => serde_json::to_string_pretty(&stats)
                .map_err(|e| Error::operation("serialize_stats", e))?,
        };
        writeln!(out, "{rendered}").map_err(|e| Error::operation("write_output", e))
    }
}

/// Deletes every stats counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetStatsCommand;

impl ResetStatsCommand {
    /// Creates a new reset command.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resets the counters and reports how many keys were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter store is unreachable or `out` fails.
    pub fn run(&self, counters: &dyn CounterStore, out: &mut impl Write) -> Result<()> {
        let removed = reset_stats(counters)?;
        writeln!(out, "Reset stats ({removed} counters removed)")
            .map_err(|e| Error::operation("write_output", e))
    }
}
