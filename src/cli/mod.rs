//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the HTTP server until Ctrl-C |
//! | `stats [NAME]` | Print the stats counters as JSON, or one counter |
//! | `reset-stats` | Delete every stats counter |
//! | `config` | Show the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! # Serve on a custom port with Redis
//! TODO_REDIS_URL=redis://localhost:6379 todo-backend serve --port 9000
//!
//! # Inspect counters written by a running server
//! TODO_REDIS_URL=redis://localhost:6379 todo-backend stats
//! TODO_REDIS_URL=redis://localhost:6379 todo-backend stats db_reads
//! ```
//!
//! Commands write their output to a caller-supplied writer.

mod config;
mod serve;
mod stats;

pub use config::ConfigCommand;
pub use serve::{ServeCommand, shutdown_signal};
pub use stats::{ResetStatsCommand, StatsCommand};
