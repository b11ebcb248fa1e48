//! Binary entry point for todo-backend.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use todo_backend::cli::{ConfigCommand, ResetStatsCommand, ServeCommand, StatsCommand};
use todo_backend::observability::{self, InitOptions};
use todo_backend::TodoConfig;
use todo_backend::storage::StorageFactory;

/// todo-backend - a todo REST API with Redis-backed stats.
#[derive(Parser)]
#[command(name = "todo-backend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "TODO_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve {
        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the stats counters kept in Redis.
    Stats {
        /// Print only this counter (`todos_created`, `todos_updated`,
        /// `todos_deleted`, `db_reads`).
        name: Option<String>,
    },

    /// Delete every stats counter kept in Redis.
    ResetStats,

    /// Configuration management.
    Config {
        /// Show the effective configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match TodoConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let expose_metrics = matches!(cli.command, Commands::Serve { .. });
    if let Err(e) = observability::init_from_config(
        &config.observability,
        InitOptions {
            verbose: cli.verbose,
            metrics_expose: expose_metrics,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(command: Commands, config: TodoConfig) -> anyhow::Result<()> {
    let mut stdout = io::stdout();

    match command {
        Commands::Serve { host, port } => ServeCommand::new()
            .with_host(host)
            .with_port(port)
            .run(config)
            .await
            .context("server failed"),

        Commands::Stats { name } => {
            let name = name.as_deref().map(StatsCommand::parse_name).transpose()?;
            let counters = StorageFactory::shared_counters(&config.cache)
                .context("failed to open counter store")?;
            StatsCommand::new()
                .with_name(name)
                .run(counters.as_ref(), &mut stdout)
                .context("failed to read stats")
        },

        Commands::ResetStats => {
            let counters = StorageFactory::shared_counters(&config.cache)
                .context("failed to open counter store")?;
            ResetStatsCommand::new()
                .run(counters.as_ref(), &mut stdout)
                .context("failed to reset stats")
        },

        Commands::Config { show } => ConfigCommand::new(show)
            .run(&config, &mut stdout)
            .context("failed to print configuration"),
    }
}
