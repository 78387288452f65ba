//! GroundSync CLI - Command-line interface
//!
//! Thin wrapper around the `groundsync` library: loads settings, sets up
//! logging, and runs the turnaround orchestrator until interrupted.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "groundsync")]
#[command(version = groundsync::VERSION)]
#[command(about = "Automated GSX ground handling for airliner turnarounds", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.groundsync/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive ground services until Ctrl+C
    Run,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Check the simulator and aircraft bridges once
    Check,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run => commands::run::run(config),
        Commands::Config { command } => commands::config::run(command, config),
        Commands::Check => commands::check::run(config),
    };

    if let Err(e) = result {
        e.exit();
    }
}
