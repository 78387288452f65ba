//! Configuration management CLI commands.
//!
//! Provides `config get`, `config list`, and `config path` for viewing the
//! effective settings from the command line.

use std::path::Path;

use clap::Subcommand;
use groundsync::config::{ConfigKey, Settings};

use crate::error::CliError;
use crate::runner::{effective_config_path, load_settings};

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., services.save_fuel)
        key: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key, config_path),
        ConfigCommands::List => run_list(config_path),
        ConfigCommands::Path => run_path(config_path),
    }
}

/// Get a configuration value.
fn run_get(key: &str, config_path: Option<&Path>) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'groundsync config list' to see available keys.",
            key
        ))
    })?;

    let settings = load_settings(config_path)?;
    println!("{}", display_value(&config_key.get(&settings)));
    Ok(())
}

/// List all configuration settings.
fn run_list(config_path: Option<&Path>) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;

    println!("Configuration Settings");
    println!("======================");
    println!();
    print!("{}", render_list(&settings));
    Ok(())
}

/// Show the configuration file path.
fn run_path(config_path: Option<&Path>) -> Result<(), CliError> {
    println!("{}", effective_config_path(config_path).display());
    Ok(())
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

/// Every key grouped under its INI section header.
fn render_list(settings: &Settings) -> String {
    let mut out = String::new();
    let mut current_section = "";

    for key in ConfigKey::ALL {
        let section = key.section();
        if section != current_section {
            if !current_section.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", section));
            current_section = section;
        }

        let key_name = key.name().split_once('.').map_or(key.name(), |(_, k)| k);
        out.push_str(&format!(
            "  {} = {}\n",
            key_name,
            display_value(&key.get(settings))
        ));
    }
    out
}
