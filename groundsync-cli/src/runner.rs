//! CLI runner for common setup.
//!
//! Loads settings and initializes logging so command handlers start from a
//! configured process.

use std::path::{Path, PathBuf};

use groundsync::config::{config_directory, config_file_path, Settings};
use groundsync::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    settings: Settings,
}

impl CliRunner {
    /// Load settings and start logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let settings = load_settings(config_path)?;

        let log_dir = resolve_log_dir(&settings.logging.directory);
        let logging_guard = init_logging(&log_dir, &settings.logging.file)
            .map_err(|e| CliError::LoggingInit(format!("{}: {}", log_dir.display(), e)))?;

        Ok(Self {
            _logging_guard: logging_guard,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("GroundSync v{}", groundsync::VERSION);
        info!("GroundSync CLI: {} command", command);
    }
}

/// Settings from `path`, or from the default location.
///
/// An explicit path must exist; the default file may be absent.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) if !path.exists() => Err(CliError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        ))),
        Some(path) => Ok(Settings::load_from(path)?),
        None => Ok(Settings::load()?),
    }
}

/// The configuration file in effect.
pub fn effective_config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(config_file_path)
}

/// Relative log directories live under the configuration directory.
fn resolve_log_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        config_directory().join(dir)
    }
}
