//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use groundsync::app::AppError;
use groundsync::config::ConfigFileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Application start-up or runtime failure
    App(AppError),
    /// Failed to install the Ctrl+C handler
    SignalHandler(String),
    /// One or both bridges did not answer the readiness check
    BridgesUnavailable { sim: bool, aircraft: bool },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::App(AppError::AlreadyRunning { .. }) => {
                eprintln!();
                eprintln!("Only one GroundSync instance may drive GSX at a time.");
            }
            CliError::App(AppError::Config(_)) | CliError::Config(_) => {
                eprintln!();
                eprintln!("Use 'groundsync config list' to see the effective settings.");
            }
            CliError::BridgesUnavailable { .. } => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The simulator is not running or still loading");
                eprintln!("  2. The bridge addresses in [connection] are wrong");
                eprintln!("  3. A firewall blocks local connections");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::App(e) => write!(f, "{}", e),
            CliError::SignalHandler(msg) => write!(f, "Failed to set signal handler: {}", msg),
            CliError::BridgesUnavailable { sim, aircraft } => {
                let mut down = Vec::new();
                if !sim {
                    down.push("simulator");
                }
                if !aircraft {
                    down.push("aircraft");
                }
                write!(f, "Bridge not reachable: {}", down.join(", "))
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::App(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::App(AppError::Config(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_names_missing_bridges() {
        let err = CliError::BridgesUnavailable {
            sim: true,
            aircraft: false,
        };
        assert_eq!(err.to_string(), "Bridge not reachable: aircraft");

        let err = CliError::BridgesUnavailable {
            sim: false,
            aircraft: false,
        };
        assert_eq!(err.to_string(), "Bridge not reachable: simulator, aircraft");
    }

    #[test]
    fn test_config_file_error_wraps_app_error() {
        let err: CliError = ConfigFileError::Parse("line 3".to_string()).into();
        assert!(matches!(err, CliError::App(AppError::Config(_))));
        assert!(err.to_string().contains("line 3"));
    }
}
