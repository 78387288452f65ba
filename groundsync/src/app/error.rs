//! Application error types.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::bus::BusError;
use crate::config::ConfigFileError;

/// Errors that end the application.
#[derive(Debug)]
pub enum AppError {
    /// The configuration could not be loaded.
    Config(ConfigFileError),

    /// Another instance holds the lock file.
    AlreadyRunning { lock_path: PathBuf },

    /// Runtime, thread or lock-file setup failed.
    Runtime(io::Error),

    /// A bridge client could not be created.
    Bus(BusError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::AlreadyRunning { lock_path } => write!(
                f,
                "Another instance is already running (lock file {}). \
                 Delete the file if no other instance is active.",
                lock_path.display()
            ),
            AppError::Runtime(e) => write!(f, "Runtime error: {}", e),
            AppError::Bus(e) => write!(f, "Bridge setup failed: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::AlreadyRunning { .. } => None,
            AppError::Runtime(e) => Some(e),
            AppError::Bus(e) => Some(e),
        }
    }
}

impl From<ConfigFileError> for AppError {
    fn from(e: ConfigFileError) -> Self {
        AppError::Config(e)
    }
}

impl From<BusError> for AppError {
    fn from(e: BusError) -> Self {
        AppError::Bus(e)
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Runtime(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_running_names_lock_file() {
        let err = AppError::AlreadyRunning {
            lock_path: PathBuf::from("/tmp/groundsync.lock"),
        };
        assert!(err.to_string().contains("/tmp/groundsync.lock"));
    }

    #[test]
    fn test_config_error_keeps_source() {
        let err: AppError = ConfigFileError::Parse("bad".to_string()).into();
        assert!(err.to_string().contains("Configuration error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
