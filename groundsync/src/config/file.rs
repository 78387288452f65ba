//! Configuration file handling for `~/.groundsync/config.ini`.
//!
//! A missing file yields defaults. Parsing lives in [`super::parser`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::settings::Settings;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read the file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid INI
    #[error("Failed to parse config file: {0}")]
    Parse(String),

    /// A key holds an unusable value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl From<ini::Error> for ConfigFileError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(e) => ConfigFileError::Io(e),
            ini::Error::Parse(e) => ConfigFileError::Parse(e.to_string()),
        }
    }
}

impl Settings {
    /// Load from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from a specific path. A missing file returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Parse INI text directly.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        super::parser::parse_ini(&ini)
    }
}

/// `~/.groundsync`
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// `~/.groundsync/config.ini`
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&temp_dir.path().join("missing.ini")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[services]\nauto_refuel = false\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(!settings.services.auto_refuel);
        assert!(settings.services.auto_boarding);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[services\nauto_refuel = false\n").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_path_layout() {
        let path = config_file_path();
        assert!(path.ends_with(".groundsync/config.ini"));
    }
}
