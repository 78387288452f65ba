//! Typed settings parsed from `config.ini`.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;
use crate::turnaround::{ServicePolicy, TimingConfig, TurnaroundConfig};

/// `[connection]`: bridge endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub aircraft_url: String,
    pub sim_url: String,
    pub request_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            aircraft_url: DEFAULT_AIRCRAFT_URL.to_string(),
            sim_url: DEFAULT_SIM_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// `[gsx]`: menu handling.
#[derive(Debug, Clone, PartialEq)]
pub struct GsxSettings {
    pub menu_file: PathBuf,
    pub menu_ready_timeout: Duration,
    pub operator_delay: Duration,
    pub reposition_delay: Duration,
}

impl Default for GsxSettings {
    fn default() -> Self {
        Self {
            menu_file: default_menu_file(),
            menu_ready_timeout: Duration::from_secs(DEFAULT_MENU_READY_TIMEOUT_SECS),
            operator_delay: Duration::from_millis(DEFAULT_OPERATOR_DELAY_MS),
            reposition_delay: Duration::from_secs(DEFAULT_REPOSITION_DELAY_SECS),
        }
    }
}

/// `[monitor]`
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// Complete configuration. `[services]` maps directly onto [`ServicePolicy`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub gsx: GsxSettings,
    pub services: ServicePolicy,
    pub monitor: MonitorSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Orchestrator configuration with the default tick delays.
    pub fn to_turnaround_config(&self) -> TurnaroundConfig {
        let timing = TimingConfig {
            menu_ready_timeout: self.gsx.menu_ready_timeout,
            operator_delay: self.gsx.operator_delay,
            reposition_delay: self.gsx.reposition_delay,
            ..TimingConfig::default()
        };
        TurnaroundConfig::default()
            .with_policy(self.services.clone())
            .with_timing(timing)
            .with_menu_file(self.gsx.menu_file.clone())
    }
}
