//! Configuration key lookup for `groundsync config list|get`.

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use super::settings::Settings;

/// Errors from key lookup.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Every supported `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Connection
    ConnectionAircraftUrl,
    ConnectionSimUrl,
    ConnectionRequestTimeoutSecs,

    // GSX
    GsxMenuFile,
    GsxMenuReadyTimeoutSecs,
    GsxOperatorDelayMs,
    GsxRepositionDelaySecs,

    // Services
    ServicesAutoReposition,
    ServicesAutoConnect,
    ServicesConnectPca,
    ServicesPcaOnlyJetway,
    ServicesJetwayOnly,
    ServicesAutoRefuel,
    ServicesCallCatering,
    ServicesAutoBoarding,
    ServicesAutoDeboarding,
    ServicesRefuelRateKgs,
    ServicesZeroFuelStart,
    ServicesSaveFuel,
    ServicesSaveHydraulicFluids,
    ServicesSynchBypass,

    // Monitor
    MonitorPollIntervalMs,

    // Logging
    LoggingDirectory,
    LoggingFile,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 24] = [
        ConfigKey::ConnectionAircraftUrl,
        ConfigKey::ConnectionSimUrl,
        ConfigKey::ConnectionRequestTimeoutSecs,
        ConfigKey::GsxMenuFile,
        ConfigKey::GsxMenuReadyTimeoutSecs,
        ConfigKey::GsxOperatorDelayMs,
        ConfigKey::GsxRepositionDelaySecs,
        ConfigKey::ServicesAutoReposition,
        ConfigKey::ServicesAutoConnect,
        ConfigKey::ServicesConnectPca,
        ConfigKey::ServicesPcaOnlyJetway,
        ConfigKey::ServicesJetwayOnly,
        ConfigKey::ServicesAutoRefuel,
        ConfigKey::ServicesCallCatering,
        ConfigKey::ServicesAutoBoarding,
        ConfigKey::ServicesAutoDeboarding,
        ConfigKey::ServicesRefuelRateKgs,
        ConfigKey::ServicesZeroFuelStart,
        ConfigKey::ServicesSaveFuel,
        ConfigKey::ServicesSaveHydraulicFluids,
        ConfigKey::ServicesSynchBypass,
        ConfigKey::MonitorPollIntervalMs,
        ConfigKey::LoggingDirectory,
        ConfigKey::LoggingFile,
    ];

    /// Canonical name, e.g. `services.auto_refuel`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ConnectionAircraftUrl => "connection.aircraft_url",
            ConfigKey::ConnectionSimUrl => "connection.sim_url",
            ConfigKey::ConnectionRequestTimeoutSecs => "connection.request_timeout_secs",
            ConfigKey::GsxMenuFile => "gsx.menu_file",
            ConfigKey::GsxMenuReadyTimeoutSecs => "gsx.menu_ready_timeout_secs",
            ConfigKey::GsxOperatorDelayMs => "gsx.operator_delay_ms",
            ConfigKey::GsxRepositionDelaySecs => "gsx.reposition_delay_secs",
            ConfigKey::ServicesAutoReposition => "services.auto_reposition",
            ConfigKey::ServicesAutoConnect => "services.auto_connect",
            ConfigKey::ServicesConnectPca => "services.connect_pca",
            ConfigKey::ServicesPcaOnlyJetway => "services.pca_only_jetway",
            ConfigKey::ServicesJetwayOnly => "services.jetway_only",
            ConfigKey::ServicesAutoRefuel => "services.auto_refuel",
            ConfigKey::ServicesCallCatering => "services.call_catering",
            ConfigKey::ServicesAutoBoarding => "services.auto_boarding",
            ConfigKey::ServicesAutoDeboarding => "services.auto_deboarding",
            ConfigKey::ServicesRefuelRateKgs => "services.refuel_rate_kgs",
            ConfigKey::ServicesZeroFuelStart => "services.zero_fuel_start",
            ConfigKey::ServicesSaveFuel => "services.save_fuel",
            ConfigKey::ServicesSaveHydraulicFluids => "services.save_hydraulic_fluids",
            ConfigKey::ServicesSynchBypass => "services.synch_bypass",
            ConfigKey::MonitorPollIntervalMs => "monitor.poll_interval_ms",
            ConfigKey::LoggingDirectory => "logging.directory",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Current value rendered the way it would be written in the file.
    pub fn get(&self, settings: &Settings) -> String {
        let p = &settings.services;
        match self {
            ConfigKey::ConnectionAircraftUrl => settings.connection.aircraft_url.clone(),
            ConfigKey::ConnectionSimUrl => settings.connection.sim_url.clone(),
            ConfigKey::ConnectionRequestTimeoutSecs => {
                settings.connection.request_timeout.as_secs().to_string()
            }
            ConfigKey::GsxMenuFile => path_to_display(&settings.gsx.menu_file),
            ConfigKey::GsxMenuReadyTimeoutSecs => {
                settings.gsx.menu_ready_timeout.as_secs().to_string()
            }
            ConfigKey::GsxOperatorDelayMs => settings.gsx.operator_delay.as_millis().to_string(),
            ConfigKey::GsxRepositionDelaySecs => {
                settings.gsx.reposition_delay.as_secs().to_string()
            }
            ConfigKey::ServicesAutoReposition => p.auto_reposition.to_string(),
            ConfigKey::ServicesAutoConnect => p.auto_connect.to_string(),
            ConfigKey::ServicesConnectPca => p.connect_pca.to_string(),
            ConfigKey::ServicesPcaOnlyJetway => p.pca_only_jetway.to_string(),
            ConfigKey::ServicesJetwayOnly => p.jetway_only.to_string(),
            ConfigKey::ServicesAutoRefuel => p.auto_refuel.to_string(),
            ConfigKey::ServicesCallCatering => p.call_catering.to_string(),
            ConfigKey::ServicesAutoBoarding => p.auto_boarding.to_string(),
            ConfigKey::ServicesAutoDeboarding => p.auto_deboarding.to_string(),
            ConfigKey::ServicesRefuelRateKgs => p.refuel_rate_kgs.to_string(),
            ConfigKey::ServicesZeroFuelStart => p.zero_fuel_start.to_string(),
            ConfigKey::ServicesSaveFuel => p.save_fuel.to_string(),
            ConfigKey::ServicesSaveHydraulicFluids => p.save_hydraulic_fluids.to_string(),
            ConfigKey::ServicesSynchBypass => p.synch_bypass.to_string(),
            ConfigKey::MonitorPollIntervalMs => {
                settings.monitor.poll_interval.as_millis().to_string()
            }
            ConfigKey::LoggingDirectory => path_to_display(&settings.logging.directory),
            ConfigKey::LoggingFile => settings.logging.file.clone(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Paths under the home directory are shown with `~`.
fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
