//! Default values for every configuration key.

use std::path::PathBuf;
use std::time::Duration;

use crate::monitor::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};

pub const DEFAULT_AIRCRAFT_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_SIM_URL: &str = "http://127.0.0.1:8086";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_MENU_READY_TIMEOUT_SECS: u64 = 100;
pub const DEFAULT_OPERATOR_DELAY_MS: u64 = 2000;
pub const DEFAULT_REPOSITION_DELAY_SECS: u64 = 3;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = DEFAULT_POLL_INTERVAL.as_millis() as u64;

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "groundsync.log";

/// Directory holding `config.ini` and the instance lock.
pub const CONFIG_DIR_NAME: &str = ".groundsync";
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Where GSX mirrors its menu text.
pub fn default_menu_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Virtuali")
        .join("GSX")
        .join("MSFS")
        .join("menu")
}

/// Raise a poll interval to the monitor floor.
pub fn clamp_poll_interval(interval: Duration) -> Duration {
    if interval < MIN_POLL_INTERVAL {
        tracing::warn!(
            requested_ms = interval.as_millis() as u64,
            floor_ms = MIN_POLL_INTERVAL.as_millis() as u64,
            "monitor.poll_interval_ms below floor, clamping"
        );
        MIN_POLL_INTERVAL
    } else {
        interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_file_ends_with_gsx_path() {
        let path = default_menu_file();
        assert!(path.ends_with("Virtuali/GSX/MSFS/menu"));
    }

    #[test]
    fn test_clamp_poll_interval() {
        assert_eq!(clamp_poll_interval(Duration::from_millis(1)), MIN_POLL_INTERVAL);
        assert_eq!(
            clamp_poll_interval(Duration::from_millis(250)),
            Duration::from_millis(250)
        );
    }
}
