//! Thresholds and cadences of the turnaround state machine.

use std::time::Duration;

// =============================================================================
// Step intervals
// =============================================================================

/// Pushback running or a menu sequence settling.
pub const FAST_INTERVAL: Duration = Duration::from_millis(100);

/// Ground services (preflight, departure, arrival, turnaround).
pub const GROUND_INTERVAL: Duration = Duration::from_secs(1);

pub const TAXI_INTERVAL: Duration = Duration::from_millis(2500);

/// Cruise; only touchdown is watched.
pub const FLIGHT_INTERVAL: Duration = Duration::from_secs(180);

/// Either bus reports not-ready.
pub const NOT_READY_INTERVAL: Duration = Duration::from_secs(5);

// =============================================================================
// Aircraft state thresholds
// =============================================================================

/// Engine raw value below which an engine counts as shut down.
pub const ENGINE_OFF_THRESHOLD: f64 = 18.0;

/// Ground speed (kt) below which the aircraft counts as stationary.
pub const STATIONARY_SPEED_KT: f64 = 0.5;

/// Ground speed (kt) above which, with throttle applied, pushback is skipped.
pub const PUSH_SKIP_SPEED_KT: f64 = 5.0;

/// Throttle input above which the aircraft is moving under its own power.
pub const PUSH_SKIP_THROTTLE: f64 = 0.1;

/// Boolean-ish simulator values are "set" at or above this.
pub const FLAG_THRESHOLD: f64 = 0.5;

// =============================================================================
// Service pacing (ticks of the orchestrator loop)
// =============================================================================

pub const BOARDING_SETTLE_TICKS: u32 = 90;

pub const FINAL_LOADSHEET_MIN_TICKS: u32 = 90;

pub const FINAL_LOADSHEET_MAX_TICKS: u32 = 150;

/// GSX jetway/stairs state meaning "not available at this stand".
pub const GSX_NOT_AVAILABLE: f64 = 2.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_ordering() {
        assert!(FAST_INTERVAL < GROUND_INTERVAL);
        assert!(GROUND_INTERVAL < TAXI_INTERVAL);
        assert!(TAXI_INTERVAL < NOT_READY_INTERVAL);
        assert!(NOT_READY_INTERVAL < FLIGHT_INTERVAL);
    }

    #[test]
    fn test_loadsheet_window() {
        assert!(FINAL_LOADSHEET_MIN_TICKS <= FINAL_LOADSHEET_MAX_TICKS);
    }
}
