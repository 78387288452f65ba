//! Orchestrator configuration.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::bus::DEFAULT_MENU_READY_TIMEOUT;

use super::constants::{BOARDING_SETTLE_TICKS, FINAL_LOADSHEET_MAX_TICKS, FINAL_LOADSHEET_MIN_TICKS};

/// Which services are automated.
#[derive(Debug, Clone, PartialEq)]
pub struct ServicePolicy {
    /// Reposition at the gate through GSX on startup.
    pub auto_reposition: bool,
    /// Call jetway/stairs automatically.
    pub auto_connect: bool,
    pub connect_pca: bool,
    /// Only connect PCA where a jetway exists.
    pub pca_only_jetway: bool,
    /// Never call stairs.
    pub jetway_only: bool,
    pub auto_refuel: bool,
    pub call_catering: bool,
    pub auto_boarding: bool,
    pub auto_deboarding: bool,
    /// Fuel delivered per orchestrator tick while the hose is connected.
    pub refuel_rate_kgs: f64,
    /// Start every leg with empty tanks.
    pub zero_fuel_start: bool,
    /// Carry the arrival fuel over to the next leg.
    pub save_fuel: bool,
    /// Carry hydraulic reservoir levels over to the next leg.
    pub save_hydraulic_fluids: bool,
    /// Freeze the aircraft while GSX tows it (bypass pin inserted).
    pub synch_bypass: bool,
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self {
            auto_reposition: true,
            auto_connect: true,
            connect_pca: true,
            pca_only_jetway: true,
            jetway_only: false,
            auto_refuel: true,
            call_catering: true,
            auto_boarding: true,
            auto_deboarding: true,
            refuel_rate_kgs: 28.0,
            zero_fuel_start: false,
            save_fuel: false,
            save_hydraulic_fluids: false,
            synch_bypass: true,
        }
    }
}

/// Delays used while driving GSX.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingConfig {
    /// Bound on the menu ready wait.
    pub menu_ready_timeout: Duration,
    /// Pause before looking for an operator prompt.
    pub operator_delay: Duration,
    /// Settle time between reposition menu steps.
    pub reposition_delay: Duration,
    /// Pause between bypass pin insertion and freezing the aircraft.
    pub bypass_settle: Duration,
    pub boarding_settle_ticks: u32,
    pub loadsheet_delay_ticks: RangeInclusive<u32>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            menu_ready_timeout: DEFAULT_MENU_READY_TIMEOUT,
            operator_delay: Duration::from_secs(2),
            reposition_delay: Duration::from_secs(3),
            bypass_settle: Duration::from_secs(1),
            boarding_settle_ticks: BOARDING_SETTLE_TICKS,
            loadsheet_delay_ticks: FINAL_LOADSHEET_MIN_TICKS..=FINAL_LOADSHEET_MAX_TICKS,
        }
    }
}

impl TimingConfig {
    /// No sleeps and no tick delays; for tests and replay.
    pub fn immediate() -> Self {
        Self {
            menu_ready_timeout: Duration::from_millis(10),
            operator_delay: Duration::ZERO,
            reposition_delay: Duration::ZERO,
            bypass_settle: Duration::ZERO,
            boarding_settle_ticks: 0,
            loadsheet_delay_ticks: 0..=0,
        }
    }
}

/// Everything the orchestrator needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TurnaroundConfig {
    pub policy: ServicePolicy,
    pub timing: TimingConfig,
    /// GSX menu mirror used for operator prompts.
    pub menu_file: PathBuf,
}

impl TurnaroundConfig {
    pub fn with_policy(mut self, policy: ServicePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_menu_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.menu_file = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let policy = ServicePolicy::default();
        assert!(policy.auto_refuel);
        assert!(!policy.jetway_only);
        assert!(!policy.zero_fuel_start);
        assert_eq!(policy.refuel_rate_kgs, 28.0);
    }

    #[test]
    fn test_default_timing_window() {
        let timing = TimingConfig::default();
        assert_eq!(timing.boarding_settle_ticks, 90);
        assert_eq!(timing.loadsheet_delay_ticks, 90..=150);
        assert_eq!(timing.menu_ready_timeout, Duration::from_secs(100));
    }

    #[test]
    fn test_builder() {
        let config = TurnaroundConfig::default()
            .with_timing(TimingConfig::immediate())
            .with_menu_file("/tmp/menu");
        assert_eq!(config.timing.operator_delay, Duration::ZERO);
        assert_eq!(config.menu_file, PathBuf::from("/tmp/menu"));
    }
}
