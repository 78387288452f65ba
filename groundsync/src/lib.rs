//! GroundSync - automated GSX ground handling for airliner turnarounds
//!
//! This library coordinates three parties during a simulated flight's
//! ground phases: the aircraft's systems, the GSX ground-services addon,
//! and an external loadsheet service. It watches the flight phase, requests
//! GSX services through its menu, mirrors service progress (fuel,
//! passengers, cargo, doors, ground equipment) into the aircraft, and
//! triggers loadsheet generation at the right moments.
//!
//! # Modules
//!
//! - [`bus`]: variable access to the simulator and the aircraft
//! - [`monitor`]: background change detection on aircraft datarefs
//! - [`loadsheet`]: loadsheet generation requests
//! - [`events`]: phase, service and door notifications
//! - [`turnaround`]: the flight-phase state machine and its driver loop
//! - [`config`], [`logging`], [`app`]: configuration, tracing setup, lifecycle

pub mod app;
pub mod bus;
pub mod config;
pub mod events;
pub mod loadsheet;
pub mod logging;
pub mod monitor;
pub mod turnaround;

/// Crate version reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
