//! Door automation driven by GSX service toggles.
//!
//! GSX raises a toggle L-var when a vehicle reaches a door. A rising edge
//! (0 → 1) on a mapped toggle triggers the door's action:
//!
//! ```text
//! SERVICE_1_TOGGLE ─► forward passenger door ┐  catering requested      → open
//! SERVICE_2_TOGGLE ─► aft passenger door     ┘  catering active / done  → close
//! CARGO_1_TOGGLE   ─► forward cargo door     ┐  cargo service complete  → close
//! CARGO_2_TOGGLE   ─► aft cargo door         ┘  otherwise               → open
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::bus::names::{dataref, lvar};

use super::service::ServiceStatus;

/// Aircraft doors under automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Door {
    ForwardLeft,
    AftLeft,
    CargoForward,
    CargoAft,
}

impl Door {
    pub const ALL: [Door; 4] = [
        Door::ForwardLeft,
        Door::AftLeft,
        Door::CargoForward,
        Door::CargoAft,
    ];

    pub fn dataref(self) -> &'static str {
        match self {
            Door::ForwardLeft => dataref::DOOR_FWD_LEFT,
            Door::AftLeft => dataref::DOOR_AFT_LEFT,
            Door::CargoForward => dataref::DOOR_CARGO_FWD,
            Door::CargoAft => dataref::DOOR_CARGO_AFT,
        }
    }

    pub fn is_cargo(self) -> bool {
        matches!(self, Door::CargoForward | Door::CargoAft)
    }

    pub fn from_dataref(name: &str) -> Option<Door> {
        Door::ALL.into_iter().find(|d| d.dataref() == name)
    }
}

impl std::fmt::Display for Door {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Door::ForwardLeft => "forward passenger door",
            Door::AftLeft => "aft passenger door",
            Door::CargoForward => "forward cargo door",
            Door::CargoAft => "aft cargo door",
        };
        write!(f, "{}", name)
    }
}

/// Toggle L-var → door table.
pub const DOOR_TOGGLES: [(&str, Door); 4] = [
    (lvar::SERVICE_1_TOGGLE, Door::ForwardLeft),
    (lvar::SERVICE_2_TOGGLE, Door::AftLeft),
    (lvar::CARGO_1_TOGGLE, Door::CargoForward),
    (lvar::CARGO_2_TOGGLE, Door::CargoAft),
];

/// What a toggle should do to its door. `None` leaves the door alone.
pub fn door_action(door: Door, catering: ServiceStatus, cargo_complete: bool) -> Option<bool> {
    if door.is_cargo() {
        return Some(!cargo_complete);
    }
    match catering {
        ServiceStatus::Requested => Some(true),
        ServiceStatus::Active | ServiceStatus::Completed => Some(false),
        ServiceStatus::Inactive | ServiceStatus::Disconnected => None,
    }
}

/// Rising-edge detector over the toggle L-vars.
#[derive(Debug, Default)]
pub struct ToggleDispatcher {
    last: HashMap<&'static str, bool>,
}

impl ToggleDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current value of a toggle. Returns the mapped door on a
    /// rising edge.
    pub fn observe(&mut self, name: &'static str, value: f64) -> Option<Door> {
        let raised = value >= 0.5;
        let was = self.last.insert(name, raised).unwrap_or(false);
        if raised && !was {
            DOOR_TOGGLES
                .iter()
                .find(|(toggle, _)| *toggle == name)
                .map(|(_, door)| *door)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_edge_only() {
        let mut dispatcher = ToggleDispatcher::new();
        assert_eq!(dispatcher.observe(lvar::SERVICE_1_TOGGLE, 0.0), None);
        assert_eq!(
            dispatcher.observe(lvar::SERVICE_1_TOGGLE, 1.0),
            Some(Door::ForwardLeft)
        );
        assert_eq!(dispatcher.observe(lvar::SERVICE_1_TOGGLE, 1.0), None);
        assert_eq!(dispatcher.observe(lvar::SERVICE_1_TOGGLE, 0.0), None);
        assert_eq!(
            dispatcher.observe(lvar::SERVICE_1_TOGGLE, 1.0),
            Some(Door::ForwardLeft)
        );
    }

    #[test]
    fn test_unmapped_toggle_ignored() {
        let mut dispatcher = ToggleDispatcher::new();
        assert_eq!(dispatcher.observe("FSDT_GSX_SOMETHING", 1.0), None);
    }

    #[test]
    fn test_passenger_door_follows_catering() {
        assert_eq!(
            door_action(Door::AftLeft, ServiceStatus::Requested, false),
            Some(true)
        );
        assert_eq!(
            door_action(Door::AftLeft, ServiceStatus::Active, false),
            Some(false)
        );
        assert_eq!(
            door_action(Door::ForwardLeft, ServiceStatus::Completed, false),
            Some(false)
        );
        assert_eq!(door_action(Door::ForwardLeft, ServiceStatus::Inactive, false), None);
    }

    #[test]
    fn test_cargo_door_follows_cargo_service() {
        assert_eq!(
            door_action(Door::CargoAft, ServiceStatus::Inactive, false),
            Some(true)
        );
        assert_eq!(
            door_action(Door::CargoForward, ServiceStatus::Requested, true),
            Some(false)
        );
    }

    #[test]
    fn test_dataref_lookup() {
        assert_eq!(
            Door::from_dataref(dataref::DOOR_CARGO_AFT),
            Some(Door::CargoAft)
        );
        assert_eq!(Door::from_dataref("efb.chocks"), None);
    }
}
