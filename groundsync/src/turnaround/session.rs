//! Per-leg turnaround state.

use super::passengers::PassengerTracker;

/// One scheduled loadsheet request.
///
/// ```text
/// idle ──arm(n)──► counting ──n ticks──► in flight ──success──► done
///   ▲                                        │
///   └────────────────failure─────────────────┘
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadsheetTask {
    pub done: bool,
    pub in_flight: bool,
    pub countdown: Option<u32>,
    pub attempts: u32,
}

impl LoadsheetTask {
    /// Whether the task is idle and needs a delay to be scheduled.
    pub fn needs_arming(&self) -> bool {
        !self.done && !self.in_flight && self.countdown.is_none()
    }

    pub fn arm(&mut self, ticks: u32) {
        if self.needs_arming() {
            self.countdown = Some(ticks);
        }
    }

    /// Advance one tick. Returns `true` when an attempt must start now.
    pub fn tick(&mut self) -> bool {
        if self.done || self.in_flight {
            return false;
        }
        match self.countdown {
            Some(0) => {
                self.countdown = None;
                self.in_flight = true;
                self.attempts += 1;
                true
            }
            Some(n) => {
                self.countdown = Some(n - 1);
                false
            }
            None => false,
        }
    }

    pub fn complete(&mut self, success: bool) {
        self.in_flight = false;
        if success {
            self.done = true;
        }
    }
}

/// Mutable aggregate for one leg, reset in place at every new flight plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnaroundSession {
    // Flight plan snapshot
    pub flight_plan_id: Option<String>,
    pub flight_number: Option<String>,
    pub planned_fuel_kg: f64,
    pub planned_pax: i64,
    pub planned_cargo_kg: f64,

    // Preparation
    pub prepared: bool,
    pub repositioned: bool,
    pub connect_called: bool,
    pub pca_called: bool,
    pub pca_removed: bool,

    // Refuel
    pub refuel_requested: bool,
    pub refuel_started: bool,
    pub refuel_paused: bool,
    pub refuel_finished: bool,
    pub fuel_hose_connected: bool,

    // Catering
    pub catering_requested: bool,
    pub catering_finished: bool,

    // Boarding
    pub boarding_settle_ticks: u32,
    pub boarding_requested: bool,
    pub boarding_finished: bool,
    pub boarding_pax: PassengerTracker,
    pub cargo_loaded: bool,

    // Loadsheets
    pub preliminary_loadsheet: LoadsheetTask,
    pub final_loadsheet: LoadsheetTask,

    // Departure
    pub equipment_removed: bool,
    pub push_running: bool,
    pub push_finished: bool,
    pub nws_disconnected: bool,

    // Arrival
    pub arrival_prepared: bool,
    pub deboarding_requested: bool,
    pub deboarding_started: bool,
    pub deboarding_finished: bool,
    pub deboard_pax: PassengerTracker,
    pub cargo_unloaded: bool,
}

impl TurnaroundSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every flag for a new leg, keeping only the new identifiers.
    pub fn reset_for_leg(&mut self, flight_plan_id: String, flight_number: Option<String>) {
        *self = Self {
            flight_plan_id: Some(flight_plan_id),
            flight_number,
            ..Self::default()
        };
    }

    pub fn preliminary_loadsheet_generated(&self) -> bool {
        self.preliminary_loadsheet.done
    }

    pub fn final_loadsheet_sent(&self) -> bool {
        self.final_loadsheet.done
    }

    /// Everything the departure gate requires before taxi.
    pub fn departure_complete(&self) -> bool {
        self.refuel_finished
            && self.boarding_finished
            && self.final_loadsheet_sent()
            && self.equipment_removed
            && self.push_finished
    }
}

/// Values that survive the turnaround reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarryOver {
    pub fuel_kg: Option<f64>,
    pub hydraulics: Option<[f64; 3]>,
}
