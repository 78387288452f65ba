//! Turnaround orchestration.
//!
//! A flight-phase state machine that drives GSX ground services for one
//! aircraft across repeated legs:
//!
//! ```text
//! Preflight ──► Departure ──► TaxiOut ──► Flight ──► TaxiIn ──► Arrival ──► Turnaround
//!     │             │                       ▲                                   │
//!     └─────────────┴───────────────────────┘                                   │
//!                   ▲                                                           │
//!                   └──────────────────── new flight plan ──────────────────────┘
//! ```
//!
//! The [`Orchestrator`] is stepped by [`run`] on a dedicated thread. It reads
//! GSX state through a [`SimBus`](crate::bus::SimBus), writes aircraft state
//! through an [`AircraftInterface`](crate::bus::AircraftInterface), and
//! publishes [`TurnaroundEvent`](crate::events::TurnaroundEvent)s on every
//! phase, service and door change.

mod config;
mod constants;
mod doors;
mod error;
mod orchestrator;
mod passengers;
mod phase;
mod runner;
mod service;
mod session;
mod signals;

pub mod fuel;

pub use config::{ServicePolicy, TimingConfig, TurnaroundConfig};
pub use constants::{
    BOARDING_SETTLE_TICKS, ENGINE_OFF_THRESHOLD, FAST_INTERVAL, FINAL_LOADSHEET_MAX_TICKS,
    FINAL_LOADSHEET_MIN_TICKS, FLAG_THRESHOLD, FLIGHT_INTERVAL, GROUND_INTERVAL,
    GSX_NOT_AVAILABLE, NOT_READY_INTERVAL, PUSH_SKIP_SPEED_KT, PUSH_SKIP_THROTTLE,
    STATIONARY_SPEED_KT, TAXI_INTERVAL,
};
pub use doors::{door_action, Door, ToggleDispatcher, DOOR_TOGGLES};
pub use error::TurnaroundError;
pub use orchestrator::{Orchestrator, OrchestratorStatus};
pub use passengers::{PassengerTracker, MAX_PAX_DELTA_PER_TICK};
pub use phase::FlightPhase;
pub use runner::{run, spawn, RunnerHandle};
pub use service::{equipment_status, ServiceKind, ServiceStatus};
pub use session::{CarryOver, LoadsheetTask, TurnaroundSession};
pub use signals::{equipment_dataref, AircraftSignal, EQUIPMENT_DATAREFS};
