//! Variable Bus Adapter.
//!
//! A thin façade over the two external variable spaces:
//!
//! - **Simulator / GSX** ([`SimBus`]): numeric L-vars, simulation variables and
//!   environment variables, plus the GSX menu command channel.
//! - **Aircraft systems** ([`AircraftInterface`]): typed datarefs.
//!
//! ```text
//!            ┌────────────────────────┐
//!            │     Orchestrator       │
//!            └──────┬──────────┬──────┘
//!                   │          │
//!        GsxMenu ───┤          │
//!                   ▼          ▼
//!              ┌────────┐ ┌──────────────────┐
//!              │ SimBus │ │ AircraftInterface│◄── ChangeMonitor
//!              └────────┘ └──────────────────┘
//!         HttpSimBus / MemorySimBus   HttpAircraft / MemoryAircraft
//! ```
//!
//! Untyped values stop at this boundary: datarefs surface as [`DataValue`].

mod error;
mod http;
mod memory;
mod menu;
pub mod names;
mod operator;
mod traits;
mod value;

pub use error::BusError;
pub use http::{BridgeClient, HttpAircraft, HttpSimBus};
pub use memory::{MemoryAircraft, MemorySimBus, SimOp};
pub use menu::{
    GsxMenu, MenuEntry, DEFAULT_MENU_READY_TIMEOUT, MENU_READY_POLL, REPOSITION_GATE_ITEM,
};
pub use operator::{
    inspect_menu_file, select_operator_if_prompted, OperatorPrompt, OPERATOR_PROMPTS,
};
pub use traits::{AircraftInterface, SimBus};
pub use value::DataValue;
