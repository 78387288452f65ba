//! Loadsheet Generator.
//!
//! Asks the aircraft to produce a preliminary or final loadsheet through its
//! native endpoint. Nothing is computed locally. Each call is a single attempt;
//! the orchestrator owns the retry policy.
//!
//! ```text
//! Orchestrator ──dispatch(kind)──► tokio task ──POST /loadsheet/{kind}──► aircraft
//!      ▲                                 │
//!      └──────── drain() ◄── mpsc ◄──────┘  LoadsheetOutcome
//! ```
//!
//! Accepted loadsheets with a body are handed to an [`AcarsRelay`].

mod dispatch;
mod generator;
mod relay;
mod types;

pub use dispatch::LoadsheetDispatcher;
pub use generator::{BoxFuture, HttpLoadsheetGenerator, LoadsheetApi, ScriptedLoadsheetApi};
pub use relay::{AcarsMessage, AcarsRelay, AircraftAcarsRelay, RecordingRelay};
pub use types::{LoadsheetKind, LoadsheetOutcome, LoadsheetResult};
