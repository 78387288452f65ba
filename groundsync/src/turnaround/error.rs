//! Turnaround error types.

use thiserror::Error;

use crate::bus::BusError;

/// Errors raised inside one orchestrator tick.
///
/// None of these escape [`Orchestrator::step`](super::Orchestrator::step);
/// a bus error abandons the tick, an invariant violation rejects one value.
#[derive(Debug, Clone, Error)]
pub enum TurnaroundError {
    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("invariant violated: {0}")]
    Invariant(String),
}
