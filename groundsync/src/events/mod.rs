//! Event/Status Broadcaster.
//!
//! The orchestrator reports phase transitions, service status changes, door
//! movements and loadsheet outcomes through an [`EventSink`]. The default sink
//! fans them out to any number of live subscribers over a tokio broadcast
//! channel; a missing subscriber is not an error.

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::loadsheet::LoadsheetKind;
use crate::turnaround::{Door, FlightPhase, ServiceKind, ServiceStatus};

/// Default channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Notification emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnaroundEvent {
    PhaseChanged {
        from: FlightPhase,
        to: FlightPhase,
    },
    ServiceChanged {
        service: ServiceKind,
        status: ServiceStatus,
    },
    DoorChanged {
        door: Door,
        open: bool,
    },
    Loadsheet {
        #[serde(serialize_with = "serialize_kind")]
        kind: LoadsheetKind,
        success: bool,
    },
}

fn serialize_kind<S: serde::Serializer>(kind: &LoadsheetKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.path())
}

impl std::fmt::Display for TurnaroundEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnaroundEvent::PhaseChanged { from, to } => write!(f, "phase {} -> {}", from, to),
            TurnaroundEvent::ServiceChanged { service, status } => {
                write!(f, "{} {}", service, status)
            }
            TurnaroundEvent::DoorChanged { door, open } => {
                write!(f, "{} {}", door, if *open { "open" } else { "closed" })
            }
            TurnaroundEvent::Loadsheet { kind, success } => write!(
                f,
                "{} loadsheet {}",
                kind,
                if *success { "received" } else { "failed" }
            ),
        }
    }
}

/// Receiver of orchestrator notifications.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: TurnaroundEvent);
}

/// In-process broadcaster based on tokio broadcast channels.
#[derive(Debug)]
pub struct StatusBroadcaster {
    tx: broadcast::Sender<TurnaroundEvent>,
}

impl StatusBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TurnaroundEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventSink for StatusBroadcaster {
    fn publish(&self, event: TurnaroundEvent) {
        tracing::debug!(event = %event, "Broadcast");
        // No receivers is fine; the log has the record.
        let _ = self.tx.send(event);
    }
}

/// Sink that keeps every event, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TurnaroundEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TurnaroundEvent> {
        self.events.lock().clone()
    }

    /// Phase transitions as `(from, to)` pairs, oldest first.
    pub fn phase_changes(&self) -> Vec<(FlightPhase, FlightPhase)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                TurnaroundEvent::PhaseChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    /// Status history of one service.
    pub fn service_history(&self, service: ServiceKind) -> Vec<ServiceStatus> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                TurnaroundEvent::ServiceChanged { service: s, status } if *s == service => {
                    Some(*status)
                }
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: TurnaroundEvent) {
        self.events.lock().push(event);
    }
}
