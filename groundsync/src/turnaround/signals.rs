//! Aircraft change handlers.
//!
//! The orchestrator watches ground equipment and door datarefs through the
//! change monitor. Callbacks run on the monitor thread, so they only queue a
//! signal; the orchestrator applies it on its next tick.

use tokio::sync::mpsc::UnboundedSender;

use crate::bus::names::dataref;
use crate::bus::DataValue;
use crate::monitor::{CallbackError, CallbackId, ChangeMonitor};

use super::doors::Door;
use super::service::ServiceKind;

/// A change observed on an aircraft dataref.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AircraftSignal {
    Equipment(ServiceKind, bool),
    Door(Door, bool),
}

/// Equipment datarefs and the service they report.
pub const EQUIPMENT_DATAREFS: [(&str, ServiceKind); 3] = [
    (dataref::GROUND_POWER, ServiceKind::Gpu),
    (dataref::PCA, ServiceKind::Pca),
    (dataref::CHOCKS, ServiceKind::Chocks),
];

/// Dataref written when an equipment service is set or removed.
pub fn equipment_dataref(kind: ServiceKind) -> Option<&'static str> {
    EQUIPMENT_DATAREFS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(name, _)| *name)
}

fn as_flag(name: &str, value: &DataValue) -> Result<bool, CallbackError> {
    value
        .as_bool()
        .ok_or_else(|| CallbackError::new(format!("{} is not boolean: {}", name, value)))
}

fn forward(
    tx: &UnboundedSender<AircraftSignal>,
    signal: AircraftSignal,
) -> Result<(), CallbackError> {
    tx.send(signal)
        .map_err(|_| CallbackError::new("orchestrator no longer listening"))
}

/// Register equipment and door handlers. Returns the handles for removal.
pub fn register_handlers(
    monitor: &ChangeMonitor,
    tx: &UnboundedSender<AircraftSignal>,
) -> Vec<(&'static str, CallbackId)> {
    let mut handles = Vec::with_capacity(EQUIPMENT_DATAREFS.len() + Door::ALL.len());

    for (name, kind) in EQUIPMENT_DATAREFS {
        let tx = tx.clone();
        let id = monitor.subscribe(name, move |name, _old, new| {
            forward(&tx, AircraftSignal::Equipment(kind, as_flag(name, new)?))
        });
        handles.push((name, id));
    }

    for door in Door::ALL {
        let tx = tx.clone();
        let id = monitor.subscribe(door.dataref(), move |name, _old, new| {
            forward(&tx, AircraftSignal::Door(door, as_flag(name, new)?))
        });
        handles.push((door.dataref(), id));
    }

    tracing::debug!(count = handles.len(), "Aircraft change handlers registered");
    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{AircraftInterface, MemoryAircraft};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[test]
    fn test_changes_become_signals() {
        let aircraft = Arc::new(MemoryAircraft::new());
        aircraft.set(dataref::CHOCKS, false);
        aircraft.set(dataref::DOOR_CARGO_AFT, false);
        let monitor = ChangeMonitor::new(
            Arc::clone(&aircraft) as Arc<dyn AircraftInterface>,
            Duration::from_secs(3600),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handles = register_handlers(&monitor, &tx);
        assert_eq!(handles.len(), 7);

        aircraft.set(dataref::CHOCKS, true);
        aircraft.set(dataref::DOOR_CARGO_AFT, true);
        monitor.poll_once();

        let mut signals = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            signals.push(signal);
        }
        assert!(signals.contains(&AircraftSignal::Equipment(ServiceKind::Chocks, true)));
        assert!(signals.contains(&AircraftSignal::Door(Door::CargoAft, true)));
        monitor.unsubscribe_all();
    }

    #[test]
    fn test_equipment_dataref_lookup() {
        assert_eq!(equipment_dataref(ServiceKind::Gpu), Some(dataref::GROUND_POWER));
        assert_eq!(equipment_dataref(ServiceKind::Refuel), None);
    }
}
