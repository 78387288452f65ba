//! ACARS relay for received loadsheets.
//!
//! A successful loadsheet is forwarded to the cockpit as an uplink message
//! headed with its kind, the flight number and the zulu time of receipt.

use std::sync::Arc;

use parking_lot::Mutex;

use super::types::LoadsheetKind;
use crate::bus::names::dataref;
use crate::bus::{AircraftInterface, BusError, DataValue};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A loadsheet ready for uplink.
#[derive(Debug, Clone, PartialEq)]
pub struct AcarsMessage {
    pub kind: LoadsheetKind,
    pub flight_number: Option<String>,
    /// Seconds since midnight UTC, when the simulator reported it.
    pub zulu_seconds: Option<f64>,
    pub body: String,
}

impl AcarsMessage {
    /// Header line `LOADSHEET FINAL GSX101 1432Z` followed by the body.
    pub fn render(&self) -> String {
        let mut header = format!("LOADSHEET {}", self.kind.path().to_uppercase());
        if let Some(flight) = &self.flight_number {
            header.push(' ');
            header.push_str(flight);
        }
        if let Some(stamp) = self.zulu_seconds.and_then(format_zulu) {
            header.push(' ');
            header.push_str(&stamp);
        }
        format!("{}\n{}", header, self.body.trim_end())
    }
}

/// `HHMMZ` for a seconds-since-midnight value.
fn format_zulu(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let minutes = (seconds % SECONDS_PER_DAY / 60.0).floor() as u32;
    Some(format!("{:02}{:02}Z", minutes / 60, minutes % 60))
}

/// Delivers loadsheets to the cockpit.
pub trait AcarsRelay: Send + Sync {
    fn relay(&self, message: &AcarsMessage) -> Result<(), BusError>;
}

/// Writes the rendered message to the aircraft's ACARS uplink dataref.
pub struct AircraftAcarsRelay {
    aircraft: Arc<dyn AircraftInterface>,
}

impl AircraftAcarsRelay {
    pub fn new(aircraft: Arc<dyn AircraftInterface>) -> Self {
        Self { aircraft }
    }
}

impl AcarsRelay for AircraftAcarsRelay {
    fn relay(&self, message: &AcarsMessage) -> Result<(), BusError> {
        self.aircraft
            .write(dataref::ACARS_UPLINK, DataValue::String(message.render()))
    }
}

/// Relay that keeps every message, for tests.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    messages: Mutex<Vec<AcarsMessage>>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<AcarsMessage> {
        self.messages.lock().clone()
    }
}

impl AcarsRelay for RecordingRelay {
    fn relay(&self, message: &AcarsMessage) -> Result<(), BusError> {
        self.messages.lock().push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemoryAircraft;

    fn message(zulu_seconds: Option<f64>) -> AcarsMessage {
        AcarsMessage {
            kind: LoadsheetKind::Final,
            flight_number: Some("GSX101".to_string()),
            zulu_seconds,
            body: "ZFW 61.2\nTOW 72.9\n".to_string(),
        }
    }

    #[test]
    fn test_render_header() {
        assert_eq!(
            message(Some(14.0 * 3600.0 + 32.0 * 60.0 + 59.0)).render(),
            "LOADSHEET FINAL GSX101 1432Z\nZFW 61.2\nTOW 72.9"
        );
    }

    #[test]
    fn test_render_without_optional_fields() {
        let msg = AcarsMessage {
            kind: LoadsheetKind::Preliminary,
            flight_number: None,
            zulu_seconds: Some(-1.0),
            body: "PAX 120".to_string(),
        };
        assert_eq!(msg.render(), "LOADSHEET PRELIMINARY\nPAX 120");
    }

    #[test]
    fn test_zulu_wraps_at_midnight() {
        assert_eq!(format_zulu(86_400.0 + 65.0).as_deref(), Some("0001Z"));
        assert_eq!(format_zulu(f64::NAN), None);
    }

    #[test]
    fn test_aircraft_relay_writes_uplink() {
        let aircraft = Arc::new(MemoryAircraft::new());
        let relay = AircraftAcarsRelay::new(Arc::clone(&aircraft) as Arc<dyn AircraftInterface>);
        relay.relay(&message(None)).unwrap();

        let writes = aircraft.writes_to(dataref::ACARS_UPLINK);
        assert_eq!(
            writes,
            vec![DataValue::String("LOADSHEET FINAL GSX101\nZFW 61.2\nTOW 72.9".to_string())]
        );
    }
}
