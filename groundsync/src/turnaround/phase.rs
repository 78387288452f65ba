//! Flight phases of one leg.

use serde::Serialize;

/// Flight phase driving which services the orchestrator runs.
///
/// Phases are ordered; the only backward move is the
/// `Turnaround → Departure` wrap that starts the next leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    /// Cold and dark, waiting for a flight plan.
    #[default]
    Preflight,
    /// At the gate: refuel, catering, boarding, loadsheet, pushback.
    Departure,
    TaxiOut,
    Flight,
    TaxiIn,
    /// Parked at the arrival gate: equipment and deboarding.
    Arrival,
    /// Deboarded, waiting for the next flight plan.
    Turnaround,
}

impl FlightPhase {
    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            FlightPhase::Preflight => "preflight preparation",
            FlightPhase::Departure => "departure ground services",
            FlightPhase::TaxiOut => "taxi to runway",
            FlightPhase::Flight => "in flight",
            FlightPhase::TaxiIn => "taxi to gate",
            FlightPhase::Arrival => "arrival ground services",
            FlightPhase::Turnaround => "turnaround",
        }
    }

    /// Whether a move from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: FlightPhase) -> bool {
        use FlightPhase::*;
        matches!(
            (self, next),
            (Preflight, Departure)
                | (Preflight, Flight)
                | (Departure, TaxiOut)
                | (Departure, Flight)
                | (TaxiOut, Flight)
                | (Flight, TaxiIn)
                | (TaxiIn, Arrival)
                | (Arrival, Turnaround)
                | (Turnaround, Departure)
        )
    }
}

impl std::fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlightPhase::Preflight => "preflight",
            FlightPhase::Departure => "departure",
            FlightPhase::TaxiOut => "taxi-out",
            FlightPhase::Flight => "flight",
            FlightPhase::TaxiIn => "taxi-in",
            FlightPhase::Arrival => "arrival",
            FlightPhase::Turnaround => "turnaround",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering() {
        assert!(FlightPhase::Preflight < FlightPhase::Departure);
        assert!(FlightPhase::Departure < FlightPhase::TaxiOut);
        assert!(FlightPhase::Flight < FlightPhase::TaxiIn);
        assert!(FlightPhase::Arrival < FlightPhase::Turnaround);
    }

    #[test]
    fn test_only_backward_move_is_new_leg() {
        let all = [
            FlightPhase::Preflight,
            FlightPhase::Departure,
            FlightPhase::TaxiOut,
            FlightPhase::Flight,
            FlightPhase::TaxiIn,
            FlightPhase::Arrival,
            FlightPhase::Turnaround,
        ];
        for from in all {
            for to in all {
                if from.can_transition_to(to) && to < from {
                    assert_eq!((from, to), (FlightPhase::Turnaround, FlightPhase::Departure));
                }
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(FlightPhase::TaxiOut.to_string(), "taxi-out");
        assert_eq!(FlightPhase::default(), FlightPhase::Preflight);
    }
}
