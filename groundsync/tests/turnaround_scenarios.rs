//! End-to-end turnaround scenarios.
//!
//! Each test drives a full orchestrator over in-memory buses tick by tick
//! and checks what the aircraft and GSX observe.

mod common;

use common::{quiet_policy, Harness, PLANNED_CARGO_KG, PLANNED_FUEL_KG, PLANNED_PAX};
use groundsync::bus::names::{dataref, lvar, simvar};
use groundsync::loadsheet::LoadsheetKind;
use groundsync::turnaround::fuel::INITIAL_FUEL_KG;
use groundsync::turnaround::{FlightPhase, ServicePolicy, TurnaroundSession};

// =============================================================================
// Helper Functions
// =============================================================================

/// Enter Departure with the given flight plan.
fn depart(h: &mut Harness, plan: &str) {
    h.load_flight_plan(plan);
    h.step();
    assert_eq!(h.orchestrator.phase(), FlightPhase::Departure);
}

/// Refuel, cater, board and push until the aircraft is taxiing out.
fn complete_departure(h: &mut Harness) {
    h.sim.set_lvar(lvar::FUELHOSE_CONNECTED, 1.0);
    h.sim.set_lvar(lvar::REFUELING_STATE, 6.0);
    h.sim.set_lvar(lvar::CATERING_STATE, 6.0);
    h.step_until("refuel and catering", |o| {
        o.session().refuel_finished && o.session().catering_finished
    });

    h.sim.set_lvar(lvar::BOARDING_STATE, 6.0);
    h.step_until("boarding", |o| o.session().boarding_finished);

    h.aircraft.set(dataref::BEACON, true);
    h.aircraft.set(dataref::EXT_POWER, false);
    h.step_until("equipment removal", |o| o.session().equipment_removed);

    h.sim.set_lvar(lvar::DEPARTURE_STATE, 6.0);
    h.step_until("taxi out", |o| o.phase() == FlightPhase::TaxiOut);
}

/// Take off, land, park and deboard.
fn fly_and_arrive(h: &mut Harness) {
    h.sim.set_simvar(simvar::SIM_ON_GROUND, 0.0);
    h.step();
    h.sim.set_simvar(simvar::SIM_ON_GROUND, 1.0);
    h.step();
    h.sim.set_lvar(lvar::DEBOARDING_STATE, 6.0);
    h.step_until("turnaround", |o| o.phase() == FlightPhase::Turnaround);
}

// =============================================================================
// Scenario A: cold and dark, no flight plan
// =============================================================================

#[test]
fn test_without_flight_plan_stays_in_preflight() {
    let mut h = Harness::new(ServicePolicy::default());

    for _ in 0..10 {
        h.step();
        assert_eq!(h.orchestrator.phase(), FlightPhase::Preflight);
    }

    assert_eq!(h.bool_writes(dataref::GROUND_POWER), vec![true]);
    assert_eq!(h.bool_writes(dataref::CHOCKS), vec![true]);
    assert!(h.sink.phase_changes().is_empty());
    assert!(h.api.requests().is_empty());
}

// =============================================================================
// Scenario B: defuel to the initial quantity, then refuel to plan
// =============================================================================

#[test]
fn test_initial_fuel_then_monotonic_refuel() {
    let mut h = Harness::new(quiet_policy());
    depart(&mut h, "OFP-B");
    assert_eq!(h.fuel(), INITIAL_FUEL_KG);
    assert_eq!(h.orchestrator.session().planned_pax, PLANNED_PAX);

    // GSX transfers fuel with the hose connected; no completion code yet.
    h.sim.set_lvar(lvar::REFUELING_STATE, 5.0);
    h.sim.set_lvar(lvar::FUELHOSE_CONNECTED, 1.0);

    let rate = ServicePolicy::default().refuel_rate_kgs;
    let mut previous = h.fuel();
    for _ in 0..1000 {
        if h.orchestrator.session().refuel_finished {
            break;
        }
        h.step();
        let now = h.fuel();
        assert!(now >= previous, "fuel decreased from {} to {}", previous, now);
        assert!(now - previous <= rate + 1e-9, "step of {} exceeds rate", now - previous);
        previous = now;
    }

    assert!(h.orchestrator.session().refuel_finished);
    assert_eq!(h.fuel(), PLANNED_FUEL_KG.ceil());
}

// =============================================================================
// Scenario C: hose toggles pause and resume the transfer
// =============================================================================

#[test]
fn test_hose_edges_pause_and_resume_refuel() {
    let mut h = Harness::new(quiet_policy());
    depart(&mut h, "OFP-C");
    h.step();
    assert!(h.orchestrator.session().refuel_requested);

    // Requested, truck on its way, hose not yet connected.
    h.sim.set_lvar(lvar::REFUELING_STATE, 4.0);
    h.step();
    h.step();
    assert!(!h.orchestrator.session().refuel_started);
    assert_eq!(h.fuel(), INITIAL_FUEL_KG);

    // Hose connected: transfer starts on the edge.
    h.sim.set_lvar(lvar::REFUELING_STATE, 5.0);
    h.sim.set_lvar(lvar::FUELHOSE_CONNECTED, 1.0);
    h.step();
    assert!(h.orchestrator.session().refuel_started);
    let after_first = h.fuel();
    assert!(after_first > INITIAL_FUEL_KG);
    h.step();
    let before_pause = h.fuel();
    assert!(before_pause > after_first);

    // Hose disconnected: paused, nothing transferred.
    h.sim.set_lvar(lvar::FUELHOSE_CONNECTED, 0.0);
    h.step();
    assert!(h.orchestrator.session().refuel_paused);
    h.step();
    assert_eq!(h.fuel(), before_pause);
    assert!(!h.orchestrator.session().refuel_finished);

    // Reconnected: resumes on the edge.
    h.sim.set_lvar(lvar::FUELHOSE_CONNECTED, 1.0);
    h.step();
    assert!(!h.orchestrator.session().refuel_paused);
    assert!(h.fuel() > before_pause);
    assert!(!h.orchestrator.session().refuel_finished);

    // GSX reports completion well short of the target: snap and finish.
    h.sim.set_lvar(lvar::REFUELING_STATE, 6.0);
    h.step();
    assert!(h.orchestrator.session().refuel_finished);
    assert!(!h.orchestrator.session().refuel_paused);
    assert_eq!(h.fuel(), PLANNED_FUEL_KG.ceil());
}

#[test]
fn test_completion_code_before_hose_does_not_finish_refuel() {
    let mut h = Harness::new(quiet_policy());
    // A completed state left over from an earlier refuel.
    h.sim.set_lvar(lvar::REFUELING_STATE, 6.0);
    depart(&mut h, "OFP-C2");

    for _ in 0..5 {
        h.step();
    }
    assert!(!h.orchestrator.session().refuel_finished);
    assert_eq!(h.fuel(), INITIAL_FUEL_KG);
}

// =============================================================================
// Full leg and turnaround
// =============================================================================

#[test]
fn test_full_leg_visits_every_phase_in_order() {
    let policy = ServicePolicy {
        save_fuel: true,
        ..quiet_policy()
    };
    let mut h = Harness::new(policy);

    depart(&mut h, "OFP-1");
    complete_departure(&mut h);

    h.sim.set_simvar(simvar::SIM_ON_GROUND, 0.0);
    h.step();
    assert_eq!(h.orchestrator.phase(), FlightPhase::Flight);

    // Fuel burned en route.
    h.aircraft.set(dataref::FUEL_TOTAL_KG, 5200.0);
    h.sim.set_simvar(simvar::SIM_ON_GROUND, 1.0);
    h.step();
    assert_eq!(h.orchestrator.phase(), FlightPhase::TaxiIn);

    h.step();
    assert_eq!(h.orchestrator.phase(), FlightPhase::Arrival);
    h.step();
    assert_eq!(h.orchestrator.carry_over().fuel_kg, Some(5200.0));
    assert!(h.orchestrator.session().deboarding_requested);

    h.sim.set_lvar(lvar::DEBOARDING_STATE, 6.0);
    h.step();
    assert_eq!(h.orchestrator.phase(), FlightPhase::Turnaround);
    assert_eq!(h.aircraft.get(dataref::PASSENGERS).and_then(|v| v.as_i64()), Some(0));

    // Same plan still loaded: keep waiting.
    h.step();
    assert_eq!(h.orchestrator.phase(), FlightPhase::Turnaround);

    h.aircraft.set(dataref::FUEL_TOTAL_KG, 9500.0);
    h.aircraft.set(dataref::FLIGHT_NUMBER, "GSX102");
    depart(&mut h, "OFP-2");
    assert_eq!(h.fuel(), 5200.0);

    let expected = [
        (FlightPhase::Preflight, FlightPhase::Departure),
        (FlightPhase::Departure, FlightPhase::TaxiOut),
        (FlightPhase::TaxiOut, FlightPhase::Flight),
        (FlightPhase::Flight, FlightPhase::TaxiIn),
        (FlightPhase::TaxiIn, FlightPhase::Arrival),
        (FlightPhase::Arrival, FlightPhase::Turnaround),
        (FlightPhase::Turnaround, FlightPhase::Departure),
    ];
    let changes = h.sink.phase_changes();
    assert_eq!(changes, expected);
    assert!(changes.iter().all(|(from, to)| from.can_transition_to(*to)));
}

#[test]
fn test_turnaround_reset_clears_every_session_flag() {
    let mut h = Harness::new(quiet_policy());
    depart(&mut h, "OFP-1");
    complete_departure(&mut h);
    fly_and_arrive(&mut h);
    assert_eq!(h.orchestrator.phase(), FlightPhase::Turnaround);
    assert_ne!(*h.orchestrator.session(), TurnaroundSession::new());

    h.aircraft.set(dataref::FLIGHT_NUMBER, "GSX102");
    depart(&mut h, "OFP-2");

    let expected = TurnaroundSession {
        flight_plan_id: Some("OFP-2".to_string()),
        flight_number: Some("GSX102".to_string()),
        planned_fuel_kg: PLANNED_FUEL_KG,
        planned_pax: PLANNED_PAX,
        planned_cargo_kg: PLANNED_CARGO_KG,
        ..TurnaroundSession::new()
    };
    assert_eq!(*h.orchestrator.session(), expected);
}

#[test]
fn test_next_leg_generates_its_own_loadsheets() {
    let mut h = Harness::new(quiet_policy());
    depart(&mut h, "OFP-1");
    complete_departure(&mut h);
    assert!(h.orchestrator.session().final_loadsheet_sent());
    fly_and_arrive(&mut h);

    depart(&mut h, "OFP-2");
    assert!(!h.orchestrator.session().final_loadsheet_sent());
    h.step_until("preliminary loadsheet", |o| {
        o.session().preliminary_loadsheet_generated()
    });
    assert!(!h.orchestrator.session().final_loadsheet_sent());
    assert_eq!(h.api.count(LoadsheetKind::Preliminary), 2);
    assert_eq!(h.api.count(LoadsheetKind::Final), 1);
}
