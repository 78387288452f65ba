//! The turnaround orchestrator.
//!
//! One [`Orchestrator::step`] per tick of the driver loop. Each step:
//!
//! 1. returns early with [`NOT_READY_INTERVAL`] when a bus is down
//! 2. applies finished loadsheet requests and queued aircraft signals
//! 3. refreshes GSX service states and dispatches door toggles
//! 4. runs the driver of the current phase (at most one transition)
//! 5. returns the interval it wants until the next step
//!
//! All session state is owned here and only mutated on the driver thread.

mod arrival;
mod departure;
mod loading;
mod preparation;

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::bus::names::{dataref, envvar, lvar, simvar};
use crate::bus::{
    select_operator_if_prompted, AircraftInterface, BusError, DataValue, GsxMenu, MenuEntry,
    SimBus,
};
use crate::events::{EventSink, TurnaroundEvent};
use crate::loadsheet::{
    AcarsMessage, AcarsRelay, AircraftAcarsRelay, LoadsheetDispatcher, LoadsheetKind,
    LoadsheetOutcome, LoadsheetResult,
};
use crate::monitor::{CallbackId, ChangeMonitor};

use super::config::TurnaroundConfig;
use super::constants::{
    ENGINE_OFF_THRESHOLD, FAST_INTERVAL, FLAG_THRESHOLD, FLIGHT_INTERVAL, GROUND_INTERVAL,
    NOT_READY_INTERVAL, STATIONARY_SPEED_KT, TAXI_INTERVAL,
};
use super::doors::{door_action, Door, ToggleDispatcher, DOOR_TOGGLES};
use super::error::TurnaroundError;
use super::phase::FlightPhase;
use super::service::{equipment_status, ServiceKind, ServiceStatus};
use super::session::{CarryOver, TurnaroundSession};
use super::signals::{equipment_dataref, register_handlers, AircraftSignal};

type StepResult<T = ()> = Result<T, TurnaroundError>;

/// Snapshot for external display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestratorStatus {
    pub phase: FlightPhase,
    pub services: BTreeMap<ServiceKind, ServiceStatus>,
    pub doors: BTreeMap<Door, bool>,
    pub flight_plan_id: Option<String>,
    pub flight_number: Option<String>,
    pub passengers_on_board: i64,
    pub refuel_finished: bool,
    pub boarding_finished: bool,
    pub final_loadsheet_sent: bool,
    pub equipment_removed: bool,
    pub push_running: bool,
    pub deboarding_finished: bool,
}

/// Flight-phase state machine and its service drivers.
pub struct Orchestrator {
    sim: Arc<dyn SimBus>,
    aircraft: Arc<dyn AircraftInterface>,
    events: Arc<dyn EventSink>,
    monitor: Arc<ChangeMonitor>,
    loadsheets: LoadsheetDispatcher,
    relay: Arc<dyn AcarsRelay>,
    config: TurnaroundConfig,

    phase: FlightPhase,
    session: TurnaroundSession,
    carry: CarryOver,
    services: BTreeMap<ServiceKind, ServiceStatus>,
    doors: BTreeMap<Door, bool>,
    toggles: ToggleDispatcher,

    signal_tx: UnboundedSender<AircraftSignal>,
    signal_rx: UnboundedReceiver<AircraftSignal>,
    handles: Vec<(&'static str, CallbackId)>,

    /// GSX variables registered with the simulator.
    sim_subscribed: bool,
    /// Cold-and-dark check done.
    entry_checked: bool,
    /// A menu sequence ran this tick.
    settling: bool,
    passengers_on_board: i64,
}

impl Orchestrator {
    pub fn new(
        sim: Arc<dyn SimBus>,
        aircraft: Arc<dyn AircraftInterface>,
        monitor: Arc<ChangeMonitor>,
        loadsheets: LoadsheetDispatcher,
        events: Arc<dyn EventSink>,
        config: TurnaroundConfig,
    ) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let handles = register_handlers(&monitor, &signal_tx);
        let relay: Arc<dyn AcarsRelay> =
            Arc::new(AircraftAcarsRelay::new(Arc::clone(&aircraft)));

        Self {
            sim,
            aircraft,
            events,
            monitor,
            loadsheets,
            relay,
            config,
            phase: FlightPhase::Preflight,
            session: TurnaroundSession::new(),
            carry: CarryOver::default(),
            services: ServiceKind::ALL
                .into_iter()
                .map(|kind| (kind, ServiceStatus::Inactive))
                .collect(),
            doors: BTreeMap::new(),
            toggles: ToggleDispatcher::new(),
            signal_tx,
            signal_rx,
            handles,
            sim_subscribed: false,
            entry_checked: false,
            settling: false,
            passengers_on_board: 0,
        }
    }

    /// Replace the default relay, which writes to the aircraft's uplink.
    pub fn set_acars_relay(&mut self, relay: Arc<dyn AcarsRelay>) {
        self.relay = relay;
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn session(&self) -> &TurnaroundSession {
        &self.session
    }

    pub fn carry_over(&self) -> &CarryOver {
        &self.carry
    }

    pub fn service_status(&self, kind: ServiceKind) -> ServiceStatus {
        self.services
            .get(&kind)
            .copied()
            .unwrap_or(ServiceStatus::Inactive)
    }

    /// Sender for injecting aircraft signals from outside the monitor.
    pub fn signal_sender(&self) -> UnboundedSender<AircraftSignal> {
        self.signal_tx.clone()
    }

    pub fn status(&self) -> OrchestratorStatus {
        OrchestratorStatus {
            phase: self.phase,
            services: self.services.clone(),
            doors: self.doors.clone(),
            flight_plan_id: self.session.flight_plan_id.clone(),
            flight_number: self.session.flight_number.clone(),
            passengers_on_board: self.passengers_on_board,
            refuel_finished: self.session.refuel_finished,
            boarding_finished: self.session.boarding_finished,
            final_loadsheet_sent: self.session.final_loadsheet_sent(),
            equipment_removed: self.session.equipment_removed,
            push_running: self.session.push_running,
            deboarding_finished: self.session.deboarding_finished,
        }
    }

    /// Advance the state machine by one tick.
    ///
    /// Never fails: bus errors and panics abandon the tick and are logged.
    /// Returns the interval until the next call.
    pub fn step(&mut self) -> Duration {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_step())) {
            Ok(Ok(interval)) => interval,
            Ok(Err(e)) => {
                tracing::warn!(phase = %self.phase, error = %e, "Tick abandoned");
                self.phase_interval()
            }
            Err(_) => {
                tracing::error!(phase = %self.phase, "Tick panicked, continuing");
                self.phase_interval()
            }
        }
    }

    /// Remove every change subscription.
    pub fn shutdown(&mut self) {
        self.handles.clear();
        self.monitor.unsubscribe_all();
        tracing::info!(phase = %self.phase, "Orchestrator stopped");
    }

    fn try_step(&mut self) -> StepResult<Duration> {
        if !self.buses_ready() {
            tracing::debug!("Waiting for simulator and aircraft connections");
            return Ok(NOT_READY_INTERVAL);
        }

        self.settling = false;
        self.ensure_sim_subscriptions()?;
        self.apply_loadsheet_outcomes();
        self.apply_signals();

        if self.is_ground_phase() {
            self.refresh_services()?;
            self.dispatch_toggles()?;
        }

        match self.phase {
            FlightPhase::Preflight => self.step_preflight()?,
            FlightPhase::Departure => self.step_departure()?,
            FlightPhase::TaxiOut => self.step_taxi_out()?,
            FlightPhase::Flight => self.step_flight()?,
            FlightPhase::TaxiIn => self.step_taxi_in()?,
            FlightPhase::Arrival => self.step_arrival()?,
            FlightPhase::Turnaround => self.step_turnaround()?,
        }

        Ok(if self.settling || self.session.push_running {
            FAST_INTERVAL
        } else {
            self.phase_interval()
        })
    }

    fn phase_interval(&self) -> Duration {
        match self.phase {
            FlightPhase::Preflight
            | FlightPhase::Departure
            | FlightPhase::Arrival
            | FlightPhase::Turnaround => GROUND_INTERVAL,
            FlightPhase::TaxiOut | FlightPhase::TaxiIn => TAXI_INTERVAL,
            FlightPhase::Flight => FLIGHT_INTERVAL,
        }
    }

    fn is_ground_phase(&self) -> bool {
        matches!(
            self.phase,
            FlightPhase::Preflight
                | FlightPhase::Departure
                | FlightPhase::Arrival
                | FlightPhase::Turnaround
        )
    }

    // ========================================================================
    // Tick plumbing
    // ========================================================================

    /// Check both buses, nudging a disconnected one with a cheap read.
    fn buses_ready(&self) -> bool {
        if !self.sim.is_ready() {
            let _ = self.sim.read_simvar(simvar::SIM_ON_GROUND);
        }
        if !self.aircraft.is_ready() {
            let _ = self.aircraft.read(dataref::BATTERY);
        }
        self.sim.is_ready() && self.aircraft.is_ready()
    }

    fn ensure_sim_subscriptions(&mut self) -> StepResult {
        if self.sim_subscribed {
            return Ok(());
        }
        let states = ServiceKind::ALL.into_iter().filter_map(ServiceKind::state_lvar);
        let others = [
            lvar::COUATL_STARTED,
            lvar::FUELHOSE_CONNECTED,
            lvar::BYPASS_PIN,
            lvar::BOARDING_PAX_TOTAL,
            lvar::DEBOARDING_PAX_TOTAL,
            lvar::BOARDING_CARGO_PERCENT,
            lvar::DEBOARDING_CARGO_PERCENT,
        ];
        let toggles = DOOR_TOGGLES.iter().map(|(name, _)| *name);
        for name in states.chain(others).chain(toggles) {
            self.sim.subscribe(name)?;
        }
        self.sim_subscribed = true;
        tracing::debug!("GSX variables subscribed");
        Ok(())
    }

    fn apply_loadsheet_outcomes(&mut self) {
        for LoadsheetOutcome { kind, result } in self.loadsheets.drain() {
            let task = match kind {
                LoadsheetKind::Preliminary => &mut self.session.preliminary_loadsheet,
                LoadsheetKind::Final => &mut self.session.final_loadsheet,
            };
            if !task.in_flight {
                tracing::debug!(kind = %kind, "Ignoring loadsheet outcome from a previous leg");
                continue;
            }
            task.complete(result.success);

            if result.success {
                tracing::info!(kind = %kind, status = ?result.status_code, "Loadsheet received");
                self.relay_loadsheet(kind, &result);
            } else {
                tracing::warn!(
                    kind = %kind,
                    status = ?result.status_code,
                    error = result.error_message.as_deref().unwrap_or("unknown"),
                    body = result.response_body.as_deref().unwrap_or(""),
                    hint = result.guidance().unwrap_or(""),
                    "Loadsheet generation failed, will retry"
                );
            }
            self.events.publish(TurnaroundEvent::Loadsheet {
                kind,
                success: result.success,
            });
        }
    }

    fn relay_loadsheet(&self, kind: LoadsheetKind, result: &LoadsheetResult) {
        let Some(body) = result.response_body.as_deref().filter(|b| !b.trim().is_empty()) else {
            tracing::debug!(kind = %kind, "Loadsheet has no body to relay");
            return;
        };
        let zulu_seconds = match self.sim.read_envvar(envvar::ZULU_TIME) {
            Ok(seconds) => Some(seconds),
            Err(e) => {
                tracing::debug!(error = %e, "Zulu time unavailable");
                None
            }
        };
        let message = AcarsMessage {
            kind,
            flight_number: self.session.flight_number.clone(),
            zulu_seconds,
            body: body.to_string(),
        };
        match self.relay.relay(&message) {
            Ok(()) => tracing::info!(kind = %kind, "Loadsheet relayed over ACARS"),
            Err(e) => tracing::warn!(kind = %kind, error = %e, "ACARS relay failed"),
        }
    }

    fn apply_signals(&mut self) {
        while let Ok(signal) = self.signal_rx.try_recv() {
            match signal {
                AircraftSignal::Equipment(kind, connected) => {
                    self.set_service(kind, equipment_status(connected));
                }
                AircraftSignal::Door(door, open) => self.record_door(door, open),
            }
        }
    }

    fn refresh_services(&mut self) -> StepResult {
        for kind in ServiceKind::ALL {
            if let Some(name) = kind.state_lvar() {
                let code = self.sim.read_lvar(name)?;
                self.set_service(kind, ServiceStatus::from_state_code(code));
            }
        }
        Ok(())
    }

    fn dispatch_toggles(&mut self) -> StepResult {
        for (name, _) in DOOR_TOGGLES {
            let value = self.sim.read_lvar(name)?;
            if let Some(door) = self.toggles.observe(name, value) {
                let catering = self.service_status(ServiceKind::Catering);
                let cargo_complete = self.cargo_service_complete();
                match door_action(door, catering, cargo_complete) {
                    Some(open) => {
                        tracing::info!(door = %door, open, toggle = name, "GSX door toggle");
                        self.set_door(door, open)?;
                    }
                    None => tracing::debug!(door = %door, "Door toggle with no action"),
                }
            }
        }
        Ok(())
    }

    fn cargo_service_complete(&self) -> bool {
        match self.phase {
            FlightPhase::Arrival | FlightPhase::Turnaround => self.session.cargo_unloaded,
            _ => self.session.cargo_loaded || self.session.boarding_finished,
        }
    }

    // ========================================================================
    // Taxi and flight
    // ========================================================================

    fn step_taxi_out(&mut self) -> StepResult {
        if !self.on_ground()? {
            self.transition(FlightPhase::Flight);
        }
        Ok(())
    }

    fn step_flight(&mut self) -> StepResult {
        if self.on_ground()? {
            self.transition(FlightPhase::TaxiIn);
        }
        Ok(())
    }

    fn step_taxi_in(&mut self) -> StepResult {
        if self.engines_off()? && self.read_flag(dataref::PARKING_BRAKE)? && self.stationary()? {
            // Arrival connects its own equipment.
            self.session.connect_called = false;
            self.session.pca_called = false;
            self.session.pca_removed = false;
            self.transition(FlightPhase::Arrival);
        }
        Ok(())
    }

    // ========================================================================
    // Shared helpers for the drivers
    // ========================================================================

    fn transition(&mut self, to: FlightPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        if !from.can_transition_to(to) {
            tracing::error!(from = %from, to = %to, "Refusing illegal phase transition");
            return;
        }
        self.phase = to;
        tracing::info!(from = %from, to = %to, "Flight phase transition ({})", to.description());
        self.events
            .publish(TurnaroundEvent::PhaseChanged { from, to });
    }

    fn set_service(&mut self, kind: ServiceKind, status: ServiceStatus) {
        let previous = self.services.insert(kind, status);
        if previous != Some(status) {
            tracing::debug!(service = %kind, status = %status, "Service status");
            self.events
                .publish(TurnaroundEvent::ServiceChanged { service: kind, status });
        }
    }

    fn record_door(&mut self, door: Door, open: bool) {
        if self.doors.insert(door, open) != Some(open) {
            self.events.publish(TurnaroundEvent::DoorChanged { door, open });
        }
    }

    fn set_door(&mut self, door: Door, open: bool) -> StepResult {
        self.aircraft.write(door.dataref(), DataValue::Bool(open))?;
        self.record_door(door, open);
        Ok(())
    }

    /// Place or remove GPU, PCA or chocks.
    fn set_equipment(&mut self, kind: ServiceKind, connected: bool) -> StepResult {
        let Some(name) = equipment_dataref(kind) else {
            return Err(TurnaroundError::Invariant(format!(
                "{} is not aircraft equipment",
                kind
            )));
        };
        self.aircraft.write(name, DataValue::Bool(connected))?;
        tracing::info!(equipment = %kind, connected, "Ground equipment");
        self.set_service(kind, equipment_status(connected));
        Ok(())
    }

    fn menu(&self) -> GsxMenu<'_> {
        GsxMenu::new(self.sim.as_ref(), self.config.timing.menu_ready_timeout)
    }

    /// Request a GSX service, answering an operator prompt if one appears.
    fn request_service(&mut self, entry: MenuEntry, operator: bool) -> StepResult {
        self.settling = true;
        let menu = self.menu();
        menu.request(entry)?;
        if operator {
            select_operator_if_prompted(
                &menu,
                &self.config.menu_file,
                self.config.timing.operator_delay,
            )?;
        }
        Ok(())
    }

    fn gsx_code(&self, kind: ServiceKind) -> StepResult<f64> {
        match kind.state_lvar() {
            Some(name) => Ok(self.sim.read_lvar(name)?),
            None => Err(TurnaroundError::Invariant(format!(
                "{} has no GSX state",
                kind
            ))),
        }
    }

    fn lvar_flag(&self, name: &str) -> StepResult<bool> {
        Ok(self.sim.read_lvar(name)? >= FLAG_THRESHOLD)
    }

    fn read_flag(&self, name: &str) -> StepResult<bool> {
        Ok(self.aircraft.read_bool(name)?)
    }

    fn on_ground(&self) -> StepResult<bool> {
        Ok(self.sim.read_simvar(simvar::SIM_ON_GROUND)? >= FLAG_THRESHOLD)
    }

    fn engines_off(&self) -> StepResult<bool> {
        let e1 = self.aircraft.read_f64(dataref::ENGINE_1_RAW)?;
        let e2 = self.aircraft.read_f64(dataref::ENGINE_2_RAW)?;
        Ok(e1 < ENGINE_OFF_THRESHOLD && e2 < ENGINE_OFF_THRESHOLD)
    }

    fn stationary(&self) -> StepResult<bool> {
        Ok(self.sim.read_simvar(simvar::GROUND_SPEED_KT)? < STATIONARY_SPEED_KT)
    }

    /// Loaded flight plan id, `None` when the EFB has none.
    fn flight_plan_id(&self) -> StepResult<Option<String>> {
        match self.aircraft.read_string(dataref::FLIGHT_PLAN_ID) {
            Ok(id) if !id.trim().is_empty() => Ok(Some(id.trim().to_string())),
            Ok(_) => Ok(None),
            Err(e) if e.is_connection_fault() => Err(e.into()),
            Err(e) => {
                tracing::trace!(error = %e, "No flight plan id");
                Ok(None)
            }
        }
    }

    fn optional_string(&self, name: &str) -> Option<String> {
        self.aircraft
            .read_string(name)
            .ok()
            .filter(|s| !s.trim().is_empty())
    }

    fn random_loadsheet_delay(&self) -> u32 {
        let range = self.config.timing.loadsheet_delay_ticks.clone();
        if range.is_empty() {
            return *range.start();
        }
        rand::rng().random_range(range)
    }

    fn write_fuel(&self, kg: f64) -> Result<(), BusError> {
        self.aircraft
            .write(dataref::FUEL_TOTAL_KG, DataValue::Float(kg))
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        for (name, id) in self.handles.drain(..) {
            self.monitor.unsubscribe(name, id);
        }
    }
}
