//! Shared harness for the integration tests.
//!
//! Builds an orchestrator over in-memory buses seeded with a cold-and-dark
//! aircraft at the gate, a scripted loadsheet service and a recording sink.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use groundsync::bus::names::{dataref, lvar, simvar};
use groundsync::bus::{AircraftInterface, DataValue, MemoryAircraft, MemorySimBus, SimBus};
use groundsync::events::RecordingSink;
use groundsync::loadsheet::{LoadsheetDispatcher, ScriptedLoadsheetApi};
use groundsync::monitor::ChangeMonitor;
use groundsync::turnaround::{Door, Orchestrator, ServicePolicy, TimingConfig, TurnaroundConfig};

pub const PLANNED_PAX: i64 = 120;
pub const PLANNED_FUEL_KG: f64 = 8000.0;
pub const PLANNED_CARGO_KG: f64 = 2500.0;
pub const START_FUEL_KG: f64 = 9000.0;

pub struct Harness {
    pub sim: Arc<MemorySimBus>,
    pub aircraft: Arc<MemoryAircraft>,
    pub monitor: Arc<ChangeMonitor>,
    pub sink: Arc<RecordingSink>,
    pub api: Arc<ScriptedLoadsheetApi>,
    pub orchestrator: Orchestrator,
    _runtime: tokio::runtime::Runtime,
}

/// Automation that never touches the GSX menu during preparation.
pub fn quiet_policy() -> ServicePolicy {
    ServicePolicy {
        auto_reposition: false,
        auto_connect: false,
        connect_pca: false,
        ..ServicePolicy::default()
    }
}

impl Harness {
    pub fn new(policy: ServicePolicy) -> Self {
        Self::with(policy, MemorySimBus::new(), "/nonexistent/gsx/menu")
    }

    /// Harness over a caller-built simulator bus and GSX menu mirror.
    pub fn with(policy: ServicePolicy, sim: MemorySimBus, menu_file: impl Into<PathBuf>) -> Self {
        let sim = Arc::new(sim);
        sim.set_simvar(simvar::SIM_ON_GROUND, 1.0);
        sim.set_simvar(simvar::GROUND_SPEED_KT, 0.0);
        sim.set_lvar(lvar::COUATL_STARTED, 1.0);
        sim.set_lvar(lvar::JETWAY_STATE, 1.0);
        sim.set_lvar(lvar::STAIRS_STATE, 1.0);

        let aircraft = Arc::new(MemoryAircraft::new());
        aircraft.set(dataref::BATTERY, true);
        aircraft.set(dataref::ENGINE_1_RAW, 0.0);
        aircraft.set(dataref::ENGINE_2_RAW, 0.0);
        aircraft.set(dataref::PARKING_BRAKE, true);
        aircraft.set(dataref::BEACON, false);
        aircraft.set(dataref::EXT_POWER, true);
        aircraft.set(dataref::FLIGHT_PLAN_ID, "");
        aircraft.set(dataref::FLIGHT_NUMBER, "GSX101");
        aircraft.set(dataref::PLANNED_FUEL_KG, PLANNED_FUEL_KG);
        aircraft.set(dataref::PLANNED_PAX, PLANNED_PAX);
        aircraft.set(dataref::PLANNED_CARGO_KG, PLANNED_CARGO_KG);
        aircraft.set(dataref::FUEL_TOTAL_KG, START_FUEL_KG);
        aircraft.set(dataref::GROUND_POWER, false);
        aircraft.set(dataref::PCA, false);
        aircraft.set(dataref::CHOCKS, false);
        for door in Door::ALL {
            aircraft.set(door.dataref(), false);
        }
        for name in dataref::HYDRAULICS {
            aircraft.set(name, 6.5);
        }

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let sink = Arc::new(RecordingSink::new());
        let api = Arc::new(ScriptedLoadsheetApi::new());
        let monitor = Arc::new(ChangeMonitor::new(
            Arc::clone(&aircraft) as Arc<dyn AircraftInterface>,
            Duration::from_secs(3600),
        ));
        let config = TurnaroundConfig::default()
            .with_policy(policy)
            .with_timing(TimingConfig::immediate())
            .with_menu_file(menu_file);

        let orchestrator = Orchestrator::new(
            Arc::clone(&sim) as Arc<dyn SimBus>,
            Arc::clone(&aircraft) as Arc<dyn AircraftInterface>,
            Arc::clone(&monitor),
            LoadsheetDispatcher::new(api.clone(), runtime.handle().clone()),
            sink.clone(),
            config,
        );

        Self {
            sim,
            aircraft,
            monitor,
            sink,
            api,
            orchestrator,
            _runtime: runtime,
        }
    }

    pub fn step(&mut self) -> Duration {
        self.orchestrator.step()
    }

    /// Step until `done` holds, giving background loadsheet tasks time to land.
    pub fn step_until(&mut self, what: &str, mut done: impl FnMut(&Orchestrator) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !done(&self.orchestrator) {
            assert!(Instant::now() < deadline, "timed out waiting for {}", what);
            self.orchestrator.step();
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    pub fn load_flight_plan(&self, id: &str) {
        self.aircraft.set(dataref::FLIGHT_PLAN_ID, id);
    }

    pub fn fuel(&self) -> f64 {
        self.aircraft
            .get(dataref::FUEL_TOTAL_KG)
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN)
    }

    pub fn bool_writes(&self, name: &str) -> Vec<bool> {
        self.aircraft
            .writes_to(name)
            .iter()
            .filter_map(DataValue::as_bool)
            .collect()
    }
}
