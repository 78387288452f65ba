//! Application context.
//!
//! Owns every long-lived collaborator explicitly, with no globals:
//!
//! ```text
//! AppContext
//!   ├── InstanceLock            (released on drop)
//!   ├── tokio Runtime           (loadsheet requests)
//!   ├── HttpSimBus ─────────┐
//!   ├── HttpAircraft ───────┼──► Orchestrator ──► runner thread
//!   ├── ChangeMonitor ──────┤
//!   └── StatusBroadcaster ──┘
//! ```

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::error::AppError;
use super::lock::{InstanceLock, LOCK_FILE_NAME};
use crate::bus::names::dataref;
use crate::bus::{AircraftInterface, BusError, HttpAircraft, HttpSimBus, SimBus};
use crate::config::{config_directory, Settings};
use crate::events::{EventSink, StatusBroadcaster, TurnaroundEvent};
use crate::loadsheet::{HttpLoadsheetGenerator, LoadsheetDispatcher};
use crate::monitor::ChangeMonitor;
use crate::turnaround::{self, Orchestrator};

const RUNTIME_WORKER_THREADS: usize = 2;

/// Result of probing both bridges once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeStatus {
    pub sim_ready: bool,
    pub aircraft_ready: bool,
}

impl BridgeStatus {
    pub fn all_ready(&self) -> bool {
        self.sim_ready && self.aircraft_ready
    }
}

/// Check the configured bridges without acquiring the instance lock.
pub fn check_bridges(settings: &Settings) -> Result<BridgeStatus, AppError> {
    let timeout = settings.connection.request_timeout;
    let sim = HttpSimBus::new(&settings.connection.sim_url, timeout)?;
    let aircraft = HttpAircraft::new(&settings.connection.aircraft_url, timeout)?;
    Ok(BridgeStatus {
        sim_ready: sim.ping(),
        aircraft_ready: aircraft.ping(dataref::BATTERY),
    })
}

/// Everything a running instance needs.
pub struct AppContext {
    settings: Settings,
    sim: Arc<HttpSimBus>,
    aircraft: Arc<HttpAircraft>,
    monitor: Arc<ChangeMonitor>,
    broadcaster: Arc<StatusBroadcaster>,
    runtime: Runtime,
    _lock: InstanceLock,
}

impl AppContext {
    /// Acquire the default lock and build the collaborators.
    pub fn start(settings: Settings) -> Result<Self, AppError> {
        let lock = InstanceLock::acquire(&config_directory().join(LOCK_FILE_NAME))?;
        Self::with_lock(settings, lock)
    }

    /// Build the collaborators under an already acquired lock.
    pub fn with_lock(settings: Settings, lock: InstanceLock) -> Result<Self, AppError> {
        let timeout = settings.connection.request_timeout;
        let sim = Arc::new(HttpSimBus::new(&settings.connection.sim_url, timeout)?);
        let aircraft = Arc::new(HttpAircraft::new(&settings.connection.aircraft_url, timeout)?);

        let runtime = Builder::new_multi_thread()
            .worker_threads(RUNTIME_WORKER_THREADS)
            .thread_name("groundsync-rt")
            .enable_all()
            .build()?;

        let monitor = Arc::new(ChangeMonitor::new(
            Arc::clone(&aircraft) as Arc<dyn AircraftInterface>,
            settings.monitor.poll_interval,
        ));

        tracing::info!(
            sim_url = %settings.connection.sim_url,
            aircraft_url = %settings.connection.aircraft_url,
            poll_ms = monitor.interval().as_millis() as u64,
            "Application context ready"
        );

        Ok(Self {
            settings,
            sim,
            aircraft,
            monitor,
            broadcaster: Arc::new(StatusBroadcaster::default()),
            runtime,
            _lock: lock,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Receive orchestrator events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<TurnaroundEvent> {
        self.broadcaster.subscribe()
    }

    /// Wire an orchestrator to this context's buses, monitor and runtime.
    pub fn build_orchestrator(&self) -> Result<Orchestrator, AppError> {
        let generator = HttpLoadsheetGenerator::new(
            &self.settings.connection.aircraft_url,
            self.settings.connection.request_timeout,
        )
        .map_err(|e| BusError::Transport {
            bus: "aircraft",
            reason: e.to_string(),
        })?;
        let loadsheets =
            LoadsheetDispatcher::new(Arc::new(generator), self.runtime.handle().clone());

        Ok(Orchestrator::new(
            Arc::clone(&self.sim) as Arc<dyn SimBus>,
            Arc::clone(&self.aircraft) as Arc<dyn AircraftInterface>,
            Arc::clone(&self.monitor),
            loadsheets,
            Arc::clone(&self.broadcaster) as Arc<dyn EventSink>,
            self.settings.to_turnaround_config(),
        ))
    }

    /// Run the orchestrator on its own thread until `cancel` fires.
    pub fn run(&self, cancel: CancellationToken) -> Result<(), AppError> {
        let orchestrator = self.build_orchestrator()?;
        let handle = turnaround::spawn(orchestrator, cancel)?;

        match handle.join() {
            Ok(orchestrator) => {
                tracing::info!(phase = %orchestrator.phase(), "Shut down cleanly");
                Ok(())
            }
            Err(_) => Err(AppError::Runtime(std::io::Error::other(
                "turnaround thread panicked",
            ))),
        }
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.monitor.unsubscribe_all();
    }
}
