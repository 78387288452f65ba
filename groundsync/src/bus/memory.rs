//! In-memory buses.
//!
//! `MemorySimBus` and `MemoryAircraft` hold variables in hash maps and record
//! every write in a journal. They back the test suite and the `check` dry run,
//! and stand in for the external simulator when replaying a scenario.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::error::BusError;
use super::names::lvar;
use super::traits::{AircraftInterface, SimBus};
use super::value::DataValue;

/// A write or menu-flag operation recorded by [`MemorySimBus`].
#[derive(Debug, Clone, PartialEq)]
pub enum SimOp {
    WriteLvar(String, f64),
    ClearMenuReady,
}

/// In-memory simulator bus.
#[derive(Debug)]
pub struct MemorySimBus {
    lvars: Mutex<HashMap<String, f64>>,
    simvars: Mutex<HashMap<String, f64>>,
    envvars: Mutex<HashMap<String, f64>>,
    subscribed: Mutex<HashSet<String>>,
    journal: Mutex<Vec<SimOp>>,
    ready: AtomicBool,
    menu_ready: AtomicBool,
    /// GSX answers every menu command instantly.
    auto_menu_ready: AtomicBool,
}

impl Default for MemorySimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySimBus {
    /// Create a ready bus whose menu answers immediately.
    pub fn new() -> Self {
        Self {
            lvars: Mutex::new(HashMap::new()),
            simvars: Mutex::new(HashMap::new()),
            envvars: Mutex::new(HashMap::new()),
            subscribed: Mutex::new(HashSet::new()),
            journal: Mutex::new(Vec::new()),
            ready: AtomicBool::new(true),
            menu_ready: AtomicBool::new(false),
            auto_menu_ready: AtomicBool::new(true),
        }
    }

    /// Create a bus whose menu ready flag must be raised explicitly.
    pub fn with_manual_menu() -> Self {
        let bus = Self::new();
        bus.auto_menu_ready.store(false, Ordering::SeqCst);
        bus
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Raise or lower the menu ready flag, as GSX would.
    pub fn set_menu_ready(&self, ready: bool) {
        self.menu_ready.store(ready, Ordering::SeqCst);
    }

    /// Set an L-var without journaling (simulates GSX-side changes).
    pub fn set_lvar(&self, name: &str, value: f64) {
        self.lvars.lock().insert(name.to_string(), value);
    }

    pub fn set_simvar(&self, name: &str, value: f64) {
        self.simvars.lock().insert(name.to_string(), value);
    }

    pub fn set_envvar(&self, name: &str, value: f64) {
        self.envvars.lock().insert(name.to_string(), value);
    }

    /// Current L-var value, zero when never set.
    pub fn lvar(&self, name: &str) -> f64 {
        self.lvars.lock().get(name).copied().unwrap_or(0.0)
    }

    pub fn is_subscribed(&self, name: &str) -> bool {
        self.subscribed.lock().contains(name)
    }

    /// All recorded operations, oldest first.
    pub fn journal(&self) -> Vec<SimOp> {
        self.journal.lock().clone()
    }

    /// Menu choices written so far, as one-based menu indices.
    pub fn menu_selections(&self) -> Vec<u32> {
        self.journal
            .lock()
            .iter()
            .filter_map(|op| match op {
                SimOp::WriteLvar(name, v) if name == lvar::MENU_CHOICE => Some(*v as u32 + 1),
                _ => None,
            })
            .collect()
    }

    /// Number of times the menu was opened.
    pub fn menu_opens(&self) -> usize {
        self.journal
            .lock()
            .iter()
            .filter(|op| matches!(op, SimOp::WriteLvar(name, _) if name == lvar::MENU_OPEN))
            .count()
    }

    pub fn clear_journal(&self) {
        self.journal.lock().clear();
    }

    fn check_ready(&self) -> Result<(), BusError> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BusError::NotReady { bus: "sim" })
        }
    }
}

impl SimBus for MemorySimBus {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn subscribe(&self, name: &str) -> Result<(), BusError> {
        self.check_ready()?;
        self.subscribed.lock().insert(name.to_string());
        Ok(())
    }

    fn read_lvar(&self, name: &str) -> Result<f64, BusError> {
        self.check_ready()?;
        Ok(self.lvar(name))
    }

    fn write_lvar(&self, name: &str, value: f64) -> Result<(), BusError> {
        self.check_ready()?;
        self.lvars.lock().insert(name.to_string(), value);
        self.journal
            .lock()
            .push(SimOp::WriteLvar(name.to_string(), value));
        Ok(())
    }

    fn read_simvar(&self, name: &str) -> Result<f64, BusError> {
        self.check_ready()?;
        Ok(self.simvars.lock().get(name).copied().unwrap_or(0.0))
    }

    fn read_envvar(&self, name: &str) -> Result<f64, BusError> {
        self.check_ready()?;
        Ok(self.envvars.lock().get(name).copied().unwrap_or(0.0))
    }

    fn menu_ready(&self) -> bool {
        self.auto_menu_ready.load(Ordering::SeqCst) || self.menu_ready.load(Ordering::SeqCst)
    }

    fn clear_menu_ready(&self) {
        self.menu_ready.store(false, Ordering::SeqCst);
        self.journal.lock().push(SimOp::ClearMenuReady);
    }
}

/// In-memory aircraft-systems interface.
#[derive(Debug)]
pub struct MemoryAircraft {
    values: Mutex<HashMap<String, DataValue>>,
    writes: Mutex<Vec<(String, DataValue)>>,
    failing_reads: Mutex<HashSet<String>>,
    ready: AtomicBool,
}

impl Default for MemoryAircraft {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAircraft {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            failing_reads: Mutex::new(HashSet::new()),
            ready: AtomicBool::new(true),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Set a dataref without journaling (simulates aircraft-side changes).
    pub fn set(&self, name: &str, value: impl Into<DataValue>) {
        self.values.lock().insert(name.to_string(), value.into());
    }

    /// Current value of a dataref.
    pub fn get(&self, name: &str) -> Option<DataValue> {
        self.values.lock().get(name).cloned()
    }

    /// Make reads of `name` fail until cleared.
    pub fn fail_reads(&self, name: &str, failing: bool) {
        let mut set = self.failing_reads.lock();
        if failing {
            set.insert(name.to_string());
        } else {
            set.remove(name);
        }
    }

    /// Writes recorded for one dataref, oldest first.
    pub fn writes_to(&self, name: &str) -> Vec<DataValue> {
        self.writes
            .lock()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().clear();
    }
}

impl AircraftInterface for MemoryAircraft {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn read(&self, name: &str) -> Result<DataValue, BusError> {
        if !self.is_ready() {
            return Err(BusError::NotReady { bus: "aircraft" });
        }
        if self.failing_reads.lock().contains(name) {
            return Err(BusError::Read {
                name: name.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.values
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| BusError::Read {
                name: name.to_string(),
                reason: "unknown dataref".to_string(),
            })
    }

    fn write(&self, name: &str, value: DataValue) -> Result<(), BusError> {
        if !self.is_ready() {
            return Err(BusError::NotReady { bus: "aircraft" });
        }
        self.values.lock().insert(name.to_string(), value.clone());
        self.writes.lock().push((name.to_string(), value));
        Ok(())
    }
}
