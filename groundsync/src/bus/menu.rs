//! GSX menu command protocol.
//!
//! GSX services are requested by driving its in-sim menu through two L-vars:
//!
//! ```text
//! open()      : ready := false ; FSDT_GSX_MENU_OPEN   := 1
//! select(n)   : wait(ready)    ; FSDT_GSX_MENU_CHOICE := n - 1 ; ready := false
//! ```
//!
//! The ready flag is maintained by the simulator side. Waiting for it keeps
//! commands from landing in a menu that is still closed or animating. The
//! wait is bounded; on timeout the choice is written anyway and a warning is
//! logged, matching how GSX recovers from a missed ready signal.

use std::fmt;
use std::time::{Duration, Instant};

use super::error::BusError;
use super::names::lvar;
use super::traits::SimBus;

/// Default bound on the ready wait.
pub const DEFAULT_MENU_READY_TIMEOUT: Duration = Duration::from_secs(100);

/// Ready flag polling cadence.
pub const MENU_READY_POLL: Duration = Duration::from_millis(100);

/// Entries of the GSX main menu (one-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Deboarding,
    Catering,
    Refuel,
    Boarding,
    Pushback,
    Jetway,
    Stairs,
    Reposition,
}

impl MenuEntry {
    /// One-based position in the GSX menu.
    pub fn index(self) -> u32 {
        match self {
            MenuEntry::Deboarding => 1,
            MenuEntry::Catering => 2,
            MenuEntry::Refuel => 3,
            MenuEntry::Boarding => 4,
            MenuEntry::Pushback => 5,
            MenuEntry::Jetway => 6,
            MenuEntry::Stairs => 7,
            MenuEntry::Reposition => 10,
        }
    }
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuEntry::Deboarding => "deboarding",
            MenuEntry::Catering => "catering",
            MenuEntry::Refuel => "refuel",
            MenuEntry::Boarding => "boarding",
            MenuEntry::Pushback => "pushback",
            MenuEntry::Jetway => "jetway",
            MenuEntry::Stairs => "stairs",
            MenuEntry::Reposition => "reposition",
        };
        write!(f, "{}", name)
    }
}

/// Gate item inside the reposition sub-menu.
pub const REPOSITION_GATE_ITEM: u32 = 1;

/// Menu driver over a [`SimBus`].
pub struct GsxMenu<'a> {
    bus: &'a dyn SimBus,
    ready_timeout: Duration,
    poll: Duration,
}

impl<'a> GsxMenu<'a> {
    pub fn new(bus: &'a dyn SimBus, ready_timeout: Duration) -> Self {
        Self {
            bus,
            ready_timeout,
            poll: MENU_READY_POLL.min(ready_timeout.max(Duration::from_millis(1))),
        }
    }

    /// Open the GSX menu.
    pub fn open(&self) -> Result<(), BusError> {
        self.bus.clear_menu_ready();
        self.bus.write_lvar(lvar::MENU_OPEN, 1.0)?;
        tracing::debug!("GSX menu opened");
        Ok(())
    }

    /// Select a one-based menu item once the menu is ready.
    ///
    /// Returns `true` if the ready flag was observed, `false` if the wait
    /// timed out and the choice was written regardless.
    pub fn select(&self, index: u32) -> Result<bool, BusError> {
        let observed = self.wait_ready();
        if !observed {
            tracing::warn!(
                index,
                timeout_secs = self.ready_timeout.as_secs(),
                "GSX menu not ready, selecting anyway"
            );
        }
        self.bus
            .write_lvar(lvar::MENU_CHOICE, f64::from(index.saturating_sub(1)))?;
        self.bus.clear_menu_ready();
        tracing::debug!(index, "GSX menu item selected");
        Ok(observed)
    }

    /// Open the menu and select a main entry.
    pub fn request(&self, entry: MenuEntry) -> Result<(), BusError> {
        tracing::info!(service = %entry, "Requesting GSX service");
        self.open()?;
        self.select(entry.index())?;
        Ok(())
    }

    /// Wait for the ready flag up to the configured timeout.
    fn wait_ready(&self) -> bool {
        let started = Instant::now();
        loop {
            if self.bus.menu_ready() {
                return true;
            }
            if started.elapsed() >= self.ready_timeout {
                return false;
            }
            std::thread::sleep(self.poll);
        }
    }
}
