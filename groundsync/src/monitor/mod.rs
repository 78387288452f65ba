//! Change Monitor.
//!
//! The aircraft-systems interface has no push notifications, so edge-triggered
//! behaviour is built by polling:
//!
//! ```text
//!   every interval (default 100 ms, floor 10 ms)
//!   ┌─────────────────────────────────────────────────────┐
//!   │ names := snapshot(registry)        (lock held)      │
//!   │ for name in names:                                  │
//!   │   new := read(name)                (no lock)        │
//!   │   old := swap(last[name], new)     (lock held)      │
//!   │   if old != new: for cb in callbacks: cb(name,old,new)  (no lock)
//!   └─────────────────────────────────────────────────────┘
//! ```
//!
//! Callbacks run on the monitor thread and may subscribe or unsubscribe
//! without deadlocking. A failing or panicking callback is logged and does not
//! affect its siblings.

mod poller;
mod registry;

pub use poller::{ChangeMonitor, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use registry::{CallbackError, CallbackId, ChangeCallback};
