//! Background poller that turns dataref reads into change callbacks.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::registry::{CallbackError, CallbackId, ChangeCallback, Observation, Registry};
use crate::bus::{AircraftInterface, DataValue};

/// Default polling cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lowest accepted polling cadence.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

struct Shared {
    aircraft: Arc<dyn AircraftInterface>,
    registry: Mutex<Registry>,
    interval: Duration,
}

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
    thread: ThreadId,
}

/// Polls subscribed datarefs and invokes callbacks on change.
///
/// The polling thread starts with the first subscription and stops when the
/// last one is removed.
pub struct ChangeMonitor {
    shared: Arc<Shared>,
    worker: Mutex<Option<Worker>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ChangeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscriptions = self.subscription_count();
        let running = self.is_running();
        f.debug_struct("ChangeMonitor")
            .field("interval", &self.shared.interval)
            .field("subscriptions", &subscriptions)
            .field("running", &running)
            .finish()
    }
}

impl ChangeMonitor {
    /// Create a monitor. Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(aircraft: Arc<dyn AircraftInterface>, interval: Duration) -> Self {
        let interval = if interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                requested_ms = interval.as_millis() as u64,
                floor_ms = MIN_POLL_INTERVAL.as_millis() as u64,
                "Poll interval below floor, clamping"
            );
            MIN_POLL_INTERVAL
        } else {
            interval
        };

        Self {
            shared: Arc::new(Shared {
                aircraft,
                registry: Mutex::new(Registry::default()),
                interval,
            }),
            worker: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Register a callback for a dataref.
    ///
    /// The first subscription to a name reads its current value once so the
    /// first change is reported against it.
    pub fn subscribe<F>(&self, name: &str, callback: F) -> CallbackId
    where
        F: Fn(&str, &DataValue, &DataValue) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let callback: ChangeCallback = Arc::new(callback);

        let known = self.shared.registry.lock().contains(name);
        let initial = if known {
            None
        } else {
            match self.shared.aircraft.read(name) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(dataref = name, error = %e, "Initial read failed");
                    None
                }
            }
        };

        self.shared.registry.lock().add(name, initial, id, callback);
        tracing::debug!(dataref = name, id = id.0, "Subscribed");

        self.ensure_running();
        id
    }

    /// Remove one callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, name: &str, id: CallbackId) -> bool {
        let removed = self.shared.registry.lock().remove(name, id);
        if removed {
            tracing::debug!(dataref = name, id = id.0, "Unsubscribed");
            self.stop_if_idle();
        }
        removed
    }

    /// Drop every subscription and stop polling.
    pub fn unsubscribe_all(&self) {
        self.shared.registry.lock().clear();
        self.stop_if_idle();
        tracing::debug!("All change subscriptions removed");
    }

    /// Number of subscribed names.
    pub fn subscription_count(&self) -> usize {
        self.shared.registry.lock().len()
    }

    /// Whether the polling thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Run one polling pass on the caller's thread.
    ///
    /// Returns the number of names whose value changed.
    pub fn poll_once(&self) -> usize {
        poll_pass(&self.shared)
    }

    fn ensure_running(&self) {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let shared = Arc::clone(&self.shared);
        let thread_stop = Arc::clone(&stop);

        let spawned = thread::Builder::new()
            .name("change-monitor".to_string())
            .spawn(move || {
                tracing::debug!(
                    interval_ms = shared.interval.as_millis() as u64,
                    "Change monitor started"
                );
                let mut next = Instant::now() + shared.interval;
                while !park_until(&thread_stop, next) {
                    next += shared.interval;
                    poll_pass(&shared);
                    // Fell behind; don't burst to catch up.
                    let now = Instant::now();
                    if next < now {
                        next = now + shared.interval;
                    }
                }
                tracing::debug!("Change monitor stopped");
            });

        match spawned {
            Ok(handle) => {
                let thread = handle.thread().id();
                *worker = Some(Worker {
                    stop,
                    handle,
                    thread,
                });
            }
            Err(e) => tracing::error!(error = %e, "Failed to start change monitor thread"),
        }
    }

    /// Stop the poller if nothing is subscribed.
    ///
    /// Emptiness is checked while holding the worker lock, so a subscribe
    /// racing the last removal either keeps the current worker or starts a
    /// new one once this one is taken.
    fn stop_if_idle(&self) {
        let worker = {
            let mut worker = self.worker.lock();
            if !self.shared.registry.lock().is_empty() {
                return;
            }
            worker.take()
        };
        if let Some(worker) = worker {
            halt(worker);
        }
    }
}

impl Drop for ChangeMonitor {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            halt(worker);
        }
    }
}

fn halt(worker: Worker) {
    worker.stop.store(true, Ordering::SeqCst);
    worker.handle.thread().unpark();
    // A callback unsubscribing the last name runs on the worker itself.
    if thread::current().id() != worker.thread {
        let _ = worker.handle.join();
    }
}

/// Park until `deadline` or until stopped. Returns `true` when stopped.
fn park_until(stop: &AtomicBool, deadline: Instant) -> bool {
    loop {
        if stop.load(Ordering::SeqCst) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::park_timeout(deadline - now);
    }
}

fn poll_pass(shared: &Shared) -> usize {
    if !shared.aircraft.is_ready() {
        return 0;
    }

    let names = shared.registry.lock().names();
    let mut changed = 0;

    for name in names {
        let current = match shared.aircraft.read(&name) {
            Ok(value) => value,
            Err(e) => {
                tracing::trace!(dataref = %name, error = %e, "Poll read failed");
                continue;
            }
        };

        let fired = {
            let mut registry = shared.registry.lock();
            // Removed by a callback earlier in this pass.
            let Some(sub) = registry.get_mut(&name) else {
                continue;
            };
            match sub.observe(current.clone()) {
                Observation::Changed(old) => Some((old, sub.callbacks())),
                Observation::First | Observation::Unchanged => None,
            }
        };

        if let Some((old, callbacks)) = fired {
            changed += 1;
            tracing::debug!(dataref = %name, old = %old, new = %current, "Dataref changed");
            for callback in callbacks {
                invoke(&callback, &name, &old, &current);
            }
        }
    }

    changed
}

fn invoke(callback: &ChangeCallback, name: &str, old: &DataValue, new: &DataValue) {
    match panic::catch_unwind(AssertUnwindSafe(|| callback(name, old, new))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(dataref = name, error = %e, "Change handler failed"),
        Err(_) => tracing::error!(dataref = name, "Change handler panicked"),
    }
}
