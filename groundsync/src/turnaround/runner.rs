//! Driver loop for the orchestrator.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::orchestrator::Orchestrator;

/// Longest uninterrupted sleep between cancellation checks.
const CANCEL_CHECK_SLICE: Duration = Duration::from_millis(50);

/// Step the orchestrator until `cancel` fires, then shut it down.
///
/// Each step decides how long to wait before the next one. The wait is
/// sliced so that cancellation is noticed within [`CANCEL_CHECK_SLICE`]
/// even during the long cruise interval.
pub fn run(orchestrator: &mut Orchestrator, cancel: &CancellationToken) -> u64 {
    tracing::info!(phase = %orchestrator.phase(), "Turnaround loop started");
    let mut ticks = 0u64;

    while !cancel.is_cancelled() {
        let interval = orchestrator.step();
        ticks += 1;
        tracing::trace!(ticks, interval_ms = interval.as_millis() as u64, "Tick");
        wait(interval, cancel);
    }

    orchestrator.shutdown();
    tracing::info!(ticks, "Turnaround loop stopped");
    ticks
}

fn wait(interval: Duration, cancel: &CancellationToken) {
    let deadline = Instant::now() + interval;
    loop {
        if cancel.is_cancelled() {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(CANCEL_CHECK_SLICE));
    }
}

/// Orchestrator running on its own thread.
pub struct RunnerHandle {
    cancel: CancellationToken,
    thread: JoinHandle<Orchestrator>,
}

impl RunnerHandle {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Cancel the loop and wait for it, returning the orchestrator.
    pub fn stop(self) -> thread::Result<Orchestrator> {
        self.cancel.cancel();
        self.thread.join()
    }

    /// Wait for the loop to end on its own token.
    pub fn join(self) -> thread::Result<Orchestrator> {
        self.thread.join()
    }
}

/// Move the orchestrator onto a `turnaround` thread and run it.
pub fn spawn(
    mut orchestrator: Orchestrator,
    cancel: CancellationToken,
) -> std::io::Result<RunnerHandle> {
    let token = cancel.clone();
    let thread = thread::Builder::new()
        .name("turnaround".to_string())
        .spawn(move || {
            run(&mut orchestrator, &token);
            orchestrator
        })?;
    Ok(RunnerHandle { cancel, thread })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turnaround::orchestrator::tests::{quiet_policy, rig};
    use crate::turnaround::FlightPhase;

    #[test]
    fn test_wait_returns_early_on_cancel() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let started = Instant::now();
        wait(Duration::from_secs(60), &cancel);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_honours_short_interval() {
        let cancel = CancellationToken::new();
        let started = Instant::now();
        wait(Duration::from_millis(20), &cancel);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_run_stops_on_cancel_and_unsubscribes() {
        let mut rig = rig(quiet_policy());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            trigger.cancel();
        });

        let started = Instant::now();
        let ticks = run(&mut rig.orchestrator, &cancel);
        canceller.join().unwrap();

        // First tick then a one-second ground wait cut short by the cancel.
        assert!(ticks >= 1);
        assert!(started.elapsed() < Duration::from_millis(900));
        assert_eq!(rig.orchestrator.phase(), FlightPhase::Preflight);
        assert_eq!(rig.monitor.subscription_count(), 0);
    }

    #[test]
    fn test_run_skips_steps_when_already_cancelled() {
        let mut rig = rig(quiet_policy());
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(run(&mut rig.orchestrator, &cancel), 0);
        assert_eq!(rig.aircraft.write_count(), 0);
    }
}
