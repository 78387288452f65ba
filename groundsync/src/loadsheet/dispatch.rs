//! Fire-and-forget loadsheet requests with message-based completion.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::generator::LoadsheetApi;
use super::types::{LoadsheetKind, LoadsheetOutcome};

/// Spawns generation attempts on a runtime and queues their outcomes.
///
/// The orchestrator owns the receiving side and drains it at the start of
/// each tick, so loadsheet flags are only ever written by its own thread.
pub struct LoadsheetDispatcher {
    api: Arc<dyn LoadsheetApi>,
    runtime: Handle,
    tx: UnboundedSender<LoadsheetOutcome>,
    rx: UnboundedReceiver<LoadsheetOutcome>,
}

impl LoadsheetDispatcher {
    pub fn new(api: Arc<dyn LoadsheetApi>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            runtime,
            tx,
            rx,
        }
    }

    /// Start one attempt in the background.
    pub fn dispatch(&self, kind: LoadsheetKind) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tracing::info!(kind = %kind, "Requesting loadsheet");
        self.runtime.spawn(async move {
            let result = api.generate(kind).await;
            if tx.send(LoadsheetOutcome { kind, result }).is_err() {
                tracing::debug!(kind = %kind, "Loadsheet outcome dropped, orchestrator gone");
            }
        });
    }

    /// Completed attempts not yet consumed.
    pub fn drain(&mut self) -> Vec<LoadsheetOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadsheet::{LoadsheetResult, ScriptedLoadsheetApi};
    use std::time::{Duration, Instant};

    #[test]
    fn test_outcome_arrives_through_drain() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let api = Arc::new(ScriptedLoadsheetApi::new());
        api.push(LoadsheetResult::http_failure(409, "busy", None));
        let mut dispatcher = LoadsheetDispatcher::new(api.clone(), runtime.handle().clone());

        dispatcher.dispatch(LoadsheetKind::Final);

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut outcomes = Vec::new();
        while outcomes.is_empty() && Instant::now() < deadline {
            outcomes = dispatcher.drain();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].kind, LoadsheetKind::Final);
        assert_eq!(outcomes[0].result.status_code, Some(409));
        assert!(dispatcher.drain().is_empty());
    }
}
