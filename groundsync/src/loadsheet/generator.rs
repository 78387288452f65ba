//! Loadsheet generator implementations.

use std::collections::VecDeque;
use std::time::Duration;

pub use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;

use super::types::{LoadsheetKind, LoadsheetResult};

/// Produces loadsheets through the aircraft's native endpoint.
///
/// Implementations make exactly one attempt per call and never retry; all
/// failures are folded into the returned [`LoadsheetResult`].
pub trait LoadsheetApi: Send + Sync {
    fn generate(&self, kind: LoadsheetKind) -> BoxFuture<'_, LoadsheetResult>;
}

/// `POST {base}/loadsheet/{preliminary|final}` over async reqwest.
#[derive(Debug, Clone)]
pub struct HttpLoadsheetGenerator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLoadsheetGenerator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, kind: LoadsheetKind) -> String {
        format!("{}/loadsheet/{}", self.base_url, kind.path())
    }

    async fn post(&self, kind: LoadsheetKind) -> LoadsheetResult {
        let url = self.url(kind);
        let response = match self.client.post(&url).send().await {
            Ok(response) => response,
            Err(e) => return LoadsheetResult::transport_failure(e.to_string()),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(kind = %kind, error = %e, "Failed to read loadsheet response body");
                None
            }
        };

        if status.is_success() {
            LoadsheetResult::accepted(status.as_u16(), body)
        } else {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            LoadsheetResult::http_failure(
                status.as_u16(),
                format!("HTTP {} {} from {}", status.as_u16(), reason, url),
                body,
            )
        }
    }
}

impl LoadsheetApi for HttpLoadsheetGenerator {
    fn generate(&self, kind: LoadsheetKind) -> BoxFuture<'_, LoadsheetResult> {
        self.post(kind).boxed()
    }
}

/// Loadsheet API answering from a script of prepared results.
///
/// When the script runs dry every request is accepted.
#[derive(Debug, Default)]
pub struct ScriptedLoadsheetApi {
    script: Mutex<VecDeque<LoadsheetResult>>,
    requests: Mutex<Vec<LoadsheetKind>>,
}

impl ScriptedLoadsheetApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next request.
    pub fn push(&self, result: LoadsheetResult) {
        self.script.lock().push_back(result);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<LoadsheetKind> {
        self.requests.lock().clone()
    }

    pub fn count(&self, kind: LoadsheetKind) -> usize {
        self.requests.lock().iter().filter(|k| **k == kind).count()
    }
}

impl LoadsheetApi for ScriptedLoadsheetApi {
    fn generate(&self, kind: LoadsheetKind) -> BoxFuture<'_, LoadsheetResult> {
        self.requests.lock().push(kind);
        let result = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| LoadsheetResult::accepted(200, None));
        async move { result }.boxed()
    }
}
