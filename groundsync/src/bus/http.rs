//! HTTP bridge clients for both variable spaces.
//!
//! Both the simulator and the aircraft systems are reached through small
//! JSON bridges:
//!
//! ```text
//! GET  {base}/{space}/{name}        -> {"value": <json>}
//! PUT  {base}/{space}/{name}        <- {"value": <json>}
//! PUT  {base}/subscriptions/{name}
//! GET  {base}/gsx/menu-ready        -> {"value": bool}
//! ```
//!
//! Connection-level failures flip the client's ready flag instead of being
//! surfaced as a distinct error class; callers poll [`SimBus::is_ready`] /
//! [`AircraftInterface::is_ready`] before long loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::BusError;
use super::traits::{AircraftInterface, SimBus};
use super::value::DataValue;

#[derive(Deserialize)]
struct ValueEnvelope {
    value: Value,
}

#[derive(Serialize)]
struct ValueBody<'a> {
    value: &'a Value,
}

/// Blocking JSON client shared by both bridge implementations.
pub struct BridgeClient {
    bus: &'static str,
    base_url: Url,
    client: reqwest::blocking::Client,
    ready: AtomicBool,
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("bus", &self.bus)
            .field("base_url", &self.base_url)
            .field("ready", &self.ready.load(Ordering::Relaxed))
            .finish()
    }
}

impl BridgeClient {
    /// Create a client for one bridge.
    pub fn new(bus: &'static str, base_url: &str, timeout: Duration) -> Result<Self, BusError> {
        let invalid = |reason: String| BusError::Transport {
            bus,
            reason: format!("invalid bridge URL {}: {}", base_url, reason),
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BusError::Transport {
                bus,
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            bus,
            base_url: parsed,
            client,
            ready: AtomicBool::new(false),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Build the URL for a variable in a space. Names are path-encoded.
    pub fn url(&self, space: &str, name: &str) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL accepts path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(space).push(name);
        }
        url
    }

    /// Fetch `{"value": ...}` from a path.
    pub fn get_value(&self, space: &str, name: &str) -> Result<Value, BusError> {
        let url = self.url(space, name);
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| self.transport_failure(e))?;
        self.mark_ready();

        if !response.status().is_success() {
            return Err(BusError::Read {
                name: name.to_string(),
                reason: format!("HTTP {} from {}", response.status(), url),
            });
        }

        let envelope: ValueEnvelope = response.json().map_err(|e| BusError::Read {
            name: name.to_string(),
            reason: format!("invalid response: {}", e),
        })?;
        Ok(envelope.value)
    }

    /// Send `{"value": ...}` to a path.
    pub fn put_value(&self, space: &str, name: &str, value: &Value) -> Result<(), BusError> {
        let url = self.url(space, name);
        let response = self
            .client
            .put(url.clone())
            .json(&ValueBody { value })
            .send()
            .map_err(|e| self.transport_failure(e))?;
        self.mark_ready();

        if !response.status().is_success() {
            return Err(BusError::Write {
                name: name.to_string(),
                reason: format!("HTTP {} from {}", response.status(), url),
            });
        }
        Ok(())
    }

    fn mark_ready(&self) {
        if !self.ready.swap(true, Ordering::SeqCst) {
            tracing::info!(bus = self.bus, url = %self.base_url, "Bridge connected");
        }
    }

    fn transport_failure(&self, e: reqwest::Error) -> BusError {
        if self.ready.swap(false, Ordering::SeqCst) {
            tracing::warn!(bus = self.bus, error = %e, "Bridge connection lost");
        }
        BusError::Transport {
            bus: self.bus,
            reason: e.to_string(),
        }
    }
}

fn expect_number(name: &str, value: &Value) -> Result<f64, BusError> {
    let decoded = DataValue::from_json(name, value)?;
    decoded
        .as_f64()
        .ok_or_else(|| BusError::type_mismatch(name, "number", &decoded))
}

/// Simulator bridge (GSX L-vars, simulation and environment variables).
#[derive(Debug)]
pub struct HttpSimBus {
    bridge: BridgeClient,
}

impl HttpSimBus {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BusError> {
        Ok(Self {
            bridge: BridgeClient::new("sim", base_url, timeout)?,
        })
    }

    /// Ping the bridge once; updates the ready flag.
    pub fn ping(&self) -> bool {
        let _ = self.bridge.get_value("gsx", "menu-ready");
        self.bridge.is_ready()
    }
}

impl SimBus for HttpSimBus {
    fn is_ready(&self) -> bool {
        self.bridge.is_ready()
    }

    fn subscribe(&self, name: &str) -> Result<(), BusError> {
        self.bridge
            .put_value("subscriptions", name, &Value::Bool(true))
    }

    fn read_lvar(&self, name: &str) -> Result<f64, BusError> {
        let value = self.bridge.get_value("lvar", name)?;
        expect_number(name, &value)
    }

    fn write_lvar(&self, name: &str, value: f64) -> Result<(), BusError> {
        self.bridge.put_value("lvar", name, &Value::from(value))
    }

    fn read_simvar(&self, name: &str) -> Result<f64, BusError> {
        let value = self.bridge.get_value("simvar", name)?;
        expect_number(name, &value)
    }

    fn read_envvar(&self, name: &str) -> Result<f64, BusError> {
        let value = self.bridge.get_value("envvar", name)?;
        expect_number(name, &value)
    }

    fn menu_ready(&self) -> bool {
        match self.bridge.get_value("gsx", "menu-ready") {
            Ok(value) => value.as_bool().unwrap_or(false),
            Err(e) => {
                tracing::debug!(error = %e, "Menu ready flag unavailable");
                false
            }
        }
    }

    fn clear_menu_ready(&self) {
        if let Err(e) = self
            .bridge
            .put_value("gsx", "menu-ready", &Value::Bool(false))
        {
            tracing::warn!(error = %e, "Failed to clear menu ready flag");
        }
    }
}

/// Aircraft-systems bridge (datarefs).
#[derive(Debug)]
pub struct HttpAircraft {
    bridge: BridgeClient,
}

impl HttpAircraft {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BusError> {
        Ok(Self {
            bridge: BridgeClient::new("aircraft", base_url, timeout)?,
        })
    }

    /// Ping the bridge once; updates the ready flag.
    pub fn ping(&self, dataref: &str) -> bool {
        let _ = self.bridge.get_value("dataref", dataref);
        self.bridge.is_ready()
    }
}

impl AircraftInterface for HttpAircraft {
    fn is_ready(&self) -> bool {
        self.bridge.is_ready()
    }

    fn read(&self, name: &str) -> Result<DataValue, BusError> {
        let value = self.bridge.get_value("dataref", name)?;
        DataValue::from_json(name, &value)
    }

    fn write(&self, name: &str, value: DataValue) -> Result<(), BusError> {
        self.bridge.put_value("dataref", name, &value.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_simvar_names() {
        let client =
            BridgeClient::new("sim", "http://127.0.0.1:8086/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.url("simvar", "GENERAL ENG THROTTLE LEVER POSITION:1").as_str(),
            "http://127.0.0.1:8086/simvar/GENERAL%20ENG%20THROTTLE%20LEVER%20POSITION:1"
        );
        assert_eq!(
            client.url("dataref", "efb.chocks").as_str(),
            "http://127.0.0.1:8086/dataref/efb.chocks"
        );
        assert_eq!(
            client.url("lvar", "L:A/B?#%").as_str(),
            "http://127.0.0.1:8086/lvar/L:A%2FB%3F%23%25"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client =
            BridgeClient::new("aircraft", "http://127.0.0.1:5000/api", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            client.url("dataref", "efb.chocks").as_str(),
            "http://127.0.0.1:5000/api/dataref/efb.chocks"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = HttpSimBus::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, BusError::Transport { bus: "sim", .. }));
        assert!(HttpAircraft::new("mailto:ops@example.com", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_new_client_is_not_ready() {
        let aircraft = HttpAircraft::new("http://127.0.0.1:5000", Duration::from_secs(1)).unwrap();
        assert!(!aircraft.is_ready());
    }

    #[test]
    fn test_unreachable_bridge_reports_transport_error() {
        // Port 9 (discard) is never served locally.
        let bus = HttpSimBus::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = bus.read_lvar("FSDT_GSX_BOARDING_STATE").unwrap_err();
        assert!(err.is_connection_fault());
        assert!(!bus.is_ready());
        assert!(!bus.menu_ready());
    }

    #[test]
    fn test_expect_number_rejects_strings() {
        let err = expect_number("FSDT_GSX_JETWAY", &Value::String("docked".into())).unwrap_err();
        assert!(matches!(err, BusError::TypeMismatch { .. }));
    }
}
