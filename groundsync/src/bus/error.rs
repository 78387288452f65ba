//! Error types for the variable buses.

use thiserror::Error;

use super::value::DataValue;

/// Errors raised by the simulator and aircraft-systems buses.
#[derive(Debug, Clone, Error)]
pub enum BusError {
    /// The bus has no live connection.
    #[error("{bus} bus is not ready")]
    NotReady { bus: &'static str },

    /// The transport failed (connection refused, timeout, ...).
    #[error("transport error on {bus} bus: {reason}")]
    Transport { bus: &'static str, reason: String },

    /// Reading a variable failed.
    #[error("failed to read '{name}': {reason}")]
    Read { name: String, reason: String },

    /// Writing a variable failed.
    #[error("failed to write '{name}': {reason}")]
    Write { name: String, reason: String },

    /// A variable carried a value of an unexpected type.
    #[error("type mismatch for '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: String,
    },

    /// The GSX menu did not become ready in time.
    #[error("GSX menu not ready after {waited_secs}s")]
    MenuTimeout { waited_secs: u64 },
}

impl BusError {
    /// Build a type mismatch from the value actually received.
    pub fn type_mismatch(name: &str, expected: &'static str, found: &DataValue) -> Self {
        BusError::TypeMismatch {
            name: name.to_string(),
            expected,
            found: found.type_name().to_string(),
        }
    }

    /// Whether the error is a connection-level fault.
    pub fn is_connection_fault(&self) -> bool {
        matches!(self, BusError::NotReady { .. } | BusError::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_uses_value_type() {
        let err = BusError::type_mismatch("efb.flightplan.id", "string", &DataValue::Int(3));
        assert_eq!(
            err.to_string(),
            "type mismatch for 'efb.flightplan.id': expected string, found int"
        );
    }

    #[test]
    fn test_connection_fault_classification() {
        assert!(BusError::NotReady { bus: "sim" }.is_connection_fault());
        assert!(BusError::Transport {
            bus: "aircraft",
            reason: "refused".to_string()
        }
        .is_connection_fault());
        assert!(!BusError::MenuTimeout { waited_secs: 100 }.is_connection_fault());
    }
}
