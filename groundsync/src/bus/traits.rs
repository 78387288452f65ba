//! Bus abstractions.
//!
//! The orchestrator, change monitor and menu protocol depend only on these
//! traits, so every external collaborator can be swapped for an in-memory
//! implementation in tests.

use super::error::BusError;
use super::value::DataValue;

/// Simulator and ground-service variable space.
///
/// L-vars, simulation variables and environment variables are all numeric.
/// Writes are fire-and-forget: `Ok(())` only means the request was handed to
/// the simulator, not that GSX acted on it.
pub trait SimBus: Send + Sync {
    /// Whether the connection is currently usable.
    ///
    /// Long-running loops check this before each pass instead of relying on
    /// per-call errors.
    fn is_ready(&self) -> bool;

    /// Ask the simulator to stream a variable.
    ///
    /// Reads of unsubscribed variables still succeed (on-demand read).
    fn subscribe(&self, name: &str) -> Result<(), BusError>;

    /// Read a GSX L-var.
    fn read_lvar(&self, name: &str) -> Result<f64, BusError>;

    /// Write a GSX L-var.
    fn write_lvar(&self, name: &str, value: f64) -> Result<(), BusError>;

    /// Read a simulation variable.
    fn read_simvar(&self, name: &str) -> Result<f64, BusError>;

    /// Read an environment variable.
    fn read_envvar(&self, name: &str) -> Result<f64, BusError>;

    /// Whether GSX has signalled that its menu accepts a choice.
    fn menu_ready(&self) -> bool;

    /// Reset the menu ready flag before the next command.
    fn clear_menu_ready(&self);
}

/// Aircraft-systems dataref interface.
pub trait AircraftInterface: Send + Sync {
    /// Whether the connection is currently usable.
    fn is_ready(&self) -> bool;

    /// Read a dataref.
    fn read(&self, name: &str) -> Result<DataValue, BusError>;

    /// Write a dataref.
    fn write(&self, name: &str, value: DataValue) -> Result<(), BusError>;

    /// Read a dataref as a boolean.
    fn read_bool(&self, name: &str) -> Result<bool, BusError> {
        let value = self.read(name)?;
        value
            .as_bool()
            .ok_or_else(|| BusError::type_mismatch(name, "bool", &value))
    }

    /// Read a dataref as a float.
    fn read_f64(&self, name: &str) -> Result<f64, BusError> {
        let value = self.read(name)?;
        value
            .as_f64()
            .ok_or_else(|| BusError::type_mismatch(name, "float", &value))
    }

    /// Read a dataref as an integer.
    fn read_i64(&self, name: &str) -> Result<i64, BusError> {
        let value = self.read(name)?;
        value
            .as_i64()
            .ok_or_else(|| BusError::type_mismatch(name, "int", &value))
    }

    /// Read a dataref as a string.
    fn read_string(&self, name: &str) -> Result<String, BusError> {
        match self.read(name)? {
            DataValue::String(s) => Ok(s),
            other => Err(BusError::type_mismatch(name, "string", &other)),
        }
    }
}
