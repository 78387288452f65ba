//! User configuration.
//!
//! Settings live in `~/.groundsync/config.ini`:
//!
//! ```ini
//! [connection]
//! aircraft_url = http://127.0.0.1:5000
//! sim_url = http://127.0.0.1:8086
//!
//! [services]
//! auto_refuel = true
//! refuel_rate_kgs = 28.0
//! ```
//!
//! A missing file means defaults; unknown keys are ignored; a bad value is a
//! [`ConfigFileError::InvalidValue`] naming the section and key.

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{ConnectionSettings, GsxSettings, LoggingSettings, MonitorSettings, Settings};
