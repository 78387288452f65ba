//! Check command - ping both bridges once and report readiness.

use std::path::Path;

use groundsync::app::check_bridges;

use crate::error::CliError;
use crate::runner::load_settings;

/// Run the check command.
pub fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;

    println!("Probing bridges...");
    let status = check_bridges(&settings)?;

    println!(
        "  Simulator ({}): {}",
        settings.connection.sim_url,
        readiness(status.sim_ready)
    );
    println!(
        "  Aircraft  ({}): {}",
        settings.connection.aircraft_url,
        readiness(status.aircraft_ready)
    );

    if status.all_ready() {
        println!();
        println!("All bridges ready.");
        Ok(())
    } else {
        Err(CliError::BridgesUnavailable {
            sim: status.sim_ready,
            aircraft: status.aircraft_ready,
        })
    }
}

fn readiness(ready: bool) -> &'static str {
    if ready {
        "ready"
    } else {
        "unreachable"
    }
}
