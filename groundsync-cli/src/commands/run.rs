//! Run command - drive the turnaround until interrupted.

use std::path::Path;
use std::thread;

use groundsync::app::AppContext;
use groundsync::events::TurnaroundEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the run command.
pub fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("run");
    let settings = runner.settings();

    println!("GroundSync v{}", groundsync::VERSION);
    println!("==================");
    println!();
    println!("Aircraft bridge:  {}", settings.connection.aircraft_url);
    println!("Simulator bridge: {}", settings.connection.sim_url);
    println!("GSX menu file:    {}", settings.gsx.menu_file.display());
    println!();

    let context = AppContext::start(settings.clone())?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        on_signal.cancel();
    })
    .map_err(|e| CliError::SignalHandler(e.to_string()))?;

    let printer = spawn_event_printer(context.subscribe_events())
        .map_err(|e| CliError::App(e.into()))?;

    println!("Press Ctrl+C to stop");
    println!();
    let result = context.run(cancel);

    // Dropping the context closes the event channel and ends the printer.
    drop(context);
    if printer.join().is_err() {
        tracing::warn!("Event printer panicked");
    }

    result?;
    println!("Stopped.");
    Ok(())
}

/// Echo phase changes and loadsheet outcomes to the terminal.
fn spawn_event_printer(
    mut events: broadcast::Receiver<TurnaroundEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("event-printer".to_string())
        .spawn(move || loop {
            match events.blocking_recv() {
                Ok(event) => {
                    if let Some(line) = headline(&event) {
                        println!("{}", line);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Event printer lagged");
                }
                Err(RecvError::Closed) => break,
            }
        })
}

/// Terminal line for events worth showing outside the log.
fn headline(event: &TurnaroundEvent) -> Option<String> {
    match event {
        TurnaroundEvent::PhaseChanged { to, .. } => {
            Some(format!("Phase: {} ({})", to, to.description()))
        }
        TurnaroundEvent::Loadsheet { .. } => Some(event.to_string()),
        TurnaroundEvent::ServiceChanged { .. } | TurnaroundEvent::DoorChanged { .. } => None,
    }
}
