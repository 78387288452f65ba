//! Logging setup.
//!
//! Two outputs:
//! - `<dir>/<file>`, cleared at session start, no ANSI colours
//! - stdout for tailing from the terminal
//!
//! The level comes from `RUST_LOG`, defaulting to `info`.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the file writer alive. Dropping it flushes and closes the log.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the directory cannot be created or the log file cannot be
/// truncated.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_names(true)
        .with_target(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_target(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, embedding) keeps the existing subscriber.
    if tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already installed");
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create the directory and truncate the log file.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<(), io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_nested_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("deep").join("logs");
        prepare_log_file(&dir, "groundsync.log").unwrap();
        assert!(dir.join("groundsync.log").exists());
    }

    #[test]
    fn test_prepare_clears_previous_session() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("groundsync.log");
        fs::write(&path, "old session").unwrap();

        prepare_log_file(temp.path(), "groundsync.log").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_guard_holds_writer() {
        use tracing_appender::non_blocking::NonBlocking;

        let (writer, guard) = NonBlocking::new(io::sink());
        drop(writer);
        let _guard = LoggingGuard { _file_guard: guard };
    }
}
