//! Application lifecycle.
//!
//! [`AppContext`] owns the bridges, the change monitor, the event
//! broadcaster and the tokio runtime, and runs the orchestrator on its own
//! thread. Only one instance may run at a time; the [`InstanceLock`] enforces
//! it.
//!
//! ```ignore
//! use groundsync::app::AppContext;
//! use groundsync::config::Settings;
//!
//! let context = AppContext::start(Settings::load()?)?;
//! context.run(cancel)?;
//! ```

mod context;
mod error;
mod lock;

pub use context::{check_bridges, AppContext, BridgeStatus};
pub use error::AppError;
pub use lock::{InstanceLock, LOCK_FILE_NAME};
