//! CLI command implementations.
//!
//! - [`check`] - Check both bridges once
//! - [`config`] - Configuration inspection (get, list, path)
//! - [`run`] - Main command (drive the turnaround until Ctrl+C)

pub mod check;
pub mod config;
pub mod run;
