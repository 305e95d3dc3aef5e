//! `tracing` subscriber setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it only logs
//! when given a file to write to.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, EXIT_USAGE};

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Calling this twice is harmless.
pub fn init(target: LogTarget) -> Result<(), AppError> {
    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter("info"))
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    AppError::new(
                        EXIT_USAGE,
                        format!("Failed to open log file '{}': {e}", path.display()),
                    )
                })?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter("debug"))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
    }
    Ok(())
}
