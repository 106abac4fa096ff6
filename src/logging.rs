//! File-based tracing setup.
//!
//! The editor owns the terminal, so logs never go to stdout or stderr. They
//! are written to `$INKPOST_LOG_DIR/inkpost.<pid>.log` when that variable is
//! set, filtered by `INKPOST_LOG` (an `EnvFilter` directive string).

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_DIR_ENV: &str = "INKPOST_LOG_DIR";
pub const LOG_FILTER_ENV: &str = "INKPOST_LOG";

const DEFAULT_FILTER: &str = "inkpost=debug,info";

/// Installs the global subscriber if `INKPOST_LOG_DIR` is set. Returns the
/// log file path when logging was enabled.
pub fn init() -> Option<PathBuf> {
    let log_dir = std::env::var_os(LOG_DIR_ENV).map(PathBuf::from)?;
    std::fs::create_dir_all(&log_dir).ok()?;
    let log_path = log_dir.join(format!("inkpost.{}.log", std::process::id()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok()?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()?;

    tracing::info!(path = ?log_path, "tracing initialized");
    Some(log_path)
}
