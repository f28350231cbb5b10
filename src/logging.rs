//! Tracing subscriber setup for the command line binary

use std::ffi::OsStr;
use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LOG_FILTER_ENV, LogConfig};
use crate::lifecycle::error::BoxError;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[source] BoxError),
}

/// Install a global subscriber writing to `log_path`
///
/// `UPGRADE_GUARD_LOG` overrides the configured level with any `EnvFilter`
/// directive. The returned guard flushes buffered lines when dropped.
pub fn init(config: &LogConfig, log_path: &Path) -> Result<WorkerGuard, LoggingError> {
    let dir = log_path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = log_path
        .file_name()
        .unwrap_or(OsStr::new("plugin-upgrade-guard.log"));

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);

    if config.json {
        builder.json().try_init().map_err(LoggingError::Init)?;
    } else {
        builder.try_init().map_err(LoggingError::Init)?;
    }

    Ok(guard)
}
