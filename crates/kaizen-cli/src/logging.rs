//! Tracing setup.
//!
//! The terminal belongs to the interface while it runs, so logs go to
//! `<data_dir>/kaizen.log` only.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::CliError;

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "kaizen.log";

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "KAIZEN_LOG";

/// Filter used when `KAIZEN_LOG` is unset or invalid.
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines when dropped; keep it alive
/// for the whole run.
pub fn init_tracing(log_dir: &Path, verbose: bool) -> Result<WorkerGuard, CliError> {
    kaizen_core::ensure_directory(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| CliError::Config(format!("logging already initialised: {e}")))?;

    Ok(guard)
}

/// Full path of the log file.
pub fn log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}
