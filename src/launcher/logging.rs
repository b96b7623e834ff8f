// Logging setup for the cache launcher.
// Builds a tracing subscriber from the loaded configuration: level from
// settings.logLevel, output to paths.logFile and stdout.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Error, Result};
use crate::launcher::config::LauncherConfig;

/// Initialize logging from a launcher configuration.
///
/// A relative log file path is resolved against the current directory and its
/// parent directory is created on demand. The returned guard must be held for
/// the lifetime of the program to keep the file writer flushing.
pub fn init_from_config(config: &LauncherConfig) -> Result<WorkerGuard> {
    let log_file = Path::new(&config.paths.log_file);

    let log_dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    let file_name = log_file.file_name().ok_or_else(|| {
        Error::ConfigValidation(format!("logFile {:?} has no file name", config.paths.log_file))
    })?;

    let file_appender = rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_new(config.settings.log_level.to_lowercase()).map_err(|e| {
            Error::ConfigValidation(format!(
                "unknown logLevel {:?}: {}",
                config.settings.log_level, e
            ))
        })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    tracing::debug!(
        log_file = %log_file.display(),
        level = %config.settings.log_level,
        "logging configured"
    );

    Ok(guard)
}
