//! Logging initialization

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggerConfig};

/// Build the level filter
///
/// `RUST_LOG` wins when set. Otherwise `--debug` forces `debug`, and the
/// configured level applies.
pub fn build_filter(logger: &LoggerConfig, debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if debug { "debug" } else { logger.level.as_str() };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Initialize the global tracing subscriber
///
/// Logs go to stderr unless `logger.file` is set, in which case they are
/// appended to that file without ANSI codes.
pub fn init_logging(logger: &LoggerConfig, debug: bool) -> Result<()> {
    let filter = build_filter(logger, debug);

    let result = if let Some(path) = &logger.file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path))?;

        let builder = tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true);

        match logger.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Text => builder.with_line_number(true).try_init(),
        }
    } else {
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(true);

        match logger.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Text => builder.try_init(),
        }
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
