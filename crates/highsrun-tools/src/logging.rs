//! Logging setup.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const ENV_TRACE: &str = "HIGHSRUN_TRACE";
pub const ENV_LOG_FORMAT: &str = "HIGHSRUN_LOG_FORMAT";
pub const ENV_LOG_FILE: &str = "HIGHSRUN_LOG_FILE";

/// Errors produced while installing the global subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    InvalidFilter(String),
    InvalidFormat(String),
    LogFile { path: String, message: String },
    Init(String),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter(message) => write!(f, "Invalid log filter: {message}"),
            LoggingError::InvalidFormat(format) => write!(
                f,
                "Invalid {ENV_LOG_FORMAT} '{format}' (expected 'json' or 'pretty')"
            ),
            LoggingError::LogFile { path, message } => {
                write!(f, "Failed to open log file {path}: {message}")
            }
            LoggingError::Init(message) => write!(f, "Failed to initialize logging: {message}"),
        }
    }
}

impl std::error::Error for LoggingError {}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| LoggingError::LogFile {
            path: path.to_string(),
            message: err.to_string(),
        })
}

fn map_init_err<E: std::fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init(err.to_string())
}

/// Build the filter for a level string such as `debug` or `highsrun_highs=trace`.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()))
    } else {
        EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
    }
}

/// Enable structured logging for highsrun.
///
/// When `level` is None, this reads `HIGHSRUN_TRACE` if set. If it is unset,
/// the default level is `off`. Returns `true` when logging is initialized,
/// `false` if a subscriber is already configured.
pub fn enable_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(ENV_TRACE).ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;

    let format = env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "pretty".to_string());
    let log_file = env::var(ENV_LOG_FILE).ok();
    let use_json = format.eq_ignore_ascii_case("json");

    if !use_json && !format.eq_ignore_ascii_case("pretty") {
        return Err(LoggingError::InvalidFormat(format));
    }

    if use_json {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .json();
        let base = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .json();
            base.with(file_layer).try_init().map_err(map_init_err)?;
        } else {
            base.try_init().map_err(map_init_err)?;
        }
    } else {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .pretty();
        let base = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .pretty();
            base.with(file_layer).try_init().map_err(map_init_err)?;
        } else {
            base.try_init().map_err(map_init_err)?;
        }
    }

    Ok(true)
}
