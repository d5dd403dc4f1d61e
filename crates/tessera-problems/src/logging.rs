//! Structured logging setup.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const ENV_TRACE: &str = "TESSERA_TRACE";
const ENV_LOG_FORMAT: &str = "TESSERA_LOG_FORMAT";
const ENV_LOG_FILE: &str = "TESSERA_LOG_FILE";

/// Errors raised while installing the logging subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// The level or filter directive cannot be parsed.
    InvalidFilter(String),
    /// `TESSERA_LOG_FORMAT` is neither `pretty` nor `json`.
    InvalidFormat(String),
    /// The log file cannot be opened.
    LogFile(String),
    /// The subscriber could not be installed.
    Init(String),
}

impl LoggingError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter(_) => "LOG_INVALID_FILTER",
            LoggingError::InvalidFormat(_) => "LOG_INVALID_FORMAT",
            LoggingError::LogFile(_) => "LOG_FILE",
            LoggingError::Init(_) => "LOG_INIT",
        }
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter(msg) => {
                write!(f, "[{}] Invalid log filter: {}", self.code(), msg)
            }
            LoggingError::InvalidFormat(value) => write!(
                f,
                "[{}] Invalid {} '{}' (expected 'json' or 'pretty')",
                self.code(),
                ENV_LOG_FORMAT,
                value
            ),
            LoggingError::LogFile(msg) => {
                write!(f, "[{}] Failed to open log file: {}", self.code(), msg)
            }
            LoggingError::Init(msg) => {
                write!(f, "[{}] Failed to initialize logging: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for LoggingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, LoggingError> {
        if value.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(LoggingError::InvalidFormat(value.to_string()))
        }
    }
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| LoggingError::LogFile(format!("{path}: {err}")))
}

fn map_init_err<E: std::fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init(err.to_string())
}

/// Enable structured logging for Tessera.
///
/// When `level` is `None`, this reads `TESSERA_TRACE` if set. If
/// `TESSERA_TRACE` is unset, the default level is `off`. Output goes to
/// stderr and, when `TESSERA_LOG_FILE` is set, to that file as well.
/// Returns `true` when logging is initialized, `false` if a subscriber is
/// already configured.
pub fn init_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(ENV_TRACE).ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;
    let format = LogFormat::parse(
        &env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "pretty".to_string()),
    )?;
    let log_file = env::var(ENV_LOG_FILE).ok();

    match format {
        LogFormat::Json => {
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
        }
        LogFormat::Pretty => {
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
    }

    tracing::debug!(
        component = "logging",
        operation = "init",
        status = "success",
        level = %level_value,
        format = ?format,
        "Logging initialized"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse_is_case_insensitive() {
        assert_eq!(LogFormat::parse("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty").unwrap(), LogFormat::Pretty);
        let err = LogFormat::parse("xml").unwrap_err();
        assert_eq!(err.code(), "LOG_INVALID_FORMAT");
    }

    #[test]
    fn test_filter_accepts_off_and_directives() {
        assert!(build_filter("off").is_ok());
        assert!(build_filter("tessera_cp=trace,tessera_core=debug").is_ok());
    }

    #[test]
    fn test_filter_rejects_garbage() {
        let err = build_filter("tessera_cp=verbose").unwrap_err();
        assert_eq!(err.code(), "LOG_INVALID_FILTER");
    }
}
