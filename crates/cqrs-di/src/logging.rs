//! Structured logging with tracing
//!
//! Registration and resolution emit `tracing` events; this module installs a
//! subscriber for binaries and tests that want to see them.

use std::ffi::OsStr;
use std::path::Path;

use tracing::{Level, debug};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_LOG_FILE_STEM, LOG_FILTER_ENV};
use crate::error::{Error, Result};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Accepted level names, matched case-insensitively
const LEVELS: &[(&str, Level)] = &[
    ("trace", Level::TRACE),
    ("debug", Level::DEBUG),
    ("info", Level::INFO),
    ("warn", Level::WARN),
    ("warning", Level::WARN),
    ("error", Level::ERROR),
];

/// Initialize logging with the provided configuration
///
/// `CQRS_LOG` directives, when set, refine the configured level. Returns an
/// error if the level is invalid or a global subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;

    let mut layers = vec![stdout_layer(config.json_format)];
    if let Some(path) = &config.file_output {
        layers.push(file_layer(path, config.json_format));
    }

    Registry::default()
        .with(layers)
        .with(env_filter(level))
        .try_init()
        .map_err(|e| Error::configuration_with_source("Failed to install tracing subscriber", e))?;

    debug!(
        %level,
        json = config.json_format,
        file = ?config.file_output,
        "Logging initialized"
    );
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    let name = level.trim();
    LEVELS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, parsed)| *parsed)
        .ok_or_else(|| {
            Error::configuration(format!(
                "Invalid log level '{level}', expected one of: trace, debug, info, warn, error"
            ))
        })
}

/// Filter defaulting to `level`, refined by `CQRS_LOG` directives
pub(crate) fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .with_env_var(LOG_FILTER_ENV)
        .from_env_lossy()
}

fn stdout_layer(json: bool) -> BoxedLayer {
    let layer = fmt::layer().with_target(true).with_thread_ids(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn file_layer(path: &Path, json: bool) -> BoxedLayer {
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE_STEM));
    let appender = tracing_appender::rolling::daily(directory, stem);

    let layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}
