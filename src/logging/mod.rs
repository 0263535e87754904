// Logging module for structured logging using the tracing crate

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Errors raised while installing the global subscriber
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The configured level is not a valid filter directive
    #[error("Invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },

    /// A global subscriber was already installed
    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Initialize the tracing subscriber for structured logging
///
/// `level` is the default filter directive (e.g. `info` or
/// `watermarker=debug`). A `RUST_LOG` value in the environment takes
/// precedence. Output goes to stderr so that stdout stays free for the
/// batch report.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed.
///
/// # Examples
///
/// ```
/// use watermarker::logging::init_subscriber;
///
/// init_subscriber("info", false).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(level: &str, json: bool) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| LoggingError::Init(e.to_string()))
}

/// Initialize logging from the `logging` section of the config file.
pub fn init_from_config(config: &LoggingConfig) -> Result<(), LoggingError> {
    init_subscriber(&config.level, config.format == LogFormat::Json)
}

fn parse_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|source| LoggingError::Filter {
        directive: level.to_string(),
        source,
    })
}
