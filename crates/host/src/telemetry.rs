//! Tracing subscriber setup.

use request_guard_config::{LogConfig, LogFormat};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// A global subscriber could not be installed.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {message}")]
pub struct TelemetryError {
    message: String,
}

/// Install the process-wide subscriber.
///
/// `RUST_LOG` wins over the configured level. Events go to stderr so command
/// output on stdout stays machine-readable. Fails if a subscriber is already
/// installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|error| TelemetryError {
        message: error.to_string(),
    })
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}
