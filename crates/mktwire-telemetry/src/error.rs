//! Telemetry error types.

use thiserror::Error;

/// Telemetry errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Logging init error: {0}")]
    LoggingInit(String),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
