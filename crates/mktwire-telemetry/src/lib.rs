//! Telemetry for the feed gateway.
//!
//! Structured logging, Prometheus metrics, and periodic activity summaries.

pub mod error;
pub mod logging;
pub mod metrics;
pub mod stats;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::{render_metrics, Metrics};
pub use stats::ActivityReporter;
