//! Prometheus metrics and structured logging for the FSPD auto-taker.
//!
//! - Structured logging with tracing (JSON in production)
//! - Prometheus counters for rounds and submissions

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
