//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Venue error: {0}")]
    Venue(#[from] taker_venue::VenueError),

    #[error("Executor error: {0}")]
    Executor(#[from] taker_executor::ExecutorError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] taker_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
