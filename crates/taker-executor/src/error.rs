//! Executor error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Strategy discovery failed; nothing can be submitted.
    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[from] taker_venue::VenueError),

    #[error("Invalid sleep interval: {0}")]
    InvalidInterval(String),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
