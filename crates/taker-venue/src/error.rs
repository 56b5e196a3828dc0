//! Venue error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VenueError {
    /// Secret key is not valid standard base64.
    #[error("Invalid secret key format: {0}")]
    InvalidKeyFormat(String),

    /// Non-200 response or transport failure while listing strategies.
    #[error("Unable to [GET] /strategies (status: {status:?}): {body}")]
    StrategyFetchFailed {
        /// HTTP status, `None` for transport-level failures.
        status: Option<u16>,
        /// Response body or transport error text.
        body: String,
    },

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub type VenueResult<T> = Result<T, VenueError>;
