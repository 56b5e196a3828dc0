//! Venue trait for strategy discovery and order submission.
//!
//! Abstracts the two authenticated venue calls so the scheduler can be driven
//! by the real HTTP client or by an in-process fake in tests.

use std::pin::Pin;
use std::sync::Arc;

use taker_core::{OrderIntent, Strategy};

use crate::error::VenueResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Terminal outcome of one order submission.
///
/// Submissions never raise: transport failures and non-201 statuses are both
/// `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Venue answered 201.
    Accepted {
        status: u16,
        body: String,
    },
    /// Venue answered anything else, or the request never completed.
    Rejected {
        /// `None` for connection-level failures.
        status: Option<u16>,
        body: String,
        reason: String,
    },
}

impl SubmissionOutcome {
    /// Build a rejection for a request that never got an HTTP status.
    pub fn transport_failure(reason: impl Into<String>) -> Self {
        Self::Rejected {
            status: None,
            body: String::new(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// HTTP status, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Accepted { status, .. } => Some(*status),
            Self::Rejected { status, .. } => *status,
        }
    }

    /// Metric/log label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted { .. } => "accepted",
            Self::Rejected { status: Some(_), .. } => "rejected",
            Self::Rejected { status: None, .. } => "transport_error",
        }
    }
}

/// Trait for the authenticated venue calls.
pub trait Venue: Send + Sync {
    /// List all available strategies.
    fn list_strategies(&self) -> BoxFuture<'_, VenueResult<Vec<Strategy>>>;

    /// Submit one order. Never fails; the outcome carries any rejection.
    fn submit_order<'a>(&'a self, intent: &'a OrderIntent) -> BoxFuture<'a, SubmissionOutcome>;
}

/// Arc wrapper for Venue trait objects.
pub type DynVenue = Arc<dyn Venue>;
