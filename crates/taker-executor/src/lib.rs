//! Order payload construction and the concurrent submission scheduler.
//!
//! # Key Components
//!
//! - [`OrderPayloadBuilder`]: One BUY and one SELL market intent per strategy
//! - [`SleepInterval`]: Uniformly jittered pause between rounds
//! - [`SubmissionScheduler`]: Bootstrap once, then fan out every intent per round,
//!   wait for the whole batch, sleep, repeat
//!
//! # Round semantics
//!
//! A round is complete only when every dispatched submission has returned,
//! whatever its outcome. Round `k + 1` never starts before round `k` settles.
//! Individual failures are counted and logged, never propagated.

pub mod error;
pub mod interval;
pub mod payload;
pub mod scheduler;

pub use error::{ExecutorError, ExecutorResult};
pub use interval::{SleepInterval, MAX_BOUNDARY_SECS};
pub use payload::OrderPayloadBuilder;
pub use scheduler::{RoundReport, SchedulerSummary, SubmissionScheduler};
