//! Randomized pause between submission rounds.

use std::time::Duration;

use rand::Rng;

use crate::error::{ExecutorError, ExecutorResult};

/// Largest accepted bound: one year.
pub const MAX_BOUNDARY_SECS: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// Closed interval `[lower, upper]` in seconds, sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepInterval {
    lower_secs: f64,
    upper_secs: f64,
}

impl SleepInterval {
    /// # Errors
    /// Bounds must be finite, non-negative, at most [`MAX_BOUNDARY_SECS`],
    /// and `lower <= upper`.
    pub fn new(lower_secs: f64, upper_secs: f64) -> ExecutorResult<Self> {
        if !lower_secs.is_finite() || !upper_secs.is_finite() {
            return Err(ExecutorError::InvalidInterval(format!(
                "bounds must be finite (lower={lower_secs}, upper={upper_secs})"
            )));
        }
        if lower_secs < 0.0 {
            return Err(ExecutorError::InvalidInterval(format!(
                "lower bound {lower_secs} is negative"
            )));
        }
        if lower_secs > upper_secs {
            return Err(ExecutorError::InvalidInterval(format!(
                "lower bound {lower_secs} exceeds upper bound {upper_secs}"
            )));
        }
        if upper_secs > MAX_BOUNDARY_SECS {
            return Err(ExecutorError::InvalidInterval(format!(
                "upper bound {upper_secs} exceeds {MAX_BOUNDARY_SECS} seconds"
            )));
        }
        Ok(Self {
            lower_secs,
            upper_secs,
        })
    }

    /// A zero-length interval (no pause between rounds).
    pub fn zero() -> Self {
        Self {
            lower_secs: 0.0,
            upper_secs: 0.0,
        }
    }

    pub fn lower_secs(&self) -> f64 {
        self.lower_secs
    }

    pub fn upper_secs(&self) -> f64 {
        self.upper_secs
    }

    /// Draw a pause uniformly from `[lower, upper]`.
    ///
    /// Equal bounds always yield exactly that duration.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.lower_secs == self.upper_secs {
            return Duration::from_secs_f64(self.lower_secs);
        }
        let secs = rng
            .gen_range(self.lower_secs..=self.upper_secs)
            .clamp(self.lower_secs, self.upper_secs);
        Duration::from_secs_f64(secs)
    }
}
