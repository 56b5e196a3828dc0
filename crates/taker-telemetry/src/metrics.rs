//! Prometheus metrics for the auto-taker.
//!
//! All metrics live in the default registry and are registered lazily on
//! first use.
//!
//! # Panics
//!
//! First access to a metric panics if its name is already registered.

use once_cell::sync::Lazy;
use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge, Encoder, Gauge, Histogram, IntCounter, IntCounterVec, IntGauge,
    TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Completed submission rounds.
pub static ROUNDS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("fspd_rounds_total", "Total completed submission rounds").unwrap()
});

/// Order submissions by terminal outcome.
/// Labels: outcome (accepted/rejected/transport_error), side (BUY/SELL)
pub static SUBMISSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fspd_submissions_total",
        "Total order submissions by outcome",
        &["outcome", "side"]
    )
    .unwrap()
});

/// Wall time from first dispatch to last completion of a round.
pub static ROUND_DURATION_MS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "fspd_round_duration_ms",
        "Submission round duration in milliseconds",
        vec![10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Most recent inter-round sleep.
pub static ROUND_SLEEP_SECS: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "fspd_round_sleep_secs",
        "Most recent randomized sleep between rounds in seconds"
    )
    .unwrap()
});

/// Strategies ingested at startup.
pub static STRATEGIES_LOADED: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("fspd_strategies_loaded", "Strategies ingested at startup").unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record strategies ingested at startup.
    pub fn strategies_loaded(count: usize) {
        STRATEGIES_LOADED.set(count as i64);
    }

    /// Record one submission outcome.
    pub fn submission(outcome: &str, side: &str) {
        SUBMISSIONS_TOTAL.with_label_values(&[outcome, side]).inc();
    }

    /// Record a completed round.
    pub fn round_completed(duration_ms: f64) {
        ROUNDS_TOTAL.inc();
        ROUND_DURATION_MS.observe(duration_ms);
    }

    /// Record the sleep drawn after a round.
    pub fn round_sleep(secs: f64) {
        ROUND_SLEEP_SECS.set(secs);
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn encode() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
