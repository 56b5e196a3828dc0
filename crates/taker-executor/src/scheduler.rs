//! Submission scheduler.
//!
//! Two states:
//! - **Bootstrapping**: list strategies once, build intents once. Failure is fatal.
//! - **Looping**: fan out one task per intent, join the whole batch, sleep a
//!   jittered interval, repeat until cancelled (or a round limit is hit).
//!
//! The intent list is immutable after bootstrap and shared read-only with every
//! submission task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use taker_core::{OrderIntent, Strategy};
use taker_telemetry::Metrics;
use taker_venue::{DynVenue, SubmissionOutcome};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::ExecutorResult;
use crate::interval::SleepInterval;
use crate::payload::OrderPayloadBuilder;

// ============================================================================
// RoundReport
// ============================================================================

/// Outcome of one fully settled round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: u64,
    /// One outcome per intent, in intent order.
    pub outcomes: Vec<SubmissionOutcome>,
    /// First dispatch to last completion.
    pub elapsed: Duration,
}

impl RoundReport {
    pub fn submitted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_accepted()).count()
    }

    pub fn rejected(&self) -> usize {
        self.submitted() - self.accepted()
    }
}

/// Totals across every round of a scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub rounds: u64,
    pub submitted: u64,
    pub accepted: u64,
    pub rejected: u64,
}

impl SchedulerSummary {
    fn absorb(&mut self, report: &RoundReport) {
        self.rounds += 1;
        self.submitted += report.submitted() as u64;
        self.accepted += report.accepted() as u64;
        self.rejected += report.rejected() as u64;
    }
}

// ============================================================================
// SubmissionScheduler
// ============================================================================

/// Recurring concurrent order submission.
pub struct SubmissionScheduler {
    venue: DynVenue,
    strategies: Vec<Strategy>,
    intents: Arc<[OrderIntent]>,
    interval: SleepInterval,
    max_rounds: Option<u64>,
}

impl SubmissionScheduler {
    /// Discover strategies and build the intent list, exactly once.
    ///
    /// # Errors
    /// Returns `ExecutorError::Bootstrap` if the strategy listing fails. No
    /// submission is attempted in that case.
    pub async fn bootstrap(
        venue: DynVenue,
        account_name: &str,
        interval: SleepInterval,
    ) -> ExecutorResult<Self> {
        let strategies = venue.list_strategies().await?;
        let intents = OrderPayloadBuilder::build(&strategies, account_name);

        Metrics::strategies_loaded(strategies.len());
        if strategies.is_empty() {
            warn!("Venue returned no strategies; rounds will submit nothing");
        }
        info!(
            strategies = strategies.len(),
            intents = intents.len(),
            lower_secs = interval.lower_secs(),
            upper_secs = interval.upper_secs(),
            "Order payloads constructed"
        );

        Ok(Self::from_parts(venue, strategies, intents, interval))
    }

    /// Assemble a scheduler from an already-built intent list.
    pub fn from_parts(
        venue: DynVenue,
        strategies: Vec<Strategy>,
        intents: Vec<OrderIntent>,
        interval: SleepInterval,
    ) -> Self {
        Self {
            venue,
            strategies,
            intents: intents.into(),
            interval,
            max_rounds: None,
        }
    }

    /// Stop after `max_rounds` rounds (`None` runs until cancelled).
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: Option<u64>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn intents(&self) -> &[OrderIntent] {
        &self.intents
    }

    /// Dispatch every intent concurrently and wait for all of them.
    ///
    /// Never short-circuits: each submission runs in its own task, and a
    /// failed or panicked task only affects its own outcome.
    pub async fn run_round(&self, round: u64) -> RoundReport {
        let started = Instant::now();
        debug!(round, intents = self.intents.len(), "Dispatching round");

        let handles: Vec<_> = (0..self.intents.len())
            .map(|idx| {
                let venue = Arc::clone(&self.venue);
                let intents = Arc::clone(&self.intents);
                tokio::spawn(async move { venue.submit_order(&intents[idx]).await })
            })
            .collect();

        let results = join_all(handles).await;

        let outcomes: Vec<SubmissionOutcome> = self
            .intents
            .iter()
            .zip(results)
            .map(|(intent, result)| {
                let outcome = result.unwrap_or_else(|e| {
                    error!(
                        strategy_id = %intent.strategy_id,
                        side = %intent.side,
                        error = %e,
                        "Submission task failed"
                    );
                    SubmissionOutcome::transport_failure(format!("submission task failed: {e}"))
                });
                Metrics::submission(outcome.label(), intent.side.as_str());
                outcome
            })
            .collect();

        let report = RoundReport {
            round,
            outcomes,
            elapsed: started.elapsed(),
        };

        Metrics::round_completed(report.elapsed.as_secs_f64() * 1000.0);
        info!(
            round,
            submitted = report.submitted(),
            accepted = report.accepted(),
            rejected = report.rejected(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Round complete"
        );

        report
    }

    /// Run rounds until `shutdown` is cancelled or the round limit is reached.
    ///
    /// Cancellation is observed between rounds and during the sleep; an
    /// in-flight round always settles first.
    pub async fn run(&self, shutdown: CancellationToken) -> SchedulerSummary {
        let mut summary = SchedulerSummary::default();
        let mut round = 0u64;

        info!(
            intents = self.intents.len(),
            max_rounds = ?self.max_rounds,
            "Submission loop started"
        );

        while !shutdown.is_cancelled() {
            round += 1;
            let report = self.run_round(round).await;
            summary.absorb(&report);

            if self.max_rounds.is_some_and(|max| round >= max) {
                info!(round, "Round limit reached");
                break;
            }

            let delay = self.interval.sample(&mut rand::thread_rng());
            Metrics::round_sleep(delay.as_secs_f64());
            debug!(round, delay_ms = delay.as_millis() as u64, "Sleeping before next round");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.cancelled() => {
                    info!(round, "Shutdown requested during sleep");
                    break;
                }
            }
        }

        info!(
            rounds = summary.rounds,
            submitted = summary.submitted,
            accepted = summary.accepted,
            rejected = summary.rejected,
            "Submission loop stopped"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taker_core::TradeAction;
    use taker_venue::{BoxFuture, Venue, VenueError, VenueResult};
    use tokio::sync::Barrier;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Start(String, TradeAction),
        End(String, TradeAction),
    }

    /// In-process venue with per-intent delays and statuses.
    #[derive(Default)]
    struct FakeVenue {
        strategies: Vec<Strategy>,
        listing_status: Option<u16>,
        delays: HashMap<(String, TradeAction), Duration>,
        statuses: HashMap<(String, TradeAction), u16>,
        panics_on: Option<String>,
        barrier: Option<Barrier>,
        events: Mutex<Vec<Event>>,
        list_calls: AtomicUsize,
        submit_calls: AtomicUsize,
    }

    impl FakeVenue {
        fn with_strategies(ids: &[&str]) -> Self {
            Self {
                strategies: ids.iter().map(|id| Strategy::new(*id, 10)).collect(),
                ..Default::default()
            }
        }

        fn delay(mut self, id: &str, side: TradeAction, delay: Duration) -> Self {
            self.delays.insert((id.to_string(), side), delay);
            self
        }

        fn status(mut self, id: &str, side: TradeAction, status: u16) -> Self {
            self.statuses.insert((id.to_string(), side), status);
            self
        }

        fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }
    }

    impl Venue for FakeVenue {
        fn list_strategies(&self) -> BoxFuture<'_, VenueResult<Vec<Strategy>>> {
            Box::pin(async move {
                self.list_calls.fetch_add(1, Ordering::SeqCst);
                match self.listing_status {
                    Some(status) => Err(VenueError::StrategyFetchFailed {
                        status: Some(status),
                        body: "unavailable".to_string(),
                    }),
                    None => Ok(self.strategies.clone()),
                }
            })
        }

        fn submit_order<'a>(
            &'a self,
            intent: &'a OrderIntent,
        ) -> BoxFuture<'a, SubmissionOutcome> {
            Box::pin(async move {
                let key = (intent.strategy_id.clone(), intent.side);
                self.submit_calls.fetch_add(1, Ordering::SeqCst);
                self.events.lock().push(Event::Start(key.0.clone(), key.1));

                if let Some(barrier) = &self.barrier {
                    barrier.wait().await;
                }
                if let Some(delay) = self.delays.get(&key) {
                    tokio::time::sleep(*delay).await;
                }
                if self.panics_on.as_deref() == Some(intent.strategy_id.as_str()) {
                    panic!("fake venue panic for {}", intent.strategy_id);
                }

                self.events.lock().push(Event::End(key.0.clone(), key.1));

                let status = self.statuses.get(&key).copied().unwrap_or(201);
                if status == 201 {
                    SubmissionOutcome::Accepted {
                        status,
                        body: r#"{"id":"o-1"}"#.to_string(),
                    }
                } else {
                    SubmissionOutcome::Rejected {
                        status: Some(status),
                        body: r#"{"message":"rejected"}"#.to_string(),
                        reason: format!("HTTP {status}"),
                    }
                }
            })
        }
    }

    async fn bootstrap(venue: &Arc<FakeVenue>) -> SubmissionScheduler {
        let dyn_venue: DynVenue = venue.clone();
        SubmissionScheduler::bootstrap(dyn_venue, "desk-a", SleepInterval::zero())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_bootstrap_builds_intents_once() {
        let venue = Arc::new(FakeVenue::with_strategies(&["s-1", "s-2"]));
        let scheduler = bootstrap(&venue).await.with_max_rounds(Some(3));

        assert_eq!(scheduler.strategies().len(), 2);
        assert_eq!(scheduler.intents().len(), 4);

        let summary = scheduler.run(CancellationToken::new()).await;

        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.submitted, 12);
        assert_eq!(venue.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(venue.submit_calls.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_prevents_submissions() {
        let venue = Arc::new(FakeVenue {
            listing_status: Some(503),
            ..FakeVenue::with_strategies(&["s-1"])
        });
        let dyn_venue: DynVenue = venue.clone();

        let result =
            SubmissionScheduler::bootstrap(dyn_venue, "desk-a", SleepInterval::zero()).await;

        assert!(matches!(
            result,
            Err(crate::ExecutorError::Bootstrap(
                VenueError::StrategyFetchFailed {
                    status: Some(503),
                    ..
                }
            ))
        ));
        assert_eq!(venue.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(venue.submit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_round_dispatches_concurrently() {
        // Every submission blocks on a barrier sized to the whole batch, so the
        // round can only finish if all of them are in flight at once.
        let venue = Arc::new(FakeVenue {
            barrier: Some(Barrier::new(6)),
            ..FakeVenue::with_strategies(&["s-1", "s-2", "s-3"])
        });
        let scheduler = bootstrap(&venue).await;

        let report = tokio::time::timeout(Duration::from_secs(5), scheduler.run_round(1))
            .await
            .expect("round should complete when all submissions run concurrently");

        assert_eq!(report.submitted(), 6);
        assert_eq!(report.accepted(), 6);
    }

    #[tokio::test]
    async fn test_next_round_waits_for_slowest_submission() {
        let venue = Arc::new(
            FakeVenue::with_strategies(&["s-1", "s-2", "s-3"])
                .delay("s-2", TradeAction::Sell, Duration::from_millis(80))
                .delay("s-3", TradeAction::Buy, Duration::from_millis(20)),
        );
        let scheduler = bootstrap(&venue).await.with_max_rounds(Some(3));

        scheduler.run(CancellationToken::new()).await;

        let events = venue.events();
        let batch = scheduler.intents().len();
        assert_eq!(events.len(), 3 * batch * 2);

        let mut starts = 0;
        let mut ends = 0;
        for event in &events {
            match event {
                Event::Start(..) => {
                    // The first start of round k+1 requires all of round k ended.
                    let round_of_start = starts / batch;
                    assert!(
                        ends >= round_of_start * batch,
                        "round {} dispatched before round {} settled",
                        round_of_start + 1,
                        round_of_start
                    );
                    starts += 1;
                }
                Event::End(..) => ends += 1,
            }
        }
        assert_eq!(starts, 3 * batch);
        assert_eq!(ends, 3 * batch);
    }

    #[tokio::test]
    async fn test_failure_isolation_within_round() {
        let venue = Arc::new(
            FakeVenue::with_strategies(&["s-1", "s-2"])
                .status("s-1", TradeAction::Buy, 400)
                .delay("s-1", TradeAction::Buy, Duration::from_millis(10)),
        );
        let scheduler = bootstrap(&venue).await;

        let report = scheduler.run_round(1).await;

        assert_eq!(report.round, 1);
        assert_eq!(report.submitted(), 4);
        assert_eq!(report.accepted(), 3);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.outcomes[0].status(), Some(400));
        assert!(!report.outcomes[0].is_accepted());
        assert!(report.outcomes[1].is_accepted());
        assert!(report.outcomes[2].is_accepted());
        assert!(report.outcomes[3].is_accepted());
    }

    #[tokio::test]
    async fn test_all_failed_rounds_keep_looping() {
        let venue = Arc::new(
            FakeVenue::with_strategies(&["s-1"])
                .status("s-1", TradeAction::Buy, 500)
                .status("s-1", TradeAction::Sell, 503),
        );
        let scheduler = bootstrap(&venue).await.with_max_rounds(Some(4));

        let summary = scheduler.run(CancellationToken::new()).await;

        assert_eq!(
            summary,
            SchedulerSummary {
                rounds: 4,
                submitted: 8,
                accepted: 0,
                rejected: 8,
            }
        );
    }

    #[tokio::test]
    async fn test_panicking_submission_is_isolated() {
        let venue = Arc::new(FakeVenue {
            panics_on: Some("s-bad".to_string()),
            ..FakeVenue::with_strategies(&["s-good", "s-bad"])
        });
        let scheduler = bootstrap(&venue).await;

        let report = scheduler.run_round(1).await;

        assert!(report.outcomes[0].is_accepted());
        assert!(report.outcomes[1].is_accepted());
        assert_eq!(report.outcomes[2].label(), "transport_error");
        assert_eq!(report.outcomes[3].label(), "transport_error");
    }

    #[tokio::test]
    async fn test_shutdown_during_sleep_stops_loop() {
        let venue = Arc::new(FakeVenue::with_strategies(&["s-1"]));
        let dyn_venue: DynVenue = venue.clone();
        let scheduler = SubmissionScheduler::bootstrap(
            dyn_venue,
            "desk-a",
            SleepInterval::new(30.0, 30.0).unwrap(),
        )
        .await
        .unwrap();

        let shutdown = CancellationToken::new();
        let handle = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { scheduler.run(shutdown).await })
        };

        while venue.submit_calls.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        shutdown.cancel();

        let summary = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("loop should stop promptly")
            .unwrap();
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.submitted, 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_nothing() {
        let venue = Arc::new(FakeVenue::with_strategies(&["s-1"]));
        let scheduler = bootstrap(&venue).await;

        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let summary = scheduler.run(shutdown).await;
        assert_eq!(summary.rounds, 0);
        assert_eq!(venue.submit_calls.load(Ordering::SeqCst), 0);
    }
}
