//! Main application orchestration.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use taker_executor::{SchedulerSummary, SleepInterval, SubmissionScheduler};
use taker_telemetry::Metrics;
use taker_venue::{Credentials, DynVenue, VenueClient};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Main application state.
pub struct Application {
    config: AppConfig,
    venue: DynVenue,
    interval: SleepInterval,
    scheduler: Option<SubmissionScheduler>,
}

impl Application {
    /// Create a new application instance talking to the configured venue.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let base_url = config.base_url()?;
        let credentials = Credentials::new(config.access_key.clone(), config.secret_key.clone());
        let client = VenueClient::new(&base_url, credentials, config.http.timeout())?;

        info!(
            environment = %config.environment,
            base_url = %client.base_url(),
            account_name = %config.account_name,
            "Venue client ready"
        );

        Self::with_venue(config, Arc::new(client))
    }

    /// Create an application on top of an arbitrary venue implementation.
    pub fn with_venue(config: AppConfig, venue: DynVenue) -> AppResult<Self> {
        let interval = SleepInterval::new(
            config.submission.lower_boundary_secs,
            config.submission.upper_boundary_secs,
        )?;

        Ok(Self {
            config,
            venue,
            interval,
            scheduler: None,
        })
    }

    /// Discover strategies and build the order intents.
    ///
    /// Fatal on any listing failure.
    pub async fn bootstrap(&mut self) -> AppResult<()> {
        if self.config.orders_per_side != 1 {
            warn!(
                orders_per_side = self.config.orders_per_side,
                "orders_per_side is not applied; one order per side per strategy is submitted"
            );
        }

        let scheduler = SubmissionScheduler::bootstrap(
            Arc::clone(&self.venue),
            &self.config.account_name,
            self.interval,
        )
        .await
        .map_err(|e| {
            error!(error = %e, "Strategy discovery failed");
            e
        })?
        .with_max_rounds(self.config.max_rounds);

        for strategy in scheduler.strategies() {
            info!(
                strategy_id = %strategy.id,
                min_block_size = strategy.min_block_size,
                "Strategy discovered"
            );
        }

        self.scheduler = Some(scheduler);
        Ok(())
    }

    /// Run the submission loop until ctrl-c (or the round limit).
    pub async fn run(self) -> AppResult<SchedulerSummary> {
        let shutdown = CancellationToken::new();

        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
            }
            signal_token.cancel();
        });

        self.run_until(shutdown).await
    }

    /// Run the submission loop until `shutdown` is cancelled (or the round limit).
    pub async fn run_until(self, shutdown: CancellationToken) -> AppResult<SchedulerSummary> {
        let scheduler = self.scheduler.ok_or_else(|| {
            AppError::Config("bootstrap() must succeed before run()".to_string())
        })?;

        let metrics_port = self.config.telemetry.metrics_port;
        let metrics_handle = if metrics_port != 0 {
            Some(spawn_metrics_server(metrics_port, shutdown.clone()).await?)
        } else {
            None
        };

        info!(
            intents = scheduler.intents().len(),
            lower_secs = self.interval.lower_secs(),
            upper_secs = self.interval.upper_secs(),
            "Starting submission loop"
        );

        let summary = scheduler.run(shutdown.clone()).await;

        // Stop the metrics endpoint when the loop ends on a round limit.
        shutdown.cancel();
        if let Some(handle) = metrics_handle {
            let _ = handle.await;
        }

        info!(rounds = summary.rounds, "Shutdown complete");

        Ok(summary)
    }
}

/// Bind `GET /metrics` on `port` and serve it until `shutdown` fires.
async fn spawn_metrics_server(
    port: u16,
    shutdown: CancellationToken,
) -> AppResult<tokio::task::JoinHandle<()>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(port, "Starting metrics endpoint");

    let router = Router::new().route("/metrics", get(serve_metrics));

    Ok(tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;
        if let Err(e) = result {
            error!(error = %e, "Metrics endpoint failed");
        }
    }))
}

async fn serve_metrics() -> Result<String, (StatusCode, String)> {
    Metrics::encode().map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
