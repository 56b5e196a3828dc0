//! Authenticated HTTP client for the Paradigm FSPD REST API.
//!
//! Provides the two calls the taker needs:
//! - `GET /v1/fs/strategies?page_size=100` (startup discovery)
//! - `POST /v1/fs/orders` (order submission)

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode};
use taker_core::{OrderIntent, Strategy};
use tracing::{debug, error, info, warn};

use crate::credentials::Credentials;
use crate::error::{VenueError, VenueResult};
use crate::responses::StrategyListResponse;
use crate::signer::{RequestSigner, SignedRequest};
use crate::venue::{BoxFuture, SubmissionOutcome, Venue};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Strategy listing path, including the query string that gets signed.
pub const STRATEGIES_PATH: &str = "/v1/fs/strategies?page_size=100";

/// Order submission path.
pub const ORDERS_PATH: &str = "/v1/fs/orders";

/// Client for the venue REST API.
///
/// One pooled `reqwest::Client` is shared by all calls; each call still gets
/// its own timestamp, signature and request/response lifecycle.
#[derive(Debug, Clone)]
pub struct VenueClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    signer: RequestSigner,
}

impl VenueClient {
    /// Create a new venue client.
    ///
    /// # Arguments
    /// * `base_url` - REST base URL (e.g., "https://api.fs.test.paradigm.co")
    /// * `credentials` - Access key and base64 secret key
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    /// Returns `VenueError::InvalidKeyFormat` if the secret key is not base64,
    /// or `VenueError::HttpClient` if the HTTP client cannot be built.
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> VenueResult<Self> {
        let signer = RequestSigner::new(credentials.secret_key())?;
        Self::with_signer(base_url, credentials, signer, timeout)
    }

    /// Create a client with an explicit signer (e.g. one with a custom clock).
    pub fn with_signer(
        base_url: &str,
        credentials: Credentials,
        signer: RequestSigner,
        timeout: Duration,
    ) -> VenueResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VenueError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            signer,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pull all available strategies.
    ///
    /// # Errors
    /// `StrategyFetchFailed` on any status other than 200 or on transport
    /// failure; `Parse` if a 200 body is not a `results` list. Never retried.
    pub async fn list_strategies(&self) -> VenueResult<Vec<Strategy>> {
        let url = self.url(STRATEGIES_PATH);
        info!(url = %url, "Fetching strategies");

        let signed = self.sign("GET", STRATEGIES_PATH, "");
        let response = attach_auth(self.client.get(&url), &signed)
            .send()
            .await
            .map_err(|e| VenueError::StrategyFetchFailed {
                status: None,
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VenueError::StrategyFetchFailed {
                status: Some(status.as_u16()),
                body: format!("Failed to read response body: {e}"),
            })?;

        if status != StatusCode::OK {
            error!(status = status.as_u16(), response = %body, "Unable to [GET] /strategies");
            return Err(VenueError::StrategyFetchFailed {
                status: Some(status.as_u16()),
                body,
            });
        }

        let parsed: StrategyListResponse = serde_json::from_str(&body)
            .map_err(|e| VenueError::Parse(format!("Failed to parse strategies: {e}")))?;
        let strategies = parsed.into_strategies();

        info!(count = strategies.len(), "Fetched strategies");
        debug!(strategies = ?strategies.iter().map(|s| &s.id).collect::<Vec<_>>(), "Strategy ids");

        Ok(strategies)
    }

    /// Submit one order.
    ///
    /// The outcome is logged here and returned; nothing is raised to the
    /// caller, so one failed order cannot abort its batch.
    pub async fn submit_order(&self, intent: &OrderIntent) -> SubmissionOutcome {
        let payload = match intent.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                let outcome = SubmissionOutcome::Rejected {
                    status: None,
                    body: String::new(),
                    reason: e.to_string(),
                };
                log_outcome(intent, "", &outcome);
                return outcome;
            }
        };

        let signed = self.sign("POST", ORDERS_PATH, &payload);
        let request = self
            .client
            .post(self.url(ORDERS_PATH))
            .header(CONTENT_TYPE, "application/json")
            .body(payload.clone());

        let outcome = match attach_auth(request, &signed).send().await {
            Ok(response) => {
                let status = response.status();
                let (body, read_error) = match response.text().await {
                    Ok(body) => (body, None),
                    Err(e) => {
                        debug!(
                            strategy_id = %intent.strategy_id,
                            status = status.as_u16(),
                            error = %e,
                            "Failed to read [POST] /orders response body"
                        );
                        (String::new(), Some(e))
                    }
                };
                if status == StatusCode::CREATED {
                    SubmissionOutcome::Accepted {
                        status: status.as_u16(),
                        body,
                    }
                } else {
                    let reason = match read_error {
                        Some(e) => format!("HTTP {status}; response body unreadable: {e}"),
                        None => format!("HTTP {status}"),
                    };
                    SubmissionOutcome::Rejected {
                        status: Some(status.as_u16()),
                        body,
                        reason,
                    }
                }
            }
            Err(e) => SubmissionOutcome::transport_failure(format!("[POST] /orders failed: {e}")),
        };

        log_outcome(intent, &payload, &outcome);
        outcome
    }

    fn sign(&self, method: &str, path: &str, body: &str) -> SignedRequest {
        SignedRequest::new(self.signer.sign(method, path, body), &self.credentials)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Venue for VenueClient {
    fn list_strategies(&self) -> BoxFuture<'_, VenueResult<Vec<Strategy>>> {
        Box::pin(VenueClient::list_strategies(self))
    }

    fn submit_order<'a>(&'a self, intent: &'a OrderIntent) -> BoxFuture<'a, SubmissionOutcome> {
        Box::pin(VenueClient::submit_order(self, intent))
    }
}

fn attach_auth(mut request: RequestBuilder, signed: &SignedRequest) -> RequestBuilder {
    for (name, value) in signed.headers() {
        request = request.header(name, value);
    }
    request
}

fn log_outcome(intent: &OrderIntent, payload: &str, outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Accepted { status, body } => {
            info!(
                strategy_id = %intent.strategy_id,
                side = %intent.side,
                status,
                response = %body,
                "Order created"
            );
        }
        SubmissionOutcome::Rejected {
            status: Some(status),
            body,
            reason,
        } => {
            warn!(
                strategy_id = %intent.strategy_id,
                side = %intent.side,
                status,
                response = %body,
                payload = %payload,
                reason = %reason,
                "Unable to [POST] /orders"
            );
        }
        SubmissionOutcome::Rejected {
            status: None,
            reason,
            ..
        } => {
            warn!(
                strategy_id = %intent.strategy_id,
                side = %intent.side,
                payload = %payload,
                reason = %reason,
                "[POST] /orders transport error"
            );
        }
    }
}
