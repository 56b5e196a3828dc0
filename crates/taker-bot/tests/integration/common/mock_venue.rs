//! Mock Paradigm FSPD REST venue for integration tests.
//!
//! Provides a small HTTP server that can:
//! - Serve a configurable strategy listing (or a failure status)
//! - Accept or reject orders per strategy
//! - Verify the HMAC signature of every request against its raw body
//! - Record every request it received

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::{get, post};
use axum::Router;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use parking_lot::Mutex;
use sha2::Sha256;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const ACCESS_KEY: &str = "mock-access-key";
pub const SECRET_KEY: &str = "cGFyYWRpZ20tdGVzdC1zZWNyZXQ=";

/// One request as seen by the mock venue.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path_and_query: String,
    pub timestamp: Option<String>,
    pub signature: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
    pub signature_valid: bool,
}

/// Canned venue behaviour.
#[derive(Debug, Clone)]
pub struct MockVenueConfig {
    /// `(id, min_block_size)` pairs returned by the listing.
    pub strategies: Vec<(String, u64)>,
    /// Status for the listing; anything but 200 returns an error body.
    pub listing_status: u16,
    /// Order status per strategy id; 201 when absent.
    pub order_statuses: HashMap<String, u16>,
}

impl Default for MockVenueConfig {
    fn default() -> Self {
        Self {
            strategies: vec![("s-1".to_string(), 25), ("s-2".to_string(), 50)],
            listing_status: 200,
            order_statuses: HashMap::new(),
        }
    }
}

struct MockState {
    config: MockVenueConfig,
    secret: Vec<u8>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A mock venue bound to an ephemeral loopback port.
pub struct MockVenue {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    state: Arc<MockState>,
}

impl MockVenue {
    /// Start a mock venue with the default strategies, accepting everything.
    pub async fn start() -> Self {
        Self::start_with(MockVenueConfig::default()).await
    }

    pub async fn start_with(config: MockVenueConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(MockState {
            config,
            secret: BASE64.decode(SECRET_KEY).unwrap(),
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/v1/fs/strategies", get(list_strategies))
            .route("/v1/fs/orders", post(create_order))
            .with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            state,
        }
    }

    /// Base URL to hand to the venue client.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Requests received for one method.
    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    /// Stop the server.
    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl MockState {
    fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap, body: String) -> bool {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default();

        let timestamp = header("Paradigm-API-Timestamp");
        let signature = header("Paradigm-API-Signature");
        let authorization = header("Authorization");

        let signature_valid = match (&timestamp, &signature) {
            (Some(ts), Some(sig)) => {
                let expected = self.sign(ts, method.as_str(), &path_and_query, &body);
                let bearer = format!("Bearer {ACCESS_KEY}");
                *sig == expected && authorization.as_deref() == Some(bearer.as_str())
            }
            _ => false,
        };

        self.requests.lock().push(RecordedRequest {
            method: method.as_str().to_string(),
            path_and_query,
            timestamp,
            signature,
            authorization,
            content_type: header("Content-Type"),
            body,
            signature_valid,
        });

        signature_valid
    }

    fn sign(&self, timestamp: &str, method: &str, path: &str, body: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.secret).unwrap();
        mac.update(format!("{timestamp}\n{method}\n{path}\n{body}").as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }
}

async fn list_strategies(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    if !state.record(&method, &uri, &headers, body) {
        return (StatusCode::UNAUTHORIZED, r#"{"message":"bad signature"}"#.to_string());
    }

    let status = StatusCode::from_u16(state.config.listing_status).unwrap();
    if status != StatusCode::OK {
        return (status, r#"{"message":"listing unavailable"}"#.to_string());
    }

    let results: Vec<_> = state
        .config
        .strategies
        .iter()
        .map(|(id, min_block_size)| {
            serde_json::json!({
                "id": id,
                "min_block_size": min_block_size,
                "venue": "DBT",
                "kind": "OPTION"
            })
        })
        .collect();

    (
        StatusCode::OK,
        serde_json::json!({ "count": results.len(), "next": null, "results": results })
            .to_string(),
    )
}

async fn create_order(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let strategy_id = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("strategy_id").and_then(|s| s.as_str()).map(str::to_string))
        .unwrap_or_default();

    if !state.record(&method, &uri, &headers, body) {
        return (StatusCode::UNAUTHORIZED, r#"{"message":"bad signature"}"#.to_string());
    }

    let status = state
        .config
        .order_statuses
        .get(&strategy_id)
        .copied()
        .unwrap_or(201);
    let status = StatusCode::from_u16(status).unwrap();

    if status == StatusCode::CREATED {
        (
            status,
            serde_json::json!({ "id": format!("order-{strategy_id}"), "status": "OPEN" })
                .to_string(),
        )
    } else {
        (
            status,
            serde_json::json!({ "message": format!("order rejected for {strategy_id}") })
                .to_string(),
        )
    }
}
