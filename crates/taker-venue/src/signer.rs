//! HMAC-SHA256 request signing for the Paradigm REST API.
//!
//! The signed message is four byte strings joined by `\n`:
//!
//! ```text
//! {timestamp_ms}\n{METHOD}\n{path with query}\n{body}
//! ```
//!
//! The key is the base64-decoded secret key; the signature is the standard
//! base64 encoding of the raw HMAC digest.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::credentials::Credentials;
use crate::error::{VenueError, VenueResult};

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "Paradigm-API-Timestamp";
pub const SIGNATURE_HEADER: &str = "Paradigm-API-Signature";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

// =============================================================================
// Clock
// =============================================================================

/// Trait for obtaining current time, enabling testability.
pub trait Clock: Send + Sync {
    /// Returns current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

// =============================================================================
// Signatures
// =============================================================================

/// Timestamp and signature for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    pub timestamp_ms: u64,
    /// Base64 HMAC-SHA256 digest.
    pub signature: String,
}

/// Everything needed to authenticate one request. Built per call, never reused.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub timestamp_ms: u64,
    pub signature: String,
    pub bearer_token: String,
}

impl SignedRequest {
    pub fn new(signature: RequestSignature, credentials: &Credentials) -> Self {
        Self {
            timestamp_ms: signature.timestamp_ms,
            signature: signature.signature,
            bearer_token: credentials.access_key().to_string(),
        }
    }

    /// Header name/value pairs, in the order they are attached.
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            (TIMESTAMP_HEADER, self.timestamp_ms.to_string()),
            (SIGNATURE_HEADER, self.signature.clone()),
            (AUTHORIZATION_HEADER, format!("Bearer {}", self.bearer_token)),
        ]
    }
}

impl fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRequest")
            .field("timestamp_ms", &self.timestamp_ms)
            .field("signature", &self.signature)
            .field("bearer_token", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// RequestSigner
// =============================================================================

/// Request signer for authenticated venue calls.
///
/// The secret key is decoded once at construction; the keyed MAC state is
/// cloned for every signature so no per-call key handling happens.
#[derive(Clone)]
pub struct RequestSigner {
    mac: HmacSha256,
    clock: Arc<dyn Clock>,
}

impl RequestSigner {
    /// Create a signer from a base64 secret key using the system clock.
    ///
    /// # Errors
    /// Returns `VenueError::InvalidKeyFormat` if the key is not valid
    /// standard base64 or decodes to an empty key.
    pub fn new(secret_key_b64: &str) -> VenueResult<Self> {
        Self::with_clock(secret_key_b64, Arc::new(SystemClock))
    }

    /// Create a signer with an explicit clock source.
    pub fn with_clock(secret_key_b64: &str, clock: Arc<dyn Clock>) -> VenueResult<Self> {
        let key = Zeroizing::new(
            BASE64
                .decode(secret_key_b64.trim())
                .map_err(|e| VenueError::InvalidKeyFormat(e.to_string()))?,
        );
        if key.is_empty() {
            return Err(VenueError::InvalidKeyFormat(
                "secret key decodes to zero bytes".to_string(),
            ));
        }

        let mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| VenueError::InvalidKeyFormat(e.to_string()))?;

        Ok(Self { mac, clock })
    }

    /// Sign a request at the current clock time.
    pub fn sign(&self, method: &str, path: &str, body: &str) -> RequestSignature {
        let timestamp_ms = self.clock.now_ms();
        RequestSignature {
            timestamp_ms,
            signature: self.sign_at(timestamp_ms, method, path, body),
        }
    }

    /// Sign a request at an explicit timestamp.
    pub fn sign_at(&self, timestamp_ms: u64, method: &str, path: &str, body: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(timestamp_ms.to_string().as_bytes());
        mac.update(b"\n");
        mac.update(method.to_uppercase().as_bytes());
        mac.update(b"\n");
        mac.update(path.as_bytes());
        mac.update(b"\n");
        mac.update(body.as_bytes());

        BASE64.encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
