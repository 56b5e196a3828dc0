//! Signed REST client for the Paradigm FSPD venue.
//!
//! # Key Components
//!
//! - [`RequestSigner`]: HMAC-SHA256 request signing bound to method, path, body and timestamp
//! - [`Credentials`]: Access key and base64 secret key, redacted in `Debug`
//! - [`VenueClient`]: Authenticated HTTP calls (list strategies, submit order)
//! - [`Venue`]: Trait seam over the venue calls, for dependency injection in tests
//! - [`VenueEnvironment`]: Operating environment selector mapping to a base URL
//!
//! # Authentication headers
//!
//! Every request carries `Paradigm-API-Timestamp`, `Paradigm-API-Signature`
//! and `Authorization: Bearer <access-key>`. Signatures are never reused.

pub mod client;
pub mod credentials;
pub mod environment;
pub mod error;
pub mod responses;
pub mod signer;
pub mod venue;

pub use client::{VenueClient, DEFAULT_TIMEOUT, ORDERS_PATH, STRATEGIES_PATH};
pub use credentials::Credentials;
pub use environment::{ParseEnvironmentError, VenueEnvironment};
pub use error::{VenueError, VenueResult};
pub use responses::StrategyListResponse;
pub use signer::{
    Clock, RequestSignature, RequestSigner, SignedRequest, SystemClock, AUTHORIZATION_HEADER,
    SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
pub use venue::{BoxFuture, DynVenue, SubmissionOutcome, Venue};
