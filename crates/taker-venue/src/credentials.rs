//! Venue API credentials.
//!
//! The secret key is held in `Zeroizing` memory and never printed.

use std::fmt;
use zeroize::Zeroizing;

/// Access key (bearer token) and base64 secret key for signing.
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: Zeroizing<String>,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: Zeroizing::new(secret_key.into()),
        }
    }

    /// Bearer token for the `Authorization` header.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Base64 secret key. Only for building a signer; never log it.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
