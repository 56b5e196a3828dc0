//! Venue operating environment.
//!
//! The environment label selects the REST host:
//! `https://api.fs.{label lower-cased}.paradigm.co`.

use std::fmt;
use std::str::FromStr;

/// Paradigm operating environment (e.g. `TEST`, `NIGHTLY`, `PROD`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueEnvironment(String);

impl VenueEnvironment {
    /// REST API base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("https://api.fs.{}.paradigm.co", self.0.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VenueEnvironment {
    fn default() -> Self {
        Self("TEST".to_string())
    }
}

impl fmt::Display for VenueEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VenueEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ParseEnvironmentError(s.to_string()));
        }
        Ok(Self(label.to_uppercase()))
    }
}

/// Error parsing environment string.
#[derive(Debug, Clone)]
pub struct ParseEnvironmentError(String);

impl fmt::Display for ParseEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment '{}', expected a hostname label such as 'TEST'",
            self.0
        )
    }
}

impl std::error::Error for ParseEnvironmentError {}
