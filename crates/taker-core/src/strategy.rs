//! Venue strategy (tradable instrument) type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tradable instrument exposed by the venue.
///
/// Ingested once at startup and held unchanged for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strategy {
    /// Venue-assigned identifier (unique).
    pub id: String,
    /// Minimum tradable block size.
    pub min_block_size: u64,
}

impl Strategy {
    pub fn new(id: impl Into<String>, min_block_size: u64) -> Self {
        Self {
            id: id.into(),
            min_block_size,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (min_block_size={})", self.id, self.min_block_size)
    }
}
