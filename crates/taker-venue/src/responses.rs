//! Venue API response types.

use serde::Deserialize;
use taker_core::Strategy;

/// Response from `GET /v1/fs/strategies`.
///
/// Only the fields the taker consumes are modelled; everything else in a
/// strategy entry is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyListResponse {
    pub results: Vec<Strategy>,
}

impl StrategyListResponse {
    pub fn into_strategies(self) -> Vec<Strategy> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_results_in_order() {
        let body = r#"{
            "count": 2,
            "next": null,
            "results": [
                {"id": "s-2", "min_block_size": 50, "state": "ACTIVE"},
                {"id": "s-1", "min_block_size": 0, "legs": []}
            ]
        }"#;
        let response: StrategyListResponse = serde_json::from_str(body).unwrap();
        let strategies = response.into_strategies();
        assert_eq!(
            strategies,
            vec![Strategy::new("s-2", 50), Strategy::new("s-1", 0)]
        );
    }

    #[test]
    fn test_missing_results_is_error() {
        assert!(serde_json::from_str::<StrategyListResponse>(r#"{"count": 0}"#).is_err());
    }

    #[test]
    fn test_negative_block_size_is_error() {
        let body = r#"{"results": [{"id": "s-1", "min_block_size": -1}]}"#;
        assert!(serde_json::from_str::<StrategyListResponse>(body).is_err());
    }
}
