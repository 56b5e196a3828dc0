//! Order-related types.
//!
//! Provides the trade action, order type and the order intent that is
//! submitted to the venue. The serde form of `OrderIntent` is the exact
//! `POST /v1/fs/orders` body.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// Both sides, in submission order.
    pub const ALL: [TradeAction; 2] = [TradeAction::Buy, TradeAction::Sell];

    /// Venue wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order (requires a price).
    Limit,
    /// Market order.
    #[default]
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit => write!(f, "LIMIT"),
            Self::Market => write!(f, "MARKET"),
        }
    }
}

/// A fully formed order submission request, not yet sent.
///
/// Field order matches the venue payload:
/// `account_name, strategy_id, type, amount, side[, price]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub account_name: String,
    pub strategy_id: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub amount: u64,
    pub side: TradeAction,
    /// Unset for market orders; the key is omitted from the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl OrderIntent {
    /// Create a market order intent.
    pub fn market(
        account_name: impl Into<String>,
        strategy_id: impl Into<String>,
        side: TradeAction,
        amount: u64,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            strategy_id: strategy_id.into(),
            order_type: OrderType::Market,
            amount,
            side,
            price: None,
        }
    }

    /// Serialize to the JSON request body.
    ///
    /// The returned string is both signed and sent, so it must not be
    /// re-serialized between the two.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
