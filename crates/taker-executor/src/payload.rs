//! Order payload construction.

use taker_core::{OrderIntent, Strategy, TradeAction};

/// Maps strategies to order intents.
pub struct OrderPayloadBuilder;

impl OrderPayloadBuilder {
    /// Build one BUY then one SELL market intent per strategy, in arrival order.
    ///
    /// `amount` is the strategy's minimum block size, unmodified. The result
    /// always holds exactly `2 * strategies.len()` intents.
    pub fn build(strategies: &[Strategy], account_name: &str) -> Vec<OrderIntent> {
        strategies
            .iter()
            .flat_map(|strategy| {
                TradeAction::ALL.into_iter().map(move |side| {
                    OrderIntent::market(account_name, &strategy.id, side, strategy.min_block_size)
                })
            })
            .collect()
    }
}
