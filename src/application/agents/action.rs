//! Trade decisions.
//!
//! The decision an agent returns for a step. Balance mutation happens in
//! the engine after all agents are polled, so same-step observers always
//! see pre-trade state.

use serde::{Deserialize, Serialize};

/// One agent's decision for the current step. Amounts are token units and
/// never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TradeDecision {
    Buy { amount: f64 },
    Sell { amount: f64 },
    Hold,
}

impl TradeDecision {
    pub fn is_trade(&self) -> bool {
        !matches!(self, TradeDecision::Hold)
    }

    /// Traded amount, zero for holds.
    pub fn amount(&self) -> f64 {
        match self {
            TradeDecision::Buy { amount } | TradeDecision::Sell { amount } => *amount,
            TradeDecision::Hold => 0.0,
        }
    }

    /// Subtract a flat friction cost from the traded amount. A trade whose
    /// amount does not cover the fee degrades to a hold.
    pub fn with_friction(self, fee: f64) -> TradeDecision {
        match self {
            TradeDecision::Buy { amount } if amount > fee => TradeDecision::Buy {
                amount: amount - fee,
            },
            TradeDecision::Sell { amount } if amount > fee => TradeDecision::Sell {
                amount: amount - fee,
            },
            _ => TradeDecision::Hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friction_reduces_amount() {
        let decision = TradeDecision::Buy { amount: 10.0 }.with_friction(1.0);
        assert_eq!(decision, TradeDecision::Buy { amount: 9.0 });
    }

    #[test]
    fn sub_fee_trade_becomes_hold() {
        assert_eq!(
            TradeDecision::Sell { amount: 0.5 }.with_friction(1.0),
            TradeDecision::Hold
        );
        assert_eq!(
            TradeDecision::Buy { amount: 1.0 }.with_friction(1.0),
            TradeDecision::Hold
        );
    }

    #[test]
    fn hold_is_unaffected() {
        assert_eq!(TradeDecision::Hold.with_friction(1.0), TradeDecision::Hold);
        assert_eq!(TradeDecision::Hold.amount(), 0.0);
    }
}
