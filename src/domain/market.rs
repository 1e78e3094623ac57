//! Global market state.
//!
//! One per simulation run, mutated once per step by the engine.

use serde::{Deserialize, Serialize};

/// Aggregate market state at a step boundary.
///
/// Invariant (checked by the engine every step):
/// `circulating_supply + total locked balance + burned_total` equals the
/// initial token supply within floating tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMarketState {
    /// Current token price, strictly positive.
    pub price: f64,
    /// Transferable supply, bounded above by the initial supply.
    pub circulating_supply: f64,
    /// Tokens permanently removed from circulation.
    pub burned_total: f64,
    /// Step the engine is about to execute.
    pub current_step: u32,
    /// Cyclical modulation for the current step, derived from it.
    pub market_phase: f64,
}

impl GlobalMarketState {
    pub fn new(initial_price: f64, circulating_supply: f64) -> Self {
        Self {
            price: initial_price,
            circulating_supply,
            burned_total: 0.0,
            current_step: 0,
            market_phase: 0.0,
        }
    }

    /// Total accounted supply given the sum of locked balances.
    pub fn accounted_supply(&self, locked_total: f64) -> f64 {
        self.circulating_supply + locked_total + self.burned_total
    }
}
