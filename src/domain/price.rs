//! Price impact model.
//!
//! Converts aggregate net demand, liquidity depth and the market phase into
//! the next price. Pure math; the engine owns clamp logging and the
//! non-finite check.

use serde::{Deserialize, Serialize};

/// Outcome of one price update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceUpdate {
    pub price: f64,
    /// The candidate price fell below the floor and was clamped.
    pub clamped: bool,
}

/// Demand-driven price model with liquidity dampening.
///
/// Impact scales with the demand-to-liquidity ratio, and the liquidity pool
/// scales with circulating supply, so a deeper market moves less per unit
/// of demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceImpactModel {
    /// Scale of price impact per unit of demand/liquidity ratio.
    pub impact_coefficient: f64,
    /// Liquidity depth as a fraction of circulating supply.
    pub liquidity_fraction: f64,
    /// Strictly positive floor the price never crosses.
    pub price_floor: f64,
}

impl PriceImpactModel {
    /// Next price from this step's pre-burn net demand.
    pub fn next_price(
        &self,
        price: f64,
        net_demand: f64,
        circulating_supply: f64,
        market_phase: f64,
    ) -> PriceUpdate {
        let liquidity = (self.liquidity_fraction * circulating_supply).max(f64::EPSILON);
        let impact = self.impact_coefficient * net_demand / liquidity;
        let candidate = price * (1.0 + impact + market_phase);

        if candidate < self.price_floor {
            PriceUpdate {
                price: self.price_floor,
                clamped: true,
            }
        } else {
            PriceUpdate {
                price: candidate,
                clamped: false,
            }
        }
    }
}
