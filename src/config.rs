//! Global simulation configuration.
//!
//! Everything the engine consumes from the outside: supply and price
//! constants, population size, the archetype table, market-cycle shape and
//! the friction coefficients. All coefficients are configuration, not
//! baked-in constants; the defaults reproduce the reference
//! parameterization.

use serde::{Deserialize, Serialize};

use crate::domain::ArchetypeTable;
use crate::error::ConfigError;

/// Deterministic market-cycle modulation, independent of trading.
///
/// The phase term is `amplitude * sin(frequency * step)`. A full cycle
/// spans four phases (accumulation, bull, distribution, bear), so the
/// default frequency is derived from `phase_duration` as
/// `2*pi / (4 * phase_duration)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCycles {
    /// Steps per market phase (quarter cycle).
    pub phase_duration: u32,
    /// Peak amplitude of the cyclical price modulation.
    pub amplitude: f64,
    /// Explicit angular frequency; derived from `phase_duration` when unset.
    pub frequency: Option<f64>,
}

impl MarketCycles {
    pub fn frequency(&self) -> f64 {
        self.frequency
            .unwrap_or(std::f64::consts::PI / (2.0 * self.phase_duration.max(1) as f64))
    }

    /// Phase value for a step.
    pub fn phase(&self, step: u32) -> f64 {
        self.amplitude * (self.frequency() * step as f64).sin()
    }
}

impl Default for MarketCycles {
    fn default() -> Self {
        Self {
            phase_duration: 256,
            amplitude: 0.15,
            frequency: None,
        }
    }
}

/// Full configuration of a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Total token supply. Conserved across circulating, locked and burned.
    pub initial_tokens: f64,
    /// Token price at step zero.
    pub initial_price: f64,
    /// Number of simulated participants.
    pub num_users: usize,
    /// Number of discrete steps in the run.
    pub simulation_steps: u32,
    /// Seed of the run's pseudo-random source.
    pub seed: u64,

    /// Archetype behavior table and population mix.
    pub archetypes: ArchetypeTable,
    /// Market cycle shape.
    pub market_cycles: MarketCycles,

    /// Flat per-trade friction, in tokens, as a fraction of current price.
    pub gas_fee_rate: f64,
    /// Fraction of each step's sell volume removed from circulation.
    pub burn_rate: f64,
    /// Fraction of circulating supply above which a holder is a whale.
    pub whale_threshold: f64,
    /// Amplification of `market_influence` for flagged whales.
    pub whale_influence_boost: f64,

    /// Liquidity depth as a fraction of circulating supply.
    pub liquidity_fraction: f64,
    /// Scale of price impact per unit of demand/liquidity ratio.
    pub impact_coefficient: f64,
    /// Strictly positive floor the price is clamped to.
    pub price_floor: f64,
    /// Per-step buy cap as a fraction of circulating supply.
    pub max_buy_fraction: f64,

    /// Std-dev of the per-agent jitter applied to archetype parameters.
    pub param_jitter: f64,
    /// Trailing window (steps) of the rolling reference price.
    pub reference_window: usize,
    /// Trailing window (steps) of the per-agent activity counter.
    pub activity_window: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            initial_tokens: 1_000_000_000.0,
            initial_price: 0.10,
            num_users: 500,
            simulation_steps: 1024,
            seed: 42,
            archetypes: ArchetypeTable::default(),
            market_cycles: MarketCycles::default(),
            gas_fee_rate: 0.001,
            burn_rate: 0.05,
            whale_threshold: 0.01,
            whale_influence_boost: 0.2,
            liquidity_fraction: 0.05,
            impact_coefficient: 0.1,
            price_floor: 1e-6,
            max_buy_fraction: 0.005,
            param_jitter: 0.08,
            reference_window: 16,
            activity_window: 32,
        }
    }
}

impl GlobalConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every constant the engine relies on. Called once before a run
    /// starts; the loop itself never re-validates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_tokens > 0.0) {
            return Err(ConfigError::NonPositiveTokens(self.initial_tokens));
        }
        if !(self.initial_price > 0.0) {
            return Err(ConfigError::NonPositivePrice(self.initial_price));
        }
        if self.num_users == 0 {
            return Err(ConfigError::NoUsers);
        }
        if self.simulation_steps == 0 {
            return Err(ConfigError::NoSteps);
        }

        for (name, value) in [
            ("gas_fee_rate", self.gas_fee_rate),
            ("burn_rate", self.burn_rate),
            ("whale_threshold", self.whale_threshold),
            ("liquidity_fraction", self.liquidity_fraction),
            ("max_buy_fraction", self.max_buy_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }

        if !(self.price_floor > 0.0) {
            return Err(ConfigError::NonPositivePrice(self.price_floor));
        }

        self.archetypes.validate()
    }
}
