//! User archetypes and their behavior parameters.
//!
//! The table is an explicit immutable configuration structure handed into
//! agent construction. Each agent receives a value copy of its archetype's
//! parameters, so mutating one agent can never affect another.

use rand::prelude::*;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Named behavior profile of a simulated participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// High-frequency traders.
    Speculator,
    /// Long-term holders.
    Hodler,
    /// Quick profit seekers.
    AirdropHunter,
    /// Balanced active users.
    ActiveUser,
    /// Value investors.
    Investor,
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Archetype::Speculator => "SPECULATOR",
            Archetype::Hodler => "HODLER",
            Archetype::AirdropHunter => "AIRDROP_HUNTER",
            Archetype::ActiveUser => "ACTIVE_USER",
            Archetype::Investor => "INVESTOR",
        };
        write!(f, "{}", name)
    }
}

/// Behavior parameters of one archetype, all within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorParams {
    /// Base probability of buying on a step.
    pub base_buy_prob: f64,
    /// Base probability of selling on a step.
    pub base_sell_prob: f64,
    /// How strongly price deviations from the reference shift behavior.
    pub price_sensitivity: f64,
    /// How strongly the market phase sways behavior, and the bound of
    /// trade-size draws.
    pub market_influence: f64,
}

impl BehaviorParams {
    /// Value copy with per-agent gaussian jitter, clamped back to [0, 1].
    pub fn jittered(&self, scale: f64, rng: &mut StdRng) -> Self {
        if scale <= 0.0 {
            return *self;
        }
        let noise = Normal::new(0.0, scale).expect("jitter scale is finite and non-negative");
        let mut sample = |base: f64| (base + noise.sample(rng)).clamp(0.0, 1.0);
        Self {
            base_buy_prob: sample(self.base_buy_prob),
            base_sell_prob: sample(self.base_sell_prob),
            price_sensitivity: sample(self.price_sensitivity),
            market_influence: sample(self.market_influence),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("base_buy_prob", self.base_buy_prob),
            ("base_sell_prob", self.base_sell_prob),
            ("price_sensitivity", self.price_sensitivity),
            ("market_influence", self.market_influence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ParamOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// One row of the archetype table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeEntry {
    pub archetype: Archetype,
    pub params: BehaviorParams,
    /// Share of the population drawn from this archetype.
    pub weight: f64,
}

/// Immutable archetype table: behavior parameters plus population mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeTable {
    entries: Vec<ArchetypeEntry>,
}

impl ArchetypeTable {
    pub fn new(entries: Vec<ArchetypeEntry>) -> Self {
        Self { entries }
    }

    /// A table with a single archetype at weight one.
    pub fn single(archetype: Archetype, params: BehaviorParams) -> Self {
        Self {
            entries: vec![ArchetypeEntry {
                archetype,
                params,
                weight: 1.0,
            }],
        }
    }

    pub fn entries(&self) -> &[ArchetypeEntry] {
        &self.entries
    }

    pub fn weights(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.weight).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyArchetypeTable);
        }
        if self.entries.iter().any(|e| e.weight < 0.0) {
            return Err(ConfigError::NegativeArchetypeWeight);
        }
        if self.entries.iter().map(|e| e.weight).sum::<f64>() <= 0.0 {
            return Err(ConfigError::ZeroArchetypeWeights);
        }
        for entry in &self.entries {
            entry.params.validate()?;
        }
        Ok(())
    }
}

impl Default for ArchetypeTable {
    /// Reference population mix.
    fn default() -> Self {
        let entry = |archetype, buy, sell, sensitivity, influence, weight| ArchetypeEntry {
            archetype,
            params: BehaviorParams {
                base_buy_prob: buy,
                base_sell_prob: sell,
                price_sensitivity: sensitivity,
                market_influence: influence,
            },
            weight,
        };
        Self {
            entries: vec![
                entry(Archetype::Speculator, 0.65, 0.85, 0.9, 0.8, 0.15),
                entry(Archetype::Hodler, 0.25, 0.05, 0.1, 0.2, 0.40),
                entry(Archetype::AirdropHunter, 0.15, 0.95, 0.7, 0.9, 0.10),
                entry(Archetype::ActiveUser, 0.45, 0.25, 0.4, 0.4, 0.25),
                entry(Archetype::Investor, 0.35, 0.15, 0.3, 0.3, 0.10),
            ],
        }
    }
}
