//! Error taxonomy for the simulation engine.
//!
//! Configuration problems are rejected before a run starts; numeric
//! degeneration aborts the single run it occurs in and is reported to the
//! caller, never substituted with a default.

use thiserror::Error;

/// Pre-run validation errors. A run never begins with an invalid
/// configuration or strategy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("initial token supply must be positive, got {0}")]
    NonPositiveTokens(f64),

    #[error("initial price must be positive, got {0}")]
    NonPositivePrice(f64),

    #[error("population must contain at least one user")]
    NoUsers,

    #[error("simulation must run for at least one step")]
    NoSteps,

    #[error("allocation percentage must be within [0, 1], got {0}")]
    AllocationOutOfRange(f64),

    #[error("rate `{name}` must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("archetype table is empty")]
    EmptyArchetypeTable,

    #[error("archetype weights must sum to a positive value")]
    ZeroArchetypeWeights,

    #[error("archetype weights must be non-negative")]
    NegativeArchetypeWeight,

    #[error("behavior parameter `{name}` must be within [0, 1], got {value}")]
    ParamOutOfRange { name: &'static str, value: f64 },

    #[error("linear vesting requires at least one period")]
    ZeroVestingPeriods,

    #[error("price-triggered vesting requires a non-empty threshold list")]
    EmptyThresholds,

    #[error("price thresholds must be strictly ascending")]
    UnorderedThresholds,

    #[error("vesting release fraction must be within (0, 1], got {0}")]
    ReleaseFractionOutOfRange(f64),

    #[error("activity-based vesting requires a positive activity threshold")]
    ZeroActivityThreshold,

    #[error("tier thresholds and weights must be non-empty and of equal length")]
    MalformedTiers,

    #[error("tier weights must be non-negative")]
    NegativeTierWeight,

    #[error("lottery winners fraction must be within (0, 1], got {0}")]
    WinnersFractionOutOfRange(f64),

    #[error("eligible user set has {got} users, config expects {expected}")]
    PopulationMismatch { expected: usize, got: usize },
}

/// Runtime errors of a single run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Price went non-finite or the supply invariant broke beyond floating
    /// tolerance. The run is invalid; partial history is retained.
    #[error("numeric degeneration at step {step}: {reason}")]
    NumericDegeneration { step: u32, reason: String },

    #[error("simulation already finished")]
    Finished,
}
