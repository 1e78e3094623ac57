//! Agent-based simulation of token airdrop strategies.
//!
//! The crate advances a single-asset token market over a fixed number of
//! discrete steps: a population of archetype-driven agents trades against
//! a demand-driven price model while vesting schedules release airdropped
//! allocations, gas friction shrinks small trades and a burn rate removes
//! a slice of every step's sell volume. Runs are deterministic given a
//! seed, so strategy parameterizations can be ranked against each other.
//!
//! Strategy-grid generation, config-file loading, CSV export and plotting
//! are external consumers of [`SimulationResult`]; the crate itself does
//! no I/O beyond logging.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;

// Re-export key types at crate root
pub use application::agents::{MarketView, TradeDecision, UserAgent};
pub use application::distribution::{Allocation, EligibleUser, EligibleUserSet, distribute};
pub use application::simulation::{
    MarketEngine, RunOutcome, RunState, SimulationResult, StepRecord, SweepEntry, run_sweep,
};
pub use config::{GlobalConfig, MarketCycles};
pub use domain::{
    Archetype, ArchetypeEntry, ArchetypeTable, BehaviorParams, DistributionKind,
    GlobalMarketState, PriceImpactModel, PriceUpdate, StrategyDescriptor, TierCriteria,
    VestingSchedule, VestingSpec,
};
pub use error::{ConfigError, SimulationError};
