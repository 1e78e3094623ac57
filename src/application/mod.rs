//! Application layer: use cases and orchestration.
//!
//! Contains:
//! - **agents**: archetype-driven user agents and their decisions
//! - **distribution**: airdrop allocation from a strategy descriptor
//! - **simulation**: the market engine and the strategy sweep driver

pub mod agents;
pub mod distribution;
pub mod simulation;
