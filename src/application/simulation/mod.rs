//! Simulation framework.
//!
//! The engine that coordinates vesting, agent decisions, price impact,
//! burning and history recording, plus the sweep driver that runs
//! independent strategies side by side.

mod engine;
mod result;
mod sweep;

pub use engine::{MarketEngine, RunState};
pub use result::{RunOutcome, SimulationResult, StepRecord};
pub use sweep::{SweepEntry, run_sweep};
