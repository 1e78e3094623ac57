//! Run history and result types.
//!
//! Append-only per-step records plus final metrics, shaped for tabular
//! export (one row per step) by the reporting layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot appended at the end of every executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u32,
    pub price: f64,
    pub circulating_supply: f64,
    pub burned_total: f64,
    /// Agents whose post-fee decision executed this step.
    pub num_active_traders: u32,
    /// The price update hit the floor and was clamped.
    pub price_clamped: bool,
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    Completed,
    /// The run degenerated mid-flight; history up to `step` is retained
    /// but the series is not comparable.
    Failed { step: u32, reason: String },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Full output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Name of the strategy that produced this series.
    pub strategy: String,
    /// Seed of the run's pseudo-random source.
    pub seed: u64,
    pub outcome: RunOutcome,
    /// One record per executed step.
    pub history: Vec<StepRecord>,
    pub final_price: f64,
    pub final_supply: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SimulationResult {
    /// Whether the series is usable for comparative ranking.
    pub fn is_valid(&self) -> bool {
        self.outcome.is_completed()
    }

    /// Number of price-floor clamp events over the run. A high count
    /// signals a degenerate strategy even when the run completed.
    pub fn clamp_events(&self) -> usize {
        self.history.iter().filter(|r| r.price_clamped).count()
    }
}
