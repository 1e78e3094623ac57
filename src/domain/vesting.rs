//! Vesting schedules.
//!
//! A schedule gates the release of an agent's locked allocation. Schedules
//! are built once at distribution time from a validated [`VestingSpec`]
//! (see `domain::strategy`) and mutated once per step by the engine.
//! `released_amount` is monotonic and never exceeds `total_amount`.

use serde::{Deserialize, Serialize};

/// Per-step inputs a schedule may react to.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseContext {
    pub step: u32,
    pub price: f64,
    /// Rolling count of the owning agent's trade actions.
    pub recent_activity: u32,
}

/// Kind-specific release state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScheduleKind {
    /// Equal tranches at evenly spaced trigger steps.
    Linear {
        interval: u32,
        num_periods: u32,
        periods_done: u32,
    },
    /// A fraction of the remaining lock releases the first time price
    /// crosses each threshold; thresholds fire at most once, in ascending
    /// order, possibly several in one step.
    PriceTriggered {
        thresholds: Vec<f64>,
        release_fraction: f64,
        next_threshold: usize,
    },
    /// Tranches scaled by the owner's trailing trade activity.
    ActivityBased {
        interval: u32,
        num_periods: u32,
        periods_done: u32,
        activity_threshold: u32,
    },
}

/// Vesting state for one allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub total_amount: f64,
    pub released_amount: f64,
    pub kind: ScheduleKind,
}

impl VestingSchedule {
    pub fn new(total_amount: f64, kind: ScheduleKind) -> Self {
        Self {
            total_amount,
            released_amount: 0.0,
            kind,
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.total_amount - self.released_amount).max(0.0)
    }

    /// Fully released schedules are inert.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() <= 0.0
    }

    /// Amount moving from locked to liquid this step. Mutates the release
    /// bookkeeping; the engine moves the balances.
    pub fn release(&mut self, ctx: &ReleaseContext) -> f64 {
        if self.is_exhausted() {
            return 0.0;
        }

        let amount = match &mut self.kind {
            ScheduleKind::Linear {
                interval,
                num_periods,
                periods_done,
            } => {
                if ctx.step % *interval == 0 && *periods_done < *num_periods {
                    *periods_done += 1;
                    self.total_amount / *num_periods as f64
                } else {
                    0.0
                }
            }
            ScheduleKind::PriceTriggered {
                thresholds,
                release_fraction,
                next_threshold,
            } => {
                let mut amount = 0.0;
                let mut remaining = self.total_amount - self.released_amount;
                while *next_threshold < thresholds.len() && ctx.price > thresholds[*next_threshold]
                {
                    let tranche = *release_fraction * remaining;
                    amount += tranche;
                    remaining -= tranche;
                    *next_threshold += 1;
                }
                amount
            }
            ScheduleKind::ActivityBased {
                interval,
                num_periods,
                periods_done,
                activity_threshold,
            } => {
                if ctx.step % *interval == 0 && *periods_done < *num_periods {
                    *periods_done += 1;
                    let ratio = ctx.recent_activity as f64 / *activity_threshold as f64;
                    ratio * self.total_amount / *num_periods as f64
                } else {
                    0.0
                }
            }
        };

        // Clamp so cumulative release absorbs rounding and activity
        // overshoot without ever exceeding the total.
        let amount = amount.max(0.0).min(self.remaining());
        self.released_amount += amount;
        amount
    }
}

/// Evenly spaced trigger interval for `num_periods` tranches over a run.
pub(crate) fn period_interval(simulation_steps: u32, num_periods: u32) -> u32 {
    (simulation_steps / num_periods).max(1)
}
