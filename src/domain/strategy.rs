//! Strategy descriptors.
//!
//! A strategy is the immutable input of one run: how the airdrop is
//! distributed, how large it is, and how the allocations vest. Descriptors
//! are validated up front; a malformed strategy never reaches the loop.

use serde::{Deserialize, Serialize};

use super::vesting::{ScheduleKind, VestingSchedule, period_interval};
use crate::error::ConfigError;

/// Score used to rank users for tiered distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierCriteria {
    Holdings,
    Activity,
}

/// How the airdrop budget is assigned to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DistributionKind {
    /// No airdrop; baseline runs.
    None,
    /// Equal share for every user.
    Uniform,
    /// A random subset of winners, equal shares.
    Lottery { winners_fraction: f64 },
    /// Weight per user from an ordered `(threshold, weight)` ladder applied
    /// to a per-user score.
    Tiered {
        criteria: TierCriteria,
        thresholds: Vec<f64>,
        weights: Vec<f64>,
    },
}

/// Declarative vesting configuration, turned into a per-allocation
/// [`VestingSchedule`] at distribution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VestingSpec {
    /// Allocations are liquid immediately.
    None,
    Linear {
        num_periods: u32,
    },
    PriceTriggered {
        thresholds: Vec<f64>,
        release_fraction: f64,
    },
    ActivityBased {
        num_periods: u32,
        activity_threshold: u32,
    },
}

impl VestingSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            VestingSpec::None => Ok(()),
            VestingSpec::Linear { num_periods } => {
                if *num_periods == 0 {
                    return Err(ConfigError::ZeroVestingPeriods);
                }
                Ok(())
            }
            VestingSpec::PriceTriggered {
                thresholds,
                release_fraction,
            } => {
                if thresholds.is_empty() {
                    return Err(ConfigError::EmptyThresholds);
                }
                if thresholds.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(ConfigError::UnorderedThresholds);
                }
                if !(*release_fraction > 0.0 && *release_fraction <= 1.0) {
                    return Err(ConfigError::ReleaseFractionOutOfRange(*release_fraction));
                }
                Ok(())
            }
            VestingSpec::ActivityBased {
                num_periods,
                activity_threshold,
            } => {
                if *num_periods == 0 {
                    return Err(ConfigError::ZeroVestingPeriods);
                }
                if *activity_threshold == 0 {
                    return Err(ConfigError::ZeroActivityThreshold);
                }
                Ok(())
            }
        }
    }

    /// Build the schedule for one allocation, or `None` when allocations
    /// are liquid from the start. Assumes `validate` has passed.
    pub fn build(&self, total_amount: f64, simulation_steps: u32) -> Option<VestingSchedule> {
        let kind = match self {
            VestingSpec::None => return None,
            VestingSpec::Linear { num_periods } => ScheduleKind::Linear {
                interval: period_interval(simulation_steps, *num_periods),
                num_periods: *num_periods,
                periods_done: 0,
            },
            VestingSpec::PriceTriggered {
                thresholds,
                release_fraction,
            } => ScheduleKind::PriceTriggered {
                thresholds: thresholds.clone(),
                release_fraction: *release_fraction,
                next_threshold: 0,
            },
            VestingSpec::ActivityBased {
                num_periods,
                activity_threshold,
            } => ScheduleKind::ActivityBased {
                interval: period_interval(simulation_steps, *num_periods),
                num_periods: *num_periods,
                periods_done: 0,
                activity_threshold: *activity_threshold,
            },
        };
        Some(VestingSchedule::new(total_amount, kind))
    }
}

/// Immutable description of one airdrop strategy under comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDescriptor {
    /// Human-readable name, used in logs and sweep results.
    pub name: String,
    pub distribution: DistributionKind,
    /// Share of the initial supply allocated to the airdrop, in [0, 1].
    pub percentage: f64,
    pub vesting: VestingSpec,
}

impl StrategyDescriptor {
    pub fn new(
        name: impl Into<String>,
        distribution: DistributionKind,
        percentage: f64,
        vesting: VestingSpec,
    ) -> Self {
        Self {
            name: name.into(),
            distribution,
            percentage,
            vesting,
        }
    }

    /// A baseline strategy that distributes nothing.
    pub fn baseline(name: impl Into<String>) -> Self {
        Self::new(name, DistributionKind::None, 0.0, VestingSpec::None)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.percentage) {
            return Err(ConfigError::AllocationOutOfRange(self.percentage));
        }
        match &self.distribution {
            DistributionKind::None | DistributionKind::Uniform => {}
            DistributionKind::Lottery { winners_fraction } => {
                if !(*winners_fraction > 0.0 && *winners_fraction <= 1.0) {
                    return Err(ConfigError::WinnersFractionOutOfRange(*winners_fraction));
                }
            }
            DistributionKind::Tiered {
                thresholds, weights, ..
            } => {
                if thresholds.is_empty() || thresholds.len() != weights.len() {
                    return Err(ConfigError::MalformedTiers);
                }
                if weights.iter().any(|w| *w < 0.0) {
                    return Err(ConfigError::NegativeTierWeight);
                }
            }
        }
        self.vesting.validate()
    }
}
