//! Airdrop distributor.
//!
//! Turns a strategy descriptor and an eligible-user set into per-user
//! allocations: a liquid amount plus an optional vesting schedule. The sum
//! of all allocations equals `initial_tokens * percentage` up to floating
//! rounding; every eligible user receives a non-negative amount. Invoked
//! once before the loop starts.

use rand::prelude::*;
use rand_distr::Poisson;
use serde::{Deserialize, Serialize};

use crate::domain::{DistributionKind, StrategyDescriptor, TierCriteria, VestingSchedule};
use crate::error::ConfigError;

/// Eligibility data for one user, supplied by the data-generation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibleUser {
    /// Pre-airdrop holdings score used by tiered-by-holdings strategies.
    pub holdings_score: f64,
    /// Historical activity score used by tiered-by-activity strategies.
    pub activity_score: f64,
}

/// Per-user eligibility inputs for one run, indexed by user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibleUserSet {
    users: Vec<EligibleUser>,
}

impl EligibleUserSet {
    pub fn new(users: Vec<EligibleUser>) -> Self {
        Self { users }
    }

    /// Synthetic population for tests and demos: fresh accounts (zero
    /// holdings) with Poisson-distributed activity.
    pub fn synthetic(num_users: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let activity = Poisson::new(20.0).expect("constant lambda is valid");
        let users = (0..num_users)
            .map(|_| EligibleUser {
                holdings_score: 0.0,
                activity_score: activity.sample(&mut rng) + rng.gen_range(0.0..5.0),
            })
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &[EligibleUser] {
        &self.users
    }
}

/// One user's share of the airdrop.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub user: usize,
    /// Liquid from step zero.
    pub unlocked: f64,
    /// Locked remainder, released by the schedule.
    pub schedule: Option<VestingSchedule>,
}

impl Allocation {
    pub fn total(&self) -> f64 {
        self.unlocked + self.schedule.as_ref().map_or(0.0, |s| s.total_amount)
    }
}

/// Compute the initial allocation mapping for a strategy.
///
/// Users with zero weight receive no entry. Tie handling is inherently
/// stable: weights are computed per user in ascending id order.
pub fn distribute(
    strategy: &StrategyDescriptor,
    eligible: &EligibleUserSet,
    initial_tokens: f64,
    simulation_steps: u32,
    rng: &mut StdRng,
) -> Result<Vec<Allocation>, ConfigError> {
    strategy.validate()?;

    let budget = initial_tokens * strategy.percentage;
    if budget <= 0.0 {
        return Ok(Vec::new());
    }

    let weights = eligibility_weights(&strategy.distribution, eligible, rng);
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Ok(Vec::new());
    }

    let allocations = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| **w > 0.0)
        .map(|(user, w)| {
            let share = budget * w / total_weight;
            match strategy.vesting.build(share, simulation_steps) {
                Some(schedule) => Allocation {
                    user,
                    unlocked: 0.0,
                    schedule: Some(schedule),
                },
                None => Allocation {
                    user,
                    unlocked: share,
                    schedule: None,
                },
            }
        })
        .collect();

    Ok(allocations)
}

fn eligibility_weights(
    distribution: &DistributionKind,
    eligible: &EligibleUserSet,
    rng: &mut StdRng,
) -> Vec<f64> {
    let n = eligible.len();
    match distribution {
        DistributionKind::None => vec![0.0; n],
        DistributionKind::Uniform => vec![1.0; n],
        DistributionKind::Lottery { winners_fraction } => {
            let num_winners = ((n as f64 * winners_fraction).floor() as usize).min(n);
            let mut weights = vec![0.0; n];
            if num_winners > 0 {
                for winner in rand::seq::index::sample(rng, n, num_winners) {
                    weights[winner] = 1.0;
                }
            }
            weights
        }
        DistributionKind::Tiered {
            criteria,
            thresholds,
            weights: tier_weights,
        } => eligible
            .users()
            .iter()
            .map(|user| {
                let score = match criteria {
                    TierCriteria::Holdings => user.holdings_score,
                    TierCriteria::Activity => user.activity_score,
                };
                thresholds
                    .iter()
                    .zip(tier_weights)
                    .filter(|(threshold, _)| score >= **threshold)
                    .map(|(_, weight)| *weight)
                    .sum()
            })
            .collect(),
    }
}
