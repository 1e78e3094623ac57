//! User agents.
//!
//! One agent per simulated participant. The archetype drives a
//! probabilistic buy/sell/hold policy; all randomness comes from the run's
//! injected generator so runs are reproducible.

use std::collections::VecDeque;

use rand::prelude::*;

use super::TradeDecision;
use crate::domain::{Archetype, BehaviorParams, VestingSchedule};

/// Read-only market snapshot handed to every agent on a step.
#[derive(Debug, Clone, Copy)]
pub struct MarketView {
    pub step: u32,
    pub price: f64,
    /// Rolling mean of recent prices the policy compares against.
    pub reference_price: f64,
    pub market_phase: f64,
    pub circulating_supply: f64,
    /// Per-step cap on a single buy, in tokens.
    pub buy_cap: f64,
}

/// One simulated participant.
#[derive(Debug, Clone)]
pub struct UserAgent {
    pub id: usize,
    pub archetype: Archetype,
    /// Value copy of the archetype parameters, jittered per agent.
    pub params: BehaviorParams,
    /// Liquid, transferable holdings.
    pub token_balance: f64,
    /// Holdings still gated by vesting.
    pub locked_balance: f64,
    /// Recomputed each step from post-trade balances; consumed by the next
    /// step's decision.
    pub is_whale: bool,
    /// Amplification of `market_influence` while flagged as a whale.
    whale_boost: f64,
    /// Vesting schedule of this agent's allocation, if any.
    pub vesting: Option<VestingSchedule>,
    /// Trailing record of trade/no-trade per step.
    activity: VecDeque<bool>,
    activity_window: usize,
}

impl UserAgent {
    pub fn new(
        id: usize,
        archetype: Archetype,
        params: BehaviorParams,
        whale_boost: f64,
        activity_window: usize,
    ) -> Self {
        Self {
            id,
            archetype,
            params,
            token_balance: 0.0,
            locked_balance: 0.0,
            is_whale: false,
            whale_boost,
            vesting: None,
            activity: VecDeque::with_capacity(activity_window),
            activity_window: activity_window.max(1),
        }
    }

    /// Credit an airdrop allocation: liquid part plus a locked schedule.
    pub fn apply_allocation(&mut self, unlocked: f64, schedule: Option<VestingSchedule>) {
        self.token_balance += unlocked;
        if let Some(schedule) = schedule {
            self.locked_balance += schedule.remaining();
            self.vesting = Some(schedule);
        }
    }

    /// Rolling count of trade actions over the trailing window.
    pub fn recent_activity(&self) -> u32 {
        self.activity.iter().filter(|traded| **traded).count() as u32
    }

    /// Record whether this agent traded this step.
    pub fn record_trade(&mut self, traded: bool) {
        if self.activity.len() == self.activity_window {
            self.activity.pop_front();
        }
        self.activity.push_back(traded);
    }

    /// Effective market influence, amplified while the whale flag from the
    /// previous step is set.
    fn effective_influence(&self) -> f64 {
        let influence = self.params.market_influence;
        if self.is_whale {
            (influence * (1.0 + self.whale_boost)).min(1.0)
        } else {
            influence
        }
    }

    /// Decide buy/sell/hold for the current step.
    ///
    /// Pure with respect to agent state; the engine settles balances after
    /// all agents are polled.
    pub fn decide(&self, view: &MarketView, rng: &mut StdRng) -> TradeDecision {
        let influence = self.effective_influence();

        // Deviation of price below the rolling reference, as a fraction.
        // Positive favors buying, negative favors selling.
        let reference_delta = if view.reference_price > 0.0 {
            (view.reference_price - view.price) / view.reference_price
        } else {
            0.0
        };

        let buy_shift = self.params.price_sensitivity * reference_delta
            + influence * view.market_phase;
        let buy_prob = shaped_probability(self.params.base_buy_prob, buy_shift);
        let sell_prob = shaped_probability(self.params.base_sell_prob, -buy_shift);

        // Normalize so an exclusive draw is well defined.
        let total = buy_prob + sell_prob;
        let (buy_prob, sell_prob) = if total > 1.0 {
            (buy_prob / total, sell_prob / total)
        } else {
            (buy_prob, sell_prob)
        };

        if buy_prob + sell_prob <= 0.0 {
            return TradeDecision::Hold;
        }

        let draw: f64 = rng.r#gen();
        if draw < buy_prob {
            let fraction = rng.r#gen::<f64>() * influence;
            let amount = fraction * view.buy_cap;
            if amount > 0.0 {
                TradeDecision::Buy { amount }
            } else {
                TradeDecision::Hold
            }
        } else if draw < buy_prob + sell_prob {
            let fraction = rng.r#gen::<f64>() * influence;
            let amount = (fraction * self.token_balance).min(self.token_balance);
            if amount > 0.0 {
                TradeDecision::Sell { amount }
            } else {
                TradeDecision::Hold
            }
        } else {
            TradeDecision::Hold
        }
    }
}

/// Logistic shaping of a base probability by an additive shift in logit
/// space. Degenerate bases stay degenerate: an archetype that never trades
/// never trades.
fn shaped_probability(base: f64, shift: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    if base >= 1.0 {
        return 1.0;
    }
    let logit = (base / (1.0 - base)).ln();
    let x = (logit + shift).clamp(-50.0, 50.0);
    1.0 / (1.0 + (-x).exp())
}
