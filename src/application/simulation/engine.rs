//! Market engine.
//!
//! The per-step state-transition loop that advances price, circulating
//! supply and per-user holdings over a fixed number of steps. A run is
//! strictly sequential and fully deterministic given its seed; failure
//! mid-run marks the run invalid and never attempts recovery.

use std::collections::VecDeque;

use chrono::Utc;
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;

use super::result::{RunOutcome, SimulationResult, StepRecord};
use crate::application::agents::{MarketView, TradeDecision, UserAgent};
use crate::application::distribution::{EligibleUserSet, distribute};
use crate::config::GlobalConfig;
use crate::domain::{GlobalMarketState, PriceImpactModel, ReleaseContext, StrategyDescriptor};
use crate::error::{ConfigError, SimulationError};

/// Relative tolerance of the supply-conservation check.
const SUPPLY_TOLERANCE: f64 = 1e-6;

/// Lifecycle of a run. No retries, no rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Completed,
    Failed,
}

/// Owns the global state, the agent population and the run's random
/// source; drives the per-step sequence.
pub struct MarketEngine {
    config: GlobalConfig,
    strategy: StrategyDescriptor,
    price_model: PriceImpactModel,
    agents: Vec<UserAgent>,
    state: GlobalMarketState,
    rng: StdRng,
    history: Vec<StepRecord>,
    price_window: VecDeque<f64>,
    run_state: RunState,
    failure: Option<(u32, SimulationError)>,
}

impl MarketEngine {
    /// Validate all inputs, build the population and apply the initial
    /// distribution. A run that would be invalid never starts.
    pub fn new(
        config: GlobalConfig,
        strategy: StrategyDescriptor,
        eligible: &EligibleUserSet,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        strategy.validate()?;
        if eligible.len() != config.num_users {
            return Err(ConfigError::PopulationMismatch {
                expected: config.num_users,
                got: eligible.len(),
            });
        }

        let mut rng = StdRng::seed_from_u64(config.seed);

        let archetype_mix = WeightedIndex::new(config.archetypes.weights())
            .map_err(|_| ConfigError::ZeroArchetypeWeights)?;
        let mut agents: Vec<UserAgent> = (0..config.num_users)
            .map(|id| {
                let entry = &config.archetypes.entries()[archetype_mix.sample(&mut rng)];
                let params = entry.params.jittered(config.param_jitter, &mut rng);
                UserAgent::new(
                    id,
                    entry.archetype,
                    params,
                    config.whale_influence_boost,
                    config.activity_window,
                )
            })
            .collect();

        let allocations = distribute(
            &strategy,
            eligible,
            config.initial_tokens,
            config.simulation_steps,
            &mut rng,
        )?;
        for allocation in allocations {
            agents[allocation.user].apply_allocation(allocation.unlocked, allocation.schedule);
        }

        // Locked allocations are excluded from circulation until released.
        let locked_total: f64 = agents.iter().map(|a| a.locked_balance).sum();
        let state = GlobalMarketState::new(
            config.initial_price,
            config.initial_tokens - locked_total,
        );

        let price_model = PriceImpactModel {
            impact_coefficient: config.impact_coefficient,
            liquidity_fraction: config.liquidity_fraction,
            price_floor: config.price_floor,
        };

        let mut price_window = VecDeque::with_capacity(config.reference_window.max(1));
        price_window.push_back(config.initial_price);

        Ok(Self {
            config,
            strategy,
            price_model,
            agents,
            state,
            rng,
            history: Vec::new(),
            price_window,
            run_state: RunState::NotStarted,
            failure: None,
        })
    }

    pub fn state(&self) -> &GlobalMarketState {
        &self.state
    }

    pub fn agents(&self) -> &[UserAgent] {
        &self.agents
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn strategy(&self) -> &StrategyDescriptor {
        &self.strategy
    }

    /// Sum of all locked balances.
    pub fn locked_total(&self) -> f64 {
        self.agents.iter().map(|a| a.locked_balance).sum()
    }

    /// Rolling mean of recent prices; the reference agents compare the
    /// current price against.
    fn reference_price(&self) -> f64 {
        self.price_window.iter().sum::<f64>() / self.price_window.len() as f64
    }

    fn push_reference_price(&mut self, price: f64) {
        if self.price_window.len() >= self.config.reference_window.max(1) {
            self.price_window.pop_front();
        }
        self.price_window.push_back(price);
    }

    /// Execute one step of the fixed per-step sequence.
    pub fn step(&mut self) -> Result<StepRecord, SimulationError> {
        if matches!(self.run_state, RunState::Completed | RunState::Failed)
            || self.state.current_step >= self.config.simulation_steps
        {
            return Err(SimulationError::Finished);
        }
        self.run_state = RunState::Running;

        match self.execute_step() {
            Ok(record) => {
                if self.state.current_step >= self.config.simulation_steps {
                    self.run_state = RunState::Completed;
                }
                Ok(record)
            }
            Err(error) => {
                self.run_state = RunState::Failed;
                self.failure = Some((self.state.current_step, error.clone()));
                Err(error)
            }
        }
    }

    fn execute_step(&mut self) -> Result<StepRecord, SimulationError> {
        let step = self.state.current_step;
        let price = self.state.price;

        // 1. Market phase is a pure function of the step.
        let phase = self.config.market_cycles.phase(step);
        self.state.market_phase = phase;

        // 2. Vesting releases move locked tokens into liquid balances and
        // back into circulation.
        let mut vested_total = 0.0;
        for agent in &mut self.agents {
            let recent_activity = agent.recent_activity();
            if let Some(schedule) = agent.vesting.as_mut() {
                let released = schedule.release(&ReleaseContext {
                    step,
                    price,
                    recent_activity,
                });
                if released > 0.0 {
                    agent.locked_balance = (agent.locked_balance - released).max(0.0);
                    agent.token_balance += released;
                    vested_total += released;
                }
            }
        }
        self.state.circulating_supply += vested_total;

        // 3. Poll every agent against this step's pre-trade state.
        let view = MarketView {
            step,
            price,
            reference_price: self.reference_price(),
            market_phase: phase,
            circulating_supply: self.state.circulating_supply,
            buy_cap: self.config.max_buy_fraction * self.state.circulating_supply,
        };
        let mut decisions = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            decisions.push(agent.decide(&view, &mut self.rng));
        }

        // 4-5. Apply friction, aggregate demand, settle balances.
        let gas_fee = self.config.gas_fee_rate * price;
        let mut net_demand = 0.0;
        let mut sell_volume = 0.0;
        let mut active_traders = 0u32;
        for (agent, decision) in self.agents.iter_mut().zip(decisions) {
            let executed = match decision.with_friction(gas_fee) {
                TradeDecision::Buy { amount } => {
                    agent.token_balance += amount;
                    net_demand += amount;
                    true
                }
                TradeDecision::Sell { amount } => {
                    let amount = amount.min(agent.token_balance);
                    if amount > 0.0 {
                        agent.token_balance -= amount;
                        net_demand -= amount;
                        sell_volume += amount;
                        true
                    } else {
                        false
                    }
                }
                TradeDecision::Hold => false,
            };
            if executed {
                active_traders += 1;
            }
            agent.record_trade(executed);
        }

        // 6. Whale flags from post-trade balances, consumed next step.
        let circulating = self.state.circulating_supply;
        for agent in &mut self.agents {
            agent.is_whale = circulating > 0.0
                && agent.token_balance / circulating > self.config.whale_threshold;
        }

        // 7. Price update from pre-burn demand.
        let update = self
            .price_model
            .next_price(price, net_demand, circulating, phase);
        if !update.price.is_finite() {
            return Err(SimulationError::NumericDegeneration {
                step,
                reason: format!("non-finite price from net demand {net_demand}"),
            });
        }
        if update.clamped {
            log::warn!(
                "step {}: price clamped to floor {} (strategy `{}`)",
                step,
                self.price_model.price_floor,
                self.strategy.name
            );
        }
        self.state.price = update.price;

        // 8. Burning affects the next step's supply baseline, not this
        // step's price formula.
        let burned = (self.config.burn_rate * sell_volume).min(self.state.circulating_supply);
        self.state.circulating_supply -= burned;
        self.state.burned_total += burned;

        // 9. Conservation check at the step boundary.
        self.check_supply_invariant(step)?;

        let record = StepRecord {
            step,
            price: self.state.price,
            circulating_supply: self.state.circulating_supply,
            burned_total: self.state.burned_total,
            num_active_traders: active_traders,
            price_clamped: update.clamped,
        };
        self.history.push(record.clone());

        // 10. Advance.
        self.state.current_step += 1;
        let new_price = self.state.price;
        self.push_reference_price(new_price);

        Ok(record)
    }

    fn check_supply_invariant(&self, step: u32) -> Result<(), SimulationError> {
        let accounted = self.state.accounted_supply(self.locked_total());
        let drift = (accounted - self.config.initial_tokens).abs();
        if drift > SUPPLY_TOLERANCE * self.config.initial_tokens {
            return Err(SimulationError::NumericDegeneration {
                step,
                reason: format!(
                    "supply invariant violated: accounted {accounted}, expected {}",
                    self.config.initial_tokens
                ),
            });
        }
        Ok(())
    }

    /// Drive the run to completion (or failure) and assemble the result.
    ///
    /// A failed run keeps its partial history but is marked invalid; the
    /// reason is surfaced, never replaced with a default series.
    pub fn run(&mut self) -> SimulationResult {
        let started_at = Utc::now();
        log::info!(
            "starting run `{}`: {} users, {} steps, seed {}",
            self.strategy.name,
            self.config.num_users,
            self.config.simulation_steps,
            self.config.seed
        );

        while self.state.current_step < self.config.simulation_steps {
            match self.step() {
                Ok(record) => {
                    if record.step % 256 == 0 {
                        log::debug!(
                            "step {}: price={:.6}, supply={:.0}, traders={}",
                            record.step,
                            record.price,
                            record.circulating_supply,
                            record.num_active_traders
                        );
                    }
                }
                Err(SimulationError::Finished) => break,
                Err(error) => {
                    log::error!("run `{}` failed: {}", self.strategy.name, error);
                    break;
                }
            }
        }

        let outcome = match &self.failure {
            Some((step, error)) => RunOutcome::Failed {
                step: *step,
                reason: error.to_string(),
            },
            None => RunOutcome::Completed,
        };
        log::info!(
            "run `{}` finished ({:?}): final price {:.6}, supply {:.0}, {} steps recorded",
            self.strategy.name,
            self.run_state,
            self.state.price,
            self.state.circulating_supply,
            self.history.len()
        );

        SimulationResult {
            strategy: self.strategy.name.clone(),
            seed: self.config.seed,
            outcome,
            history: self.history.clone(),
            final_price: self.state.price,
            final_supply: self.state.circulating_supply,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
