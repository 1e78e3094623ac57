//! End-to-end scenario tests.
//!
//! Small, hand-sized populations with known expected trajectories.

use airdrop_sim::{
    Archetype, ArchetypeTable, BehaviorParams, DistributionKind, EligibleUserSet, GlobalConfig,
    MarketCycles, MarketEngine, StrategyDescriptor, TierCriteria, VestingSpec,
};
use approx::assert_relative_eq;

const INITIAL_TOKENS: f64 = 1_000_000.0;
const STEPS: u32 = 50;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scenario_config(archetypes: ArchetypeTable, seed: u64) -> GlobalConfig {
    GlobalConfig {
        initial_tokens: INITIAL_TOKENS,
        initial_price: 0.10,
        num_users: 10,
        simulation_steps: STEPS,
        seed,
        archetypes,
        // Gentle full cycle over the run so the phase term nets out.
        market_cycles: MarketCycles {
            phase_duration: STEPS / 4,
            amplitude: 0.02,
            frequency: None,
        },
        ..Default::default()
    }
}

/// Pure holders: never buy, never sell.
fn hodler_table() -> ArchetypeTable {
    ArchetypeTable::single(
        Archetype::Hodler,
        BehaviorParams {
            base_buy_prob: 0.0,
            base_sell_prob: 0.0,
            price_sensitivity: 0.1,
            market_influence: 0.2,
        },
    )
}

fn speculator_table() -> ArchetypeTable {
    ArchetypeTable::single(
        Archetype::Speculator,
        BehaviorParams {
            base_buy_prob: 0.65,
            base_sell_prob: 0.85,
            price_sensitivity: 0.9,
            market_influence: 0.8,
        },
    )
}

#[test]
fn hodler_population_without_airdrop_is_inert() {
    init_logs();
    let mut config = scenario_config(hodler_table(), 42);
    // No jitter: keep the population exactly at the archetype parameters.
    config.param_jitter = 0.0;
    let eligible = EligibleUserSet::synthetic(config.num_users, 42);
    let mut engine =
        MarketEngine::new(config, StrategyDescriptor::baseline("no-airdrop"), &eligible)
            .expect("valid setup");

    let result = engine.run();
    assert!(result.is_valid());

    // Nobody trades, nothing burns: supply is untouched.
    assert_relative_eq!(result.final_supply, INITIAL_TOKENS, max_relative = 1e-12);
    for record in &result.history {
        assert_eq!(record.num_active_traders, 0);
        assert_eq!(record.burned_total, 0.0);
    }

    // With no demand shock the price only carries the gentle cycle.
    assert!(
        (result.final_price - 0.10).abs() < 0.01,
        "final price {} strayed from 0.10",
        result.final_price
    );
}

#[test]
fn tiered_linear_vesting_releases_in_three_jumps() {
    init_logs();
    let config = scenario_config(speculator_table(), 7);
    let eligible = EligibleUserSet::synthetic(config.num_users, 7);
    let strategy = StrategyDescriptor::new(
        "tiered-3-period",
        DistributionKind::Tiered {
            criteria: TierCriteria::Activity,
            thresholds: vec![10.0, 20.0, 30.0, 60.0],
            weights: vec![0.1, 0.2, 0.3, 0.4],
        },
        0.10,
        VestingSpec::Linear { num_periods: 3 },
    );
    let mut engine = MarketEngine::new(config, strategy, &eligible).expect("valid setup");

    let budget = engine.locked_total();
    assert_relative_eq!(budget, 0.10 * INITIAL_TOKENS, max_relative = 1e-9);

    // Triggers at evenly spaced steps: 0, 16, 32.
    let interval = STEPS / 3;
    let mut releases = Vec::new();
    for step in 0..STEPS {
        let locked_before = engine.locked_total();
        engine.step().expect("step succeeds");
        let released = locked_before - engine.locked_total();
        if released > 1e-9 {
            releases.push((step, released));
        }
    }

    let trigger_steps: Vec<u32> = releases.iter().map(|(s, _)| *s).collect();
    assert_eq!(
        trigger_steps,
        vec![0, interval, 2 * interval],
        "vesting fired at unexpected steps"
    );

    // Three equal tranches that exhaust the budget.
    for (_, released) in &releases {
        assert_relative_eq!(*released, budget / 3.0, max_relative = 1e-6);
    }
    assert!(engine.locked_total() < 1e-6);

    // Everything released is liquid or already resold; the allocation is
    // fully accounted for.
    let total_released: f64 = releases.iter().map(|(_, r)| r).sum();
    assert_relative_eq!(total_released, budget, max_relative = 1e-9);
}

#[test]
fn speculator_selling_burns_supply() {
    init_logs();
    let config = scenario_config(speculator_table(), 11);
    let eligible = EligibleUserSet::synthetic(config.num_users, 11);
    let strategy = StrategyDescriptor::new(
        "uniform-instant",
        DistributionKind::Uniform,
        0.10,
        VestingSpec::None,
    );
    let mut engine = MarketEngine::new(config, strategy, &eligible).expect("valid setup");

    let result = engine.run();
    assert!(result.is_valid());

    // Speculators dump their allocation; burning removes a slice of every
    // sell, so supply strictly shrinks.
    let last = result.history.last().expect("history not empty");
    assert!(last.burned_total > 0.0, "no burns despite heavy selling");
    assert!(result.final_supply < INITIAL_TOKENS);
    assert_relative_eq!(
        result.final_supply + last.burned_total + engine.locked_total(),
        INITIAL_TOKENS,
        max_relative = 1e-6
    );
}
