//! Domain layer: pure value objects and business rules.

mod archetype;
mod market;
mod price;
mod strategy;
mod vesting;

pub use archetype::{Archetype, ArchetypeEntry, ArchetypeTable, BehaviorParams};
pub use market::GlobalMarketState;
pub use price::{PriceImpactModel, PriceUpdate};
pub use strategy::{DistributionKind, StrategyDescriptor, TierCriteria, VestingSpec};
pub use vesting::{ReleaseContext, ScheduleKind, VestingSchedule};
