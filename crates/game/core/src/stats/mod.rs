//! Effective stat computation.
//!
//! Stats are plain sums: base value plus every `(category, label, amount)`
//! contribution gathered from level-ups, gear, the active item, set bonuses,
//! the beastiary and unexpired temporary bonuses. The only derived value is
//! [`damage_reduction`], a diminishing-returns curve over defense.
//!
//! [`StatAggregator`] rebuilds the full [`StatSheet`] (totals, sources,
//! active effects, unlocked set bonuses) from one equipment scan, so callers
//! never observe stats and effects derived from different snapshots.
mod aggregator;
mod kind;
mod sources;
mod temp;

pub use aggregator::{ActiveSetBonus, StatAggregator, StatInputs, StatSheet};
pub(crate) use aggregator::effect_for_enchantment;
pub use kind::{StatBlock, StatKind};
pub use sources::{SourceCategory, StatSource};
pub use temp::{TempBonus, TempBonuses};

/// Fraction of incoming damage absorbed by `defense`.
///
/// `defense / (defense + curve)`, capped at `max`. Non-positive defense
/// yields zero.
pub fn damage_reduction(defense: f64, curve: f64, max: f64) -> f64 {
    if defense <= 0.0 {
        return 0.0;
    }
    (defense / (defense + curve)).min(max)
}
