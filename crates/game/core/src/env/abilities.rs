//! Enchantment, equipment-set and item-counter tables.
use std::collections::BTreeMap;

use crate::combat::EffectId;
use crate::stats::StatKind;

pub trait EnchantmentOracle: Send + Sync {
    fn enchantment(&self, id: &str) -> Option<&EnchantmentDefinition>;
}

pub trait SetBonusOracle: Send + Sync {
    fn set_bonus(&self, id: &str) -> Option<&SetBonusDefinition>;
}

pub trait CounterOracle: Send + Sync {
    fn counter(&self, id: &str) -> Option<&CounterDefinition>;
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnchantmentDefinition {
    pub name: String,
    pub max_level: u32,
    /// Stat gained per enchantment level.
    pub stat_bonuses_per_level: BTreeMap<StatKind, f64>,
    pub extra_ability: Option<EffectId>,
}

impl Default for EnchantmentDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_level: 1,
            stat_bonuses_per_level: BTreeMap::new(),
            extra_ability: None,
        }
    }
}

/// Bonus unlocked once `pieces` items of a set are equipped.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SetTier {
    pub pieces: u32,
    pub stats: BTreeMap<StatKind, f64>,
    pub extra_ability: Option<EffectId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SetBonusDefinition {
    pub name: String,
    /// Ordered by ascending `pieces`; every met tier applies.
    pub tiers: Vec<SetTier>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CounterKind {
    #[default]
    Kills,
    Xp,
}

/// Per-instance tally that unlocks tiered stat bonuses on an item.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CounterDefinition {
    pub name: String,
    pub kind: CounterKind,
    /// Ascending thresholds.
    pub tiers: Vec<u64>,
    /// Bonus per tier, parallel to `tiers`.
    pub bonuses: Vec<BTreeMap<StatKind, f64>>,
}

impl CounterDefinition {
    /// Highest tier whose threshold `value` meets, with its bonus table.
    ///
    /// Thresholds are checked in order and the scan stops at the first one
    /// not met, so an out-of-order table never skips ahead.
    pub fn tier_for(&self, value: u64) -> Option<(usize, &BTreeMap<StatKind, f64>)> {
        let met = self
            .tiers
            .iter()
            .take_while(|threshold| value >= **threshold)
            .count();
        let tier = met.checked_sub(1)?;
        self.bonuses.get(tier).map(|bonus| (tier, bonus))
    }
}
