//! Reward bookkeeping for a session.
use std::collections::BTreeMap;

use grindstone_core::{RewardSink, Skill};

/// Records every reward notification raised by zone flushes.
///
/// Stands in for inventory and quest tracking: it only tallies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardLedger {
    pub inventory: BTreeMap<String, u64>,
    pub xp: BTreeMap<Skill, u64>,
    pub kills: BTreeMap<String, u64>,
    /// Items gained from kills and gathering, counted separately from the
    /// inventory so consumers can track collection goals.
    pub gathered: BTreeMap<String, u64>,
    pub level_ups: Vec<(Skill, u32)>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(&self, item: &str) -> u64 {
        self.inventory.get(item).copied().unwrap_or(0)
    }

    pub fn xp(&self, skill: Skill) -> u64 {
        self.xp.get(&skill).copied().unwrap_or(0)
    }

    pub fn kills_of(&self, enemy: &str) -> u64 {
        self.kills.get(enemy).copied().unwrap_or(0)
    }

    pub fn total_kills(&self) -> u64 {
        self.kills.values().sum()
    }
}

impl RewardSink for RewardLedger {
    fn gain_xp(&mut self, skill: Skill, amount: u64) {
        *self.xp.entry(skill).or_default() += amount;
    }

    fn add_item(&mut self, item_id: &str, quantity: u32) {
        *self.inventory.entry(item_id.to_string()).or_default() += u64::from(quantity);
    }

    fn handle_kill(&mut self, enemy_id: &str) {
        *self.kills.entry(enemy_id.to_string()).or_default() += 1;
    }

    fn handle_resource_gain(&mut self, item_id: &str, quantity: u32) {
        *self.gathered.entry(item_id.to_string()).or_default() += u64::from(quantity);
    }

    fn level_up(&mut self, skill: Skill, level: u32) {
        self.level_ups.push((skill, level));
    }
}
