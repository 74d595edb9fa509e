//! Skills, XP curve, beastiary, and the reward notification interface.
mod beastiary;
mod skills;

pub use beastiary::Beastiary;
pub use skills::{Skill, SkillBook, XpTable};

/// One-way notifications raised while flushing combat and gathering results.
///
/// Implementors own inventory, quest and mastery bookkeeping. Every method
/// defaults to a no-op so a sink only handles what it tracks.
pub trait RewardSink {
    fn gain_xp(&mut self, _skill: Skill, _amount: u64) {}

    fn add_item(&mut self, _item_id: &str, _quantity: u32) {}

    fn handle_kill(&mut self, _enemy_id: &str) {}

    fn handle_resource_gain(&mut self, _item_id: &str, _quantity: u32) {}

    fn level_up(&mut self, _skill: Skill, _level: u32) {}
}

/// Sink that discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRewards;

impl RewardSink for NullRewards {}
