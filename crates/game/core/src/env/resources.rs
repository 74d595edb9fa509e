use crate::progression::Skill;

use super::DropEntry;

pub trait ResourceOracle: Send + Sync {
    fn resource(&self, id: &str) -> Option<&ResourceTemplate>;
}

/// Gatherable node such as a tree or an ore vein.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceTemplate {
    pub name: String,
    pub skill: Skill,
    pub size: f64,
    pub hp: f64,
    /// XP granted for depleting the node; partial hits earn a share.
    pub reward_xp: u64,
    pub drop_table: Vec<DropEntry>,
    pub required_level: u32,
}

impl Default for ResourceTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            skill: Skill::Mining,
            size: 32.0,
            hp: 1.0,
            reward_xp: 0,
            drop_table: Vec::new(),
            required_level: 0,
        }
    }
}
