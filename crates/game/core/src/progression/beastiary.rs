use std::collections::BTreeMap;

use crate::env::Env;

/// Kill counts per enemy type and the milestone awards already paid out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beastiary {
    kills: BTreeMap<String, u64>,
    milestones_awarded: u32,
}

impl Beastiary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kills(&self, enemy_id: &str) -> u64 {
        self.kills.get(enemy_id).copied().unwrap_or(0)
    }

    pub fn record_kill(&mut self, enemy_id: &str) -> u64 {
        let count = self.kills.entry(enemy_id.to_string()).or_default();
        *count += 1;
        *count
    }

    /// Number of consecutive thresholds the kill count meets.
    pub fn enemy_level(&self, enemy_id: &str, env: &Env<'_>) -> u32 {
        let kills = self.kills(enemy_id);
        let Some(template) = env.enemy(enemy_id) else {
            return 0;
        };
        template
            .beastiary
            .iter()
            .take_while(|threshold| kills >= **threshold)
            .count() as u32
    }

    pub fn total_level(&self, env: &Env<'_>) -> u32 {
        self.kills
            .keys()
            .map(|enemy_id| self.enemy_level(enemy_id, env))
            .sum()
    }

    /// Combat XP owed for milestones reached since the last claim.
    ///
    /// Every `xp_milestone_every` total levels pays `xp_milestone_amount`.
    pub fn claim_milestones(&mut self, env: &Env<'_>) -> u64 {
        let rules = &env.config().beastiary;
        if rules.xp_milestone_every == 0 {
            return 0;
        }
        let earned = self.total_level(env) / rules.xp_milestone_every;
        if earned <= self.milestones_awarded {
            return 0;
        }
        let gained = (earned - self.milestones_awarded) as u64 * rules.xp_milestone_amount;
        self.milestones_awarded = earned;
        gained
    }
}
