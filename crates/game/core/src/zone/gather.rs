//! Tool swings against resource nodes.
use crate::actor::Player;
use crate::env::Env;
use crate::equipment::ActionItem;
use crate::progression::Skill;
use crate::state::EntityId;

use super::Zone;

/// Deferred rewards from one tool swing, consumed by the flush.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GatherResult {
    pub node: EntityId,
    pub template_id: String,
    pub skill: Skill,
    pub xp: u64,
    pub drops: Vec<(String, u32)>,
    pub depleted: bool,
}

/// Immediate summary of a tool swing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GatherReport {
    pub node: EntityId,
    /// Hp removed from the node.
    pub applied: f64,
    pub xp: u64,
    pub depleted: bool,
}

impl Zone {
    /// Swing `item` at node `node_id`.
    ///
    /// The node must match the tool's skill, still have hp, and require no
    /// more than the player's level in that skill. Rewards scale with the
    /// share of the node's hp removed; drops also take the configured
    /// partial penalty.
    pub fn gather(
        &mut self,
        player: &Player,
        node_id: EntityId,
        item: &ActionItem,
        env: &Env<'_>,
    ) -> Option<GatherReport> {
        let penalty = env.config().drops.partial_penalty;
        let node = self
            .resource_nodes
            .iter_mut()
            .find(|node| node.id == node_id)?;
        if node.skill != item.skill || node.is_depleted() {
            return None;
        }
        let level = player.skills.level(node.skill);
        if level < node.required_level {
            tracing::debug!(
                node = %node.template_id,
                level,
                required = node.required_level,
                "skill level too low to gather"
            );
            return None;
        }

        let applied = node.mine(item.profile.damage);
        let xp = node.partial_xp(applied);
        let drops = node.roll_partial_drops(applied, penalty, &mut self.rng);
        let depleted = node.is_depleted();

        self.pending_gathers.push_back(GatherResult {
            node: node.id,
            template_id: node.template_id.clone(),
            skill: node.skill,
            xp,
            drops,
            depleted,
        });

        Some(GatherReport {
            node: node_id,
            applied,
            xp,
            depleted,
        })
    }
}
