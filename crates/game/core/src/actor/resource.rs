use crate::env::{DropEntry, ResourceTemplate, RollStream};
use crate::progression::Skill;
use crate::state::{Body, EntityId, Vec2};

/// A gatherable node. Each tool swing removes hp and pays out a share of the
/// node's rewards proportional to the hp removed.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceNode {
    pub id: EntityId,
    pub template_id: String,
    pub name: String,
    pub skill: Skill,
    pub body: Body,
    pub hp: f64,
    pub max_hp: f64,
    pub reward_xp: u64,
    pub required_level: u32,
    pub drop_table: Vec<DropEntry>,
}

impl ResourceNode {
    pub fn spawn(id: EntityId, template_id: &str, template: &ResourceTemplate, pos: Vec2) -> Self {
        Self {
            id,
            template_id: template_id.to_string(),
            name: template.name.clone(),
            skill: template.skill,
            body: Body::new(pos, template.size),
            hp: template.hp,
            max_hp: template.hp,
            reward_xp: template.reward_xp,
            required_level: template.required_level,
            drop_table: template.drop_table.clone(),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn is_depleted(&self) -> bool {
        self.hp <= 0.0
    }

    /// Remove up to `damage` hp and return how much was actually removed.
    pub fn mine(&mut self, damage: f64) -> f64 {
        let applied = damage.max(0.0).min(self.hp.max(0.0));
        self.hp -= applied;
        applied
    }

    fn fraction(&self, applied: f64) -> f64 {
        if self.max_hp <= 0.0 {
            return 1.0;
        }
        applied / self.max_hp
    }

    pub fn partial_xp(&self, applied: f64) -> u64 {
        (self.reward_xp as f64 * self.fraction(applied)).trunc() as u64
    }

    /// Roll each drop at `chance * fraction * penalty`.
    pub fn roll_partial_drops(&self, applied: f64, penalty: f64, rng: &mut RollStream) -> Vec<(String, u32)> {
        let fraction = self.fraction(applied);
        let mut drops = Vec::new();
        for entry in &self.drop_table {
            let chance = entry.chance * fraction * penalty;
            if rng.next_f64() <= chance {
                let quantity = rng.range_inclusive(entry.quantity.0, entry.quantity.1);
                drops.push((entry.item.clone(), quantity));
            }
        }
        drops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oak() -> ResourceNode {
        let template = ResourceTemplate {
            name: "Oak Tree".into(),
            skill: Skill::Woodcutting,
            hp: 4.0,
            reward_xp: 30,
            drop_table: vec![DropEntry::new("oak_log", 1.0, (1, 1))],
            ..ResourceTemplate::default()
        };
        ResourceNode::spawn(EntityId(9), "oak_tree", &template, Vec2::ZERO)
    }

    #[test]
    fn partial_xp_sums_below_full_reward() {
        let mut node = oak();
        let mut total = 0;
        while !node.is_depleted() {
            let applied = node.mine(1.0);
            total += node.partial_xp(applied);
        }
        // 4 swings of trunc(30 * 0.25)
        assert_eq!(total, 28);
    }

    #[test]
    fn overkill_is_capped_at_remaining_hp() {
        let mut node = oak();
        node.mine(3.0);
        assert_eq!(node.mine(5.0), 1.0);
        assert!(node.is_depleted());
    }

    #[test]
    fn full_fraction_certain_drop_always_rolls() {
        let node = oak();
        let mut rng = RollStream::new(1);
        // chance 1.0 at full fraction always passes
        let drops = node.roll_partial_drops(4.0, 1.0, &mut rng);
        assert_eq!(drops, vec![("oak_log".to_string(), 1)]);
    }
}
