use std::collections::BTreeMap;
use std::fmt;

use crate::env::EnemyKind;
use crate::progression::Skill;
use crate::state::EntityId;

use super::EffectId;

/// Who dealt or received a hit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Combatant {
    Player,
    Enemy {
        entity: EntityId,
        template: String,
        kind: EnemyKind,
    },
}

impl Combatant {
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Player => EntityId::PLAYER,
            Self::Enemy { entity, .. } => *entity,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player)
    }
}

/// What caused a damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageReason {
    Weapon,
    Contact,
    Effect(EffectId),
}

impl fmt::Display for DamageReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon => f.write_str("weapon"),
            Self::Contact => f.write_str("contact"),
            Self::Effect(effect) => write!(f, "{effect}"),
        }
    }
}

/// Immutable record of one damage application, consumed by the zone flush.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    target: Combatant,
    attacker: Option<Combatant>,
    final_damage: i64,
    final_hit: bool,
    final_xp: BTreeMap<Skill, u64>,
    reason: DamageReason,
}

impl CombatResult {
    pub(crate) fn new(
        target: Combatant,
        attacker: Option<Combatant>,
        final_damage: i64,
        final_hit: bool,
        reward_xp: Option<u64>,
        reason: DamageReason,
    ) -> Self {
        let mut final_xp = BTreeMap::new();
        if let (true, Some(xp)) = (final_hit, reward_xp) {
            final_xp.insert(Skill::Combat, xp);
        }
        Self {
            target,
            attacker,
            final_damage,
            final_hit,
            final_xp,
            reason,
        }
    }

    pub fn target(&self) -> &Combatant {
        &self.target
    }

    pub fn attacker(&self) -> Option<&Combatant> {
        self.attacker.as_ref()
    }

    pub fn final_damage(&self) -> i64 {
        self.final_damage
    }

    /// True iff the target's hp reached zero or below.
    pub fn final_hit(&self) -> bool {
        self.final_hit
    }

    /// Populated only on the final hit.
    pub fn final_xp(&self) -> &BTreeMap<Skill, u64> {
        &self.final_xp
    }

    pub fn reason(&self) -> DamageReason {
        self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xp_only_on_final_hit() {
        let alive = CombatResult::new(Combatant::Player, None, 5, false, Some(10), DamageReason::Weapon);
        assert!(alive.final_xp().is_empty());

        let dead = CombatResult::new(Combatant::Player, None, 5, true, Some(10), DamageReason::Weapon);
        assert_eq!(dead.final_xp().get(&Skill::Combat), Some(&10));
    }

    #[test]
    fn reason_names() {
        assert_eq!(DamageReason::Weapon.to_string(), "weapon");
        assert_eq!(
            DamageReason::Effect(EffectId::ChainLightning).to_string(),
            "chain_lightning"
        );
    }
}
