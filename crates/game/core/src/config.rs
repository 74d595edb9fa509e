//! Balance constants and tunable parameters.
//!
//! Every field carries a default equal to the stock balance, so a partial
//! TOML file only needs to name the values it overrides.
use std::collections::BTreeMap;

use crate::progression::Skill;
use crate::stats::{StatBlock, StatKind};

/// Reach, cooldown and impact of a weapon or tool swing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionProfile {
    /// Distance from the player center to the targeting point.
    pub radius: f64,
    /// Base cooldown before attack-speed scaling.
    pub delay_ms: u64,
    pub damage: f64,
    #[cfg_attr(feature = "serde", serde(default = "ActionProfile::default_knockback"))]
    pub knockback: f64,
}

impl ActionProfile {
    pub const DEFAULT_KNOCKBACK: f64 = 300.0;

    #[cfg(feature = "serde")]
    fn default_knockback() -> f64 {
        Self::DEFAULT_KNOCKBACK
    }

    /// Bare-handed attack used when no item is active.
    pub const fn fist() -> Self {
        Self {
            radius: 40.0,
            delay_ms: 800,
            damage: 5.0,
            knockback: Self::DEFAULT_KNOCKBACK,
        }
    }
}

/// Per-level stat bonus granted by a skill.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelBonus {
    pub skill: Skill,
    pub stat: StatKind,
    pub per_level: f64,
}

/// Beastiary milestone rewards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BeastiaryBonuses {
    /// Max hp gained per total beastiary level.
    pub max_hp_per_level: f64,
    /// Total beastiary levels between combat XP awards.
    pub xp_milestone_every: u32,
    pub xp_milestone_amount: u64,
    /// Bonus per beastiary level of the enemy being fought.
    pub per_enemy_level: BTreeMap<StatKind, f64>,
}

impl Default for BeastiaryBonuses {
    fn default() -> Self {
        Self {
            max_hp_per_level: 1.0,
            xp_milestone_every: 5,
            xp_milestone_amount: 1000,
            per_enemy_level: BTreeMap::from([(StatKind::Strength, 1.0), (StatKind::MagicFind, 1.0)]),
        }
    }
}

/// Enemy melee contact rules.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContactRules {
    pub radius: f64,
    pub cooldown_ms: u64,
    pub knockback: f64,
}

impl Default for ContactRules {
    fn default() -> Self {
        Self {
            radius: 25.0,
            cooldown_ms: 1000,
            knockback: 300.0,
        }
    }
}

/// Player locomotion and footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerRules {
    pub size: f64,
    pub base_speed: f64,
    pub min_speed_multiplier: f64,
    pub max_speed_multiplier: f64,
}

impl Default for PlayerRules {
    fn default() -> Self {
        Self {
            size: 30.0,
            base_speed: 150.0,
            min_speed_multiplier: 0.1,
            max_speed_multiplier: 3.0,
        }
    }
}

/// Drop-rate rules.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DropRules {
    /// Drops rarer than this are boosted by magic find, up to this value.
    pub magic_find_cap: f64,
    /// Chance multiplier applied to partial resource-node drops.
    pub partial_penalty: f64,
}

impl Default for DropRules {
    fn default() -> Self {
        Self {
            magic_find_cap: 0.05,
            partial_penalty: 0.75,
        }
    }
}

/// Numeric values consumed by the ability effect handlers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityValues {
    pub sharpness_per_level: f64,
    pub crit_boost_per_level: f64,
    pub first_hit_base: f64,
    pub first_hit_per_level: f64,
    pub lifesteal_per_level: f64,
    pub lifesteal_cap: f64,
    pub speed_on_kill_per_level: f64,
    pub speed_on_kill_duration_ms: u64,
    pub thorns_per_level: f64,
    pub bone_thorns_percent: f64,
    pub slime_shield_percent: f64,
    pub slime_regen_interval_ms: u64,
    pub slime_regen_percent: f64,
    pub phoenix_aura_interval_ms: u64,
    pub phoenix_aura_damage: f64,
    pub phoenix_aura_radius: f64,
    pub chain_lightning_radius: f64,
    pub chain_lightning_start: f64,
    pub chain_lightning_falloff: f64,
    pub cleave_radius: f64,
    pub cleave_per_level: f64,
}

impl Default for AbilityValues {
    fn default() -> Self {
        Self {
            sharpness_per_level: 5.0,
            crit_boost_per_level: 5.0,
            first_hit_base: 1.5,
            first_hit_per_level: 0.1,
            lifesteal_per_level: 0.05,
            lifesteal_cap: 0.10,
            speed_on_kill_per_level: 10.0,
            speed_on_kill_duration_ms: 3000,
            thorns_per_level: 0.1,
            bone_thorns_percent: 0.05,
            slime_shield_percent: 50.0,
            slime_regen_interval_ms: 2000,
            slime_regen_percent: 0.02,
            phoenix_aura_interval_ms: 100,
            phoenix_aura_damage: 10.0,
            phoenix_aura_radius: 100.0,
            chain_lightning_radius: 200.0,
            chain_lightning_start: 0.5,
            chain_lightning_falloff: 0.8,
            cleave_radius: 100.0,
            cleave_per_level: 0.15,
        }
    }
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Exponential decay coefficient for knockback velocity.
    pub knockback_friction: f64,
    /// Defense value at which damage reduction reaches 50%.
    pub defense_curve: f64,
    pub max_damage_reduction: f64,
    /// Passive regeneration cadence for every combat entity.
    pub regen_interval_ms: u64,
    pub base_stats: BTreeMap<StatKind, f64>,
    pub level_bonuses: Vec<LevelBonus>,
    pub beastiary: BeastiaryBonuses,
    pub fist: ActionProfile,
    pub contact: ContactRules,
    pub player: PlayerRules,
    pub drops: DropRules,
    pub abilities: AbilityValues,
}

impl CombatConfig {
    // ===== stock balance =====
    pub const KNOCKBACK_FRICTION: f64 = 5.0;
    pub const DEFENSE_CURVE: f64 = 250.0;
    pub const MAX_DAMAGE_REDUCTION: f64 = 0.99;
    pub const REGEN_INTERVAL_MS: u64 = 1000;

    pub fn new() -> Self {
        Self {
            knockback_friction: Self::KNOCKBACK_FRICTION,
            defense_curve: Self::DEFENSE_CURVE,
            max_damage_reduction: Self::MAX_DAMAGE_REDUCTION,
            regen_interval_ms: Self::REGEN_INTERVAL_MS,
            base_stats: Self::default_base_stats(),
            level_bonuses: Self::default_level_bonuses(),
            beastiary: BeastiaryBonuses::default(),
            fist: ActionProfile::fist(),
            contact: ContactRules::default(),
            player: PlayerRules::default(),
            drops: DropRules::default(),
            abilities: AbilityValues::default(),
        }
    }

    pub fn default_base_stats() -> BTreeMap<StatKind, f64> {
        BTreeMap::from([
            (StatKind::Strength, 0.0),
            (StatKind::MaxHp, 100.0),
            (StatKind::Defense, 0.0),
            (StatKind::Speed, 0.0),
            (StatKind::CritChance, 25.0),
            (StatKind::CritDamage, 50.0),
            (StatKind::AttackSpeed, 0.0),
            (StatKind::Vitality, 1.0),
            (StatKind::MagicFind, 0.0),
            (StatKind::ToolSpeed, 0.0),
        ])
    }

    pub fn default_level_bonuses() -> Vec<LevelBonus> {
        vec![
            LevelBonus {
                skill: Skill::Combat,
                stat: StatKind::CritChance,
                per_level: 0.5,
            },
            LevelBonus {
                skill: Skill::Mining,
                stat: StatKind::Defense,
                per_level: 5.0,
            },
            LevelBonus {
                skill: Skill::Woodcutting,
                stat: StatKind::Strength,
                per_level: 1.0,
            },
        ]
    }

    /// Player base stats as a dense block; stats absent from the table are zero.
    pub fn base_stat_block(&self) -> StatBlock {
        let mut block = StatBlock::zero();
        for (stat, value) in &self.base_stats {
            block.add(*stat, *value);
        }
        block
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
