use strum::{Display, EnumString};

use crate::ai::MovementArchetype;

pub trait EnemyOracle: Send + Sync {
    fn enemy(&self, id: &str) -> Option<&EnemyTemplate>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnemyKind {
    #[default]
    Mob,
    Boss,
}

/// Rarity label carried by drop entries for presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

/// One line of a drop table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropEntry {
    pub item: String,
    /// Probability in `[0, 1]`.
    pub chance: f64,
    /// Inclusive quantity range.
    #[cfg_attr(feature = "serde", serde(default = "DropEntry::single"))]
    pub quantity: (u32, u32),
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: Rarity,
}

impl DropEntry {
    pub fn new(item: impl Into<String>, chance: f64, quantity: (u32, u32)) -> Self {
        Self {
            item: item.into(),
            chance,
            quantity,
            tier: Rarity::Common,
        }
    }

    #[cfg(feature = "serde")]
    fn single() -> (u32, u32) {
        (1, 1)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemySounds {
    pub hit: Option<String>,
}

/// Static description of an enemy type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyTemplate {
    pub name: String,
    pub kind: EnemyKind,
    pub size: f64,
    pub level: u32,
    pub hp: f64,
    /// Contact damage dealt to the player.
    pub damage: f64,
    pub speed: f64,
    /// Knockback divisor, must be positive.
    pub weight: f64,
    pub xp: u64,
    /// Hp regenerated per regeneration tick.
    pub regen: f64,
    pub drop_table: Vec<DropEntry>,
    /// Kill counts required for each beastiary level.
    pub beastiary: Vec<u64>,
    pub movement: MovementArchetype,
    pub sounds: EnemySounds,
}

impl Default for EnemyTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: EnemyKind::Mob,
            size: 20.0,
            level: 1,
            hp: 10.0,
            damage: 0.0,
            speed: 50.0,
            weight: 1.0,
            xp: 0,
            regen: 0.0,
            drop_table: Vec::new(),
            beastiary: Vec::new(),
            movement: MovementArchetype::Wanderer,
            sounds: EnemySounds::default(),
        }
    }
}

impl EnemyTemplate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
