use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Every stat tracked for the player.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatKind {
    Strength,
    MaxHp,
    Defense,
    Speed,
    CritChance,
    CritDamage,
    AttackSpeed,
    /// Hp restored per regeneration tick.
    Vitality,
    MagicFind,
    ToolSpeed,
}

impl StatKind {
    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Dense value per [`StatKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    values: [f64; StatKind::COUNT],
}

impl StatBlock {
    pub const fn zero() -> Self {
        Self {
            values: [0.0; StatKind::COUNT],
        }
    }

    #[inline]
    pub fn get(&self, stat: StatKind) -> f64 {
        self.values[stat.index()]
    }

    #[inline]
    pub fn set(&mut self, stat: StatKind, value: f64) {
        self.values[stat.index()] = value;
    }

    #[inline]
    pub fn add(&mut self, stat: StatKind, amount: f64) {
        self.values[stat.index()] += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        StatKind::iter().map(|stat| (stat, self.get(stat)))
    }
}
