use strum::{Display, IntoStaticStr};

use super::StatKind;

/// Where a stat contribution came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceCategory {
    /// Skill levels and beastiary progress.
    Character,
    Gear,
    GearEnchant,
    Active,
    ActiveEnchant,
    Counter,
    Set,
    Temp,
}

/// One `(category, label, amount)` contribution to a stat total.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSource {
    pub stat: StatKind,
    pub category: SourceCategory,
    pub label: String,
    pub amount: f64,
}

impl StatSource {
    pub fn new(stat: StatKind, category: SourceCategory, label: impl Into<String>, amount: f64) -> Self {
        Self {
            stat,
            category,
            label: label.into(),
            amount,
        }
    }
}
