use std::collections::BTreeMap;

use crate::combat::EffectId;
use crate::config::ActionProfile;
use crate::equipment::EquipSlot;
use crate::progression::Skill;
use crate::stats::StatKind;

pub trait ItemOracle: Send + Sync {
    fn item(&self, id: &str) -> Option<&ItemDefinition>;
}

/// Static description of an item type.
///
/// Instances only carry `base_id` plus per-instance metadata; everything that
/// is shared between copies of an item lives here.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemDefinition {
    pub name: String,
    /// Equipment slot, `None` for hotbar-only items and materials.
    pub slot: Option<EquipSlot>,
    /// Equipment set this piece counts toward.
    pub set: Option<String>,
    pub stat_bonuses: BTreeMap<StatKind, f64>,
    /// Present on weapons and tools.
    pub action: Option<ActionProfile>,
    /// Skill trained by the action; `combat` for weapons.
    pub skill: Option<Skill>,
    /// Counter definition tracked in instance metadata.
    pub counter: Option<String>,
    pub extra_ability: Option<EffectId>,
}

impl ItemDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.action.is_some() && matches!(self.skill, None | Some(Skill::Combat))
    }

    pub fn is_tool(&self) -> bool {
        self.action.is_some() && !self.is_weapon()
    }
}
