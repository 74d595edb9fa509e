use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString};

/// Armor slots, iterated in declaration order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipSlot {
    Head,
    Body,
    Hands,
    Legs,
    Feet,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnchantmentRoll {
    pub id: String,
    pub level: u32,
}

impl EnchantmentRoll {
    pub fn new(id: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            level,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCounters {
    pub kills: u64,
    pub xp: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemMetadata {
    pub enchantments: Vec<EnchantmentRoll>,
    pub counters: ItemCounters,
}

/// One concrete copy of an item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub base_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub metadata: ItemMetadata,
}

impl ItemInstance {
    pub fn new(base_id: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            metadata: ItemMetadata::default(),
        }
    }

    pub fn with_enchantment(mut self, id: impl Into<String>, level: u32) -> Self {
        self.metadata.enchantments.push(EnchantmentRoll::new(id, level));
        self
    }
}

/// Equipped armor plus the active hotbar item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Loadout {
    slots: BTreeMap<EquipSlot, ItemInstance>,
    active: Option<ItemInstance>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `item` in `slot`, returning whatever was there.
    pub fn equip(&mut self, slot: EquipSlot, item: ItemInstance) -> Option<ItemInstance> {
        self.slots.insert(slot, item)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<ItemInstance> {
        self.slots.remove(&slot)
    }

    pub fn slot(&self, slot: EquipSlot) -> Option<&ItemInstance> {
        self.slots.get(&slot)
    }

    /// Equipped items in slot order.
    pub fn equipped(&self) -> impl Iterator<Item = (EquipSlot, &ItemInstance)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn set_active(&mut self, item: Option<ItemInstance>) -> Option<ItemInstance> {
        std::mem::replace(&mut self.active, item)
    }

    pub fn active(&self) -> Option<&ItemInstance> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ItemInstance> {
        self.active.as_mut()
    }
}
