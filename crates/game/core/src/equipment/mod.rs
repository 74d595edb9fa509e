//! Equipped gear, the active hotbar item, and weapon/tool cooldowns.
mod action_item;
mod loadout;

pub use action_item::{ActionItem, Cooldowns};
pub use loadout::{EnchantmentRoll, EquipSlot, ItemCounters, ItemInstance, ItemMetadata, Loadout};
