//! Traits describing read-only game data.
//!
//! Oracles expose item, enemy, enchantment, set, counter, resource and zone
//! definitions. The [`Env`] aggregate bundles them with the [`CombatConfig`]
//! so the combat pipeline can read everything it needs without coupling to a
//! concrete storage. Lookups return `Option`: an unknown id means "no data"
//! and the caller degrades to an empty record.
mod abilities;
mod enemies;
mod items;
mod resources;
mod rng;
mod tables;
mod zones;

use std::fmt;

pub use abilities::{
    CounterDefinition, CounterKind, CounterOracle, EnchantmentDefinition, EnchantmentOracle,
    SetBonusDefinition, SetBonusOracle, SetTier,
};
pub use enemies::{DropEntry, EnemyKind, EnemyOracle, EnemySounds, EnemyTemplate, Rarity};
pub use items::{ItemDefinition, ItemOracle};
pub use resources::{ResourceOracle, ResourceTemplate};
pub use rng::{PcgRng, RngOracle, RollStream, compute_seed};
pub use tables::{StaticTables, StaticTablesBuilder};
pub use zones::{Direction, ZoneDefinition, ZoneKind, ZoneOracle};

use crate::config::CombatConfig;

/// Aggregates the read-only oracles and balance configuration.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    items: &'a dyn ItemOracle,
    enemies: &'a dyn EnemyOracle,
    enchantments: &'a dyn EnchantmentOracle,
    sets: &'a dyn SetBonusOracle,
    counters: &'a dyn CounterOracle,
    resources: &'a dyn ResourceOracle,
    zones: &'a dyn ZoneOracle,
    config: &'a CombatConfig,
}

impl<'a> Env<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        items: &'a dyn ItemOracle,
        enemies: &'a dyn EnemyOracle,
        enchantments: &'a dyn EnchantmentOracle,
        sets: &'a dyn SetBonusOracle,
        counters: &'a dyn CounterOracle,
        resources: &'a dyn ResourceOracle,
        zones: &'a dyn ZoneOracle,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            items,
            enemies,
            enchantments,
            sets,
            counters,
            resources,
            zones,
            config,
        }
    }

    /// Environment where every oracle is served by the same table set.
    pub fn from_tables(tables: &'a StaticTables, config: &'a CombatConfig) -> Self {
        Self::new(tables, tables, tables, tables, tables, tables, tables, config)
    }

    pub fn item(&self, id: &str) -> Option<&'a ItemDefinition> {
        self.items.item(id)
    }

    pub fn enemy(&self, id: &str) -> Option<&'a EnemyTemplate> {
        self.enemies.enemy(id)
    }

    pub fn enchantment(&self, id: &str) -> Option<&'a EnchantmentDefinition> {
        self.enchantments.enchantment(id)
    }

    pub fn set_bonus(&self, id: &str) -> Option<&'a SetBonusDefinition> {
        self.sets.set_bonus(id)
    }

    pub fn counter(&self, id: &str) -> Option<&'a CounterDefinition> {
        self.counters.counter(id)
    }

    pub fn resource(&self, id: &str) -> Option<&'a ResourceTemplate> {
        self.resources.resource(id)
    }

    pub fn zone(&self, id: &str) -> Option<&'a ZoneDefinition> {
        self.zones.zone(id)
    }

    pub fn zone_ids(&self) -> Vec<&'a str> {
        self.zones.zone_ids()
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }
}

impl fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
