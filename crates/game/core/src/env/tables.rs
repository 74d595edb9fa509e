//! In-memory oracle implementation backed by ordered maps.
use std::collections::BTreeMap;

use super::{
    CounterDefinition, CounterOracle, EnchantmentDefinition, EnchantmentOracle, EnemyOracle,
    EnemyTemplate, ItemDefinition, ItemOracle, ResourceOracle, ResourceTemplate,
    SetBonusDefinition, SetBonusOracle, ZoneDefinition, ZoneOracle,
};

/// Every static table keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaticTables {
    pub items: BTreeMap<String, ItemDefinition>,
    pub enemies: BTreeMap<String, EnemyTemplate>,
    pub enchantments: BTreeMap<String, EnchantmentDefinition>,
    pub sets: BTreeMap<String, SetBonusDefinition>,
    pub counters: BTreeMap<String, CounterDefinition>,
    pub resources: BTreeMap<String, ResourceTemplate>,
    pub zones: BTreeMap<String, ZoneDefinition>,
}

impl StaticTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> StaticTablesBuilder {
        StaticTablesBuilder::default()
    }
}

impl ItemOracle for StaticTables {
    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }
}

impl EnemyOracle for StaticTables {
    fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.get(id)
    }
}

impl EnchantmentOracle for StaticTables {
    fn enchantment(&self, id: &str) -> Option<&EnchantmentDefinition> {
        self.enchantments.get(id)
    }
}

impl SetBonusOracle for StaticTables {
    fn set_bonus(&self, id: &str) -> Option<&SetBonusDefinition> {
        self.sets.get(id)
    }
}

impl CounterOracle for StaticTables {
    fn counter(&self, id: &str) -> Option<&CounterDefinition> {
        self.counters.get(id)
    }
}

impl ResourceOracle for StaticTables {
    fn resource(&self, id: &str) -> Option<&ResourceTemplate> {
        self.resources.get(id)
    }
}

impl ZoneOracle for StaticTables {
    fn zone(&self, id: &str) -> Option<&ZoneDefinition> {
        self.zones.get(id)
    }

    fn zone_ids(&self) -> Vec<&str> {
        self.zones.keys().map(String::as_str).collect()
    }
}

/// Builder for assembling tables in tests and loaders.
#[derive(Default)]
pub struct StaticTablesBuilder {
    tables: StaticTables,
}

impl StaticTablesBuilder {
    pub fn item(mut self, id: impl Into<String>, item: ItemDefinition) -> Self {
        self.tables.items.insert(id.into(), item);
        self
    }

    pub fn enemy(mut self, id: impl Into<String>, enemy: EnemyTemplate) -> Self {
        self.tables.enemies.insert(id.into(), enemy);
        self
    }

    pub fn enchantment(mut self, id: impl Into<String>, enchantment: EnchantmentDefinition) -> Self {
        self.tables.enchantments.insert(id.into(), enchantment);
        self
    }

    pub fn set(mut self, id: impl Into<String>, set: SetBonusDefinition) -> Self {
        self.tables.sets.insert(id.into(), set);
        self
    }

    pub fn counter(mut self, id: impl Into<String>, counter: CounterDefinition) -> Self {
        self.tables.counters.insert(id.into(), counter);
        self
    }

    pub fn resource(mut self, id: impl Into<String>, resource: ResourceTemplate) -> Self {
        self.tables.resources.insert(id.into(), resource);
        self
    }

    pub fn zone(mut self, id: impl Into<String>, zone: ZoneDefinition) -> Self {
        self.tables.zones.insert(id.into(), zone);
        self
    }

    pub fn build(self) -> StaticTables {
        self.tables
    }
}
