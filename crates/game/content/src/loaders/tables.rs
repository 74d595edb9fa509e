//! Assembles the loaded catalogs into [`StaticTables`] and checks that
//! every cross-reference resolves.

use std::collections::BTreeMap;

use grindstone_core::env::DropEntry;
use grindstone_core::{
    EnemyTemplate, ItemDefinition, ResourceTemplate, StaticTables, ZoneDefinition,
};

use crate::loaders::{AbilityCatalog, LoadResult};

/// Builds and validates the combined static tables.
pub struct TablesLoader;

impl TablesLoader {
    /// Combine the individual catalogs.
    ///
    /// Dangling references that would make a zone unplayable (spawn tables,
    /// connections, set and counter ids) are errors. Drop entries naming an
    /// unknown item only log a warning; the item is still granted by id.
    pub fn assemble(
        items: BTreeMap<String, ItemDefinition>,
        enemies: BTreeMap<String, EnemyTemplate>,
        abilities: AbilityCatalog,
        resources: BTreeMap<String, ResourceTemplate>,
        zones: BTreeMap<String, ZoneDefinition>,
    ) -> LoadResult<StaticTables> {
        let tables = StaticTables {
            items,
            enemies,
            enchantments: abilities.enchantments,
            sets: abilities.sets,
            counters: abilities.counters,
            resources,
            zones,
        };
        Self::validate(&tables)?;
        Ok(tables)
    }

    /// Check cross-references between tables.
    pub fn validate(tables: &StaticTables) -> LoadResult<()> {
        for (id, item) in &tables.items {
            if let Some(set) = &item.set
                && !tables.sets.contains_key(set)
            {
                anyhow::bail!("Item '{}' belongs to unknown set '{}'", id, set);
            }
            if let Some(counter) = &item.counter
                && !tables.counters.contains_key(counter)
            {
                anyhow::bail!("Item '{}' tracks unknown counter '{}'", id, counter);
            }
        }

        for (id, zone) in &tables.zones {
            for (enemy, weight) in &zone.enemy_spawn_table {
                if !tables.enemies.contains_key(enemy) {
                    anyhow::bail!("Zone '{}' spawns unknown enemy '{}'", id, enemy);
                }
                if *weight <= 0.0 {
                    anyhow::bail!("Zone '{}' gives enemy '{}' weight {}", id, enemy, weight);
                }
            }
            for (node, weight) in &zone.resource_spawn_table {
                if !tables.resources.contains_key(node) {
                    anyhow::bail!("Zone '{}' spawns unknown resource '{}'", id, node);
                }
                if *weight <= 0.0 {
                    anyhow::bail!("Zone '{}' gives resource '{}' weight {}", id, node, weight);
                }
            }
            if zone.num_enemies > 0 && zone.enemy_spawn_table.is_empty() {
                anyhow::bail!("Zone '{}' wants {} enemies but has no spawn table", id, zone.num_enemies);
            }
            if zone.num_resources > 0 && zone.resource_spawn_table.is_empty() {
                anyhow::bail!(
                    "Zone '{}' wants {} resources but has no spawn table",
                    id,
                    zone.num_resources
                );
            }
            for (direction, target) in &zone.connections {
                if !tables.zones.contains_key(target) {
                    anyhow::bail!("Zone '{}' connects {} to unknown zone '{}'", id, direction, target);
                }
            }
        }

        let enemy_drops = tables
            .enemies
            .iter()
            .flat_map(|(id, enemy)| enemy.drop_table.iter().map(move |drop| (id, drop)));
        let resource_drops = tables
            .resources
            .iter()
            .flat_map(|(id, node)| node.drop_table.iter().map(move |drop| (id, drop)));
        for (source, drop) in enemy_drops.chain(resource_drops) {
            check_drop(tables, source, drop);
        }

        Ok(())
    }
}

fn check_drop(tables: &StaticTables, source: &str, drop: &DropEntry) {
    if !tables.items.contains_key(&drop.item) {
        tracing::warn!(source, item = %drop.item, "drop table names an unknown item");
    }
    if !(0.0..=1.0).contains(&drop.chance) {
        tracing::warn!(source, item = %drop.item, chance = drop.chance, "drop chance outside [0, 1]");
    }
}
