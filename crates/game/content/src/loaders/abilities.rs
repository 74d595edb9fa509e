//! Enchantment, equipment set and item counter loader.

use std::collections::BTreeMap;
use std::path::Path;

use grindstone_core::env::{CounterDefinition, EnchantmentDefinition, SetBonusDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Everything that grants stats or effects on top of an item's base bonuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityCatalog {
    pub enchantments: BTreeMap<String, EnchantmentDefinition>,
    pub sets: BTreeMap<String, SetBonusDefinition>,
    pub counters: BTreeMap<String, CounterDefinition>,
}

/// Loader for `abilities.ron`.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load the ability catalog.
    ///
    /// Set tiers are sorted by ascending piece count. Counters must list
    /// ascending thresholds with one bonus row per threshold.
    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let mut catalog: AbilityCatalog = read_ron(path, "ability catalog")?;

        for set in catalog.sets.values_mut() {
            set.tiers.sort_by_key(|tier| tier.pieces);
        }

        for (id, counter) in &catalog.counters {
            if counter.tiers.windows(2).any(|pair| pair[0] > pair[1]) {
                anyhow::bail!("Counter '{}' thresholds are not ascending", id);
            }
            if counter.tiers.len() != counter.bonuses.len() {
                anyhow::bail!(
                    "Counter '{}' has {} thresholds but {} bonus rows",
                    id,
                    counter.tiers.len(),
                    counter.bonuses.len()
                );
            }
        }

        Ok(catalog)
    }
}
