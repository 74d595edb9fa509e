//! Item, enemy, resource and zone catalog loaders.

use std::collections::BTreeMap;
use std::path::Path;

use grindstone_core::{EnemyTemplate, ItemDefinition, ResourceTemplate, ZoneDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: BTreeMap<String, ItemDefinition>,
}

/// Loader for the item catalog.
pub struct ItemLoader;

impl ItemLoader {
    /// Load the item catalog from a RON file, keyed by item id.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, ItemDefinition>> {
        let catalog: ItemCatalog = read_ron(path, "item catalog")?;
        Ok(catalog.items)
    }
}

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: BTreeMap<String, EnemyTemplate>,
}

/// Loader for enemy templates.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load enemy templates from a RON file.
    ///
    /// Templates with a non-positive weight or hp are rejected: weight
    /// divides knockback and hp bounds every hit.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, EnemyTemplate>> {
        let catalog: EnemyCatalog = read_ron(path, "enemy catalog")?;
        for (id, template) in &catalog.enemies {
            if template.weight <= 0.0 {
                anyhow::bail!("Enemy '{}' has non-positive weight {}", id, template.weight);
            }
            if template.hp <= 0.0 {
                anyhow::bail!("Enemy '{}' has non-positive hp {}", id, template.hp);
            }
        }
        Ok(catalog.enemies)
    }
}

/// Resource node catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCatalog {
    pub resources: BTreeMap<String, ResourceTemplate>,
}

/// Loader for resource node templates.
pub struct ResourceLoader;

impl ResourceLoader {
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, ResourceTemplate>> {
        let catalog: ResourceCatalog = read_ron(path, "resource catalog")?;
        for (id, template) in &catalog.resources {
            if template.hp <= 0.0 {
                anyhow::bail!("Resource '{}' has non-positive hp {}", id, template.hp);
            }
        }
        Ok(catalog.resources)
    }
}

/// Loader for zone layouts, one RON file per zone.
pub struct ZoneLoader;

impl ZoneLoader {
    /// Load a single zone definition.
    pub fn load(path: &Path) -> LoadResult<ZoneDefinition> {
        read_ron(path, "zone")
    }

    /// Load every `*.ron` file in `dir`, keyed by file stem.
    ///
    /// Files are read in name order so error reports are stable.
    pub fn load_dir(dir: &Path) -> LoadResult<BTreeMap<String, ZoneDefinition>> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read zone directory {}: {}", dir.display(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut zones = BTreeMap::new();
        for path in paths {
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping zone file with non-UTF-8 name");
                continue;
            };
            zones.insert(id.to_string(), Self::load(&path)?);
        }
        Ok(zones)
    }
}
