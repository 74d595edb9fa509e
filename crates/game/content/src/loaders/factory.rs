//! Content factory for building static tables from data files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use grindstone_core::{
    CombatConfig, EnemyTemplate, Env, ItemDefinition, ResourceTemplate, StaticTables,
    ZoneDefinition,
};

use crate::loaders::{
    AbilityCatalog, AbilityLoader, ConfigLoader, EnemyLoader, ItemLoader, LoadResult,
    ResourceLoader, TablesLoader, ZoneLoader,
};

/// Fully loaded, validated content.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub tables: StaticTables,
    pub config: CombatConfig,
}

impl Content {
    /// Borrow the content as the core's oracle bundle.
    pub fn env(&self) -> Env<'_> {
        Env::from_tables(&self.tables, &self.config)
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── enemies.ron
/// ├── abilities.ron
/// ├── resources.ron
/// └── zones/
///     ├── starter_zone.ron
///     └── graveyard.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory for the data set shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load combat configuration from `config.toml`, falling back to stock
    /// balance when the file is absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load_or_default(&self.data_dir.join("config.toml"))
    }

    pub fn load_items(&self) -> LoadResult<BTreeMap<String, ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    pub fn load_enemies(&self) -> LoadResult<BTreeMap<String, EnemyTemplate>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    pub fn load_resources(&self) -> LoadResult<BTreeMap<String, ResourceTemplate>> {
        ResourceLoader::load(&self.data_dir.join("resources.ron"))
    }

    /// Load a zone from `zones/{zone_id}.ron`.
    pub fn load_zone(&self, zone_id: &str) -> LoadResult<ZoneDefinition> {
        ZoneLoader::load(&self.data_dir.join("zones").join(format!("{}.ron", zone_id)))
    }

    /// Load every catalog and cross-check the result.
    pub fn load_tables(&self) -> LoadResult<StaticTables> {
        TablesLoader::assemble(
            self.load_items()?,
            self.load_enemies()?,
            self.load_abilities()?,
            self.load_resources()?,
            ZoneLoader::load_dir(&self.data_dir.join("zones"))?,
        )
    }

    /// Load tables and config together.
    pub fn load(&self) -> LoadResult<Content> {
        let tables = self.load_tables()?;
        let config = self.load_config()?;
        tracing::info!(
            dir = %self.data_dir.display(),
            items = tables.items.len(),
            enemies = tables.enemies.len(),
            zones = tables.zones.len(),
            "content loaded"
        );
        Ok(Content { tables, config })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
