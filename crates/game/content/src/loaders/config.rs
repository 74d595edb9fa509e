//! Combat configuration loader.

use std::path::Path;

use grindstone_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys the file leaves out keep their stock values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        let config: CombatConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))?;

        if config.defense_curve <= 0.0 {
            anyhow::bail!("defense_curve must be positive, got {}", config.defense_curve);
        }
        if !(0.0..1.0).contains(&config.max_damage_reduction) {
            anyhow::bail!(
                "max_damage_reduction must be in [0, 1), got {}",
                config.max_damage_reduction
            );
        }

        Ok(config)
    }

    /// Like [`ConfigLoader::load`], but a missing file yields the stock config.
    pub fn load_or_default(path: &Path) -> LoadResult<CombatConfig> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using stock balance");
            return Ok(CombatConfig::default());
        }
        Self::load(path)
    }
}
