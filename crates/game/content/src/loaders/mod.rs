//! Content loaders for reading game data from files.
//!
//! Every catalog is a RON map from id to definition; the combat config is a
//! TOML document whose missing keys fall back to stock balance.

pub mod abilities;
pub mod catalogs;
pub mod config;
pub mod factory;
pub mod tables;

pub use abilities::{AbilityCatalog, AbilityLoader};
pub use catalogs::{EnemyLoader, ItemLoader, ResourceLoader, ZoneLoader};
pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use tables::TablesLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Read and deserialize a RON file, naming `what` in parse errors.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON {}: {}", what, path.display(), e))
}
