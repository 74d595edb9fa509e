//! Data-driven content definitions and loaders.
//!
//! This crate turns RON/TOML data files into the static tables and balance
//! configuration consumed by `grindstone-core`:
//! - Item catalog, including weapons, tools, armor and materials (RON)
//! - Enemy templates with drop tables and beastiary thresholds (RON)
//! - Enchantments, equipment sets and item counters (RON)
//! - Resource node templates (RON)
//! - Zone layouts and connections (RON)
//! - Combat configuration (TOML)
//!
//! The stock data set ships under `data/` and is located through
//! [`ContentFactory::bundled`]. Content is read once at startup and never
//! changes while a session runs.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityCatalog, AbilityLoader, Content, ContentFactory, ConfigLoader, EnemyLoader, ItemLoader,
    LoadResult, ResourceLoader, TablesLoader, ZoneLoader,
};
