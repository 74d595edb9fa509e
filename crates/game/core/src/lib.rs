//! Deterministic combat rules for a top-down incremental action RPG.
//!
//! `grindstone-core` owns the combat pipeline: stat aggregation, the
//! per-entity combat state, the phased ability effect registry, and the
//! zone-level result queue that applies rewards and respawns exactly once
//! per frame. It performs no I/O and reads no clock; static data arrives
//! through the oracle traits in [`env`], time through explicit [`Millis`]
//! stamps, and randomness through seeded [`RollStream`]s.
//!
//! The frame driver owns a [`Player`] and a [`Zone`] and calls, in order,
//! [`Zone::update_player`], [`Zone::update`], at most one of
//! [`Zone::process_combat`] or [`Zone::gather`], then
//! [`Zone::flush_combat_results`].
pub mod actor;
pub mod ai;
pub mod combat;
pub mod config;
pub mod env;
pub mod equipment;
pub mod error;
pub mod progression;
pub mod state;
pub mod stats;
pub mod zone;

pub use actor::{Enemy, Player, ResourceNode};
pub use ai::{Brain, MovementArchetype, MoveState};
pub use combat::{
    ActiveEffect, AttackReport, CombatEntity, CombatResult, Combatant, DamageReason, EffectId,
    HitFlags, Phase,
};
pub use config::{AbilityValues, ActionProfile, CombatConfig};
pub use env::{
    EnemyKind, EnemyTemplate, Env, ItemDefinition, ResourceTemplate, RollStream, StaticTables,
    ZoneDefinition,
};
pub use equipment::{ActionItem, Cooldowns, EquipSlot, ItemInstance, Loadout};
pub use error::{CombatError, ErrorContext, ErrorSeverity, GameError};
pub use progression::{Beastiary, NullRewards, RewardSink, Skill, SkillBook, XpTable};
pub use state::{Body, EntityId, Frame, Millis, Vec2};
pub use stats::{StatKind, StatSheet, damage_reduction};
pub use zone::{FlushReport, GatherReport, TargetRef, Targeting, Zone};
