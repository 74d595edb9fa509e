//! Combat state and the phased effect pipeline.
//!
//! [`CombatEntity`] owns hp, regeneration, knockback and the active effect
//! list for one combatant. Effects are closed [`EffectId`] variants, each
//! bound to exactly one [`Phase`]; the zone resolver walks the attacker-side
//! phases in a fixed order and the entity runs the receiver-side and
//! periodic phases itself.
//!
//! Damage never reaches rewards directly. Every application produces one
//! immutable [`CombatResult`] which the zone queues and flushes at the end of
//! the frame.
mod context;
mod damage;
mod effects;
mod entity;
mod phase;
mod result;

pub use context::{
    AreaScope, AttackContext, AttackerView, HitReceivedContext, PeriodicContext, TargetInfo,
};
pub use damage::{AttackReport, DamageRoll, HitFlags, calculate_damage, knockback_toward};
pub use effects::{
    AbilityEffect, ActiveEffect, EffectId, apply_combat_phase, handler, is_slime_family,
};
pub use entity::{CombatEntity, DamageOutcome, IncomingHit, Reflection};
pub use phase::Phase;
pub use result::{CombatResult, Combatant, DamageReason};
