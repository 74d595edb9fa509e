//! Ability effect registry.
//!
//! Every effect is a unit handler implementing [`AbilityEffect`] for exactly
//! one [`Phase`]. Handlers only override the hook for their phase; the other
//! hooks default to doing nothing, so dispatching a context to a handler of
//! the wrong phase is harmless.
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::env::EnemyKind;
use crate::stats::StatKind;
use crate::zone::{EffectHook, HookKind};

use super::{AttackContext, Combatant, DamageReason, HitReceivedContext, PeriodicContext, Phase};

/// Closed set of ability effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectId {
    Sharpness,
    CritBoost,
    FirstHitBonus,
    Lifesteal,
    SpeedOnKill,
    Thorns,
    BoneThorns,
    SlimeShield,
    SlimeRegen,
    ChainLightning,
    PhoenixAura,
    Cleave,
}

impl EffectId {
    pub fn phase(self) -> Phase {
        handler(self).phase()
    }
}

/// An effect granted by current equipment: `{id, tier, source label}`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveEffect {
    pub id: EffectId,
    pub tier: u32,
    pub source: String,
}

impl ActiveEffect {
    pub fn new(id: EffectId, tier: u32, source: impl Into<String>) -> Self {
        Self {
            id,
            tier,
            source: source.into(),
        }
    }
}

pub trait AbilityEffect: Sync {
    fn phase(&self) -> Phase;

    fn apply_attack(&self, _ctx: &mut AttackContext<'_>, _level: u32) {}

    fn apply_hit_received(&self, _ctx: &mut HitReceivedContext<'_>, _level: u32) {}

    /// Returns true when the effect fired and its tick time should advance.
    fn apply_periodic(&self, _ctx: &mut PeriodicContext<'_, '_>, _level: u32) -> bool {
        false
    }
}

pub fn handler(id: EffectId) -> &'static dyn AbilityEffect {
    match id {
        EffectId::Sharpness => &Sharpness,
        EffectId::CritBoost => &CritBoost,
        EffectId::FirstHitBonus => &FirstHitBonus,
        EffectId::Lifesteal => &Lifesteal,
        EffectId::SpeedOnKill => &SpeedOnKill,
        EffectId::Thorns => &Thorns,
        EffectId::BoneThorns => &BoneThorns,
        EffectId::SlimeShield => &SlimeShield,
        EffectId::SlimeRegen => &SlimeRegen,
        EffectId::ChainLightning => &ChainLightning,
        EffectId::PhoenixAura => &PhoenixAura,
        EffectId::Cleave => &Cleave,
    }
}

/// Run every attacker-side effect registered for `phase`, in list order.
pub fn apply_combat_phase(effects: &[ActiveEffect], phase: Phase, ctx: &mut AttackContext<'_>) {
    for effect in effects.iter().filter(|effect| effect.id.phase() == phase) {
        handler(effect.id).apply_attack(ctx, effect.tier);
    }
}

pub(crate) fn apply_hit_received(effects: &[ActiveEffect], ctx: &mut HitReceivedContext<'_>) {
    for effect in effects
        .iter()
        .filter(|effect| effect.id.phase() == Phase::OnHitReceived)
    {
        handler(effect.id).apply_hit_received(ctx, effect.tier);
    }
}

/// Slime shield only blocks regular mobs whose template id starts with
/// `slime`. Bosses and any other naming never qualify.
pub fn is_slime_family(attacker: &Combatant) -> bool {
    match attacker {
        Combatant::Enemy { template, kind, .. } => {
            *kind == EnemyKind::Mob && template.starts_with("slime")
        }
        Combatant::Player => false,
    }
}

struct Sharpness;

impl AbilityEffect for Sharpness {
    fn phase(&self) -> Phase {
        Phase::PreDamage
    }

    fn apply_attack(&self, ctx: &mut AttackContext<'_>, level: u32) {
        ctx.base_damage += ctx.values().sharpness_per_level * level as f64;
    }
}

struct CritBoost;

impl AbilityEffect for CritBoost {
    fn phase(&self) -> Phase {
        Phase::PreCrit
    }

    fn apply_attack(&self, ctx: &mut AttackContext<'_>, level: u32) {
        ctx.crit_chance += ctx.values().crit_boost_per_level * level as f64;
    }
}

struct FirstHitBonus;

impl AbilityEffect for FirstHitBonus {
    fn phase(&self) -> Phase {
        Phase::PostCrit
    }

    fn apply_attack(&self, ctx: &mut AttackContext<'_>, level: u32) {
        if !ctx.is_first_hit {
            return;
        }
        let values = ctx.values();
        let multiplier =
            values.first_hit_base + values.first_hit_per_level * (level as f64 - 1.0);
        ctx.damage *= multiplier;
    }
}

struct Lifesteal;

impl AbilityEffect for Lifesteal {
    fn phase(&self) -> Phase {
        Phase::PostDamage
    }

    fn apply_attack(&self, ctx: &mut AttackContext<'_>, level: u32) {
        let values = ctx.values();
        let drained = (ctx.target.max_hp * values.lifesteal_per_level * level as f64).trunc();
        let cap = (ctx.attacker.combat.max_hp() * values.lifesteal_cap).trunc();
        ctx.attacker.combat.heal(drained.min(cap));
    }
}

struct SpeedOnKill;

impl AbilityEffect for SpeedOnKill {
    fn phase(&self) -> Phase {
        Phase::OnKill
    }

    fn apply_attack(&self, ctx: &mut AttackContext<'_>, level: u32) {
        let values = ctx.values();
        let now = ctx.now();
        ctx.attacker.temp.add(
            StatKind::Speed,
            values.speed_on_kill_per_level * level as f64,
            now,
            values.speed_on_kill_duration_ms,
        );
    }
}

struct Thorns;

impl AbilityEffect for Thorns {
    fn phase(&self) -> Phase {
        Phase::OnHitReceived
    }

    fn apply_hit_received(&self, ctx: &mut HitReceivedContext<'_>, level: u32) {
        let amount = (ctx.incoming_damage * ctx.values.thorns_per_level * level as f64).trunc();
        ctx.reflect(amount, EffectId::Thorns);
    }
}

struct BoneThorns;

impl AbilityEffect for BoneThorns {
    fn phase(&self) -> Phase {
        Phase::OnHitReceived
    }

    fn apply_hit_received(&self, ctx: &mut HitReceivedContext<'_>, _level: u32) {
        let amount = (ctx.incoming_damage * ctx.values.bone_thorns_percent).trunc();
        ctx.reflect(amount, EffectId::BoneThorns);
    }
}

struct SlimeShield;

impl AbilityEffect for SlimeShield {
    fn phase(&self) -> Phase {
        Phase::OnHitReceived
    }

    fn apply_hit_received(&self, ctx: &mut HitReceivedContext<'_>, _level: u32) {
        if !ctx.attacker.is_some_and(is_slime_family) {
            return;
        }
        ctx.incoming_damage *= 1.0 - ctx.values.slime_shield_percent / 100.0;
    }
}

struct SlimeRegen;

impl AbilityEffect for SlimeRegen {
    fn phase(&self) -> Phase {
        Phase::Periodic
    }

    fn apply_periodic(&self, ctx: &mut PeriodicContext<'_, '_>, _level: u32) -> bool {
        if ctx.elapsed() < ctx.values.slime_regen_interval_ms {
            return false;
        }
        let amount = (ctx.entity.max_hp() * ctx.values.slime_regen_percent).trunc();
        ctx.entity.heal(amount);
        true
    }
}

struct ChainLightning;

impl AbilityEffect for ChainLightning {
    fn phase(&self) -> Phase {
        Phase::PostDamage
    }

    fn apply_attack(&self, ctx: &mut AttackContext<'_>, level: u32) {
        let values = ctx.values();
        let now = ctx.now();
        let base = ctx.damage;
        let mut chained = vec![ctx.target.entity];
        let mut source = ctx.target.center;
        let mut percent = values.chain_lightning_start;

        for _ in 0..level {
            let Some(index) = ctx.area.nearest_living(source, values.chain_lightning_radius, |id| {
                chained.contains(&id)
            }) else {
                break;
            };
            let Some(center) = ctx.area.enemy_center(index) else {
                break;
            };
            let entity = ctx.area.enemies()[index].id;

            let damage = (base * percent).trunc();
            ctx.area
                .hit_enemy(index, damage, DamageReason::Effect(EffectId::ChainLightning));
            ctx.area
                .queue_hook(EffectHook::line(HookKind::ChainLightning, now, source, center));
            tracing::debug!(enemy = %entity, damage, "chain lightning bounce");

            chained.push(entity);
            source = center;
            percent *= values.chain_lightning_falloff;
        }
    }
}

struct PhoenixAura;

impl AbilityEffect for PhoenixAura {
    fn phase(&self) -> Phase {
        Phase::Periodic
    }

    fn apply_periodic(&self, ctx: &mut PeriodicContext<'_, '_>, _level: u32) -> bool {
        let values = ctx.values;
        if ctx.elapsed() < values.phoenix_aura_interval_ms {
            return false;
        }
        let now = ctx.now;
        let center = ctx.center;
        if let Some(area) = ctx.area.as_deref_mut() {
            for index in area.living_within(center, values.phoenix_aura_radius) {
                area.hit_enemy(
                    index,
                    values.phoenix_aura_damage,
                    DamageReason::Effect(EffectId::PhoenixAura),
                );
                if let Some(at) = area.enemy_center(index) {
                    area.queue_hook(EffectHook::point(HookKind::PhoenixAuraHit, now, at));
                }
            }
        }
        true
    }
}

struct Cleave;

impl AbilityEffect for Cleave {
    fn phase(&self) -> Phase {
        Phase::PostDamage
    }

    fn apply_attack(&self, ctx: &mut AttackContext<'_>, level: u32) {
        let final_damage = ctx.damage;
        if final_damage <= 0.0 {
            return;
        }
        let values = ctx.values();
        let now = ctx.now();
        let origin = ctx.target;
        let splash = (final_damage * values.cleave_per_level * level as f64).trunc();

        let mut affected = 0;
        for index in ctx.area.living_within(origin.center, values.cleave_radius) {
            if ctx.area.enemies()[index].id == origin.entity {
                continue;
            }
            ctx.area
                .hit_enemy(index, splash, DamageReason::Effect(EffectId::Cleave));
            if let Some(at) = ctx.area.enemy_center(index) {
                ctx.area
                    .queue_hook(EffectHook::point(HookKind::CleaveHit, now, at));
            }
            affected += 1;
        }

        if affected > 0 {
            ctx.area
                .queue_hook(EffectHook::point(HookKind::Cleave, now, origin.center));
        }
        tracing::debug!(affected, splash, "cleave");
    }
}
