//! Per-attack and per-tick scratch state handed to effect handlers.
//!
//! Contexts live for one resolution pass. They borrow the attacker, the
//! zone's enemy slice and queues, and are dropped before the zone touches its
//! enemy list again.
use std::collections::VecDeque;

use crate::actor::Enemy;
use crate::config::AbilityValues;
use crate::stats::TempBonuses;
use crate::state::{EntityId, Millis, Vec2};
use crate::zone::{EffectHook, EffectHooks};

use super::{CombatEntity, CombatResult, Combatant, DamageReason, Reflection};

/// Mutable view of whoever is attacking.
pub struct AttackerView<'a> {
    pub combat: &'a mut CombatEntity,
    pub temp: &'a mut TempBonuses,
    pub center: Vec2,
}

/// Snapshot of the primary target taken before damage is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetInfo {
    pub entity: EntityId,
    pub center: Vec2,
    pub max_hp: f64,
}

/// Enemies and queues reachable by area effects.
pub struct AreaScope<'a> {
    enemies: &'a mut [Enemy],
    results: &'a mut VecDeque<CombatResult>,
    hooks: &'a mut EffectHooks,
    reflections: Vec<Reflection>,
    now: Millis,
    values: &'a AbilityValues,
}

impl<'a> AreaScope<'a> {
    pub fn new(
        enemies: &'a mut [Enemy],
        results: &'a mut VecDeque<CombatResult>,
        hooks: &'a mut EffectHooks,
        now: Millis,
        values: &'a AbilityValues,
    ) -> Self {
        Self {
            enemies,
            results,
            hooks,
            reflections: Vec::new(),
            now,
            values,
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn values(&self) -> &'a AbilityValues {
        self.values
    }

    pub fn enemies(&self) -> &[Enemy] {
        self.enemies
    }

    /// Index of the nearest living enemy within `radius` of `origin` that
    /// `exclude` does not reject.
    pub fn nearest_living(
        &self,
        origin: Vec2,
        radius: f64,
        exclude: impl Fn(EntityId) -> bool,
    ) -> Option<usize> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.combat.is_alive() && !exclude(enemy.id))
            .map(|(index, enemy)| (index, enemy.center().distance(origin)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Indices of every living enemy within `radius` of `origin`, in list order.
    pub fn living_within(&self, origin: Vec2, radius: f64) -> Vec<usize> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.combat.is_alive() && enemy.center().distance(origin) <= radius)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn enemy_center(&self, index: usize) -> Option<Vec2> {
        self.enemies.get(index).map(Enemy::center)
    }

    /// Apply player-sourced damage to the enemy at `index` and queue its result.
    pub fn hit_enemy(&mut self, index: usize, amount: f64, reason: DamageReason) -> Option<&CombatResult> {
        self.strike(index, amount, Vec2::ZERO, reason)
    }

    /// [`hit_enemy`](Self::hit_enemy) with a knockback impulse.
    pub fn strike(
        &mut self,
        index: usize,
        amount: f64,
        knockback: Vec2,
        reason: DamageReason,
    ) -> Option<&CombatResult> {
        let enemy = self.enemies.get_mut(index)?;
        let outcome = enemy.receive_hit(amount, knockback, Some(Combatant::Player), reason, self.values)?;
        self.reflections.extend(outcome.reflections);
        self.results.push_back(outcome.result);
        self.results.back()
    }

    pub fn queue_hook(&mut self, hook: EffectHook) {
        self.hooks.push(hook);
    }

    /// Reflections raised by enemies hit through this scope.
    pub fn take_reflections(&mut self) -> Vec<Reflection> {
        std::mem::take(&mut self.reflections)
    }
}

/// Attacker-side context for one primary hit.
pub struct AttackContext<'a> {
    pub attacker: AttackerView<'a>,
    pub target: TargetInfo,
    pub base_damage: f64,
    pub strength: f64,
    pub crit_chance: f64,
    pub crit_damage: f64,
    pub is_first_hit: bool,
    pub crit: bool,
    /// Running damage: raw after the crit roll, the rounded final value from
    /// `PostDamage` on.
    pub damage: f64,
    pub area: AreaScope<'a>,
}

impl<'a> AttackContext<'a> {
    pub fn now(&self) -> Millis {
        self.area.now()
    }

    pub fn values(&self) -> &'a AbilityValues {
        self.area.values()
    }
}

/// Receiver-side context built inside `take_damage`.
pub struct HitReceivedContext<'a> {
    pub incoming_damage: f64,
    pub attacker: Option<&'a Combatant>,
    pub receiver: &'a Combatant,
    pub values: &'a AbilityValues,
    reflect_enabled: bool,
    reflections: Vec<Reflection>,
}

impl<'a> HitReceivedContext<'a> {
    pub(crate) fn new(
        incoming_damage: f64,
        attacker: Option<&'a Combatant>,
        receiver: &'a Combatant,
        values: &'a AbilityValues,
        reflect_enabled: bool,
    ) -> Self {
        Self {
            incoming_damage,
            attacker,
            receiver,
            values,
            reflect_enabled,
            reflections: Vec::new(),
        }
    }

    /// Record damage to send back to the attacker.
    ///
    /// Ignored when there is no attacker, when the amount rounds to nothing,
    /// or when this hit is itself a reflection.
    pub fn reflect(&mut self, amount: f64, effect: super::EffectId) {
        let Some(attacker) = self.attacker else {
            return;
        };
        if !self.reflect_enabled || amount <= 0.0 {
            return;
        }
        self.reflections.push(Reflection {
            target: attacker.clone(),
            source: self.receiver.clone(),
            amount,
            effect,
        });
    }

    pub(crate) fn into_reflections(self) -> Vec<Reflection> {
        self.reflections
    }
}

/// Context for one periodic effect tick.
pub struct PeriodicContext<'a, 'b> {
    pub now: Millis,
    /// When this effect last fired; zero if never.
    pub last_tick: Millis,
    pub entity: &'a mut CombatEntity,
    pub center: Vec2,
    pub area: Option<&'a mut AreaScope<'b>>,
    pub values: &'a AbilityValues,
}

impl PeriodicContext<'_, '_> {
    pub fn elapsed(&self) -> u64 {
        self.now.since(self.last_tick)
    }
}
