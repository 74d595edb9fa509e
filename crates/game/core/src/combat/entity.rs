use std::collections::BTreeMap;

use crate::config::{AbilityValues, CombatConfig};
use crate::state::{Frame, Millis, Vec2};

use super::effects::{apply_hit_received, handler};
use super::{
    ActiveEffect, AreaScope, CombatResult, Combatant, DamageReason, EffectId, HitReceivedContext,
    PeriodicContext, Phase,
};

/// One incoming damage application.
#[derive(Clone, Debug, PartialEq)]
pub struct IncomingHit {
    /// Raw amount before damage reduction.
    pub amount: f64,
    pub knockback: Vec2,
    pub attacker: Option<Combatant>,
    pub reason: DamageReason,
}

impl IncomingHit {
    pub fn new(amount: f64, reason: DamageReason) -> Self {
        Self {
            amount,
            knockback: Vec2::ZERO,
            attacker: None,
            reason,
        }
    }

    pub fn with_knockback(mut self, knockback: Vec2) -> Self {
        self.knockback = knockback;
        self
    }

    pub fn from_attacker(mut self, attacker: Combatant) -> Self {
        self.attacker = Some(attacker);
        self
    }
}

/// Damage an on-hit-received effect sends back to the attacker.
///
/// Reflections are applied by the caller through
/// [`CombatEntity::receive_reflection`], which never reflects again.
#[derive(Clone, Debug, PartialEq)]
pub struct Reflection {
    /// The original attacker, who takes the reflected damage.
    pub target: Combatant,
    /// The entity whose effect reflected.
    pub source: Combatant,
    pub amount: f64,
    pub effect: EffectId,
}

/// Result of [`CombatEntity::take_damage`].
#[derive(Clone, Debug, PartialEq)]
pub struct DamageOutcome {
    pub result: CombatResult,
    pub reflections: Vec<Reflection>,
}

/// Hp, regeneration, knockback and active effects shared by the player and
/// enemies.
///
/// `max_hp`, `regen_rate` and `damage_reduction` are either fixed at
/// construction (enemies) or re-synced from the stat sheet before every use
/// (the player).
#[derive(Clone, Debug, PartialEq)]
pub struct CombatEntity {
    owner: Combatant,
    hp: f64,
    max_hp: f64,
    weight: f64,
    regen_rate: f64,
    regen_interval_ms: u64,
    last_regen: Millis,
    damage_reduction: f64,
    knockback: Vec2,
    just_took_damage: bool,
    last_damage_taken: i64,
    effects: Vec<ActiveEffect>,
    last_periodic_tick: BTreeMap<EffectId, Millis>,
    reward_xp: Option<u64>,
}

impl CombatEntity {
    /// Full-health entity. `weight` must be positive; non-positive values
    /// are rejected when templates are validated.
    pub fn new(owner: Combatant, max_hp: f64, weight: f64, regen_rate: f64, regen_interval_ms: u64) -> Self {
        Self {
            owner,
            hp: max_hp,
            max_hp,
            weight,
            regen_rate,
            regen_interval_ms,
            last_regen: Millis::ZERO,
            damage_reduction: 0.0,
            knockback: Vec2::ZERO,
            just_took_damage: false,
            last_damage_taken: 0,
            effects: Vec::new(),
            last_periodic_tick: BTreeMap::new(),
            reward_xp: None,
        }
    }

    /// XP granted to the killer.
    pub fn with_reward_xp(mut self, xp: u64) -> Self {
        self.reward_xp = Some(xp);
        self
    }

    pub fn owner(&self) -> &Combatant {
        &self.owner
    }

    pub fn hp(&self) -> f64 {
        self.hp
    }

    pub fn set_hp(&mut self, hp: f64) {
        self.hp = hp;
    }

    pub fn max_hp(&self) -> f64 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn regen_rate(&self) -> f64 {
        self.regen_rate
    }

    pub fn damage_reduction(&self) -> f64 {
        self.damage_reduction
    }

    pub fn knockback(&self) -> Vec2 {
        self.knockback
    }

    pub fn last_damage_taken(&self) -> i64 {
        self.last_damage_taken
    }

    pub fn reward_xp(&self) -> Option<u64> {
        self.reward_xp
    }

    /// Read and reset the "just took damage" flag.
    pub fn take_damage_flag(&mut self) -> bool {
        std::mem::take(&mut self.just_took_damage)
    }

    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    /// Replace the effect list wholesale.
    pub fn set_active_effects(&mut self, effects: Vec<ActiveEffect>) {
        self.effects = effects;
    }

    pub fn sync_vitals(&mut self, max_hp: f64, regen_rate: f64, damage_reduction: f64) {
        self.max_hp = max_hp;
        self.regen_rate = regen_rate;
        self.damage_reduction = damage_reduction;
    }

    /// Apply one hit. Returns `None` if the entity was already dead.
    ///
    /// Reduction is applied first, then every on-hit-received effect in list
    /// order. Reflections are returned, never applied here.
    pub fn take_damage(&mut self, hit: IncomingHit, values: &AbilityValues) -> Option<DamageOutcome> {
        self.resolve_hit(hit, values, true)
    }

    /// Apply reflected damage from `reflection.source`. On-hit-received
    /// effects still run, but cannot reflect a second time.
    pub fn receive_reflection(&mut self, reflection: &Reflection, values: &AbilityValues) -> Option<CombatResult> {
        let hit = IncomingHit::new(reflection.amount, DamageReason::Effect(reflection.effect))
            .from_attacker(reflection.source.clone());
        self.resolve_hit(hit, values, false)
            .map(|outcome| outcome.result)
    }

    fn resolve_hit(&mut self, hit: IncomingHit, values: &AbilityValues, reflect: bool) -> Option<DamageOutcome> {
        if !self.is_alive() {
            return None;
        }

        let reduced = hit.amount * (1.0 - self.damage_reduction);
        let mut ctx = HitReceivedContext::new(reduced, hit.attacker.as_ref(), &self.owner, values, reflect);
        apply_hit_received(&self.effects, &mut ctx);
        let incoming = ctx.incoming_damage;
        let reflections = ctx.into_reflections();

        self.hp -= incoming;
        self.knockback = hit.knockback / self.weight;
        self.just_took_damage = true;
        self.last_damage_taken = incoming.round_ties_even() as i64;

        let final_hit = self.hp <= 0.0;
        tracing::trace!(
            owner = ?self.owner.entity(),
            raw = hit.amount,
            applied = incoming,
            reason = %hit.reason,
            final_hit,
            "damage applied"
        );

        let result = CombatResult::new(
            self.owner.clone(),
            hit.attacker,
            self.last_damage_taken,
            final_hit,
            self.reward_xp,
            hit.reason,
        );
        Some(DamageOutcome { result, reflections })
    }

    pub fn heal(&mut self, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        self.hp = self.max_hp.min(self.hp + amount);
    }

    pub fn revive(&mut self) {
        self.hp = self.max_hp;
        self.knockback = Vec2::ZERO;
    }

    /// Per-frame tick: periodic effects, regeneration, hp clamp, knockback.
    ///
    /// Returns the knockback displacement to add to the owner's position.
    pub fn update(
        &mut self,
        frame: Frame,
        center: Vec2,
        mut area: Option<&mut AreaScope<'_>>,
        config: &CombatConfig,
    ) -> Vec2 {
        self.run_periodic(frame.now, center, area.as_deref_mut(), &config.abilities);
        self.update_regen(frame.now);
        self.clamp_hp();
        self.apply_knockback(frame.dt, config.knockback_friction)
    }

    fn run_periodic(
        &mut self,
        now: Millis,
        center: Vec2,
        mut area: Option<&mut AreaScope<'_>>,
        values: &AbilityValues,
    ) {
        let periodic: Vec<(EffectId, u32)> = self
            .effects
            .iter()
            .filter(|effect| effect.id.phase() == Phase::Periodic)
            .map(|effect| (effect.id, effect.tier))
            .collect();

        for (id, tier) in periodic {
            let last_tick = self
                .last_periodic_tick
                .get(&id)
                .copied()
                .unwrap_or(Millis::ZERO);
            let mut ctx = PeriodicContext {
                now,
                last_tick,
                entity: self,
                center,
                area: area.as_deref_mut(),
                values,
            };
            if handler(id).apply_periodic(&mut ctx, tier) {
                self.last_periodic_tick.insert(id, now);
            }
        }
    }

    fn update_regen(&mut self, now: Millis) {
        if self.regen_rate <= 0.0 || self.hp >= self.max_hp {
            return;
        }
        if now.since(self.last_regen) >= self.regen_interval_ms {
            self.heal(self.regen_rate);
            self.last_regen = now;
        }
    }

    fn clamp_hp(&mut self) {
        self.hp = self.hp.min(self.max_hp);
    }

    fn apply_knockback(&mut self, dt: f64, friction: f64) -> Vec2 {
        let displacement = self.knockback * dt;
        self.knockback *= (-friction * dt).exp();
        displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnemyKind;
    use crate::state::EntityId;

    fn slime(entity: u32) -> Combatant {
        Combatant::Enemy {
            entity: EntityId(entity),
            template: "slime".into(),
            kind: EnemyKind::Mob,
        }
    }

    fn player_entity(max_hp: f64) -> CombatEntity {
        CombatEntity::new(Combatant::Player, max_hp, 1.0, 0.0, 1000)
    }

    #[test]
    fn reduction_applies_before_hit() {
        let values = AbilityValues::default();
        let mut entity = player_entity(100.0);
        entity.sync_vitals(100.0, 0.0, 0.5);

        let outcome = entity
            .take_damage(IncomingHit::new(20.0, DamageReason::Contact), &values)
            .expect("alive");
        assert_eq!(entity.hp(), 90.0);
        assert_eq!(outcome.result.final_damage(), 10);
        assert!(!outcome.result.final_hit());
    }

    #[test]
    fn dead_entities_ignore_damage() {
        let values = AbilityValues::default();
        let mut entity = player_entity(10.0);
        entity.set_hp(0.0);
        assert!(
            entity
                .take_damage(IncomingHit::new(5.0, DamageReason::Contact), &values)
                .is_none()
        );
    }

    #[test]
    fn slime_shield_halves_slime_damage_only() {
        let values = AbilityValues::default();
        let mut entity = player_entity(100.0);
        entity.set_active_effects(vec![ActiveEffect::new(EffectId::SlimeShield, 2, "Slime Set")]);

        entity.take_damage(IncomingHit::new(20.0, DamageReason::Contact).from_attacker(slime(1)), &values);
        assert_eq!(entity.hp(), 90.0);

        let zombie = Combatant::Enemy {
            entity: EntityId(2),
            template: "zombie".into(),
            kind: EnemyKind::Mob,
        };
        entity.take_damage(IncomingHit::new(20.0, DamageReason::Contact).from_attacker(zombie), &values);
        assert_eq!(entity.hp(), 70.0);
    }

    #[test]
    fn reflected_damage_never_reflects_again() {
        let values = AbilityValues::default();
        let mut player = player_entity(100.0);
        player.set_active_effects(vec![ActiveEffect::new(EffectId::Thorns, 3, "Ring")]);

        let mut enemy = CombatEntity::new(slime(1), 100.0, 1.0, 0.0, 1000);
        enemy.set_active_effects(vec![ActiveEffect::new(EffectId::Thorns, 3, "Shell")]);

        let outcome = player
            .take_damage(IncomingHit::new(50.0, DamageReason::Contact).from_attacker(slime(1)), &values)
            .expect("alive");
        assert_eq!(outcome.reflections.len(), 1);
        let reflection = &outcome.reflections[0];
        assert_eq!(reflection.amount, 15.0);

        let reflected = enemy
            .receive_reflection(reflection, &values)
            .expect("enemy alive");
        assert_eq!(reflected.final_damage(), 15);
        assert_eq!(reflected.reason(), DamageReason::Effect(EffectId::Thorns));
        assert_eq!(enemy.hp(), 85.0);
        // the enemy's own thorns saw the hit but had nothing to reflect into
        assert_eq!(player.hp(), 50.0);
    }

    #[test]
    fn hp_never_exceeds_max_after_update() {
        let config = CombatConfig::default();
        let mut entity = player_entity(100.0);
        entity.set_hp(100.0);
        entity.sync_vitals(60.0, 5.0, 0.0);
        entity.update(Frame::new(Millis(5000), 0.016), Vec2::ZERO, None, &config);
        assert!(entity.hp() <= entity.max_hp());

        entity.heal(1_000.0);
        entity.update(Frame::new(Millis(5016), 0.016), Vec2::ZERO, None, &config);
        assert_eq!(entity.hp(), 60.0);
    }

    #[test]
    fn regen_waits_for_interval() {
        let config = CombatConfig::default();
        let mut entity = player_entity(100.0);
        entity.sync_vitals(100.0, 3.0, 0.0);
        entity.set_hp(50.0);

        entity.update(Frame::new(Millis(1000), 0.016), Vec2::ZERO, None, &config);
        assert_eq!(entity.hp(), 53.0);
        entity.update(Frame::new(Millis(1500), 0.016), Vec2::ZERO, None, &config);
        assert_eq!(entity.hp(), 53.0);
        entity.update(Frame::new(Millis(2000), 0.016), Vec2::ZERO, None, &config);
        assert_eq!(entity.hp(), 56.0);
    }

    #[test]
    fn knockback_decays_exponentially() {
        let config = CombatConfig::default();
        let values = AbilityValues::default();
        let mut entity = CombatEntity::new(slime(1), 100.0, 2.0, 0.0, 1000);
        entity.take_damage(
            IncomingHit::new(1.0, DamageReason::Weapon).with_knockback(Vec2::new(600.0, 0.0)),
            &values,
        );
        let v0 = entity.knockback().length();
        assert_eq!(v0, 300.0);

        let mut elapsed = 0.0;
        for step in 1..=30 {
            let dt = 0.01 * step as f64;
            entity.update(Frame::new(Millis(10), dt), Vec2::ZERO, None, &config);
            elapsed += dt;
            let expected = v0 * (-config.knockback_friction * elapsed).exp();
            assert!((entity.knockback().length() - expected).abs() < 1e-9 * v0);
        }
    }

    #[test]
    fn slime_regen_is_self_paced() {
        let config = CombatConfig::default();
        let mut entity = player_entity(200.0);
        entity.set_hp(100.0);
        entity.set_active_effects(vec![ActiveEffect::new(EffectId::SlimeRegen, 4, "Slime Set")]);

        // interval 2000 ms, 2% of 200 max hp
        entity.update(Frame::new(Millis(2000), 0.016), Vec2::ZERO, None, &config);
        assert_eq!(entity.hp(), 104.0);
        entity.update(Frame::new(Millis(3999), 0.016), Vec2::ZERO, None, &config);
        assert_eq!(entity.hp(), 104.0);
        entity.update(Frame::new(Millis(4000), 0.016), Vec2::ZERO, None, &config);
        assert_eq!(entity.hp(), 108.0);
    }
}
