//! Primary weapon hit resolution.
use crate::actor::Player;
use crate::combat::{
    AreaScope, AttackContext, AttackReport, AttackerView, DamageReason, HitFlags, Phase, TargetInfo,
    apply_combat_phase, calculate_damage, knockback_toward,
};
use crate::env::Env;
use crate::equipment::ActionItem;
use crate::state::{EntityId, Millis};
use crate::stats::StatKind;

use super::Zone;

impl Zone {
    /// Resolve one weapon swing from `player` against enemy `target`.
    ///
    /// Phases run in order: `PreDamage`, `PreStrength`, `PreCrit`, the
    /// damage and crit roll, `PostCrit`, rounding, application to the
    /// target, `PostDamage` with the rounded damage, then `OnKill` if the
    /// target died. Every damage application made along the way, area
    /// effects and reflections included, is queued for the flush.
    ///
    /// Returns `None` when the target is not a living enemy of this zone.
    /// Cooldowns are the caller's concern.
    pub fn process_combat(
        &mut self,
        player: &mut Player,
        target: EntityId,
        item: &ActionItem,
        env: &Env<'_>,
        now: Millis,
    ) -> Option<AttackReport> {
        // the active item may have changed since the last frame refresh
        player.refresh_stats(env, now);
        let values = &env.config().abilities;
        let index = self
            .enemies
            .iter()
            .position(|enemy| enemy.id == target && enemy.combat.is_alive())?;
        let enemy = &self.enemies[index];
        let target_info = TargetInfo {
            entity: enemy.id,
            center: enemy.center(),
            max_hp: enemy.combat.max_hp(),
        };
        let is_first_hit = !enemy.was_hit;
        let queued_before = self.pending_results.len();

        let effects = player.combat.effects().to_vec();
        let strength = player.stat(StatKind::Strength);
        let crit_chance = player.stat(StatKind::CritChance);
        let crit_damage = player.stat(StatKind::CritDamage);
        let player_center = player.center();

        let (final_damage, applied, final_hit, crit, reflections) = {
            let Player { combat, temp, .. } = &mut *player;
            let mut ctx = AttackContext {
                attacker: AttackerView {
                    combat,
                    temp,
                    center: player_center,
                },
                target: target_info,
                base_damage: item.profile.damage,
                strength,
                crit_chance,
                crit_damage,
                is_first_hit,
                crit: false,
                damage: 0.0,
                area: AreaScope::new(
                    &mut self.enemies,
                    &mut self.pending_results,
                    &mut self.hooks,
                    now,
                    values,
                ),
            };

            apply_combat_phase(&effects, Phase::PreDamage, &mut ctx);
            apply_combat_phase(&effects, Phase::PreStrength, &mut ctx);
            apply_combat_phase(&effects, Phase::PreCrit, &mut ctx);

            let roll = calculate_damage(
                ctx.base_damage,
                ctx.strength,
                ctx.crit_chance,
                ctx.crit_damage,
                &mut self.rng,
            );
            ctx.damage = roll.damage;
            ctx.crit = roll.crit;

            apply_combat_phase(&effects, Phase::PostCrit, &mut ctx);

            let final_damage = ctx.damage.round_ties_even();
            let knockback = knockback_toward(player_center, target_info.center, item.profile.knockback);
            let (applied, final_hit) = ctx
                .area
                .strike(index, final_damage, knockback, DamageReason::Weapon)
                .map(|result| (result.final_damage(), result.final_hit()))
                .unwrap_or((0, false));

            ctx.damage = final_damage;
            apply_combat_phase(&effects, Phase::PostDamage, &mut ctx);
            if final_hit {
                apply_combat_phase(&effects, Phase::OnKill, &mut ctx);
            }

            (final_damage as i64, applied, final_hit, ctx.crit, ctx.area.take_reflections())
        };

        self.apply_reflections(player, reflections, values);

        let mut flags = HitFlags::empty();
        flags.set(HitFlags::CRIT, crit);
        flags.set(HitFlags::FIRST_HIT, is_first_hit);
        flags.set(HitFlags::FINAL_HIT, final_hit);

        let report = AttackReport {
            target,
            damage: final_damage,
            applied,
            flags,
            results_queued: self.pending_results.len() - queued_before,
        };
        tracing::debug!(
            enemy = %target,
            damage = report.damage,
            applied = report.applied,
            crit,
            final_hit,
            queued = report.results_queued,
            "weapon hit"
        );
        Some(report)
    }
}
