//! End-of-frame processing of queued combat and gather results.
use crate::actor::Player;
use crate::combat::{CombatResult, Combatant, DamageReason};
use crate::config::DropRules;
use crate::env::{CounterKind, DropEntry, Env, RollStream};
use crate::error::{CombatError, ErrorContext, GameError};
use crate::progression::{RewardSink, Skill};
use crate::state::Millis;
use crate::stats::StatKind;

use super::{GatherResult, Zone};

/// What one flush did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlushReport {
    /// Combat results drained, failed ones included.
    pub processed: usize,
    /// Enemies removed and replaced.
    pub kills: u32,
    /// Gather results drained.
    pub gathered: usize,
    /// A queued result reported the player's hp reaching zero.
    pub player_defeated: bool,
    pub level_ups: Vec<(Skill, u32)>,
    /// Results that could not be applied. They were logged and skipped.
    pub failures: Vec<CombatError>,
}

impl Zone {
    /// Drain every queued result in FIFO order and apply its side effects.
    ///
    /// Both queues are empty afterwards, whatever individual results did.
    /// A result that cannot be applied is reported in
    /// [`FlushReport::failures`] and never blocks the rest.
    pub fn flush_combat_results(
        &mut self,
        player: &mut Player,
        rewards: &mut dyn RewardSink,
        env: &Env<'_>,
        now: Millis,
    ) -> FlushReport {
        let mut report = FlushReport::default();

        let results = std::mem::take(&mut self.pending_results);
        for result in results {
            report.processed += 1;
            if let Err(err) = self.apply_result(&result, player, rewards, env, now, &mut report) {
                tracing::warn!(code = err.error_code(), %err, "skipping combat result");
                report.failures.push(err);
            }
        }

        let gathers = std::mem::take(&mut self.pending_gathers);
        for gather in gathers {
            report.gathered += 1;
            self.apply_gather(gather, player, rewards, env, &mut report);
        }

        report
    }

    fn apply_result(
        &mut self,
        result: &CombatResult,
        player: &mut Player,
        rewards: &mut dyn RewardSink,
        env: &Env<'_>,
        now: Millis,
        report: &mut FlushReport,
    ) -> Result<(), CombatError> {
        let (entity, template) = match result.target() {
            Combatant::Player => {
                if result.final_hit() {
                    tracing::info!(reason = %result.reason(), "player defeated");
                    report.player_defeated = true;
                }
                return Ok(());
            }
            Combatant::Enemy { entity, template, .. } => (*entity, template.as_str()),
        };

        let index = self
            .enemies
            .iter()
            .position(|enemy| enemy.id == entity)
            .ok_or_else(|| CombatError::StaleTarget {
                context: ErrorContext::new(now)
                    .with_entity(entity)
                    .with_message("enemy left the zone before its result was flushed"),
            })?;

        if let Some(sound) = &self.enemies[index].hit_sound {
            self.sounds.push(sound.as_str());
        }
        if !result.final_hit() {
            return Ok(());
        }

        self.sounds.push("enemy_death");
        let enemy = self.enemies.remove(index);

        let magic_find = player
            .sheet()
            .against_enemy(template, &player.beastiary, env)
            .get(StatKind::MagicFind);
        for (item, quantity) in roll_drops(&enemy.drop_table, magic_find, &env.config().drops, &mut self.rng) {
            rewards.add_item(&item, quantity);
            rewards.handle_resource_gain(&item, quantity);
        }

        for (skill, amount) in result.final_xp() {
            grant_xp(player, rewards, *skill, *amount, report);
        }

        let level_before = player.beastiary.enemy_level(template, env);
        player.beastiary.record_kill(template);
        let level_after = player.beastiary.enemy_level(template, env);
        if level_after > level_before {
            tracing::info!(enemy = %template, level = level_after, "beastiary level up");
            self.sounds.push("level_up_beastiary");
        }
        let milestone_xp = player.beastiary.claim_milestones(env);
        grant_xp(player, rewards, Skill::Combat, milestone_xp, report);
        rewards.handle_kill(template);

        if result.attacker().is_some_and(Combatant::is_player) {
            bump_active_counter(player, result, env);
        }

        report.kills += 1;
        tracing::info!(enemy = %entity, template, reason = %result.reason(), "enemy defeated");

        if let Some(replacement) = self.spawn_enemy(env) {
            tracing::debug!(enemy = %replacement.id, template = %replacement.template_id, "replacement spawned");
            self.enemies.push(replacement);
        }
        Ok(())
    }

    fn apply_gather(
        &mut self,
        gather: GatherResult,
        player: &mut Player,
        rewards: &mut dyn RewardSink,
        env: &Env<'_>,
        report: &mut FlushReport,
    ) {
        grant_xp(player, rewards, gather.skill, gather.xp, report);
        for (item, quantity) in &gather.drops {
            rewards.add_item(item, *quantity);
            rewards.handle_resource_gain(item, *quantity);
        }
        if !gather.depleted {
            return;
        }

        let Some(index) = self
            .resource_nodes
            .iter()
            .position(|node| node.id == gather.node)
        else {
            return;
        };
        self.resource_nodes.remove(index);
        tracing::debug!(node = %gather.template_id, "resource node depleted");
        if let Some(replacement) = self.spawn_resource_node(env) {
            self.resource_nodes.push(replacement);
        }
    }
}

/// Notify the sink and the player's skill book, recording any level-up.
fn grant_xp(
    player: &mut Player,
    rewards: &mut dyn RewardSink,
    skill: Skill,
    amount: u64,
    report: &mut FlushReport,
) {
    if amount == 0 {
        return;
    }
    rewards.gain_xp(skill, amount);
    if let Some(level) = player.skills.gain_xp(skill, amount) {
        tracing::info!(%skill, level, "skill level up");
        rewards.level_up(skill, level);
        report.level_ups.push((skill, level));
    }
}

/// Roll each entry once. Chances below the magic-find cap are raised by
/// `1 + magic_find/100`, but never past the cap.
fn roll_drops(
    table: &[DropEntry],
    magic_find: f64,
    rules: &DropRules,
    rng: &mut RollStream,
) -> Vec<(String, u32)> {
    let mut drops = Vec::new();
    for entry in table {
        let mut chance = entry.chance;
        if chance < rules.magic_find_cap {
            chance = (chance * (1.0 + magic_find / 100.0)).min(rules.magic_find_cap);
        }
        if rng.next_f64() <= chance {
            let quantity = rng.range_inclusive(entry.quantity.0, entry.quantity.1);
            drops.push((entry.item.clone(), quantity));
        }
    }
    drops
}

/// Advance the active item's counter when the kill came from the weapon or
/// from an effect the item itself grants.
fn bump_active_counter(player: &mut Player, result: &CombatResult, env: &Env<'_>) {
    let eligible = match result.reason() {
        DamageReason::Weapon => true,
        DamageReason::Effect(effect) => player.active_item_effect_sources(env).contains(&effect),
        DamageReason::Contact => false,
    };
    if !eligible {
        return;
    }
    let Some(active) = player.loadout.active_mut() else {
        return;
    };
    let Some(counter) = env
        .item(&active.base_id)
        .and_then(|item| item.counter.as_deref())
        .and_then(|id| env.counter(id))
    else {
        return;
    };

    let counters = &mut active.metadata.counters;
    match counter.kind {
        CounterKind::Kills => counters.kills += 1,
        CounterKind::Xp => {
            counters.xp += result.final_xp().get(&Skill::Combat).copied().unwrap_or(0);
        }
    }
    tracing::debug!(item = %active.base_id, kills = counters.kills, xp = counters.xp, "item counter advanced");
}
