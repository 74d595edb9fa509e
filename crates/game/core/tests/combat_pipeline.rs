use std::collections::BTreeMap;

use grindstone_core::combat::{ActiveEffect, IncomingHit};
use grindstone_core::{
    ActionProfile, Body, CombatConfig, CombatEntity, Combatant, DamageReason, EffectId,
    EnemyTemplate, Env, EquipSlot, Frame, HitFlags, ItemDefinition, ItemInstance, Millis, Player,
    RewardSink, Skill, StatKind, StaticTables, Vec2, Zone, ZoneDefinition,
};
use grindstone_core::zone::HookKind;

// ====================================================================
// Fixtures
// ====================================================================

fn sword(damage: f64) -> ItemDefinition {
    ItemDefinition {
        action: Some(ActionProfile {
            radius: 50.0,
            delay_ms: 500,
            damage,
            knockback: 300.0,
        }),
        skill: Some(Skill::Combat),
        ..ItemDefinition::named("Test Sword")
    }
}

fn tables() -> StaticTables {
    let dummy = EnemyTemplate {
        hp: 1000.0,
        speed: 0.0,
        ..EnemyTemplate::named("Training Dummy")
    };
    let weakling = EnemyTemplate {
        hp: 5.0,
        speed: 0.0,
        xp: 12,
        ..EnemyTemplate::named("Weakling")
    };
    let brute = EnemyTemplate {
        hp: 1000.0,
        speed: 0.0,
        damage: 20.0,
        regen: 5.0,
        ..EnemyTemplate::named("Brute")
    };

    StaticTables::builder()
        .item("sword_10", sword(10.0))
        .item("sword_100", sword(100.0))
        .item(
            "plate",
            ItemDefinition {
                slot: Some(EquipSlot::Body),
                ..ItemDefinition::named("Plate")
            },
        )
        .enemy("dummy", dummy)
        .enemy("weakling", weakling)
        .enemy("brute", brute)
        .zone("arena", zone_of("dummy", 4))
        .zone("pen", zone_of("weakling", 3))
        .zone("pit", zone_of("brute", 1))
        .build()
}

fn zone_of(enemy: &str, count: usize) -> ZoneDefinition {
    ZoneDefinition {
        size: 1000.0,
        enemy_spawn_table: vec![(enemy.to_string(), 1.0)],
        num_enemies: count,
        ..ZoneDefinition::default()
    }
}

/// Stock balance without the base crit chance, so every swing is predictable.
fn config() -> CombatConfig {
    let mut config = CombatConfig::default();
    config.base_stats.insert(StatKind::CritChance, 0.0);
    config
}

fn place(zone: &mut Zone, index: usize, center: Vec2) {
    let enemy = &mut zone.enemies_mut()[index];
    enemy.body = Body::centered_at(center, enemy.body.size);
}

fn arm(player: &mut Player, env: &Env<'_>, item: ItemInstance) {
    player.loadout.set_active(Some(item));
    player.refresh_stats(env, Millis(0));
}

#[derive(Default)]
struct Recorder {
    xp: BTreeMap<Skill, u64>,
    kills: Vec<String>,
}

impl RewardSink for Recorder {
    fn gain_xp(&mut self, skill: Skill, amount: u64) {
        *self.xp.entry(skill).or_default() += amount;
    }

    fn handle_kill(&mut self, enemy_id: &str) {
        self.kills.push(enemy_id.to_string());
    }
}

// ====================================================================
// Primary hit
// ====================================================================

/// base 10, strength 50, no crit, no defense: 15 damage.
#[test]
fn basic_hit_scales_with_strength() {
    let tables = tables();
    let mut config = config();
    config.base_stats.insert(StatKind::Strength, 50.0);
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    arm(&mut player, &env, ItemInstance::new("sword_10"));
    let mut zone = Zone::new("arena", &env, 7).expect("arena");
    let target = zone.enemies()[0].id;
    let item = player.action_item(&env);

    let report = zone
        .process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("living target");

    assert_eq!(report.damage, 15);
    assert_eq!(report.applied, 15);
    assert!(report.flags.contains(HitFlags::FIRST_HIT));
    assert!(!report.flags.intersects(HitFlags::CRIT | HitFlags::FINAL_HIT));
    assert_eq!(report.results_queued, 1);
    let enemy = zone.enemy(target).expect("still present");
    assert_eq!(enemy.combat.hp(), 985.0);
    assert!(enemy.was_hit);
}

#[test]
fn first_hit_bonus_applies_once_per_target() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    arm(
        &mut player,
        &env,
        ItemInstance::new("sword_10").with_enchantment("first_hit_bonus", 1),
    );
    let mut zone = Zone::new("arena", &env, 7).expect("arena");
    let target = zone.enemies()[0].id;
    let item = player.action_item(&env);

    let first = zone
        .process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("first swing");
    let second = zone
        .process_combat(&mut player, target, &item, &env, Millis(2000))
        .expect("second swing");

    assert_eq!(first.damage, 15);
    assert!(first.flags.contains(HitFlags::FIRST_HIT));
    assert_eq!(second.damage, 10);
    assert!(!second.flags.contains(HitFlags::FIRST_HIT));
}

/// Two levels of sharpness add 10 base damage; twenty levels of crit boost
/// push crit chance to 100%.
#[test]
fn sharpness_and_crit_boost_modify_the_swing() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);
    let mut zone = Zone::new("arena", &env, 7).expect("arena");
    let target = zone.enemies()[0].id;

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    arm(
        &mut player,
        &env,
        ItemInstance::new("sword_10").with_enchantment("sharpness", 2),
    );
    let item = player.action_item(&env);
    let sharp = zone
        .process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("living target");
    assert_eq!(sharp.damage, 20);
    assert!(!sharp.flags.contains(HitFlags::CRIT));

    arm(
        &mut player,
        &env,
        ItemInstance::new("sword_10").with_enchantment("crit_boost", 20),
    );
    let item = player.action_item(&env);
    let crit = zone
        .process_combat(&mut player, target, &item, &env, Millis(2000))
        .expect("living target");
    assert!(crit.flags.contains(HitFlags::CRIT));
    // 10 x (1 + 50% crit damage)
    assert_eq!(crit.damage, 15);
}

/// Swapping the active item between frames takes effect on the next swing
/// without waiting for a frame refresh.
#[test]
fn swing_uses_the_current_loadout() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);
    let mut zone = Zone::new("arena", &env, 7).expect("arena");
    let target = zone.enemies()[0].id;

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    arm(&mut player, &env, ItemInstance::new("sword_10"));
    player.loadout.set_active(Some(
        ItemInstance::new("sword_10").with_enchantment("sharpness", 2),
    ));
    let item = player.action_item(&env);

    let report = zone
        .process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("living target");
    assert_eq!(report.damage, 20);
    assert_eq!(player.combat.effects()[0].id, EffectId::Sharpness);
}

/// Defense 250 halves incoming damage: a 20-damage contact hit lands as 10.
#[test]
fn contact_damage_is_reduced_by_defense() {
    let tables = tables();
    let mut config = config();
    config.base_stats.insert(StatKind::Defense, 250.0);
    let env = Env::from_tables(&tables, &config);

    let center = Vec2::new(500.0, 500.0);
    let mut player = Player::new(&env, center);
    let mut zone = Zone::new("pit", &env, 3).expect("pit");
    place(&mut zone, 0, center);

    zone.update(&mut player, Frame::new(Millis(1000), 0.016), &env);

    assert_eq!(player.combat.hp(), 90.0);
    let queued: Vec<_> = zone.pending_results().collect();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].final_damage(), 10);
    assert_eq!(queued[0].reason(), DamageReason::Contact);
    assert!(queued[0].target().is_player());
}

// ====================================================================
// Area effects
// ====================================================================

/// Level 3 chain lightning from a 100-damage hit bounces for 50, 40, 32.
#[test]
fn chain_lightning_falls_off_per_bounce() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 400.0));
    arm(
        &mut player,
        &env,
        ItemInstance::new("sword_100").with_enchantment("chain_lightning", 3),
    );
    let mut zone = Zone::new("arena", &env, 11).expect("arena");
    for (index, x) in [400.0, 450.0, 500.0, 550.0].into_iter().enumerate() {
        place(&mut zone, index, Vec2::new(x, 400.0));
    }
    let ids: Vec<_> = zone.enemies().iter().map(|enemy| enemy.id).collect();
    let item = player.action_item(&env);

    let report = zone
        .process_combat(&mut player, ids[0], &item, &env, Millis(1000))
        .expect("living target");
    assert_eq!(report.damage, 100);
    assert_eq!(report.results_queued, 4);

    let taken: Vec<_> = ids
        .iter()
        .map(|id| zone.enemy(*id).expect("alive").combat.last_damage_taken())
        .collect();
    assert_eq!(taken, vec![100, 50, 40, 32]);
    assert_eq!(zone.hooks().len(), 3);

    let mut rewards = Recorder::default();
    let flush = zone.flush_combat_results(&mut player, &mut rewards, &env, Millis(1000));
    assert_eq!(flush.processed, 4);
    assert_eq!(zone.pending_count(), 0);
    assert!(flush.failures.is_empty());
}

#[test]
fn chain_lightning_stops_without_targets_in_range() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(100.0, 100.0));
    arm(
        &mut player,
        &env,
        ItemInstance::new("sword_100").with_enchantment("chain_lightning", 3),
    );
    let mut zone = Zone::new("arena", &env, 11).expect("arena");
    place(&mut zone, 0, Vec2::new(100.0, 100.0));
    place(&mut zone, 1, Vec2::new(250.0, 100.0));
    place(&mut zone, 2, Vec2::new(900.0, 900.0));
    place(&mut zone, 3, Vec2::new(900.0, 600.0));
    let target = zone.enemies()[0].id;
    let item = player.action_item(&env);

    let report = zone
        .process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("living target");
    assert_eq!(report.results_queued, 2);
}

/// Level 2 cleave splashes 30% of a 100-damage hit onto every living enemy
/// within 100 units of the target.
#[test]
fn cleave_splashes_neighbors_within_radius() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 400.0));
    arm(
        &mut player,
        &env,
        ItemInstance::new("sword_100").with_enchantment("cleave", 2),
    );
    let mut zone = Zone::new("arena", &env, 13).expect("arena");
    place(&mut zone, 0, Vec2::new(400.0, 400.0));
    place(&mut zone, 1, Vec2::new(460.0, 400.0));
    place(&mut zone, 2, Vec2::new(400.0, 490.0));
    place(&mut zone, 3, Vec2::new(900.0, 900.0));
    let ids: Vec<_> = zone.enemies().iter().map(|enemy| enemy.id).collect();
    let item = player.action_item(&env);

    let report = zone
        .process_combat(&mut player, ids[0], &item, &env, Millis(1000))
        .expect("living target");
    assert_eq!(report.damage, 100);
    assert_eq!(report.results_queued, 3);

    let hp: Vec<_> = ids
        .iter()
        .map(|id| zone.enemy(*id).expect("alive").combat.hp())
        .collect();
    assert_eq!(hp, vec![900.0, 970.0, 970.0, 1000.0]);
    let kinds: Vec<_> = zone.hooks().iter().map(|hook| hook.kind).collect();
    assert_eq!(kinds, vec![HookKind::CleaveHit, HookKind::CleaveHit, HookKind::Cleave]);
}

#[test]
fn phoenix_aura_burns_nearby_enemies_on_its_interval() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let center = Vec2::new(500.0, 500.0);
    let mut player = Player::new(&env, center);
    player
        .loadout
        .equip(EquipSlot::Body, ItemInstance::new("plate").with_enchantment("phoenix_aura", 1));
    let mut zone = Zone::new("arena", &env, 5).expect("arena");
    place(&mut zone, 0, center + Vec2::new(60.0, 0.0));
    place(&mut zone, 1, Vec2::new(100.0, 100.0));
    place(&mut zone, 2, Vec2::new(900.0, 100.0));
    place(&mut zone, 3, Vec2::new(100.0, 900.0));
    let near = zone.enemies()[0].id;

    zone.update_player(&mut player, Frame::new(Millis(50), 0.05), Vec2::ZERO, &env);
    assert_eq!(zone.pending_count(), 0);

    zone.update_player(&mut player, Frame::new(Millis(100), 0.05), Vec2::ZERO, &env);
    assert_eq!(zone.pending_count(), 1);
    assert_eq!(zone.enemy(near).expect("alive").combat.hp(), 990.0);
    assert_eq!(zone.drain_sounds(), vec!["fire_aura_hit".to_string()]);
}

// ====================================================================
// Sustain and reflection
// ====================================================================

/// Level 2 lifesteal drains 10% of a 1000 hp target, capped at 10% of the
/// attacker's 100 max hp.
#[test]
fn lifesteal_is_capped_by_attacker_max_hp() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    arm(
        &mut player,
        &env,
        ItemInstance::new("sword_10").with_enchantment("lifesteal", 2),
    );
    player.combat.set_hp(50.0);
    let mut zone = Zone::new("arena", &env, 7).expect("arena");
    let target = zone.enemies()[0].id;
    let item = player.action_item(&env);

    zone.process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("living target");
    assert_eq!(player.combat.hp(), 60.0);
}

/// The enemy's bone thorns reflect once. The player's own thorns do not
/// answer the reflection.
#[test]
fn reflection_never_cascades() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    player
        .loadout
        .equip(EquipSlot::Body, ItemInstance::new("plate").with_enchantment("thorns", 5));
    arm(&mut player, &env, ItemInstance::new("sword_100"));
    let mut zone = Zone::new("arena", &env, 7).expect("arena");
    zone.enemies_mut()[0]
        .combat
        .set_active_effects(vec![ActiveEffect::new(EffectId::BoneThorns, 1, "Bone Hide")]);
    let target = zone.enemies()[0].id;
    let item = player.action_item(&env);

    let report = zone
        .process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("living target");

    assert_eq!(report.results_queued, 2);
    assert_eq!(player.combat.hp(), 95.0);
    assert_eq!(zone.enemy(target).expect("alive").combat.hp(), 900.0);
    let reflected = zone.pending_results().nth(1).expect("reflection queued");
    assert_eq!(reflected.reason(), DamageReason::Effect(EffectId::BoneThorns));
    assert!(reflected.target().is_player());
}

// ====================================================================
// Flush
// ====================================================================

/// An enemy at 5 hp takes 10: it is removed during the flush and replaced,
/// keeping the population constant.
#[test]
fn kill_is_replaced_during_flush() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    arm(&mut player, &env, ItemInstance::new("sword_10"));
    let mut zone = Zone::new("pen", &env, 9).expect("pen");
    let target = zone.enemies()[0].id;
    let item = player.action_item(&env);

    let report = zone
        .process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("living target");
    assert!(report.flags.contains(HitFlags::FINAL_HIT));
    // the corpse stays in the list until the flush
    assert_eq!(zone.enemies().len(), 3);
    assert!(zone.enemy(target).is_some());

    let mut rewards = Recorder::default();
    let flush = zone.flush_combat_results(&mut player, &mut rewards, &env, Millis(1000));

    assert_eq!(flush.kills, 1);
    assert_eq!(zone.enemies().len(), 3);
    assert!(zone.enemy(target).is_none());
    assert!(zone.enemies().iter().all(|enemy| enemy.combat.is_alive()));
    assert_eq!(rewards.kills, vec!["weakling".to_string()]);
    assert_eq!(rewards.xp.get(&Skill::Combat), Some(&12));
    assert_eq!(player.skills.xp(Skill::Combat), 12);
    assert_eq!(player.beastiary.kills("weakling"), 1);
    assert_eq!(zone.drain_sounds(), vec!["enemy_death".to_string()]);
}

/// A level 2 speed-on-kill grants 20 speed for three seconds.
#[test]
fn speed_on_kill_is_temporary() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    arm(
        &mut player,
        &env,
        ItemInstance::new("sword_10").with_enchantment("speed_on_kill", 2),
    );
    let mut zone = Zone::new("pen", &env, 9).expect("pen");
    let target = zone.enemies()[0].id;
    let item = player.action_item(&env);

    let report = zone
        .process_combat(&mut player, target, &item, &env, Millis(1000))
        .expect("living target");
    assert!(report.flags.contains(HitFlags::FINAL_HIT));

    player.refresh_stats(&env, Millis(1500));
    assert_eq!(player.stat(StatKind::Speed), 20.0);

    player.refresh_stats(&env, Millis(4000));
    assert_eq!(player.stat(StatKind::Speed), 0.0);
}

/// A corpse awaiting the flush neither regenerates nor attacks.
#[test]
fn dead_enemy_is_inert_until_flush() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let center = Vec2::new(500.0, 500.0);
    let mut player = Player::new(&env, center);
    let mut zone = Zone::new("pit", &env, 3).expect("pit");
    place(&mut zone, 0, center);
    zone.enemies_mut()[0].combat.set_hp(0.0);

    zone.update(&mut player, Frame::new(Millis(5000), 0.016), &env);

    assert_eq!(zone.enemies()[0].combat.hp(), 0.0);
    assert_eq!(player.combat.hp(), 100.0);
    assert_eq!(zone.pending_count(), 0);
}

#[test]
fn attacking_a_missing_target_does_nothing() {
    let tables = tables();
    let config = config();
    let env = Env::from_tables(&tables, &config);

    let mut player = Player::new(&env, Vec2::new(300.0, 300.0));
    let mut zone = Zone::new("arena", &env, 7).expect("arena");
    let item = player.action_item(&env);

    let report = zone.process_combat(
        &mut player,
        grindstone_core::EntityId(999),
        &item,
        &env,
        Millis(1000),
    );
    assert!(report.is_none());
    assert_eq!(zone.pending_count(), 0);
}

// ====================================================================
// Entity invariants
// ====================================================================

#[test]
fn hp_never_exceeds_max_after_update() {
    let config = CombatConfig::default();
    let mut entity = CombatEntity::new(Combatant::Player, 100.0, 1.0, 7.0, 1000);
    let values = config.abilities.clone();

    for step in 1..=50u64 {
        if step % 3 == 0 {
            entity.take_damage(IncomingHit::new(4.0, DamageReason::Contact), &values);
        }
        entity.heal(step as f64);
        entity.update(Frame::new(Millis(step * 250), 0.25), Vec2::ZERO, None, &config);
        assert!(entity.hp() <= entity.max_hp());
    }
}

#[test]
fn knockback_decays_exponentially() {
    let config = CombatConfig::default();
    let mut entity = CombatEntity::new(Combatant::Player, 100.0, 1.0, 0.0, 1000);
    entity.take_damage(
        IncomingHit::new(0.0, DamageReason::Contact).with_knockback(Vec2::new(600.0, 0.0)),
        &config.abilities,
    );

    let dt = 0.05;
    for step in 1..=20 {
        entity.update(Frame::new(Millis(step * 50), dt), Vec2::ZERO, None, &config);
        let t = step as f64 * dt;
        let expected = 600.0 * (-config.knockback_friction * t).exp();
        assert!((entity.knockback().length() - expected).abs() < 1e-9);
    }
}
