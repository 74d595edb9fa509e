//! Frame-level behavior of the session driver: input gating, reward
//! bookkeeping, defeat handling and zone travel.

use std::collections::BTreeMap;

use grindstone_content::ContentFactory;
use grindstone_core::env::{Direction, DropEntry};
use grindstone_core::{
    ActionProfile, Body, CombatConfig, EnemyTemplate, ItemDefinition, ItemInstance,
    ResourceTemplate, Skill, StatKind, StaticTables, Vec2, ZoneDefinition,
};
use grindstone_runtime::{FrameInput, RuntimeError, Session, SessionEvent};

// ============================================================================
// Fixtures
// ============================================================================

fn zone(name: &str, enemy: Option<&str>, count: usize) -> ZoneDefinition {
    ZoneDefinition {
        name: name.into(),
        size: 1000.0,
        enemy_spawn_table: enemy.map(|id| vec![(id.to_string(), 1.0)]).unwrap_or_default(),
        num_enemies: count,
        ..ZoneDefinition::default()
    }
}

fn tables() -> StaticTables {
    let sword = ItemDefinition {
        action: Some(ActionProfile {
            radius: 50.0,
            delay_ms: 100,
            damage: 10.0,
            knockback: 0.0,
        }),
        skill: Some(Skill::Combat),
        ..ItemDefinition::named("Practice Sword")
    };
    let pickaxe = ItemDefinition {
        action: Some(ActionProfile {
            radius: 60.0,
            delay_ms: 500,
            damage: 1.0,
            knockback: 0.0,
        }),
        skill: Some(Skill::Mining),
        ..ItemDefinition::named("Pickaxe")
    };
    let dummy = EnemyTemplate {
        hp: 1000.0,
        speed: 0.0,
        ..EnemyTemplate::named("Dummy")
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
        damage: 1000.0,
        ..EnemyTemplate::named("Brute")
    };
    let rock = ResourceTemplate {
        name: "Rock".into(),
        skill: Skill::Mining,
        hp: 10.0,
        reward_xp: 10,
        drop_table: vec![DropEntry::new("stone", 1.0, (1, 1))],
        ..ResourceTemplate::default()
    };

    let camp = ZoneDefinition {
        safe: true,
        connections: BTreeMap::from([
            (Direction::Left, "mine".to_string()),
            (Direction::Right, "pit".to_string()),
        ]),
        ..zone("Camp", None, 0)
    };
    let pit = ZoneDefinition {
        connections: BTreeMap::from([(Direction::Left, "camp".to_string())]),
        ..zone("Pit", Some("brute"), 1)
    };
    let mine = ZoneDefinition {
        requirements: BTreeMap::from([(Skill::Mining, 2)]),
        connections: BTreeMap::from([(Direction::Right, "camp".to_string())]),
        ..zone("Mine", None, 0)
    };
    let quarry = ZoneDefinition {
        resource_spawn_table: vec![("rock".into(), 1.0)],
        num_resources: 1,
        ..zone("Quarry", None, 0)
    };

    StaticTables::builder()
        .item("sword", sword)
        .item("pickaxe", pickaxe)
        .item("stone", ItemDefinition::named("Stone"))
        .enemy("dummy", dummy)
        .enemy("weakling", weakling)
        .enemy("brute", brute)
        .resource("rock", rock)
        .zone("arena", ZoneDefinition { safe: true, ..zone("Arena", Some("dummy"), 1) })
        .zone("pen", ZoneDefinition { safe: true, ..zone("Pen", Some("weakling"), 1) })
        .zone("camp", camp)
        .zone("pit", pit)
        .zone("mine", mine)
        .zone("quarry", quarry)
        .build()
}

fn config() -> CombatConfig {
    let mut config = CombatConfig::default();
    config.base_stats.insert(StatKind::CritChance, 0.0);
    config
}

fn session_in(zone: &str, active: Option<&str>) -> Session {
    let mut builder = Session::builder(tables(), config()).seed(11).start_zone(zone);
    if let Some(item) = active {
        builder = builder.active(ItemInstance::new(item));
    }
    builder.build().expect("session")
}

/// Park the zone's first enemy 40 units right of the player, outside contact
/// range, and return the aim point.
fn stage_enemy(session: &mut Session) -> Vec2 {
    let spot = session.player().center() + Vec2::new(40.0, 0.0);
    let enemy = &mut session.zone_mut().enemies_mut()[0];
    enemy.body = Body::centered_at(spot, enemy.body.size);
    spot
}

// ============================================================================
// Input gating
// ============================================================================

#[test]
fn weapon_fires_on_click_edge_only() {
    let mut session = session_in("arena", Some("sword"));
    let aim = stage_enemy(&mut session);
    let held = FrameInput::aim_at(aim).holding();

    let first = session.tick(0.05, &held).expect("tick");
    assert_eq!(first.attack().map(|attack| attack.damage), Some(10));

    // still held: no new edge even though the cooldown has elapsed
    let second = session.tick(0.1, &held).expect("tick");
    assert!(second.action.is_none());

    let released = session.tick(0.05, &FrameInput::aim_at(aim)).expect("tick");
    assert!(released.action.is_none());

    let again = session.tick(0.05, &held).expect("tick");
    assert!(again.attack().is_some());
    assert_eq!(session.zone().enemies()[0].combat.hp(), 980.0);
}

#[test]
fn click_without_target_keeps_cooldown() {
    let mut session = session_in("arena", Some("sword"));
    let aim = stage_enemy(&mut session);

    // aim away from the enemy
    let miss = FrameInput::aim_at(session.player().center() - Vec2::new(40.0, 0.0)).holding();
    assert!(session.tick(0.05, &miss).expect("tick").action.is_none());
    session.tick(0.01, &FrameInput::idle()).expect("tick");

    // 10 ms later the sword is still ready because the miss never used it
    let hit = session.tick(0.01, &FrameInput::aim_at(aim).holding()).expect("tick");
    assert!(hit.attack().is_some());
}

#[test]
fn tools_swing_while_held_on_their_own_cooldown() {
    let mut session = session_in("quarry", Some("pickaxe"));
    let spot = session.player().center() + Vec2::new(40.0, 0.0);
    let node = &mut session.zone_mut().resource_nodes_mut()[0];
    node.body = Body::centered_at(spot, node.body.size);

    let held = FrameInput::aim_at(spot).holding();
    let mut swings = 0;
    for _ in 0..10 {
        let report = session.tick(0.1, &held).expect("tick");
        if report.gather().is_some() {
            swings += 1;
        }
    }

    // swings at 100 ms and 600 ms
    assert_eq!(swings, 2);
    assert_eq!(session.ledger().xp(Skill::Mining), 2);
    assert_eq!(session.zone().resource_nodes()[0].hp, 8.0);
}

// ============================================================================
// Rewards
// ============================================================================

#[test]
fn kill_rewards_reach_the_ledger() {
    let mut session = session_in("pen", Some("sword"));
    let aim = stage_enemy(&mut session);
    let victim = session.zone().enemies()[0].id;

    let report = session.tick(0.05, &FrameInput::aim_at(aim).holding()).expect("tick");

    assert_eq!(report.flush.kills, 1);
    assert!(report.sounds.iter().any(|sound| sound == "enemy_death"));
    assert_eq!(session.ledger().kills_of("weakling"), 1);
    assert_eq!(session.ledger().xp(Skill::Combat), 12);
    assert_eq!(session.ledger().level_ups, vec![(Skill::Combat, 1)]);

    let population = session.zone().enemies();
    assert_eq!(population.len(), 1);
    assert_ne!(population[0].id, victim);
}

// ============================================================================
// Defeat and travel
// ============================================================================

#[test]
fn defeat_revives_in_last_safe_zone() {
    let mut session = session_in("camp", None);
    session.travel(Direction::Right).expect("open portal");
    assert_eq!(session.current_zone_id(), "pit");

    let center = session.player().center();
    let brute = &mut session.zone_mut().enemies_mut()[0];
    brute.body = Body::centered_at(center, brute.body.size);

    // contact attacks are off cooldown one second in
    let report = session.tick(1.0, &FrameInput::idle()).expect("tick");

    assert!(report.defeated);
    assert!(report.flush.player_defeated);
    assert!(report.events.contains(&SessionEvent::PlayerDefeated {
        respawn_zone: "camp".into()
    }));
    assert_eq!(session.current_zone_id(), "camp");
    let player = session.player();
    assert_eq!(player.combat.hp(), player.combat.max_hp());
    assert_eq!(player.center(), Vec2::new(500.0, 500.0));
}

#[test]
fn locked_portal_reports_once_then_opens() {
    let mut session = session_in("camp", None);
    assert!(matches!(
        session.travel(Direction::Left),
        Err(RuntimeError::ZoneLocked { zone }) if zone == "mine"
    ));

    session.player_mut().body = Body::centered_at(Vec2::new(10.0, 500.0), 30.0);
    let first = session.tick(0.016, &FrameInput::idle()).expect("tick");
    assert_eq!(first.events, vec![SessionEvent::ZoneLocked { zone: "mine".into() }]);
    let second = session.tick(0.016, &FrameInput::idle()).expect("tick");
    assert!(second.events.is_empty());

    session.player_mut().skills.gain_xp(Skill::Mining, 101);
    let third = session.tick(0.016, &FrameInput::idle()).expect("tick");
    assert!(third.events.contains(&SessionEvent::ZoneEntered {
        zone: "mine".into(),
        via: Some(Direction::Left),
    }));
    assert_eq!(session.current_zone_id(), "mine");
    // enters on the far edge of the new zone
    assert_eq!(session.player().center(), Vec2::new(950.0, 500.0));
}

#[test]
fn zones_keep_their_population_between_visits() {
    let mut session = session_in("camp", None);
    let first_visit = session.travel(Direction::Right).expect("to pit");
    assert!(first_visit.contains(&SessionEvent::ZoneDiscovered { zone: "pit".into() }));
    let ids: Vec<_> = session.zone().enemies().iter().map(|enemy| enemy.id).collect();

    session.travel(Direction::Left).expect("to camp");
    let second_visit = session.travel(Direction::Right).expect("to pit again");
    assert!(!second_visit.contains(&SessionEvent::ZoneDiscovered { zone: "pit".into() }));

    let again: Vec<_> = session.zone().enemies().iter().map(|enemy| enemy.id).collect();
    assert_eq!(ids, again);
    assert_eq!(session.visited_zones(), vec!["camp", "pit"]);
}

#[test]
fn unknown_start_zone_is_an_error() {
    let result = Session::builder(tables(), config()).start_zone("atlantis").build();
    assert!(matches!(result, Err(RuntimeError::UnknownZone { zone }) if zone == "atlantis"));
}

#[test]
fn unknown_item_cannot_be_equipped() {
    let mut session = session_in("camp", None);
    let err = session.set_active(Some(ItemInstance::new("excalibur"))).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownItem { .. }));
}

// ============================================================================
// Bundled content
// ============================================================================

#[test]
fn bundled_starter_zone_runs() {
    let content = ContentFactory::bundled().load().expect("bundled content");
    let mut session = Session::builder(content.tables, content.config)
        .seed(42)
        .active(ItemInstance::new("wooden_sword"))
        .build()
        .expect("session");

    for _ in 0..240 {
        session.tick(1.0 / 60.0, &FrameInput::idle()).expect("tick");
    }
    assert_eq!(session.current_zone_id(), "starter_zone");
    assert_eq!(session.player().last_safe_zone, "starter_zone");
    assert_eq!(session.zone().enemies().len(), 5);
}
