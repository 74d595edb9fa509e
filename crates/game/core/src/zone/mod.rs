//! A live zone: its enemies, resource nodes and deferred result queues.
//!
//! Every damage application made while resolving attacks, contact hits or
//! periodic effects appends a [`CombatResult`] to the zone's pending queue.
//! Nothing touches rewards, inventory or the enemy list at append time; the
//! frame driver calls [`Zone::flush_combat_results`] exactly once at the end
//! of a frame, which drains the queue in FIFO order and replaces whatever
//! died. Removing enemies only during the flush keeps every iteration over
//! `enemies` free of concurrent removal.
mod flush;
mod gather;
mod hooks;
mod resolver;

use std::collections::VecDeque;

use crate::actor::{Enemy, Player, ResourceNode};
use crate::combat::{AreaScope, CombatResult, Reflection};
use crate::config::AbilityValues;
use crate::env::{Env, RollStream, ZoneDefinition};
use crate::equipment::ActionItem;
use crate::error::CombatError;
use crate::state::{EntityId, Frame, Vec2};

pub use flush::FlushReport;
pub use gather::{GatherReport, GatherResult};
pub use hooks::{EffectHook, EffectHooks, HookAnchor, HookKind, SoundQueue};

/// Distance kept between spawn positions and the far zone edges.
const SPAWN_MARGIN: f64 = 20.0;

/// What the targeting reticle is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetRef {
    Enemy(EntityId),
    Node(EntityId),
}

/// Result of [`Zone::target_info`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Targeting {
    /// Reticle position, `radius` units from the player toward the aim.
    pub point: Vec2,
    pub radius: f64,
    pub target: Option<TargetRef>,
}

pub struct Zone {
    id: String,
    definition: ZoneDefinition,
    enemies: Vec<Enemy>,
    resource_nodes: Vec<ResourceNode>,
    pending_results: VecDeque<CombatResult>,
    pending_gathers: VecDeque<GatherResult>,
    hooks: EffectHooks,
    sounds: SoundQueue,
    rng: RollStream,
    next_id: EntityId,
}

impl Zone {
    /// Build zone `id` from static data and spawn its initial population.
    ///
    /// Spawn tables are validated up front: a zone that can never replace a
    /// defeated enemy is a data error and is rejected here rather than at
    /// the first kill.
    pub fn new(id: &str, env: &Env<'_>, seed: u64) -> Result<Self, CombatError> {
        let definition = env
            .zone(id)
            .ok_or_else(|| CombatError::UnknownZone { zone: id.to_string() })?
            .clone();
        validate(id, &definition, env)?;

        let mut zone = Self {
            id: id.to_string(),
            definition,
            enemies: Vec::new(),
            resource_nodes: Vec::new(),
            pending_results: VecDeque::new(),
            pending_gathers: VecDeque::new(),
            hooks: EffectHooks::new(),
            sounds: SoundQueue::new(),
            rng: RollStream::new(seed),
            next_id: EntityId::FIRST_SPAWNED,
        };

        for _ in 0..zone.definition.num_enemies {
            if let Some(enemy) = zone.spawn_enemy(env) {
                zone.enemies.push(enemy);
            }
        }
        for _ in 0..zone.definition.num_resources {
            if let Some(node) = zone.spawn_resource_node(env) {
                zone.resource_nodes.push(node);
            }
        }

        tracing::debug!(
            zone = %zone.id,
            enemies = zone.enemies.len(),
            nodes = zone.resource_nodes.len(),
            "zone prepared"
        );
        Ok(zone)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn definition(&self) -> &ZoneDefinition {
        &self.definition
    }

    pub fn size(&self) -> f64 {
        self.definition.size
    }

    pub fn is_safe(&self) -> bool {
        self.definition.safe
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Mutable access to live enemies. The list itself only changes during
    /// the flush.
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn resource_nodes(&self) -> &[ResourceNode] {
        &self.resource_nodes
    }

    pub fn resource_nodes_mut(&mut self) -> &mut [ResourceNode] {
        &mut self.resource_nodes
    }

    pub fn node(&self, id: EntityId) -> Option<&ResourceNode> {
        self.resource_nodes.iter().find(|node| node.id == id)
    }

    pub fn pending_results(&self) -> impl Iterator<Item = &CombatResult> {
        self.pending_results.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.pending_results.len() + self.pending_gathers.len()
    }

    pub fn hooks(&self) -> &EffectHooks {
        &self.hooks
    }

    /// Sounds emitted since the last drain, in emission order.
    pub fn drain_sounds(&mut self) -> Vec<String> {
        self.hooks.drain_sounds(&mut self.sounds);
        self.sounds.drain()
    }

    /// Reticle position and the enemy or node under it.
    ///
    /// Weapons consider living enemies, tools consider non-depleted nodes of
    /// their skill. Candidates must lie within `radius` of the reticle; the
    /// one whose bounds contain it wins, otherwise the nearest.
    pub fn target_info(&self, origin: Vec2, aim: Vec2, item: &ActionItem) -> Targeting {
        let radius = item.profile.radius;
        let point = origin + (aim - origin).normalize_or_zero() * radius;

        let target = if item.is_weapon() {
            let candidates = self
                .enemies
                .iter()
                .filter(|enemy| enemy.combat.is_alive())
                .map(|enemy| (enemy.id, &enemy.body));
            pick_target(candidates, point, radius).map(TargetRef::Enemy)
        } else {
            let candidates = self
                .resource_nodes
                .iter()
                .filter(|node| !node.is_depleted() && node.skill == item.skill)
                .map(|node| (node.id, &node.body));
            pick_target(candidates, point, radius).map(TargetRef::Node)
        };

        Targeting { point, radius, target }
    }

    /// Tick the player with area access for periodic effects such as the
    /// phoenix aura. Reflections raised by enemies it hits go back to the
    /// player.
    pub fn update_player(&mut self, player: &mut Player, frame: Frame, direction: Vec2, env: &Env<'_>) {
        let values = &env.config().abilities;
        let size = self.definition.size;
        let reflections = {
            let mut area = AreaScope::new(
                &mut self.enemies,
                &mut self.pending_results,
                &mut self.hooks,
                frame.now,
                values,
            );
            player.update(frame, direction, size, Some(&mut area), env);
            area.take_reflections()
        };
        self.apply_reflections(player, reflections, values);
    }

    /// Prune hooks, then run every enemy: AI, contact attack, combat tick,
    /// movement.
    pub fn update(&mut self, player: &mut Player, frame: Frame, env: &Env<'_>) {
        let config = env.config();
        let values = &config.abilities;
        let size = self.definition.size;
        self.hooks.prune(frame.now);

        let mut reflections = Vec::new();
        for enemy in &mut self.enemies {
            // dead enemies wait for the flush untouched
            if !enemy.combat.is_alive() {
                continue;
            }
            let player_center = player.center();
            self.sounds.extend(enemy.think(player_center, frame.dt));

            if let Some(hit) = enemy.try_contact(player_center, frame.now, &config.contact) {
                if let Some(outcome) = player.combat.take_damage(hit, values) {
                    tracing::debug!(
                        enemy = %enemy.id,
                        damage = outcome.result.final_damage(),
                        "contact hit on player"
                    );
                    self.pending_results.push_back(outcome.result);
                    reflections.extend(outcome.reflections);
                }
            }

            let center = enemy.center();
            let displacement = enemy.combat.update(frame, center, None, config);
            enemy.integrate(displacement, frame.dt, size);
        }

        self.apply_reflections(player, reflections, values);
        self.hooks.drain_sounds(&mut self.sounds);
    }

    /// Apply one-level-deep reflected damage and queue the results.
    fn apply_reflections(&mut self, player: &mut Player, reflections: Vec<Reflection>, values: &AbilityValues) {
        for reflection in reflections {
            let result = if reflection.target.is_player() {
                player.combat.receive_reflection(&reflection, values)
            } else {
                let target = reflection.target.entity();
                self.enemies
                    .iter_mut()
                    .find(|enemy| enemy.id == target)
                    .and_then(|enemy| {
                        if reflection.amount > 0.0 {
                            enemy.was_hit = true;
                        }
                        enemy.combat.receive_reflection(&reflection, values)
                    })
            };
            if let Some(result) = result {
                tracing::debug!(
                    target = %reflection.target.entity(),
                    effect = %reflection.effect,
                    damage = result.final_damage(),
                    "reflected damage"
                );
                self.pending_results.push_back(result);
            }
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    fn spawn_position(&mut self) -> Vec2 {
        let max = (self.definition.size - SPAWN_MARGIN).max(0.0) as u32;
        let x = self.rng.range_inclusive(0, max);
        let y = self.rng.range_inclusive(0, max);
        Vec2::new(x as f64, y as f64)
    }

    /// Roll a fresh enemy from the spawn table. `None` only if the table
    /// names data that vanished after validation.
    fn spawn_enemy(&mut self, env: &Env<'_>) -> Option<Enemy> {
        let position = self.spawn_position();
        let template_id = choose_weighted(&self.definition.enemy_spawn_table, &mut self.rng)?.to_string();
        let Some(template) = env.enemy(&template_id) else {
            tracing::warn!(zone = %self.id, enemy = %template_id, "spawn table names unknown enemy");
            return None;
        };
        let id = self.allocate_id();
        let brain_rng = self.rng.fork(id.0);
        Some(Enemy::spawn(
            id,
            &template_id,
            template,
            position,
            brain_rng,
            env.config().regen_interval_ms,
        ))
    }

    fn spawn_resource_node(&mut self, env: &Env<'_>) -> Option<ResourceNode> {
        let position = self.spawn_position();
        let node_id = choose_weighted(&self.definition.resource_spawn_table, &mut self.rng)?.to_string();
        let Some(template) = env.resource(&node_id) else {
            tracing::warn!(zone = %self.id, node = %node_id, "spawn table names unknown resource node");
            return None;
        };
        let id = self.allocate_id();
        Some(ResourceNode::spawn(id, &node_id, template, position))
    }
}

impl std::fmt::Debug for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zone")
            .field("id", &self.id)
            .field("enemies", &self.enemies.len())
            .field("resource_nodes", &self.resource_nodes.len())
            .field("pending_results", &self.pending_results.len())
            .field("pending_gathers", &self.pending_gathers.len())
            .finish_non_exhaustive()
    }
}

fn validate(id: &str, definition: &ZoneDefinition, env: &Env<'_>) -> Result<(), CombatError> {
    if definition.num_enemies > 0 && definition.enemy_spawn_table.is_empty() {
        return Err(CombatError::EmptySpawnTable { zone: id.to_string() });
    }
    for (enemy_id, _) in &definition.enemy_spawn_table {
        let template = env.enemy(enemy_id).ok_or_else(|| CombatError::UnknownEnemy {
            zone: id.to_string(),
            enemy: enemy_id.clone(),
        })?;
        if template.weight <= 0.0 {
            return Err(CombatError::InvalidWeight {
                enemy: enemy_id.clone(),
                weight: template.weight,
            });
        }
    }
    if definition.num_resources > 0 && definition.resource_spawn_table.is_empty() {
        return Err(CombatError::EmptySpawnTable { zone: id.to_string() });
    }
    for (node_id, _) in &definition.resource_spawn_table {
        if env.resource(node_id).is_none() {
            return Err(CombatError::UnknownResourceNode {
                zone: id.to_string(),
                node: node_id.clone(),
            });
        }
    }
    Ok(())
}

/// Cumulative-weight pick over `(id, weight)` entries; falls back to the
/// first entry when rounding leaves the roll past the last bucket.
fn choose_weighted<'t>(table: &'t [(String, f64)], rng: &mut RollStream) -> Option<&'t str> {
    let (first, _) = table.first()?;
    let total: f64 = table.iter().map(|(_, weight)| weight).sum();
    let roll = rng.uniform(0.0, total);
    let mut acc = 0.0;
    for (id, weight) in table {
        acc += weight;
        if roll <= acc {
            return Some(id);
        }
    }
    Some(first)
}

fn pick_target<'b>(
    candidates: impl Iterator<Item = (EntityId, &'b crate::state::Body)>,
    point: Vec2,
    radius: f64,
) -> Option<EntityId> {
    let in_range: Vec<_> = candidates
        .map(|(id, body)| (id, body, body.center().distance(point)))
        .filter(|(_, _, distance)| *distance <= radius)
        .collect();

    in_range
        .iter()
        .find(|(_, body, _)| body.contains(point))
        .or_else(|| in_range.iter().min_by(|a, b| a.2.total_cmp(&b.2)))
        .map(|(id, _, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActionProfile, CombatConfig};
    use crate::env::{EnemyTemplate, ResourceTemplate, StaticTables};
    use crate::progression::Skill;

    fn tables() -> StaticTables {
        StaticTables::builder()
            .enemy("slime", EnemyTemplate { hp: 20.0, ..EnemyTemplate::named("Slime") })
            .enemy("zombie", EnemyTemplate { hp: 40.0, ..EnemyTemplate::named("Zombie") })
            .resource(
                "oak_tree",
                ResourceTemplate {
                    name: "Oak Tree".into(),
                    skill: Skill::Woodcutting,
                    hp: 3.0,
                    ..ResourceTemplate::default()
                },
            )
            .zone(
                "meadow",
                ZoneDefinition {
                    name: "Meadow".into(),
                    enemy_spawn_table: vec![("slime".into(), 3.0), ("zombie".into(), 1.0)],
                    num_enemies: 6,
                    resource_spawn_table: vec![("oak_tree".into(), 1.0)],
                    num_resources: 2,
                    ..ZoneDefinition::default()
                },
            )
            .zone(
                "broken",
                ZoneDefinition {
                    num_enemies: 3,
                    ..ZoneDefinition::default()
                },
            )
            .build()
    }

    #[test]
    fn spawns_initial_population_with_unique_ids() {
        let tables = tables();
        let config = CombatConfig::default();
        let env = Env::from_tables(&tables, &config);
        let zone = Zone::new("meadow", &env, 42).expect("valid zone");

        assert_eq!(zone.enemies().len(), 6);
        assert_eq!(zone.resource_nodes().len(), 2);
        let mut ids: Vec<_> = zone
            .enemies()
            .iter()
            .map(|enemy| enemy.id)
            .chain(zone.resource_nodes().iter().map(|node| node.id))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        for enemy in zone.enemies() {
            assert!(enemy.body.pos.x >= 0.0 && enemy.body.pos.x <= zone.size() - SPAWN_MARGIN);
        }
    }

    #[test]
    fn empty_spawn_table_is_rejected() {
        let tables = tables();
        let config = CombatConfig::default();
        let env = Env::from_tables(&tables, &config);
        let err = Zone::new("broken", &env, 1).expect_err("empty table");
        assert_eq!(err, CombatError::EmptySpawnTable { zone: "broken".into() });
        assert_eq!(
            Zone::new("nowhere", &env, 1).expect_err("unknown"),
            CombatError::UnknownZone { zone: "nowhere".into() }
        );
    }

    #[test]
    fn weighted_choice_covers_every_entry() {
        let table = vec![("a".to_string(), 1.0), ("b".to_string(), 1.0)];
        let mut rng = RollStream::new(5);
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..200 {
            match choose_weighted(&table, &mut rng) {
                Some("a") => seen_a = true,
                Some("b") => seen_b = true,
                other => panic!("unexpected pick {other:?}"),
            }
        }
        assert!(seen_a && seen_b);
        assert_eq!(choose_weighted(&[], &mut rng), None);
    }

    #[test]
    fn targeting_prefers_body_under_reticle() {
        let tables = tables();
        let config = CombatConfig::default();
        let env = Env::from_tables(&tables, &config);
        let mut zone = Zone::new("meadow", &env, 3).expect("valid zone");

        let origin = Vec2::new(400.0, 400.0);
        let sword = ActionItem {
            id: Some("sword".into()),
            profile: ActionProfile { radius: 50.0, delay_ms: 500, damage: 10.0, knockback: 300.0 },
            skill: Skill::Combat,
        };
        // reticle lands at (450, 400)
        let enemies = zone.enemies_mut();
        enemies[0].body.pos = Vec2::new(440.0, 390.0);
        enemies[1].body.pos = Vec2::new(470.0, 390.0);
        for enemy in enemies.iter_mut().skip(2) {
            enemy.body.pos = Vec2::new(0.0, 0.0);
        }
        let first = zone.enemies()[0].id;

        let targeting = zone.target_info(origin, Vec2::new(900.0, 400.0), &sword);
        assert_eq!(targeting.point, Vec2::new(450.0, 400.0));
        assert_eq!(targeting.target, Some(TargetRef::Enemy(first)));

        let axe = ActionItem { skill: Skill::Mining, ..sword };
        assert_eq!(zone.target_info(origin, Vec2::new(900.0, 400.0), &axe).target, None);
    }
}
