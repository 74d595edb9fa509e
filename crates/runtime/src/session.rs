//! The frame driver and its builder.
use std::collections::BTreeMap;

use grindstone_core::env::{Direction, compute_seed};
use grindstone_core::{
    AttackReport, Body, CombatConfig, Env, EquipSlot, FlushReport, Frame, GatherReport,
    ItemInstance, Millis, Player, StatKind, StaticTables, TargetRef, Vec2, Zone,
};

use crate::error::{Result, RuntimeError};
use crate::events::SessionEvent;
use crate::input::{ClickEdge, FrameInput};
use crate::ledger::RewardLedger;

/// Session parameters chosen by the host.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Root seed; every zone draws its own stream from it.
    pub seed: u64,
    pub start_zone: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            start_zone: Player::DEFAULT_SAFE_ZONE.to_string(),
        }
    }
}

/// The primary action resolved this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameAction {
    Attack(AttackReport),
    Gather(GatherReport),
}

/// Everything one [`Session::tick`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub now: Millis,
    /// Zone the frame was simulated in.
    pub zone: String,
    pub action: Option<FrameAction>,
    pub flush: FlushReport,
    /// Sound ids to play, in request order.
    pub sounds: Vec<String>,
    /// The player was defeated and revived this frame.
    pub defeated: bool,
    pub events: Vec<SessionEvent>,
}

impl FrameReport {
    pub fn attack(&self) -> Option<&AttackReport> {
        match &self.action {
            Some(FrameAction::Attack(report)) => Some(report),
            _ => None,
        }
    }

    pub fn gather(&self) -> Option<&GatherReport> {
        match &self.action {
            Some(FrameAction::Gather(report)) => Some(report),
            _ => None,
        }
    }
}

/// Owns the content, the player and every visited zone.
///
/// Zones are created on first entry and keep their population when the
/// player leaves.
#[derive(Debug)]
pub struct Session {
    tables: StaticTables,
    config: CombatConfig,
    seed: u64,
    player: Player,
    zone: Zone,
    /// Visited zones other than the current one.
    parked: BTreeMap<String, Zone>,
    zones_created: u64,
    ledger: RewardLedger,
    clock: Millis,
    click: ClickEdge,
    /// Edge of a locked portal the player is still touching.
    blocked_portal: Option<Direction>,
}

impl Session {
    /// Create a new session builder.
    pub fn builder(tables: StaticTables, config: CombatConfig) -> SessionBuilder {
        SessionBuilder::new(tables, config)
    }

    pub fn env(&self) -> Env<'_> {
        Env::from_tables(&self.tables, &self.config)
    }

    pub fn now(&self) -> Millis {
        self.clock
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    pub fn current_zone_id(&self) -> &str {
        self.zone.id()
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn zone_mut(&mut self) -> &mut Zone {
        &mut self.zone
    }

    /// Ids of every zone created so far, the current one included.
    pub fn visited_zones(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.parked.keys().map(String::as_str).collect();
        ids.push(self.zone.id());
        ids.sort_unstable();
        ids
    }

    /// Put `item_id` in `slot`, returning whatever was there.
    pub fn equip(&mut self, slot: EquipSlot, item: ItemInstance) -> Result<Option<ItemInstance>> {
        self.check_item(&item)?;
        let previous = self.player.loadout.equip(slot, item);
        self.refresh_player();
        Ok(previous)
    }

    /// Make `item` the active hotbar item, or clear it with `None`.
    pub fn set_active(&mut self, item: Option<ItemInstance>) -> Result<Option<ItemInstance>> {
        if let Some(item) = &item {
            self.check_item(item)?;
        }
        let previous = self.player.loadout.set_active(item);
        self.refresh_player();
        Ok(previous)
    }

    fn check_item(&self, item: &ItemInstance) -> Result<()> {
        if self.tables.items.contains_key(&item.base_id) {
            Ok(())
        } else {
            Err(RuntimeError::UnknownItem {
                item: item.base_id.clone(),
            })
        }
    }

    fn refresh_player(&mut self) {
        let env = Env::from_tables(&self.tables, &self.config);
        self.player.refresh_stats(&env, self.clock);
    }

    /// Advance the session by `dt` seconds.
    pub fn tick(&mut self, dt: f64, input: &FrameInput) -> Result<FrameReport> {
        self.clock = self.clock + (dt * 1000.0).round() as u64;
        let frame = Frame::new(self.clock, dt);
        let clicked = self.click.update(input.primary_held);

        let mut report = FrameReport {
            now: self.clock,
            zone: self.zone.id().to_string(),
            ..FrameReport::default()
        };

        let portal = {
            let env = Env::from_tables(&self.tables, &self.config);
            let player = &mut self.player;
            let zone = &mut self.zone;

            zone.update_player(player, frame, input.direction, &env);
            zone.update(player, frame, &env);

            let item = player.action_item(&env);
            let (trigger, speed) = if item.is_weapon() {
                (clicked, player.stat(StatKind::AttackSpeed))
            } else {
                (input.primary_held, player.stat(StatKind::ToolSpeed))
            };
            if trigger && player.cooldowns.ready(&item, frame.now, speed) {
                let targeting = zone.target_info(player.center(), input.aim, &item);
                if let Some(target) = targeting.target {
                    player.cooldowns.mark_used(&item, frame.now);
                    report.action = match target {
                        TargetRef::Enemy(id) => zone
                            .process_combat(player, id, &item, &env, frame.now)
                            .map(FrameAction::Attack),
                        TargetRef::Node(id) => {
                            zone.gather(player, id, &item, &env).map(FrameAction::Gather)
                        }
                    };
                }
            }

            report.flush = zone.flush_combat_results(player, &mut self.ledger, &env, frame.now);
            report.sounds = zone.drain_sounds();

            zone.definition()
                .portal_touching(&player.body)
                .map(|(edge, target)| (edge, target.to_string()))
        };

        if report.flush.player_defeated || self.player.is_defeated() {
            let respawn = self.player.last_safe_zone.clone();
            tracing::info!(zone = self.zone.id(), respawn = %respawn, "player defeated");
            self.enter_zone(&respawn, None, &mut report.events)?;
            self.player.combat.revive();
            self.blocked_portal = None;
            report.defeated = true;
            report.events.push(SessionEvent::PlayerDefeated {
                respawn_zone: respawn,
            });
            return Ok(report);
        }

        match portal {
            Some((edge, target)) => self.step_through(edge, &target, &mut report.events)?,
            None => self.blocked_portal = None,
        }

        Ok(report)
    }

    /// Walk through the portal on `edge` of the current zone.
    pub fn travel(&mut self, edge: Direction) -> Result<Vec<SessionEvent>> {
        let target = self
            .zone()
            .definition()
            .connections
            .get(&edge)
            .cloned()
            .ok_or_else(|| RuntimeError::NotConnected {
                zone: self.zone.id().to_string(),
                direction: edge,
            })?;
        let definition = self
            .tables
            .zones
            .get(&target)
            .ok_or_else(|| RuntimeError::UnknownZone { zone: target.clone() })?;
        if !definition.admits(&self.player.skills) {
            return Err(RuntimeError::ZoneLocked { zone: target });
        }

        let mut events = Vec::new();
        self.enter_zone(&target, Some(edge), &mut events)?;
        Ok(events)
    }

    fn step_through(&mut self, edge: Direction, target: &str, events: &mut Vec<SessionEvent>) -> Result<()> {
        let admits = self
            .tables
            .zones
            .get(target)
            .is_some_and(|definition| definition.admits(&self.player.skills));
        if admits {
            self.blocked_portal = None;
            return self.enter_zone(target, Some(edge), events);
        }
        if self.blocked_portal != Some(edge) {
            tracing::debug!(zone = target, "portal locked");
            events.push(SessionEvent::ZoneLocked {
                zone: target.to_string(),
            });
            self.blocked_portal = Some(edge);
        }
        Ok(())
    }

    /// Move the player into `zone_id`, creating the zone on first visit.
    fn enter_zone(&mut self, zone_id: &str, via: Option<Direction>, events: &mut Vec<SessionEvent>) -> Result<()> {
        let env = Env::from_tables(&self.tables, &self.config);
        let definition = env.zone(zone_id).ok_or_else(|| RuntimeError::UnknownZone {
            zone: zone_id.to_string(),
        })?;

        if zone_id != self.zone.id() {
            let next = match self.parked.remove(zone_id) {
                Some(zone) => zone,
                None => {
                    let zone = spawn_zone(zone_id, &env, self.seed, self.zones_created)?;
                    self.zones_created += 1;
                    events.push(SessionEvent::ZoneDiscovered {
                        zone: zone_id.to_string(),
                    });
                    zone
                }
            };
            let previous = std::mem::replace(&mut self.zone, next);
            self.parked.insert(previous.id().to_string(), previous);
        }

        let entry = definition.entry_point(via);
        self.player.body = Body::centered_at(entry, self.player.body.size);

        if definition.safe && self.player.last_safe_zone != zone_id {
            self.player.last_safe_zone = zone_id.to_string();
            events.push(SessionEvent::SafeZoneUpdated {
                zone: zone_id.to_string(),
            });
        }

        tracing::info!(zone = zone_id, via = ?via, "entered zone");
        events.push(SessionEvent::ZoneEntered {
            zone: zone_id.to_string(),
            via,
        });
        Ok(())
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    tables: StaticTables,
    combat: CombatConfig,
    config: SessionConfig,
    loadout: Vec<(EquipSlot, ItemInstance)>,
    active: Option<ItemInstance>,
}

impl SessionBuilder {
    fn new(tables: StaticTables, combat: CombatConfig) -> Self {
        Self {
            tables,
            combat,
            config: SessionConfig::default(),
            loadout: Vec::new(),
            active: None,
        }
    }

    /// Override session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn start_zone(mut self, zone: impl Into<String>) -> Self {
        self.config.start_zone = zone.into();
        self
    }

    pub fn equip(mut self, slot: EquipSlot, item: ItemInstance) -> Self {
        self.loadout.push((slot, item));
        self
    }

    pub fn active(mut self, item: ItemInstance) -> Self {
        self.active = Some(item);
        self
    }

    /// Build the session and place the player at the center of the start
    /// zone.
    pub fn build(self) -> Result<Session> {
        let (player, zone) = {
            let env = Env::from_tables(&self.tables, &self.combat);
            let zone = spawn_zone(&self.config.start_zone, &env, self.config.seed, 0)?;
            (Player::new(&env, Vec2::ZERO), zone)
        };

        let mut session = Session {
            tables: self.tables,
            config: self.combat,
            seed: self.config.seed,
            player,
            zone,
            parked: BTreeMap::new(),
            zones_created: 1,
            ledger: RewardLedger::new(),
            clock: Millis::ZERO,
            click: ClickEdge::new(),
            blocked_portal: None,
        };

        for (slot, item) in self.loadout {
            session.equip(slot, item)?;
        }
        session.set_active(self.active)?;

        let mut events = Vec::new();
        session.enter_zone(&self.config.start_zone, None, &mut events)?;
        session.player.combat.revive();
        tracing::info!(
            zone = session.zone.id(),
            seed = session.seed,
            "session started"
        );
        Ok(session)
    }
}

/// Create zone `zone_id` with the `index`-th seed derived from `seed`.
fn spawn_zone(zone_id: &str, env: &Env<'_>, seed: u64, index: u64) -> Result<Zone> {
    if env.zone(zone_id).is_none() {
        return Err(RuntimeError::UnknownZone {
            zone: zone_id.to_string(),
        });
    }
    Ok(Zone::new(zone_id, env, compute_seed(seed, index, 0, 0))?)
}
