use std::collections::BTreeSet;

use crate::combat::{AreaScope, CombatEntity, Combatant, EffectId};
use crate::config::PlayerRules;
use crate::env::Env;
use crate::equipment::{ActionItem, Cooldowns, Loadout};
use crate::progression::{Beastiary, SkillBook};
use crate::state::{Body, Frame, Millis, Vec2};
use crate::stats::{
    StatAggregator, StatBlock, StatInputs, StatKind, StatSheet, TempBonuses, effect_for_enchantment,
};

/// The controllable character.
///
/// Stats are rebuilt from equipment and progression through
/// [`refresh_stats`](Player::refresh_stats), which also re-syncs the combat
/// entity's max hp, regeneration, damage reduction and effect list.
#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub loadout: Loadout,
    pub skills: SkillBook,
    pub beastiary: Beastiary,
    pub temp: TempBonuses,
    pub cooldowns: Cooldowns,
    pub combat: CombatEntity,
    /// Zone the player returns to when defeated.
    pub last_safe_zone: String,
    base: StatBlock,
    sheet: StatSheet,
}

impl Player {
    pub const DEFAULT_SAFE_ZONE: &'static str = "starter_zone";

    pub fn new(env: &Env<'_>, center: Vec2) -> Self {
        let config = env.config();
        let base = config.base_stat_block();
        let max_hp = base.get(StatKind::MaxHp);
        let mut player = Self {
            body: Body::centered_at(center, config.player.size),
            loadout: Loadout::new(),
            skills: SkillBook::new(),
            beastiary: Beastiary::new(),
            temp: TempBonuses::new(),
            cooldowns: Cooldowns::new(),
            combat: CombatEntity::new(Combatant::Player, max_hp, 1.0, 0.0, config.regen_interval_ms),
            last_safe_zone: Self::DEFAULT_SAFE_ZONE.to_string(),
            base,
            sheet: StatSheet::default(),
        };
        player.refresh_stats(env, Millis::ZERO);
        player.combat.revive();
        player
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Stats as of the last [`Player::refresh_stats`]. That runs every frame
    /// in [`Player::update`] and again at the start of each attack, so loadout
    /// edits between those points are not visible here yet.
    pub fn sheet(&self) -> &StatSheet {
        &self.sheet
    }

    pub fn stat(&self, stat: StatKind) -> f64 {
        self.sheet.get(stat)
    }

    pub fn is_defeated(&self) -> bool {
        !self.combat.is_alive()
    }

    /// Rebuild the stat sheet and push derived values into the combat entity.
    pub fn refresh_stats(&mut self, env: &Env<'_>, now: Millis) -> &StatSheet {
        let inputs = StatInputs {
            base: &self.base,
            loadout: &self.loadout,
            skills: &self.skills,
            beastiary: &self.beastiary,
        };
        self.sheet = StatAggregator::new(*env).compute(inputs, &mut self.temp, now);
        self.combat.sync_vitals(
            self.sheet.get(StatKind::MaxHp),
            self.sheet.get(StatKind::Vitality),
            self.sheet.damage_reduction(env),
        );
        self.combat
            .set_active_effects(self.sheet.active_effects().to_vec());
        &self.sheet
    }

    /// `1 + speed/100`, clamped to the configured range.
    pub fn speed_multiplier(&self, rules: &PlayerRules) -> f64 {
        (1.0 + self.stat(StatKind::Speed) / 100.0)
            .clamp(rules.min_speed_multiplier, rules.max_speed_multiplier)
    }

    /// Weapon or tool behind the active item; the fist when nothing usable
    /// is active.
    pub fn action_item(&self, env: &Env<'_>) -> ActionItem {
        self.loadout
            .active()
            .and_then(|active| ActionItem::from_item(&active.base_id, env))
            .unwrap_or_else(|| ActionItem::fist(env))
    }

    /// Abilities tied to the active item through its enchantments or its own
    /// `extra_ability`. Kills by these effects count toward the item's counter.
    pub fn active_item_effect_sources(&self, env: &Env<'_>) -> BTreeSet<EffectId> {
        let mut sources = BTreeSet::new();
        let Some(active) = self.loadout.active() else {
            return sources;
        };
        for roll in &active.metadata.enchantments {
            if let Some(id) = effect_for_enchantment(&roll.id, env.enchantment(&roll.id)) {
                sources.insert(id);
            }
        }
        if let Some(id) = env.item(&active.base_id).and_then(|item| item.extra_ability) {
            sources.insert(id);
        }
        sources
    }

    /// Tick combat state and walk toward `direction`.
    ///
    /// Periodic effects that hit enemies need `area`; without it they still
    /// keep their own timers.
    pub fn update(
        &mut self,
        frame: Frame,
        direction: Vec2,
        zone_size: f64,
        area: Option<&mut AreaScope<'_>>,
        env: &Env<'_>,
    ) {
        let config = env.config();
        self.refresh_stats(env, frame.now);

        let center = self.center();
        let displacement = self.combat.update(frame, center, area, config);
        self.body.pos += displacement;

        let direction = direction.normalize_or_zero();
        if direction != Vec2::ZERO {
            let speed = config.player.base_speed * self.speed_multiplier(&config.player);
            self.body.pos += direction * speed * frame.dt;
        }
        self.body.clamp_to_zone(zone_size);
    }

    /// Full hp, no knockback, standing at `center`.
    pub fn revive_at(&mut self, center: Vec2) {
        self.combat.revive();
        self.body = Body::centered_at(center, self.body.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::env::{ItemDefinition, StaticTables};
    use crate::equipment::{EquipSlot, ItemInstance};

    fn tables() -> StaticTables {
        StaticTables::builder()
            .item(
                "boots_of_speed",
                ItemDefinition {
                    slot: Some(EquipSlot::Feet),
                    stat_bonuses: [(StatKind::Speed, 500.0)].into(),
                    ..ItemDefinition::named("Boots of Speed")
                },
            )
            .item(
                "storm_blade",
                ItemDefinition {
                    extra_ability: Some(EffectId::ChainLightning),
                    ..ItemDefinition::named("Storm Blade")
                },
            )
            .build()
    }

    #[test]
    fn speed_multiplier_is_clamped() {
        let tables = tables();
        let config = CombatConfig::default();
        let env = Env::from_tables(&tables, &config);
        let mut player = Player::new(&env, Vec2::new(100.0, 100.0));
        assert_eq!(player.speed_multiplier(&config.player), 1.0);

        player
            .loadout
            .equip(EquipSlot::Feet, ItemInstance::new("boots_of_speed"));
        player.refresh_stats(&env, Millis(0));
        assert_eq!(player.speed_multiplier(&config.player), 3.0);
    }

    #[test]
    fn fist_when_active_item_cannot_swing() {
        let tables = tables();
        let config = CombatConfig::default();
        let env = Env::from_tables(&tables, &config);
        let mut player = Player::new(&env, Vec2::ZERO);
        player
            .loadout
            .set_active(Some(ItemInstance::new("storm_blade").with_enchantment("cleave", 1)));

        assert_eq!(player.action_item(&env).id, None);
        let sources = player.active_item_effect_sources(&env);
        assert!(sources.contains(&EffectId::ChainLightning));
        assert!(sources.contains(&EffectId::Cleave));
    }

    #[test]
    fn starts_at_full_base_hp() {
        let tables = tables();
        let config = CombatConfig::default();
        let env = Env::from_tables(&tables, &config);
        let player = Player::new(&env, Vec2::ZERO);
        assert_eq!(player.combat.hp(), 100.0);
        assert_eq!(player.combat.max_hp(), 100.0);
        assert_eq!(player.combat.regen_rate(), 1.0);
    }
}
