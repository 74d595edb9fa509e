//! Full stat rebuild from the current equipment and progression snapshot.

use std::collections::BTreeMap;

use crate::combat::{ActiveEffect, EffectId};
use crate::env::{CounterKind, EnchantmentDefinition, Env};
use crate::equipment::{ItemInstance, Loadout};
use crate::progression::{Beastiary, SkillBook};
use crate::state::Millis;

use super::{SourceCategory, StatBlock, StatKind, StatSource, TempBonuses, damage_reduction};

/// Everything the aggregator reads besides static data and temporary bonuses.
#[derive(Clone, Copy, Debug)]
pub struct StatInputs<'a> {
    pub base: &'a StatBlock,
    pub loadout: &'a Loadout,
    pub skills: &'a SkillBook,
    pub beastiary: &'a Beastiary,
}

/// An equipment set with at least one equipped piece.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSetBonus {
    pub set_id: String,
    pub name: String,
    pub pieces: u32,
    /// Base ids of the equipped items counted toward this set.
    pub contributors: Vec<String>,
    /// Abilities unlocked by the tiers currently met.
    pub effects: Vec<EffectId>,
}

/// Result of one stat rebuild.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSheet {
    totals: StatBlock,
    sources: Vec<StatSource>,
    active_effects: Vec<ActiveEffect>,
    set_bonuses: Vec<ActiveSetBonus>,
}

impl StatSheet {
    pub fn get(&self, stat: StatKind) -> f64 {
        self.totals.get(stat)
    }

    pub fn totals(&self) -> &StatBlock {
        &self.totals
    }

    pub fn sources(&self) -> &[StatSource] {
        &self.sources
    }

    pub fn sources_for(&self, stat: StatKind) -> impl Iterator<Item = &StatSource> {
        self.sources.iter().filter(move |source| source.stat == stat)
    }

    /// Effects in dispatch order: gear slots, then the active item, then sets.
    pub fn active_effects(&self) -> &[ActiveEffect] {
        &self.active_effects
    }

    pub fn set_bonuses(&self) -> &[ActiveSetBonus] {
        &self.set_bonuses
    }

    pub fn is_in_active_set(&self, base_id: &str) -> bool {
        self.set_bonuses
            .iter()
            .any(|bonus| !bonus.effects.is_empty() && bonus.contributors.iter().any(|id| id == base_id))
    }

    pub fn damage_reduction(&self, env: &Env<'_>) -> f64 {
        let config = env.config();
        damage_reduction(
            self.get(StatKind::Defense),
            config.defense_curve,
            config.max_damage_reduction,
        )
    }

    /// Totals plus the per-enemy beastiary bonus for `enemy_id`.
    pub fn against_enemy(&self, enemy_id: &str, beastiary: &Beastiary, env: &Env<'_>) -> StatBlock {
        let mut totals = self.totals;
        let level = beastiary.enemy_level(enemy_id, env) as f64;
        for (stat, per_level) in &env.config().beastiary.per_enemy_level {
            totals.add(*stat, per_level * level);
        }
        totals
    }
}

/// Builds [`StatSheet`]s from static data.
#[derive(Clone, Copy, Debug)]
pub struct StatAggregator<'a> {
    env: Env<'a>,
}

impl<'a> StatAggregator<'a> {
    pub fn new(env: Env<'a>) -> Self {
        Self { env }
    }

    /// Rebuild totals, sources, active effects and set bonuses in one pass.
    ///
    /// Expired temporary bonuses are removed from `temp` before summation.
    pub fn compute(&self, inputs: StatInputs<'_>, temp: &mut TempBonuses, now: Millis) -> StatSheet {
        temp.prune(now);

        let mut sheet = StatSheet::default();
        self.add_equipment(inputs.loadout, &mut sheet);
        if let Some(active) = inputs.loadout.active() {
            self.add_active_item(active, &mut sheet);
        }
        self.add_set_bonuses(inputs.loadout, &mut sheet);
        self.add_level_bonuses(inputs.skills, &mut sheet);
        self.add_beastiary(inputs.beastiary, &mut sheet);
        for bonus in temp.iter() {
            sheet.sources.push(StatSource::new(
                bonus.stat,
                SourceCategory::Temp,
                "Temporary Bonus",
                bonus.amount,
            ));
        }

        let mut totals = *inputs.base;
        for source in &sheet.sources {
            totals.add(source.stat, source.amount);
        }
        sheet.totals = totals;
        sheet
    }

    fn add_equipment(&self, loadout: &Loadout, sheet: &mut StatSheet) {
        for (_, instance) in loadout.equipped() {
            let Some(item) = self.env.item(&instance.base_id) else {
                continue;
            };

            for (stat, amount) in &item.stat_bonuses {
                sheet
                    .sources
                    .push(StatSource::new(*stat, SourceCategory::Gear, item.name.as_str(), *amount));
            }

            let label = format!("{} Enchantments", item.name);
            for roll in &instance.metadata.enchantments {
                let definition = self.env.enchantment(&roll.id);
                if let Some(definition) = definition {
                    for (stat, per_level) in &definition.stat_bonuses_per_level {
                        sheet.sources.push(StatSource::new(
                            *stat,
                            SourceCategory::GearEnchant,
                            label.as_str(),
                            per_level * roll.level as f64,
                        ));
                    }
                }
                if let Some(id) = effect_for_enchantment(&roll.id, definition) {
                    sheet
                        .active_effects
                        .push(ActiveEffect::new(id, roll.level, item.name.as_str()));
                }
            }
        }
    }

    fn add_active_item(&self, active: &ItemInstance, sheet: &mut StatSheet) {
        let Some(item) = self.env.item(&active.base_id) else {
            return;
        };

        for (stat, amount) in &item.stat_bonuses {
            sheet
                .sources
                .push(StatSource::new(*stat, SourceCategory::Active, item.name.as_str(), *amount));
        }

        for roll in &active.metadata.enchantments {
            let definition = self.env.enchantment(&roll.id);
            if let Some(definition) = definition {
                for (stat, per_level) in &definition.stat_bonuses_per_level {
                    sheet.sources.push(StatSource::new(
                        *stat,
                        SourceCategory::ActiveEnchant,
                        "Active Enchantments",
                        per_level * roll.level as f64,
                    ));
                }
            }
            if let Some(id) = effect_for_enchantment(&roll.id, definition) {
                sheet
                    .active_effects
                    .push(ActiveEffect::new(id, roll.level, item.name.as_str()));
            }
        }

        let Some(counter) = item.counter.as_deref().and_then(|id| self.env.counter(id)) else {
            return;
        };
        let value = match counter.kind {
            CounterKind::Kills => active.metadata.counters.kills,
            CounterKind::Xp => active.metadata.counters.xp,
        };
        if let Some((tier, bonuses)) = counter.tier_for(value) {
            let label = format!("{} (Tier {})", counter.name, tier + 1);
            for (stat, amount) in bonuses {
                sheet
                    .sources
                    .push(StatSource::new(*stat, SourceCategory::Counter, label.as_str(), *amount));
            }
        }
    }

    fn add_set_bonuses(&self, loadout: &Loadout, sheet: &mut StatSheet) {
        let mut counts: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (_, instance) in loadout.equipped() {
            let Some(set_id) = self.env.item(&instance.base_id).and_then(|item| item.set.as_deref()) else {
                continue;
            };
            counts
                .entry(set_id)
                .or_default()
                .push(instance.base_id.clone());
        }

        for (set_id, contributors) in counts {
            let pieces = contributors.len() as u32;
            let mut bonus = ActiveSetBonus {
                set_id: set_id.to_string(),
                name: set_id.to_string(),
                pieces,
                contributors,
                effects: Vec::new(),
            };

            if let Some(set) = self.env.set_bonus(set_id) {
                bonus.name = set.name.clone();
                for tier in set.tiers.iter().filter(|tier| pieces >= tier.pieces) {
                    let label = format!("{} ({} pcs)", set.name, tier.pieces);
                    for (stat, amount) in &tier.stats {
                        sheet
                            .sources
                            .push(StatSource::new(*stat, SourceCategory::Set, label.as_str(), *amount));
                    }
                    if let Some(effect) = tier.extra_ability {
                        bonus.effects.push(effect);
                        sheet
                            .active_effects
                            .push(ActiveEffect::new(effect, tier.pieces, set.name.as_str()));
                    }
                }
            }

            sheet.set_bonuses.push(bonus);
        }
    }

    fn add_level_bonuses(&self, skills: &SkillBook, sheet: &mut StatSheet) {
        for bonus in &self.env.config().level_bonuses {
            let level = skills.level(bonus.skill);
            sheet.sources.push(StatSource::new(
                bonus.stat,
                SourceCategory::Character,
                format!("{} Level", bonus.skill.label()),
                level as f64 * bonus.per_level,
            ));
        }
    }

    fn add_beastiary(&self, beastiary: &Beastiary, sheet: &mut StatSheet) {
        let total = beastiary.total_level(&self.env);
        if total == 0 {
            return;
        }
        sheet.sources.push(StatSource::new(
            StatKind::MaxHp,
            SourceCategory::Character,
            "Beastiary Levels",
            total as f64 * self.env.config().beastiary.max_hp_per_level,
        ));
    }
}

/// Effect granted by an enchantment roll.
///
/// Enchantments named after an effect grant it directly; others grant their
/// `extra_ability`, and stat-only enchantments grant nothing.
pub(crate) fn effect_for_enchantment(
    id: &str,
    definition: Option<&EnchantmentDefinition>,
) -> Option<EffectId> {
    id.parse::<EffectId>()
        .ok()
        .or_else(|| definition.and_then(|def| def.extra_ability))
}
