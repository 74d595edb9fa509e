use std::collections::BTreeMap;

use crate::config::ActionProfile;
use crate::env::Env;
use crate::progression::Skill;
use crate::state::Millis;

/// Weapon or tool resolved from the active item, or the bare fist.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionItem {
    /// Base item id; `None` for the fist.
    pub id: Option<String>,
    pub profile: ActionProfile,
    pub skill: Skill,
}

impl ActionItem {
    pub fn fist(env: &Env<'_>) -> Self {
        Self {
            id: None,
            profile: env.config().fist,
            skill: Skill::Combat,
        }
    }

    /// Action for `base_id`, or `None` if the item cannot swing.
    pub fn from_item(base_id: &str, env: &Env<'_>) -> Option<Self> {
        let item = env.item(base_id)?;
        let profile = item.action?;
        Some(Self {
            id: Some(base_id.to_string()),
            profile,
            skill: item.skill.unwrap_or(Skill::Combat),
        })
    }

    pub fn is_weapon(&self) -> bool {
        self.skill == Skill::Combat
    }

    fn cooldown_key(&self) -> &str {
        self.id.as_deref().unwrap_or("fist")
    }

    /// Cooldown after attack-speed scaling.
    pub fn effective_delay_ms(&self, attack_speed: f64) -> f64 {
        self.profile.delay_ms as f64 / (1.0 + attack_speed / 100.0)
    }
}

/// Last-use timestamps per action item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cooldowns {
    last_used: BTreeMap<String, Millis>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `item` may swing at `now`. Never-used items are ready.
    pub fn ready(&self, item: &ActionItem, now: Millis, attack_speed: f64) -> bool {
        match self.last_used.get(item.cooldown_key()) {
            Some(last) => now.since(*last) as f64 >= item.effective_delay_ms(attack_speed),
            None => true,
        }
    }

    pub fn mark_used(&mut self, item: &ActionItem, now: Millis) {
        self.last_used.insert(item.cooldown_key().to_string(), now);
    }
}
