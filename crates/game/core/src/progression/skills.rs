use std::collections::BTreeMap;
use std::sync::OnceLock;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Skill {
    Combat,
    Mining,
    Woodcutting,
}

impl Skill {
    /// Capitalized name for stat-source labels.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Combat => "Combat",
            Self::Mining => "Mining",
            Self::Woodcutting => "Woodcutting",
        }
    }
}

/// Cumulative XP thresholds shared by every skill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XpTable {
    /// `thresholds[n]` is the XP needed to reach level `n`.
    thresholds: Vec<u64>,
}

impl XpTable {
    pub const MAX_LEVEL: u32 = 60;

    const STARTING_DELTA: u64 = 150;
    const INITIAL_MULTIPLIER: f64 = 1.43;
    const FINAL_MULTIPLIER: f64 = 1.0;

    /// Shared instance, generated on first use.
    pub fn standard() -> &'static XpTable {
        static TABLE: OnceLock<XpTable> = OnceLock::new();
        TABLE.get_or_init(XpTable::generate)
    }

    /// Per-level requirements grow by a rounded delta that is itself
    /// multiplied every few levels; the multiplier eases from 1.43 to 1.0 and
    /// the step interval widens by one every 15 levels.
    pub fn generate() -> Self {
        let levels = Self::MAX_LEVEL;
        let mut delta = Self::STARTING_DELTA;
        let mut requirement: u64 = 1;
        let mut total: u64 = 0;
        let mut step = 0u32;
        let mut thresholds = Vec::with_capacity(levels as usize + 2);
        thresholds.push(0);

        for level in 0..=levels {
            if level == 1 {
                // first level-up costs exactly 100 XP
                requirement += 99;
            } else if level > 1 {
                requirement += round_to_magnitude(delta);
            }
            total += requirement;
            thresholds.push(total);

            step += 1;
            let growth_steps = 1 + level / 15;
            let t = level as f64 / levels as f64;
            let multiplier = (1.0 - t) * Self::INITIAL_MULTIPLIER + t * Self::FINAL_MULTIPLIER;
            if step >= growth_steps {
                delta = (delta as f64 * multiplier) as u64;
                step = 0;
            }
        }

        Self { thresholds }
    }

    pub fn level_for(&self, xp: u64) -> u32 {
        (1..=Self::MAX_LEVEL)
            .find(|level| xp < self.thresholds[*level as usize])
            .map(|level| level - 1)
            .unwrap_or(Self::MAX_LEVEL)
    }

    /// Total XP needed to reach `level`.
    pub fn threshold(&self, level: u32) -> u64 {
        self.thresholds
            .get(level as usize)
            .copied()
            .unwrap_or(u64::MAX)
    }
}

/// Round to the nearest 10, 100, 1000, ... depending on magnitude, ties to even.
fn round_to_magnitude(value: u64) -> u64 {
    let unit = match value {
        0..100 => 10.0,
        100..1_000 => 100.0,
        1_000..10_000 => 1_000.0,
        10_000..100_000 => 10_000.0,
        _ => 100_000.0,
    };
    ((value as f64 / unit).round_ties_even() * unit) as u64
}

/// XP totals per skill.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillBook {
    xp: BTreeMap<Skill, u64>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xp(&self, skill: Skill) -> u64 {
        self.xp.get(&skill).copied().unwrap_or(0)
    }

    pub fn level(&self, skill: Skill) -> u32 {
        XpTable::standard().level_for(self.xp(skill))
    }

    /// Add XP, returning the new level if it changed.
    pub fn gain_xp(&mut self, skill: Skill, amount: u64) -> Option<u32> {
        let before = self.level(skill);
        let entry = self.xp.entry(skill).or_default();
        *entry = entry.saturating_add(amount);
        let after = self.level(skill);
        (after != before).then_some(after)
    }

    pub fn set_xp(&mut self, skill: Skill, xp: u64) {
        self.xp.insert(skill, xp);
    }
}
