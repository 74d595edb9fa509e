use crate::state::Millis;

use super::StatKind;

/// A stat bonus that lapses at `expires_at`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempBonus {
    pub stat: StatKind,
    pub amount: f64,
    pub expires_at: Millis,
}

/// Timed stat bonuses granted by on-kill effects and similar triggers.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempBonuses {
    entries: Vec<TempBonus>,
}

impl TempBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stat: StatKind, amount: f64, now: Millis, duration_ms: u64) {
        self.entries.push(TempBonus {
            stat,
            amount,
            expires_at: now.after(duration_ms),
        });
    }

    /// Drop every entry whose expiry is not strictly after `now`.
    pub fn prune(&mut self, now: Millis) {
        self.entries.retain(|bonus| bonus.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &TempBonus> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
