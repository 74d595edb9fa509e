//! Raw damage math shared by the attack resolver and resource gathering.
use bitflags::bitflags;

use crate::env::RollStream;
use crate::state::{EntityId, Vec2};

bitflags! {
    /// Summary flags for one resolved primary hit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HitFlags: u8 {
        const CRIT = 1 << 0;
        const FIRST_HIT = 1 << 1;
        const FINAL_HIT = 1 << 2;
    }
}

/// Damage before reduction, with the crit outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub damage: f64,
    pub crit: bool,
}

/// `base * (1 + strength/100)`, multiplied by `1 + crit_damage/100` on a crit.
///
/// The crit roll is only drawn when `crit_chance > 0`, so zero-crit attacks
/// never advance the stream.
pub fn calculate_damage(
    base: f64,
    strength: f64,
    crit_chance: f64,
    crit_damage: f64,
    rng: &mut RollStream,
) -> DamageRoll {
    let mut damage = base * (1.0 + strength / 100.0);
    let crit = crit_chance > 0.0 && rng.next_f64() < crit_chance / 100.0;
    if crit {
        damage *= 1.0 + crit_damage / 100.0;
    }
    DamageRoll { damage, crit }
}

/// Impulse of `strength` pointing from `from` toward `to`; zero when the
/// points coincide.
pub fn knockback_toward(from: Vec2, to: Vec2, strength: f64) -> Vec2 {
    (to - from).normalize_or_zero() * strength
}

/// Outcome of one primary weapon swing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    pub target: EntityId,
    /// Integer damage after `PostDamage`, before the target's reduction.
    pub damage: i64,
    /// Hp actually removed from the target.
    pub applied: i64,
    pub flags: HitFlags,
    /// Results queued by this swing, including area effects and reflections.
    pub results_queued: usize,
}
