use strum::{Display, EnumIter};

/// Points in the combat lifecycle where effect handlers may run.
///
/// A primary weapon hit walks the attacker-side phases in declaration order:
/// `PreDamage`, `PreStrength`, `PreCrit`, damage and crit roll, `PostCrit`,
/// integer rounding, `PostDamage`, application, then `OnKill` on a kill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    PreDamage,
    PreStrength,
    PreCrit,
    PostCrit,
    PostDamage,
    OnKill,
    /// Receiver side, runs inside `take_damage`.
    OnHitReceived,
    /// Self-timed ticks driven by the entity update.
    Periodic,
}
