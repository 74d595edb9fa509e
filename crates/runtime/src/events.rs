//! Session-level events reported alongside each frame.
use grindstone_core::env::Direction;

/// Something that changed the session outside the combat pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionEvent {
    /// The player arrived in a zone, through `via` when it was a portal.
    ZoneEntered { zone: String, via: Option<Direction> },
    /// First visit to a zone.
    ZoneDiscovered { zone: String },
    /// The respawn point moved to this safe zone.
    SafeZoneUpdated { zone: String },
    /// A portal was touched but its zone's requirements are not met.
    ZoneLocked { zone: String },
    /// The player's hp reached zero; they were revived in `respawn_zone`.
    PlayerDefeated { respawn_zone: String },
}
