//! Errors surfaced by the session API.
use grindstone_core::CombatError;
use grindstone_core::env::Direction;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("zone '{zone}' is not defined")]
    UnknownZone { zone: String },

    #[error("zone '{zone}' has no connection on its {direction} edge")]
    NotConnected { zone: String, direction: Direction },

    #[error("player does not meet the requirements of zone '{zone}'")]
    ZoneLocked { zone: String },

    #[error("item '{item}' is not defined")]
    UnknownItem { item: String },

    #[error(transparent)]
    Combat(#[from] CombatError),
}
