//! Frame driver for the combat core.
//!
//! A [`Session`] owns the static content, the player, and every zone the
//! player has visited. Each call to [`Session::tick`] advances the clock
//! and runs one frame in a fixed order:
//!
//! 1. player update (periodic effects, regeneration, movement)
//! 2. zone update (effect hooks, enemy AI, contact damage)
//! 3. at most one primary action, gated by cooldown and input
//! 4. flush of every queued combat and gather result
//! 5. defeat handling and portal travel
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the driver and its builder
//! - [`input`] turns raw button state into click edges
//! - [`ledger`] records reward notifications
//! - [`events`] describes what happened outside the combat pipeline
pub mod error;
pub mod events;
pub mod input;
pub mod ledger;
pub mod session;

pub use error::{Result, RuntimeError};
pub use events::SessionEvent;
pub use input::{ClickEdge, FrameInput};
pub use ledger::RewardLedger;
pub use session::{FrameAction, FrameReport, Session, SessionBuilder, SessionConfig};
