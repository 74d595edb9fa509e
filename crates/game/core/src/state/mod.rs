//! Identity, time and geometry primitives shared by every simulation module.
mod common;
mod geometry;

pub use common::{EntityId, Frame, Millis};
pub use geometry::{Body, Vec2};
