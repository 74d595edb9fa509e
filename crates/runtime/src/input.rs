//! Per-frame input snapshot.
use grindstone_core::Vec2;

/// Input sampled once per frame by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Movement direction; any length, zero to stand still.
    pub direction: Vec2,
    /// World-space aim point.
    pub aim: Vec2,
    /// Primary button currently held.
    pub primary_held: bool,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn aim_at(aim: Vec2) -> Self {
        Self {
            aim,
            ..Self::default()
        }
    }

    pub fn holding(mut self) -> Self {
        self.primary_held = true;
        self
    }

    pub fn moving(mut self, direction: Vec2) -> Self {
        self.direction = direction;
        self
    }
}

/// Detects the frame on which a held button was first pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickEdge {
    was_held: bool,
}

impl ClickEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's button state; true only on a release-to-press edge.
    pub fn update(&mut self, held: bool) -> bool {
        let clicked = held && !self.was_held;
        self.was_held = held;
        clicked
    }
}
