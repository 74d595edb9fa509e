//! Countdown shared by all states of one machine.

/// Seconds remaining until a state-defined deadline.
///
/// The timer is allowed to go negative; states only ever test
/// [`expired`](Timer::expired).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timer {
    remaining: f64,
}

impl Timer {
    pub const fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Arm the timer with a fresh duration in seconds.
    pub fn set(&mut self, seconds: f64) {
        self.remaining = seconds;
    }

    pub fn tick(&mut self, dt: f64) {
        self.remaining -= dt;
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }
}
