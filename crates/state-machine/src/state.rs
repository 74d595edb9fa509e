//! Core state trait.
//!
//! This module defines the [`State`] trait, the fundamental abstraction for
//! every node of a [`StateMachine`](crate::StateMachine). The trait is generic
//! over the key type `K`, the driven entity `E` and a per-frame context `C`.

use crate::Timer;

/// Outcome of a single [`State::update`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition<K> {
    /// Remain in the current state.
    Stay,
    /// Exit the current state and enter the state registered under `K`.
    Goto(K),
}

/// A state that can drive an entity for some number of frames.
///
/// All hooks receive the machine-owned [`Timer`]. Typical states arm it in
/// [`enter`](State::enter) and request a transition once it has expired.
pub trait State<K, E, C> {
    /// Called once when the machine switches into this state.
    fn enter(&mut self, _entity: &mut E, _ctx: &mut C, _timer: &mut Timer) {}

    /// Advance this state by `dt` seconds.
    ///
    /// # Returns
    ///
    /// - `Transition::Stay` to keep running this state next frame
    /// - `Transition::Goto(key)` to switch states immediately
    fn update(&mut self, entity: &mut E, dt: f64, ctx: &mut C, timer: &mut Timer)
    -> Transition<K>;

    /// Called once when the machine switches away from this state.
    fn exit(&mut self, _entity: &mut E, _ctx: &mut C) {}
}

/// Blanket implementation for boxed states.
///
/// This allows `Box<dyn State<K, E, C>>` to also implement `State<K, E, C>`,
/// enabling heterogeneous collections of states.
impl<K, E, C> State<K, E, C> for Box<dyn State<K, E, C>> {
    #[inline]
    fn enter(&mut self, entity: &mut E, ctx: &mut C, timer: &mut Timer) {
        (**self).enter(entity, ctx, timer)
    }

    #[inline]
    fn update(
        &mut self,
        entity: &mut E,
        dt: f64,
        ctx: &mut C,
        timer: &mut Timer,
    ) -> Transition<K> {
        (**self).update(entity, dt, ctx, timer)
    }

    #[inline]
    fn exit(&mut self, entity: &mut E, ctx: &mut C) {
        (**self).exit(entity, ctx)
    }
}
