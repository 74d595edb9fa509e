//! State registry and transition driver.

use crate::{State, Timer, Transition};

type BoxedState<K, E, C> = Box<dyn State<K, E, C> + Send + Sync>;

/// Drives one entity through a set of keyed states.
///
/// # Semantics
///
/// On every [`update`](StateMachine::update):
/// - the shared timer is decremented by `dt`
/// - the active state's `update` runs
/// - a returned `Transition::Goto(key)` exits the active state and enters
///   `key` before `update` returns
///
/// Transitions to unregistered keys leave the machine without an active
/// state; subsequent updates only tick the timer.
pub struct StateMachine<K, E, C> {
    states: Vec<(K, BoxedState<K, E, C>)>,
    current: Option<usize>,
    timer: Timer,
}

impl<K, E, C> StateMachine<K, E, C>
where
    K: Copy + PartialEq,
{
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            current: None,
            timer: Timer::new(),
        }
    }

    /// Register a state under `key`, replacing any previous registration.
    pub fn add_state(&mut self, key: K, state: impl State<K, E, C> + Send + Sync + 'static) {
        let boxed: BoxedState<K, E, C> = Box::new(state);
        match self.states.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = boxed,
            None => self.states.push((key, boxed)),
        }
    }

    /// Builder-style variant of [`add_state`](Self::add_state).
    pub fn with_state(mut self, key: K, state: impl State<K, E, C> + Send + Sync + 'static) -> Self {
        self.add_state(key, state);
        self
    }

    /// Exit the active state (if any) and enter the state registered under `key`.
    ///
    /// Returns `false` when no state is registered under `key`.
    pub fn change_state(&mut self, key: K, entity: &mut E, ctx: &mut C) -> bool {
        if let Some(index) = self.current {
            self.states[index].1.exit(entity, ctx);
        }

        self.current = self.states.iter().position(|(existing, _)| *existing == key);
        match self.current {
            Some(index) => {
                self.states[index].1.enter(entity, ctx, &mut self.timer);
                true
            }
            None => false,
        }
    }

    /// Advance the active state by `dt` seconds.
    pub fn update(&mut self, entity: &mut E, dt: f64, ctx: &mut C) {
        self.timer.tick(dt);

        let Some(index) = self.current else {
            return;
        };

        if let Transition::Goto(next) = self.states[index].1.update(entity, dt, ctx, &mut self.timer) {
            self.change_state(next, entity, ctx);
        }
    }

    /// Key of the active state.
    pub fn current(&self) -> Option<K> {
        self.current.map(|index| self.states[index].0)
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<K, E, C> Default for StateMachine<K, E, C>
where
    K: Copy + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Key {
        Rest,
        Walk,
    }

    #[derive(Default)]
    struct Walker {
        steps: u32,
        entered: Vec<Key>,
        exited: Vec<Key>,
    }

    struct Rest {
        duration: f64,
    }

    impl State<Key, Walker, ()> for Rest {
        fn enter(&mut self, entity: &mut Walker, _ctx: &mut (), timer: &mut Timer) {
            entity.entered.push(Key::Rest);
            timer.set(self.duration);
        }

        fn update(&mut self, _entity: &mut Walker, _dt: f64, _ctx: &mut (), timer: &mut Timer) -> Transition<Key> {
            if timer.expired() {
                Transition::Goto(Key::Walk)
            } else {
                Transition::Stay
            }
        }

        fn exit(&mut self, entity: &mut Walker, _ctx: &mut ()) {
            entity.exited.push(Key::Rest);
        }
    }

    struct Walk;

    impl State<Key, Walker, ()> for Walk {
        fn enter(&mut self, entity: &mut Walker, _ctx: &mut (), _timer: &mut Timer) {
            entity.entered.push(Key::Walk);
        }

        fn update(&mut self, entity: &mut Walker, _dt: f64, _ctx: &mut (), _timer: &mut Timer) -> Transition<Key> {
            entity.steps += 1;
            if entity.steps >= 2 {
                Transition::Goto(Key::Rest)
            } else {
                Transition::Stay
            }
        }
    }

    fn machine() -> StateMachine<Key, Walker, ()> {
        StateMachine::new()
            .with_state(Key::Rest, Rest { duration: 0.5 })
            .with_state(Key::Walk, Walk)
    }

    #[test]
    fn change_state_runs_enter_hook() {
        let mut fsm = machine();
        let mut walker = Walker::default();

        assert!(fsm.change_state(Key::Rest, &mut walker, &mut ()));
        assert_eq!(fsm.current(), Some(Key::Rest));
        assert_eq!(walker.entered, vec![Key::Rest]);
        assert!((fsm.timer().remaining() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn timer_expiry_triggers_transition() {
        let mut fsm = machine();
        let mut walker = Walker::default();
        fsm.change_state(Key::Rest, &mut walker, &mut ());

        fsm.update(&mut walker, 0.25, &mut ());
        assert_eq!(fsm.current(), Some(Key::Rest));

        fsm.update(&mut walker, 0.25, &mut ());
        assert_eq!(fsm.current(), Some(Key::Walk));
        assert_eq!(walker.exited, vec![Key::Rest]);
    }

    #[test]
    fn states_cycle_back() {
        let mut fsm = machine();
        let mut walker = Walker::default();
        fsm.change_state(Key::Walk, &mut walker, &mut ());

        fsm.update(&mut walker, 0.1, &mut ());
        fsm.update(&mut walker, 0.1, &mut ());

        assert_eq!(walker.steps, 2);
        assert_eq!(fsm.current(), Some(Key::Rest));
        assert_eq!(walker.entered, vec![Key::Walk, Key::Rest]);
    }

    #[test]
    fn unknown_key_clears_active_state() {
        let mut fsm: StateMachine<Key, Walker, ()> =
            StateMachine::new().with_state(Key::Walk, Walk);
        let mut walker = Walker::default();

        assert!(!fsm.change_state(Key::Rest, &mut walker, &mut ()));
        assert_eq!(fsm.current(), None);

        fsm.update(&mut walker, 0.1, &mut ());
        assert_eq!(walker.steps, 0);
    }
}
