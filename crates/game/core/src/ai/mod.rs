//! Enemy movement AI.
//!
//! Each enemy owns a [`Brain`]: a [`StateMachine`] over [`MoveState`] keys
//! configured per [`MovementArchetype`]. The brain only decides velocity;
//! combat never reads AI state.
mod states;

use std::fmt;

use state_machine::StateMachine;

use crate::env::RollStream;
use crate::state::Vec2;

pub use states::{
    ChaseState, IdleState, LeapState, SquashState, StrafeState, WanderState, ZigzagState,
};

/// Movement pattern assigned by the enemy template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MovementArchetype {
    /// Idle, squash, leap, wander.
    Slime,
    /// Wander, zigzag, leap at the player.
    Spider,
    /// Chase the player, wander when out of range.
    Zombie,
    /// Strafe around the player, wander when out of range.
    Skeleton,
    #[default]
    Wanderer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveState {
    Idle,
    Wander,
    Squash,
    Leap,
    Zigzag,
    Chase,
    Strafe,
}

/// The slice of an enemy the movement states may touch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    pub center: Vec2,
    pub velocity: Vec2,
    pub speed: f64,
}

/// Per-brain scratch shared between states.
#[derive(Clone, Debug)]
pub struct MovementCtx {
    pub player_center: Vec2,
    pub rng: RollStream,
    /// Current leap velocity, decaying while airborne.
    pub leap: Vec2,
    /// Unit strafe direction locked when strafing starts.
    pub strafe: Vec2,
    /// Squash progress in `[0, 1]`.
    pub squash: f64,
    /// Sound ids requested since the last drain.
    pub sounds: Vec<String>,
}

impl MovementCtx {
    fn new(rng: RollStream) -> Self {
        Self {
            player_center: Vec2::ZERO,
            rng,
            leap: Vec2::ZERO,
            strafe: Vec2::new(1.0, 0.0),
            squash: 0.0,
            sounds: Vec::new(),
        }
    }
}

pub struct Brain {
    archetype: MovementArchetype,
    fsm: StateMachine<MoveState, Kinematics, MovementCtx>,
    ctx: MovementCtx,
    initial: MoveState,
    started: bool,
}

impl Brain {
    pub fn new(archetype: MovementArchetype, rng: RollStream) -> Self {
        let (fsm, initial) = Self::build(archetype);
        Self {
            archetype,
            fsm,
            ctx: MovementCtx::new(rng),
            initial,
            started: false,
        }
    }

    fn build(archetype: MovementArchetype) -> (StateMachine<MoveState, Kinematics, MovementCtx>, MoveState) {
        use MoveState::*;

        match archetype {
            MovementArchetype::Slime => (
                StateMachine::new()
                    .with_state(Idle, IdleState { duration: (1.0, 1.5), next: Squash })
                    .with_state(Squash, SquashState { duration: 0.7, next: Leap })
                    .with_state(
                        Leap,
                        LeapState {
                            duration: 0.3,
                            strength: 4.0,
                            decel: 0.02,
                            next: Wander,
                            sound: "slime_jump",
                            target_radius: None,
                        },
                    )
                    .with_state(
                        Wander,
                        WanderState { speed_multiplier: 0.2, duration: (2.0, 5.0), next: Idle },
                    ),
                Idle,
            ),
            MovementArchetype::Spider => (
                StateMachine::new()
                    .with_state(
                        Wander,
                        WanderState { speed_multiplier: 0.8, duration: (1.0, 2.0), next: Zigzag },
                    )
                    .with_state(Zigzag, ZigzagState::new(1.5, (0.1, 0.3), (1.0, 1.5), Leap))
                    .with_state(
                        Leap,
                        LeapState {
                            duration: 0.3,
                            strength: 7.0,
                            decel: 0.2,
                            next: Wander,
                            sound: "spider_jump",
                            target_radius: Some(200.0),
                        },
                    ),
                Wander,
            ),
            MovementArchetype::Zombie => (
                StateMachine::new()
                    .with_state(
                        Chase,
                        ChaseState { radius: 250.0, speed_multiplier: 1.5, fallback: Wander },
                    )
                    .with_state(
                        Wander,
                        WanderState { speed_multiplier: 0.5, duration: (1.0, 2.0), next: Chase },
                    ),
                Chase,
            ),
            MovementArchetype::Skeleton => (
                StateMachine::new()
                    .with_state(Strafe, StrafeState { radius: 180.0, duration: 2.0, fallback: Wander })
                    .with_state(
                        Wander,
                        WanderState { speed_multiplier: 0.6, duration: (1.0, 2.0), next: Strafe },
                    ),
                Strafe,
            ),
            MovementArchetype::Wanderer => (
                StateMachine::new().with_state(
                    Wander,
                    WanderState { speed_multiplier: 1.0, duration: (0.75, 1.5), next: Wander },
                ),
                Wander,
            ),
        }
    }

    pub fn archetype(&self) -> MovementArchetype {
        self.archetype
    }

    pub fn current(&self) -> Option<MoveState> {
        self.fsm.current()
    }

    pub fn squash(&self) -> f64 {
        self.ctx.squash
    }

    /// Advance the machine by `dt` seconds. Enters the initial state on the
    /// first call. Returns sounds requested during this step.
    pub fn think(&mut self, body: &mut Kinematics, player_center: Vec2, dt: f64) -> Vec<String> {
        self.ctx.player_center = player_center;
        if !self.started {
            self.fsm.change_state(self.initial, body, &mut self.ctx);
            self.started = true;
        }
        self.fsm.update(body, dt, &mut self.ctx);
        std::mem::take(&mut self.ctx.sounds)
    }
}

impl fmt::Debug for Brain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Brain")
            .field("archetype", &self.archetype)
            .field("current", &self.fsm.current())
            .finish()
    }
}
