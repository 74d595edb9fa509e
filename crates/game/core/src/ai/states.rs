//! Movement states shared by every enemy archetype.
//!
//! States only write the enemy velocity. Integration, knockback and zone
//! clamping happen afterwards in the enemy update.
use state_machine::{State, Timer, Transition};

use crate::state::Vec2;

use super::{Kinematics, MoveState, MovementCtx};

type Range = (f64, f64);

fn expire_to(timer: &Timer, next: MoveState) -> Transition<MoveState> {
    if timer.expired() {
        Transition::Goto(next)
    } else {
        Transition::Stay
    }
}

/// Stand still for a random duration.
pub struct IdleState {
    pub duration: Range,
    pub next: MoveState,
}

impl State<MoveState, Kinematics, MovementCtx> for IdleState {
    fn enter(&mut self, entity: &mut Kinematics, ctx: &mut MovementCtx, timer: &mut Timer) {
        timer.set(ctx.rng.uniform(self.duration.0, self.duration.1));
        entity.velocity = Vec2::ZERO;
    }

    fn update(
        &mut self,
        _entity: &mut Kinematics,
        _dt: f64,
        _ctx: &mut MovementCtx,
        timer: &mut Timer,
    ) -> Transition<MoveState> {
        expire_to(timer, self.next)
    }
}

/// Walk in one random direction for a random duration.
pub struct WanderState {
    pub speed_multiplier: f64,
    pub duration: Range,
    pub next: MoveState,
}

impl State<MoveState, Kinematics, MovementCtx> for WanderState {
    fn enter(&mut self, entity: &mut Kinematics, ctx: &mut MovementCtx, timer: &mut Timer) {
        timer.set(ctx.rng.uniform(self.duration.0, self.duration.1));
        let angle = ctx.rng.angle();
        entity.velocity = Vec2::from_angle(angle) * (entity.speed * self.speed_multiplier);
    }

    fn update(
        &mut self,
        _entity: &mut Kinematics,
        _dt: f64,
        _ctx: &mut MovementCtx,
        timer: &mut Timer,
    ) -> Transition<MoveState> {
        expire_to(timer, self.next)
    }
}

/// Wind-up before a leap; exposes squash progress for renderers.
pub struct SquashState {
    pub duration: f64,
    pub next: MoveState,
}

impl State<MoveState, Kinematics, MovementCtx> for SquashState {
    fn enter(&mut self, entity: &mut Kinematics, ctx: &mut MovementCtx, timer: &mut Timer) {
        timer.set(self.duration);
        entity.velocity = Vec2::ZERO;
        ctx.squash = 0.0;
    }

    fn update(
        &mut self,
        _entity: &mut Kinematics,
        _dt: f64,
        ctx: &mut MovementCtx,
        timer: &mut Timer,
    ) -> Transition<MoveState> {
        ctx.squash = 1.0 - (timer.remaining() / self.duration).max(0.0);
        expire_to(timer, self.next)
    }

    fn exit(&mut self, _entity: &mut Kinematics, ctx: &mut MovementCtx) {
        ctx.squash = 0.0;
    }
}

/// Decelerating burst, aimed at the player when `target_radius` allows it.
pub struct LeapState {
    pub duration: f64,
    pub strength: f64,
    /// Fraction of leap velocity left after one second.
    pub decel: f64,
    pub next: MoveState,
    pub sound: &'static str,
    pub target_radius: Option<f64>,
}

impl State<MoveState, Kinematics, MovementCtx> for LeapState {
    fn enter(&mut self, entity: &mut Kinematics, ctx: &mut MovementCtx, timer: &mut Timer) {
        timer.set(self.duration);
        let speed = entity.speed * self.strength;

        let aimed = self
            .target_radius
            .filter(|radius| entity.center.distance(ctx.player_center) <= *radius)
            .map(|_| (ctx.player_center - entity.center).normalize_or_zero() * speed);

        ctx.leap = match aimed {
            Some(vector) => vector,
            None => Vec2::from_angle(ctx.rng.angle()) * speed,
        };
    }

    fn update(
        &mut self,
        entity: &mut Kinematics,
        dt: f64,
        ctx: &mut MovementCtx,
        timer: &mut Timer,
    ) -> Transition<MoveState> {
        entity.velocity = ctx.leap;
        ctx.leap *= self.decel.powf(dt);

        if !timer.expired() {
            return Transition::Stay;
        }
        entity.velocity = Vec2::ZERO;
        ctx.sounds.push(self.sound.to_string());
        Transition::Goto(self.next)
    }
}

/// Short random segments at high speed.
pub struct ZigzagState {
    pub speed_multiplier: f64,
    pub segment: Range,
    pub total: Range,
    pub next: MoveState,
    remaining: f64,
    segment_left: f64,
    angle: f64,
}

impl ZigzagState {
    pub fn new(speed_multiplier: f64, segment: Range, total: Range, next: MoveState) -> Self {
        Self {
            speed_multiplier,
            segment,
            total,
            next,
            remaining: 0.0,
            segment_left: 0.0,
            angle: 0.0,
        }
    }

    fn turn(&mut self, ctx: &mut MovementCtx) {
        self.angle = ctx.rng.angle();
        self.segment_left = ctx.rng.uniform(self.segment.0, self.segment.1);
    }
}

impl State<MoveState, Kinematics, MovementCtx> for ZigzagState {
    fn enter(&mut self, _entity: &mut Kinematics, ctx: &mut MovementCtx, _timer: &mut Timer) {
        self.remaining = ctx.rng.uniform(self.total.0, self.total.1);
        self.turn(ctx);
    }

    fn update(
        &mut self,
        entity: &mut Kinematics,
        dt: f64,
        ctx: &mut MovementCtx,
        _timer: &mut Timer,
    ) -> Transition<MoveState> {
        self.remaining -= dt;
        self.segment_left -= dt;
        if self.segment_left <= 0.0 {
            self.turn(ctx);
        }

        entity.velocity = Vec2::from_angle(self.angle) * (entity.speed * self.speed_multiplier);

        if self.remaining <= 0.0 {
            Transition::Goto(self.next)
        } else {
            Transition::Stay
        }
    }
}

/// Run straight at the player while within `radius`.
pub struct ChaseState {
    pub radius: f64,
    pub speed_multiplier: f64,
    pub fallback: MoveState,
}

impl State<MoveState, Kinematics, MovementCtx> for ChaseState {
    fn update(
        &mut self,
        entity: &mut Kinematics,
        _dt: f64,
        ctx: &mut MovementCtx,
        _timer: &mut Timer,
    ) -> Transition<MoveState> {
        if entity.center.distance(ctx.player_center) > self.radius {
            return Transition::Goto(self.fallback);
        }
        let direction = (ctx.player_center - entity.center).normalize_or_zero();
        entity.velocity = direction * (entity.speed * self.speed_multiplier);
        Transition::Stay
    }
}

/// Circle sideways around the player in a direction locked on entry.
pub struct StrafeState {
    pub radius: f64,
    pub duration: f64,
    pub fallback: MoveState,
}

impl State<MoveState, Kinematics, MovementCtx> for StrafeState {
    fn enter(&mut self, entity: &mut Kinematics, ctx: &mut MovementCtx, timer: &mut Timer) {
        timer.set(self.duration);
        let toward = ctx.player_center - entity.center;
        let side = if ctx.rng.next_f64() < 0.5 {
            toward.perpendicular()
        } else {
            -toward.perpendicular()
        };
        ctx.strafe = match side.normalize_or_zero() {
            v if v == Vec2::ZERO => Vec2::new(1.0, 0.0),
            v => v,
        };
    }

    fn update(
        &mut self,
        entity: &mut Kinematics,
        _dt: f64,
        ctx: &mut MovementCtx,
        timer: &mut Timer,
    ) -> Transition<MoveState> {
        if entity.center.distance(ctx.player_center) > self.radius * 1.5 {
            return Transition::Goto(self.fallback);
        }
        entity.velocity = ctx.strafe * entity.speed;
        expire_to(timer, self.fallback)
    }
}
