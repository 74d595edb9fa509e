//! Continuous 2D positions and axis-aligned square bodies.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub};

/// 2D vector in world units (positions, velocities, knockback impulses).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians.
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalize_or_zero(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 0.0 {
            self / len_sq.sqrt()
        } else {
            Self::ZERO
        }
    }

    /// Rotated a quarter turn counter-clockwise in screen space.
    pub fn perpendicular(self) -> Self {
        Self::new(self.y, -self.x)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Square footprint anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub pos: Vec2,
    pub size: f64,
}

impl Body {
    pub const fn new(pos: Vec2, size: f64) -> Self {
        Self { pos, size }
    }

    /// Body of `size` whose center sits at `center`.
    pub fn centered_at(center: Vec2, size: f64) -> Self {
        Self::new(center - Vec2::new(size / 2.0, size / 2.0), size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.size / 2.0, self.size / 2.0)
    }

    /// Center-to-center distance.
    pub fn distance_to(&self, other: &Body) -> f64 {
        self.center().distance(other.center())
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x < self.pos.x + self.size
            && point.y >= self.pos.y
            && point.y < self.pos.y + self.size
    }

    /// Keep the body fully inside a square zone of side `zone_size`.
    ///
    /// Returns which axes were clamped so callers can bounce velocities.
    pub fn clamp_to_zone(&mut self, zone_size: f64) -> (bool, bool) {
        let max = (zone_size - self.size).max(0.0);
        let clamp_x = self.pos.x < 0.0 || self.pos.x > max;
        let clamp_y = self.pos.y < 0.0 || self.pos.y > max;
        self.pos.x = self.pos.x.clamp(0.0, max);
        self.pos.y = self.pos.y.clamp(0.0, max);
        (clamp_x, clamp_y)
    }
}
