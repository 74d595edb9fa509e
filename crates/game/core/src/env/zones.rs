use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString};

use crate::progression::{Skill, SkillBook};
use crate::state::{Body, Vec2};

pub trait ZoneOracle: Send + Sync {
    fn zone(&self, id: &str) -> Option<&ZoneDefinition>;

    fn zone_ids(&self) -> Vec<&str>;
}

/// Zone edge used for portal connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZoneKind {
    #[default]
    Combat,
    Mining,
    Woodcutting,
    Boss,
}

/// Static layout and population rules of one zone.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZoneDefinition {
    pub name: String,
    /// Side length of the square play area.
    pub size: f64,
    /// Safe zones are where a defeated player respawns.
    pub safe: bool,
    pub kind: ZoneKind,
    /// `(enemy id, weight)` pairs.
    pub enemy_spawn_table: Vec<(String, f64)>,
    pub num_enemies: usize,
    /// `(resource node id, weight)` pairs.
    pub resource_spawn_table: Vec<(String, f64)>,
    pub num_resources: usize,
    pub connections: BTreeMap<Direction, String>,
    /// Minimum skill levels required to enter.
    pub requirements: BTreeMap<Skill, u32>,
}

impl Default for ZoneDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: 800.0,
            safe: false,
            kind: ZoneKind::Combat,
            enemy_spawn_table: Vec::new(),
            num_enemies: 0,
            resource_spawn_table: Vec::new(),
            num_resources: 0,
            connections: BTreeMap::new(),
            requirements: BTreeMap::new(),
        }
    }
}

impl ZoneDefinition {
    pub const ENTRY_MARGIN: f64 = 50.0;
    /// Depth of a portal strip along its edge.
    pub const PORTAL_DEPTH: f64 = 16.0;
    /// Length of a portal strip, centered on its edge.
    pub const PORTAL_SPAN: f64 = 32.0;

    /// True when `skills` meets every entry requirement.
    pub fn admits(&self, skills: &SkillBook) -> bool {
        self.requirements
            .iter()
            .all(|(skill, required)| skills.level(*skill) >= *required)
    }

    /// `(x, y, width, height)` of the portal on `edge`.
    pub fn portal_rect(&self, edge: Direction) -> (f64, f64, f64, f64) {
        let mid = (self.size / 2.0).floor() - Self::PORTAL_SPAN / 2.0;
        let far = self.size - Self::PORTAL_DEPTH;
        match edge {
            Direction::Left => (0.0, mid, Self::PORTAL_DEPTH, Self::PORTAL_SPAN),
            Direction::Right => (far, mid, Self::PORTAL_DEPTH, Self::PORTAL_SPAN),
            Direction::Top => (mid, 0.0, Self::PORTAL_SPAN, Self::PORTAL_DEPTH),
            Direction::Bottom => (mid, far, Self::PORTAL_SPAN, Self::PORTAL_DEPTH),
        }
    }

    /// First connected edge whose portal overlaps `body`.
    pub fn portal_touching(&self, body: &Body) -> Option<(Direction, &str)> {
        self.connections.iter().find_map(|(edge, target)| {
            let (x, y, w, h) = self.portal_rect(*edge);
            let overlaps = body.pos.x < x + w
                && body.pos.x + body.size > x
                && body.pos.y < y + h
                && body.pos.y + body.size > y;
            overlaps.then_some((*edge, target.as_str()))
        })
    }

    /// Where a player arriving through the `exit` edge of the previous zone
    /// appears: `ENTRY_MARGIN` inside the opposite edge, centered along it.
    pub fn entry_point(&self, exit: Option<Direction>) -> Vec2 {
        let mid = (self.size / 2.0).floor();
        match exit.map(Direction::opposite) {
            Some(Direction::Left) => Vec2::new(Self::ENTRY_MARGIN, mid),
            Some(Direction::Right) => Vec2::new(self.size - Self::ENTRY_MARGIN, mid),
            Some(Direction::Top) => Vec2::new(mid, Self::ENTRY_MARGIN),
            Some(Direction::Bottom) => Vec2::new(mid, self.size - Self::ENTRY_MARGIN),
            None => Vec2::new(mid, mid),
        }
    }
}
