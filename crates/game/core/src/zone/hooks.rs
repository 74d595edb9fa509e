//! Fire-and-forget visual effect records and the per-frame sound queue.
//!
//! The zone owns both collections. Renderers read hooks, the frame driver
//! drains sounds; nothing in combat waits on either.
use strum::{Display, EnumIter};

use crate::state::{Millis, Vec2};

/// Visual effect kinds emitted by ability handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HookKind {
    ChainLightning,
    PhoenixAuraHit,
    Cleave,
    CleaveHit,
}

impl HookKind {
    /// How long the hook stays visible.
    pub const fn lifetime_ms(self) -> u64 {
        match self {
            Self::ChainLightning => 300,
            Self::PhoenixAuraHit => 200,
            Self::Cleave => 300,
            Self::CleaveHit => 100,
        }
    }

    pub const fn sound(self) -> Option<&'static str> {
        match self {
            Self::ChainLightning => Some("zap"),
            Self::PhoenixAuraHit => Some("fire_aura_hit"),
            Self::Cleave => Some("swoosh"),
            Self::CleaveHit => Some("hit_light"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HookAnchor {
    Point(Vec2),
    Line { from: Vec2, to: Vec2 },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectHook {
    pub kind: HookKind,
    pub started: Millis,
    pub anchor: HookAnchor,
    sound_played: bool,
}

impl EffectHook {
    pub fn point(kind: HookKind, started: Millis, at: Vec2) -> Self {
        Self {
            kind,
            started,
            anchor: HookAnchor::Point(at),
            sound_played: false,
        }
    }

    pub fn line(kind: HookKind, started: Millis, from: Vec2, to: Vec2) -> Self {
        Self {
            kind,
            started,
            anchor: HookAnchor::Line { from, to },
            sound_played: false,
        }
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        now.since(self.started) >= self.kind.lifetime_ms()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectHooks {
    hooks: Vec<EffectHook>,
}

impl EffectHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hook: EffectHook) {
        self.hooks.push(hook);
    }

    /// Drop every hook whose lifetime has passed.
    pub fn prune(&mut self, now: Millis) {
        self.hooks.retain(|hook| !hook.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectHook> {
        self.hooks.iter()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Queue each live hook's sound the first time it is seen.
    pub fn drain_sounds(&mut self, sounds: &mut SoundQueue) {
        for hook in self.hooks.iter_mut().filter(|hook| !hook.sound_played) {
            if let Some(sound) = hook.kind.sound() {
                sounds.push(sound);
            }
            hook.sound_played = true;
        }
    }
}

/// Sound ids requested this frame, in request order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoundQueue {
    pending: Vec<String>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sound: impl Into<String>) {
        self.pending.push(sound.into());
    }

    pub fn extend<I, S>(&mut self, sounds: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending.extend(sounds.into_iter().map(Into::into));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}
