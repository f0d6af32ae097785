//! Audio and particle notification sink
//!
//! The simulation never plays sounds or spawns particles itself. It calls an
//! injected `EffectSink` at well-defined moments and never branches on the
//! outcome, so presentation layers can be swapped or muted freely.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Kick connects with the ball
    Kick,
    /// Header connects with the ball
    Header,
    /// Ball bounces off ground, wall, ceiling or crossbar
    Bounce,
    /// Player jumps
    Jump,
    /// Player lands from a fall
    Land,
    /// Kick lands on an opponent's head
    HeadKick,
    /// Rocket launched
    RocketLaunch,
    /// Rocket explodes
    Explosion,
    /// Arrow loosed
    BowShot,
    /// Arrow sticks into something
    ArrowHit,
    /// Power-up collected
    PowerupCollect,
    /// Power-up lands in the arena
    PowerupLand,
    /// Goal scored
    Goal,
    /// Match won
    MatchOver,
    /// Kick-off whistle
    Whistle,
}

/// Visual effect types for the particle collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Dust puff when a player lands hard
    Dust,
    /// Spark where a kick connects
    KickSpark,
    /// Rocket blast
    Explosion,
    /// Rocket exhaust
    Smoke,
    /// Power-up pickup sparkle
    Sparkle,
    /// Confetti when a goal goes in
    Confetti,
    /// Ice shards when the ball freezes
    Frost,
}

/// Extra parameters for a visual effect
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectParams {
    /// Overall strength (0-1)
    pub intensity: f32,
    /// Preferred direction, zero when omnidirectional
    pub direction: Vec2,
}

impl EffectParams {
    pub fn intensity(intensity: f32) -> Self {
        Self {
            intensity,
            direction: Vec2::ZERO,
        }
    }
}

/// Fire-and-forget sink for presentation side effects
pub trait EffectSink {
    fn play_sound(&mut self, sound: SoundEffect);

    fn emit_effect(&mut self, kind: EffectKind, pos: Vec2, count: u32, params: EffectParams);
}

/// Sink that drops every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EffectSink for NullSink {
    fn play_sound(&mut self, _sound: SoundEffect) {}

    fn emit_effect(&mut self, _kind: EffectKind, _pos: Vec2, _count: u32, _params: EffectParams) {}
}

/// Sink that traces notifications through the `log` facade
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    muted: bool,
    sounds_played: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute sound tracing
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of sounds that reached the sink while unmuted
    pub fn sounds_played(&self) -> u64 {
        self.sounds_played
    }
}

impl EffectSink for LogSink {
    fn play_sound(&mut self, sound: SoundEffect) {
        if self.muted {
            return;
        }
        self.sounds_played += 1;
        log::trace!("sound {:?}", sound);
    }

    fn emit_effect(&mut self, kind: EffectKind, pos: Vec2, count: u32, params: EffectParams) {
        log::trace!(
            "effect {:?} x{} at ({:.0}, {:.0}) intensity {:.2}",
            kind,
            count,
            pos.x,
            pos.y,
            params.intensity
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Test double that records everything it receives
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub sounds: Vec<SoundEffect>,
        pub effects: Vec<(EffectKind, Vec2, u32)>,
    }

    impl RecordingSink {
        pub fn count(&self, sound: SoundEffect) -> usize {
            self.sounds.iter().filter(|s| **s == sound).count()
        }

        pub fn effect_count(&self, kind: EffectKind) -> usize {
            self.effects.iter().filter(|e| e.0 == kind).count()
        }
    }

    impl EffectSink for RecordingSink {
        fn play_sound(&mut self, sound: SoundEffect) {
            self.sounds.push(sound);
        }

        fn emit_effect(&mut self, kind: EffectKind, pos: Vec2, count: u32, _params: EffectParams) {
            self.effects.push((kind, pos, count));
        }
    }
}
