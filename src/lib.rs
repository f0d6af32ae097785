//! Stick Soccer - two stick-figure athletes, one ball, falling power-ups
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (entities, collisions, match state)
//! - `platform`: Input abstraction (held / just-pressed key queries)
//! - `audio`: Fire-and-forget sound and particle notification sink
//! - `settings`: Frozen arena geometry and match rules

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;

pub use audio::{EffectKind, EffectSink, LogSink, NullSink, SoundEffect};
pub use platform::{InputSource, Key, KeyboardState};
pub use settings::{ArenaConfig, MatchRules, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest real frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Gravity for players and the ball (pixels/s², +y is down)
    pub const GRAVITY: f32 = 1500.0;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub const fn secs_to_ticks(secs: f32) -> u32 {
    (secs * consts::TICKS_PER_SECOND as f32 + 0.5) as u32
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Quadratic ease-out over [0, 1]
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}
