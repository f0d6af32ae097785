//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (left player first, projectiles in fire order)
//! - No rendering or platform dependencies; presentation goes through `EffectSink`

pub mod autopilot;
pub mod ball;
pub mod collision;
pub mod geom;
pub mod player;
pub mod pose;
pub mod powerup;
pub mod projectile;
pub mod state;
pub mod stepper;
pub mod tick;

pub use ball::{Ball, EnvHits};
pub use collision::{Body, ClaimSet, CollisionReport, detect_goal, detonate, resolve_collisions};
pub use geom::{Circle, Rect};
pub use player::{
    Action, ActionKind, Player, PlayerCommand, PlayerStatus, Side, TimedModifier, Weapon,
};
pub use pose::Pose;
pub use powerup::{Powerup, PowerupKind, PowerupManager, apply_powerup};
pub use projectile::{
    Arrow, ArrowState, Explosion, Projectile, Rocket, StuckTo, Surface, blast_falloff,
};
pub use state::{GameState, MatchPhase, MatchSnapshot};
pub use stepper::FixedStepper;
pub use tick::{TickInput, tick};
