//! Rockets and arrows
//!
//! Each projectile flies on its own here; hits against players and the ball
//! are decided by the collision engine, which calls back into `Arrow::stick`
//! and `Explosion::impulse_on`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::{Circle, direction_or_random};
use super::player::Side;
use crate::secs_to_ticks;
use crate::settings::ArenaConfig;

pub const ROCKET_SPEED: f32 = 700.0;
pub const ROCKET_RADIUS: f32 = 6.0;

pub const BLAST_RADIUS: f32 = 160.0;
/// Fixed upward velocity given to every player caught in a blast
pub const BLAST_PLAYER_LIFT: f32 = 650.0;
/// Outward push on players at the epicenter
pub const BLAST_PLAYER_PUSH: f32 = 550.0;
/// Outward push on the ball at the epicenter
pub const BLAST_BALL_PUSH: f32 = 900.0;
/// Extra upward kick on the ball at the epicenter
pub const BLAST_BALL_LIFT: f32 = 400.0;

pub const ARROW_SPEED: f32 = 900.0;
/// Initial upward velocity of a loosed arrow
pub const ARROW_LIFT: f32 = 120.0;
/// Arrows fall slower than everything else
pub const ARROW_GRAVITY: f32 = 500.0;
pub const ARROW_LENGTH: f32 = 34.0;
/// Horizontal pushback on a player struck by an arrow
pub const ARROW_PUSH: f32 = 260.0;
pub const ARROW_PUSH_LIFT: f32 = 180.0;
/// Fraction of arrow velocity handed to the ball
pub const ARROW_BALL_TRANSFER: f32 = 0.35;
/// How long a stuck arrow stays before the engine removes it
pub const STUCK_LIFETIME_TICKS: u32 = secs_to_ticks(3.0);

/// A fired projectile, as returned by `Player::fire_weapon`
#[derive(Debug, Clone)]
pub enum Projectile {
    Rocket(Rocket),
    Arrow(Arrow),
}

/// Straight-line rocket that explodes on contact
#[derive(Debug, Clone)]
pub struct Rocket {
    pub owner: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    /// Set by the engine on the first qualifying hit; detonation is deferred
    pub exploded: bool,
}

impl Rocket {
    pub fn new(owner: Side, pos: Vec2, facing: f32) -> Self {
        Self {
            owner,
            pos,
            vel: Vec2::new(facing.signum() * ROCKET_SPEED, 0.0),
            active: true,
            exploded: false,
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, ROCKET_RADIUS)
    }

    /// Fly one tick; leaves the arena -> inactive
    pub fn update(&mut self, arena: &ArenaConfig, dt: f32) {
        if !self.active || self.exploded {
            return;
        }
        self.pos += self.vel * dt;
        if self.pos.x < -ROCKET_RADIUS
            || self.pos.x > arena.width + ROCKET_RADIUS
            || self.pos.y < arena.ceiling_y - ROCKET_RADIUS
            || self.pos.y > arena.ground_y
        {
            log::debug!("rocket from {:?} left the arena", self.owner);
            self.active = false;
        }
    }
}

/// Linear falloff: 1 at the epicenter, 0 at (and beyond) the radius
#[inline]
pub fn blast_falloff(distance: f32, radius: f32) -> f32 {
    if distance >= radius || radius <= 0.0 {
        0.0
    } else {
        1.0 - distance / radius
    }
}

/// A radial blast
#[derive(Debug, Clone, Copy)]
pub struct Explosion {
    pub center: Vec2,
    pub radius: f32,
}

impl Explosion {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            radius: BLAST_RADIUS,
        }
    }

    /// Outward direction and strength (0-1] for a target point, `None`
    /// when out of range
    pub fn impulse_on<R: Rng>(&self, target: Vec2, rng: &mut R) -> Option<(Vec2, f32)> {
        let strength = blast_falloff(self.center.distance(target), self.radius);
        if strength <= 0.0 {
            return None;
        }
        Some((direction_or_random(self.center, target, rng), strength))
    }

    /// Velocity a caught player is launched with
    pub fn player_velocity(dir: Vec2, strength: f32) -> Vec2 {
        Vec2::new(0.0, -BLAST_PLAYER_LIFT) + dir * BLAST_PLAYER_PUSH * strength
    }

    /// Impulse added to a caught ball
    pub fn ball_impulse(dir: Vec2, strength: f32) -> Vec2 {
        dir * BLAST_BALL_PUSH * strength + Vec2::new(0.0, -BLAST_BALL_LIFT * strength)
    }
}

/// Static scenery an arrow can stick into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Ground,
    Crossbar,
}

/// What a stuck arrow rides along with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StuckTo {
    Player(Side),
    Ball,
    Static(Surface),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowState {
    Flying,
    /// `offset` is relative to the target's anchor (world position for
    /// static scenery)
    Stuck {
        target: StuckTo,
        offset: Vec2,
        ticks: u32,
    },
}

/// Arrow under reduced gravity; the tip is the collision point
#[derive(Debug, Clone)]
pub struct Arrow {
    pub owner: Side,
    /// Shaft center
    pub pos: Vec2,
    pub vel: Vec2,
    /// Shaft angle (radians), follows velocity while flying
    pub angle: f32,
    pub state: ArrowState,
    pub active: bool,
}

impl Arrow {
    /// Loose an arrow from `origin` toward `facing`
    pub fn fire(owner: Side, origin: Vec2, facing: f32) -> Self {
        let vel = Vec2::new(facing.signum() * ARROW_SPEED, -ARROW_LIFT);
        Self {
            owner,
            pos: origin,
            vel,
            angle: vel.y.atan2(vel.x),
            state: ArrowState::Flying,
            active: true,
        }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    /// Point of the arrowhead
    #[inline]
    pub fn tip(&self) -> Vec2 {
        self.pos + self.direction() * (ARROW_LENGTH / 2.0)
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.active && self.state == ArrowState::Flying
    }

    pub fn stuck_to(&self) -> Option<StuckTo> {
        match self.state {
            ArrowState::Stuck { target, .. } => Some(target),
            ArrowState::Flying => None,
        }
    }

    /// Fly one tick; sticks into the ground or a crossbar, drops out when it
    /// leaves the screen sideways
    pub fn update_flight(&mut self, arena: &ArenaConfig, dt: f32) {
        if !self.is_flying() {
            return;
        }
        self.vel.y += ARROW_GRAVITY * dt;
        self.pos += self.vel * dt;
        self.angle = self.vel.y.atan2(self.vel.x);

        let tip = self.tip();
        if tip.x < 0.0 || tip.x > arena.width {
            log::debug!("arrow from {:?} left the arena", self.owner);
            self.active = false;
            return;
        }

        if tip.y >= arena.ground_y {
            let impact = Vec2::new(tip.x, arena.ground_y);
            self.stick(StuckTo::Static(Surface::Ground), impact, Vec2::ZERO);
            return;
        }

        for bar in arena.crossbars() {
            if bar.contains(tip) {
                self.stick(StuckTo::Static(Surface::Crossbar), tip, Vec2::ZERO);
                return;
            }
        }
    }

    /// Snap the tip to `impact` and ride along with `anchor` from now on
    pub fn stick(&mut self, target: StuckTo, impact: Vec2, anchor: Vec2) {
        self.pos = impact - self.direction() * (ARROW_LENGTH / 2.0);
        self.vel = Vec2::ZERO;
        self.state = ArrowState::Stuck {
            target,
            offset: self.pos - anchor,
            ticks: 0,
        };
    }

    /// Re-place a stuck arrow relative to its target's current anchor
    pub fn follow(&mut self, anchor: Vec2) {
        if let ArrowState::Stuck { offset, .. } = self.state {
            self.pos = anchor + offset;
        }
    }

    /// Age a stuck arrow; deactivates it when its lifetime runs out
    pub fn age(&mut self) {
        if let ArrowState::Stuck { ticks, .. } = &mut self.state {
            *ticks += 1;
            if *ticks >= STUCK_LIFETIME_TICKS {
                self.active = false;
            }
        }
    }
}
