//! Ball entity and its self-contained physics
//!
//! Gravity, friction, ground/wall/ceiling bounces and crossbar deflection.
//! The collision engine reuses `resolve_environment` after players have
//! pushed the ball around.

use glam::Vec2;

use super::geom::{Axis, Circle, circle_rect_penetration};
use crate::consts::GRAVITY;
use crate::settings::ArenaConfig;

pub const BALL_RADIUS: f32 = 15.0;
/// Multiplicative velocity damping per tick
pub const BALL_FRICTION: f32 = 0.995;
/// Vertical restitution on ground / ceiling
pub const BALL_BOUNCE: f32 = 0.7;
/// Horizontal restitution on side walls
pub const BALL_WALL_BOUNCE: f32 = 0.7;
/// Extra horizontal damping applied on each ground bounce
pub const BALL_GROUND_DAMPING: f32 = 0.9;
/// Downward speeds below this settle instead of bouncing
pub const BALL_BOUNCE_THRESHOLD: f32 = 50.0;
/// Restitution off the crossbars
pub const CROSSBAR_BOUNCE: f32 = 0.6;
/// Minimum outward speed after a vertical crossbar hit
pub const CROSSBAR_MIN_SPEED: f32 = 120.0;

/// Which surfaces the ball struck during an environment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvHits {
    /// Ground contact that produced a real bounce
    pub ground_bounce: bool,
    /// Ground contact of any kind (including settling)
    pub grounded: bool,
    pub wall: bool,
    pub ceiling: bool,
    pub crossbar: bool,
}

impl EnvHits {
    /// True when any audible bounce happened
    pub fn bounced(&self) -> bool {
        self.ground_bounce || self.wall || self.ceiling || self.crossbar
    }
}

/// The ball
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Visual rotation (radians), cosmetic only
    pub rotation: f32,
    /// Remaining frozen ticks (0 = free)
    freeze_ticks: u32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            rotation: 0.0,
            freeze_ticks: 0,
        }
    }

    /// Bounding circle
    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.freeze_ticks > 0
    }

    /// Remaining freeze duration in ticks
    #[inline]
    pub fn freeze_remaining(&self) -> u32 {
        self.freeze_ticks
    }

    /// Freeze in place for `ticks`; a longer existing freeze is kept
    pub fn freeze(&mut self, ticks: u32) {
        self.freeze_ticks = self.freeze_ticks.max(ticks);
        self.vel = Vec2::ZERO;
    }

    /// Add an impulse; ignored while frozen
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.is_frozen() {
            return;
        }
        self.vel += impulse;
    }

    /// Replace velocity; ignored while frozen
    pub fn set_velocity(&mut self, vel: Vec2) {
        if self.is_frozen() {
            return;
        }
        self.vel = vel;
    }

    /// Place the ball at `pos` at rest and unfrozen
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.rotation = 0.0;
        self.freeze_ticks = 0;
    }

    /// Advance one tick
    pub fn update(&mut self, arena: &ArenaConfig, dt: f32) -> EnvHits {
        if self.freeze_ticks > 0 {
            self.freeze_ticks -= 1;
            self.vel = Vec2::ZERO;
            return EnvHits::default();
        }

        self.vel.y += GRAVITY * dt;
        self.vel *= BALL_FRICTION;
        self.pos += self.vel * dt;
        self.rotation += self.vel.x * dt / self.radius;

        self.resolve_environment(arena)
    }

    /// Resolve ground, side walls, ceiling and crossbars
    pub fn resolve_environment(&mut self, arena: &ArenaConfig) -> EnvHits {
        let mut hits = EnvHits::default();
        let r = self.radius;

        // Ground
        if self.pos.y + r > arena.ground_y {
            self.pos.y = arena.ground_y - r;
            hits.grounded = true;
            if self.vel.y > BALL_BOUNCE_THRESHOLD {
                self.vel.y = -self.vel.y * BALL_BOUNCE;
                self.vel.x *= BALL_GROUND_DAMPING;
                hits.ground_bounce = true;
            } else if self.vel.y > 0.0 {
                self.vel.y = 0.0;
            }
        }

        // Side walls exist only above the goal mouth; below it the screen
        // edge behind the goal line acts as the net.
        let above_goal = self.pos.y < arena.goal_mouth_top();
        if self.pos.x - r < 0.0 {
            self.pos.x = r;
            if self.vel.x < 0.0 {
                self.vel.x = -self.vel.x * BALL_WALL_BOUNCE;
            }
            hits.wall = above_goal;
        } else if self.pos.x + r > arena.width {
            self.pos.x = arena.width - r;
            if self.vel.x > 0.0 {
                self.vel.x = -self.vel.x * BALL_WALL_BOUNCE;
            }
            hits.wall = above_goal;
        }

        // Ceiling
        if self.pos.y - r < arena.ceiling_y {
            self.pos.y = arena.ceiling_y + r;
            if self.vel.y < 0.0 {
                self.vel.y = -self.vel.y * BALL_BOUNCE;
            }
            hits.ceiling = true;
        }

        for bar in arena.crossbars() {
            let Some(pen) = circle_rect_penetration(&self.circle(), &bar) else {
                continue;
            };
            self.pos += pen.normal * pen.depth;
            hits.crossbar = true;

            match pen.axis {
                Axis::Horizontal => {
                    if self.vel.x * pen.normal.x < 0.0 {
                        self.vel.x = -self.vel.x * CROSSBAR_BOUNCE;
                    }
                }
                Axis::Vertical => {
                    let outward = pen.normal.y.signum();
                    let speed = (self.vel.y.abs() * CROSSBAR_BOUNCE).max(CROSSBAR_MIN_SPEED);
                    self.vel.y = outward * speed;
                }
            }
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn arena() -> ArenaConfig {
        ArenaConfig::default()
    }

    #[test]
    fn test_ball_falls_under_gravity() {
        let mut ball = Ball::new(Vec2::new(600.0, 100.0));
        ball.update(&arena(), SIM_DT);
        assert!(ball.vel.y > 0.0);
        assert!(ball.pos.y > 100.0);
    }

    #[test]
    fn test_fast_ground_hit_bounces() {
        let arena = arena();
        let mut ball = Ball::new(Vec2::new(600.0, arena.ground_y - BALL_RADIUS + 2.0));
        ball.vel = Vec2::new(100.0, 400.0);
        let hits = ball.resolve_environment(&arena);
        assert!(hits.ground_bounce);
        assert!(ball.vel.y < 0.0);
        assert!((ball.vel.x - 90.0).abs() < 1e-3);
        assert_eq!(ball.pos.y, arena.ground_y - BALL_RADIUS);
    }

    #[test]
    fn test_slow_ground_contact_settles() {
        let arena = arena();
        let mut ball = Ball::new(Vec2::new(600.0, arena.ground_y - BALL_RADIUS + 1.0));
        ball.vel = Vec2::new(30.0, 20.0);
        let hits = ball.resolve_environment(&arena);
        assert!(!hits.ground_bounce);
        assert!(hits.grounded);
        assert_eq!(ball.vel.y, 0.0);
        assert_eq!(ball.vel.x, 30.0);
    }

    #[test]
    fn test_resting_ball_stays_on_ground() {
        let arena = arena();
        let mut ball = Ball::new(Vec2::new(600.0, arena.ground_y - BALL_RADIUS));
        for _ in 0..600 {
            ball.update(&arena, SIM_DT);
            assert!(ball.pos.y + ball.radius <= arena.ground_y + 1e-3);
        }
        assert!(ball.vel.y.abs() < BALL_BOUNCE_THRESHOLD);
    }

    #[test]
    fn test_wall_only_counts_above_goal() {
        let arena = arena();
        let mut ball = Ball::new(Vec2::new(5.0, 100.0));
        ball.vel = Vec2::new(-200.0, 0.0);
        let hits = ball.resolve_environment(&arena);
        assert!(hits.wall);
        assert!(ball.vel.x > 0.0);

        let mut ball = Ball::new(Vec2::new(5.0, arena.ground_y - 40.0));
        ball.vel = Vec2::new(-200.0, 0.0);
        let hits = ball.resolve_environment(&arena);
        assert!(!hits.wall);
    }

    #[test]
    fn test_crossbar_top_hit_pops_ball_up() {
        let arena = arena();
        let bar = arena.crossbars()[0];
        let mut ball = Ball::new(Vec2::new(bar.center().x, bar.top() - BALL_RADIUS + 3.0));
        ball.vel = Vec2::new(0.0, 10.0);
        let hits = ball.resolve_environment(&arena);
        assert!(hits.crossbar);
        assert!((ball.pos.y - (bar.top() - BALL_RADIUS)).abs() < 1e-3);
        assert!(ball.vel.y <= -CROSSBAR_MIN_SPEED);
    }

    #[test]
    fn test_crossbar_end_hit_reverses_horizontal() {
        let arena = arena();
        let bar = arena.crossbars()[0];
        let mut ball = Ball::new(Vec2::new(bar.right() + BALL_RADIUS - 4.0, bar.center().y));
        ball.vel = Vec2::new(-300.0, 0.0);
        ball.resolve_environment(&arena);
        assert!(ball.vel.x > 0.0);
        assert!((ball.vel.x - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_freeze_then_resume() {
        let arena = arena();
        let mut ball = Ball::new(Vec2::new(600.0, 200.0));
        ball.vel = Vec2::new(100.0, 100.0);
        ball.freeze(10);

        for _ in 0..9 {
            ball.update(&arena, SIM_DT);
            assert_eq!(ball.vel, Vec2::ZERO);
            assert_eq!(ball.pos, Vec2::new(600.0, 200.0));
        }
        ball.update(&arena, SIM_DT);
        assert!(!ball.is_frozen());
        assert_eq!(ball.vel, Vec2::ZERO);

        ball.update(&arena, SIM_DT);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_impulse_ignored_while_frozen() {
        let mut ball = Ball::new(Vec2::new(600.0, 200.0));
        ball.freeze(5);
        ball.apply_impulse(Vec2::new(500.0, 0.0));
        ball.set_velocity(Vec2::new(500.0, 0.0));
        assert_eq!(ball.vel, Vec2::ZERO);
    }
}
