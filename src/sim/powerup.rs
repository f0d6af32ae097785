//! Falling power-ups and the spawn timer

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geom::Rect;
use super::player::{BIG_PLAYER_MULTIPLIER, Player, SPEED_BOOST_MULTIPLIER, SUPER_JUMP_MULTIPLIER};
use crate::consts::GRAVITY;
use crate::secs_to_ticks;
use crate::settings::{ArenaConfig, MatchRules};

pub const POWERUP_SIZE: f32 = 30.0;
/// Descent speed cap while the parachute is open
pub const PARACHUTE_FALL_SPEED: f32 = 90.0;
/// Parachute detaches this far above the ground
pub const PARACHUTE_DETACH_HEIGHT: f32 = 60.0;
pub const MAX_DRIFT_SPEED: f32 = 60.0;
/// Keep spawns clear of the goals
pub const SPAWN_MARGIN: f32 = 120.0;

pub const ROCKET_PICKUP_AMMO: u32 = 3;
pub const ARROW_PICKUP_AMMO: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    SpeedBoost,
    SuperJump,
    BigPlayer,
    BallFreeze,
    RocketLauncher,
    Bow,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 6] = [
        PowerupKind::SpeedBoost,
        PowerupKind::SuperJump,
        PowerupKind::BigPlayer,
        PowerupKind::BallFreeze,
        PowerupKind::RocketLauncher,
        PowerupKind::Bow,
    ];
}

/// A crate drifting down under a parachute
#[derive(Debug, Clone)]
pub struct Powerup {
    pub kind: PowerupKind,
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    pub parachute: bool,
    pub landed: bool,
}

impl Powerup {
    pub fn new(kind: PowerupKind, pos: Vec2, drift: f32) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::new(drift, 0.0),
            active: true,
            parachute: true,
            landed: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, POWERUP_SIZE, POWERUP_SIZE)
    }

    /// Advance one tick; returns true on the tick it touches down
    pub fn update(&mut self, arena: &ArenaConfig, dt: f32) -> bool {
        if !self.active || self.landed {
            return false;
        }

        let half = POWERUP_SIZE / 2.0;
        if self.parachute {
            self.vel.y = (self.vel.y + GRAVITY * 0.25 * dt).min(PARACHUTE_FALL_SPEED);
        } else {
            self.vel.y += GRAVITY * dt;
        }
        self.pos += self.vel * dt;

        if self.pos.x - half < 0.0 {
            self.pos.x = half;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + half > arena.width {
            self.pos.x = arena.width - half;
            self.vel.x = -self.vel.x.abs();
        }

        if self.parachute && self.pos.y + half > arena.ground_y - PARACHUTE_DETACH_HEIGHT {
            self.parachute = false;
        }

        if self.pos.y + half >= arena.ground_y {
            self.pos.y = arena.ground_y - half;
            self.vel = Vec2::ZERO;
            self.landed = true;
            return true;
        }

        if self.pos.y - half > arena.height {
            self.active = false;
        }
        false
    }
}

/// Spawn timer with a uniformly resampled interval
#[derive(Debug, Clone)]
pub struct PowerupManager {
    ticks_until_spawn: u32,
}

impl PowerupManager {
    pub fn new<R: Rng>(rules: &MatchRules, rng: &mut R) -> Self {
        Self {
            ticks_until_spawn: Self::sample_interval(rules, rng),
        }
    }

    #[inline]
    pub fn ticks_until_spawn(&self) -> u32 {
        self.ticks_until_spawn
    }

    fn sample_interval<R: Rng>(rules: &MatchRules, rng: &mut R) -> u32 {
        let min = rules.powerup_spawn_min_secs;
        let max = rules.powerup_spawn_max_secs;
        let secs = if max > min {
            rng.random_range(min..=max)
        } else {
            min
        };
        secs_to_ticks(secs).max(1)
    }

    /// Restart the countdown (match reset)
    pub fn reset<R: Rng>(&mut self, rules: &MatchRules, rng: &mut R) {
        self.ticks_until_spawn = Self::sample_interval(rules, rng);
    }

    /// Count down one tick; yields a new power-up when the timer fires
    pub fn update<R: Rng>(
        &mut self,
        rules: &MatchRules,
        arena: &ArenaConfig,
        rng: &mut R,
    ) -> Option<Powerup> {
        self.ticks_until_spawn = self.ticks_until_spawn.saturating_sub(1);
        if self.ticks_until_spawn > 0 {
            return None;
        }
        self.ticks_until_spawn = Self::sample_interval(rules, rng);

        if rules.enabled_powerups.is_empty() {
            return None;
        }
        let kind = rules.enabled_powerups[rng.random_range(0..rules.enabled_powerups.len())];

        let margin = SPAWN_MARGIN.min(arena.width / 4.0);
        let x = rng.random_range(margin..arena.width - margin);
        let drift = rng.random_range(-MAX_DRIFT_SPEED..=MAX_DRIFT_SPEED);
        let pos = Vec2::new(x, arena.ceiling_y - POWERUP_SIZE);

        log::debug!("Spawned {:?} at x={:.0}", kind, x);
        Some(Powerup::new(kind, pos, drift))
    }
}

/// Apply a collected power-up to `player` (or the ball, for freezes)
pub fn apply_powerup(kind: PowerupKind, player: &mut Player, ball: &mut Ball, rules: &MatchRules) {
    let buff_ticks = secs_to_ticks(rules.buff_secs);
    match kind {
        PowerupKind::SpeedBoost => player.speed.apply(SPEED_BOOST_MULTIPLIER, buff_ticks),
        PowerupKind::SuperJump => player.jump_boost.apply(SUPER_JUMP_MULTIPLIER, buff_ticks),
        PowerupKind::BigPlayer => {
            player.size.apply(BIG_PLAYER_MULTIPLIER, buff_ticks);
            player.set_size_multiplier(player.size.multiplier);
        }
        PowerupKind::BallFreeze => ball.freeze(secs_to_ticks(rules.freeze_secs)),
        PowerupKind::RocketLauncher => player.equip_rocket_launcher(ROCKET_PICKUP_AMMO),
        PowerupKind::Bow => player.equip_bow(ARROW_PICKUP_AMMO),
    }
    log::debug!("{:?} collected {:?}", player.side, kind);
}
