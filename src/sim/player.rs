//! Player entity: locomotion, actions, timed modifiers and weapons
//!
//! Kicking, tumbling, stunned and itching are mutually exclusive, so they
//! live in a single `Action` enum; entering one replaces whatever was there.
//! Jumping and pushback overlap with them and are tracked separately.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::{Circle, Rect};
use super::pose::{self, Pose};
use super::projectile::{Arrow, Projectile, Rocket};
use crate::consts::{GRAVITY, SIM_DT};
use crate::secs_to_ticks;
use crate::settings::ArenaConfig;

pub const MOVE_SPEED: f32 = 320.0;
pub const JUMP_POWER: f32 = 620.0;
/// Horizontal velocity kept per tick on the ground with no input
pub const GROUND_FRICTION: f32 = 0.75;
/// Horizontal velocity kept per tick in the air with no input
pub const AIR_DRAG: f32 = 0.98;
/// Horizontal velocity kept per tick while pushed back
pub const PUSHBACK_DRAG: f32 = 0.97;
/// Movement scale while itching
pub const ITCH_MOVE_FACTOR: f32 = 0.6;

pub const KICK_DURATION_TICKS: u32 = secs_to_ticks(0.35);
pub const TUMBLE_DURATION_TICKS: u32 = secs_to_ticks(0.9);
pub const STUN_DURATION_TICKS: u32 = secs_to_ticks(0.6);
pub const ITCH_DURATION_TICKS: u32 = secs_to_ticks(2.0);
pub const PUSHBACK_DURATION_TICKS: u32 = secs_to_ticks(0.35);
pub const FIRE_COOLDOWN_TICKS: u32 = secs_to_ticks(0.4);

/// Landing faster than this raises the just-landed signal
pub const LANDING_SPEED_THRESHOLD: f32 = 300.0;
/// Tumble spin speed range (radians/s)
pub const TUMBLE_SPIN_MIN: f32 = 8.0;
pub const TUMBLE_SPIN_MAX: f32 = 14.0;

pub const SPEED_BOOST_MULTIPLIER: f32 = 1.6;
pub const SUPER_JUMP_MULTIPLIER: f32 = 1.45;
pub const BIG_PLAYER_MULTIPLIER: f32 = 1.5;
/// Stacked buffs never exceed this many base durations
pub const MAX_BUFF_STACK: u32 = 2;

// Body shape at size multiplier 1.0
pub const HEAD_RADIUS: f32 = 18.0;
pub const TORSO_LENGTH: f32 = 40.0;
pub const ARM_LENGTH: f32 = 30.0;
pub const LEG_LENGTH: f32 = 40.0;
pub const LIMB_THICKNESS: f32 = 5.0;
pub const BODY_WIDTH: f32 = 30.0;
pub const FEET_HEIGHT: f32 = 6.0;

/// Which end of the pitch a player defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Facing at kick-off (toward the opponent's goal)
    #[inline]
    pub fn attack_direction(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// One tick of commands for a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerCommand {
    /// Held
    pub left: bool,
    /// Held
    pub right: bool,
    /// Just pressed
    pub jump: bool,
    /// Just pressed
    pub kick: bool,
    /// Just pressed
    pub fire: bool,
}

/// Mutually exclusive actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    Kicking { elapsed: u32, connected: bool },
    Tumbling { elapsed: u32, spin_speed: f32 },
    Stunned { elapsed: u32, duration: u32 },
    Itching { elapsed: u32 },
}

/// Observable action label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    None,
    Kicking,
    Tumbling,
    Stunned,
    Itching,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::None => ActionKind::None,
            Action::Kicking { .. } => ActionKind::Kicking,
            Action::Tumbling { .. } => ActionKind::Tumbling,
            Action::Stunned { .. } => ActionKind::Stunned,
            Action::Itching { .. } => ActionKind::Itching,
        }
    }
}

/// A multiplier with a countdown; resets to 1.0 when it runs out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedModifier {
    pub multiplier: f32,
    pub ticks: u32,
}

impl Default for TimedModifier {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            ticks: 0,
        }
    }
}

impl TimedModifier {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.ticks > 0
    }

    /// Start, or extend an active modifier (capped at `MAX_BUFF_STACK` durations).
    /// A zero duration is ignored, since nothing would ever expire it.
    pub fn apply(&mut self, multiplier: f32, duration: u32) {
        if duration == 0 {
            return;
        }
        self.multiplier = multiplier;
        self.ticks = self
            .ticks
            .saturating_add(duration)
            .min(duration.saturating_mul(MAX_BUFF_STACK));
    }

    /// Count down one tick; true when the modifier just expired
    pub fn tick(&mut self) -> bool {
        if self.ticks == 0 {
            return false;
        }
        self.ticks -= 1;
        if self.ticks == 0 {
            self.multiplier = 1.0;
            return true;
        }
        false
    }
}

/// Equipped weapon; holding one excludes the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    None,
    RocketLauncher { ammo: u32 },
    Bow { ammo: u32 },
}

impl Weapon {
    pub fn ammo(&self) -> u32 {
        match self {
            Weapon::None => 0,
            Weapon::RocketLauncher { ammo } | Weapon::Bow { ammo } => *ammo,
        }
    }
}

/// Body geometry scaled by the size multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDims {
    pub head_radius: f32,
    pub torso_length: f32,
    pub arm_length: f32,
    pub leg_length: f32,
    /// Limb thickness does not scale
    pub limb_thickness: f32,
    pub body_width: f32,
}

impl BodyDims {
    pub fn scaled(size: f32) -> Self {
        Self {
            head_radius: HEAD_RADIUS * size,
            torso_length: TORSO_LENGTH * size,
            arm_length: ARM_LENGTH * size,
            leg_length: LEG_LENGTH * size,
            limb_thickness: LIMB_THICKNESS,
            body_width: BODY_WIDTH * size,
        }
    }
}

/// Read-only view of a player for HUD collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub side: Side,
    pub pos: Vec2,
    pub facing: f32,
    pub action: ActionKind,
    pub walking: bool,
    pub jumping: bool,
    pub pushed_back: bool,
    pub speed: TimedModifier,
    pub jump: TimedModifier,
    pub size: TimedModifier,
    pub weapon: Weapon,
}

/// What a player did during its own update
#[derive(Debug, Default)]
pub struct PlayerTickOutcome {
    pub jumped: bool,
    pub kicked: bool,
    pub fired: Option<Projectile>,
    /// Landing speed when the just-landed signal fired
    pub landed: Option<f32>,
}

/// A stick-figure athlete; `pos` is the feet anchor
#[derive(Debug, Clone)]
pub struct Player {
    pub side: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub action: Action,
    /// In the air after a jump, fall or knock
    pub airborne: bool,
    pub on_head: bool,
    pub on_crossbar: bool,
    pub pushback_ticks: u32,
    pub speed: TimedModifier,
    pub jump_boost: TimedModifier,
    pub size: TimedModifier,
    pub weapon: Weapon,
    fire_cooldown: u32,
    dims: BodyDims,
    /// Derived each tick, never authoritative
    pub pose: Pose,
    walk_phase: f32,
    /// One-shot landing speed from the most recent update
    pub just_landed: Option<f32>,
}

impl Player {
    pub fn new(side: Side, pos: Vec2) -> Self {
        Self {
            side,
            pos,
            vel: Vec2::ZERO,
            facing: side.attack_direction(),
            action: Action::None,
            airborne: false,
            on_head: false,
            on_crossbar: false,
            pushback_ticks: 0,
            speed: TimedModifier::default(),
            jump_boost: TimedModifier::default(),
            size: TimedModifier::default(),
            weapon: Weapon::None,
            fire_cooldown: 0,
            dims: BodyDims::scaled(1.0),
            pose: pose::NEUTRAL,
            walk_phase: 0.0,
            just_landed: None,
        }
    }

    /// Back to the kick-off spot; modifiers and weapons are kept
    pub fn reset_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.facing = self.side.attack_direction();
        self.action = Action::None;
        self.airborne = false;
        self.on_head = false;
        self.on_crossbar = false;
        self.pushback_ticks = 0;
        self.fire_cooldown = 0;
        self.pose = pose::NEUTRAL;
        self.just_landed = None;
    }

    // === Geometry ===

    #[inline]
    pub fn dims(&self) -> &BodyDims {
        &self.dims
    }

    #[inline]
    pub fn size_multiplier(&self) -> f32 {
        self.size.multiplier
    }

    /// Change the size multiplier and rebuild the body geometry
    pub fn set_size_multiplier(&mut self, size: f32) {
        self.size.multiplier = size;
        self.dims = BodyDims::scaled(size);
    }

    #[inline]
    pub fn hip(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, self.dims.leg_length)
    }

    #[inline]
    pub fn neck(&self) -> Vec2 {
        self.hip() - Vec2::new(0.0, self.dims.torso_length)
    }

    #[inline]
    pub fn head_center(&self) -> Vec2 {
        self.neck() - Vec2::new(0.0, self.dims.head_radius)
    }

    pub fn head(&self) -> Circle {
        Circle::new(self.head_center(), self.dims.head_radius)
    }

    /// Torso and legs, from the neck down to the feet
    pub fn body_rect(&self) -> Rect {
        let top = self.neck().y;
        Rect::new(
            self.pos.x - self.dims.body_width / 2.0,
            top,
            self.dims.body_width,
            self.pos.y - top,
        )
    }

    pub fn feet_rect(&self) -> Rect {
        Rect::new(
            self.pos.x - self.dims.body_width / 2.0,
            self.pos.y - FEET_HEIGHT,
            self.dims.body_width,
            FEET_HEIGHT,
        )
    }

    /// Where a fired projectile leaves the body
    pub fn hand(&self) -> Vec2 {
        self.neck()
            + Vec2::new(self.facing * self.dims.arm_length * 0.8, self.dims.arm_length * 0.2)
    }

    // === Action queries ===

    #[inline]
    pub fn is_kicking(&self) -> bool {
        matches!(self.action, Action::Kicking { .. })
    }

    #[inline]
    pub fn is_tumbling(&self) -> bool {
        matches!(self.action, Action::Tumbling { .. })
    }

    #[inline]
    pub fn is_stunned(&self) -> bool {
        matches!(self.action, Action::Stunned { .. })
    }

    #[inline]
    pub fn is_itching(&self) -> bool {
        matches!(self.action, Action::Itching { .. })
    }

    #[inline]
    pub fn is_pushed_back(&self) -> bool {
        self.pushback_ticks > 0
    }

    /// Kick progress in [0, 1], `None` when not kicking
    pub fn kick_progress(&self) -> Option<f32> {
        match self.action {
            Action::Kicking { elapsed, .. } => Some(elapsed as f32 / KICK_DURATION_TICKS as f32),
            _ => None,
        }
    }

    /// Foot tip of the kicking leg, `None` when not kicking
    pub fn kick_foot(&self) -> Option<Vec2> {
        let progress = self.kick_progress()?;
        let offset = pose::kick_pose(progress).front_foot_offset(self.dims.leg_length, self.facing);
        Some(self.hip() + offset)
    }

    /// Foot tip while inside the impact window of a kick that has not
    /// connected yet
    pub fn kick_impact_point(&self) -> Option<Vec2> {
        match self.action {
            Action::Kicking {
                connected: false, ..
            } => {
                let progress = self.kick_progress()?;
                if pose::in_impact_window(progress) {
                    self.kick_foot()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Record that the current kick struck something
    pub fn mark_kick_connected(&mut self) {
        if let Action::Kicking { connected, .. } = &mut self.action {
            *connected = true;
        }
    }

    /// Stop kicking immediately
    pub fn cancel_kick(&mut self) {
        if self.is_kicking() {
            self.action = Action::None;
        }
    }

    // === Action starts (no-ops returning false when not allowed) ===

    /// Jump from the ground, another player's head or a crossbar
    pub fn jump(&mut self) -> bool {
        if self.is_kicking() || self.is_stunned() || self.is_tumbling() || self.is_itching() {
            return false;
        }
        let standing = self.on_head || self.on_crossbar;
        if self.airborne && !standing {
            return false;
        }
        self.vel.y = -JUMP_POWER * self.jump_boost.multiplier;
        self.airborne = true;
        self.on_head = false;
        self.on_crossbar = false;
        true
    }

    pub fn start_kick(&mut self) -> bool {
        if self.is_kicking() || self.is_stunned() || self.is_tumbling() || self.is_itching() {
            return false;
        }
        self.action = Action::Kicking {
            elapsed: 0,
            connected: false,
        };
        true
    }

    /// Forced spin after a heavy impact; always succeeds
    pub fn start_tumble<R: Rng>(&mut self, rng: &mut R) {
        let speed = rng.random_range(TUMBLE_SPIN_MIN..TUMBLE_SPIN_MAX);
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.action = Action::Tumbling {
            elapsed: 0,
            spin_speed: speed * direction,
        };
        self.airborne = true;
        self.on_head = false;
        self.on_crossbar = false;
    }

    pub fn start_itching_frenzy(&mut self) -> bool {
        if self.is_itching() || self.is_stunned() || self.is_tumbling() {
            return false;
        }
        self.action = Action::Itching { elapsed: 0 };
        true
    }

    /// Daze for `ticks`; overrides any other action
    pub fn stun(&mut self, ticks: u32) {
        if ticks == 0 {
            return;
        }
        self.action = Action::Stunned {
            elapsed: 0,
            duration: ticks,
        };
    }

    /// Forced velocity that suppresses horizontal input for a short window
    pub fn push_back(&mut self, vel: Vec2) {
        self.vel = vel;
        self.pushback_ticks = PUSHBACK_DURATION_TICKS;
        self.airborne = true;
        self.on_head = false;
        self.on_crossbar = false;
    }

    // === Equipment ===

    /// Add rockets, swapping out a bow if held
    pub fn equip_rocket_launcher(&mut self, ammo: u32) {
        self.weapon = match self.weapon {
            Weapon::RocketLauncher { ammo: held } => Weapon::RocketLauncher { ammo: held + ammo },
            _ => Weapon::RocketLauncher { ammo },
        };
    }

    /// Add arrows, swapping out a rocket launcher if held
    pub fn equip_bow(&mut self, ammo: u32) {
        self.weapon = match self.weapon {
            Weapon::Bow { ammo: held } => Weapon::Bow { ammo: held + ammo },
            _ => Weapon::Bow { ammo },
        };
    }

    #[inline]
    pub fn has_rocket_launcher(&self) -> bool {
        matches!(self.weapon, Weapon::RocketLauncher { .. })
    }

    #[inline]
    pub fn has_bow(&self) -> bool {
        matches!(self.weapon, Weapon::Bow { .. })
    }

    /// Fire the held weapon; `None` when there is nothing to fire
    pub fn fire_weapon(&mut self) -> Option<Projectile> {
        if self.fire_cooldown > 0 || self.is_stunned() || self.is_tumbling() || self.is_itching() {
            return None;
        }

        let origin = self.hand();
        let (projectile, remaining) = match self.weapon {
            Weapon::None => return None,
            Weapon::RocketLauncher { ammo } if ammo > 0 => (
                Projectile::Rocket(Rocket::new(self.side, origin, self.facing)),
                Weapon::RocketLauncher { ammo: ammo - 1 },
            ),
            Weapon::Bow { ammo } if ammo > 0 => (
                Projectile::Arrow(Arrow::fire(self.side, origin, self.facing)),
                Weapon::Bow { ammo: ammo - 1 },
            ),
            _ => {
                self.weapon = Weapon::None;
                return None;
            }
        };

        self.weapon = if remaining.ammo() == 0 {
            Weapon::None
        } else {
            remaining
        };
        self.fire_cooldown = FIRE_COOLDOWN_TICKS;
        Some(projectile)
    }

    // === Per-tick update ===

    /// Apply commands, advance timers and integrate physics for one tick
    pub fn update(
        &mut self,
        cmd: &PlayerCommand,
        arena: &ArenaConfig,
        dt: f32,
    ) -> PlayerTickOutcome {
        let mut outcome = PlayerTickOutcome::default();
        self.just_landed = None;

        // Actions read the standing flags left by last tick's collisions
        if cmd.jump {
            outcome.jumped = self.jump();
        }
        if cmd.kick {
            outcome.kicked = self.start_kick();
        }
        if cmd.fire {
            outcome.fired = self.fire_weapon();
        }

        self.advance_timers();
        self.advance_action();
        self.apply_horizontal_input(cmd);

        // Vertical integration always runs before contact tests
        let prev_y = self.pos.y;
        self.vel.y += GRAVITY * dt;
        self.pos += self.vel * dt;
        self.on_head = false;
        self.on_crossbar = false;

        let was_airborne = self.airborne;
        let landing_speed = self.resolve_surfaces(arena, prev_y);
        if let Some(speed) = landing_speed
            && was_airborne
            && speed > LANDING_SPEED_THRESHOLD
        {
            self.just_landed = Some(speed);
            outcome.landed = Some(speed);
        }

        self.update_pose(dt);
        outcome
    }

    fn advance_timers(&mut self) {
        self.speed.tick();
        self.jump_boost.tick();
        if self.size.tick() {
            self.set_size_multiplier(1.0);
        }
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        self.pushback_ticks = self.pushback_ticks.saturating_sub(1);
    }

    fn advance_action(&mut self) {
        self.action = match self.action {
            Action::None => Action::None,
            Action::Kicking { elapsed, connected } => {
                let elapsed = elapsed + 1;
                if elapsed >= KICK_DURATION_TICKS {
                    Action::None
                } else {
                    Action::Kicking { elapsed, connected }
                }
            }
            Action::Tumbling {
                elapsed,
                spin_speed,
            } => {
                let elapsed = elapsed + 1;
                if elapsed >= TUMBLE_DURATION_TICKS {
                    // Comes out of the spin upright but dazed
                    Action::Stunned {
                        elapsed: 0,
                        duration: STUN_DURATION_TICKS,
                    }
                } else {
                    Action::Tumbling {
                        elapsed,
                        spin_speed,
                    }
                }
            }
            Action::Stunned { elapsed, duration } => {
                let elapsed = elapsed + 1;
                if elapsed >= duration {
                    Action::None
                } else {
                    Action::Stunned { elapsed, duration }
                }
            }
            Action::Itching { elapsed } => {
                let elapsed = elapsed + 1;
                if elapsed >= ITCH_DURATION_TICKS {
                    Action::None
                } else {
                    Action::Itching { elapsed }
                }
            }
        };
    }

    fn apply_horizontal_input(&mut self, cmd: &PlayerCommand) {
        let drag = if self.airborne { AIR_DRAG } else { GROUND_FRICTION };

        if self.is_pushed_back() {
            self.vel.x *= PUSHBACK_DRAG;
            return;
        }
        if self.is_tumbling() || self.is_stunned() {
            self.vel.x *= drag;
            return;
        }

        let dir = match (cmd.left, cmd.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        if dir == 0.0 {
            self.vel.x *= drag;
            if self.vel.x.abs() < 1.0 {
                self.vel.x = 0.0;
            }
            return;
        }

        let factor = if self.is_itching() { ITCH_MOVE_FACTOR } else { 1.0 };
        self.vel.x = dir * MOVE_SPEED * self.speed.multiplier * factor;
        if !self.is_kicking() {
            self.facing = dir;
        }
    }

    /// Ground, crossbars and side boundaries; returns the landing speed
    fn resolve_surfaces(&mut self, arena: &ArenaConfig, prev_y: f32) -> Option<f32> {
        let mut landing = None;

        if self.pos.y >= arena.ground_y {
            self.pos.y = arena.ground_y;
            if self.vel.y > 0.0 {
                landing = Some(self.vel.y);
                self.vel.y = 0.0;
            }
            self.airborne = false;
        }

        let half_w = self.dims.body_width / 2.0;
        for bar in arena.crossbars() {
            let over_bar =
                self.pos.x + half_w * 0.5 > bar.left() && self.pos.x - half_w * 0.5 < bar.right();
            if !over_bar {
                continue;
            }

            // Land on top when the feet cross the bar's top edge
            if self.vel.y >= 0.0 && prev_y <= bar.top() && self.pos.y >= bar.top() {
                self.pos.y = bar.top();
                landing = Some(self.vel.y);
                self.vel.y = 0.0;
                self.airborne = false;
                self.on_crossbar = true;
                continue;
            }

            // Bump the head on the underside
            let head_top = self.head_center().y - self.dims.head_radius;
            if self.vel.y < 0.0 && head_top < bar.bottom() && self.pos.y > bar.bottom() {
                self.pos.y += bar.bottom() - head_top;
                self.vel.y = 0.0;
            }
        }

        // Walked off a head or crossbar; the collision pass re-grounds
        // players still standing on a head
        if self.pos.y < arena.ground_y && !self.on_crossbar {
            self.airborne = true;
        }

        let min_x = half_w;
        let max_x = arena.width - half_w;
        if self.pos.x < min_x {
            self.pos.x = min_x;
            self.vel.x = self.vel.x.max(0.0);
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = self.vel.x.min(0.0);
        }

        landing
    }

    fn update_pose(&mut self, dt: f32) {
        let secs = |ticks: u32| ticks as f32 * SIM_DT;
        self.pose = match self.action {
            Action::Kicking { elapsed, .. } => {
                pose::kick_pose(elapsed as f32 / KICK_DURATION_TICKS as f32)
            }
            Action::Tumbling {
                elapsed,
                spin_speed,
            } => pose::tumble_pose(spin_speed * secs(elapsed)),
            Action::Stunned { elapsed, .. } => pose::stunned_pose(secs(elapsed)),
            Action::Itching { elapsed } => pose::itch_pose(secs(elapsed)),
            Action::None if self.airborne => pose::jump_pose(),
            Action::None if self.vel.x.abs() > 20.0 => {
                self.walk_phase += self.vel.x.abs() * dt / (self.dims.leg_length * 0.5);
                pose::walk_pose(self.walk_phase)
            }
            Action::None => pose::NEUTRAL,
        };
    }

    /// Walking is derived from velocity and ground contact
    pub fn is_walking(&self) -> bool {
        !self.airborne && self.vel.x.abs() > 20.0
    }

    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            side: self.side,
            pos: self.pos,
            facing: self.facing,
            action: self.action.kind(),
            walking: self.is_walking(),
            jumping: self.airborne,
            pushed_back: self.is_pushed_back(),
            speed: self.speed,
            jump: self.jump_boost,
            size: self.size,
            weapon: self.weapon,
        }
    }
}
