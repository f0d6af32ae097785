//! Per-tick collision and resolution engine
//!
//! Runs once per tick after every entity has advanced on its own, in a fixed
//! order: pickups, player separation, head standing, ball contact, ball vs
//! environment, kicks to the head, projectiles, goals. Every resolved pair is
//! recorded in a `ClaimSet`, so no pair resolves twice in one tick and the
//! ball answers to at most one source.
//!
//! This is the only place that mutates two entities in the same call.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::geom::{circle_circle_penetration, circle_rect_penetration};
use super::player::{Player, Side};
use super::powerup::{Powerup, PowerupKind, apply_powerup};
use super::projectile::{
    ARROW_BALL_TRANSFER, ARROW_PUSH, ARROW_PUSH_LIFT, Arrow, Explosion, Rocket, StuckTo,
};
use super::state::{GameState, MatchPhase};
use crate::audio::{EffectKind, EffectParams, EffectSink, SoundEffect};
use crate::settings::{ArenaConfig, MatchRules};

/// Extra reach added to the ball radius for a kick
pub const KICK_REACH: f32 = 12.0;
/// Base kick velocity (x is scaled by facing)
pub const KICK_FORCE: Vec2 = Vec2::new(650.0, -380.0);
/// Fraction of the kicker's own velocity carried into the ball
pub const KICK_VELOCITY_CARRY: f32 = 0.5;
pub const HEADER_PUSH: f32 = 320.0;
pub const HEADER_LIFT: f32 = 520.0;
pub const HEADER_VELOCITY_CARRY: f32 = 0.4;
/// Restitution of the ball off a player's body
pub const BODY_BOUNCE: f32 = 0.5;
/// Share of the closing speed exchanged when players collide
pub const PLAYER_VELOCITY_TRANSFER: f32 = 0.5;
/// Feet this far above a head still snap onto it
pub const HEAD_STAND_TOLERANCE: f32 = 4.0;
/// Knock from a kick to the head (x is scaled by the kicker's facing)
pub const HEAD_KICK_PUSH: Vec2 = Vec2::new(520.0, -380.0);

/// Anything that can take part in a resolved pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Player(Side),
    Ball,
    Powerup(usize),
    Rocket(usize),
    Arrow(usize),
}

/// Pairs already resolved this tick (order-insensitive)
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    pairs: HashSet<(Body, Body)>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved pair; false if it was already claimed
    pub fn claim(&mut self, a: Body, b: Body) -> bool {
        if self.is_claimed(a, b) {
            return false;
        }
        self.pairs.insert((a, b))
    }

    pub fn is_claimed(&self, a: Body, b: Body) -> bool {
        self.pairs.contains(&(a, b)) || self.pairs.contains(&(b, a))
    }

    /// True when `body` appears in any claimed pair
    pub fn involves(&self, body: Body) -> bool {
        self.pairs.iter().any(|(a, b)| *a == body || *b == body)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// What the collision pass did this tick
#[derive(Debug, Default)]
pub struct CollisionReport {
    pub claims: ClaimSet,
    pub pickups: u32,
    pub head_kicks: u32,
    pub explosions: u32,
    pub arrow_hits: u32,
    /// Side that scored, when the ball crossed a goal line while playing
    pub goal: Option<Side>,
}

/// Run the full collision pass over `state`
pub fn resolve_collisions(state: &mut GameState, sink: &mut dyn EffectSink) -> CollisionReport {
    let mut report = CollisionReport::default();
    let GameState {
        settings,
        players,
        ball,
        rockets,
        arrows,
        powerups,
        phase,
        rng,
        ..
    } = state;
    let arena = &settings.arena;

    resolve_pickups(players, ball, powerups, &settings.rules, &mut report, sink);
    separate_players(players, rng, &mut report.claims);
    resolve_head_standing(players, &mut report.claims);
    resolve_ball_contacts(players, ball, rng, &mut report.claims, sink);

    let hits = ball.resolve_environment(arena);
    if hits.bounced() {
        sink.play_sound(SoundEffect::Bounce);
    }

    resolve_head_kicks(players, &mut report, sink);
    resolve_rockets(rockets, players, ball, rng, &mut report, sink);
    resolve_arrows(arrows, players, ball, &mut report, sink);

    if *phase == MatchPhase::Playing {
        report.goal = detect_goal(arena, ball);
    }
    report
}

fn resolve_pickups(
    players: &mut [Player; 2],
    ball: &mut Ball,
    powerups: &mut [Powerup],
    rules: &MatchRules,
    report: &mut CollisionReport,
    sink: &mut dyn EffectSink,
) {
    for (i, powerup) in powerups.iter_mut().enumerate() {
        if !powerup.active {
            continue;
        }
        let rect = powerup.rect();
        let Some(player) = players.iter_mut().find(|p| p.body_rect().intersects(&rect)) else {
            continue;
        };

        powerup.active = false;
        apply_powerup(powerup.kind, player, ball, rules);
        report.claims.claim(Body::Player(player.side), Body::Powerup(i));
        report.pickups += 1;

        sink.play_sound(SoundEffect::PowerupCollect);
        sink.emit_effect(EffectKind::Sparkle, powerup.pos, 16, EffectParams::intensity(0.8));
        if powerup.kind == PowerupKind::BallFreeze {
            sink.emit_effect(EffectKind::Frost, ball.pos, 24, EffectParams::intensity(1.0));
        }
    }
}

/// Push overlapping players apart horizontally, half the overlap each
fn separate_players<R: Rng>(players: &mut [Player; 2], rng: &mut R, claims: &mut ClaimSet) {
    let [left, right] = players;
    let a = left.body_rect();
    let b = right.body_rect();
    if !a.intersects(&b) {
        return;
    }

    // Direction from the first player toward the second
    let dir = if right.pos.x > left.pos.x {
        1.0
    } else if right.pos.x < left.pos.x {
        -1.0
    } else if rng.random_bool(0.5) {
        1.0
    } else {
        -1.0
    };
    let half = a.overlap_x(&b) / 2.0;
    left.pos.x -= dir * half;
    right.pos.x += dir * half;

    let closing = (left.vel.x - right.vel.x) * dir;
    if closing > 0.0 {
        let exchange = closing * PLAYER_VELOCITY_TRANSFER * dir;
        left.vel.x -= exchange;
        right.vel.x += exchange;
    }
    claims.claim(Body::Player(left.side), Body::Player(right.side));
}

fn resolve_head_standing(players: &mut [Player; 2], claims: &mut ClaimSet) {
    let [left, right] = players;
    stand_on_head(left, right, claims);
    stand_on_head(right, left, claims);
}

/// Snap `top`'s feet onto `bottom`'s head when falling or resting onto it
fn stand_on_head(top: &mut Player, bottom: &Player, claims: &mut ClaimSet) {
    if top.vel.y < 0.0 {
        return;
    }
    let head = bottom.head();
    let head_top = head.center.y - head.radius;
    let feet = top.feet_rect();

    let over =
        feet.right() > head.center.x - head.radius && feet.left() < head.center.x + head.radius;
    let in_band = top.pos.y >= head_top - HEAD_STAND_TOLERANCE && top.pos.y <= head.center.y;
    if !over || !in_band {
        return;
    }

    top.pos.y = head_top;
    top.vel.y = 0.0;
    top.airborne = false;
    top.on_head = true;
    claims.claim(Body::Player(top.side), Body::Player(bottom.side));
}

/// Kick beats header beats body bump; the first player to touch the ball
/// claims it for the tick
fn resolve_ball_contacts<R: Rng>(
    players: &mut [Player; 2],
    ball: &mut Ball,
    rng: &mut R,
    claims: &mut ClaimSet,
    sink: &mut dyn EffectSink,
) {
    for player in players.iter_mut() {
        if claims.involves(Body::Ball) {
            return;
        }
        let who = Body::Player(player.side);

        if let Some(foot) = try_kick(player, ball) {
            claims.claim(who, Body::Ball);
            sink.play_sound(SoundEffect::Kick);
            sink.emit_effect(EffectKind::KickSpark, foot, 10, EffectParams::intensity(0.7));
        } else if try_header(player, ball, rng) {
            claims.claim(who, Body::Ball);
            sink.play_sound(SoundEffect::Header);
        } else if try_body_bump(player, ball) {
            claims.claim(who, Body::Ball);
        }
    }
}

/// Returns the foot point when the kick connected
fn try_kick(player: &mut Player, ball: &mut Ball) -> Option<Vec2> {
    let foot = player.kick_impact_point()?;
    if foot.distance(ball.pos) >= ball.radius + KICK_REACH {
        return None;
    }
    let force =
        Vec2::new(KICK_FORCE.x * player.facing, KICK_FORCE.y) + player.vel * KICK_VELOCITY_CARRY;
    ball.set_velocity(force);
    player.mark_kick_connected();
    Some(foot)
}

fn try_header<R: Rng>(player: &Player, ball: &mut Ball, rng: &mut R) -> bool {
    if player.is_kicking() {
        return false;
    }
    let Some((normal, depth)) = circle_circle_penetration(&player.head(), &ball.circle(), rng)
    else {
        return false;
    };
    if !ball.is_frozen() {
        ball.pos += normal * depth;
    }
    ball.set_velocity(Vec2::new(
        normal.x * HEADER_PUSH + player.vel.x * HEADER_VELOCITY_CARRY,
        -HEADER_LIFT,
    ));
    true
}

fn try_body_bump(player: &mut Player, ball: &mut Ball) -> bool {
    let Some(pen) = circle_rect_penetration(&ball.circle(), &player.body_rect()) else {
        return false;
    };

    // A frozen ball is an obstacle: the player gives way instead
    if ball.is_frozen() {
        player.pos.x -= pen.normal.x * pen.depth;
        return true;
    }

    ball.pos += pen.normal * pen.depth;
    let along = (ball.vel - player.vel).dot(pen.normal);
    if along < 0.0 {
        ball.vel -= pen.normal * along * (1.0 + BODY_BOUNCE);
    }
    true
}

fn resolve_head_kicks(
    players: &mut [Player; 2],
    report: &mut CollisionReport,
    sink: &mut dyn EffectSink,
) {
    let [left, right] = players;
    for hit in [kick_to_head(left, right, sink), kick_to_head(right, left, sink)] {
        if let Some((kicker, victim)) = hit {
            report.claims.claim(Body::Player(kicker), Body::Player(victim));
            report.head_kicks += 1;
        }
    }
}

/// A live kick whose foot reaches the victim's head knocks them back
fn kick_to_head(
    kicker: &mut Player,
    victim: &mut Player,
    sink: &mut dyn EffectSink,
) -> Option<(Side, Side)> {
    let foot = kicker.kick_impact_point()?;
    if victim.is_tumbling() || victim.is_pushed_back() {
        return None;
    }
    let head = victim.head();
    if foot.distance(head.center) >= head.radius + KICK_REACH / 2.0 {
        return None;
    }

    victim.push_back(Vec2::new(HEAD_KICK_PUSH.x * kicker.facing, HEAD_KICK_PUSH.y));
    kicker.cancel_kick();
    log::debug!("{:?} kicked {:?} in the head", kicker.side, victim.side);

    sink.play_sound(SoundEffect::HeadKick);
    sink.emit_effect(EffectKind::KickSpark, foot, 14, EffectParams::intensity(1.0));
    Some((kicker.side, victim.side))
}

fn resolve_rockets<R: Rng>(
    rockets: &mut [Rocket],
    players: &mut [Player; 2],
    ball: &mut Ball,
    rng: &mut R,
    report: &mut CollisionReport,
    sink: &mut dyn EffectSink,
) {
    for (i, rocket) in rockets.iter_mut().enumerate() {
        if !rocket.active || rocket.exploded {
            continue;
        }
        let circle = rocket.circle();
        let struck = players
            .iter()
            .filter(|p| p.side != rocket.owner)
            .find(|p| circle.intersects_rect(&p.body_rect()) || circle.intersects(&p.head()))
            .map(|p| Body::Player(p.side))
            .or_else(|| circle.intersects(&ball.circle()).then_some(Body::Ball));

        if let Some(target) = struck {
            report.claims.claim(Body::Rocket(i), target);
            rocket.exploded = true;
        }
    }

    // Detonations run after every rocket has been tested
    for rocket in rockets.iter_mut().filter(|r| r.active && r.exploded) {
        detonate(rocket.pos, players, ball, rng, sink);
        rocket.active = false;
        report.explosions += 1;
    }
}

/// Radial blast at `center`: caught players are launched and tumble, the
/// ball is knocked outward and up. The rocket's owner is not spared.
pub fn detonate<R: Rng>(
    center: Vec2,
    players: &mut [Player; 2],
    ball: &mut Ball,
    rng: &mut R,
    sink: &mut dyn EffectSink,
) {
    let blast = Explosion::new(center);
    for player in players.iter_mut() {
        if let Some((dir, strength)) = blast.impulse_on(player.body_rect().center(), rng) {
            player.vel = Explosion::player_velocity(dir, strength);
            player.start_tumble(rng);
        }
    }
    if let Some((dir, strength)) = blast.impulse_on(ball.pos, rng) {
        ball.apply_impulse(Explosion::ball_impulse(dir, strength));
    }
    log::debug!("Rocket detonated at ({:.0}, {:.0})", center.x, center.y);

    sink.play_sound(SoundEffect::Explosion);
    sink.emit_effect(EffectKind::Explosion, center, 40, EffectParams::intensity(1.0));
    sink.emit_effect(EffectKind::Smoke, center, 20, EffectParams::intensity(0.6));
}

fn resolve_arrows(
    arrows: &mut [Arrow],
    players: &mut [Player; 2],
    ball: &mut Ball,
    report: &mut CollisionReport,
    sink: &mut dyn EffectSink,
) {
    for (i, arrow) in arrows.iter_mut().enumerate() {
        if !arrow.is_flying() {
            continue;
        }
        let tip = arrow.tip();

        let victim = players
            .iter_mut()
            .filter(|p| p.side != arrow.owner)
            .find(|p| p.head().contains(tip) || p.body_rect().contains(tip));
        if let Some(victim) = victim {
            let push_dir = arrow.vel.x.signum();
            arrow.stick(StuckTo::Player(victim.side), tip, victim.pos);
            victim.push_back(Vec2::new(push_dir * ARROW_PUSH, -ARROW_PUSH_LIFT));
            victim.start_itching_frenzy();
            log::debug!("Arrow from {:?} stuck in {:?}", arrow.owner, victim.side);

            report.claims.claim(Body::Arrow(i), Body::Player(victim.side));
            report.arrow_hits += 1;
            sink.play_sound(SoundEffect::ArrowHit);
            continue;
        }

        if ball.circle().contains(tip) {
            ball.apply_impulse(arrow.vel * ARROW_BALL_TRANSFER);
            arrow.stick(StuckTo::Ball, tip, ball.pos);
            report.claims.claim(Body::Arrow(i), Body::Ball);
            report.arrow_hits += 1;
            sink.play_sound(SoundEffect::ArrowHit);
        }
    }
}

/// Side that scored, if the ball is wholly past a goal line inside the
/// goal mouth
pub fn detect_goal(arena: &ArenaConfig, ball: &Ball) -> Option<Side> {
    if !arena.in_goal_band(ball.pos.y) {
        return None;
    }
    if ball.pos.x + ball.radius < arena.left_goal_line() {
        Some(Side::Right)
    } else if ball.pos.x - ball.radius > arena.right_goal_line() {
        Some(Side::Left)
    } else {
        None
    }
}
