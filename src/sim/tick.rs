//! Fixed timestep simulation tick
//!
//! Core game loop that advances the match deterministically: phase timers,
//! entity updates, one collision pass, scoring, then list compaction.

use glam::Vec2;

use super::autopilot;
use super::collision::resolve_collisions;
use super::player::{PlayerCommand, Side};
use super::projectile::{ArrowState, Projectile, StuckTo};
use super::state::{GameState, MatchPhase};
use crate::audio::{EffectKind, EffectParams, EffectSink, SoundEffect};
use crate::platform::{InputSource, Key};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Indexed by `Side::index`
    pub players: [PlayerCommand; 2],
    /// Start the match (just pressed)
    pub start: bool,
    /// Idle/demo mode per side - the autopilot plays that side
    pub autopilot: [bool; 2],
}

impl TickInput {
    /// Sample held / just-pressed keys for this tick
    pub fn from_source(input: &dyn InputSource) -> Self {
        let command = |left: Key, right: Key, jump: Key, kick: Key, fire: Key| PlayerCommand {
            left: input.is_held(left),
            right: input.is_held(right),
            jump: input.was_pressed(jump),
            kick: input.was_pressed(kick),
            fire: input.was_pressed(fire),
        };
        Self {
            players: [
                command(Key::P1Left, Key::P1Right, Key::P1Jump, Key::P1Kick, Key::P1Fire),
                command(Key::P2Left, Key::P2Right, Key::P2Jump, Key::P2Kick, Key::P2Fire),
            ],
            start: input.was_pressed(Key::Start),
            autopilot: [false, false],
        }
    }

    /// Both sides on autopilot
    pub fn idle() -> Self {
        Self {
            autopilot: [true, true],
            ..Default::default()
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, sink: &mut dyn EffectSink, dt: f32) {
    state.time_ticks += 1;

    let mut input = input.clone();
    for side in Side::ALL {
        if input.autopilot[side.index()] {
            input.players[side.index()] = autopilot::command(state, side);
        }
    }
    // A full demo match kicks itself off
    if input.autopilot == [true, true] && state.phase == MatchPhase::Welcome {
        input.start = true;
    }

    match state.phase {
        MatchPhase::Welcome => {
            if input.start && state.start_match() {
                sink.play_sound(SoundEffect::Whistle);
            }
            return;
        }
        MatchPhase::MatchOver => {
            state.phase_ticks = state.phase_ticks.saturating_sub(1);
            if state.phase_ticks == 0 {
                state.reset_match();
            }
            return;
        }
        MatchPhase::GoalScored => {
            state.phase_ticks = state.phase_ticks.saturating_sub(1);
            if state.phase_ticks == 0 {
                state.reset_positions();
                state.phase = MatchPhase::Playing;
                sink.play_sound(SoundEffect::Whistle);
                log::info!("Kick-off after goal");
                return;
            }
        }
        MatchPhase::Playing => {}
    }

    update_players(state, &input, sink, dt);
    update_ball(state, sink, dt);
    update_projectiles(state, sink, dt);
    update_powerups(state, sink, dt);

    let report = resolve_collisions(state, sink);
    if let Some(scorer) = report.goal
        && state.award_goal(scorer)
    {
        sink.play_sound(SoundEffect::Goal);
        sink.emit_effect(EffectKind::Confetti, state.ball.pos, 60, EffectParams::intensity(1.0));
        if state.phase == MatchPhase::MatchOver {
            sink.play_sound(SoundEffect::MatchOver);
        }
    }

    state.compact();
}

fn update_players(state: &mut GameState, input: &TickInput, sink: &mut dyn EffectSink, dt: f32) {
    let arena = state.settings.arena;
    for side in Side::ALL {
        let player = &mut state.players[side.index()];
        let outcome = player.update(&input.players[side.index()], &arena, dt);
        let feet = player.pos;
        let hand = player.hand();
        let facing = player.facing;

        if outcome.jumped {
            sink.play_sound(SoundEffect::Jump);
        }
        if let Some(speed) = outcome.landed {
            sink.play_sound(SoundEffect::Land);
            let count = (speed / 60.0).clamp(4.0, 20.0) as u32;
            let params = EffectParams::intensity(speed / 1000.0);
            sink.emit_effect(EffectKind::Dust, feet, count, params);
        }

        match outcome.fired {
            Some(Projectile::Rocket(rocket)) => {
                sink.play_sound(SoundEffect::RocketLaunch);
                sink.emit_effect(
                    EffectKind::Smoke,
                    hand,
                    8,
                    EffectParams {
                        intensity: 0.5,
                        direction: Vec2::new(-facing, 0.0),
                    },
                );
                state.rockets.push(rocket);
            }
            Some(Projectile::Arrow(arrow)) => {
                sink.play_sound(SoundEffect::BowShot);
                state.arrows.push(arrow);
            }
            None => {}
        }
    }
}

fn update_ball(state: &mut GameState, sink: &mut dyn EffectSink, dt: f32) {
    let hits = state.ball.update(&state.settings.arena, dt);
    if hits.bounced() {
        sink.play_sound(SoundEffect::Bounce);
    }
}

fn update_projectiles(state: &mut GameState, sink: &mut dyn EffectSink, dt: f32) {
    let arena = state.settings.arena;

    for rocket in &mut state.rockets {
        rocket.update(&arena, dt);
    }

    for arrow in &mut state.arrows {
        match arrow.state {
            ArrowState::Flying => {
                arrow.update_flight(&arena, dt);
                if let Some(StuckTo::Static(surface)) = arrow.stuck_to() {
                    log::debug!("Arrow from {:?} stuck in {:?}", arrow.owner, surface);
                    sink.play_sound(SoundEffect::ArrowHit);
                }
            }
            ArrowState::Stuck { target, .. } => {
                match target {
                    StuckTo::Player(side) => arrow.follow(state.players[side.index()].pos),
                    StuckTo::Ball => arrow.follow(state.ball.pos),
                    StuckTo::Static(_) => {}
                }
                arrow.age();
            }
        }
    }
}

fn update_powerups(state: &mut GameState, sink: &mut dyn EffectSink, dt: f32) {
    let arena = state.settings.arena;

    if state.phase == MatchPhase::Playing
        && let Some(powerup) = state
            .powerup_manager
            .update(&state.settings.rules, &arena, &mut state.rng)
    {
        state.powerups.push(powerup);
    }

    for powerup in &mut state.powerups {
        if powerup.update(&arena, dt) {
            sink.play_sound(SoundEffect::PowerupLand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSink;
    use crate::audio::testing::RecordingSink;
    use crate::consts::SIM_DT;
    use crate::platform::KeyboardState;
    use crate::secs_to_ticks;
    use crate::settings::Settings;
    use crate::sim::ball::BALL_RADIUS;
    use crate::sim::player::Player;
    use crate::sim::powerup::{Powerup, PowerupKind};
    use crate::sim::projectile::Arrow;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default());
        state.start_match();
        state
    }

    #[test]
    fn test_tick_welcome_to_playing() {
        let mut state = GameState::new(12345, Settings::default());
        let mut sink = RecordingSink::default();

        // Tick without start - should stay on the welcome screen
        tick(&mut state, &TickInput::default(), &mut sink, SIM_DT);
        assert_eq!(state.phase, MatchPhase::Welcome);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut sink, SIM_DT);
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_eq!(sink.count(SoundEffect::Whistle), 1);
    }

    #[test]
    fn test_input_source_edges() {
        let mut kb = KeyboardState::new();
        kb.press(Key::P1Right);
        kb.press(Key::P2Jump);
        kb.begin_tick();

        let input = TickInput::from_source(&kb);
        assert!(input.players[0].right);
        assert!(input.players[1].jump);
        assert!(!input.start);

        kb.begin_tick();
        let input = TickInput::from_source(&kb);
        assert!(input.players[0].right, "still held");
        assert!(!input.players[1].jump, "edge consumed");
    }

    #[test]
    fn test_goal_scores_once_then_resets() {
        let mut state = playing_state(1);
        let arena = state.settings.arena;
        state.ball.pos =
            Vec2::new(arena.left_goal_line() - BALL_RADIUS - 1.0, arena.ground_y - 40.0);
        let mut sink = RecordingSink::default();

        tick(&mut state, &TickInput::default(), &mut sink, SIM_DT);
        assert_eq!(state.score(Side::Right), 1);
        assert_eq!(state.score(Side::Left), 0);
        assert_eq!(state.phase, MatchPhase::GoalScored);
        assert_eq!(sink.count(SoundEffect::Goal), 1);

        // Ball sits in the net for the whole delay without scoring again
        let delay = secs_to_ticks(state.settings.rules.goal_reset_secs);
        for _ in 0..delay - 1 {
            tick(&mut state, &TickInput::default(), &mut sink, SIM_DT);
            assert_eq!(state.phase, MatchPhase::GoalScored);
        }
        tick(&mut state, &TickInput::default(), &mut sink, SIM_DT);
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_eq!(state.score(Side::Right), 1);
        assert_eq!(state.ball.pos.x, arena.center_x());
    }

    #[test]
    fn test_winning_goal_ends_match() {
        let mut settings = Settings::default();
        settings.rules.win_score = 1;
        let mut state = GameState::new(2, settings);
        state.start_match();
        let arena = state.settings.arena;
        state.ball.pos =
            Vec2::new(arena.right_goal_line() + BALL_RADIUS + 1.0, arena.ground_y - 40.0);
        let mut sink = RecordingSink::default();

        tick(&mut state, &TickInput::default(), &mut sink, SIM_DT);
        assert_eq!(state.phase, MatchPhase::MatchOver);
        assert_eq!(state.winner, Some(Side::Left));
        assert_eq!(sink.count(SoundEffect::MatchOver), 1);

        for _ in 0..secs_to_ticks(state.settings.rules.match_over_secs) {
            tick(&mut state, &TickInput::default(), &mut sink, SIM_DT);
        }
        assert_eq!(state.phase, MatchPhase::Welcome);
        assert_eq!(state.scores, [0, 0]);
    }

    #[test]
    fn test_fired_rocket_joins_state() {
        let mut state = playing_state(4);
        state.players[0].equip_rocket_launcher(1);
        let input = TickInput {
            players: [
                PlayerCommand {
                    fire: true,
                    ..Default::default()
                },
                PlayerCommand::default(),
            ],
            ..Default::default()
        };
        let mut sink = RecordingSink::default();
        tick(&mut state, &input, &mut sink, SIM_DT);
        assert_eq!(state.rockets.len(), 1);
        assert_eq!(sink.count(SoundEffect::RocketLaunch), 1);
        assert!(!state.players[0].has_rocket_launcher());
    }

    #[test]
    fn test_stuck_arrow_rides_with_player() {
        let mut state = playing_state(5);
        let mut arrow = Arrow::fire(Side::Left, Vec2::ZERO, 1.0);
        let anchor = state.players[1].pos;
        arrow.stick(StuckTo::Player(Side::Right), anchor + Vec2::new(-5.0, -60.0), anchor);
        state.arrows.push(arrow);
        let before = state.arrows[0].pos;

        let walk = TickInput {
            players: [
                PlayerCommand::default(),
                PlayerCommand {
                    left: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        tick(&mut state, &walk, &mut NullSink, SIM_DT);
        let moved = state.players[1].pos - anchor;
        assert!(moved.x < 0.0);
        assert!((state.arrows[0].pos - (before + moved)).length() < 1e-3);
    }

    #[test]
    fn test_projectiles_compacted_at_end_of_tick() {
        let mut state = playing_state(6);
        let mut gone = Arrow::fire(Side::Left, Vec2::new(600.0, 100.0), 1.0);
        gone.active = false;
        state.arrows.push(gone);
        state.arrows.push(Arrow::fire(Side::Left, Vec2::new(600.0, 100.0), 1.0));

        tick(&mut state, &TickInput::default(), &mut NullSink, SIM_DT);
        assert_eq!(state.arrows.len(), 1);
        assert!(state.arrows[0].is_flying());
    }

    #[test]
    fn test_pickup_removes_exactly_one_powerup() {
        let mut state = playing_state(8);
        let arena = state.settings.arena;
        let at_feet = state.players[0].body_rect().center();
        let mut touching = Powerup::new(PowerupKind::SpeedBoost, at_feet, 0.0);
        touching.landed = true;
        let far_away = Vec2::new(arena.center_x(), arena.ground_y - 15.0);
        let mut distant = Powerup::new(PowerupKind::Bow, far_away, 0.0);
        distant.landed = true;
        state.powerups.push(touching);
        state.powerups.push(distant);
        let mut sink = RecordingSink::default();

        tick(&mut state, &TickInput::default(), &mut sink, SIM_DT);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.powerups[0].kind, PowerupKind::Bow);
        assert!(state.players[0].speed.is_active());
        assert_eq!(sink.count(SoundEffect::PowerupCollect), 1);

        tick(&mut state, &TickInput::default(), &mut sink, SIM_DT);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(sink.count(SoundEffect::PowerupCollect), 1);
    }

    #[test]
    fn test_powerups_only_spawn_while_playing() {
        let mut settings = Settings::default();
        settings.rules.powerup_spawn_min_secs = 0.5;
        settings.rules.powerup_spawn_max_secs = 0.5;
        let mut welcome = GameState::new(7, settings.clone());
        let mut playing = GameState::new(7, settings);
        playing.start_match();

        for _ in 0..secs_to_ticks(0.5) {
            tick(&mut welcome, &TickInput::default(), &mut NullSink, SIM_DT);
            tick(&mut playing, &TickInput::default(), &mut NullSink, SIM_DT);
        }
        assert!(welcome.powerups.is_empty());
        assert_eq!(playing.powerups.len(), 1);
    }

    #[test]
    fn test_idle_mode_starts_and_plays() {
        let mut state = GameState::new(77, Settings::default());
        let start = state.players.clone();
        for _ in 0..120 {
            tick(&mut state, &TickInput::idle(), &mut NullSink, SIM_DT);
        }
        assert_ne!(state.phase, MatchPhase::Welcome);
        let moved = |p: &Player, s: &Player| (p.pos - s.pos).length() > 1.0;
        assert!(moved(&state.players[0], &start[0]));
        assert!(moved(&state.players[1], &start[1]));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Settings::default());
        let mut state2 = GameState::new(99999, Settings::default());

        for _ in 0..900 {
            tick(&mut state1, &TickInput::idle(), &mut NullSink, SIM_DT);
            tick(&mut state2, &TickInput::idle(), &mut NullSink, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.scores, state2.scores);
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.players[0].pos, state2.players[0].pos);
        assert_eq!(state1.powerups.len(), state2.powerups.len());
    }
}
