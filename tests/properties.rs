//! Property tests for simulation invariants

use glam::Vec2;
use proptest::prelude::*;

use stick_soccer::consts::SIM_DT;
use stick_soccer::sim::ball::BALL_RADIUS;
use stick_soccer::sim::pose::{KICK_IMPACT_END, KICK_IMPACT_START, in_impact_window};
use stick_soccer::sim::{
    ActionKind, Ball, GameState, PlayerCommand, TickInput, blast_falloff, resolve_collisions, tick,
};
use stick_soccer::{ArenaConfig, NullSink, Settings};

const EPS: f32 = 1e-3;

fn command() -> impl Strategy<Value = PlayerCommand> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(left, right, jump, kick, fire)| PlayerCommand {
            left,
            right,
            jump,
            kick,
            fire,
        },
    )
}

fn playing_state(seed: u64) -> GameState {
    let mut state = GameState::new(seed, Settings::default());
    state.start_match();
    state
}

proptest! {
    #[test]
    fn ball_never_sinks_below_ground(
        x in 20.0f32..1180.0,
        y in 20.0f32..530.0,
        vx in -3000.0f32..3000.0,
        vy in -3000.0f32..3000.0,
        ticks in 1usize..240,
    ) {
        let arena = ArenaConfig::default();
        let mut ball = Ball::new(Vec2::new(x, y));
        ball.apply_impulse(Vec2::new(vx, vy));
        for _ in 0..ticks {
            ball.update(&arena, SIM_DT);
            prop_assert!(ball.pos.y + ball.radius <= arena.ground_y + EPS);
            prop_assert!(ball.pos.x >= ball.radius - EPS);
            prop_assert!(ball.pos.x <= arena.width - ball.radius + EPS);
        }
    }

    #[test]
    fn frozen_ball_ignores_impulses(
        ticks in 1u32..120,
        impulse in (-2000.0f32..2000.0, -2000.0f32..2000.0),
    ) {
        let arena = ArenaConfig::default();
        let start = Vec2::new(600.0, 200.0);
        let mut ball = Ball::new(start);
        ball.freeze(ticks);
        for _ in 0..ticks {
            ball.apply_impulse(Vec2::new(impulse.0, impulse.1));
            ball.update(&arena, SIM_DT);
            prop_assert_eq!(ball.pos, start);
        }
        prop_assert!(!ball.is_frozen());
        ball.apply_impulse(Vec2::new(0.0, -100.0));
        prop_assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn random_play_keeps_entities_on_the_pitch(
        seed in any::<u64>(),
        commands in prop::collection::vec((command(), command()), 1..180),
    ) {
        let mut state = playing_state(seed);
        let ground = state.arena().ground_y;
        let mut sink = NullSink;

        for (left, right) in commands {
            let input = TickInput {
                players: [left, right],
                ..Default::default()
            };
            tick(&mut state, &input, &mut sink, SIM_DT);

            prop_assert!(state.ball.pos.y + BALL_RADIUS <= ground + EPS);
            for player in &state.players {
                prop_assert!(player.pos.y <= ground + EPS);
            }
        }
    }

    #[test]
    fn one_action_at_a_time(
        seed in any::<u64>(),
        commands in prop::collection::vec((command(), command()), 1..180),
    ) {
        let mut state = playing_state(seed);
        let mut sink = NullSink;

        for (left, right) in commands {
            let input = TickInput {
                players: [left, right],
                ..Default::default()
            };
            tick(&mut state, &input, &mut sink, SIM_DT);

            for player in &state.players {
                let flags = [
                    player.is_kicking(),
                    player.is_tumbling(),
                    player.is_stunned(),
                    player.is_itching(),
                ];
                let active = flags.iter().filter(|f| **f).count();
                prop_assert!(active <= 1);
                prop_assert_eq!(active == 0, player.status().action == ActionKind::None);
            }
        }
    }

    #[test]
    fn separated_bodies_resolve_to_nothing(
        seed in any::<u64>(),
        ball_x in 300.0f32..900.0,
        ball_y in 100.0f32..300.0,
        left_x in 100.0f32..500.0,
        gap in 120.0f32..600.0,
    ) {
        let mut state = GameState::new(seed, Settings::default());
        let ground = state.arena().ground_y;
        state.ball.pos = Vec2::new(ball_x, ball_y);
        state.players[0].pos = Vec2::new(left_x, ground);
        state.players[1].pos = Vec2::new((left_x + gap).min(1100.0), ground);

        let before = (state.ball.pos, state.players[0].pos, state.players[1].pos);
        let mut sink = NullSink;
        for _ in 0..2 {
            let report = resolve_collisions(&mut state, &mut sink);
            prop_assert!(report.claims.is_empty());
            prop_assert!(report.goal.is_none());
            prop_assert_eq!(
                (state.ball.pos, state.players[0].pos, state.players[1].pos),
                before
            );
        }
    }

    #[test]
    fn blast_falloff_shrinks_with_distance(
        radius in 1.0f32..500.0,
        a in 0.0f32..1000.0,
        b in 0.0f32..1000.0,
    ) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let fa = blast_falloff(near, radius);
        let fb = blast_falloff(far, radius);
        prop_assert!((0.0..=1.0).contains(&fa));
        prop_assert!((0.0..=1.0).contains(&fb));
        prop_assert!(fa >= fb);
        if far >= radius {
            prop_assert_eq!(fb, 0.0);
        }
    }

    #[test]
    fn impact_window_bounds(progress in 0.0f32..1.0) {
        let inside = (KICK_IMPACT_START..=KICK_IMPACT_END).contains(&progress);
        prop_assert_eq!(in_impact_window(progress), inside);
    }
}
