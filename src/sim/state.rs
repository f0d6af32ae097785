//! Game state definitions
//!
//! `GameState` is the sole owner of every entity and of the match state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{BALL_RADIUS, Ball};
use super::player::{Player, PlayerStatus, Side};
use super::powerup::{Powerup, PowerupManager};
use super::projectile::{Arrow, Rocket};
use crate::consts::SIM_DT;
use crate::secs_to_ticks;
use crate::settings::{ArenaConfig, Settings};

/// Height above the ground the ball is dropped from at kick-off
pub const KICKOFF_DROP_HEIGHT: f32 = 200.0;

/// Top-level match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for a start press
    Welcome,
    Playing,
    /// Short pause after a goal before the kick-off reset
    GoalScored,
    /// Winner on display; returns to Welcome when the timer runs out
    MatchOver,
}

/// Read-only view of the match for HUD collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub scores: [u32; 2],
    /// Seconds left on the goal / match-over countdown
    pub phase_secs_remaining: f32,
    pub winner: Option<Side>,
    pub last_scorer: Option<Side>,
    pub players: [PlayerStatus; 2],
    pub ball_pos: Vec2,
    pub ball_frozen_secs: f32,
    pub active_powerups: usize,
    pub time_ticks: u64,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    /// Frozen for the lifetime of the state
    pub settings: Settings,
    pub phase: MatchPhase,
    /// Indexed by `Side::index`
    pub scores: [u32; 2],
    /// Countdown for GoalScored / MatchOver (ticks)
    pub phase_ticks: u32,
    pub last_scorer: Option<Side>,
    pub winner: Option<Side>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Indexed by `Side::index`
    pub players: [Player; 2],
    pub ball: Ball,
    pub rockets: Vec<Rocket>,
    pub arrows: Vec<Arrow>,
    pub powerups: Vec<Powerup>,
    pub powerup_manager: PowerupManager,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new match waiting on the welcome screen
    pub fn new(seed: u64, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = settings.arena;
        let [left, right] = kickoff_positions(&arena);

        Self {
            seed,
            phase: MatchPhase::Welcome,
            scores: [0, 0],
            phase_ticks: 0,
            last_scorer: None,
            winner: None,
            time_ticks: 0,
            players: [Player::new(Side::Left, left), Player::new(Side::Right, right)],
            ball: Ball::new(ball_spawn(&arena)),
            rockets: Vec::new(),
            arrows: Vec::new(),
            powerups: Vec::new(),
            powerup_manager: PowerupManager::new(&settings.rules, &mut rng),
            rng,
            settings,
        }
    }

    #[inline]
    pub fn arena(&self) -> &ArenaConfig {
        &self.settings.arena
    }

    #[inline]
    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    #[inline]
    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    /// Welcome -> Playing
    pub fn start_match(&mut self) -> bool {
        if self.phase != MatchPhase::Welcome {
            return false;
        }
        self.reset_positions();
        self.phase = MatchPhase::Playing;
        log::info!("Kick-off (seed {})", self.seed);
        true
    }

    /// Players and ball back to their kick-off spots; projectiles cleared.
    /// Buffs, weapons and power-ups on the pitch carry over.
    pub fn reset_positions(&mut self) {
        let arena = self.settings.arena;
        let spots = kickoff_positions(&arena);
        for (player, spot) in self.players.iter_mut().zip(spots) {
            player.reset_position(spot);
        }
        self.ball.reset(ball_spawn(&arena));
        self.rockets.clear();
        self.arrows.clear();
    }

    /// Fresh match on the welcome screen with the same seed stream
    pub fn reset_match(&mut self) {
        let arena = self.settings.arena;
        let [left, right] = kickoff_positions(&arena);
        self.players = [Player::new(Side::Left, left), Player::new(Side::Right, right)];
        self.ball.reset(ball_spawn(&arena));
        self.rockets.clear();
        self.arrows.clear();
        self.powerups.clear();
        self.powerup_manager.reset(&self.settings.rules, &mut self.rng);
        self.scores = [0, 0];
        self.phase = MatchPhase::Welcome;
        self.phase_ticks = 0;
        self.last_scorer = None;
        self.winner = None;
        log::info!("Match reset");
    }

    /// Credit a goal to `scorer`; only counts while playing
    pub fn award_goal(&mut self, scorer: Side) -> bool {
        if self.phase != MatchPhase::Playing {
            return false;
        }
        let idx = scorer.index();
        self.scores[idx] += 1;
        self.last_scorer = Some(scorer);
        let rules = &self.settings.rules;

        if self.scores[idx] >= rules.win_score {
            self.phase = MatchPhase::MatchOver;
            self.phase_ticks = secs_to_ticks(rules.match_over_secs);
            self.winner = Some(scorer);
            log::info!("{:?} wins {}-{}", scorer, self.scores[0], self.scores[1]);
        } else {
            self.phase = MatchPhase::GoalScored;
            self.phase_ticks = secs_to_ticks(rules.goal_reset_secs);
            log::info!("Goal for {:?}: {}-{}", scorer, self.scores[0], self.scores[1]);
        }
        true
    }

    /// Drop inactive projectiles and power-ups (end of tick)
    pub fn compact(&mut self) {
        self.rockets.retain(|r| r.active);
        self.arrows.retain(|a| a.active);
        self.powerups.retain(|p| p.active);
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            phase: self.phase,
            scores: self.scores,
            phase_secs_remaining: self.phase_ticks as f32 * SIM_DT,
            winner: self.winner,
            last_scorer: self.last_scorer,
            players: [self.players[0].status(), self.players[1].status()],
            ball_pos: self.ball.pos,
            ball_frozen_secs: self.ball.freeze_remaining() as f32 * SIM_DT,
            active_powerups: self.powerups.iter().filter(|p| p.active).count(),
            time_ticks: self.time_ticks,
        }
    }
}

/// Feet positions at kick-off, left side first
pub fn kickoff_positions(arena: &ArenaConfig) -> [Vec2; 2] {
    [
        Vec2::new(arena.width * 0.25, arena.ground_y),
        Vec2::new(arena.width * 0.75, arena.ground_y),
    ]
}

/// Ball drop point at kick-off
pub fn ball_spawn(arena: &ArenaConfig) -> Vec2 {
    let y = (arena.ground_y - KICKOFF_DROP_HEIGHT).max(arena.ceiling_y + BALL_RADIUS);
    Vec2::new(arena.center_x(), y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::Rocket;

    #[test]
    fn test_new_state_waits_on_welcome() {
        let state = GameState::new(1, Settings::default());
        assert_eq!(state.phase, MatchPhase::Welcome);
        assert_eq!(state.scores, [0, 0]);
        assert!(state.player(Side::Left).pos.x < state.player(Side::Right).pos.x);
        assert_eq!(state.ball.pos, ball_spawn(state.arena()));
    }

    #[test]
    fn test_goal_then_match_over() {
        let mut settings = Settings::default();
        settings.rules.win_score = 2;
        let mut state = GameState::new(1, settings);
        assert!(!state.award_goal(Side::Left), "not playing yet");

        state.start_match();
        assert!(state.award_goal(Side::Left));
        assert_eq!(state.phase, MatchPhase::GoalScored);
        assert!(!state.award_goal(Side::Left), "goal already counted");

        state.phase = MatchPhase::Playing;
        assert!(state.award_goal(Side::Left));
        assert_eq!(state.phase, MatchPhase::MatchOver);
        assert_eq!(state.winner, Some(Side::Left));
        assert_eq!(state.score(Side::Left), 2);
    }

    #[test]
    fn test_reset_positions_clears_projectiles() {
        let mut state = GameState::new(3, Settings::default());
        state.players[0].pos.x = 20.0;
        state.players[0].equip_bow(4);
        state.rockets.push(Rocket::new(Side::Left, Vec2::new(100.0, 100.0), 1.0));
        state.ball.freeze(30);

        state.reset_positions();
        assert!(state.rockets.is_empty());
        assert_eq!(state.players[0].pos, kickoff_positions(state.arena())[0]);
        assert!(state.players[0].has_bow(), "weapons survive a goal reset");
        assert!(!state.ball.is_frozen());
    }

    #[test]
    fn test_reset_match_clears_everything() {
        let mut state = GameState::new(3, Settings::default());
        state.start_match();
        state.award_goal(Side::Right);
        state.players[1].equip_rocket_launcher(3);

        state.reset_match();
        assert_eq!(state.phase, MatchPhase::Welcome);
        assert_eq!(state.scores, [0, 0]);
        assert!(!state.players[1].has_rocket_launcher());
        assert!(state.last_scorer.is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(5, Settings::default());
        state.ball.freeze(60);
        let snap = state.snapshot();
        assert!((snap.ball_frozen_secs - 1.0).abs() < 1e-4);
        let json = serde_json::to_string(&snap).unwrap();
        let back: MatchSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, MatchPhase::Welcome);
        assert_eq!(back.players[0].side, Side::Left);
    }
}
