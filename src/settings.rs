//! Arena geometry and match rules
//!
//! Frozen once a match is created: every physics and collision routine reads
//! these through `&ArenaConfig`, so changing them never requires code changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::ball::BALL_RADIUS;
use crate::sim::geom::Rect;
use crate::sim::powerup::PowerupKind;

/// Narrowest playable screen (pixels)
pub const MIN_ARENA_WIDTH: f32 = 400.0;
/// Shortest playable gap between ceiling and ground (pixels)
pub const MIN_PITCH_HEIGHT: f32 = 200.0;
/// A goal must be deep enough for the whole ball to cross the line
pub const MIN_GOAL_WIDTH: f32 = BALL_RADIUS * 3.0;
/// A goal mouth must fit the ball with room to spare
pub const MIN_GOAL_HEIGHT: f32 = BALL_RADIUS * 4.0;

/// Screen and goal geometry (pixels, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    /// Ground line (entity feet / ball bottoms rest here)
    pub ground_y: f32,
    pub ceiling_y: f32,
    /// Depth of each goal, measured from the screen edge to the goal line
    pub goal_width: f32,
    /// Height of the goal mouth above the ground
    pub goal_height: f32,
    /// Crossbar thickness
    pub post_thickness: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 600.0,
            ground_y: 550.0,
            ceiling_y: 0.0,
            goal_width: 90.0,
            goal_height: 200.0,
            post_thickness: 12.0,
        }
    }
}

impl ArenaConfig {
    /// Goal line of the left goal (defended by player one)
    #[inline]
    pub fn left_goal_line(&self) -> f32 {
        self.goal_width
    }

    /// Goal line of the right goal (defended by player two)
    #[inline]
    pub fn right_goal_line(&self) -> f32 {
        self.width - self.goal_width
    }

    /// Underside of the crossbar; the goal mouth spans from here to the ground
    #[inline]
    pub fn goal_mouth_top(&self) -> f32 {
        self.ground_y - self.goal_height
    }

    /// True when `y` lies inside the goal mouth's vertical band
    #[inline]
    pub fn in_goal_band(&self, y: f32) -> bool {
        y > self.goal_mouth_top() && y <= self.ground_y
    }

    /// Left and right crossbars, in that order
    pub fn crossbars(&self) -> [Rect; 2] {
        let top = self.goal_mouth_top() - self.post_thickness;
        [
            Rect::new(0.0, top, self.goal_width, self.post_thickness),
            Rect::new(
                self.width - self.goal_width,
                top,
                self.goal_width,
                self.post_thickness,
            ),
        ]
    }

    /// Horizontal center of the pitch
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Repair geometry that would break spawning or make goals unscorable
    pub fn sanitized(self) -> Self {
        let values = [
            self.width,
            self.height,
            self.ground_y,
            self.ceiling_y,
            self.goal_width,
            self.goal_height,
            self.post_thickness,
        ];
        let pitch_height = self.ground_y - self.ceiling_y;
        if values.iter().any(|v| !v.is_finite())
            || self.width < MIN_ARENA_WIDTH
            || self.ground_y > self.height
            || pitch_height < MIN_PITCH_HEIGHT
        {
            log::warn!("Unplayable arena geometry, using the default arena");
            return Self::default();
        }

        let mut arena = self;
        arena.goal_width = arena.goal_width.clamp(MIN_GOAL_WIDTH, arena.width / 4.0);
        arena.goal_height = arena.goal_height.clamp(MIN_GOAL_HEIGHT, pitch_height * 0.75);
        if arena.post_thickness <= 0.0 {
            arena.post_thickness = Self::default().post_thickness;
        }
        if arena != self {
            log::warn!("Adjusted goal geometry to keep goals scorable");
        }
        arena
    }
}

/// Match flow and power-up rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// First to this many goals wins
    pub win_score: u32,
    /// Pause after a goal before the kick-off reset (seconds)
    pub goal_reset_secs: f32,
    /// How long the match-over screen stays up (seconds)
    pub match_over_secs: f32,
    pub powerup_spawn_min_secs: f32,
    pub powerup_spawn_max_secs: f32,
    /// Power-up types that may spawn
    pub enabled_powerups: Vec<PowerupKind>,
    /// Duration of speed / jump / size buffs (seconds)
    pub buff_secs: f32,
    /// Duration of the ball freeze (seconds)
    pub freeze_secs: f32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            win_score: 5,
            goal_reset_secs: 2.0,
            match_over_secs: 4.0,
            powerup_spawn_min_secs: 6.0,
            powerup_spawn_max_secs: 12.0,
            enabled_powerups: PowerupKind::ALL.to_vec(),
            buff_secs: 8.0,
            freeze_secs: 3.0,
        }
    }
}

/// Complete frozen configuration for a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena: ArenaConfig,
    pub rules: MatchRules,
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {} - using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Repair values that would make the spawn manager or match flow misbehave
    pub fn sanitized(mut self) -> Self {
        let rules = &mut self.rules;
        if rules.powerup_spawn_min_secs > rules.powerup_spawn_max_secs {
            std::mem::swap(
                &mut rules.powerup_spawn_min_secs,
                &mut rules.powerup_spawn_max_secs,
            );
        }
        rules.powerup_spawn_min_secs = rules.powerup_spawn_min_secs.max(0.5);
        rules.powerup_spawn_max_secs =
            rules.powerup_spawn_max_secs.max(rules.powerup_spawn_min_secs);
        if rules.win_score == 0 {
            log::warn!("win_score of 0 is not playable, using 1");
            rules.win_score = 1;
        }

        let defaults = MatchRules::default();
        if !positive(rules.buff_secs) {
            log::warn!("buff_secs must be positive, using {}", defaults.buff_secs);
            rules.buff_secs = defaults.buff_secs;
        }
        if !positive(rules.freeze_secs) {
            log::warn!("freeze_secs must be positive, using {}", defaults.freeze_secs);
            rules.freeze_secs = defaults.freeze_secs;
        }

        self.arena = self.arena.sanitized();
        self
    }
}

#[inline]
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "rules": { "win_score": 3 } }"#).unwrap();
        assert_eq!(settings.rules.win_score, 3);
        assert_eq!(settings.arena, ArenaConfig::default());
        assert_eq!(settings.rules.enabled_powerups.len(), PowerupKind::ALL.len());
    }

    #[test]
    fn test_json_roundtrip_of_custom_arena() {
        let mut settings = Settings::default();
        settings.arena.goal_height = 250.0;
        let json = settings.to_json().unwrap();
        let parsed = Settings::from_json(&json).unwrap();
        assert_eq!(parsed.arena.goal_height, 250.0);
    }

    #[test]
    fn test_sanitize_swaps_inverted_spawn_range() {
        let mut settings = Settings::default();
        settings.rules.powerup_spawn_min_secs = 10.0;
        settings.rules.powerup_spawn_max_secs = 2.0;
        settings.rules.win_score = 0;
        let settings = settings.sanitized();
        assert_eq!(settings.rules.powerup_spawn_min_secs, 2.0);
        assert_eq!(settings.rules.powerup_spawn_max_secs, 10.0);
        assert_eq!(settings.rules.win_score, 1);
    }

    #[test]
    fn test_sanitize_restores_non_positive_durations() {
        let mut settings = Settings::default();
        settings.rules.buff_secs = 0.0;
        settings.rules.freeze_secs = -2.0;
        let settings = settings.sanitized();
        assert_eq!(settings.rules.buff_secs, MatchRules::default().buff_secs);
        assert_eq!(settings.rules.freeze_secs, MatchRules::default().freeze_secs);

        let mut settings = Settings::default();
        settings.rules.buff_secs = f32::NAN;
        assert_eq!(settings.sanitized().rules.buff_secs, MatchRules::default().buff_secs);
    }

    #[test]
    fn test_sanitize_replaces_degenerate_arena() {
        let mut settings = Settings::default();
        settings.arena.width = 0.0;
        assert_eq!(settings.sanitized().arena, ArenaConfig::default());

        let mut settings = Settings::default();
        settings.arena.ground_y = settings.arena.height + 50.0;
        assert_eq!(settings.sanitized().arena, ArenaConfig::default());
    }

    #[test]
    fn test_sanitize_keeps_goals_scorable() {
        let mut settings = Settings::default();
        settings.arena.goal_width = 10.0;
        settings.arena.goal_height = 5.0;
        let arena = settings.sanitized().arena;
        assert_eq!(arena.goal_width, MIN_GOAL_WIDTH);
        assert!(arena.left_goal_line() > 2.0 * BALL_RADIUS);
        assert!(arena.goal_height >= MIN_GOAL_HEIGHT);
        assert_eq!(arena.width, ArenaConfig::default().width);
    }

    #[test]
    fn test_default_arena_survives_sanitize() {
        assert_eq!(ArenaConfig::default().sanitized(), ArenaConfig::default());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_goal_geometry() {
        let arena = ArenaConfig::default();
        assert_eq!(arena.left_goal_line(), 90.0);
        assert_eq!(arena.right_goal_line(), 1110.0);
        assert!(arena.in_goal_band(arena.ground_y - 10.0));
        assert!(!arena.in_goal_band(arena.goal_mouth_top() - 1.0));

        let [left, right] = arena.crossbars();
        assert_eq!(left.bottom(), arena.goal_mouth_top());
        assert_eq!(right.right(), arena.width);
    }
}
