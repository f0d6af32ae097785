//! Stateless stick-figure poses
//!
//! Every pose is a pure function of phase time, so animation can be tested
//! without running ticks. Angles are radians measured from straight down;
//! positive values swing toward the facing direction. Shin angles are
//! relative to their thigh.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{ease_out_quad, lerp};

/// Kick progress at which the windup ends and the strike begins
pub const KICK_WINDUP_END: f32 = 0.2;
/// Start of the kick's impact window (progress fraction)
pub const KICK_IMPACT_START: f32 = 0.4;
/// End of the kick's impact window (progress fraction)
pub const KICK_IMPACT_END: f32 = 0.8;

/// Itch animation cycles per second
pub const ITCH_FREQUENCY: f32 = 3.0;
/// Time for a stunned player to slump from the standing pose
pub const STUN_SETTLE_SECS: f32 = 0.15;

/// Joint angles for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub front_thigh: f32,
    pub front_shin: f32,
    pub back_thigh: f32,
    pub back_shin: f32,
    pub front_arm: f32,
    pub back_arm: f32,
    /// Torso lean
    pub lean: f32,
    /// Whole-body rotation (tumbling)
    pub spin: f32,
}

impl Pose {
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            front_thigh: lerp(self.front_thigh, other.front_thigh, t),
            front_shin: lerp(self.front_shin, other.front_shin, t),
            back_thigh: lerp(self.back_thigh, other.back_thigh, t),
            back_shin: lerp(self.back_shin, other.back_shin, t),
            front_arm: lerp(self.front_arm, other.front_arm, t),
            back_arm: lerp(self.back_arm, other.back_arm, t),
            lean: lerp(self.lean, other.lean, t),
            spin: lerp(self.spin, other.spin, t),
        }
    }

    /// Foot offset of the front leg from the hip, for a leg of `leg_length`
    /// facing `facing` (+1 right, -1 left)
    pub fn front_foot_offset(&self, leg_length: f32, facing: f32) -> Vec2 {
        let half = leg_length / 2.0;
        let shin = self.front_thigh + self.front_shin;
        Vec2::new(
            facing * (self.front_thigh.sin() * half + shin.sin() * half),
            self.front_thigh.cos() * half + shin.cos() * half,
        )
    }
}

/// Standing pose
pub const NEUTRAL: Pose = Pose {
    front_thigh: 0.12,
    front_shin: 0.0,
    back_thigh: -0.12,
    back_shin: 0.0,
    front_arm: 0.25,
    back_arm: -0.25,
    lean: 0.0,
    spin: 0.0,
};

const KICK_WINDUP: Pose = Pose {
    front_thigh: -0.5,
    front_shin: -0.4,
    back_thigh: -0.05,
    back_shin: 0.0,
    front_arm: -0.6,
    back_arm: 0.7,
    lean: -0.15,
    spin: 0.0,
};

const KICK_EXTENDED: Pose = Pose {
    front_thigh: 1.4,
    front_shin: 0.1,
    back_thigh: -0.2,
    back_shin: 0.1,
    front_arm: 0.8,
    back_arm: -0.9,
    lean: -0.3,
    spin: 0.0,
};

const ITCH_HIGH: Pose = Pose {
    front_thigh: 0.9,
    front_shin: -1.4,
    back_thigh: -0.1,
    back_shin: 0.0,
    front_arm: 2.6,
    back_arm: -0.4,
    lean: 0.2,
    spin: 0.0,
};

const ITCH_LOW: Pose = Pose {
    front_thigh: 0.2,
    front_shin: 0.0,
    back_thigh: -0.6,
    back_shin: 1.2,
    front_arm: 0.6,
    back_arm: 1.1,
    lean: -0.25,
    spin: 0.0,
};

/// Kick pose at `progress` in [0, 1]: eased windup, then linear strike
pub fn kick_pose(progress: f32) -> Pose {
    let p = progress.clamp(0.0, 1.0);
    if p < KICK_WINDUP_END {
        NEUTRAL.lerp(&KICK_WINDUP, ease_out_quad(p / KICK_WINDUP_END))
    } else {
        let t = (p - KICK_WINDUP_END) / (1.0 - KICK_WINDUP_END);
        KICK_WINDUP.lerp(&KICK_EXTENDED, t)
    }
}

/// True when kick progress lies inside the impact window
#[inline]
pub fn in_impact_window(progress: f32) -> bool {
    (KICK_IMPACT_START..=KICK_IMPACT_END).contains(&progress)
}

/// Walking cycle; `phase` advances with distance travelled
pub fn walk_pose(phase: f32) -> Pose {
    let swing = phase.sin() * 0.55;
    Pose {
        front_thigh: swing,
        front_shin: (-swing).max(0.0) * 0.8,
        back_thigh: -swing,
        back_shin: swing.max(0.0) * 0.8,
        front_arm: -swing * 0.8,
        back_arm: swing * 0.8,
        lean: 0.08,
        spin: 0.0,
    }
}

/// Airborne tuck
pub fn jump_pose() -> Pose {
    Pose {
        front_thigh: 0.7,
        front_shin: -0.9,
        back_thigh: -0.3,
        back_shin: 0.6,
        front_arm: 2.2,
        back_arm: -2.2,
        lean: 0.0,
        spin: 0.0,
    }
}

/// Itching frenzy: blend between two scratch poses plus a jitter wobble
pub fn itch_pose(phase_secs: f32) -> Pose {
    let cycle = phase_secs * ITCH_FREQUENCY * std::f32::consts::TAU;
    let blend = 0.5 + 0.5 * cycle.sin();
    let mut pose = ITCH_HIGH.lerp(&ITCH_LOW, blend);
    pose.lean += (cycle * 3.0).sin() * 0.12;
    pose.front_arm += (cycle * 4.0).cos() * 0.2;
    pose
}

/// Tumbling: limbs splayed, body rotated by `spin`
pub fn tumble_pose(spin: f32) -> Pose {
    Pose {
        front_thigh: 0.9,
        front_shin: 0.4,
        back_thigh: -0.9,
        back_shin: -0.4,
        front_arm: 2.0,
        back_arm: -2.0,
        lean: 0.0,
        spin,
    }
}

/// Stunned: settles from standing into a slump with a slow sway
pub fn stunned_pose(phase_secs: f32) -> Pose {
    let sway = (phase_secs * 4.0).sin() * 0.15;
    let slumped = Pose {
        front_thigh: 0.05,
        front_shin: 0.3,
        back_thigh: -0.05,
        back_shin: 0.3,
        front_arm: 0.1,
        back_arm: -0.1,
        lean: 0.35 + sway,
        spin: 0.0,
    };
    NEUTRAL.lerp(&slumped, ease_out_quad(phase_secs / STUN_SETTLE_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kick_pose_endpoints() {
        assert_eq!(kick_pose(0.0), NEUTRAL);
        assert_eq!(kick_pose(KICK_WINDUP_END), KICK_WINDUP);
        let end = kick_pose(1.0);
        assert!((end.front_thigh - KICK_EXTENDED.front_thigh).abs() < 1e-5);
        assert!((end.front_shin - KICK_EXTENDED.front_shin).abs() < 1e-5);
    }

    #[test]
    fn test_kick_foot_moves_forward_through_strike() {
        let leg = 40.0;
        let early = kick_pose(KICK_IMPACT_START).front_foot_offset(leg, 1.0);
        let late = kick_pose(KICK_IMPACT_END).front_foot_offset(leg, 1.0);
        assert!(late.x > early.x);
        // Facing left mirrors the foot
        let mirrored = kick_pose(KICK_IMPACT_END).front_foot_offset(leg, -1.0);
        assert!((mirrored.x + late.x).abs() < 1e-5);
        assert!((mirrored.y - late.y).abs() < 1e-5);
    }

    #[test]
    fn test_impact_window_excludes_endpoints() {
        assert!(!in_impact_window(0.0));
        assert!(!in_impact_window(1.0));
        assert!(in_impact_window(KICK_IMPACT_START));
        assert!(in_impact_window(0.6));
        assert!(in_impact_window(KICK_IMPACT_END));
    }

    #[test]
    fn test_neutral_foot_hangs_below_hip() {
        let off = NEUTRAL.front_foot_offset(40.0, 1.0);
        assert!(off.y > 39.0 && off.y <= 40.0);
    }

    #[test]
    fn test_stun_starts_upright_then_slumps() {
        assert_eq!(stunned_pose(0.0), NEUTRAL);
        let settled = stunned_pose(STUN_SETTLE_SECS);
        assert!(settled.lean > 0.3);
        assert!((settled.front_shin - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_itch_pose_is_periodic() {
        let period = 1.0 / ITCH_FREQUENCY;
        let a = itch_pose(0.1);
        let b = itch_pose(0.1 + period);
        assert!((a.front_arm - b.front_arm).abs() < 1e-3);
        assert!((a.lean - b.lean).abs() < 1e-3);
    }
}
