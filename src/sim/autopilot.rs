//! Demo-mode AI
//!
//! Stateless: reads the current state and produces one tick of commands for
//! a side, so idle mode replays deterministically with the rest of the sim.

use super::player::{PlayerCommand, Side};
use super::state::GameState;

/// Preferred gap behind the ball (toward our own goal)
const APPROACH_OFFSET: f32 = 22.0;
/// Close enough to the target spot to stop walking
const ARRIVE_TOLERANCE: f32 = 6.0;
/// Horizontal reach for kicks
const KICK_RANGE: f32 = 38.0;
/// Horizontal range for jumping at a high ball
const JUMP_RANGE: f32 = 60.0;
/// Fire when the opponent is this close in front
const FIRE_RANGE: f32 = 520.0;

/// Commands for `side` this tick
pub fn command(state: &GameState, side: Side) -> PlayerCommand {
    let me = state.player(side);
    let foe = state.player(side.opponent());
    let ball = &state.ball;
    let attack = side.attack_direction();
    let mut cmd = PlayerCommand::default();

    if me.is_tumbling() || me.is_stunned() {
        return cmd;
    }

    let dx = ball.pos.x - me.pos.x;
    let ball_ahead = dx * attack > 0.0;

    // Get goal-side of the ball, then push it forward
    let target_x = if ball_ahead || dx.abs() > KICK_RANGE * 2.0 {
        ball.pos.x - attack * APPROACH_OFFSET
    } else {
        // Ball is just behind us: circle back around it
        ball.pos.x - attack * APPROACH_OFFSET * 3.0
    };
    let to_target = target_x - me.pos.x;
    if to_target.abs() > ARRIVE_TOLERANCE {
        cmd.left = to_target < 0.0;
        cmd.right = to_target > 0.0;
    } else {
        // Turn to face the attack direction when parked behind the ball
        cmd.left = attack < 0.0 && me.facing > 0.0;
        cmd.right = attack > 0.0 && me.facing < 0.0;
    }

    let ball_low = ball.pos.y > me.hip().y - ball.radius;
    let facing_ball = me.facing * dx > 0.0;
    if ball_low && facing_ball && dx.abs() < KICK_RANGE && !me.is_kicking() {
        cmd.kick = true;
    }

    let ball_high = ball.pos.y < me.head_center().y;
    let falling_in_reach = ball.vel.y > -150.0 && dx.abs() < JUMP_RANGE;
    let blocked = !ball_ahead && dx.abs() < KICK_RANGE;
    if (ball_high && falling_in_reach) || blocked {
        cmd.jump = true;
    }

    let foe_dx = foe.pos.x - me.pos.x;
    if me.weapon.ammo() > 0 && me.facing * foe_dx > 0.0 && foe_dx.abs() < FIRE_RANGE {
        cmd.fire = true;
    }

    cmd
}
