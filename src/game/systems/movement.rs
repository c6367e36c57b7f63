//! Arcade drive integration
//!
//! Two drive models share one vehicle body. The player drive steers toward a
//! pointer offset with a deadzone, drifts (travel heading lags the steering
//! heading) and can dash. The AI drive turns toward an angle chosen by the
//! behavior layer and has no drift layer. Both are weight-taxed through the
//! derived stats and scaled by weather traction.

use std::f32::consts::{PI, TAU};

use crate::game::constants::{dash, drive};
use crate::game::game_loop::TickContext;
use crate::game::state::{Rect, Vehicle};
use crate::util::vec2::Vec2;

/// Player intent for one tick: pointer offset from the vehicle (world units)
/// and the dash button
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub steer: Vec2,
    pub dash: bool,
}

/// Normalize an angle into (-PI, PI]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Integrate one tick of the player drive. Returns true if a dash started.
pub fn update_player(v: &mut Vehicle, input: &PlayerInput, ctx: &TickContext) -> bool {
    if !v.alive {
        return false;
    }

    let mut dashed = false;
    if input.dash && v.dash.can_dash() {
        v.dash.active_ticks = dash::DURATION;
        v.dash.cooldown_ticks = dash::COOLDOWN;
        v.speed = v.effective_max_speed().max(v.speed) * dash::IMPULSE;
        dashed = true;
    }

    let cap = if v.dash.is_dashing() {
        v.effective_max_speed() * dash::TARGET_SPEED_MULT
    } else {
        v.effective_max_speed()
    };

    if input.steer.length() > drive::DEADZONE {
        let desired = input.steer.angle();
        let turn = drive::PLAYER_TURN * v.stats.turn_mult * ctx.traction;
        let diff = normalize_angle(desired - v.heading);
        v.heading = normalize_angle(v.heading + diff.clamp(-turn, turn));

        v.target_speed = cap;
        let accel = drive::PLAYER_ACCEL * v.effective_accel_mult() * ctx.traction;
        if v.speed < v.target_speed {
            v.speed = (v.speed + accel).min(v.target_speed);
        } else {
            // Over the cap (dash falloff, mass gain): ease back down
            v.speed += (v.target_speed - v.speed) * drive::OVERSPEED_LERP;
        }
    } else {
        v.target_speed = 0.0;
        v.speed *= drive::PLAYER_FRICTION;
    }

    // Travel heading chases the steering heading; low traction widens the drift
    let blend = drive::DRIFT_BLEND * ctx.traction;
    v.drift_heading =
        normalize_angle(v.drift_heading + normalize_angle(v.heading - v.drift_heading) * blend);
    v.position += Vec2::from_angle(v.drift_heading) * v.speed;

    dashed
}

/// Integrate one tick of the AI drive toward `desired_angle`
pub fn update_ai(v: &mut Vehicle, desired_angle: f32, speed_mult: f32, ctx: &TickContext) {
    if !v.alive {
        return;
    }

    let turn = drive::AI_TURN * v.stats.turn_mult * ctx.traction;
    let diff = normalize_angle(desired_angle - v.heading);
    v.heading = normalize_angle(v.heading + diff.clamp(-turn, turn));

    v.target_speed = v.effective_max_speed() * speed_mult;
    let accel = drive::AI_ACCEL * v.effective_accel_mult() * ctx.traction;
    if v.speed < v.target_speed {
        v.speed = (v.speed + accel).min(v.target_speed);
    } else {
        v.speed = (v.speed - drive::AI_DECEL).max(v.target_speed);
    }

    v.drift_heading = v.heading;
    v.position += Vec2::from_angle(v.heading) * v.speed;
}

/// Keep a vehicle inside the world rectangle
pub fn constrain_to_world(v: &mut Vehicle, bounds: &Rect) {
    v.position = bounds.clamp(v.position);
}
