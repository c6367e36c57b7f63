//! Roaming mine behavior and mine-vehicle contact
//!
//! Mines wander until a vehicle comes close, chase it for a bounded burst,
//! then give up. A shielded or dashing vehicle deflects the mine instead of
//! taking the hit; either way the mine is stunned afterwards so a single
//! contact never lands twice.

use tracing::debug;

use crate::game::constants::obstacle;
use crate::game::state::{GameState, MinePhase, Vehicle};
use crate::hooks::GameEvent;
use crate::util::vec2::Vec2;

/// Advance every mine one tick: phase machine, movement, edge bounce
pub fn update_mines(state: &mut GameState) {
    let bounds = state.bounds;
    for mine in &mut state.mines {
        match mine.phase {
            MinePhase::Stunned { remaining } => {
                if remaining <= 1 {
                    mine.phase = MinePhase::Wandering;
                    // Resume wandering along the old bearing at wander pace
                    let (dir, len) = mine.velocity.normalize_with_length();
                    if len > 0.0 {
                        mine.velocity = dir * obstacle::WANDER_SPEED_MIN;
                    } else {
                        mine.velocity = Vec2::new(obstacle::WANDER_SPEED_MIN, 0.0);
                    }
                } else {
                    mine.phase = MinePhase::Stunned {
                        remaining: remaining - 1,
                    };
                }
                continue;
            }
            MinePhase::Chasing { remaining } => {
                let target = nearest_vehicle(&state.vehicles, mine.position);
                match target {
                    Some((pos, dist)) if remaining > 1 && dist < obstacle::DETECTION_RADIUS => {
                        let (dir, _) = (pos - mine.position).normalize_with_length();
                        mine.velocity = dir * obstacle::CHASE_SPEED;
                        mine.phase = MinePhase::Chasing {
                            remaining: remaining - 1,
                        };
                    }
                    _ => {
                        // Burst exhausted or target escaped
                        let (dir, len) = mine.velocity.normalize_with_length();
                        mine.velocity = if len > 0.0 {
                            dir * obstacle::WANDER_SPEED_MIN
                        } else {
                            Vec2::new(obstacle::WANDER_SPEED_MIN, 0.0)
                        };
                        mine.phase = MinePhase::Wandering;
                    }
                }
            }
            MinePhase::Wandering => {
                if let Some((_, dist)) = nearest_vehicle(&state.vehicles, mine.position) {
                    if dist < obstacle::DETECTION_RADIUS {
                        mine.phase = MinePhase::Chasing {
                            remaining: obstacle::CHASE_DURATION,
                        };
                    }
                }
            }
        }

        mine.position += mine.velocity;

        // Bounce off the world edges
        if mine.position.x < bounds.min.x || mine.position.x > bounds.max.x {
            mine.velocity.x = -mine.velocity.x;
        }
        if mine.position.y < bounds.min.y || mine.position.y > bounds.max.y {
            mine.velocity.y = -mine.velocity.y;
        }
        mine.position = bounds.clamp(mine.position);
    }
}

/// Resolve mine-vehicle contacts. A hit damages, sheds mass and shoves the
/// vehicle backwards; an immune vehicle knocks the mine away instead.
pub fn resolve_mine_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for mine in &mut state.mines {
        if mine.is_stunned() {
            continue;
        }
        for v in state.vehicles.values_mut() {
            if !v.alive {
                continue;
            }
            let reach = mine.radius + v.radius();
            if v.position.distance_sq_to(mine.position) >= reach * reach {
                continue;
            }

            let (away, dist) = (mine.position - v.position).normalize_with_length();
            let away = if dist > 0.0 { away } else { Vec2::new(1.0, 0.0) };

            if v.is_damage_immune() {
                let push = if v.dash.is_dashing() {
                    obstacle::DASH_DEFLECT_PUSH
                } else {
                    obstacle::DEFLECT_PUSH
                };
                mine.position += away * push;
                mine.velocity = away * push * 0.1;
                events.push(GameEvent::MineHit {
                    vehicle: v.id,
                    deflected: true,
                });
            } else {
                let died = v.apply_damage(obstacle::HIT_DAMAGE);
                // Mass never goes negative, a hit can only drain to zero
                v.target_mass = (v.target_mass - obstacle::HIT_MASS_LOSS).max(0.0);
                v.position -= away * obstacle::HIT_PUSH;
                v.speed *= obstacle::HIT_SPEED_FACTOR;
                debug!(vehicle = %v.name, "mine hit");
                events.push(GameEvent::MineHit {
                    vehicle: v.id,
                    deflected: false,
                });
                if died {
                    events.push(GameEvent::Kill {
                        victim: v.id,
                        killer: None,
                    });
                }
            }

            // Either outcome stuns the mine so the contact resolves once
            mine.phase = MinePhase::Stunned {
                remaining: obstacle::STUN_DURATION,
            };
            break;
        }
    }
}

fn nearest_vehicle(
    vehicles: &hashbrown::HashMap<crate::game::state::VehicleId, Vehicle>,
    from: Vec2,
) -> Option<(Vec2, f32)> {
    vehicles
        .values()
        .filter(|v| v.alive)
        .map(|v| (v.position, v.position.distance_to(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
