//! Power-up and star capture
//!
//! Runs after movement so captures use end-of-tick positions. Captured
//! entities are only flagged here; `GameState::replace_consumed` compacts
//! and respawns them at the end of the tick.

use tracing::trace;

use crate::game::constants::pickup;
use crate::game::state::GameState;
use crate::hooks::GameEvent;

/// Check every living vehicle against the pickup and star fields
pub fn collect_pickups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for v in state.vehicles.values_mut() {
        if !v.alive {
            continue;
        }

        for p in state.pickups.iter_mut().filter(|p| !p.consumed) {
            let reach = v.radius() + pickup::POWERUP_RADIUS;
            if v.position.distance_sq_to(p.position) < reach * reach {
                p.consumed = true;
                v.apply_powerup(p.kind);
                trace!(vehicle = %v.name, kind = ?p.kind, "power-up collected");
                events.push(GameEvent::PowerupCollected {
                    vehicle: v.id,
                    kind: p.kind,
                });
            }
        }

        for s in state.stars.iter_mut().filter(|s| !s.consumed) {
            let reach = v.radius() + pickup::STAR_RADIUS;
            if v.position.distance_sq_to(s.position) < reach * reach {
                s.consumed = true;
                v.target_mass += pickup::STAR_MASS;
                v.health = (v.health + pickup::STAR_HEAL).min(v.stats.max_health);
                v.score += pickup::STAR_SCORE;
                events.push(GameEvent::StarCollected { vehicle: v.id });
            }
        }
    }
}
