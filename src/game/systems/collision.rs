//! Vehicle contact resolution
//!
//! Broad phase comes from the spatial grid; this module runs the narrow
//! phase on each candidate pair. Separation and knockback are weighted by
//! mass so the total displacement is momentum-symmetric: a heavy vehicle
//! barely moves when a light one rams it.

use tracing::debug;

use crate::game::constants::{combat, obstacle, streak};
use crate::game::modes::{GameMode, ModeRules};
use crate::game::spatial::SpatialGrid;
use crate::game::state::{GameState, MinePhase, StreakReward, VehicleId};
use crate::hooks::GameEvent;

/// Resolve all vehicle-vehicle contacts for this tick
pub fn resolve_vehicle_collisions(
    state: &mut GameState,
    grid: &SpatialGrid,
    rules: &mut ModeRules,
    events: &mut Vec<GameEvent>,
) {
    let mut pairs: Vec<(VehicleId, VehicleId)> = Vec::new();
    grid.for_each_potential_collision(|a, b| {
        let reach = a.radius + b.radius;
        if a.position.distance_sq_to(b.position) < reach * reach {
            pairs.push((a.id, b.id));
        }
    });

    for (id_a, id_b) in pairs {
        resolve_pair(state, rules, events, id_a, id_b);
    }
}

fn resolve_pair(
    state: &mut GameState,
    rules: &mut ModeRules,
    events: &mut Vec<GameEvent>,
    id_a: VehicleId,
    id_b: VehicleId,
) {
    let [Some(a), Some(b)] = state.vehicles.get_many_mut([&id_a, &id_b]) else {
        return;
    };
    if !a.alive || !b.alive {
        return;
    }

    let delta = b.position - a.position;
    let (dir, dist) = delta.normalize_with_length();
    let reach = a.radius() + b.radius();
    // Grid positions are start-of-tick; re-check after earlier pair pushes
    if dist >= reach {
        return;
    }

    let mass_a = a.mass.max(1.0);
    let mass_b = b.mass.max(1.0);
    let total = mass_a + mass_b;
    // Each side's share of the correction is the OTHER side's mass fraction
    let weight_a = mass_b / total;
    let weight_b = mass_a / total;

    // Perfectly coincident centers have no separation axis; leave positions
    // alone and let next tick's movement break the tie
    if dist > 0.0 {
        let overlap = reach - dist;
        a.position -= dir * (overlap * weight_a);
        b.position += dir * (overlap * weight_b);
    }

    // Impact bleeds speed in proportion to the same weights, plus a shove
    // scaled by the other vehicle's push force
    a.speed = a.speed * (1.0 - weight_a)
        - b.stats.push_force * weight_a * combat::KNOCKBACK_SCALE;
    b.speed = b.speed * (1.0 - weight_b)
        - a.stats.push_force * weight_b * combat::KNOCKBACK_SCALE;

    events.push(GameEvent::VehicleContact {
        a: id_a,
        b: id_b,
        position: a.position + dir * a.radius(),
    });

    rules.on_contact(a, b, events);

    // Damage is mass-ratio scaled: ramming something lighter hurts it more
    let damage_to_a = rules.modify_damage(
        b,
        a,
        combat::BASE_DAMAGE * (mass_b / mass_a) * b.damage_mult(),
    );
    let damage_to_b = rules.modify_damage(
        a,
        b,
        combat::BASE_DAMAGE * (mass_a / mass_b) * a.damage_mult(),
    );

    let a_died = !a.is_damage_immune() && a.apply_damage(damage_to_a);
    let b_died = !b.is_damage_immune() && b.apply_damage(damage_to_b);

    if a_died {
        award_kill(state, rules, events, id_a, id_b);
    }
    if b_died {
        award_kill(state, rules, events, id_b, id_a);
    }
}

/// Credit a kill to `killer_id`: event, streak bookkeeping, mode tally
fn award_kill(
    state: &mut GameState,
    rules: &mut ModeRules,
    events: &mut Vec<GameEvent>,
    victim_id: VehicleId,
    killer_id: VehicleId,
) {
    events.push(GameEvent::Kill {
        victim: victim_id,
        killer: Some(killer_id),
    });

    let Some(killer) = state.vehicles.get_mut(&killer_id) else {
        return;
    };
    debug!(killer = %killer.name, streak = killer.kill_streak + 1, "collision kill");
    let reward = killer.record_kill();
    let killer_team = killer.team;
    let killer_pos = killer.position;

    rules.on_kill(killer_team);
    if rules.mode == GameMode::TeamDeathmatch {
        if let Some(team) = killer_team {
            events.push(GameEvent::TeamScored {
                team,
                kills: rules.team_kill_count(team),
            });
        }
    }

    if let Some(reward) = reward {
        events.push(GameEvent::StreakReward {
            vehicle: killer_id,
            reward,
        });
        if reward == StreakReward::Shockwave {
            shockwave(state, killer_pos);
        }
    }
}

/// Streak shockwave: blast every mine in range away from the epicenter
/// and stun it
fn shockwave(state: &mut GameState, center: crate::util::vec2::Vec2) {
    for mine in &mut state.mines {
        let delta = mine.position - center;
        let (dir, dist) = delta.normalize_with_length();
        if dist < streak::SHOCKWAVE_RADIUS && dist > 0.0 {
            mine.position += dir * streak::SHOCKWAVE_PUSH;
            mine.velocity = dir * streak::SHOCKWAVE_PUSH * 0.1;
            mine.phase = MinePhase::Stunned {
                remaining: obstacle::STUN_DURATION,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::spatial::{SpatialEntity, SpatialGrid};
    use crate::game::state::{GameState, Team, Vehicle};
    use crate::util::vec2::Vec2;

    fn setup(mode: GameMode) -> (GameState, ModeRules, Vec<GameEvent>) {
        let state = GameState::new(GameState::world_bounds(), "Driver");
        let rules = ModeRules::new(mode, state.bounds);
        (state, rules, Vec::new())
    }

    fn add_vehicle(state: &mut GameState, mass: f32, position: Vec2) -> VehicleId {
        let mut v = Vehicle::new_ai(format!("Bot-{}", state.vehicles.len()), position);
        v.mass = mass;
        v.target_mass = mass;
        v.update_mass_and_stats();
        v.health = v.stats.max_health;
        let id = v.id;
        state.vehicles.insert(id, v);
        id
    }

    fn grid_for(state: &GameState) -> SpatialGrid {
        let mut grid = SpatialGrid::default();
        grid.rebuild(
            state
                .vehicles
                .values()
                .filter(|v| v.alive)
                .map(|v| SpatialEntity {
                    id: v.id,
                    position: v.position,
                    radius: v.radius(),
                }),
        );
        grid
    }

    #[test]
    fn test_separation_momentum_symmetric() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let light = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let heavy = add_vehicle(&mut state, 300.0, Vec2::new(1010.0, 1000.0));
        let p_light = state.vehicles[&light].position;
        let p_heavy = state.vehicles[&heavy].position;

        resolve_pair(&mut state, &mut rules, &mut events, light, heavy);

        let d_light = state.vehicles[&light].position - p_light;
        let d_heavy = state.vehicles[&heavy].position - p_heavy;
        assert!(d_light.x < 0.0 && d_heavy.x > 0.0, "pushed apart");
        let momentum = 100.0 * d_light.length() - 300.0 * d_heavy.length();
        assert!(
            momentum.abs() < 0.01,
            "mass-weighted displacements should cancel, got {momentum}"
        );
    }

    #[test]
    fn test_heavier_vehicle_deals_more_and_takes_less() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let light = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let heavy = add_vehicle(&mut state, 400.0, Vec2::new(1020.0, 1000.0));
        let light_start = state.vehicles[&light].health;
        let heavy_start = state.vehicles[&heavy].health;

        resolve_pair(&mut state, &mut rules, &mut events, light, heavy);

        let light_taken = light_start - state.vehicles[&light].health;
        let heavy_taken = heavy_start - state.vehicles[&heavy].health;
        assert!(light_taken > heavy_taken);
        // 4:1 mass ratio times the heavy side's damage multiplier
        let expected = combat::BASE_DAMAGE * 4.0 * state.vehicles[&heavy].damage_mult();
        assert!((light_taken - expected).abs() < 0.01);
    }

    #[test]
    fn test_shield_blocks_damage_but_not_push() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let shielded = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let rammer = add_vehicle(&mut state, 100.0, Vec2::new(1010.0, 1000.0));
        state
            .vehicles
            .get_mut(&shielded)
            .unwrap()
            .apply_powerup(crate::game::state::PickupKind::Shield);
        let start_pos = state.vehicles[&shielded].position;
        let start_health = state.vehicles[&shielded].health;

        resolve_pair(&mut state, &mut rules, &mut events, shielded, rammer);

        assert_eq!(state.vehicles[&shielded].health, start_health);
        assert!(state.vehicles[&rammer].health < state.vehicles[&rammer].stats.max_health);
        assert_ne!(state.vehicles[&shielded].position, start_pos, "still pushed");
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::VehicleContact { .. })));
    }

    #[test]
    fn test_team_damage_suppressed_push_kept() {
        let (mut state, mut rules, mut events) = setup(GameMode::TeamDeathmatch);
        let a = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let b = add_vehicle(&mut state, 100.0, Vec2::new(1010.0, 1000.0));
        state.vehicles.get_mut(&a).unwrap().team = Some(Team::Red);
        state.vehicles.get_mut(&b).unwrap().team = Some(Team::Red);
        let pos_a = state.vehicles[&a].position;

        resolve_pair(&mut state, &mut rules, &mut events, a, b);

        assert_eq!(state.vehicles[&a].health, state.vehicles[&a].stats.max_health);
        assert_eq!(state.vehicles[&b].health, state.vehicles[&b].stats.max_health);
        assert_ne!(state.vehicles[&a].position, pos_a);
    }

    #[test]
    fn test_coincident_centers_no_nan() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let a = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let b = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));

        resolve_pair(&mut state, &mut rules, &mut events, a, b);

        let pa = state.vehicles[&a].position;
        let pb = state.vehicles[&b].position;
        assert!(pa.x.is_finite() && pa.y.is_finite());
        assert!(pb.x.is_finite() && pb.y.is_finite());
        assert_eq!(pa, pb, "no axis, no push");
    }

    #[test]
    fn test_kill_attribution_and_streak() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let victim = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let killer = add_vehicle(&mut state, 400.0, Vec2::new(1020.0, 1000.0));
        state.vehicles.get_mut(&victim).unwrap().health = 1.0;
        state.vehicles.get_mut(&killer).unwrap().kill_streak = 2;

        resolve_pair(&mut state, &mut rules, &mut events, victim, killer);

        assert!(!state.vehicles[&victim].alive);
        assert_eq!(state.vehicles[&killer].kills, 1);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Kill { victim: v, killer: Some(k) } if *v == victim && *k == killer
        )));
        // Third kill on the streak pays the shield reward
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::StreakReward { reward: StreakReward::Shield, .. }
        )));
        assert!(state.vehicles[&killer].status.shield_active());
    }

    #[test]
    fn test_shockwave_scatters_mines() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let victim = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let killer = add_vehicle(&mut state, 400.0, Vec2::new(1020.0, 1000.0));
        state.vehicles.get_mut(&victim).unwrap().health = 1.0;
        state.vehicles.get_mut(&killer).unwrap().kill_streak = streak::SHOCKWAVE_AT - 1;

        let mut rng = rand::thread_rng();
        state.spawn_mine(&mut rng);
        state.mines[0].position = Vec2::new(1100.0, 1000.0); // inside the blast
        state.mines[0].phase = MinePhase::Wandering;
        let mine_start = state.mines[0].position;

        resolve_pair(&mut state, &mut rules, &mut events, victim, killer);

        assert!(state.mines[0].is_stunned());
        assert!(
            state.mines[0].position.distance_to(mine_start) > 1.0,
            "mine should be blasted outward"
        );
    }

    #[test]
    fn test_grid_pipeline_resolves_overlaps() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let a = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let b = add_vehicle(&mut state, 100.0, Vec2::new(1015.0, 1000.0));
        let grid = grid_for(&state);

        resolve_vehicle_collisions(&mut state, &grid, &mut rules, &mut events);

        let dist = state.vehicles[&a]
            .position
            .distance_to(state.vehicles[&b].position);
        let reach = state.vehicles[&a].radius() + state.vehicles[&b].radius();
        assert!(dist >= reach - 0.01, "pair should be separated");
        assert!(state.vehicles[&a].health < state.vehicles[&a].stats.max_health);
    }

    #[test]
    fn test_distant_vehicles_untouched() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let a = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        add_vehicle(&mut state, 100.0, Vec2::new(3000.0, 3000.0));
        let grid = grid_for(&state);

        resolve_vehicle_collisions(&mut state, &grid, &mut rules, &mut events);

        assert_eq!(state.vehicles[&a].health, state.vehicles[&a].stats.max_health);
        assert!(events.is_empty());
    }

    #[test]
    fn test_dead_vehicles_skipped() {
        let (mut state, mut rules, mut events) = setup(GameMode::Classic);
        let a = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let b = add_vehicle(&mut state, 100.0, Vec2::new(1010.0, 1000.0));
        state.vehicles.get_mut(&a).unwrap().alive = false;

        resolve_pair(&mut state, &mut rules, &mut events, a, b);
        assert_eq!(state.vehicles[&b].health, state.vehicles[&b].stats.max_health);
        assert!(events.is_empty());
    }

    #[test]
    fn test_infection_spreads_on_contact() {
        let (mut state, mut rules, mut events) = setup(GameMode::Infection);
        let carrier = add_vehicle(&mut state, 100.0, Vec2::new(1000.0, 1000.0));
        let clean = add_vehicle(&mut state, 100.0, Vec2::new(1010.0, 1000.0));
        state.vehicles.get_mut(&carrier).unwrap().infected = true;

        resolve_pair(&mut state, &mut rules, &mut events, carrier, clean);

        assert!(state.vehicles[&clean].infected);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Infected { vehicle } if *vehicle == clean)));
    }
}
