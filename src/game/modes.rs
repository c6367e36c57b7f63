//! Game-mode rule variants
//!
//! One [`ModeRules`] value is queried by the collision resolver (damage
//! filtering, contact effects) and stepped once per tick by the game loop
//! (bounds, zone scoring, win conditions). Modes never own entities; they
//! bend the shared rules.

use hashbrown::HashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::constants::modes::*;
use crate::hooks::GameEvent;
use crate::game::state::{GameState, Rect, Team, Vehicle, VehicleId};
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    Elimination,
    KingOfTheHill,
    TeamDeathmatch,
    Infection,
}

impl GameMode {
    pub fn name(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Elimination => "elimination",
            GameMode::KingOfTheHill => "koth",
            GameMode::TeamDeathmatch => "tdm",
            GameMode::Infection => "infection",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "elimination" => Some(GameMode::Elimination),
            "koth" | "king_of_the_hill" => Some(GameMode::KingOfTheHill),
            "tdm" | "team_deathmatch" => Some(GameMode::TeamDeathmatch),
            "infection" => Some(GameMode::Infection),
            _ => None,
        }
    }
}

/// Terminal result produced by a mode objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeOutcome {
    TeamVictory(Team),
    HillWinner(VehicleId),
    InfectionComplete,
}

/// Mode-specific state and rule hooks
#[derive(Debug, Clone)]
pub struct ModeRules {
    pub mode: GameMode,
    world: Rect,
    /// Elimination: how many shrink steps have applied
    shrink_level: u32,
    /// KotH zone center and the waypoint it drifts toward
    hill_center: Vec2,
    hill_waypoint: Vec2,
    hill_scores: HashMap<VehicleId, u32>,
    /// TDM kill tallies, indexed by Team::index
    team_kills: [u32; 2],
}

impl ModeRules {
    pub fn new(mode: GameMode, world: Rect) -> Self {
        Self {
            mode,
            world,
            shrink_level: 0,
            hill_center: world.center(),
            hill_waypoint: world.center(),
            hill_scores: HashMap::new(),
            team_kills: [0, 0],
        }
    }

    /// One-time setup once the roster exists: team assignment, patient zero
    pub fn prepare(&mut self, state: &mut GameState, rng: &mut impl Rng) {
        match self.mode {
            GameMode::TeamDeathmatch => {
                // Alternate assignment; odd rosters just leave one team larger
                for (i, v) in state.vehicles.values_mut().enumerate() {
                    v.team = Some(if i % 2 == 0 { Team::Red } else { Team::Blue });
                }
            }
            GameMode::Infection => {
                let carriers: Vec<VehicleId> = state
                    .vehicles
                    .values()
                    .filter(|v| !v.is_player())
                    .map(|v| v.id)
                    .collect();
                let chosen = if carriers.is_empty() {
                    state.player_id
                } else {
                    carriers[rng.gen_range(0..carriers.len())]
                };
                if let Some(v) = state.vehicles.get_mut(&chosen) {
                    v.infected = true;
                    info!(carrier = %v.name, "infection outbreak");
                }
            }
            GameMode::KingOfTheHill => {
                self.hill_waypoint = random_point(&self.world, rng);
            }
            _ => {}
        }
    }

    /// Rectangle vehicles are expected to stay inside. Only Elimination
    /// shrinks it; movement always clamps to the full world, so a cornered
    /// vehicle can sit outside this rect and bleed.
    pub fn active_bounds(&self) -> Rect {
        match self.mode {
            GameMode::Elimination => self
                .world
                .scaled(ELIMINATION_SHRINK_FACTOR.powi(self.shrink_level as i32)),
            _ => self.world,
        }
    }

    /// Elimination is a last-man-standing mode; the dead stay dead
    pub fn allow_ai_respawn(&self) -> bool {
        self.mode != GameMode::Elimination
    }

    pub fn hill_center(&self) -> Vec2 {
        self.hill_center
    }

    pub fn team_kill_count(&self, team: Team) -> u32 {
        self.team_kills[team.index()]
    }

    /// Filter contact damage. Teammates never hurt each other.
    pub fn modify_damage(&self, attacker: &Vehicle, victim: &Vehicle, damage: f32) -> f32 {
        if attacker.team.is_some() && attacker.team == victim.team {
            0.0
        } else {
            damage
        }
    }

    /// Contact side effects. Infection spreads on touch, one way.
    pub fn on_contact(&self, a: &mut Vehicle, b: &mut Vehicle, events: &mut Vec<GameEvent>) {
        if self.mode != GameMode::Infection {
            return;
        }
        if a.infected && !b.infected {
            b.infected = true;
            events.push(GameEvent::Infected { vehicle: b.id });
        } else if b.infected && !a.infected {
            a.infected = true;
            events.push(GameEvent::Infected { vehicle: a.id });
        }
    }

    /// Record a kill for the team tally
    pub fn on_kill(&mut self, killer_team: Option<Team>) {
        if self.mode == GameMode::TeamDeathmatch {
            if let Some(team) = killer_team {
                self.team_kills[team.index()] += 1;
            }
        }
    }

    /// Per-tick mode step. May damage or kill vehicles and may end the match.
    pub fn update(
        &mut self,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
        rng: &mut impl Rng,
    ) -> Option<ModeOutcome> {
        match self.mode {
            GameMode::Classic => None,
            GameMode::Elimination => self.update_elimination(state, events),
            GameMode::KingOfTheHill => self.update_hill(state, events, rng),
            GameMode::TeamDeathmatch => {
                for team in [Team::Red, Team::Blue] {
                    if self.team_kills[team.index()] >= TDM_KILL_TARGET {
                        return Some(ModeOutcome::TeamVictory(team));
                    }
                }
                None
            }
            GameMode::Infection => {
                let all_infected = state
                    .vehicles
                    .values()
                    .filter(|v| v.alive)
                    .all(|v| v.infected);
                if all_infected && state.alive_count() > 0 {
                    Some(ModeOutcome::InfectionComplete)
                } else {
                    None
                }
            }
        }
    }

    fn update_elimination(
        &mut self,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
    ) -> Option<ModeOutcome> {
        let level = (state.tick / ELIMINATION_SHRINK_INTERVAL as u64) as u32;
        if level != self.shrink_level {
            self.shrink_level = level;
            let b = self.active_bounds();
            debug!(level, width = b.width(), "elimination bounds shrank");
        }

        let bounds = self.active_bounds();
        let damage_tick = state.tick % ELIMINATION_DAMAGE_INTERVAL as u64 == 0;
        if !damage_tick {
            return None;
        }
        for v in state.vehicles.values_mut() {
            if v.alive && !bounds.contains(v.position) {
                // Zone damage ignores shields; only the safe rect protects
                if v.apply_damage(ELIMINATION_ZONE_DAMAGE) {
                    events.push(GameEvent::Kill {
                        victim: v.id,
                        killer: None,
                    });
                }
            }
        }
        None
    }

    fn update_hill(
        &mut self,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
        rng: &mut impl Rng,
    ) -> Option<ModeOutcome> {
        // Drift the hill toward its waypoint, repick when it arrives
        let to_waypoint = self.hill_waypoint - self.hill_center;
        let (dir, dist) = to_waypoint.normalize_with_length();
        if dist <= HILL_DRIFT_SPEED {
            self.hill_center = self.hill_waypoint;
            self.hill_waypoint = random_point(&self.world, rng);
        } else {
            self.hill_center += dir * HILL_DRIFT_SPEED;
        }

        let occupants: Vec<VehicleId> = state
            .vehicles
            .values()
            .filter(|v| v.alive && v.position.distance_to(self.hill_center) < HILL_RADIUS)
            .map(|v| v.id)
            .collect();

        match occupants.as_slice() {
            [sole] => {
                let score = self.hill_scores.entry(*sole).or_insert(0);
                *score += HILL_SCORE_PER_TICK;
                if let Some(v) = state.vehicles.get_mut(sole) {
                    v.score += HILL_SCORE_PER_TICK;
                }
                if *score >= HILL_WIN_SCORE {
                    return Some(ModeOutcome::HillWinner(*sole));
                }
            }
            [] => {}
            contested => {
                for id in contested {
                    if let Some(v) = state.vehicles.get_mut(id) {
                        if v.alive && v.apply_damage(HILL_CONTEST_DAMAGE) {
                            events.push(GameEvent::Kill {
                                victim: *id,
                                killer: None,
                            });
                        }
                    }
                }
            }
        }
        None
    }
}

fn random_point(world: &Rect, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(world.min.x..world.max.x),
        rng.gen_range(world.min.y..world.max.y),
    )
}
