//! Fixed-timestep simulation driver
//!
//! One [`Simulation`] owns the full match: world state, AI director, mode
//! rules, progression and the event buffer. `tick` runs every system in a
//! fixed order once per frame.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::game::constants::world;
use crate::game::match_result::{MatchEndReason, MatchSummary};
use crate::game::modes::{GameMode, ModeRules};
use crate::game::progression::LevelProgression;
use crate::game::spatial::{SpatialEntity, SpatialGrid};
use crate::game::state::GameState;
use crate::game::systems::ai::AiDirector;
use crate::game::systems::movement::{self, PlayerInput};
use crate::game::systems::{collision, obstacle, pickup};
use crate::hooks::{AudioHook, GameEvent, NullAudio, NullPersistence, PersistenceHook};

/// Read-only per-tick values shared by the movement and AI systems
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub tick: u64,
    /// Traction factor from the weather (1.0 dry, lower in rain)
    pub traction: f32,
    /// Bot top-speed multiplier from the difficulty level
    pub ai_speed_mult: f32,
    /// World units shaved off bot threat radii at this level
    pub threat_radius_cut: f32,
}

/// Match setup knobs
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub mode: GameMode,
    pub player_name: String,
    pub ai_count: usize,
    pub pickup_count: usize,
    pub star_count: usize,
    pub mine_count: usize,
    /// Hard cap on match length; None runs until an objective ends it
    pub max_ticks: Option<u64>,
    /// Fixed RNG seed for reproducible matches
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            player_name: "Driver".to_string(),
            ai_count: world::AI_COUNT,
            pickup_count: world::POWERUP_COUNT,
            star_count: world::STAR_COUNT,
            mine_count: world::OBSTACLE_COUNT,
            max_ticks: None,
            seed: None,
        }
    }
}

/// The whole match in one value
pub struct Simulation {
    config: SimulationConfig,
    state: GameState,
    grid: SpatialGrid,
    ai: AiDirector,
    rules: ModeRules,
    progression: LevelProgression,
    events: Vec<GameEvent>,
    audio: Box<dyn AudioHook>,
    persistence: Box<dyn PersistenceHook>,
    summary: Option<MatchSummary>,
    rng: StdRng,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut state = GameState::new(GameState::world_bounds(), &config.player_name);
        let mut ai = AiDirector::new();
        for i in 0..config.ai_count {
            let id = state.spawn_ai(&mut rng, i);
            ai.register(id, &mut rng);
        }
        for _ in 0..config.pickup_count {
            state.spawn_pickup(&mut rng);
        }
        for _ in 0..config.star_count {
            state.spawn_star(&mut rng);
        }
        for _ in 0..config.mine_count {
            state.spawn_mine(&mut rng);
        }

        let mut rules = ModeRules::new(config.mode, state.bounds);
        rules.prepare(&mut state, &mut rng);

        info!(
            mode = config.mode.name(),
            bots = config.ai_count,
            "match started"
        );

        Self {
            config,
            state,
            grid: SpatialGrid::default(),
            ai,
            rules,
            progression: LevelProgression::new(),
            events: Vec::with_capacity(64),
            audio: Box::new(NullAudio),
            persistence: Box::new(NullPersistence),
            summary: None,
            rng,
        }
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioHook>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_persistence(mut self, persistence: Box<dyn PersistenceHook>) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn rules(&self) -> &ModeRules {
        &self.rules
    }

    pub fn progression(&self) -> &LevelProgression {
        &self.progression
    }

    pub fn is_over(&self) -> bool {
        self.summary.is_some()
    }

    pub fn summary(&self) -> Option<&MatchSummary> {
        self.summary.as_ref()
    }

    /// Advance the match one tick. Returns the events it produced.
    pub fn tick(&mut self, input: &PlayerInput) -> &[GameEvent] {
        self.events.clear();
        if self.summary.is_some() {
            return &self.events;
        }

        self.state.tick += 1;

        if self.state.weather.update() {
            self.events.push(GameEvent::WeatherChanged {
                raining: self.state.weather.raining,
            });
        }

        let ctx = TickContext {
            tick: self.state.tick,
            traction: self.state.weather.traction(),
            ai_speed_mult: self.progression.ai_speed_multiplier(),
            threat_radius_cut: self.progression.threat_radius_reduction(),
        };

        // Bots decide, then drive
        let commands = self.ai.think(&self.state, &ctx, &mut self.rng);
        for cmd in commands {
            if let Some(v) = self.state.vehicles.get_mut(&cmd.id) {
                movement::update_ai(v, cmd.desired_angle, cmd.speed_mult, &ctx);
            }
        }

        // Player drives
        let player_id = self.state.player_id;
        if let Some(p) = self.state.vehicles.get_mut(&player_id) {
            if movement::update_player(p, input, &ctx) {
                self.events.push(GameEvent::Dash { vehicle: player_id });
            }
        }

        obstacle::update_mines(&mut self.state);
        obstacle::resolve_mine_hits(&mut self.state, &mut self.events);

        self.grid.rebuild(
            self.state
                .vehicles
                .values()
                .filter(|v| v.alive)
                .map(|v| SpatialEntity {
                    id: v.id,
                    position: v.position,
                    radius: v.radius(),
                }),
        );
        collision::resolve_vehicle_collisions(
            &mut self.state,
            &self.grid,
            &mut self.rules,
            &mut self.events,
        );

        // Clamp after every position write; shrunk mode bounds only gate
        // damage, the world edge is always hard
        let bounds = self.state.bounds;
        for v in self.state.vehicles.values_mut() {
            movement::constrain_to_world(v, &bounds);
        }

        pickup::collect_pickups(&mut self.state, &mut self.events);
        self.apply_player_captures();

        let outcome = self
            .rules
            .update(&mut self.state, &mut self.events, &mut self.rng);

        // Mass model and status timers close out the tick
        for v in self.state.vehicles.values_mut() {
            if v.update_mass_and_stats() {
                debug!(vehicle = %v.name, "mass starvation");
                self.events.push(GameEvent::Kill {
                    victim: v.id,
                    killer: None,
                });
            }
            v.update_status();
        }

        for id in self.state.compact_dead_ai() {
            self.ai.unregister(id);
        }
        self.maintain_bot_population();

        self.state.replace_consumed(&mut self.rng);

        self.check_match_end(outcome.map(MatchEndReason::from_outcome));
        self.dispatch_events();
        &self.events
    }

    /// Player power-up captures feed the difficulty ramp
    fn apply_player_captures(&mut self) {
        let player_id = self.state.player_id;
        let captures = self
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerupCollected { vehicle, .. } if *vehicle == player_id))
            .count();
        for _ in 0..captures {
            if self.progression.on_powerup_captured() {
                self.events.push(GameEvent::LevelUp {
                    level: self.progression.level,
                });
            }
        }
    }

    /// Keep the bot population at the level-scaled target
    fn maintain_bot_population(&mut self) {
        if !self.rules.allow_ai_respawn() {
            return;
        }
        let target = self.progression.ai_target_count(self.config.ai_count);
        let mut index = self.state.vehicles.len();
        while self.state.alive_ai_count() < target {
            let id = self.state.spawn_ai(&mut self.rng, index);
            self.ai.register(id, &mut self.rng);
            index += 1;
        }
    }

    fn check_match_end(&mut self, mode_reason: Option<MatchEndReason>) {
        let reason = if let Some(reason) = mode_reason {
            Some(reason)
        } else if self.state.player().map_or(true, |p| !p.alive) {
            Some(MatchEndReason::PlayerDestroyed)
        } else if self
            .config
            .max_ticks
            .is_some_and(|max| self.state.tick >= max)
        {
            Some(MatchEndReason::TickLimit)
        } else {
            None
        };

        if let Some(reason) = reason {
            let summary = MatchSummary::build(&self.state, reason);
            info!(
                reason = reason.describe(),
                ticks = summary.duration_ticks,
                score = summary.player_score,
                "match over"
            );
            self.persistence
                .on_match_end(&summary, self.config.mode.name());
            self.summary = Some(summary);
        }
    }

    fn dispatch_events(&mut self) {
        for event in &self.events {
            self.audio.on_event(event);
            self.persistence.on_event(event);
        }
    }
}
