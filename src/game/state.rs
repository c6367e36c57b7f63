//! Game state definitions and structures
//!
//! Contains all entities (vehicles, pickups, stars, mines) and world state.

// Allow dead_code for utility methods that are part of the public API
#![allow(dead_code)]

use hashbrown::HashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::constants::{drive, mass, status, streak, weather, world, xp};
use crate::game::stats::{self, DerivedStats};
use crate::util::vec2::Vec2;

/// Unique vehicle identifier
pub type VehicleId = Uuid;

/// Entity identifier for non-vehicle entities
pub type EntityId = u64;

/// Axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamp a point into the rectangle
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Same rectangle scaled around its center
    pub fn scaled(&self, factor: f32) -> Self {
        let center = self.center();
        let half = Vec2::new(self.width() * 0.5 * factor, self.height() * 0.5 * factor);
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Team assignment for team-based modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn index(self) -> usize {
        match self {
            Team::Red => 0,
            Team::Blue => 1,
        }
    }
}

/// What steers a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSource {
    Player,
    Ai,
}

/// Power-up flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Heal,
    Shield,
    Speed,
    Power,
}

impl PickupKind {
    /// Uniform random flavor (all four are equally likely)
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..4) {
            0 => PickupKind::Heal,
            1 => PickupKind::Shield,
            2 => PickupKind::Speed,
            _ => PickupKind::Power,
        }
    }
}

/// A power-up waiting on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub position: Vec2,
    pub kind: PickupKind,
    /// Marked during capture, compacted at end of tick
    pub consumed: bool,
}

/// A growth star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: EntityId,
    pub position: Vec2,
    pub consumed: bool,
}

/// Mine behavior phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinePhase {
    Wandering,
    Chasing { remaining: u32 },
    Stunned { remaining: u32 },
}

/// A roaming mine that chases nearby vehicles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub phase: MinePhase,
}

impl Mine {
    pub fn is_stunned(&self) -> bool {
        matches!(self.phase, MinePhase::Stunned { .. })
    }
}

/// Active status effect timers, in ticks.
/// Applying any power-up clears the others first; they never stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub heal_ticks: u32,
    pub shield_ticks: u32,
    pub speed_ticks: u32,
    pub power_ticks: u32,
}

impl StatusEffects {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&mut self, kind: PickupKind) {
        self.clear();
        match kind {
            PickupKind::Heal => self.heal_ticks = status::DURATION,
            PickupKind::Shield => self.shield_ticks = status::DURATION,
            PickupKind::Speed => self.speed_ticks = status::DURATION,
            PickupKind::Power => self.power_ticks = status::DURATION,
        }
    }

    pub fn tick(&mut self) {
        self.heal_ticks = self.heal_ticks.saturating_sub(1);
        self.shield_ticks = self.shield_ticks.saturating_sub(1);
        self.speed_ticks = self.speed_ticks.saturating_sub(1);
        self.power_ticks = self.power_ticks.saturating_sub(1);
    }

    pub fn shield_active(&self) -> bool {
        self.shield_ticks > 0
    }
}

/// Dash burst state (players only; AI vehicles never dash)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashState {
    /// Remaining burst ticks (> 0 means dashing and collision-immune)
    pub active_ticks: u32,
    /// Remaining cooldown ticks before the next dash
    pub cooldown_ticks: u32,
}

impl DashState {
    pub fn is_dashing(&self) -> bool {
        self.active_ticks > 0
    }

    pub fn can_dash(&self) -> bool {
        self.active_ticks == 0 && self.cooldown_ticks == 0
    }

    pub fn tick(&mut self) {
        self.active_ticks = self.active_ticks.saturating_sub(1);
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
    }
}

/// Kill streak reward tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakReward {
    Shield,
    DoubleXp,
    Shockwave,
}

/// Vehicle state
///
/// OPTIMIZATION: Fields are ordered for cache efficiency during the tick.
/// Hot fields (touched by movement and collision every tick) come first,
/// warm fields (scoring, effects) next, cold fields (identity) last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    // === HOT FIELDS (movement and collision, every tick) ===
    /// Position in world space
    pub position: Vec2,
    /// Steering heading in radians
    pub heading: f32,
    /// Actual travel heading; lags behind `heading` while drifting
    pub drift_heading: f32,
    /// Scalar speed along the drift heading, units per tick
    pub speed: f32,
    /// Speed the drive is accelerating toward
    pub target_speed: f32,
    /// Smoothed mass (authoritative for all derived stats)
    pub mass: f32,
    /// Mass the smoothing converges toward; gameplay writes this
    pub target_mass: f32,
    /// Current health, clamped to stats.max_health
    pub health: f32,
    pub alive: bool,
    /// Stats recomputed from mass at the end of every tick
    pub stats: DerivedStats,

    // === WARM FIELDS (effects and scoring) ===
    pub status: StatusEffects,
    pub dash: DashState,
    /// Infection-mode flag (carries a permanent speed bonus)
    pub infected: bool,
    pub kills: u32,
    pub score: u32,
    /// Consecutive kills without the streak timing out
    pub kill_streak: u32,
    /// Ticks since the last kill (resets the streak past the timeout)
    pub streak_age: u32,
    /// Remaining double-XP ticks from the streak reward
    pub double_xp_ticks: u32,
    /// Experience earned this match (kills pay out here)
    pub match_xp: u64,
    pub team: Option<Team>,

    // === COLD FIELDS ===
    pub control: ControlSource,
    pub id: VehicleId,
    pub name: String,
}

impl Vehicle {
    pub fn new(id: VehicleId, name: String, control: ControlSource, position: Vec2) -> Self {
        let base_speed = match control {
            ControlSource::Player => drive::PLAYER_BASE_SPEED,
            ControlSource::Ai => drive::AI_BASE_SPEED,
        };
        let stats = DerivedStats::for_mass(mass::STARTING, base_speed);
        Self {
            position,
            heading: 0.0,
            drift_heading: 0.0,
            speed: 0.0,
            target_speed: 0.0,
            mass: mass::STARTING,
            target_mass: mass::STARTING,
            health: stats.max_health,
            alive: true,
            stats,
            status: StatusEffects::default(),
            dash: DashState::default(),
            infected: false,
            kills: 0,
            score: 0,
            kill_streak: 0,
            streak_age: 0,
            double_xp_ticks: 0,
            match_xp: 0,
            team: None,
            control,
            id,
            name,
        }
    }

    pub fn new_player(name: String, position: Vec2) -> Self {
        Self::new(Uuid::new_v4(), name, ControlSource::Player, position)
    }

    pub fn new_ai(name: String, position: Vec2) -> Self {
        Self::new(Uuid::new_v4(), name, ControlSource::Ai, position)
    }

    pub fn is_player(&self) -> bool {
        self.control == ControlSource::Player
    }

    pub fn radius(&self) -> f32 {
        self.stats.radius
    }

    pub fn base_max_speed(&self) -> f32 {
        match self.control {
            ControlSource::Player => drive::PLAYER_BASE_SPEED,
            ControlSource::Ai => drive::AI_BASE_SPEED,
        }
    }

    /// Top speed after status and infection multipliers
    pub fn effective_max_speed(&self) -> f32 {
        let mut v = self.stats.max_speed;
        if self.status.speed_ticks > 0 {
            v *= status::SPEED_MULT;
        }
        if self.infected {
            v *= status::INFECTED_SPEED_MULT;
        }
        v
    }

    /// Acceleration multiplier after status effects
    pub fn effective_accel_mult(&self) -> f32 {
        let mut a = self.stats.accel_mult;
        if self.status.speed_ticks > 0 {
            a *= status::SPEED_ACCEL_MULT;
        }
        a
    }

    /// Outgoing damage multiplier after status effects
    pub fn damage_mult(&self) -> f32 {
        if self.status.power_ticks > 0 {
            self.stats.base_damage_mult * status::POWER_DAMAGE_MULT
        } else {
            self.stats.base_damage_mult
        }
    }

    /// Shield or active dash blocks all incoming contact damage
    pub fn is_damage_immune(&self) -> bool {
        self.status.shield_active() || self.dash.is_dashing()
    }

    pub fn health_fraction(&self) -> f32 {
        if self.stats.max_health > 0.0 {
            self.health / self.stats.max_health
        } else {
            0.0
        }
    }

    pub fn apply_powerup(&mut self, kind: PickupKind) {
        self.status.apply(kind);
    }

    /// Apply raw damage. Returns true if this killed the vehicle.
    /// Callers are responsible for immunity and team checks.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
            return true;
        }
        false
    }

    /// Record a kill: XP, streak bookkeeping, reward tier detection
    pub fn record_kill(&mut self) -> Option<StreakReward> {
        self.kills += 1;
        self.kill_streak += 1;
        self.streak_age = 0;
        self.match_xp += if self.double_xp_ticks > 0 {
            xp::PER_KILL * 2
        } else {
            xp::PER_KILL
        };
        match self.kill_streak {
            n if n == streak::SHIELD_AT => {
                self.status.shield_ticks = self.status.shield_ticks.max(streak::SHIELD_DURATION);
                Some(StreakReward::Shield)
            }
            n if n == streak::DOUBLE_XP_AT => {
                self.double_xp_ticks = streak::DOUBLE_XP_DURATION;
                Some(StreakReward::DoubleXp)
            }
            n if n == streak::SHOCKWAVE_AT => Some(StreakReward::Shockwave),
            _ => None,
        }
    }

    /// Mass model step: decay, smoothing, derived stats, death pinning.
    /// Returns true if the vehicle died of mass starvation this tick.
    pub fn update_mass_and_stats(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.target_mass = stats::decay_target_mass(self.target_mass.max(0.0));
        self.mass = stats::smooth_mass(self.mass, self.target_mass).max(0.0);
        if self.mass <= 0.0 {
            self.mass = 0.0;
            self.target_mass = 0.0;
            self.health = 0.0;
            self.alive = false;
            return true;
        }
        self.stats = DerivedStats::for_mass(self.mass, self.base_max_speed());
        self.health = self.health.min(self.stats.max_health);
        false
    }

    /// Status timers, heal regen and streak aging, once per tick
    pub fn update_status(&mut self) {
        if !self.alive {
            return;
        }
        if self.status.heal_ticks > 0 {
            let rate = if self.mass > status::HEAL_HEAVY_MASS {
                status::HEAL_RATE * status::HEAL_HEAVY_MULT
            } else {
                status::HEAL_RATE
            };
            self.health = (self.health + rate).min(self.stats.max_health);
        }
        self.status.tick();
        self.dash.tick();
        self.double_xp_ticks = self.double_xp_ticks.saturating_sub(1);
        if self.kill_streak > 0 {
            self.streak_age += 1;
            if self.streak_age > streak::TIMEOUT {
                self.kill_streak = 0;
                self.streak_age = 0;
            }
        }
    }
}

/// Weather cycle: clear and rain alternate on a fixed cadence
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weather {
    pub raining: bool,
    pub ticks_until_flip: u32,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            raining: false,
            ticks_until_flip: weather::CYCLE_TICKS,
        }
    }
}

impl Weather {
    /// Advance one tick. Returns true when the weather just flipped.
    pub fn update(&mut self) -> bool {
        if self.ticks_until_flip == 0 {
            self.raining = !self.raining;
            self.ticks_until_flip = weather::CYCLE_TICKS;
            return true;
        }
        self.ticks_until_flip -= 1;
        false
    }

    pub fn traction(&self) -> f32 {
        if self.raining {
            weather::RAIN_TRACTION
        } else {
            1.0
        }
    }
}

/// Full simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tick: u64,
    pub bounds: Rect,
    pub vehicles: HashMap<VehicleId, Vehicle>,
    pub player_id: VehicleId,
    pub pickups: Vec<Pickup>,
    pub stars: Vec<Star>,
    pub mines: Vec<Mine>,
    pub weather: Weather,
    next_entity_id: EntityId,
}

impl GameState {
    pub fn new(bounds: Rect, player_name: &str) -> Self {
        let player = Vehicle::new_player(player_name.to_string(), bounds.center());
        let player_id = player.id;
        let mut vehicles = HashMap::new();
        vehicles.insert(player_id, player);
        Self {
            tick: 0,
            bounds,
            vehicles,
            player_id,
            pickups: Vec::new(),
            stars: Vec::new(),
            mines: Vec::new(),
            weather: Weather::default(),
            next_entity_id: 0,
        }
    }

    pub fn world_bounds() -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(world::WIDTH, world::HEIGHT))
    }

    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    pub fn player(&self) -> Option<&Vehicle> {
        self.vehicles.get(&self.player_id)
    }

    pub fn player_mut(&mut self) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(&self.player_id)
    }

    pub fn get_vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn alive_count(&self) -> usize {
        self.vehicles.values().filter(|v| v.alive).count()
    }

    pub fn alive_ai_count(&self) -> usize {
        self.vehicles
            .values()
            .filter(|v| v.alive && !v.is_player())
            .count()
    }

    pub fn random_position(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.gen_range(self.bounds.min.x..self.bounds.max.x),
            rng.gen_range(self.bounds.min.y..self.bounds.max.y),
        )
    }

    /// Random position at least SAFE_SPAWN_DISTANCE away from every living
    /// vehicle; falls back to an unchecked position after MAX_SPAWN_ATTEMPTS
    pub fn safe_spawn_position(&self, rng: &mut impl Rng) -> Vec2 {
        for _ in 0..world::MAX_SPAWN_ATTEMPTS {
            let candidate = self.random_position(rng);
            let clear = self.vehicles.values().filter(|v| v.alive).all(|v| {
                v.position.distance_sq_to(candidate)
                    > world::SAFE_SPAWN_DISTANCE * world::SAFE_SPAWN_DISTANCE
            });
            if clear {
                return candidate;
            }
        }
        self.random_position(rng)
    }

    pub fn spawn_pickup(&mut self, rng: &mut impl Rng) {
        let id = self.next_entity_id();
        let position = self.random_position(rng);
        let kind = PickupKind::random(rng);
        self.pickups.push(Pickup {
            id,
            position,
            kind,
            consumed: false,
        });
    }

    pub fn spawn_star(&mut self, rng: &mut impl Rng) {
        let id = self.next_entity_id();
        let position = self.random_position(rng);
        self.stars.push(Star {
            id,
            position,
            consumed: false,
        });
    }

    pub fn spawn_mine(&mut self, rng: &mut impl Rng) {
        use crate::game::constants::obstacle;
        let id = self.next_entity_id();
        let position = self.random_position(rng);
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(obstacle::WANDER_SPEED_MIN..obstacle::WANDER_SPEED_MAX);
        self.mines.push(Mine {
            id,
            position,
            velocity: Vec2::from_angle(angle) * speed,
            radius: rng.gen_range(obstacle::MIN_RADIUS..obstacle::MAX_RADIUS),
            phase: MinePhase::Wandering,
        });
    }

    pub fn spawn_ai(&mut self, rng: &mut impl Rng, index: usize) -> VehicleId {
        let position = self.safe_spawn_position(rng);
        let bot = Vehicle::new_ai(ai_name(rng, index), position);
        let id = bot.id;
        self.vehicles.insert(id, bot);
        id
    }

    /// Remove dead AI vehicles; the player stays for post-mortem reporting.
    /// Returns the removed ids so dependent systems can drop their state.
    pub fn compact_dead_ai(&mut self) -> Vec<VehicleId> {
        let dead: Vec<VehicleId> = self
            .vehicles
            .values()
            .filter(|v| !v.alive && !v.is_player())
            .map(|v| v.id)
            .collect();
        for id in &dead {
            self.vehicles.remove(id);
        }
        dead
    }

    /// Compact consumed pickups/stars and respawn replacements elsewhere
    pub fn replace_consumed(&mut self, rng: &mut impl Rng) {
        let consumed_pickups = self.pickups.iter().filter(|p| p.consumed).count();
        self.pickups.retain(|p| !p.consumed);
        for _ in 0..consumed_pickups {
            self.spawn_pickup(rng);
        }

        let consumed_stars = self.stars.iter().filter(|s| s.consumed).count();
        self.stars.retain(|s| !s.consumed);
        for _ in 0..consumed_stars {
            self.spawn_star(rng);
        }
    }
}

/// Bot display names
pub fn ai_name(rng: &mut impl Rng, index: usize) -> String {
    const PREFIXES: [&str; 8] = [
        "Rusty", "Turbo", "Crash", "Nitro", "Diesel", "Piston", "Axle", "Torque",
    ];
    format!("{}-{}", PREFIXES[rng.gen_range(0..PREFIXES.len())], index)
}
