/// World and population constants
pub mod world {
    /// World width in units
    pub const WIDTH: f32 = 5000.0;
    /// World height in units
    pub const HEIGHT: f32 = 5000.0;
    /// Logical simulation rate in Hz (all durations below are tick counts)
    pub const TICK_RATE: u32 = 60;
    /// Default AI vehicle population
    pub const AI_COUNT: usize = 20;
    /// Default power-up population
    pub const POWERUP_COUNT: usize = 15;
    /// Default star population
    pub const STAR_COUNT: usize = 30;
    /// Default mine population
    pub const OBSTACLE_COUNT: usize = 15;
    /// Minimum distance from other vehicles when spawning
    pub const SAFE_SPAWN_DISTANCE: f32 = 150.0;
    /// Maximum attempts to find a safe spawn position
    pub const MAX_SPAWN_ATTEMPTS: u32 = 30;
}

/// Mass model constants - CRITICAL: mass is smoothed toward target_mass,
/// gameplay only ever writes target_mass
pub mod mass {
    /// Starting mass for every vehicle
    pub const STARTING: f32 = 100.0;
    /// Reference mass where most multipliers are 1.0
    pub const REFERENCE: f32 = 100.0;
    /// Above this target mass, passive decay applies each tick
    pub const SOFT_CAP: f32 = 200.0;
    /// Passive decay per tick, as a fraction of target mass
    pub const DECAY_RATE: f32 = 0.0002;
    /// Per-tick lerp factor from mass toward target mass
    pub const SMOOTHING: f32 = 0.05;
    /// Snap to target when the remaining difference is this small
    pub const SNAP_EPSILON: f32 = 0.5;
    /// Radius floor (a starved vehicle stays clickable-sized)
    pub const MIN_RADIUS: f32 = 5.0;
    /// radius = RADIUS_SCALE * sqrt(mass / REFERENCE)
    pub const RADIUS_SCALE: f32 = 20.0;
    /// max_health = HEALTH_BASE + HEALTH_SCALE * sqrt(mass / REFERENCE)
    pub const HEALTH_BASE: f32 = 50.0;
    pub const HEALTH_SCALE: f32 = 50.0;
    /// Damage multiplier gained per point of mass above REFERENCE
    pub const DAMAGE_MULT_RATE: f32 = 0.01;
    /// Push force gained (or lost) per point of mass away from REFERENCE
    pub const PUSH_FORCE_RATE: f32 = 0.015;
    /// Top speed never drops below this, no matter how heavy
    pub const MIN_SPEED: f32 = 7.5;
}

/// Drive-model constants (units per tick, radians per tick)
pub mod drive {
    /// Player base top speed at reference mass
    pub const PLAYER_BASE_SPEED: f32 = 12.0;
    /// Player acceleration per tick
    pub const PLAYER_ACCEL: f32 = 0.4;
    /// Player turn rate in radians per tick
    pub const PLAYER_TURN: f32 = 0.12;
    /// Speed retained per tick when the stick is centered
    pub const PLAYER_FRICTION: f32 = 0.96;
    /// Pointer offsets shorter than this are treated as "no input"
    pub const DEADZONE: f32 = 30.0;
    /// Lerp factor pulling speed back down when above the current cap
    pub const OVERSPEED_LERP: f32 = 0.1;
    /// Drift heading blend toward the steering heading, scaled by traction
    pub const DRIFT_BLEND: f32 = 0.2;

    /// AI base top speed at reference mass
    pub const AI_BASE_SPEED: f32 = 8.0;
    /// AI acceleration per tick
    pub const AI_ACCEL: f32 = 0.2;
    /// AI deceleration per tick when above target speed
    pub const AI_DECEL: f32 = 0.1;
    /// AI turn rate in radians per tick
    pub const AI_TURN: f32 = 0.04;
}

/// Dash constants (player only)
pub mod dash {
    /// Dash burst duration in ticks
    pub const DURATION: u32 = 25;
    /// Cooldown in ticks before the next dash
    pub const COOLDOWN: u32 = 180;
    /// Speed impulse: max(max_speed, speed) * IMPULSE
    pub const IMPULSE: f32 = 2.0;
    /// Target speed multiplier while the dash is active
    pub const TARGET_SPEED_MULT: f32 = 1.5;
}

/// Status effect constants
pub mod status {
    /// Duration of every power-up effect in ticks
    pub const DURATION: u32 = 300;
    /// Power effect multiplies outgoing damage by this
    pub const POWER_DAMAGE_MULT: f32 = 3.0;
    /// Health regenerated per tick while healing
    pub const HEAL_RATE: f32 = 0.166;
    /// Heavier vehicles heal faster
    pub const HEAL_HEAVY_MULT: f32 = 1.5;
    pub const HEAL_HEAVY_MASS: f32 = 100.0;
    /// Speed effect multipliers
    pub const SPEED_MULT: f32 = 1.6;
    pub const SPEED_ACCEL_MULT: f32 = 1.3;
    /// Infected vehicles move faster
    pub const INFECTED_SPEED_MULT: f32 = 1.5;
}

/// Vehicle-vs-vehicle combat constants
pub mod combat {
    /// Base contact damage before mass ratio and multipliers
    pub const BASE_DAMAGE: f32 = 10.0;
    /// Knockback applied to the lighter party, scaled by the other's push force
    pub const KNOCKBACK_SCALE: f32 = 0.5;
}

/// Kill streak constants
pub mod streak {
    /// Ticks without a kill before the streak resets
    pub const TIMEOUT: u32 = 300;
    /// Streak length that awards a free shield
    pub const SHIELD_AT: u32 = 3;
    pub const SHIELD_DURATION: u32 = 180;
    /// Streak length that awards double XP
    pub const DOUBLE_XP_AT: u32 = 5;
    pub const DOUBLE_XP_DURATION: u32 = 600;
    /// Streak length that triggers a shockwave against nearby mines
    pub const SHOCKWAVE_AT: u32 = 10;
    pub const SHOCKWAVE_RADIUS: f32 = 400.0;
    pub const SHOCKWAVE_PUSH: f32 = 50.0;
}

/// AI behavior constants
pub mod ai {
    /// Seek a heal pickup below this health fraction
    pub const HEAL_SEEK_HEALTH_FRAC: f32 = 0.4;
    pub const HEAL_SEEK_SPEED: f32 = 1.1;
    /// Threat detection radius (scouts see further)
    pub const THREAT_RADIUS: f32 = 400.0;
    pub const SCOUT_THREAT_RADIUS: f32 = 600.0;
    /// Hunt when own mass exceeds the threat's by this ratio
    pub const HUNT_MASS_RATIO: f32 = 1.3;
    pub const HUNT_SPEED: f32 = 1.25;
    pub const AVOID_SPEED: f32 = 1.2;
    /// Idle wander
    pub const WANDER_SPEED: f32 = 0.7;
    pub const WANDER_INTERVAL: u32 = 60;
    /// Pickup scoring weights (lower score wins)
    pub const SHIELD_WEIGHT: f32 = 0.5;
    pub const SHIELD_HEALTH_FRAC: f32 = 0.7;
    pub const POWER_WEIGHT: f32 = 0.3;
    pub const STAR_WEIGHT: f32 = 0.8;
    pub const SCOUT_STAR_WEIGHT: f32 = 0.4;
}

/// Pickup constants
pub mod pickup {
    /// Power-up capture radius
    pub const POWERUP_RADIUS: f32 = 40.0;
    /// Star capture radius
    pub const STAR_RADIUS: f32 = 30.0;
    /// Star rewards
    pub const STAR_MASS: f32 = 25.0;
    pub const STAR_HEAL: f32 = 10.0;
    pub const STAR_SCORE: u32 = 10;
}

/// Mine (roaming obstacle) constants
pub mod obstacle {
    pub const MIN_RADIUS: f32 = 30.0;
    pub const MAX_RADIUS: f32 = 60.0;
    /// Wander speed range in units per tick
    pub const WANDER_SPEED_MIN: f32 = 1.0;
    pub const WANDER_SPEED_MAX: f32 = 3.0;
    /// Start chasing vehicles inside this radius
    pub const DETECTION_RADIUS: f32 = 300.0;
    pub const CHASE_SPEED: f32 = 4.0;
    pub const CHASE_DURATION: u32 = 180;
    /// Ticks a mine stays stunned after being deflected
    pub const STUN_DURATION: u32 = 60;
    /// Contact with an unprotected vehicle
    pub const HIT_DAMAGE: f32 = 20.0;
    pub const HIT_MASS_LOSS: f32 = 40.0;
    pub const HIT_PUSH: f32 = 5.0;
    /// Speed factor on hit (negative: the vehicle bounces backward)
    pub const HIT_SPEED_FACTOR: f32 = -0.5;
    /// Knockback applied to the mine when deflected by shield / dash
    pub const DEFLECT_PUSH: f32 = 15.0;
    pub const DASH_DEFLECT_PUSH: f32 = 30.0;
}

/// Weather constants
pub mod weather {
    /// Ticks between clear/rain transitions
    pub const CYCLE_TICKS: u32 = 1800;
    /// Traction multiplier while raining
    pub const RAIN_TRACTION: f32 = 0.7;
}

/// Game-mode constants
pub mod modes {
    /// Elimination: bounds shrink by this factor at each interval
    pub const ELIMINATION_SHRINK_INTERVAL: u32 = 1800;
    pub const ELIMINATION_SHRINK_FACTOR: f32 = 0.8;
    /// Damage applied to out-of-bounds vehicles, every interval ticks
    pub const ELIMINATION_ZONE_DAMAGE: f32 = 5.0;
    pub const ELIMINATION_DAMAGE_INTERVAL: u32 = 15;

    /// King of the hill
    pub const HILL_RADIUS: f32 = 400.0;
    pub const HILL_SCORE_PER_TICK: u32 = 2;
    pub const HILL_CONTEST_DAMAGE: f32 = 0.2;
    pub const HILL_WIN_SCORE: u32 = 1500;
    /// Hill drift toward its waypoint, units per tick
    pub const HILL_DRIFT_SPEED: f32 = 0.5;

    /// Team deathmatch kill target
    pub const TDM_KILL_TARGET: u32 = 20;
}

/// Level progression constants
pub mod progression {
    /// Power-up captures per level
    pub const CAPTURES_PER_LEVEL: u32 = 5;
    /// AI speed multiplier gained per level
    pub const SPEED_MULT_PER_LEVEL: f32 = 1.10;
    /// AI threat radius shrinks by this much per level (bolder bots)
    pub const THREAT_RADIUS_PER_LEVEL: f32 = 10.0;
    /// Extra AI spawned per level
    pub const AI_PER_LEVEL: usize = 3;
}

/// Profile XP constants
pub mod xp {
    /// XP awarded per kill
    pub const PER_KILL: u64 = 200;
    /// Level curve: (lvl-1) * LEVEL_BASE + (lvl-1)^1.5 * LEVEL_CURVE
    pub const LEVEL_BASE: f64 = 1000.0;
    pub const LEVEL_CURVE: f64 = 500.0;
}
