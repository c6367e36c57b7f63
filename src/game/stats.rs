//! Mass-driven stat scaling
//!
//! Everything a vehicle can do derives from its smoothed mass: heavier
//! vehicles hit harder and shove further but turn, accelerate and cruise
//! slower. Gameplay never writes these fields directly; it writes
//! `target_mass` and the per-tick recompute does the rest.

use serde::{Deserialize, Serialize};

use crate::game::constants::mass;

/// Stats derived from mass, recomputed once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Collision radius
    pub radius: f32,
    /// Health ceiling (current health is clamped to this)
    pub max_health: f32,
    /// Outgoing damage multiplier before status effects
    pub base_damage_mult: f32,
    /// How hard this vehicle shoves others on contact
    pub push_force: f32,
    /// Acceleration multiplier (weight tax)
    pub accel_mult: f32,
    /// Turn rate multiplier (weight tax)
    pub turn_mult: f32,
    /// Top speed in units per tick
    pub max_speed: f32,
}

impl DerivedStats {
    /// Derive the full stat block for a mass value.
    ///
    /// `base_max_speed` differs per drive (player vs AI); everything else
    /// scales identically. Pure and idempotent for a given input.
    pub fn for_mass(m: f32, base_max_speed: f32) -> Self {
        let m = m.max(0.0);
        let norm = (m / mass::REFERENCE).sqrt();
        Self {
            radius: (mass::RADIUS_SCALE * norm).max(mass::MIN_RADIUS),
            max_health: mass::HEALTH_BASE + mass::HEALTH_SCALE * norm,
            base_damage_mult: 1.0 + ((m - mass::REFERENCE) * mass::DAMAGE_MULT_RATE).max(0.0),
            push_force: 1.0 + (m - mass::REFERENCE) * mass::PUSH_FORCE_RATE,
            accel_mult: 200.0 / (100.0 + m),
            turn_mult: 250.0 / (150.0 + m),
            max_speed: (base_max_speed * 300.0 / (200.0 + m)).max(mass::MIN_SPEED),
        }
    }
}

/// Passive decay above the soft cap, applied to target mass once per tick
#[inline]
pub fn decay_target_mass(target: f32) -> f32 {
    if target > mass::SOFT_CAP {
        target - target * mass::DECAY_RATE
    } else {
        target
    }
}

/// One smoothing step of mass toward target mass: exponential approach
/// with a snap once the remaining gap is negligible
#[inline]
pub fn smooth_mass(current: f32, target: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= mass::SNAP_EPSILON {
        target
    } else {
        current + diff * mass::SMOOTHING
    }
}
