//! Session difficulty ramp
//!
//! The player's power-up captures drive a level counter. Each level makes
//! the bots faster, more alert and more numerous.

use tracing::info;

use crate::game::constants::progression;

/// Per-match level state
#[derive(Debug, Clone)]
pub struct LevelProgression {
    pub level: u32,
    pub captures_this_level: u32,
    pub total_captures: u32,
}

impl Default for LevelProgression {
    fn default() -> Self {
        Self {
            level: 1,
            captures_this_level: 0,
            total_captures: 0,
        }
    }
}

impl LevelProgression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a player capture. Returns true when it tipped a level-up.
    pub fn on_powerup_captured(&mut self) -> bool {
        self.total_captures += 1;
        self.captures_this_level += 1;
        if self.captures_this_level >= progression::CAPTURES_PER_LEVEL {
            self.captures_this_level = 0;
            self.level += 1;
            info!(level = self.level, "difficulty level up");
            return true;
        }
        false
    }

    /// Bot top-speed multiplier for the current level
    pub fn ai_speed_multiplier(&self) -> f32 {
        progression::SPEED_MULT_PER_LEVEL.powi(self.level as i32 - 1)
    }

    /// World units shaved off every bot's threat radius
    pub fn threat_radius_reduction(&self) -> f32 {
        (self.level - 1) as f32 * progression::THREAT_RADIUS_PER_LEVEL
    }

    /// How many bots the field should hold at this level
    pub fn ai_target_count(&self, base: usize) -> usize {
        base + (self.level as usize - 1) * progression::AI_PER_LEVEL
    }
}
