use thiserror::Error;

use crate::game::constants::world;
use crate::game::modes::GameMode;

/// Configuration errors surfaced by [`GameConfig::validate`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("player name cannot be empty")]
    EmptyPlayerName,
    #[error("ai_count must be 1-500, got {0}")]
    BadAiCount(usize),
    #[error("entity count must be 1-1000, got {0}")]
    BadEntityCount(usize),
}

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Game mode for the match
    pub mode: GameMode,
    /// Display name for the player vehicle
    pub player_name: String,
    /// Bots on the field at level 1
    pub ai_count: usize,
    /// Power-ups kept on the field
    pub pickup_count: usize,
    /// Growth stars kept on the field
    pub star_count: usize,
    /// Roaming mines
    pub mine_count: usize,
    /// Hard tick cap for headless runs (None runs to an objective)
    pub max_ticks: Option<u64>,
    /// Fixed RNG seed (None seeds from the OS)
    pub seed: Option<u64>,
    /// Where the player profile is persisted
    pub profile_path: String,
}

impl Default for GameConfig {
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
            profile_path: "profile.json".to_string(),
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(mode) = std::env::var("DERBY_MODE") {
            if let Some(parsed) = GameMode::parse(&mode) {
                config.mode = parsed;
            } else {
                tracing::warn!("Invalid DERBY_MODE '{}', using classic", mode);
            }
        }

        if let Ok(name) = std::env::var("DERBY_PLAYER_NAME") {
            if !name.trim().is_empty() {
                config.player_name = name;
            } else {
                tracing::warn!("DERBY_PLAYER_NAME is empty, using default");
            }
        }

        if let Ok(count) = std::env::var("DERBY_AI_COUNT") {
            if let Ok(parsed) = count.parse::<usize>() {
                if parsed > 0 && parsed <= 500 {
                    config.ai_count = parsed;
                } else {
                    tracing::warn!("DERBY_AI_COUNT must be 1-500, using default");
                }
            } else {
                tracing::warn!("Invalid DERBY_AI_COUNT '{}', using default", count);
            }
        }

        if let Ok(ticks) = std::env::var("DERBY_MAX_TICKS") {
            if let Ok(parsed) = ticks.parse::<u64>() {
                config.max_ticks = Some(parsed);
            } else {
                tracing::warn!("Invalid DERBY_MAX_TICKS '{}', ignoring", ticks);
            }
        }

        if let Ok(seed) = std::env::var("DERBY_SEED") {
            if let Ok(parsed) = seed.parse::<u64>() {
                config.seed = Some(parsed);
            } else {
                tracing::warn!("Invalid DERBY_SEED '{}', ignoring", seed);
            }
        }

        if let Ok(path) = std::env::var("DERBY_PROFILE_PATH") {
            config.profile_path = path;
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_name.trim().is_empty() {
            return Err(ConfigError::EmptyPlayerName);
        }
        if self.ai_count == 0 || self.ai_count > 500 {
            return Err(ConfigError::BadAiCount(self.ai_count));
        }
        for count in [self.pickup_count, self.star_count, self.mine_count] {
            if count == 0 || count > 1000 {
                return Err(ConfigError::BadEntityCount(count));
            }
        }
        Ok(())
    }
}
