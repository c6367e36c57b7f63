//! Player profile persistence
//!
//! Career stats survive across matches in a small JSON file. A missing file
//! is a fresh profile; a corrupt one is an error the caller can surface.
//! Save failures never interrupt play, they log and move on.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::game::constants::xp;
use crate::game::match_result::MatchSummary;
use crate::hooks::PersistenceHook;

const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One remembered score line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub score: u32,
    pub mode: String,
}

/// Career totals for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub level: u32,
    pub xp: u64,
    pub total_matches: u32,
    pub total_kills: u32,
    pub highest_mass: f32,
    pub best_score: u32,
    /// Best match scores, highest first, capped at ten
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_matches: 0,
            total_kills: 0,
            highest_mass: 0.0,
            best_score: 0,
            leaderboard: Vec::new(),
        }
    }
}

/// Total XP needed to sit at `level`
pub fn xp_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let n = (level - 1) as f64;
    (n * xp::LEVEL_BASE + n.powf(1.5) * xp::LEVEL_CURVE) as u64
}

impl PlayerProfile {
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no profile found, starting fresh");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Fold a finished match into the career totals.
    /// Returns the number of profile levels gained.
    pub fn record_match(&mut self, summary: &MatchSummary, mode_name: &str) -> u32 {
        self.total_matches += 1;
        self.total_kills += summary.player_kills;
        self.xp += summary.player_xp;
        if summary.player_final_mass > self.highest_mass {
            self.highest_mass = summary.player_final_mass;
        }
        if summary.player_score > self.best_score {
            self.best_score = summary.player_score;
        }

        self.leaderboard.push(LeaderboardEntry {
            score: summary.player_score,
            mode: mode_name.to_string(),
        });
        self.leaderboard.sort_by(|a, b| b.score.cmp(&a.score));
        self.leaderboard.truncate(LEADERBOARD_SIZE);

        let before = self.level;
        while self.xp >= xp_for_level(self.level + 1) {
            self.level += 1;
        }
        self.level - before
    }
}

/// [`PersistenceHook`] that writes the profile to disk at match end
pub struct ProfileStore {
    profile: PlayerProfile,
    path: PathBuf,
}

impl ProfileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        let path = path.into();
        let profile = PlayerProfile::load(&path)?;
        Ok(Self { profile, path })
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }
}

impl PersistenceHook for ProfileStore {
    fn on_match_end(&mut self, summary: &MatchSummary, mode_name: &str) {
        let gained = self.profile.record_match(summary, mode_name);
        if gained > 0 {
            info!(level = self.profile.level, "profile level up");
        }
        if let Err(e) = self.profile.save(&self.path) {
            warn!(error = %e, path = %self.path.display(), "failed to save profile");
        }
    }
}
