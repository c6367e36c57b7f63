//! End-of-match summary
//!
//! Built once when the loop decides the match is over. Rankings cover every
//! vehicle still in the roster (the dead player included), ordered by score
//! with mass as the tie-breaker.

use serde::{Deserialize, Serialize};

use crate::game::modes::ModeOutcome;
use crate::game::state::{GameState, Team};

/// Why the match ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchEndReason {
    PlayerDestroyed,
    TeamVictory(Team),
    HillCaptured,
    InfectionComplete,
    TickLimit,
}

impl MatchEndReason {
    pub fn from_outcome(outcome: ModeOutcome) -> Self {
        match outcome {
            ModeOutcome::TeamVictory(team) => MatchEndReason::TeamVictory(team),
            ModeOutcome::HillWinner(_) => MatchEndReason::HillCaptured,
            ModeOutcome::InfectionComplete => MatchEndReason::InfectionComplete,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            MatchEndReason::PlayerDestroyed => "player destroyed",
            MatchEndReason::TeamVictory(Team::Red) => "red team victory",
            MatchEndReason::TeamVictory(Team::Blue) => "blue team victory",
            MatchEndReason::HillCaptured => "hill captured",
            MatchEndReason::InfectionComplete => "infection complete",
            MatchEndReason::TickLimit => "tick limit reached",
        }
    }
}

/// One vehicle's final line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRanking {
    pub place: usize,
    pub name: String,
    pub score: u32,
    pub kills: u32,
    pub mass: f32,
    pub is_player: bool,
}

/// Final report for a finished match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub reason: MatchEndReason,
    pub duration_ticks: u64,
    pub rankings: Vec<VehicleRanking>,
    pub player_score: u32,
    pub player_kills: u32,
    pub player_final_mass: f32,
    pub player_xp: u64,
}

impl MatchSummary {
    pub fn build(state: &GameState, reason: MatchEndReason) -> Self {
        let mut rankings: Vec<VehicleRanking> = state
            .vehicles
            .values()
            .map(|v| VehicleRanking {
                place: 0,
                name: v.name.clone(),
                score: v.score,
                kills: v.kills,
                mass: v.mass,
                is_player: v.is_player(),
            })
            .collect();
        rankings.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.mass.total_cmp(&a.mass))
        });
        for (i, r) in rankings.iter_mut().enumerate() {
            r.place = i + 1;
        }

        let player = state.player();
        Self {
            reason,
            duration_ticks: state.tick,
            player_score: player.map_or(0, |p| p.score),
            player_kills: player.map_or(0, |p| p.kills),
            player_final_mass: player.map_or(0.0, |p| p.mass),
            player_xp: player.map_or(0, |p| p.match_xp),
            rankings,
        }
    }

    pub fn player_place(&self) -> Option<usize> {
        self.rankings.iter().find(|r| r.is_player).map(|r| r.place)
    }
}
