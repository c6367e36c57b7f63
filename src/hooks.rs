//! Outward-facing seams
//!
//! The core publishes fire-and-forget [`GameEvent`]s once per tick. Hook
//! implementations must never fail the simulation; anything that can error
//! (disk, audio device) logs and moves on.

use crate::game::match_result::MatchSummary;
use crate::game::state::{PickupKind, StreakReward, Team, VehicleId};
use crate::util::vec2::Vec2;

/// Something observable happened this tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Two vehicles traded paint (also fired for immune contacts)
    VehicleContact {
        a: VehicleId,
        b: VehicleId,
        position: Vec2,
    },
    /// A vehicle died; `killer` is None for environmental deaths
    Kill {
        victim: VehicleId,
        killer: Option<VehicleId>,
    },
    PowerupCollected {
        vehicle: VehicleId,
        kind: PickupKind,
    },
    StarCollected {
        vehicle: VehicleId,
    },
    Dash {
        vehicle: VehicleId,
    },
    MineHit {
        vehicle: VehicleId,
        deflected: bool,
    },
    StreakReward {
        vehicle: VehicleId,
        reward: StreakReward,
    },
    LevelUp {
        level: u32,
    },
    Infected {
        vehicle: VehicleId,
    },
    WeatherChanged {
        raining: bool,
    },
    TeamScored {
        team: Team,
        kills: u32,
    },
}

/// Audio cue seam. The sim has no audio device; a frontend can subscribe.
pub trait AudioHook {
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Persistence seam for profile-style bookkeeping
pub trait PersistenceHook {
    fn on_event(&mut self, _event: &GameEvent) {}
    /// Called once when the match ends with the final report
    fn on_match_end(&mut self, _summary: &MatchSummary, _mode_name: &str) {}
}

/// Default no-op audio sink
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioHook for NullAudio {}

/// Default no-op persistence sink
#[derive(Debug, Default)]
pub struct NullPersistence;

impl PersistenceHook for NullPersistence {}
