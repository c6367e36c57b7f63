//! State sync scaffolding
//!
//! The simulation is single-machine today; this module keeps the snapshot
//! wire format and a stub channel so a future transport can slot in without
//! touching the game code. Snapshots use the same bincode configuration as
//! the save-state tests.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::state::{GameState, VehicleId};
use crate::util::vec2::Vec2;

/// Compact per-vehicle line for a state broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub position: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub mass: f32,
    pub health: f32,
    pub alive: bool,
}

/// One tick's worth of broadcast state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub tick: u64,
    pub vehicles: Vec<VehicleSnapshot>,
}

impl StateSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            tick: state.tick,
            vehicles: state
                .vehicles
                .values()
                .map(|v| VehicleSnapshot {
                    id: v.id,
                    position: v.position,
                    heading: v.heading,
                    speed: v.speed,
                    mass: v.mass,
                    health: v.health,
                    alive: v.alive,
                })
                .collect(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let (snapshot, _) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(snapshot)
    }
}

/// Placeholder transport. Holds the most recent snapshot and drops it;
/// nothing is sent anywhere.
#[derive(Debug, Default)]
pub struct SyncChannel {
    connected: bool,
    last_snapshot: Option<StateSnapshot>,
}

impl SyncChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self) {
        debug!("sync channel running in local-only mode");
        self.connected = true;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record the tick's snapshot as if it had been broadcast
    pub fn push_state(&mut self, state: &GameState) {
        if !self.connected {
            return;
        }
        self.last_snapshot = Some(StateSnapshot::capture(state));
    }

    pub fn last_snapshot(&self) -> Option<&StateSnapshot> {
        self.last_snapshot.as_ref()
    }
}
