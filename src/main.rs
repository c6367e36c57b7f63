use tracing::{info, warn, Level};

use cosmic_derby::config::GameConfig;
use cosmic_derby::game::game_loop::{Simulation, SimulationConfig};
use cosmic_derby::game::systems::movement::PlayerInput;
use cosmic_derby::profile::ProfileStore;
use cosmic_derby::sync::SyncChannel;
use cosmic_derby::util::vec2::Vec2;

/// Fallback match length for headless runs (5 minutes at 60 Hz)
const DEFAULT_MAX_TICKS: u64 = 18_000;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Cosmic Derby Sim v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = GameConfig::load_or_default();
    config.validate()?;
    info!(
        "Configuration loaded: mode={}, bots={}, player={}",
        config.mode.name(),
        config.ai_count,
        config.player_name
    );

    let mut sim = Simulation::new(SimulationConfig {
        mode: config.mode,
        player_name: config.player_name.clone(),
        ai_count: config.ai_count,
        pickup_count: config.pickup_count,
        star_count: config.star_count,
        mine_count: config.mine_count,
        max_ticks: Some(config.max_ticks.unwrap_or(DEFAULT_MAX_TICKS)),
        seed: config.seed,
    });

    // Career stats; a broken profile file downgrades to a fresh one
    match ProfileStore::open(&config.profile_path) {
        Ok(store) => {
            info!(
                "Profile loaded: level={}, matches={}",
                store.profile().level,
                store.profile().total_matches
            );
            sim = sim.with_persistence(Box::new(store));
        }
        Err(e) => warn!("Could not open profile ({}), running without one", e),
    }

    let mut sync = SyncChannel::new();
    sync.connect();

    // Scripted demo drive: a slow sweeping steer with a periodic dash
    let mut tick: u64 = 0;
    while !sim.is_over() {
        tick += 1;
        let input = PlayerInput {
            steer: Vec2::from_angle(tick as f32 * 0.004) * 200.0,
            dash: tick % 300 == 0,
        };
        sim.tick(&input);
        sync.push_state(sim.state());
    }

    if let Some(summary) = sim.summary() {
        info!(
            "Match over: {} after {} ticks",
            summary.reason.describe(),
            summary.duration_ticks
        );
        info!(
            "Player: place={:?}, score={}, kills={}, mass={:.1}, xp={}",
            summary.player_place(),
            summary.player_score,
            summary.player_kills,
            summary.player_final_mass,
            summary.player_xp
        );
        for ranking in summary.rankings.iter().take(5) {
            info!(
                "  #{} {} - score={}, kills={}, mass={:.1}",
                ranking.place, ranking.name, ranking.score, ranking.kills, ranking.mass
            );
        }
    }

    Ok(())
}
