pub mod constants;
pub mod stats;
pub mod state;
pub mod systems;
pub mod game_loop;
pub mod modes;
pub mod progression;
pub mod match_result;
pub mod spatial;
