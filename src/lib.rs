//! Cosmic Derby Simulation Core
//!
//! A deterministic-tick arcade vehicular combat simulation: mass-driven
//! vehicle stats, drift-and-dash driving, a bot behavior layer, roaming
//! mines and five selectable game modes. Rendering, audio and networking
//! stay behind the seams in [`hooks`] and [`sync`].

pub mod config;
pub mod game;
pub mod hooks;
pub mod profile;
pub mod sync;
pub mod util;
