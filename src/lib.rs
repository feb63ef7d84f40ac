//! Dungeon Core - gameplay library for a top-down dungeon crawler
//!
//! The deterministic simulation behind the game, headless and renderer-agnostic:
//! - Seeded floor generation (rooms, corridors, boss exit door, enemy population)
//! - Tilemap merging into terrain entities
//! - Entity factory backed by class/enemy/spell/effect databases
//! - Ordered per-tick pipeline: movement, AI, cooldowns, spells, collision, status effects
//! - Experience, levels and class purchases
//! - Floor lifecycle, game-flow states and a notification bus
//! - Debug console

pub mod combat;
pub mod console;
pub mod constants;
pub mod database;
pub mod engine;
pub mod error;
pub mod events;
pub mod factory;
pub mod gameflow;
pub mod generation;
pub mod logging;
pub mod monster;
pub mod movement;
pub mod player;
pub mod progression;
pub mod tilemap;
pub mod visualization;
pub mod world;

pub use engine::{Simulation, SimulationConfig};
pub use error::SimulationError;
