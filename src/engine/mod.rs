//! Engine layer.
//!
//! [`CorePlugin`] assembles every subsystem plugin around the [`GameTick`]
//! schedule; [`Simulation`] owns the resulting `App` and is the only surface a
//! host (renderer, audio, input, tests) talks to. Collaborators are injected
//! as resources when the simulation is built.
//!
//! [`GameTick`]: schedule::GameTick

pub mod config;
pub mod plugin;
pub mod schedule;
pub mod simulation;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

pub use config::SimulationConfig;
pub use plugin::CorePlugin;
pub use simulation::Simulation;

/// Gameplay randomness outside floor generation (death cue choice)
#[derive(Resource, Debug, Clone)]
pub struct SimulationRng(pub Xoshiro256PlusPlus);

impl SimulationRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}
