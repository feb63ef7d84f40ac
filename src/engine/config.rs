use std::path::Path;
use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generation::FloorGenParams;
use crate::logging::TracingConfig;

/// Run settings injected into the world as a resource
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of the first floor; later floors chain from it
    pub seed: u64,
    pub generation: FloorGenParams,
    pub death_animation_secs: f32,
    pub boss_experience_multiplier: u32,
    /// Distance from the exit door within which a key holder leaves the floor
    pub exit_door_radius: f32,
    pub tracing: TracingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            generation: FloorGenParams::default(),
            death_animation_secs: 0.8,
            boss_experience_multiplier: 3,
            exit_door_radius: 1.5,
            tracing: TracingConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn death_animation(&self) -> Duration {
        Duration::from_secs_f32(self.death_animation_secs.max(0.0))
    }

    /// Load from `.ron`; any other extension is read as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        if is_ron(path) {
            Ok(ron::from_str(&text)?)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = if is_ron(path) {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}

fn is_ron(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("ron"))
}
