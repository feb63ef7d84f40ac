//! Experience, levels and skill points.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod class;

use crate::constants::{STARTING_XP_REQUIRE, XP_GROWTH_DENOMINATOR, XP_GROWTH_NUMERATOR};
use crate::events::{AppNotificationExt, SoundCue};
use crate::factory::particle::spawn_level_up_burst;
use crate::movement::Position;

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.add_notification::<LevelUp>()
            .add_notification::<class::ClassPurchased>();
    }
}

/// Invariant once `add_xp` returns: `current_xp < xp_require`
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub current_level: u32,
    pub current_xp: u32,
    pub xp_require: u32,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            current_level: 0,
            current_xp: 0,
            xp_require: STARTING_XP_REQUIRE,
        }
    }
}

impl Level {
    /// Add experience, rolling the excess over as many levels as it pays for.
    /// Each level up grows the requirement by x1.2, rounded up. Returns the
    /// number of levels gained.
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.xp_require = self.xp_require.max(1);
        self.current_xp = self.current_xp.saturating_add(amount);

        let mut gained = 0;
        while self.current_xp >= self.xp_require {
            self.current_xp -= self.xp_require;
            self.current_level = self.current_level.saturating_add(1);
            self.xp_require = next_requirement(self.xp_require);
            gained += 1;
        }
        gained
    }

    /// Experience needed to gain exactly `levels` more levels from here
    pub fn xp_for_levels(&self, levels: u32) -> u64 {
        let mut require = self.xp_require.max(1);
        let mut total = 0u64;
        for _ in 0..levels {
            total += u64::from(require);
            require = next_requirement(require);
        }
        total.saturating_sub(u64::from(self.current_xp))
    }
}

fn next_requirement(require: u32) -> u32 {
    let grown = (u64::from(require) * XP_GROWTH_NUMERATOR).div_ceil(XP_GROWTH_DENOMINATOR);
    u32::try_from(grown).unwrap_or(u32::MAX)
}

/// Unspent points for class purchases; one per level gained
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillPoints(pub u32);

/// Owned class names in purchase order
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Classes(pub Vec<String>);

impl Classes {
    pub fn owns(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub entity: Entity,
    pub level: u32,
}

/// Give `amount` experience to `entity`. Every level gained awards a skill
/// point and publishes its own [`LevelUp`]. Returns the levels gained.
pub fn grant_experience(world: &mut World, entity: Entity, amount: u32) -> u32 {
    let Some(mut level) = world.get_mut::<Level>(entity) else {
        return 0;
    };
    let before = level.current_level;
    let gained = level.add_xp(amount);
    if gained == 0 {
        return 0;
    }

    if let Some(mut points) = world.get_mut::<SkillPoints>(entity) {
        points.0 = points.0.saturating_add(gained);
    }
    for reached in before + 1..=before + gained {
        world.send_event(LevelUp {
            entity,
            level: reached,
        });
    }
    world.send_event(SoundCue::LevelUp);
    if let Some(at) = world.get::<Position>(entity).map(|p| p.xy) {
        spawn_level_up_burst(world, at);
    }
    info!(entity = ?entity, level = before + gained, "level up");
    gained
}

/// Grant exactly enough experience for `levels` more levels
pub fn grant_levels(world: &mut World, entity: Entity, levels: u32) -> u32 {
    let Some(level) = world.get::<Level>(entity).copied() else {
        return 0;
    };
    let needed = u32::try_from(level.xp_for_levels(levels)).unwrap_or(u32::MAX);
    grant_experience(world, entity, needed)
}
