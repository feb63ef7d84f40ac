//! The per-tick handler chain.
//!
//! Every subsystem registers its systems into [`GameTick`] under one
//! [`TickStage`]. Stages run in the order of [`TICK_ORDER`]; the engine plugin
//! derives the schedule constraints from that array, so the order lives in one
//! place and can be asserted on.

use std::time::Duration;

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;

/// Schedule run once per "time elapsed" event
#[derive(ScheduleLabel, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameTick;

/// Ordered phases of one simulation tick
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickStage {
    /// Player velocity from the controller axis
    Movement,
    /// Enemy pursuit and line of sight
    Ai,
    /// Spell slot and status-effect cooldown decay
    Cooldown,
    /// Enemies cast ready spells at the player
    Attack,
    /// Velocity integration with per-axis solid resolution
    Motion,
    /// Lifetime countdown and expiry
    Lifetime,
    /// Spell hits, wall impacts, key pickup
    Collision,
    /// Periodic status-effect damage
    Effects,
    /// Key + exit door check
    FloorCheck,
    /// Facing, animation clips, camera target, aiming reticle
    Presentation,
}

/// Cooldown decay precedes the attack checks that read it; movement precedes collision.
pub const TICK_ORDER: [TickStage; 10] = [
    TickStage::Movement,
    TickStage::Ai,
    TickStage::Cooldown,
    TickStage::Attack,
    TickStage::Motion,
    TickStage::Lifetime,
    TickStage::Collision,
    TickStage::Effects,
    TickStage::FloorCheck,
    TickStage::Presentation,
];

/// Elapsed time carried by the current tick
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeElapsed(pub Duration);

impl TimeElapsed {
    pub fn secs(&self) -> f32 {
        self.0.as_secs_f32()
    }
}

/// Position of a stage in the tick chain
pub fn stage_index(stage: TickStage) -> Option<usize> {
    TICK_ORDER.iter().position(|s| *s == stage)
}
