//! Enemy stat components and pursuit AI.
//!
//! Enemies are built by the factory from their database definition; this
//! module only owns the data the AI and the kill handler read.

use bevy::prelude::*;

pub mod ai;

use crate::engine::schedule::{GameTick, TickStage};

pub struct MonsterPlugin;

impl Plugin for MonsterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(GameTick, ai::pursue_player.in_set(TickStage::Ai));
    }
}

/// Definition name the enemy was built from
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct EnemyKind(pub String);

/// Distance within which the enemy notices the player
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ViewRange(pub f32);

/// Distance within which the enemy casts its spells
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AttackRange(pub f32);

/// Experience granted to the player that lands the kill
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceReward(pub u32);
