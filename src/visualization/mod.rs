//! Presentation state derived from the simulation.
//!
//! Nothing here draws. The systems compute what a renderer needs each tick:
//! which way sprites face, which animation clip plays, where the camera
//! looks and where the aiming reticle sits.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::RETICLE_DISTANCE;
use crate::engine::schedule::{GameTick, TickStage};
use crate::movement::{Position, Velocity};
use crate::player::AimDirection;
use crate::world::{AimingReticle, Dying, Player};

pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraTarget>().add_systems(
            GameTick,
            (update_animation, follow_camera, update_aiming_reticle)
                .in_set(TickStage::Presentation),
        );
    }
}

/// Last non-zero movement direction
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Facing(pub Vec2);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec2::X)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationClip {
    #[default]
    Idle,
    Run,
    Death,
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Animation {
    pub clip: AnimationClip,
    pub facing_left: bool,
}

impl Animation {
    /// Clip name in the sprite sheet: `idle_left`, `run_right`, `death`, ...
    pub fn name(&self) -> &'static str {
        match (self.clip, self.facing_left) {
            (AnimationClip::Death, _) => "death",
            (AnimationClip::Idle, true) => "idle_left",
            (AnimationClip::Idle, false) => "idle_right",
            (AnimationClip::Run, true) => "run_left",
            (AnimationClip::Run, false) => "run_right",
        }
    }
}

/// Sprite sheet asset path
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteSheet(pub String);

/// Where the camera should be centred
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraTarget(pub Vec2);

/// System: facing and clip from velocity; dying entities play `death`
pub fn update_animation(
    mut query: Query<(&Velocity, &mut Facing, &mut Animation, Has<Dying>)>,
) {
    for (velocity, mut facing, mut animation, dying) in &mut query {
        if dying {
            animation.clip = AnimationClip::Death;
            continue;
        }
        if velocity.0 != Vec2::ZERO {
            facing.0 = velocity.0.normalize();
            animation.clip = AnimationClip::Run;
        } else {
            animation.clip = AnimationClip::Idle;
        }
        if facing.0.x != 0.0 {
            animation.facing_left = facing.0.x < 0.0;
        }
    }
}

pub fn follow_camera(mut camera: ResMut<CameraTarget>, players: Query<&Position, With<Player>>) {
    if let Some(player) = players.iter().next() {
        camera.0 = player.xy;
    }
}

/// System: keep the reticle a fixed distance out along the player's aim
pub fn update_aiming_reticle(
    players: Query<(&Position, &AimDirection), With<Player>>,
    mut reticles: Query<&mut Position, (With<AimingReticle>, Without<Player>)>,
) {
    let Some((player, aim)) = players.iter().next() else {
        return;
    };
    let offset = aim.0.normalize_or_zero() * RETICLE_DISTANCE;
    for mut reticle in &mut reticles {
        reticle.xy = player.xy + offset;
    }
}
