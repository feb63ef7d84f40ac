//! Kinematic state and motion integration.
//!
//! Positions are 2D; the depth scalar comes from the entity's semantic layer
//! and is only used for draw ordering.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::hitbox::{Aabb, HitboxSolid};
use crate::constants::{Z_BACKGROUND, Z_ENEMY, Z_PARTICLE, Z_PLAYER, Z_TERRAIN, Z_UTILITY};
use crate::engine::schedule::{GameTick, TickStage, TimeElapsed};
use crate::world::{Dying, Terrain};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(GameTick, integrate_motion.in_set(TickStage::Motion));
    }
}

/// Draw layer. Ordered front to back: particle < player < enemy < utility < terrain < background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DepthLayer {
    Particle,
    Player,
    Enemy,
    Utility,
    Terrain,
    Background,
}

impl DepthLayer {
    pub fn z(self) -> f32 {
        match self {
            DepthLayer::Particle => Z_PARTICLE,
            DepthLayer::Player => Z_PLAYER,
            DepthLayer::Enemy => Z_ENEMY,
            DepthLayer::Utility => Z_UTILITY,
            DepthLayer::Terrain => Z_TERRAIN,
            DepthLayer::Background => Z_BACKGROUND,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub xy: Vec2,
    pub layer: DepthLayer,
}

impl Position {
    pub fn new(xy: Vec2, layer: DepthLayer) -> Self {
        Self { xy, layer }
    }

    pub fn z(&self) -> f32 {
        self.layer.z()
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Acceleration(pub Vec2);

/// Sprite size in world units
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Scale(pub Vec2);

/// Rotation in degrees
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation(pub f32);

/// Movement speed stat, world units per second
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Speed(pub f32);

/// System: apply acceleration and velocity. Movers with a solid hitbox are
/// resolved one axis at a time against static terrain solids: a blocked axis
/// keeps its previous coordinate so the mover slides along walls.
pub fn integrate_motion(
    elapsed: Res<TimeElapsed>,
    mut movers: Query<
        (
            &mut Position,
            &mut Velocity,
            Option<&Acceleration>,
            Option<&HitboxSolid>,
        ),
        (Without<Terrain>, Without<Dying>),
    >,
    obstacles: Query<(&Position, &HitboxSolid), With<Terrain>>,
) {
    let dt = elapsed.secs();
    let solids: Vec<Aabb> = obstacles
        .iter()
        .map(|(pos, hitbox)| hitbox.at(pos.xy))
        .collect();

    for (mut pos, mut vel, acceleration, hitbox) in &mut movers {
        if let Some(acceleration) = acceleration {
            vel.0 += acceleration.0 * dt;
        }

        let delta = vel.0 * dt;
        if delta == Vec2::ZERO {
            continue;
        }

        let Some(hitbox) = hitbox else {
            pos.xy += delta;
            continue;
        };

        let blocked = |center: Vec2| solids.iter().any(|solid| hitbox.at(center).overlaps(solid));

        let step_x = pos.xy + Vec2::new(delta.x, 0.0);
        if !blocked(step_x) {
            pos.xy = step_x;
        }
        let step_y = pos.xy + Vec2::new(0.0, delta.y);
        if !blocked(step_y) {
            pos.xy = step_y;
        }
    }
}
