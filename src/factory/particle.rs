//! Short-lived visual cues: hit markers and level-up bursts.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::constants::{
    HIT_MARKER_LIFETIME_MS, HIT_MARKER_PARTICLES, HIT_MARKER_SPEED, LEVEL_UP_LIFETIME_MS,
    LEVEL_UP_PARTICLES,
};
use crate::movement::{DepthLayer, Position, Scale, Velocity};
use crate::world::{Lifetime, Particle};

pub fn spawn_hit_marker(world: &mut World, at: Vec2) -> Vec<Entity> {
    spawn_ring(
        world,
        at,
        HIT_MARKER_PARTICLES,
        HIT_MARKER_SPEED,
        HIT_MARKER_LIFETIME_MS,
    )
}

pub fn spawn_level_up_burst(world: &mut World, at: Vec2) -> Vec<Entity> {
    spawn_ring(
        world,
        at,
        LEVEL_UP_PARTICLES,
        HIT_MARKER_SPEED * 1.5,
        LEVEL_UP_LIFETIME_MS,
    )
}

/// `count` particles leaving `at` in evenly spaced directions
fn spawn_ring(world: &mut World, at: Vec2, count: u32, speed: f32, lifetime_ms: u64) -> Vec<Entity> {
    (0..count)
        .map(|i| {
            let direction = Vec2::from_angle(TAU * i as f32 / count as f32);
            world
                .spawn((
                    Particle,
                    Position::new(at, DepthLayer::Particle),
                    Velocity(direction * speed),
                    Scale(Vec2::splat(0.1)),
                    Lifetime::from_millis(lifetime_ms),
                ))
                .id()
        })
        .collect()
}
