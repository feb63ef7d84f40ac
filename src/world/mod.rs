//! Entity classification and lifetimes.
//!
//! Kinds are zero-size marker components, queried through `With<T>` /
//! `Without<T>` filters. An entity may carry several (a boss is also an
//! enemy, a fireball is both a spell and a projectile).

use std::time::Duration;

use bevy::prelude::*;

use crate::engine::schedule::{GameTick, TickStage, TimeElapsed};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(GameTick, expire_lifetimes.in_set(TickStage::Lifetime));
    }
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Boss;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Spell;

/// Spell that deals direct damage and dies on impact
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Projectile;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Terrain;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Wall;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Key;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ExitDoor;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Particle;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Background;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AimingReticle;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DebugTile;

/// Set once a kill has been processed. Never removed; the entity is destroyed
/// when its death animation lifetime runs out.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dying;

/// Which side a spell belongs to
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Player,
    Enemies,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::Player => Team::Enemies,
            Team::Enemies => Team::Player,
        }
    }
}

/// Remaining time before the entity is destroyed
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub remaining: Duration,
}

impl Lifetime {
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Saturating countdown; returns true once nothing remains
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.remaining.is_zero()
    }
}

/// System: count lifetimes down and destroy what ran out
pub fn expire_lifetimes(
    mut commands: Commands,
    elapsed: Res<TimeElapsed>,
    mut query: Query<(Entity, &mut Lifetime)>,
) {
    for (entity, mut lifetime) in &mut query {
        if lifetime.tick(elapsed.0) {
            commands.entity(entity).despawn();
        }
    }
}
