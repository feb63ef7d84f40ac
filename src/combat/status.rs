//! Status effects as short-lived entities.
//!
//! An effect entity carries its victim and sender, a recurring [`Cooldown`]
//! (the tick interval) and a [`Lifetime`] (total duration). At most one effect
//! of a given name exists per victim.

use std::collections::HashMap;

use bevy::prelude::*;
use tracing::debug;

use super::apply_damage;
use super::cooldown::Cooldown;
use crate::database::{Databases, EffectKind};
use crate::error::DatabaseError;
use crate::factory::particle::spawn_hit_marker;
use crate::movement::Position;
use crate::world::{Dying, Lifetime};

#[derive(Component, Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub name: String,
    pub victim: Entity,
    pub sender: Entity,
    pub kind: EffectKind,
}

/// Whether `victim` already suffers from the effect called `name`
pub fn has_effect(world: &mut World, name: &str, victim: Entity) -> bool {
    world
        .query::<&ActiveEffect>()
        .iter(world)
        .any(|effect| effect.victim == victim && effect.name == name)
}

/// Start the named effect on `victim`. Returns `None` when an equal effect is
/// already running.
pub fn apply_effect(
    world: &mut World,
    name: &str,
    victim: Entity,
    sender: Entity,
) -> Result<Option<Entity>, DatabaseError> {
    let def = world.resource::<Databases>().effect(name)?.clone();
    if has_effect(world, &def.name, victim) {
        return Ok(None);
    }

    let entity = world
        .spawn((
            ActiveEffect {
                name: def.name.clone(),
                victim,
                sender,
                kind: def.kind,
            },
            Cooldown::started(def.cooldown()),
            Lifetime::new(def.lifetime()),
        ))
        .id();
    debug!(effect = %def.name, victim = ?victim, "effect applied");
    Ok(Some(entity))
}

/// Exclusive system: fire every ready damage-over-time effect and drop
/// effects whose victim is gone or dying
pub fn tick_status_effects(world: &mut World) {
    let mut stale = Vec::new();
    let mut ready = Vec::new();

    let mut effects = world.query::<(Entity, &ActiveEffect, &Cooldown)>();
    for (entity, effect, cooldown) in effects.iter(world) {
        let victim_alive = world.entities().contains(effect.victim)
            && world.get::<Dying>(effect.victim).is_none();
        if !victim_alive {
            stale.push(entity);
            continue;
        }
        if let EffectKind::Dot { damage } = effect.kind {
            if cooldown.is_ready() {
                ready.push((entity, effect.victim, effect.sender, damage));
            }
        }
    }

    for entity in stale {
        world.despawn(entity);
    }

    for (entity, victim, sender, damage) in ready {
        // an earlier tick in this loop may have killed the victim
        if world.get::<Dying>(victim).is_some() {
            world.despawn(entity);
            continue;
        }
        apply_damage(world, victim, sender, damage);
        if let Some(at) = world.get::<Position>(victim).map(|p| p.xy) {
            spawn_hit_marker(world, at);
        }
        if let Some(mut cooldown) = world.get_mut::<Cooldown>(entity) {
            cooldown.start();
        }
    }
}

/// Movement multiplier per slowed victim: each active slow divides speed by
/// its strength. Victims without a slow are absent (factor 1).
#[derive(Debug, Clone, Default)]
pub struct SlowFactors(HashMap<Entity, f32>);

impl SlowFactors {
    pub fn collect<'a>(effects: impl IntoIterator<Item = &'a ActiveEffect>) -> Self {
        let mut factors = HashMap::new();
        for effect in effects {
            if let EffectKind::Slow { strength } = effect.kind {
                if strength > 0.0 {
                    *factors.entry(effect.victim).or_insert(1.0) /= strength;
                }
            }
        }
        Self(factors)
    }

    pub fn factor(&self, entity: Entity) -> f32 {
        self.0.get(&entity).copied().unwrap_or(1.0)
    }
}
