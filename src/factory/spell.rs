//! Spell entities: projectiles and lingering areas.

use bevy::prelude::*;

use crate::combat::hitbox::HitboxFloat;
use crate::combat::{Caster, SpellPayload};
use crate::constants::SPELL_SPAWN_OFFSET;
use crate::database::SpellDef;
use crate::movement::{DepthLayer, Position, Rotation, Scale, Velocity};
use crate::world::{Lifetime, Projectile, Spell, Team};

/// Everything needed to put one cast into the world
#[derive(Debug, Clone, Copy)]
pub struct SpellLaunch<'a> {
    pub def: &'a SpellDef,
    pub caster: Entity,
    pub team: Team,
    pub origin: Vec2,
    pub direction: Vec2,
    /// Caster's flat damage stat, added to the spell's own damage
    pub bonus_damage: f32,
}

/// Spawn a spell half a unit in front of the caster. Projectiles travel along
/// `direction`; area spells stay where they appear.
pub fn spawn_spell(world: &mut World, launch: SpellLaunch<'_>) -> Entity {
    let def = launch.def;
    let direction = launch.direction.normalize_or_zero();
    let size = Vec2::from(def.hitbox);
    let velocity = if def.is_projectile() {
        direction * def.speed
    } else {
        Vec2::ZERO
    };

    let mut entity = world.spawn((
        (
            Spell,
            launch.team,
            Caster(launch.caster),
            SpellPayload {
                name: def.name.clone(),
                damage: def.damage + launch.bonus_damage,
                effects: def.effects.clone(),
            },
        ),
        (
            Position::new(
                launch.origin + direction * SPELL_SPAWN_OFFSET,
                DepthLayer::Particle,
            ),
            Velocity(velocity),
            HitboxFloat::from_size(size),
            Scale(size),
            Rotation(direction.y.atan2(direction.x).to_degrees()),
            Lifetime::new(def.lifetime()),
        ),
    ));
    if def.is_projectile() {
        entity.insert(Projectile);
    }
    entity.id()
}
