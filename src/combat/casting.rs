//! Spell casting for players and enemies.

use bevy::prelude::*;
use tracing::warn;

use super::cooldown::SpellSlots;
use super::AttackDamage;
use crate::database::Databases;
use crate::error::DatabaseError;
use crate::events::SoundCue;
use crate::factory::spell::{spawn_spell, SpellLaunch};
use crate::monster::AttackRange;
use crate::movement::Position;
use crate::world::{Dying, Enemy, Player, Team};

/// Cast the spell in `slot` toward `direction`. Empty slots, slots in
/// cooldown and dying casters yield `Ok(None)`.
pub fn cast_spell(
    world: &mut World,
    caster: Entity,
    slot: usize,
    direction: Vec2,
) -> Result<Option<Entity>, DatabaseError> {
    if world.get::<Dying>(caster).is_some() {
        return Ok(None);
    }
    let Some(spell_id) = world
        .get::<SpellSlots>(caster)
        .and_then(|slots| slots.get(slot))
        .filter(|spell| spell.cooldown.is_ready())
        .map(|spell| spell.id.clone())
    else {
        return Ok(None);
    };
    let Some(origin) = world.get::<Position>(caster).map(|p| p.xy) else {
        return Ok(None);
    };

    let def = world.resource::<Databases>().spell(&spell_id)?.clone();
    let team = if world.get::<Player>(caster).is_some() {
        Team::Player
    } else {
        Team::Enemies
    };
    let bonus_damage = world
        .get::<AttackDamage>(caster)
        .map(|d| d.0)
        .unwrap_or_default();

    let spell = spawn_spell(
        world,
        SpellLaunch {
            def: &def,
            caster,
            team,
            origin,
            direction,
            bonus_damage,
        },
    );

    if let Some(mut slots) = world.get_mut::<SpellSlots>(caster) {
        if let Some(spell) = slots.get_mut(slot) {
            spell.cooldown.start();
        }
    }
    world.send_event(SoundCue::SpellCast);
    Ok(Some(spell))
}

/// Nearest living player position, if any
pub fn nearest_player(world: &mut World, from: Vec2) -> Option<Vec2> {
    world
        .query_filtered::<&Position, (With<Player>, Without<Dying>)>()
        .iter(world)
        .map(|p| p.xy)
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
}

/// Exclusive system: every living enemy with the player inside its attack
/// range casts each ready spell at the player
pub fn enemies_attack(world: &mut World) {
    let attackers: Vec<(Entity, Vec2, f32, Vec<usize>)> = world
        .query_filtered::<(Entity, &Position, &AttackRange, &SpellSlots), (With<Enemy>, Without<Dying>)>()
        .iter(world)
        .map(|(e, pos, range, slots)| (e, pos.xy, range.0, slots.ready_indices()))
        .filter(|(_, _, _, ready)| !ready.is_empty())
        .collect();

    for (enemy, position, range, ready) in attackers {
        let Some(target) = nearest_player(world, position) else {
            return;
        };
        if position.distance(target) > range {
            continue;
        }
        for slot in ready {
            if let Err(err) = cast_spell(world, enemy, slot, target - position) {
                warn!(%err, enemy = ?enemy, "enemy spell failed");
            }
        }
    }
}
