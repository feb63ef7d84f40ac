//! Spell impacts and key pickup.

use bevy::prelude::*;
use tracing::warn;

use super::hitbox::{Aabb, Health, HitboxFloat, HitboxSolid};
use super::status::apply_effect;
use super::{apply_damage, Caster, SpellPayload};
use crate::events::SoundCue;
use crate::factory::particle::spawn_hit_marker;
use crate::movement::Position;
use crate::player::{KeyPickedUp, KeyPicker};
use crate::world::{Dying, Enemy, Key, Player, Projectile, Spell, Team, Terrain};

struct SpellContact {
    entity: Entity,
    area: Aabb,
    team: Team,
    caster: Entity,
    payload: SpellPayload,
    projectile: bool,
}

struct Receiver {
    entity: Entity,
    area: Aabb,
    team: Team,
}

/// Exclusive system: resolve every live spell against terrain and the
/// opposing team.
///
/// Orphaned spells (caster destroyed) vanish. Projectiles die on the first
/// terrain contact or the first hit; area spells keep applying their effects,
/// which never stack.
pub fn resolve_spell_hits(world: &mut World) {
    let terrain: Vec<Aabb> = world
        .query_filtered::<(&Position, &HitboxSolid), With<Terrain>>()
        .iter(world)
        .map(|(pos, hitbox)| hitbox.at(pos.xy))
        .collect();

    let receivers: Vec<Receiver> = world
        .query_filtered::<(Entity, &Position, &HitboxSolid, Has<Player>, Has<Enemy>), (With<Health>, Without<Dying>)>()
        .iter(world)
        .filter_map(|(entity, pos, hitbox, is_player, is_enemy)| {
            let team = match (is_player, is_enemy) {
                (true, _) => Team::Player,
                (false, true) => Team::Enemies,
                _ => return None,
            };
            Some(Receiver {
                entity,
                area: hitbox.at(pos.xy),
                team,
            })
        })
        .collect();

    let spells: Vec<SpellContact> = world
        .query_filtered::<(Entity, &Position, &HitboxFloat, &Team, &Caster, &SpellPayload, Has<Projectile>), With<Spell>>()
        .iter(world)
        .map(|(entity, pos, hitbox, team, caster, payload, projectile)| SpellContact {
            entity,
            area: hitbox.at(pos.xy),
            team: *team,
            caster: caster.0,
            payload: payload.clone(),
            projectile,
        })
        .collect();

    for spell in spells {
        if !world.entities().contains(spell.caster) {
            world.despawn(spell.entity);
            continue;
        }
        if spell.projectile && terrain.iter().any(|solid| spell.area.touches(solid)) {
            world.despawn(spell.entity);
            continue;
        }

        for receiver in receivers.iter().filter(|r| r.team == spell.team.opponent()) {
            if !spell.area.overlaps(&receiver.area) || world.get::<Dying>(receiver.entity).is_some()
            {
                continue;
            }

            for effect in &spell.payload.effects {
                if let Err(err) = apply_effect(world, effect, receiver.entity, spell.caster) {
                    warn!(%err, spell = %spell.payload.name, "spell effect skipped");
                }
            }

            if spell.projectile {
                apply_damage(world, receiver.entity, spell.caster, spell.payload.damage);
                spawn_hit_marker(world, (spell.area.center + receiver.area.center) / 2.0);
                world.send_event(SoundCue::Hit);
                world.despawn(spell.entity);
                break;
            }
        }
    }
}

/// System: a key picker touching a key takes it
pub fn pick_up_keys(
    mut commands: Commands,
    mut pickers: Query<(Entity, &Position, &HitboxSolid, &mut KeyPicker), Without<Dying>>,
    keys: Query<(Entity, &Position, &HitboxFloat), With<Key>>,
    mut cues: EventWriter<SoundCue>,
    mut picked_up: EventWriter<KeyPickedUp>,
) {
    let mut taken: Vec<Entity> = Vec::new();
    for (picker, pos, hitbox, mut key_picker) in &mut pickers {
        let area = hitbox.at(pos.xy);
        let touching = keys.iter().find(|(key, key_pos, key_box)| {
            !taken.contains(key) && area.overlaps(&key_box.at(key_pos.xy))
        });
        if let Some((key, _, _)) = touching {
            taken.push(key);
            key_picker.has_key = true;
            commands.entity(key).despawn();
            cues.send(SoundCue::KeyPickup);
            picked_up.send(KeyPickedUp { entity: picker });
        }
    }
}
