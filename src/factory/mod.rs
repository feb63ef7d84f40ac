//! Entity construction.
//!
//! One tagged request type, one dispatch function: each variant attaches
//! exactly the component set its kind needs. Stat blocks come from the
//! [`Databases`] resource; nothing else is touched besides the registry.

pub mod particle;
pub mod spell;

use bevy::prelude::*;

use crate::combat::cooldown::SpellSlots;
use crate::combat::hitbox::{HitboxFloat, HitboxSolid, Health};
use crate::combat::AttackDamage;
use crate::constants::{KEY_SIZE, PLAYER_HITBOX, PLAYER_SCALE, RETICLE_SIZE};
use crate::database::Databases;
use crate::error::DatabaseError;
use crate::monster::{AttackRange, EnemyKind, ExperienceReward, ViewRange};
use crate::movement::{Acceleration, DepthLayer, Position, Rotation, Scale, Speed, Velocity};
use crate::player::{AimDirection, ControllerAxis, KeyPicker};
use crate::progression::{Classes, Level, SkillPoints};
use crate::tilemap::{TileKind, TileRect};
use crate::visualization::{Animation, Facing, SpriteSheet};
use crate::world::{
    AimingReticle, Background, Boss, DebugTile, Enemy, ExitDoor, Key, Player, Terrain, Wall,
};

/// Construction parameters for every concrete entity kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest<'a> {
    /// Zero-stat player; class purchase fills the stats in
    Player { position: Vec2 },
    Enemy { id: &'a str, position: Vec2 },
    /// Enemy that is tagged boss whatever its definition says
    Boss { id: &'a str, position: Vec2 },
    Tile { rect: TileRect },
    Key { position: Vec2 },
    Background { center: Vec2, size: Vec2 },
    AimingReticle { position: Vec2 },
    DebugTile { position: Vec2 },
}

/// Which tile a terrain entity was built from
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSprite(pub TileKind);

pub fn create(world: &mut World, request: SpawnRequest<'_>) -> Result<Entity, DatabaseError> {
    let entity = match request {
        SpawnRequest::Player { position } => spawn_player(world, position),
        SpawnRequest::Enemy { id, position } => spawn_enemy(world, id, position, false)?,
        SpawnRequest::Boss { id, position } => spawn_enemy(world, id, position, true)?,
        SpawnRequest::Tile { rect } => spawn_tile(world, rect),
        SpawnRequest::Key { position } => world
            .spawn((
                Key,
                Position::new(position, DepthLayer::Utility),
                Scale(Vec2::from(KEY_SIZE)),
                HitboxFloat::from_size(Vec2::from(KEY_SIZE)),
            ))
            .id(),
        SpawnRequest::Background { center, size } => world
            .spawn((
                Background,
                Position::new(center, DepthLayer::Background),
                Scale(size),
            ))
            .id(),
        SpawnRequest::AimingReticle { position } => world
            .spawn((
                AimingReticle,
                Position::new(position, DepthLayer::Utility),
                Scale(Vec2::from(RETICLE_SIZE)),
            ))
            .id(),
        SpawnRequest::DebugTile { position } => world
            .spawn((
                DebugTile,
                TileSprite(TileKind::DebugTile),
                Position::new(position, DepthLayer::Utility),
                Scale(Vec2::ONE),
            ))
            .id(),
    };
    Ok(entity)
}

fn spawn_player(world: &mut World, position: Vec2) -> Entity {
    world
        .spawn((
            (
                Player,
                Position::new(position, DepthLayer::Player),
                Velocity::default(),
                Acceleration::default(),
                Scale(Vec2::from(PLAYER_SCALE)),
                HitboxSolid::from_size(Vec2::from(PLAYER_HITBOX)),
            ),
            (
                Health::new(1.0),
                Speed(0.0),
                AttackDamage(0.0),
                Level::default(),
                SkillPoints(0),
                Classes::default(),
            ),
            (
                ControllerAxis::default(),
                AimDirection::default(),
                KeyPicker::default(),
                SpellSlots::default(),
            ),
            (Facing::default(), Animation::default(), SpriteSheet::default()),
        ))
        .id()
}

fn spawn_enemy(
    world: &mut World,
    id: &str,
    position: Vec2,
    force_boss: bool,
) -> Result<Entity, DatabaseError> {
    let (def, slots) = {
        let db = world.resource::<Databases>();
        let def = db.enemy(id)?.clone();
        let slots = SpellSlots::from_spells(&def.spells, db)?;
        (def, slots)
    };

    let mut entity = world.spawn((
        (
            Enemy,
            EnemyKind(def.name.clone()),
            Position::new(position, DepthLayer::Enemy),
            Velocity::default(),
            Scale(Vec2::from(def.scale)),
            HitboxSolid::from_size(Vec2::from(def.hitbox)),
        ),
        (
            Health::new(def.health),
            Speed(def.speed),
            AttackDamage(def.damage),
            ViewRange(def.view_range),
            AttackRange(def.attack_range),
            ExperienceReward(def.experience),
        ),
        (
            slots,
            Facing::default(),
            Animation::default(),
            SpriteSheet(def.asset.clone()),
        ),
    ));
    if force_boss || def.is_boss {
        entity.insert(Boss);
    }
    Ok(entity.id())
}

fn spawn_tile(world: &mut World, rect: TileRect) -> Entity {
    let position = Position::new(rect.center(), DepthLayer::Terrain);
    let size = rect.size();
    let base = (Terrain, TileSprite(rect.kind), position, Scale(size));

    match rect.kind {
        TileKind::Wall => world
            .spawn((base, Wall, HitboxSolid::from_size(size)))
            .id(),
        TileKind::ExitDoor(side) => world
            .spawn((
                base,
                ExitDoor,
                HitboxSolid::from_size(size),
                Rotation(side.rotation()),
            ))
            .id(),
        TileKind::DebugTile => world
            .spawn((
                DebugTile,
                TileSprite(rect.kind),
                Position::new(rect.center(), DepthLayer::Utility),
                Scale(size),
            ))
            .id(),
        _ => world.spawn(base).id(),
    }
}
