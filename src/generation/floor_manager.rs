//! Floor lifecycle.
//!
//! A floor change is one exclusive step between ticks: generate, check every
//! enemy id against the database, tear the old floor down, build the new one
//! and move the players to the spawn room. The exit-door system only raises a
//! flag; the simulation applies it once the tick has finished.

use bevy::prelude::*;
use tracing::{debug, info};

use super::{generate, GeneratedFloor, MapData};
use crate::combat::status::ActiveEffect;
use crate::database::Databases;
use crate::engine::config::SimulationConfig;
use crate::engine::schedule::{GameTick, TickStage};
use crate::error::{DatabaseError, FloorError};
use crate::events::AppNotificationExt;
use crate::factory::{self, SpawnRequest};
use crate::movement::{Position, Velocity};
use crate::player::KeyPicker;
use crate::world::{Background, Dying, Enemy, ExitDoor, Key, Particle, Player, Spell, Terrain};

pub struct FloorPlugin;

impl Plugin for FloorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingFloorChange>()
            .add_notification::<FloorChangeRequested>()
            .add_notification::<FloorChanged>()
            .add_systems(GameTick, check_exit_door.in_set(TickStage::FloorCheck));
    }
}

/// The floor currently built in the world
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ActiveFloor {
    /// 1-based depth
    pub floor: u32,
    pub seed: u64,
    pub next_seed: u64,
    pub fingerprint: String,
    pub map: MapData,
}

/// Set when a key holder reaches the exit door, cleared by the next load
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingFloorChange(pub bool);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorChangeRequested {
    pub player: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorChanged {
    pub floor: u32,
    pub seed: u64,
}

/// System: a living player holding the key near the exit door requests the next floor
pub fn check_exit_door(
    mut pending: ResMut<PendingFloorChange>,
    mut requests: EventWriter<FloorChangeRequested>,
    config: Option<Res<SimulationConfig>>,
    players: Query<(Entity, &Position, &KeyPicker), (With<Player>, Without<Dying>)>,
    doors: Query<&Position, With<ExitDoor>>,
) {
    if pending.0 {
        return;
    }
    let radius = config
        .map(|c| c.exit_door_radius)
        .unwrap_or_else(|| SimulationConfig::default().exit_door_radius);

    for (player, position, picker) in &players {
        if !picker.has_key {
            continue;
        }
        if doors
            .iter()
            .any(|door| door.xy.distance(position.xy) <= radius)
        {
            pending.0 = true;
            requests.send(FloorChangeRequested { player });
            debug!(player = ?player, "exit door reached with key");
            return;
        }
    }
}

/// Despawn everything that belongs to a floor. Players and the reticle stay.
pub fn teardown_floor(world: &mut World) -> usize {
    let doomed: Vec<Entity> = world
        .query_filtered::<Entity, Or<(
            With<Terrain>,
            With<Enemy>,
            With<Spell>,
            With<Key>,
            With<Particle>,
            With<Background>,
            With<ActiveEffect>,
        )>>()
        .iter(world)
        .collect();
    for entity in &doomed {
        world.despawn(*entity);
    }
    doomed.len()
}

/// Fail before touching the world if any enemy id is unknown
fn check_enemy_ids(world: &World, floor: &GeneratedFloor) -> Result<(), DatabaseError> {
    let db = world.resource::<Databases>();
    db.enemy(&floor.boss.id)?;
    for spawn in &floor.enemies {
        db.enemy(&spawn.id)?;
    }
    Ok(())
}

/// Build terrain, enemies, the boss and the background of a generated floor
pub fn spawn_floor(world: &mut World, floor: &GeneratedFloor) -> Result<usize, DatabaseError> {
    let mut spawned = floor.tiles.build(world)?.len();
    for spawn in &floor.enemies {
        factory::create(
            world,
            SpawnRequest::Enemy {
                id: &spawn.id,
                position: spawn.position,
            },
        )?;
        spawned += 1;
    }
    factory::create(
        world,
        SpawnRequest::Boss {
            id: &floor.boss.id,
            position: floor.boss.position,
        },
    )?;
    let size = Vec2::new(floor.tiles.width() as f32, floor.tiles.height() as f32);
    factory::create(
        world,
        SpawnRequest::Background {
            center: size * 0.5,
            size,
        },
    )?;
    Ok(spawned + 2)
}

/// Players go to the spawn room centre, stopped and without a key
fn relocate_players(world: &mut World, to: Vec2) {
    let mut players = world.query_filtered::<(
        &mut Position,
        Option<&mut Velocity>,
        Option<&mut KeyPicker>,
    ), With<Player>>();
    for (mut position, velocity, picker) in players.iter_mut(world) {
        position.xy = to;
        if let Some(mut velocity) = velocity {
            velocity.0 = Vec2::ZERO;
        }
        if let Some(mut picker) = picker {
            picker.has_key = false;
        }
    }
}

/// Replace whatever floor is built with floor number `floor` from `seed`
pub fn load_floor(world: &mut World, floor: u32, seed: u64) -> Result<(), FloorError> {
    let params = world
        .get_resource::<SimulationConfig>()
        .map(|c| c.generation.clone())
        .unwrap_or_default();
    let generated = generate(&params, seed)?;
    check_enemy_ids(world, &generated)?;

    let removed = teardown_floor(world);
    let spawned = spawn_floor(world, &generated)?;
    relocate_players(world, generated.map.spawn.center());

    let fingerprint = generated.fingerprint();
    info!(
        floor,
        seed,
        next_seed = generated.map.next_seed,
        removed,
        spawned,
        fingerprint = %fingerprint,
        "floor loaded"
    );
    world.insert_resource(ActiveFloor {
        floor,
        seed,
        next_seed: generated.map.next_seed,
        fingerprint,
        map: generated.map,
    });
    world.insert_resource(PendingFloorChange(false));
    world.send_event(FloorChanged { floor, seed });
    Ok(())
}

/// Advance to the next floor, or build the first one from the configured seed.
/// Returns the new floor number.
pub fn change_floor(world: &mut World) -> Result<u32, FloorError> {
    let (floor, seed) = match world.get_resource::<ActiveFloor>() {
        Some(active) => (active.floor + 1, active.next_seed),
        None => (
            1,
            world
                .get_resource::<SimulationConfig>()
                .map(|c| c.seed)
                .unwrap_or_else(|| SimulationConfig::default().seed),
        ),
    };
    load_floor(world, floor, seed)?;
    Ok(floor)
}

/// Apply a floor change raised during the last tick, if any
pub fn apply_pending_floor_change(world: &mut World) -> Option<Result<u32, FloorError>> {
    let pending = world
        .get_resource::<PendingFloorChange>()
        .is_some_and(|p| p.0);
    pending.then(|| change_floor(world))
}
