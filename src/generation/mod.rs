//! Seeded dungeon floor generation.
//!
//! `generate(params, seed)` is a pure function: the same parameters and seed
//! give the same tiles, the same enemy placements and the same next seed.
//! Turning the result into entities is the floor manager's job.

pub mod floor_manager;
mod layout;
mod population;

use std::collections::BTreeMap;

use bevy::prelude::*;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use tracing::info;

use crate::constants::{MIN_ROOM_INTERIOR, ROOM_BORDER};
use crate::error::GenerationError;
use crate::logging::TimingSpan;
use crate::tilemap::{Side, TileKind, TilemapBuilder};

pub use floor_manager::FloorPlugin;

/// Generation tunables. Sizes are interior sizes; the wall border is added on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorGenParams {
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub min_room_count: i32,
    pub max_room_count: i32,
    pub max_dungeon_width: i32,
    pub max_dungeon_height: i32,
    pub min_corridor_width: i32,
    pub max_corridor_width: i32,
    /// Per-tile spawn chance by enemy id. Ordered so rolls are reproducible.
    pub mob_density: BTreeMap<String, f32>,
    pub boss: String,
}

impl Default for FloorGenParams {
    fn default() -> Self {
        Self {
            min_room_size: 7,
            max_room_size: 15,
            min_room_count: 5,
            max_room_count: 10,
            max_dungeon_width: 50,
            max_dungeon_height: 50,
            min_corridor_width: 3,
            max_corridor_width: 4,
            mob_density: BTreeMap::from([
                ("skeleton".to_string(), 0.03),
                ("electric_skeleton".to_string(), 0.02),
            ]),
            boss: "dark_skeleton".to_string(),
        }
    }
}

impl FloorGenParams {
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |msg: String| Err(GenerationError::InvalidParameters(msg));

        if self.min_room_size < MIN_ROOM_INTERIOR {
            return invalid(format!(
                "min_room_size {} is below {MIN_ROOM_INTERIOR}",
                self.min_room_size
            ));
        }
        if self.max_room_size < self.min_room_size {
            return invalid(format!(
                "max_room_size {} < min_room_size {}",
                self.max_room_size, self.min_room_size
            ));
        }
        if self.min_room_count < 2 {
            return invalid(format!(
                "min_room_count {} leaves no room for both spawn and boss",
                self.min_room_count
            ));
        }
        if self.max_room_count < self.min_room_count {
            return invalid(format!(
                "max_room_count {} < min_room_count {}",
                self.max_room_count, self.min_room_count
            ));
        }
        let largest = self.max_room_size + ROOM_BORDER;
        if largest >= self.max_dungeon_width || largest >= self.max_dungeon_height {
            return invalid(format!(
                "rooms up to {largest} tiles do not fit a {}x{} dungeon",
                self.max_dungeon_width, self.max_dungeon_height
            ));
        }
        if self.min_corridor_width < 1 || self.max_corridor_width < self.min_corridor_width {
            return invalid(format!(
                "corridor width range {}..={} is empty",
                self.min_corridor_width, self.max_corridor_width
            ));
        }
        if let Some((id, density)) = self
            .mob_density
            .iter()
            .find(|(_, d)| !d.is_finite() || **d <= 0.0)
        {
            return invalid(format!("mob density {density} for '{id}' must be positive"));
        }
        if self.boss.is_empty() {
            return invalid("boss id is empty".to_string());
        }
        Ok(())
    }
}

/// Tile rectangle of a room, wall border included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn intersects(&self, other: &Room) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }

    /// The walkable part, one tile in from each side
    pub fn interior(&self) -> Room {
        Room::new(self.x + 1, self.y + 1, self.w - 2, self.h - 2)
    }

    /// Geometric centre in world units
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.w as f32 * 0.5,
            self.y as f32 + self.h as f32 * 0.5,
        )
    }

    /// Tiles of the border on `side`, corners excluded
    pub fn border(&self, side: Side) -> Vec<(i32, i32)> {
        let (left, right) = (self.x, self.x + self.w - 1);
        let (top, bottom) = (self.y, self.y + self.h - 1);
        match side {
            Side::North => (left + 1..right).map(|x| (x, top)).collect(),
            Side::South => (left + 1..right).map(|x| (x, bottom)).collect(),
            Side::West => (top + 1..bottom).map(|y| (left, y)).collect(),
            Side::East => (top + 1..bottom).map(|y| (right, y)).collect(),
        }
    }
}

/// Room layout of one floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    pub spawn: Room,
    /// Boss room after the exit door shrank it
    pub boss: Room,
    pub rooms: Vec<Room>,
    pub exit_door: (i32, i32),
    pub exit_side: Side,
    pub next_seed: u64,
}

impl MapData {
    /// Spawn, regular rooms, boss, in placement order
    pub fn all_rooms(&self) -> impl Iterator<Item = &Room> {
        std::iter::once(&self.spawn)
            .chain(self.rooms.iter())
            .chain(std::iter::once(&self.boss))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len() + 2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    pub id: String,
    pub position: Vec2,
}

/// Everything one floor needs before it becomes entities
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFloor {
    pub seed: u64,
    pub tiles: TilemapBuilder,
    pub map: MapData,
    pub enemies: Vec<EnemySpawn>,
    pub boss: EnemySpawn,
}

impl GeneratedFloor {
    /// SHA3-256 of the tile grid and every enemy placement, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha3_256::new();
        hasher.update(self.tiles.width().to_le_bytes());
        hasher.update(self.tiles.height().to_le_bytes());
        for tile in self.tiles.tiles() {
            hasher.update([tile_code(*tile)]);
        }
        for spawn in self.enemies.iter().chain(std::iter::once(&self.boss)) {
            hasher.update(spawn.id.as_bytes());
            hasher.update(spawn.position.x.to_le_bytes());
            hasher.update(spawn.position.y.to_le_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

fn tile_code(kind: TileKind) -> u8 {
    match kind {
        TileKind::None => 0,
        TileKind::Reserved => 1,
        TileKind::DebugTile => 2,
        TileKind::Wall => 3,
        TileKind::ExitDoor(Side::North) => 4,
        TileKind::ExitDoor(Side::East) => 5,
        TileKind::ExitDoor(Side::South) => 6,
        TileKind::ExitDoor(Side::West) => 7,
        TileKind::FloorCorridor => 8,
        TileKind::FloorSpawn => 9,
        TileKind::FloorBossRoom => 10,
        TileKind::FloorNormalRoom => 11,
    }
}

/// Uniform in `[lo, hi)`; an empty range yields `lo`
pub(crate) fn rand_range(rng: &mut impl Rng, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..hi)
    }
}

/// Generate one floor
pub fn generate(params: &FloorGenParams, seed: u64) -> Result<GeneratedFloor, GenerationError> {
    params.validate()?;
    let _span = TimingSpan::new("generate_floor");
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut tiles = TilemapBuilder::new(params.max_dungeon_width, params.max_dungeon_height);
    let placed = layout::place_rooms(&mut tiles, params, &mut rng);
    let (spawn, boss_rect, regular) = match placed.as_slice() {
        [spawn, regular @ .., boss] => (*spawn, *boss, regular.to_vec()),
        _ => {
            return Err(GenerationError::TooFewRooms {
                placed: placed.len(),
                width: params.max_dungeon_width,
                height: params.max_dungeon_height,
            })
        }
    };

    layout::paint_room(&mut tiles, &spawn, TileKind::FloorSpawn);
    for room in &regular {
        layout::paint_room(&mut tiles, room, TileKind::FloorNormalRoom);
    }
    let door = layout::place_exit_door(&mut tiles, boss_rect)?;
    layout::paint_room(&mut tiles, &door.room, TileKind::FloorBossRoom);
    layout::build_walls(&mut tiles);

    let enemies = population::populate_rooms(&mut rng, params, &regular);
    let boss = EnemySpawn {
        id: params.boss.clone(),
        position: door.room.center(),
    };
    let next_seed = rng.next_u64();

    let floor = GeneratedFloor {
        seed,
        tiles,
        map: MapData {
            spawn,
            boss: door.room,
            rooms: regular,
            exit_door: door.position,
            exit_side: door.side,
            next_seed,
        },
        enemies,
        boss,
    };
    info!(
        seed,
        rooms = floor.map.room_count(),
        enemies = floor.enemies.len(),
        next_seed,
        "floor generated"
    );
    Ok(floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> FloorGenParams {
        FloorGenParams {
            min_room_size: 3,
            max_room_size: 5,
            min_room_count: 3,
            max_room_count: 4,
            max_dungeon_width: 30,
            max_dungeon_height: 30,
            min_corridor_width: 1,
            max_corridor_width: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(FloorGenParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let cases = [
            FloorGenParams {
                min_room_size: 2,
                ..Default::default()
            },
            FloorGenParams {
                max_room_size: 6,
                ..Default::default()
            },
            FloorGenParams {
                min_room_count: 1,
                ..Default::default()
            },
            FloorGenParams {
                max_room_count: 4,
                ..Default::default()
            },
            FloorGenParams {
                max_dungeon_width: 17,
                ..Default::default()
            },
            FloorGenParams {
                min_corridor_width: 0,
                ..Default::default()
            },
            FloorGenParams {
                mob_density: BTreeMap::from([("skeleton".to_string(), 0.0)]),
                ..Default::default()
            },
        ];
        for params in cases {
            assert!(
                matches!(params.validate(), Err(GenerationError::InvalidParameters(_))),
                "{params:?}"
            );
        }
    }

    #[test]
    fn test_rand_range_empty_is_lower_bound() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(rand_range(&mut rng, 5, 5), 5);
        assert_eq!(rand_range(&mut rng, 5, 2), 5);
        for _ in 0..100 {
            let v = rand_range(&mut rng, 0, 3);
            assert!((0..3).contains(&v));
        }
    }

    #[test]
    fn test_room_geometry() {
        let a = Room::new(0, 0, 5, 5);
        assert!(a.intersects(&Room::new(4, 4, 3, 3)));
        assert!(!a.intersects(&Room::new(5, 0, 3, 3)));
        assert_eq!(a.interior(), Room::new(1, 1, 3, 3));
        assert_eq!(a.center(), Vec2::new(2.5, 2.5));
        assert_eq!(a.border(Side::North), vec![(1, 0), (2, 0), (3, 0)]);
        assert_eq!(a.border(Side::East), vec![(4, 1), (4, 2), (4, 3)]);
    }

    #[test]
    fn test_same_seed_same_floor() {
        let params = small_params();
        let a = generate(&params, 7).unwrap();
        let b = generate(&params, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_exactly_one_door_on_boss_border() {
        let floor = generate(&small_params(), 3).unwrap();
        let doors = floor
            .tiles
            .positions(|t| matches!(t, TileKind::ExitDoor(_)));
        assert_eq!(doors.len(), 1);
        assert_eq!(doors[0], floor.map.exit_door);
        assert!(floor.map.boss.border(floor.map.exit_side).contains(&doors[0]));
    }

    #[test]
    fn test_boss_spawn_at_boss_room_center() {
        let floor = generate(&small_params(), 11).unwrap();
        assert_eq!(floor.boss.id, "dark_skeleton");
        assert_eq!(floor.boss.position, floor.map.boss.center());
    }

    #[test]
    fn test_cramped_dungeon_reports_too_few_rooms() {
        let params = FloorGenParams {
            min_room_size: 3,
            max_room_size: 3,
            min_room_count: 2,
            max_room_count: 2,
            max_dungeon_width: 6,
            max_dungeon_height: 6,
            min_corridor_width: 1,
            max_corridor_width: 1,
            ..Default::default()
        };
        assert_eq!(
            generate(&params, 0).unwrap_err(),
            GenerationError::TooFewRooms {
                placed: 1,
                width: 6,
                height: 6
            }
        );
    }
}
