//! Floor generation invariants
//!
//! - Scenario: seed 42 with exactly five rooms requested
//! - Determinism of tiles, enemies and next seed
//! - Rooms never overlap, every room is reachable from the spawn room
//! - Exactly one exit door, on the boss room border
//! - Floor is sealed by walls

use std::collections::{HashSet, VecDeque};

use dungeon_core::generation::{generate, FloorGenParams, GeneratedFloor, Room};
use dungeon_core::tilemap::TileKind;

fn five_rooms() -> FloorGenParams {
    FloorGenParams {
        min_room_count: 5,
        max_room_count: 5,
        max_dungeon_width: 50,
        max_dungeon_height: 50,
        ..Default::default()
    }
}

/// Floor tiles reachable from the spawn room, 4-connected
fn reachable(floor: &GeneratedFloor) -> HashSet<(i32, i32)> {
    let start = floor.map.spawn.interior();
    let start = (start.x, start.y);
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = (x + dx, y + dy);
            if floor.tiles.get(next.0, next.1).is_floor() && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn interior_tiles(room: &Room) -> Vec<(i32, i32)> {
    let inner = room.interior();
    (inner.y..inner.y + inner.h)
        .flat_map(|y| (inner.x..inner.x + inner.w).map(move |x| (x, y)))
        .collect()
}

// ============================================================
// Scenario
// ============================================================

#[test]
fn test_seed_42_places_five_rooms() {
    let floor = generate(&five_rooms(), 42).unwrap();
    assert_eq!(floor.map.room_count(), 5);
    assert_eq!(floor.map.rooms.len(), 3);

    let rooms: Vec<Room> = floor.map.all_rooms().copied().collect();
    assert_eq!(rooms.first(), Some(&floor.map.spawn));
    assert_eq!(rooms.last(), Some(&floor.map.boss));
    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn test_room_interiors_carry_their_floor_kind() {
    let floor = generate(&five_rooms(), 42).unwrap();
    for (x, y) in interior_tiles(&floor.map.spawn) {
        assert_eq!(floor.tiles.get(x, y), TileKind::FloorSpawn);
    }
    for room in &floor.map.rooms {
        for (x, y) in interior_tiles(room) {
            assert_eq!(floor.tiles.get(x, y), TileKind::FloorNormalRoom);
        }
    }
    for (x, y) in interior_tiles(&floor.map.boss) {
        assert_eq!(floor.tiles.get(x, y), TileKind::FloorBossRoom);
    }
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn test_generation_is_deterministic() {
    let params = FloorGenParams::default();
    for seed in [0, 1, 42, u64::MAX] {
        let a = generate(&params, seed).unwrap();
        let b = generate(&params, seed).unwrap();
        assert_eq!(a.tiles.tiles(), b.tiles.tiles());
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.map.next_seed, b.map.next_seed);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}

#[test]
fn test_different_seeds_differ() {
    let params = FloorGenParams::default();
    let a = generate(&params, 1).unwrap();
    let b = generate(&params, 2).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}

// ============================================================
// Structure
// ============================================================

#[test]
fn test_every_room_reachable_from_spawn() {
    let params = FloorGenParams::default();
    for seed in 0..20 {
        let floor = generate(&params, seed).unwrap();
        let seen = reachable(&floor);
        for room in floor.map.all_rooms() {
            assert!(
                interior_tiles(room).iter().all(|t| seen.contains(t)),
                "seed {seed}: {room:?} not reachable"
            );
        }
        let floor_tiles = floor.tiles.positions(TileKind::is_floor);
        assert_eq!(seen.len(), floor_tiles.len(), "seed {seed}: isolated floor");
    }
}

#[test]
fn test_single_exit_door_on_boss_border() {
    for seed in 0..20 {
        let floor = generate(&FloorGenParams::default(), seed).unwrap();
        let doors = floor
            .tiles
            .positions(|t| matches!(t, TileKind::ExitDoor(_)));
        assert_eq!(doors.len(), 1, "seed {seed}");
        assert_eq!(
            floor.tiles.get(doors[0].0, doors[0].1),
            TileKind::ExitDoor(floor.map.exit_side)
        );
        assert!(floor.map.boss.border(floor.map.exit_side).contains(&doors[0]));
    }
}

#[test]
fn test_floor_is_sealed_by_walls() {
    let floor = generate(&FloorGenParams::default(), 42).unwrap();
    for (x, y) in floor.tiles.positions(TileKind::is_floor) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let neighbour = floor.tiles.get(x + dx, y + dy);
                assert!(
                    !matches!(neighbour, TileKind::None | TileKind::Reserved),
                    "open edge next to ({x}, {y})"
                );
            }
        }
    }
}

#[test]
fn test_enemies_stand_on_regular_room_floor() {
    let floor = generate(&FloorGenParams::default(), 42).unwrap();
    for enemy in &floor.enemies {
        let (x, y) = (enemy.position.x.floor() as i32, enemy.position.y.floor() as i32);
        assert_eq!(floor.tiles.get(x, y), TileKind::FloorNormalRoom);
        assert!(floor.map.rooms.iter().any(|r| r.interior().contains(x, y)));
    }
    assert_eq!(floor.boss.position, floor.map.boss.center());
}
