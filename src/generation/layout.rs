//! Room placement, corridor carving, exit door and wall pass.

use rand::Rng;
use tracing::{debug, warn};

use super::{rand_range, FloorGenParams, Room};
use crate::constants::{MAX_ROOM_PLACEMENT_ATTEMPTS, ROOM_BORDER};
use crate::error::GenerationError;
use crate::tilemap::{Side, TileKind, TilemapBuilder};

/// Place rooms one by one, carving a corridor from each room to the next.
/// Interiors are left `Reserved`. Returns the rooms in placement order.
pub(super) fn place_rooms(
    tiles: &mut TilemapBuilder,
    params: &FloorGenParams,
    rng: &mut impl Rng,
) -> Vec<Room> {
    let count = rand_range(rng, params.min_room_count, params.max_room_count);
    let mut rooms: Vec<Room> = Vec::with_capacity(count.max(0) as usize);

    for index in 0..count {
        let Some(room) = sample_room(tiles, params, &rooms, rng) else {
            warn!(
                placed = rooms.len(),
                requested = count,
                "no space left for room {index}, keeping a smaller floor"
            );
            break;
        };

        let interior = room.interior();
        tiles.fill(interior.x, interior.y, interior.w, interior.h, TileKind::Reserved);
        if let Some(previous) = rooms.last() {
            carve_corridor(tiles, params, previous, &room, rng);
        }
        rooms.push(room);
    }
    rooms
}

fn sample_room(
    tiles: &TilemapBuilder,
    params: &FloorGenParams,
    placed: &[Room],
    rng: &mut impl Rng,
) -> Option<Room> {
    for _ in 0..MAX_ROOM_PLACEMENT_ATTEMPTS {
        let w = rand_range(
            rng,
            params.min_room_size + ROOM_BORDER,
            params.max_room_size + ROOM_BORDER + 1,
        );
        let h = rand_range(
            rng,
            params.min_room_size + ROOM_BORDER,
            params.max_room_size + ROOM_BORDER + 1,
        );
        let x = rand_range(rng, 0, tiles.width() - w);
        let y = rand_range(rng, 0, tiles.height() - h);
        let room = Room::new(x, y, w, h);

        if is_free(tiles, &room) && !placed.iter().any(|other| other.intersects(&room)) {
            return Some(room);
        }
    }
    None
}

/// Every tile of the rectangle is inside the grid and untouched
fn is_free(tiles: &TilemapBuilder, room: &Room) -> bool {
    (room.y..room.y + room.h).all(|y| {
        (room.x..room.x + room.w).all(|x| tiles.in_bounds(x, y) && tiles.get(x, y) == TileKind::None)
    })
}

/// Middle of `[a, b)`. Even spans have two middles; pick one at random.
fn center_of(rng: &mut impl Rng, a: i32, b: i32) -> i32 {
    let mid = (a + b) / 2;
    if (b - a) % 2 == 0 && rng.gen_bool(0.5) {
        mid - 1
    } else {
        mid
    }
}

/// L-shaped corridor between two room centres
fn carve_corridor(
    tiles: &mut TilemapBuilder,
    params: &FloorGenParams,
    from: &Room,
    to: &Room,
    rng: &mut impl Rng,
) {
    let vertical_first = rng.gen_bool(0.5);
    let width = corridor_width(rng, params, corridor_fit(from, to, vertical_first));

    let (ax, ay) = (center_of(rng, from.x, from.x + from.w), center_of(rng, from.y, from.y + from.h));
    let (bx, by) = (center_of(rng, to.x, to.x + to.w), center_of(rng, to.y, to.y + to.h));
    let offset = center_of(rng, 0, width);

    if vertical_first {
        carve_vertical(tiles, ax - offset, ay, by, width);
        carve_horizontal(tiles, by - offset, ax, bx, width);
    } else {
        carve_horizontal(tiles, ay - offset, ax, bx, width);
        carve_vertical(tiles, bx - offset, ay, by, width);
    }
    debug!(from = ?(ax, ay), to = ?(bx, by), width, vertical_first, "corridor carved");
}

/// Widest band that stays inside both rooms: the first leg runs across
/// `from`, the second across `to`
fn corridor_fit(from: &Room, to: &Room, vertical_first: bool) -> i32 {
    if vertical_first {
        (from.h - 3).min(to.w - 3)
    } else {
        (from.w - 3).min(to.h - 3)
    }
}

fn corridor_width(rng: &mut impl Rng, params: &FloorGenParams, fit: i32) -> i32 {
    rand_range(
        rng,
        fit.min(params.min_corridor_width),
        (fit + 1).min(params.max_corridor_width + 1),
    )
    .max(1)
}

/// Band of columns `[left, left + width)` from row `from` toward row `to`, `to` excluded
fn carve_vertical(tiles: &mut TilemapBuilder, left: i32, from: i32, to: i32, width: i32) {
    let step = if to >= from { 1 } else { -1 };
    let mut y = from;
    while y != to {
        for x in left..left + width {
            carve(tiles, x, y);
        }
        y += step;
    }
}

/// Band of rows `[top, top + width)` from column `from` toward column `to`, `to` excluded
fn carve_horizontal(tiles: &mut TilemapBuilder, top: i32, from: i32, to: i32, width: i32) {
    let step = if to >= from { 1 } else { -1 };
    let mut x = from;
    while x != to {
        for y in top..top + width {
            carve(tiles, x, y);
        }
        x += step;
    }
}

fn carve(tiles: &mut TilemapBuilder, x: i32, y: i32) {
    if tiles.is_inner(x, y) && tiles.get(x, y) == TileKind::None {
        tiles.set(x, y, TileKind::FloorCorridor);
    }
}

/// Fill the interior of `room` with `kind`
pub(super) fn paint_room(tiles: &mut TilemapBuilder, room: &Room, kind: TileKind) {
    let interior = room.interior();
    tiles.fill(interior.x, interior.y, interior.w, interior.h, kind);
}

pub(super) struct ExitDoor {
    /// Boss room shrunk by one tile on the door side
    pub room: Room,
    pub side: Side,
    pub position: (i32, i32),
}

/// Put the exit door on the boss room side facing away from its entrance.
///
/// The entrance is the first side (N, S, W, E) whose border touches floor.
/// The door takes the opposite side when it is clear, else the first clear
/// side. The room shrinks by one on that side and the door sits in the middle
/// of the new border, so the interior paint cannot cover it.
pub(super) fn place_exit_door(
    tiles: &mut TilemapBuilder,
    boss: Room,
) -> Result<ExitDoor, GenerationError> {
    let touched = |side: Side| {
        boss.border(side)
            .into_iter()
            .any(|(x, y)| tiles.get(x, y).is_floor())
    };
    let clear: Vec<Side> = Side::ALL.into_iter().filter(|s| !touched(*s)).collect();
    let entrance = Side::ALL.into_iter().find(|s| touched(*s));

    let side = match entrance {
        None => Side::North,
        Some(entrance) if clear.contains(&entrance.opposite()) => entrance.opposite(),
        Some(_) => *clear.first().ok_or(GenerationError::ExitDoorPlacement {
            x: boss.x,
            y: boss.y,
        })?,
    };

    let mut room = boss;
    match side {
        Side::North => {
            room.y += 1;
            room.h -= 1;
        }
        Side::South => room.h -= 1,
        Side::West => {
            room.x += 1;
            room.w -= 1;
        }
        Side::East => room.w -= 1,
    }

    let position = match side {
        Side::North => (room.x + room.w / 2, room.y),
        Side::South => (room.x + room.w / 2, room.y + room.h - 1),
        Side::West => (room.x, room.y + room.h / 2),
        Side::East => (room.x + room.w - 1, room.y + room.h / 2),
    };
    tiles.set(position.0, position.1, TileKind::ExitDoor(side));
    debug!(?side, ?position, "exit door placed");

    Ok(ExitDoor {
        room,
        side,
        position,
    })
}

/// Every empty or leftover reserved tile next to floor (8-connected) becomes wall
pub(super) fn build_walls(tiles: &mut TilemapBuilder) {
    let candidates =
        tiles.positions(|t| matches!(t, TileKind::None | TileKind::Reserved));
    for (x, y) in candidates {
        let near_floor = (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .any(|(dx, dy)| (dx, dy) != (0, 0) && tiles.get(x + dx, y + dy).is_floor());
        if near_floor {
            tiles.set(x, y, TileKind::Wall);
        }
    }
}
