//! Indexed 2D tile buffer shared by the generator and the floor builder.
//!
//! Coordinates are tile indices with `(0, 0)` the top-left corner; `y` grows
//! southward. Reads outside the grid return [`TileKind::None`] and writes
//! outside are ignored.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::factory::{self, SpawnRequest};

/// Side of a room, or the direction an exit door faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::West, Side::East];

    pub fn opposite(self) -> Self {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
            Side::East => Side::West,
            Side::West => Side::East,
        }
    }

    /// Sprite rotation of a door facing this way, in degrees
    pub fn rotation(self) -> f32 {
        match self {
            Side::North => 0.0,
            Side::East => 90.0,
            Side::South => 180.0,
            Side::West => 270.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    None,
    /// Room interior claimed during placement, before its floor is assigned
    Reserved,
    DebugTile,
    Wall,
    ExitDoor(Side),
    FloorCorridor,
    FloorSpawn,
    FloorBossRoom,
    FloorNormalRoom,
}

impl TileKind {
    /// Walkable floor. Doors are not floor.
    pub fn is_floor(self) -> bool {
        matches!(
            self,
            TileKind::FloorCorridor
                | TileKind::FloorSpawn
                | TileKind::FloorBossRoom
                | TileKind::FloorNormalRoom
        )
    }

    /// Whether the tile becomes an entity
    pub fn is_buildable(self) -> bool {
        !matches!(self, TileKind::None | TileKind::Reserved)
    }

    /// Tiles that may be merged with equal neighbours into one rectangle
    fn is_mergeable(self) -> bool {
        !matches!(self, TileKind::ExitDoor(_))
    }
}

/// A rectangle of identical tiles, produced by [`TilemapBuilder::merged_rects`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub kind: TileKind,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl TileRect {
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.w as f32 * 0.5,
            self.y as f32 + self.h as f32 * 0.5,
        )
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w as f32, self.h as f32)
    }

    pub fn area(&self) -> i32 {
        self.w * self.h
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilemapBuilder {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
}

impl TilemapBuilder {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![TileKind::None; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Inside the grid and not on its outermost ring
    pub fn is_inner(&self, x: i32, y: i32) -> bool {
        x > 0 && y > 0 && x < self.width - 1 && y < self.height - 1
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> TileKind {
        self.index(x, y)
            .map(|i| self.tiles[i])
            .unwrap_or(TileKind::None)
    }

    pub fn set(&mut self, x: i32, y: i32, kind: TileKind) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = kind;
        }
    }

    /// Fill the inclusive-exclusive rectangle `[x, x+w) x [y, y+h)`
    pub fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, kind: TileKind) {
        for ty in y..y + h {
            for tx in x..x + w {
                self.set(tx, ty, kind);
            }
        }
    }

    /// Row-major raw tiles
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| **t == kind).count()
    }

    /// Coordinates of every tile matching `pred`, row-major
    pub fn positions(&self, pred: impl Fn(TileKind) -> bool) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if pred(self.get(x, y)) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// Greedy rectangle decomposition of the buildable tiles: extend a run
    /// along x, then grow it down while whole rows match. Doors stay 1x1.
    pub fn merged_rects(&self) -> Vec<TileRect> {
        let mut remaining = self.tiles.clone();
        let at = |buf: &[TileKind], x: i32, y: i32| buf[(y * self.width + x) as usize];
        let mut rects = Vec::new();

        for y in 0..self.height {
            for x in 0..self.width {
                let kind = at(&remaining, x, y);
                if !kind.is_buildable() {
                    continue;
                }

                let mut w = 1;
                let mut h = 1;
                if kind.is_mergeable() {
                    while x + w < self.width && at(&remaining, x + w, y) == kind {
                        w += 1;
                    }
                    while y + h < self.height
                        && (x..x + w).all(|tx| at(&remaining, tx, y + h) == kind)
                    {
                        h += 1;
                    }
                }

                for ty in y..y + h {
                    for tx in x..x + w {
                        remaining[(ty * self.width + tx) as usize] = TileKind::None;
                    }
                }
                rects.push(TileRect { kind, x, y, w, h });
            }
        }
        rects
    }

    /// Turn every buildable tile into a terrain entity, one per merged rectangle
    pub fn build(&self, world: &mut World) -> Result<Vec<Entity>, DatabaseError> {
        self.merged_rects()
            .into_iter()
            .map(|rect| factory::create(world, SpawnRequest::Tile { rect }))
            .collect()
    }
}
