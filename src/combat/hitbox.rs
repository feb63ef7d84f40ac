//! Axis-aligned hitboxes and health.
//!
//! Hitboxes are half extents centred on the entity position. Solid hitboxes
//! block movement; float hitboxes only report overlap (spells, pickups).

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HitboxSolid {
    pub half_extents: Vec2,
}

impl HitboxSolid {
    /// From a full width/height
    pub fn from_size(size: Vec2) -> Self {
        Self {
            half_extents: size * 0.5,
        }
    }

    pub fn at(&self, center: Vec2) -> Aabb {
        Aabb::new(center, self.half_extents)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HitboxFloat {
    pub half_extents: Vec2,
}

impl HitboxFloat {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            half_extents: size * 0.5,
        }
    }

    pub fn at(&self, center: Vec2) -> Aabb {
        Aabb::new(center, self.half_extents)
    }
}

/// A placed box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Strict overlap: boxes sharing only an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x < reach.x && d.y < reach.y
    }

    /// Inclusive overlap: touching edges count
    pub fn touches(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x <= reach.x && d.y <= reach.y
    }
}

/// Component tracking health. `current` may go below zero; the kill is
/// processed once, the first time it reaches zero or less.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount;
    }
}
