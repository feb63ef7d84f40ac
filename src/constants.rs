//! Centralized gameplay constants.
//!
//! Tunables that designers change per run (room sizes, mob densities, death
//! animation length) live in `engine::config`. These are the fixed numbers of
//! the simulation itself.

// =====================================================
// Depth layers (draw order only, never physics)
// =====================================================

pub const Z_PARTICLE: f32 = 1.0;
pub const Z_PLAYER: f32 = 2.0;
pub const Z_ENEMY: f32 = 3.0;
pub const Z_UTILITY: f32 = 4.0;
pub const Z_TERRAIN: f32 = 5.0;
pub const Z_BACKGROUND: f32 = 6.0;

// =====================================================
// Procedural Generation
// =====================================================

/// Candidate rooms sampled before giving up on one room
pub const MAX_ROOM_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Wall border added around a room interior (one tile per side)
pub const ROOM_BORDER: i32 = 2;

/// Smallest interior a room may have so the boss door never lands on a corner
pub const MIN_ROOM_INTERIOR: i32 = 3;

// =====================================================
// Combat
// =====================================================

pub const SPELL_SLOT_COUNT: usize = 4;

/// Points sampled along the enemy -> player segment for line of sight
pub const LINE_OF_SIGHT_SAMPLES: u32 = 10;

/// Half extent of the probe box tested at each line-of-sight sample
pub const LINE_OF_SIGHT_PROBE: f32 = 0.005;

/// Controller axis shorter than this counts as no movement
pub const MIN_AXIS_LENGTH: f32 = 0.01;

/// Spells spawn this fraction of the aim vector in front of the caster
pub const SPELL_SPAWN_OFFSET: f32 = 0.5;

pub const HIT_MARKER_PARTICLES: u32 = 10;
pub const HIT_MARKER_LIFETIME_MS: u64 = 600;
pub const HIT_MARKER_SPEED: f32 = 2.0;

pub const LEVEL_UP_PARTICLES: u32 = 16;
pub const LEVEL_UP_LIFETIME_MS: u64 = 900;

// =====================================================
// Progression
// =====================================================

/// xp_require grows by 6/5 (x1.2, rounded up) on every level up
pub const XP_GROWTH_NUMERATOR: u64 = 6;
pub const XP_GROWTH_DENOMINATOR: u64 = 5;

pub const STARTING_XP_REQUIRE: u32 = 10;

// =====================================================
// Entities
// =====================================================

pub const PLAYER_SCALE: [f32; 2] = [1.5, 2.5];
pub const PLAYER_HITBOX: [f32; 2] = [0.6, 0.8];
pub const KEY_SIZE: [f32; 2] = [0.5, 0.5];
pub const RETICLE_DISTANCE: f32 = 1.5;
pub const RETICLE_SIZE: [f32; 2] = [0.4, 0.4];
