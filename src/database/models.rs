//! Reference data records. Durations are authored in seconds.

use std::time::Duration;

use bevy::prelude::Vec2;
use serde::{Deserialize, Serialize};

/// Seconds as authored in data files, converted without panicking on bad input
pub fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or_default()
}

/// A purchasable character class. Children become purchasable once owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub asset: String,
    #[serde(default)]
    pub starter: bool,
    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub health: f32,
    #[serde(default)]
    pub damage: f32,
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub cost: u32,
    /// Full width/height of the replacement solid hitbox
    pub hitbox: [f32; 2],
    #[serde(default)]
    pub children: Vec<String>,
}

impl ClassDef {
    pub fn hitbox_size(&self) -> Vec2 {
        Vec2::from(self.hitbox)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    #[serde(default)]
    pub name: String,
    pub asset: String,
    pub health: f32,
    pub speed: f32,
    #[serde(default)]
    pub damage: f32,
    pub hitbox: [f32; 2],
    pub scale: [f32; 2],
    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub is_boss: bool,
    pub view_range: f32,
    pub attack_range: f32,
    #[serde(default)]
    pub experience: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellKind {
    /// Travels, deals its damage on the first hit and is destroyed
    Projectile,
    /// Lingers for its lifetime and only applies its effects
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDef {
    #[serde(default)]
    pub name: String,
    pub kind: SpellKind,
    #[serde(default)]
    pub damage: f32,
    /// Seconds between two casts
    pub cooldown: f32,
    /// Seconds the spell entity exists
    pub lifetime: f32,
    #[serde(default)]
    pub speed: f32,
    pub hitbox: [f32; 2],
    #[serde(default)]
    pub effects: Vec<String>,
}

impl SpellDef {
    pub fn cooldown(&self) -> Duration {
        seconds(self.cooldown)
    }

    pub fn lifetime(&self) -> Duration {
        seconds(self.lifetime)
    }

    pub fn is_projectile(&self) -> bool {
        self.kind == SpellKind::Projectile
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    /// Damage applied every cooldown interval
    Dot { damage: f32 },
    /// Divides the victim's speed while active
    Slow { strength: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDef {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: EffectKind,
    /// Seconds between two applications
    pub cooldown: f32,
    /// Total seconds the effect stays active
    pub lifetime: f32,
}

impl EffectDef {
    pub fn cooldown(&self) -> Duration {
        seconds(self.cooldown)
    }

    pub fn lifetime(&self) -> Duration {
        seconds(self.lifetime)
    }
}
