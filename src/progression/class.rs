//! Class purchase.
//!
//! Buying a class is a validated batch: [`plan_purchase`] performs every
//! lookup and precondition check against an immutable world and produces the
//! full stat delta; [`commit_purchase`] then writes it and cannot fail. A
//! rejected purchase leaves the player untouched.

use bevy::prelude::*;
use tracing::info;

use super::{Classes, SkillPoints};
use crate::combat::cooldown::{SpellInstance, SpellSlots};
use crate::combat::hitbox::{Health, HitboxSolid};
use crate::combat::AttackDamage;
use crate::database::Databases;
use crate::error::ProgressionError;
use crate::movement::Speed;
use crate::visualization::SpriteSheet;
use crate::world::Player;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ClassPurchased {
    pub entity: Entity,
    pub class: String,
}

/// Checked stat delta for one class purchase
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPurchase {
    pub player: Entity,
    pub class: String,
    pub cost: u32,
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
    pub hitbox: Vec2,
    pub asset: String,
    pub spells: Vec<SpellInstance>,
}

/// Validate buying `name` for `player` without touching the world
pub fn plan_purchase(
    world: &World,
    player: Entity,
    name: &str,
) -> Result<ClassPurchase, ProgressionError> {
    if !has_stat_block(world, player) {
        return Err(ProgressionError::NotAPlayer);
    }
    let (Some(owned), Some(points)) = (world.get::<Classes>(player), world.get::<SkillPoints>(player))
    else {
        return Err(ProgressionError::NotAPlayer);
    };

    let db = world.resource::<Databases>();
    let class = db.class(name)?;
    if owned.owns(&class.name) {
        return Err(ProgressionError::AlreadyOwned(class.name.clone()));
    }
    if !db.is_unlocked(&class.name, &owned.0) {
        return Err(ProgressionError::NotUnlocked(class.name.clone()));
    }
    if points.0 < class.cost {
        return Err(ProgressionError::NotEnoughSkillPoints {
            available: points.0,
            required: class.cost,
        });
    }
    let spells = class
        .spells
        .iter()
        .map(|id| SpellInstance::new(id, db))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ClassPurchase {
        player,
        class: class.name.clone(),
        cost: class.cost,
        health: class.health,
        damage: class.damage,
        speed: class.speed,
        hitbox: class.hitbox_size(),
        asset: class.asset.clone(),
        spells,
    })
}

fn has_stat_block(world: &World, entity: Entity) -> bool {
    world.get::<Player>(entity).is_some()
        && world.get::<Health>(entity).is_some()
        && world.get::<AttackDamage>(entity).is_some()
        && world.get::<Speed>(entity).is_some()
        && world.get::<SpellSlots>(entity).is_some()
}

/// Write a planned purchase. Spells go into empty slots only; spells that do
/// not fit are dropped.
pub fn commit_purchase(world: &mut World, purchase: ClassPurchase) {
    let mut player = world.entity_mut(purchase.player);
    if let Some(mut health) = player.get_mut::<Health>() {
        health.max += purchase.health;
        health.current += purchase.health;
    }
    if let Some(mut damage) = player.get_mut::<AttackDamage>() {
        damage.0 += purchase.damage;
    }
    if let Some(mut speed) = player.get_mut::<Speed>() {
        speed.0 += purchase.speed;
    }
    if let Some(mut slots) = player.get_mut::<SpellSlots>() {
        slots.fill_empty(purchase.spells);
    }
    if let Some(mut points) = player.get_mut::<SkillPoints>() {
        points.0 = points.0.saturating_sub(purchase.cost);
    }
    if let Some(mut classes) = player.get_mut::<Classes>() {
        classes.0.push(purchase.class.clone());
    }
    player.insert((
        HitboxSolid::from_size(purchase.hitbox),
        SpriteSheet(purchase.asset),
    ));

    info!(entity = ?purchase.player, class = %purchase.class, "class purchased");
    world.send_event(ClassPurchased {
        entity: purchase.player,
        class: purchase.class,
    });
}

pub fn purchase_class(world: &mut World, player: Entity, name: &str) -> Result<(), ProgressionError> {
    let purchase = plan_purchase(world, player, name)?;
    commit_purchase(world, purchase);
    Ok(())
}

/// Classes `player` could buy next, ignoring skill points
pub fn available_classes(world: &World, player: Entity) -> Vec<String> {
    let owned = world
        .get::<Classes>(player)
        .map(|c| c.0.clone())
        .unwrap_or_default();
    world
        .resource::<Databases>()
        .purchasable_classes(&owned)
        .into_iter()
        .map(|class| class.name.clone())
        .collect()
}
