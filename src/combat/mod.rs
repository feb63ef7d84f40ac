//! Damage, death and the per-tick combat chain.
//!
//! Damage is applied through [`apply_damage`] only, which runs the death check
//! after every subtraction. [`kill`] fires at most once per entity: the
//! [`Dying`] marker it sets is never removed.

use bevy::prelude::*;
use rand::Rng;
use tracing::{debug, info, warn};

pub mod casting;
pub mod collision;
pub mod cooldown;
pub mod hitbox;
pub mod status;

use crate::engine::config::SimulationConfig;
use crate::engine::schedule::{GameTick, TickStage};
use crate::engine::SimulationRng;
use crate::events::{AppNotificationExt, SoundCue};
use crate::factory::{self, SpawnRequest};
use crate::gameflow::{self, GameState};
use crate::monster::ExperienceReward;
use crate::movement::{Position, Velocity};
use crate::progression;
use crate::world::{Boss, Dying, Lifetime, Player};
use hitbox::{Health, HitboxSolid};

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_notification::<DamageDealt>()
            .add_notification::<EntityKilled>()
            .add_systems(
                GameTick,
                (
                    cooldown::decay_cooldowns.in_set(TickStage::Cooldown),
                    casting::enemies_attack.in_set(TickStage::Attack),
                    (collision::resolve_spell_hits, collision::pick_up_keys)
                        .chain()
                        .in_set(TickStage::Collision),
                    status::tick_status_effects.in_set(TickStage::Effects),
                ),
            );
    }
}

/// Flat damage bonus added to every spell the entity casts
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct AttackDamage(pub f32);

/// Entity that cast a spell. May dangle once the caster is destroyed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caster(pub Entity);

/// What a spell does on contact
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SpellPayload {
    pub name: String,
    pub damage: f32,
    pub effects: Vec<String>,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub target: Entity,
    pub source: Entity,
    pub amount: f32,
    pub position: Vec2,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityKilled {
    pub entity: Entity,
    pub killer: Entity,
    pub position: Vec2,
    pub was_boss: bool,
}

/// Subtract `amount` from the target's health and run the death check.
/// Returns true when this call processed the kill.
pub fn apply_damage(world: &mut World, target: Entity, source: Entity, amount: f32) -> bool {
    let Some(mut health) = world.get_mut::<Health>(target) else {
        return false;
    };
    health.take_damage(amount);
    let dead = !health.is_alive();

    let position = position_of(world, target);
    world.send_event(DamageDealt {
        target,
        source,
        amount,
        position,
    });

    if dead && world.get::<Dying>(target).is_none() {
        kill(world, target, source);
        return true;
    }
    false
}

/// Process a death. A second call on the same entity does nothing.
pub fn kill(world: &mut World, target: Entity, killer: Entity) {
    if !world.entities().contains(target) || world.get::<Dying>(target).is_some() {
        return;
    }

    let (death_animation, boss_multiplier) = match world.get_resource::<SimulationConfig>() {
        Some(config) => (config.death_animation(), config.boss_experience_multiplier),
        None => {
            let config = SimulationConfig::default();
            (config.death_animation(), config.boss_experience_multiplier)
        }
    };
    let position = position_of(world, target);
    let is_player = world.get::<Player>(target).is_some();
    let is_boss = world.get::<Boss>(target).is_some();

    {
        let mut entity = world.entity_mut(target);
        entity.insert(Dying).remove::<HitboxSolid>();
        if let Some(mut velocity) = entity.get_mut::<Velocity>() {
            velocity.0 = Vec2::ZERO;
        }
    }

    if is_player {
        info!(entity = ?target, "player died");
        world.send_event(SoundCue::PlayerDeath);
        if let Err(err) = gameflow::transition(world, GameState::GameOver) {
            warn!(%err, "player death outside of a running game");
        }
    } else {
        world.entity_mut(target).insert(Lifetime::new(death_animation));
        let cue = if is_boss {
            SoundCue::BossDeath
        } else if world
            .get_resource_mut::<SimulationRng>()
            .is_some_and(|mut rng| rng.0.gen_bool(0.5))
        {
            SoundCue::EnemyDeath2
        } else {
            SoundCue::EnemyDeath1
        };
        world.send_event(cue);

        let reward = world
            .get::<ExperienceReward>(target)
            .map(|r| r.0)
            .unwrap_or_default();
        if world.get::<Player>(killer).is_some() && reward > 0 {
            let amount = if is_boss {
                reward.saturating_mul(boss_multiplier)
            } else {
                reward
            };
            progression::grant_experience(world, killer, amount);
        }

        if is_boss {
            if let Err(err) = factory::create(world, SpawnRequest::Key { position }) {
                warn!(%err, "could not drop the boss key");
            }
        }
        debug!(entity = ?target, killer = ?killer, boss = is_boss, "enemy killed");
    }

    world.send_event(EntityKilled {
        entity: target,
        killer,
        position,
        was_boss: is_boss,
    });
}

fn position_of(world: &World, entity: Entity) -> Vec2 {
    world
        .get::<Position>(entity)
        .map(|p| p.xy)
        .unwrap_or_default()
}
