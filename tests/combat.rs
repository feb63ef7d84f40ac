//! Combat and progression through a running session

use std::time::Duration;

use bevy::prelude::*;
use dungeon_core::combat::hitbox::Health;
use dungeon_core::combat::status::{apply_effect, has_effect};
use dungeon_core::combat::{apply_damage, EntityKilled};
use dungeon_core::error::ProgressionError;
use dungeon_core::factory::{create, SpawnRequest};
use dungeon_core::gameflow::GameState;
use dungeon_core::movement::Position;
use dungeon_core::progression::class::purchase_class;
use dungeon_core::progression::{grant_experience, Classes, Level, LevelUp, SkillPoints};
use dungeon_core::world::Dying;
use dungeon_core::Simulation;

const TICK: Duration = Duration::from_millis(16);

fn started() -> (Simulation, Entity) {
    let mut sim = Simulation::with_defaults().unwrap();
    let player = sim.new_game().unwrap();
    sim.drain_events::<EntityKilled>();
    (sim, player)
}

/// Skeleton with 50 health, far from the player
fn far_enemy(sim: &mut Simulation, player: Entity) -> Entity {
    let world = sim.world_mut();
    let at = world.get::<Position>(player).unwrap().xy + Vec2::splat(100.0);
    let enemy = create(
        world,
        SpawnRequest::Enemy {
            id: "skeleton",
            position: at,
        },
    )
    .unwrap();
    world.entity_mut(enemy).insert(Health::new(50.0));
    enemy
}

// ============================================================
// Damage and death
// ============================================================

#[test]
fn test_three_hits_kill_exactly_once() {
    let (mut sim, player) = started();
    let enemy = far_enemy(&mut sim, player);

    assert!(!apply_damage(sim.world_mut(), enemy, player, 20.0));
    assert_eq!(sim.world().get::<Health>(enemy).unwrap().current, 30.0);
    assert!(sim.drain_events::<EntityKilled>().is_empty());

    assert!(!apply_damage(sim.world_mut(), enemy, player, 20.0));
    assert_eq!(sim.world().get::<Health>(enemy).unwrap().current, 10.0);

    assert!(apply_damage(sim.world_mut(), enemy, player, 20.0));
    assert_eq!(sim.world().get::<Health>(enemy).unwrap().current, -10.0);
    assert!(sim.world().get::<Dying>(enemy).is_some());

    assert!(!apply_damage(sim.world_mut(), enemy, player, 20.0));
    let killed = sim.drain_events::<EntityKilled>();
    assert_eq!(killed.len(), 1);
    assert_eq!(killed[0].entity, enemy);
    assert_eq!(killed[0].killer, player);
    assert!(!killed[0].was_boss);
}

#[test]
fn test_killed_enemy_pays_experience_and_despawns() {
    let (mut sim, player) = started();
    let enemy = far_enemy(&mut sim, player);
    apply_damage(sim.world_mut(), enemy, player, 100.0);
    assert_eq!(sim.world().get::<Level>(player).unwrap().current_xp, 3);

    for _ in 0..60 {
        sim.tick(TICK).unwrap();
    }
    assert!(!sim.world().entities().contains(enemy));
}

#[test]
fn test_player_death_ends_the_run() {
    let (mut sim, player) = started();
    apply_damage(sim.world_mut(), player, player, 1000.0);
    assert_eq!(sim.state(), GameState::GameOver);
    assert!(!sim.tick(TICK).unwrap());

    let again = sim.new_game().unwrap();
    assert_eq!(sim.state(), GameState::InGame);
    assert_eq!(sim.world().get::<Health>(again).unwrap().current, 21.0);
}

// ============================================================
// Status effects
// ============================================================

#[test]
fn test_effect_applies_once_per_victim() {
    let (mut sim, player) = started();
    let enemy = far_enemy(&mut sim, player);
    let world = sim.world_mut();

    assert!(apply_effect(world, "burn", enemy, player).unwrap().is_some());
    assert!(apply_effect(world, "burn", enemy, player).unwrap().is_none());
    assert!(apply_effect(world, "chill", enemy, player).unwrap().is_some());
    assert!(has_effect(world, "burn", enemy));
    assert!(apply_effect(world, "frostbite", enemy, player).is_err());
}

#[test]
fn test_burn_ticks_damage_then_expires() {
    let (mut sim, player) = started();
    let enemy = far_enemy(&mut sim, player);
    apply_effect(sim.world_mut(), "burn", enemy, player).unwrap();

    for _ in 0..40 {
        sim.tick(TICK).unwrap();
    }
    let hurt = sim.world().get::<Health>(enemy).unwrap().current;
    assert!(hurt <= 48.0, "burn never fired: {hurt}");

    for _ in 0..100 {
        sim.tick(TICK).unwrap();
    }
    assert!(!has_effect(sim.world_mut(), "burn", enemy));
    let settled = sim.world().get::<Health>(enemy).unwrap().current;
    assert!(settled > 0.0);
}

// ============================================================
// Progression
// ============================================================

#[test]
fn test_twenty_five_xp_from_scratch() {
    let mut level = Level::default();
    assert_eq!(level.add_xp(25), 2);
    assert_eq!(
        level,
        Level {
            current_level: 2,
            current_xp: 3,
            xp_require: 15,
        }
    );
}

#[test]
fn test_level_ups_publish_one_event_each() {
    let (mut sim, player) = started();
    sim.drain_events::<LevelUp>();
    assert_eq!(grant_experience(sim.world_mut(), player, 25), 2);
    let levels: Vec<u32> = sim.drain_events::<LevelUp>().iter().map(|e| e.level).collect();
    assert_eq!(levels, vec![1, 2]);
    assert_eq!(sim.world().get::<SkillPoints>(player).unwrap().0, 2);
}

#[test]
fn test_class_purchase_rules() {
    let (mut sim, player) = started();
    let world = sim.world_mut();

    assert!(matches!(
        purchase_class(world, player, "warrior"),
        Err(ProgressionError::NotEnoughSkillPoints {
            available: 0,
            required: 1
        })
    ));
    assert!(matches!(
        purchase_class(world, player, "berserker"),
        Err(ProgressionError::NotUnlocked(_))
    ));

    grant_experience(world, player, 10);
    purchase_class(world, player, "warrior").unwrap();
    assert_eq!(
        world.get::<Classes>(player).unwrap().0,
        vec!["farmer".to_string(), "warrior".to_string()]
    );
    assert_eq!(world.get::<SkillPoints>(player).unwrap().0, 0);
    assert_eq!(world.get::<Health>(player).unwrap().max, 41.0);
    assert!(matches!(
        purchase_class(world, player, "warrior"),
        Err(ProgressionError::AlreadyOwned(_))
    ));
}
