//! Pursuit AI.
//!
//! An enemy walks straight at the nearest living player when the player is
//! inside its view range and nothing solid stands between them. Otherwise it
//! stands still.

use bevy::prelude::*;

use super::ViewRange;
use crate::combat::hitbox::{Aabb, HitboxSolid};
use crate::combat::status::{ActiveEffect, SlowFactors};
use crate::constants::{LINE_OF_SIGHT_PROBE, LINE_OF_SIGHT_SAMPLES};
use crate::movement::{Position, Speed, Velocity};
use crate::world::{Dying, Enemy, Player, Wall};

/// Sample the segment `from -> to` at `LINE_OF_SIGHT_SAMPLES` points
/// (`from` included, `to` excluded) and test a tiny probe box at each.
pub fn line_of_sight(from: Vec2, to: Vec2, walls: &[Aabb]) -> bool {
    let diff = to - from;
    let probe = Vec2::splat(LINE_OF_SIGHT_PROBE);
    (0..LINE_OF_SIGHT_SAMPLES).all(|i| {
        let point = from + diff * (i as f32 / LINE_OF_SIGHT_SAMPLES as f32);
        let sample = Aabb::new(point, probe);
        !walls.iter().any(|wall| sample.overlaps(wall))
    })
}

/// System: set enemy velocity toward the nearest visible player
pub fn pursue_player(
    mut enemies: Query<
        (Entity, &Position, &ViewRange, &Speed, &mut Velocity),
        (With<Enemy>, Without<Dying>),
    >,
    players: Query<&Position, (With<Player>, Without<Dying>)>,
    walls: Query<(&Position, &HitboxSolid), With<Wall>>,
    effects: Query<&ActiveEffect>,
) {
    let walls: Vec<Aabb> = walls.iter().map(|(pos, hb)| hb.at(pos.xy)).collect();
    let slows = SlowFactors::collect(effects.iter());

    for (entity, pos, view, speed, mut velocity) in &mut enemies {
        let target = players
            .iter()
            .map(|p| p.xy)
            .min_by(|a, b| a.distance_squared(pos.xy).total_cmp(&b.distance_squared(pos.xy)));

        velocity.0 = match target {
            Some(target)
                if pos.xy.distance(target) <= view.0 && line_of_sight(pos.xy, target, &walls) =>
            {
                (target - pos.xy).normalize_or_zero() * speed.0 * slows.factor(entity)
            }
            _ => Vec2::ZERO,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::EffectKind;
    use crate::movement::DepthLayer;

    fn run_ai(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(pursue_player);
        schedule.run(world);
    }

    fn enemy(world: &mut World, at: Vec2) -> Entity {
        world
            .spawn((
                Enemy,
                Position::new(at, DepthLayer::Enemy),
                ViewRange(8.0),
                Speed(2.0),
                Velocity(Vec2::new(9.0, 9.0)),
            ))
            .id()
    }

    fn player(world: &mut World, at: Vec2) {
        world.spawn((Player, Position::new(at, DepthLayer::Player)));
    }

    #[test]
    fn test_line_of_sight() {
        let wall = HitboxSolid::from_size(Vec2::ONE).at(Vec2::new(2.5, 0.5));
        assert!(!line_of_sight(Vec2::new(0.5, 0.5), Vec2::new(5.5, 0.5), &[wall]));
        assert!(line_of_sight(Vec2::new(0.5, 3.5), Vec2::new(5.5, 3.5), &[wall]));
        assert!(line_of_sight(Vec2::ZERO, Vec2::X, &[]));
    }

    #[test]
    fn test_pursues_visible_player() {
        let mut world = World::new();
        let e = enemy(&mut world, Vec2::ZERO);
        player(&mut world, Vec2::new(3.0, 4.0));

        run_ai(&mut world);

        let v = world.get::<Velocity>(e).unwrap().0;
        assert!((v - Vec2::new(1.2, 1.6)).length() < 1e-5);
    }

    #[test]
    fn test_stops_when_out_of_range_or_blocked() {
        let mut world = World::new();
        let far = enemy(&mut world, Vec2::new(100.0, 0.0));
        let blocked = enemy(&mut world, Vec2::new(0.0, 6.0));
        player(&mut world, Vec2::ZERO);
        world.spawn((
            Wall,
            Position::new(Vec2::new(0.0, 3.0), DepthLayer::Terrain),
            HitboxSolid::from_size(Vec2::new(4.0, 1.0)),
        ));

        run_ai(&mut world);

        assert_eq!(world.get::<Velocity>(far).unwrap().0, Vec2::ZERO);
        assert_eq!(world.get::<Velocity>(blocked).unwrap().0, Vec2::ZERO);
    }

    #[test]
    fn test_slow_divides_speed() {
        let mut world = World::new();
        let e = enemy(&mut world, Vec2::ZERO);
        player(&mut world, Vec2::new(4.0, 0.0));
        world.spawn(ActiveEffect {
            name: "chill".into(),
            victim: e,
            sender: e,
            kind: EffectKind::Slow { strength: 2.0 },
        });

        run_ai(&mut world);

        assert!((world.get::<Velocity>(e).unwrap().0 - Vec2::new(1.0, 0.0)).length() < 1e-5);
    }
}
