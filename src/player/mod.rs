//! Player control: semantic intents in, velocity and spell casts out.
//!
//! Input arrives already resolved to [`PlayerIntent`] values. Intents are only
//! honoured while the game is running; in any other state they are dropped.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::combat::casting::cast_spell;
use crate::combat::status::{ActiveEffect, SlowFactors};
use crate::constants::MIN_AXIS_LENGTH;
use crate::engine::schedule::{GameTick, TickStage};
use crate::events::AppNotificationExt;
use crate::gameflow::{self, GameState};
use crate::movement::{Speed, Velocity};
use crate::world::{Dying, Player};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_notification::<KeyPickedUp>()
            .add_systems(GameTick, apply_player_movement.in_set(TickStage::Movement));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step on the controller axis; `y` grows southward
    pub fn axis(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerIntent {
    Move { direction: Direction, pressed: bool },
    /// Aim vector relative to the player
    Aim(Vec2),
    CastSpell(usize),
    ToggleInventory,
}

/// Sum of the held direction signals. Unclamped: two bindings held for one
/// direction count twice and need two releases.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerAxis(pub Vec2);

impl ControllerAxis {
    pub fn press(&mut self, direction: Direction, pressed: bool) {
        let step = if pressed { 1.0 } else { -1.0 };
        self.0 += direction.axis() * step;
    }

    /// Normalised movement direction, zero for a near-empty axis
    pub fn direction(&self) -> Vec2 {
        if self.0.length() < MIN_AXIS_LENGTH {
            Vec2::ZERO
        } else {
            self.0.normalize()
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AimDirection(pub Vec2);

impl Default for AimDirection {
    fn default() -> Self {
        Self(Vec2::X)
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyPicker {
    pub has_key: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPickedUp {
    pub entity: Entity,
}

/// System: player velocity from the controller axis and speed stat
pub fn apply_player_movement(
    mut players: Query<
        (Entity, &ControllerAxis, &Speed, &mut Velocity),
        (With<Player>, Without<Dying>),
    >,
    effects: Query<&ActiveEffect>,
) {
    let slows = SlowFactors::collect(effects.iter());
    for (entity, axis, speed, mut velocity) in &mut players {
        velocity.0 = axis.direction() * speed.0 * slows.factor(entity);
    }
}

/// Apply one intent to every player entity
pub fn handle_intent(world: &mut World, intent: PlayerIntent) {
    let state = gameflow::current(world);

    if intent == PlayerIntent::ToggleInventory {
        let to = match state {
            GameState::InGame => GameState::InInventory,
            GameState::InInventory => GameState::InGame,
            _ => return,
        };
        if let Err(err) = gameflow::transition(world, to) {
            warn!(%err, "inventory toggle rejected");
        }
        return;
    }
    if state != GameState::InGame {
        return;
    }

    let players: Vec<Entity> = world
        .query_filtered::<Entity, (With<Player>, Without<Dying>)>()
        .iter(world)
        .collect();

    for player in players {
        match intent {
            PlayerIntent::Move { direction, pressed } => {
                if let Some(mut axis) = world.get_mut::<ControllerAxis>(player) {
                    axis.press(direction, pressed);
                }
            }
            PlayerIntent::Aim(direction) => {
                if let Some(mut aim) = world.get_mut::<AimDirection>(player) {
                    aim.0 = direction;
                }
            }
            PlayerIntent::CastSpell(slot) => {
                let aim = world
                    .get::<AimDirection>(player)
                    .copied()
                    .unwrap_or_default();
                match cast_spell(world, player, slot, aim.0) {
                    Ok(Some(spell)) => debug!(slot, spell = ?spell, "player cast"),
                    Ok(None) => {}
                    Err(err) => warn!(%err, slot, "player cast failed"),
                }
            }
            PlayerIntent::ToggleInventory => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameflow::GameFlow;
    use crate::movement::{DepthLayer, Position};

    #[test]
    fn test_axis_direction_is_normalised() {
        let mut axis = ControllerAxis::default();
        axis.press(Direction::Right, true);
        axis.press(Direction::Up, true);
        let d = axis.direction();
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!(d.x > 0.0 && d.y < 0.0);
    }

    #[test]
    fn test_double_binding_press_and_release_returns_to_rest() {
        let mut axis = ControllerAxis::default();
        axis.press(Direction::Right, true);
        axis.press(Direction::Right, true);
        assert_eq!(axis.0, Vec2::new(2.0, 0.0));
        assert_eq!(axis.direction(), Vec2::X);

        axis.press(Direction::Right, false);
        assert_eq!(axis.direction(), Vec2::X);
        axis.press(Direction::Right, false);
        assert_eq!(axis.0, Vec2::ZERO);
        assert_eq!(axis.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_release_stops() {
        let mut axis = ControllerAxis::default();
        axis.press(Direction::Left, true);
        axis.press(Direction::Left, false);
        assert_eq!(axis.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_movement_system() {
        let mut world = World::new();
        let player = world
            .spawn((
                Player,
                Position::new(Vec2::ZERO, DepthLayer::Player),
                ControllerAxis(Vec2::new(1.0, 1.0)),
                Speed(2.0),
                Velocity::default(),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(apply_player_movement);
        schedule.run(&mut world);

        let v = world.get::<Velocity>(player).unwrap().0;
        assert!((v.length() - 2.0).abs() < 1e-5);
        assert!((v.x - v.y).abs() < 1e-5);
    }

    #[test]
    fn test_intents_frozen_outside_game() {
        let mut world = World::new();
        world.insert_resource(GameFlow::default());
        let player = world.spawn((Player, ControllerAxis::default())).id();

        handle_intent(
            &mut world,
            PlayerIntent::Move {
                direction: Direction::Down,
                pressed: true,
            },
        );
        assert_eq!(world.get::<ControllerAxis>(player).unwrap().0, Vec2::ZERO);

        world.resource_mut::<GameFlow>().state = GameState::InGame;
        handle_intent(
            &mut world,
            PlayerIntent::Move {
                direction: Direction::Down,
                pressed: true,
            },
        );
        assert_eq!(world.get::<ControllerAxis>(player).unwrap().0, Vec2::Y);
    }
}
