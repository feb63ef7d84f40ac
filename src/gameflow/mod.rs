//! Game flow state machine.
//!
//! Loading → InGame ⇄ InInventory, InGame | InInventory → GameOver → Loading.
//!
//! The state is a plain resource. Every change goes through [`transition`],
//! which validates the edge and announces it.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GameFlowError;
use crate::events::AppNotificationExt;

pub struct GameFlowPlugin;

impl Plugin for GameFlowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameFlow>()
            .add_notification::<GameFlowChanged>();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Before the first floor exists
    #[default]
    Loading,
    /// Ticks run and intents are honoured
    InGame,
    /// Simulation frozen behind the inventory screen
    InInventory,
    /// Player died; input frozen until a new game
    GameOver,
}

impl GameState {
    pub fn can_transition_to(self, to: GameState) -> bool {
        use GameState::*;
        matches!(
            (self, to),
            (Loading, InGame)
                | (InGame, InInventory)
                | (InInventory, InGame)
                | (InGame, GameOver)
                | (InInventory, GameOver)
                | (GameOver, Loading)
        )
    }

    /// Whether simulation ticks advance in this state
    pub fn is_running(self) -> bool {
        self == GameState::InGame
    }
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFlow {
    pub state: GameState,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameFlowChanged {
    pub from: GameState,
    pub to: GameState,
}

/// Move to `to` if the edge exists, announcing the change
pub fn transition(world: &mut World, to: GameState) -> Result<(), GameFlowError> {
    let from = world
        .get_resource_or_insert_with(GameFlow::default)
        .state;
    if !from.can_transition_to(to) {
        return Err(GameFlowError::InvalidTransition { from, to });
    }
    world.resource_mut::<GameFlow>().state = to;
    world.send_event(GameFlowChanged { from, to });
    info!(?from, ?to, "game state changed");
    Ok(())
}

pub fn current(world: &World) -> GameState {
    world
        .get_resource::<GameFlow>()
        .map(|flow| flow.state)
        .unwrap_or_default()
}
