use std::time::Duration;

use bevy::prelude::*;
use tracing::{info, warn};

use super::config::SimulationConfig;
use super::plugin::CorePlugin;
use super::schedule::{GameTick, TimeElapsed};
use super::SimulationRng;
use crate::console;
use crate::database::Databases;
use crate::error::{CommandError, GameFlowError, SimulationError};
use crate::events::NotificationRegistry;
use crate::factory::{self, SpawnRequest};
use crate::gameflow::{self, GameState};
use crate::generation::floor_manager::{self, ActiveFloor};
use crate::player::{self, PlayerIntent};
use crate::progression::class::purchase_class;
use crate::world::{AimingReticle, Player};

/// Headless game session: the world, its tick schedule and its collaborators
pub struct Simulation {
    app: App,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig, databases: Databases) -> Self {
        let mut app = App::new();
        let seed = config.seed;
        app.insert_resource(config)
            .insert_resource(databases)
            .insert_resource(SimulationRng::from_seed(seed))
            .add_plugins(CorePlugin);
        Self { app, ticks: 0 }
    }

    /// Default config and the built-in data set
    pub fn with_defaults() -> Result<Self, SimulationError> {
        Ok(Self::new(SimulationConfig::default(), Databases::builtin()?))
    }

    /// Start a run: fresh player with the starter class on floor 1.
    /// Allowed before the first game and after a game over.
    pub fn new_game(&mut self) -> Result<Entity, SimulationError> {
        let world = self.app.world_mut();
        match gameflow::current(world) {
            GameState::Loading => {}
            GameState::GameOver => gameflow::transition(world, GameState::Loading)?,
            from => {
                return Err(GameFlowError::InvalidTransition {
                    from,
                    to: GameState::Loading,
                }
                .into())
            }
        }

        let leftovers: Vec<Entity> = world
            .query_filtered::<Entity, Or<(With<Player>, With<AimingReticle>)>>()
            .iter(world)
            .collect();
        for entity in leftovers {
            world.despawn(entity);
        }
        floor_manager::teardown_floor(world);
        world.remove_resource::<ActiveFloor>();
        let seed = world.resource::<SimulationConfig>().seed;
        world.insert_resource(SimulationRng::from_seed(seed));

        let player = factory::create(world, SpawnRequest::Player { position: Vec2::ZERO })?;
        let starter = world.resource::<Databases>().starter_class()?.name.clone();
        purchase_class(world, player, &starter)?;
        factory::create(world, SpawnRequest::AimingReticle { position: Vec2::ZERO })?;

        floor_manager::change_floor(world)?;
        gameflow::transition(world, GameState::InGame)?;
        info!(player = ?player, class = %starter, seed, "new game");
        Ok(player)
    }

    /// Run one tick of `elapsed`. Returns `false` without simulating when the
    /// game is not running.
    pub fn tick(&mut self, elapsed: Duration) -> Result<bool, SimulationError> {
        let world = self.app.world_mut();
        if !gameflow::current(world).is_running() {
            return Ok(false);
        }
        world.insert_resource(TimeElapsed(elapsed));
        world.run_schedule(GameTick);

        if let Some(result) = floor_manager::apply_pending_floor_change(world) {
            result?;
        }
        NotificationRegistry::rotate_all(world);
        self.ticks += 1;
        Ok(true)
    }

    pub fn handle_intent(&mut self, intent: PlayerIntent) {
        player::handle_intent(self.app.world_mut(), intent);
    }

    /// Advance to the next floor immediately
    pub fn change_floor(&mut self) -> Result<u32, SimulationError> {
        Ok(floor_manager::change_floor(self.app.world_mut())?)
    }

    /// Run one debug console line
    pub fn run_command(&mut self, line: &str) -> Result<String, CommandError> {
        let result = console::run(self.app.world_mut(), line);
        if let Err(err) = &result {
            warn!(command = line, %err, "console command failed");
        }
        result
    }

    /// Take every pending notification of type `T`
    pub fn drain_events<T: Event>(&mut self) -> Vec<T> {
        crate::events::drain::<T>(self.app.world_mut())
    }

    pub fn player(&mut self) -> Option<Entity> {
        let world = self.app.world_mut();
        world
            .query_filtered::<Entity, With<Player>>()
            .iter(world)
            .next()
    }

    pub fn state(&self) -> GameState {
        gameflow::current(self.app.world())
    }

    pub fn active_floor(&self) -> Option<&ActiveFloor> {
        self.app.world().get_resource::<ActiveFloor>()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
