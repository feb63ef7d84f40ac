use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;

use super::schedule::{GameTick, TimeElapsed, TICK_ORDER};
use crate::combat::CombatPlugin;
use crate::events::EventsPlugin;
use crate::gameflow::GameFlowPlugin;
use crate::generation::FloorPlugin;
use crate::logging::LoggingPlugin;
use crate::monster::MonsterPlugin;
use crate::movement::MovementPlugin;
use crate::player::PlayerPlugin;
use crate::progression::ProgressionPlugin;
use crate::visualization::VisualizationPlugin;
use crate::world::WorldPlugin;

/// Every gameplay plugin plus the ordered tick schedule
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let mut schedule = Schedule::new(GameTick);
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        app.add_schedule(schedule).init_resource::<TimeElapsed>();

        for pair in TICK_ORDER.windows(2) {
            app.configure_sets(GameTick, pair[1].after(pair[0]));
        }

        // EventsPlugin first: the others register notifications with it
        app.add_plugins((
            LoggingPlugin,
            EventsPlugin,
            GameFlowPlugin,
            WorldPlugin,
            MovementPlugin,
            CombatPlugin,
            MonsterPlugin,
            PlayerPlugin,
            ProgressionPlugin,
            FloorPlugin,
            VisualizationPlugin,
        ));
    }
}
