//! Headless runner: plays a seeded session with a scripted player and logs
//! what happens on each floor.
//!
//! Usage: `dungeon-sim [config.json|config.ron] [ticks]`

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use dungeon_core::database::Databases;
use dungeon_core::events::SoundCue;
use dungeon_core::generation::floor_manager::FloorChanged;
use dungeon_core::player::{Direction, PlayerIntent};
use dungeon_core::progression::LevelUp;
use dungeon_core::{Simulation, SimulationConfig};

const TICK: Duration = Duration::from_millis(16);
const DEFAULT_TICKS: u64 = 600;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::load(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => SimulationConfig::default(),
    };
    let ticks = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid tick count '{n}'"))?,
        None => DEFAULT_TICKS,
    };

    let databases = Databases::builtin().context("loading built-in databases")?;
    let mut sim = Simulation::new(config, databases);
    sim.new_game().context("starting a new game")?;

    let script = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
    let mut cues = 0usize;
    for tick in 0..ticks {
        if tick % 120 == 0 {
            let step = (tick / 120) as usize;
            let direction = script[step % script.len()];
            if step > 0 {
                sim.handle_intent(PlayerIntent::Move {
                    direction: script[(step - 1) % script.len()],
                    pressed: false,
                });
            }
            sim.handle_intent(PlayerIntent::Move {
                direction,
                pressed: true,
            });
        }
        if tick % 30 == 0 {
            sim.handle_intent(PlayerIntent::CastSpell(0));
        }
        if !sim.tick(TICK)? {
            info!(tick, state = ?sim.state(), "simulation stopped");
            break;
        }

        for changed in sim.drain_events::<FloorChanged>() {
            info!(floor = changed.floor, seed = changed.seed, "entered floor");
        }
        for level in sim.drain_events::<LevelUp>() {
            info!(level = level.level, "player levelled up");
        }
        cues += sim.drain_events::<SoundCue>().len();
    }

    let floor = sim.active_floor().context("no floor was built")?;
    info!(
        ticks = sim.ticks(),
        floor = floor.floor,
        fingerprint = %floor.fingerprint,
        sound_cues = cues,
        "session finished"
    );
    Ok(())
}
