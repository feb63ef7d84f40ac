//! Error taxonomy for the gameplay core.
//!
//! Missing reference data and bad console input are recoverable and reported
//! as text at the boundary. Generation invariant violations abort the floor.

use thiserror::Error;

use crate::gameflow::GameState;

/// Reference data lookups and database loading
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("unknown {kind} '{name}'. Available {kind}s : [{available}]")]
    NotFound {
        kind: &'static str,
        name: String,
        available: String,
    },

    #[error("class tree contains a cycle")]
    CyclicClassTree,

    #[error("no starter class defined")]
    NoStarterClass,

    #[error("malformed database: {0}")]
    Parse(#[from] serde_json::Error),
}

impl DatabaseError {
    pub fn not_found<'a>(
        kind: &'static str,
        name: &str,
        available: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        let available = available
            .into_iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Self::NotFound {
            kind,
            name: name.to_string(),
            available,
        }
    }
}

/// Floor generation failures. Every variant is fatal for the floor being built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid generation parameters: {0}")]
    InvalidParameters(String),

    #[error("only {placed} room(s) fit in a {width}x{height} dungeon, a floor needs a spawn and a boss room")]
    TooFewRooms {
        placed: usize,
        width: i32,
        height: i32,
    },

    #[error("boss room at ({x}, {y}) has no free wall for the exit door")]
    ExitDoorPlacement { x: i32, y: i32 },
}

/// Floor lifecycle: generation plus entity construction
#[derive(Debug, Error)]
pub enum FloorError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("class '{0}' is already owned")]
    AlreadyOwned(String),

    #[error("class '{0}' is not unlocked yet")]
    NotUnlocked(String),

    #[error("not enough skill points: {available} available, {required} required")]
    NotEnoughSkillPoints { available: u32, required: u32 },

    #[error("entity is not a player character")]
    NotAPlayer,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameFlowError {
    #[error("invalid game state transition {from:?} -> {to:?}")]
    InvalidTransition { from: GameState, to: GameState },
}

/// Debug console failures. The usage string is part of the message.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'. Type 'help' for a list of commands")]
    UnknownCommand(String),

    #[error("wrong number of arguments\nusage: {usage}")]
    Usage { usage: &'static str },

    #[error("invalid argument '{argument}'\nusage: {usage}")]
    InvalidArgument {
        argument: String,
        usage: &'static str,
    },

    #[error("{message}\nusage: {usage}")]
    Failed {
        message: String,
        usage: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("cannot serialize RON config: {0}")]
    RonSerialize(#[from] ron::Error),
}

/// Top-level error of the simulation facade
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Floor(#[from] FloorError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    GameFlow(#[from] GameFlowError),

    #[error("no player entity in the world")]
    NoPlayer,
}
