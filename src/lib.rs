//! Ghost behaviour for a grid-based chase game: four ghosts, each driven by a
//! five-state machine, steering tile by tile toward per-state targets.

pub mod components;
pub mod conductor;
pub mod config;
pub mod constants;
pub mod error;
pub mod fsm;
pub mod game;
pub mod ghost;
pub mod heuristics;
pub mod level;
pub mod player;
pub mod states;

pub use conductor::ModeConductor;
pub use config::{GameConfig, LoadedConfig};
pub use error::{ConfigError, GhostError};
pub use fsm::{GhostStateId, GhostStateMachine};
pub use game::{Game, GameEvent, GameStatus};
pub use ghost::{GhostAgent, GhostBody, GhostKind};
pub use level::{Board, BoardQuery, BoardView, GlobalMode};
