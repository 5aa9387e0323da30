//! Core engine types: teams, phases, configuration, commands, state, RNG.
//!
//! This module holds the data the round engine transitions over. The
//! transition rules themselves live in `rules`.

pub mod team;
pub mod phase;
pub mod rng;
pub mod config;
pub mod command;
pub mod state;
pub mod error;

pub use team::{TeamId, TeamMap, TEAM_COUNT};
pub use phase::GamePhase;
pub use rng::{GameRng, GameRngState};
pub use config::{EngineConfig, StartingTeam, Trial, TrialLadder};
pub use command::{Command, Effect, Effects, RequestId};
pub use state::{GameState, Round, Team, TurnOutcome, TurnRecord};
pub use error::{ConfigError, EngineError, ErrorKind};
