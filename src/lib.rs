//! # clip-crush
//!
//! Round/turn state machine and risk-scoring engine for a two-team
//! music-guessing game. One team picks a track; the other hears
//! progressively longer clips and must name it before its point balance
//! runs out.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `RoundEngine::apply` maps
//!    `(state, command)` to `(state, effects)`. No I/O, no timers.
//!
//! 2. **Configuration Over Convention**: clip durations, penalties and
//!    rewards come from a `TrialLadder` in `EngineConfig`, never from the
//!    transition logic.
//!
//! 3. **Collaborators at the Boundary**: track lookup and clip extraction
//!    are traits (`TrackLookup`, `ClipExtractor`) invoked by `Session`, or
//!    by the host itself when it drives the engine directly.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `im` vectors keep the state cheap to
//!   clone on every transition.
//!
//! - **Request Ids**: each delegated call carries a `RequestId`; only the
//!   latest request of each kind is honored, so stale responses can never
//!   overwrite newer results.
//!
//! ## Modules
//!
//! - `core`: teams, phases, configuration, commands/effects, state, errors
//! - `rules`: `RoundEngine` and scoring
//! - `tracks`: track model, `TrackLookup`, in-memory catalog
//! - `clips`: `ClipExtractor`, constant-bitrate clipper
//! - `session`: engine + collaborators driver

pub mod core;
pub mod rules;
pub mod tracks;
pub mod clips;
pub mod session;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    TeamId, TeamMap,
    GamePhase,
    GameRng, GameRngState,
    Trial, TrialLadder, EngineConfig, StartingTeam,
    Command, Effect, Effects, RequestId,
    GameState, Round, Team, TurnOutcome, TurnRecord,
    ConfigError, EngineError, ErrorKind,
};

pub use crate::rules::{RoundEngine, Transition, GameResult, GuessVerdict};

pub use crate::tracks::{Track, TrackId, PreviewRef, SearchOutcome, TrackLookup, LookupError, StaticCatalog};

pub use crate::clips::{AudioClip, ClipExtractor, ClipError, BitrateClipper, PreviewFetcher};

pub use crate::session::{Session, SessionError, SearchReport};
