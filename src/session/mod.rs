//! Session: the engine plus its collaborators.
//!
//! `Session` owns a `RoundEngine`, the current `GameState`, a
//! `TrackLookup` and a `ClipExtractor`. It serializes command dispatch
//! (every method takes `&mut self`) and performs the I/O effects the
//! engine emits, feeding the results back as commands.
//!
//! Hosts that perform lookups or extraction asynchronously should drive
//! `RoundEngine` directly with `SearchResolved`/`ClipResolved` commands;
//! the request ids carried by those commands give last-requester-wins
//! semantics for overlapping calls.
//!
//! ## Example
//!
//! ```
//! use clip_crush::clips::{AudioClip, ClipError, ClipExtractor};
//! use clip_crush::core::{EngineConfig, GamePhase};
//! use clip_crush::session::{SearchReport, Session};
//! use clip_crush::tracks::{PreviewRef, StaticCatalog, Track};
//!
//! struct Silence;
//!
//! impl ClipExtractor for Silence {
//!     fn extract(&mut self, _: &PreviewRef, secs: u32) -> Result<AudioClip, ClipError> {
//!         Ok(AudioClip { bytes: vec![0; 4], duration_secs: secs, mime_type: "audio/mpeg".into() })
//!     }
//! }
//!
//! let catalog: StaticCatalog =
//!     [Track::new(1, "Waterloo", "ABBA").with_preview("w.mp3")].into_iter().collect();
//! let mut session = Session::new(EngineConfig::default(), catalog, Silence).unwrap();
//!
//! session.start_game().unwrap();
//! session.begin_round().unwrap();
//! assert_eq!(session.search("waterloo").unwrap(), SearchReport::Found(1));
//!
//! let track = session.search_results()[0].clone();
//! session.confirm_track(track).unwrap();
//! assert_eq!(session.request_clip().unwrap().duration_secs, 1);
//! assert_eq!(session.state().phase, GamePhase::Guessing);
//! ```

use log::{error, warn};
use thiserror::Error;

use crate::clips::{AudioClip, ClipError, ClipExtractor};
use crate::core::{
    Command, ConfigError, Effect, Effects, EngineConfig, EngineError, GameState, RequestId,
};
use crate::rules::{GameResult, RoundEngine};
use crate::tracks::{LookupError, PreviewRef, SearchOutcome, Track, TrackLookup};

/// Failure of a session operation.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("clip unavailable: {0}")]
    Clip(#[from] ClipError),
}

/// What a search produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchReport {
    /// This many playable tracks are listed in `Session::search_results`.
    Found(usize),
    /// The lookup succeeded but nothing playable matched.
    NoMatches,
    /// The lookup failed. Not a game penalty; search again.
    Failed(LookupError),
}

/// Engine, state and collaborators for one table of players.
pub struct Session<L, C> {
    engine: RoundEngine,
    state: GameState,
    lookup: L,
    clipper: C,
}

impl<L: TrackLookup, C: ClipExtractor> Session<L, C> {
    /// Create a session in the lobby.
    pub fn new(config: EngineConfig, lookup: L, clipper: C) -> Result<Self, ConfigError> {
        let engine = RoundEngine::new(config)?;
        let state = engine.initial_state();
        Ok(Self {
            engine,
            state,
            lookup,
            clipper,
        })
    }

    /// Get the engine.
    #[must_use]
    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    /// Get the current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Playable tracks from the last search.
    #[must_use]
    pub fn search_results(&self) -> Vec<Track> {
        self.state.search_results.iter().cloned().collect()
    }

    /// Final result, once the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.engine.result(&self.state)
    }

    /// Dispatch a command, logging invariant violations loudly.
    pub fn dispatch(&mut self, command: Command) -> Result<Effects, EngineError> {
        let name = command.name();
        self.engine.step(&mut self.state, command).map_err(|err| {
            if err.is_invariant_violation() {
                error!("host dispatched {} out of sequence: {}", name, err);
            }
            err
        })
    }

    // === Commands ===

    /// Start (or restart) a game.
    pub fn start_game(&mut self) -> Result<Effects, EngineError> {
        self.dispatch(Command::StartGame)
    }

    /// Move from the start screen to song selection.
    pub fn begin_round(&mut self) -> Result<Effects, EngineError> {
        self.dispatch(Command::BeginRound)
    }

    /// Search for candidate tracks.
    ///
    /// Lookup failures are reported in the returned `SearchReport`, never
    /// as an error; errors are only engine rejections (blank query, wrong
    /// phase).
    pub fn search(&mut self, query: &str) -> Result<SearchReport, EngineError> {
        let effects = self.dispatch(Command::SubmitSearch {
            query: query.to_string(),
        })?;
        let Some((request, query)) = search_request(&effects) else {
            return Err(EngineError::EmptyQuery);
        };

        let (outcome, failure) = match self.lookup.search(&query) {
            Ok(tracks) => (SearchOutcome::Matches(tracks), None),
            Err(err) => {
                warn!("{}: lookup for {:?} failed: {}", request, query, err);
                (SearchOutcome::Failed(err.to_string()), Some(err))
            }
        };

        self.dispatch(Command::SearchResolved { request, outcome })?;

        Ok(match failure {
            Some(err) => SearchReport::Failed(err),
            None if self.state.search_results.is_empty() => SearchReport::NoMatches,
            None => SearchReport::Found(self.state.search_results.len()),
        })
    }

    /// Return from the result list to the search form.
    pub fn back_to_search(&mut self) -> Result<Effects, EngineError> {
        self.dispatch(Command::BackToSearch)
    }

    /// Lock in the track for this round.
    pub fn confirm_track(&mut self, track: Track) -> Result<Effects, EngineError> {
        self.dispatch(Command::ConfirmTrack { track })
    }

    /// Extract a clip at the current trial's duration.
    ///
    /// A failed extraction leaves the round untouched; call again to retry.
    pub fn request_clip(&mut self) -> Result<AudioClip, SessionError> {
        let effects = self.dispatch(Command::RequestClip)?;
        let Some((request, preview, duration_secs)) = clip_request(&effects) else {
            return Err(EngineError::NoTarget.into());
        };

        let result = self.clipper.extract(&preview, duration_secs);
        self.dispatch(Command::ClipResolved {
            request,
            succeeded: result.is_ok(),
        })?;

        result.map_err(|err| {
            warn!("{}: clip extraction failed: {}", request, err);
            SessionError::Clip(err)
        })
    }

    /// Report whether the guessing team named the track.
    pub fn report_guess(&mut self, correct: bool) -> Result<Effects, EngineError> {
        self.dispatch(Command::ReportGuess { correct })
    }

    /// Spend the active team's skip.
    pub fn use_skip(&mut self) -> Result<Effects, EngineError> {
        self.dispatch(Command::UseSkip)
    }

    /// Discard the current track without scoring.
    pub fn abandon_round(&mut self) -> Result<Effects, EngineError> {
        self.dispatch(Command::AbandonRound)
    }
}

fn search_request(effects: &Effects) -> Option<(RequestId, String)> {
    effects.iter().find_map(|e| match e {
        Effect::Search { request, query } => Some((*request, query.clone())),
        _ => None,
    })
}

fn clip_request(effects: &Effects) -> Option<(RequestId, PreviewRef, u32)> {
    effects.iter().find_map(|e| match e {
        Effect::ExtractClip {
            request,
            preview,
            duration_secs,
        } => Some((*request, preview.clone(), *duration_secs)),
        _ => None,
    })
}
