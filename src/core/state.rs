//! Game state owned by the round engine.
//!
//! ## Team
//!
//! Balance and skip flag of one team.
//!
//! ## Round
//!
//! Which team is guessing, the target track and the current trial rung.
//!
//! ## GameState
//!
//! Complete state:
//! - Phase and both teams
//! - Current round
//! - Search results and pending collaborator requests
//! - Winner and per-game turn history
//! - RNG
//!
//! Search results and history use `im` persistent vectors so that the
//! engine can clone the whole state on every transition in O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::command::RequestId;
use super::phase::GamePhase;
use super::rng::{GameRng, GameRngState};
use super::team::{TeamId, TeamMap};
use crate::tracks::Track;

/// Per-team state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Points left. Never above the configured cap; the game ends at ≤ 0.
    pub balance: i64,
    /// Whether the once-per-game skip has been spent.
    pub has_used_skip: bool,
}

impl Team {
    /// A team at the start of a game.
    #[must_use]
    pub const fn fresh(initial_balance: i64) -> Self {
        Self {
            balance: initial_balance,
            has_used_skip: false,
        }
    }
}

/// The round currently being played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round counter within the game.
    pub number: u32,
    /// Team trying to identify the track; the other team picked it.
    pub guessing_team: TeamId,
    /// Track being guessed. `None` between rounds.
    pub target: Option<Track>,
    /// Rung of the trial ladder. Reset to 0 whenever a round begins.
    pub trial_index: usize,
}

impl Round {
    fn first(guessing_team: TeamId) -> Self {
        Self {
            number: 1,
            guessing_team,
            target: None,
            trial_index: 0,
        }
    }
}

/// How a team's turn ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Identified the track at `trial_index`.
    Guessed { trial_index: usize },
    /// Missed the final, longest clip.
    Exhausted,
    /// Spent the skip.
    Skipped,
    /// Balance reached zero; the game is over.
    Eliminated { trial_index: usize },
}

/// One finished turn, kept for the current game only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub round: u32,
    pub team: TeamId,
    pub outcome: TurnOutcome,
    pub balance_after: i64,
}

/// Full game state.
///
/// Fields are public for reading; mutate only through `RoundEngine`.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Current phase.
    pub phase: GamePhase,

    /// Both teams.
    pub teams: TeamMap<Team>,

    /// Round in progress (or about to start).
    pub round: Round,

    /// Team that guessed first in the current game.
    pub starting_team: TeamId,

    /// Playable results of the last search.
    pub search_results: Vector<Track>,

    /// Outstanding track lookup, if any.
    pub pending_search: Option<RequestId>,

    /// Outstanding clip extraction, if any.
    pub pending_clip: Option<RequestId>,

    /// Winner once the phase is `GameOver`.
    pub winner: Option<TeamId>,

    /// Finished turns of the current game.
    pub history: Vector<TurnRecord>,

    /// Deterministic RNG.
    pub rng: GameRng,

    next_request: u64,
}

impl GameState {
    /// A state in the lobby, before any game.
    #[must_use]
    pub fn new(initial_balance: i64, seed: u64) -> Self {
        Self {
            phase: GamePhase::Lobby,
            teams: TeamMap::with_value(Team::fresh(initial_balance)),
            round: Round::first(TeamId::A),
            starting_team: TeamId::A,
            search_results: Vector::new(),
            pending_search: None,
            pending_clip: None,
            winner: None,
            history: Vector::new(),
            rng: GameRng::new(seed),
            next_request: 0,
        }
    }

    /// Team currently guessing.
    #[must_use]
    pub fn active_team(&self) -> TeamId {
        self.round.guessing_team
    }

    /// A team's balance.
    #[must_use]
    pub fn balance(&self, team: TeamId) -> i64 {
        self.teams[team].balance
    }

    /// Whether a team has spent its skip.
    #[must_use]
    pub fn has_used_skip(&self, team: TeamId) -> bool {
        self.teams[team].has_used_skip
    }

    /// Track being guessed, if a round is in progress.
    #[must_use]
    pub fn target(&self) -> Option<&Track> {
        self.round.target.as_ref()
    }

    /// Current rung of the trial ladder.
    #[must_use]
    pub fn trial_index(&self) -> usize {
        self.round.trial_index
    }

    /// Serializable RNG position.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    // === Requests ===

    /// Allocate the next request id.
    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    // === Resets ===

    /// Reset everything game-scoped for a new game. Request ids keep
    /// counting so late responses from the old game stay stale.
    pub(crate) fn reset_for_new_game(&mut self, initial_balance: i64, starting_team: TeamId) {
        self.teams = TeamMap::with_value(Team::fresh(initial_balance));
        self.round = Round::first(starting_team);
        self.starting_team = starting_team;
        self.clear_search();
        self.pending_clip = None;
        self.winner = None;
        self.history = Vector::new();
    }

    /// Drop search results and any outstanding lookup.
    pub(crate) fn clear_search(&mut self) {
        self.search_results = Vector::new();
        self.pending_search = None;
    }

    /// Drop the target track and trial progress.
    pub(crate) fn clear_round_progress(&mut self) {
        self.round.target = None;
        self.round.trial_index = 0;
        self.pending_clip = None;
    }
}
