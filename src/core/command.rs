//! Commands the host dispatches and effects the engine emits.
//!
//! The engine is a pure transition function:
//! `(state, command) -> (state, effects)`. Commands describe what a
//! player (or a resolved collaborator call) did; effects describe what the
//! host must do or show next. I/O never happens inside the engine: a
//! search or clip is *requested* through an effect, and its result comes
//! back as another command carrying the same `RequestId`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::phase::GamePhase;
use super::state::TurnOutcome;
use super::team::TeamId;
use crate::tracks::{PreviewRef, SearchOutcome, Track};

/// Identifier of one delegated collaborator call.
///
/// Only the most recent request of each kind is honored; responses
/// carrying an older id are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request({})", self.0)
    }
}

/// A command for the round engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Reset both teams and start a new game.
    StartGame,
    /// Leave the start screen and let the picking team choose a track.
    BeginRound,
    /// Ask the track lookup collaborator for candidates.
    SubmitSearch { query: String },
    /// A track lookup finished.
    SearchResolved {
        request: RequestId,
        outcome: SearchOutcome,
    },
    /// Return from the result list to the search form.
    BackToSearch,
    /// Lock in the track the guessing team must identify.
    ConfirmTrack { track: Track },
    /// Ask for a clip at the current trial's duration.
    RequestClip,
    /// A clip extraction finished.
    ClipResolved { request: RequestId, succeeded: bool },
    /// The guessing team named the track, correctly or not.
    ReportGuess { correct: bool },
    /// Forfeit the round for the fixed skip penalty.
    UseSkip,
    /// Discard the current track without scoring and pick another.
    AbandonRound,
}

impl Command {
    /// Stable name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Command::StartGame => "StartGame",
            Command::BeginRound => "BeginRound",
            Command::SubmitSearch { .. } => "SubmitSearch",
            Command::SearchResolved { .. } => "SearchResolved",
            Command::BackToSearch => "BackToSearch",
            Command::ConfirmTrack { .. } => "ConfirmTrack",
            Command::RequestClip => "RequestClip",
            Command::ClipResolved { .. } => "ClipResolved",
            Command::ReportGuess { .. } => "ReportGuess",
            Command::UseSkip => "UseSkip",
            Command::AbandonRound => "AbandonRound",
        }
    }
}

/// Something the host must perform or present after a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// The phase changed.
    PhaseChanged { from: GamePhase, to: GamePhase },

    /// Perform a track lookup and answer with `Command::SearchResolved`.
    Search { request: RequestId, query: String },

    /// Search results are available (possibly empty).
    ResultsReady { playable: usize },

    /// Extract a clip and answer with `Command::ClipResolved`.
    ExtractClip {
        request: RequestId,
        preview: PreviewRef,
        duration_secs: u32,
    },

    /// The clip for `request` is ready for playback.
    ClipReady { request: RequestId },

    /// Clip extraction failed; the team may retry at no cost.
    ClipFailed { request: RequestId },

    /// A response arrived for a request that has since been superseded.
    StaleResponse { request: RequestId },

    /// A team's balance moved.
    BalanceChanged {
        team: TeamId,
        delta: i64,
        balance: i64,
    },

    /// The guessing team missed and moves to the next, longer clip.
    TrialAdvanced { team: TeamId, trial_index: usize },

    /// A team's turn ended; `next` guesses in the following round.
    TurnEnded {
        team: TeamId,
        outcome: TurnOutcome,
        next: TeamId,
    },

    /// The game ended.
    GameOver { winner: TeamId, loser: TeamId },
}

/// Effects produced by a single transition. Most transitions emit 1-3.
pub type Effects = SmallVec<[Effect; 4]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(Command::StartGame.name(), "StartGame");
        assert_eq!(Command::ReportGuess { correct: true }.name(), "ReportGuess");
        assert_eq!(
            Command::SubmitSearch {
                query: "abba".into()
            }
            .name(),
            "SubmitSearch"
        );
    }

    #[test]
    fn test_request_id_ordering() {
        assert!(RequestId(2) > RequestId(1));
        assert_eq!(format!("{}", RequestId(7)), "Request(7)");
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::ClipResolved {
            request: RequestId(3),
            succeeded: false,
        };
        let json = serde_json::to_string(&command).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();

        assert_eq!(command, deserialized);
    }

    #[test]
    fn test_effect_serialization() {
        let effect = Effect::TurnEnded {
            team: TeamId::A,
            outcome: TurnOutcome::Skipped,
            next: TeamId::B,
        };
        let json = serde_json::to_string(&effect).unwrap();
        let deserialized: Effect = serde_json::from_str(&json).unwrap();

        assert_eq!(effect, deserialized);
    }
}
