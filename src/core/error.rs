//! Error types for configuration and command dispatch.
//!
//! Command errors fall into two kinds:
//! - **Input rejection**: the caller offered an action that was not
//!   available (confirming a track without a preview, reusing a skip).
//!   Nothing changes; the UI should not have offered the action.
//! - **Invariant violation**: the command is meaningless in the current
//!   phase (scoring a guess outside `Guessing`). This is a programming
//!   error in the host and is reported loudly.
//!
//! Collaborator failures (search, clip extraction) are not engine errors;
//! see `tracks::LookupError` and `clips::ClipError`.

use thiserror::Error;

use super::phase::GamePhase;
use super::team::TeamId;
use crate::tracks::TrackId;

/// Invalid engine configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("trial ladder must contain at least one trial")]
    EmptyLadder,

    #[error("trial at index {index} has level {found}, expected {expected}")]
    LevelOutOfOrder {
        index: usize,
        found: u32,
        expected: u32,
    },

    #[error("trial level {level} has a zero-length clip")]
    ZeroDuration { level: u32 },

    #[error("trial level {level} clip ({found}s) is not longer than the previous rung ({previous}s)")]
    DurationNotIncreasing {
        level: u32,
        previous: u32,
        found: u32,
    },

    #[error("trial level {level} has negative penalty {penalty}")]
    NegativePenalty { level: u32, penalty: i64 },

    #[error("trial level {level} has negative reward {reward}")]
    NegativeReward { level: u32, reward: i64 },

    #[error("initial balance must be positive, got {0}")]
    NonPositiveBalance(i64),

    #[error("skip penalty must not be negative, got {0}")]
    NegativeSkipPenalty(i64),

    #[error("invalid configuration document: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Classification of a rejected command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The action should not have been offered; state is unchanged.
    InputRejected,
    /// The host dispatched a command the current phase cannot accept.
    InvariantViolation,
}

/// A command the engine refused to apply.
///
/// The state passed to the engine is never modified when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{command} is not allowed in phase {phase}")]
    WrongPhase {
        command: &'static str,
        phase: GamePhase,
    },

    #[error("{track_id} has no preview audio")]
    MissingPreview { track_id: TrackId },

    #[error("search query is empty")]
    EmptyQuery,

    #[error("{team} has already used its skip this game")]
    SkipAlreadyUsed { team: TeamId },

    #[error("skipping is disabled by the active configuration")]
    SkipDisabled,

    #[error("no target track while guessing")]
    NoTarget,

    #[error("trial index {index} is outside the ladder of {len} trials")]
    TrialOutOfRange { index: usize, len: usize },
}

impl EngineError {
    /// Which side of the error taxonomy this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::WrongPhase { .. }
            | EngineError::NoTarget
            | EngineError::TrialOutOfRange { .. } => ErrorKind::InvariantViolation,
            EngineError::MissingPreview { .. }
            | EngineError::EmptyQuery
            | EngineError::SkipAlreadyUsed { .. }
            | EngineError::SkipDisabled => ErrorKind::InputRejected,
        }
    }

    /// True for programming errors in the host.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        self.kind() == ErrorKind::InvariantViolation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let wrong = EngineError::WrongPhase {
            command: "ReportGuess",
            phase: GamePhase::Lobby,
        };
        assert!(wrong.is_invariant_violation());
        assert!(EngineError::NoTarget.is_invariant_violation());
        assert!(EngineError::TrialOutOfRange { index: 9, len: 6 }.is_invariant_violation());

        assert_eq!(EngineError::EmptyQuery.kind(), ErrorKind::InputRejected);
        assert_eq!(
            EngineError::SkipAlreadyUsed { team: TeamId::A }.kind(),
            ErrorKind::InputRejected
        );
        assert_eq!(
            EngineError::MissingPreview {
                track_id: TrackId(3)
            }
            .kind(),
            ErrorKind::InputRejected
        );
    }

    #[test]
    fn test_error_messages() {
        let wrong = EngineError::WrongPhase {
            command: "ReportGuess",
            phase: GamePhase::GameOver,
        };
        assert_eq!(wrong.to_string(), "ReportGuess is not allowed in phase GAME_OVER");

        let skip = EngineError::SkipAlreadyUsed { team: TeamId::B };
        assert_eq!(skip.to_string(), "Team B has already used its skip this game");
    }

    #[test]
    fn test_config_error_from_json() {
        let err: ConfigError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
