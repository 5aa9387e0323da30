//! Phase-level state machine.
//!
//! ```text
//! LOBBY -> START_SCREEN -> SONG_SELECTION <-> SONG_RESULTS -> GUESSING
//!              ^                 ^                              |
//!              |                 +------- abandon round --------+
//!              +---------------- turn ended --------------------+
//!                                                               |
//!                                    GAME_OVER <----------------+
//! ```
//!
//! `GAME_OVER` is terminal; only a new game leaves it, and it re-enters at
//! `START_SCREEN` rather than `LOBBY`.

use serde::{Deserialize, Serialize};

/// Overall game phase. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Before the first game.
    #[default]
    Lobby,
    /// Between rounds: balances shown, next guessing team announced.
    StartScreen,
    /// The picking team is searching for a track.
    SongSelection,
    /// Search returned playable candidates.
    SongResults,
    /// The guessing team is hearing clips.
    Guessing,
    /// A team's balance reached zero or below.
    GameOver,
}

impl GamePhase {
    /// Wire name of the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GamePhase::Lobby => "LOBBY",
            GamePhase::StartScreen => "START_SCREEN",
            GamePhase::SongSelection => "SONG_SELECTION",
            GamePhase::SongResults => "SONG_RESULTS",
            GamePhase::Guessing => "GUESSING",
            GamePhase::GameOver => "GAME_OVER",
        }
    }

    /// Whether the phase can only be left through a full reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver)
    }

    /// Phases in which the picking team may search.
    #[must_use]
    pub const fn is_selecting(self) -> bool {
        matches!(self, GamePhase::SongSelection | GamePhase::SongResults)
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
