//! The round engine: a pure transition function over `GameState`.
//!
//! `RoundEngine::apply` takes a state and a command and returns the next
//! state plus the effects the host must perform or present. The input
//! state is never modified; a rejected command leaves the caller's state
//! exactly as it was.
//!
//! ## Turn structure
//!
//! - A round starts when a track is confirmed; the trial index is 0.
//! - Each miss debits the current trial's penalty and, while the team
//!   still has points, moves to the next (longer) clip.
//! - The turn ends on a correct guess, a miss on the final rung, or a
//!   skip. Ending a turn swaps the guessing team, clears the track and
//!   returns to the start screen.
//! - A balance at or below zero ends the game immediately; the other team
//!   wins. Game over takes precedence over ending the turn.

use log::{debug, info, warn};

use crate::core::{
    Command, ConfigError, Effect, Effects, EngineConfig, EngineError, GamePhase, GameState,
    RequestId, StartingTeam, TeamId, Trial, TrialLadder, TurnOutcome, TurnRecord,
};
use crate::tracks::{normalize_query, SearchOutcome, Track};

use super::scoring::{debit, evaluate_guess, is_eliminated, GuessVerdict};

const SELECTING: &[GamePhase] = &[GamePhase::SongSelection, GamePhase::SongResults];

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub winner: TeamId,
    pub loser: TeamId,
}

impl GameResult {
    /// Check if a team won.
    #[must_use]
    pub fn is_winner(&self, team: TeamId) -> bool {
        self.winner == team
    }
}

/// Next state and the effects produced by one command.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: GameState,
    pub effects: Effects,
}

/// The round/turn state machine and risk-scoring engine.
///
/// ## Example
///
/// ```
/// use clip_crush::core::{Command, EngineConfig, GamePhase, TeamId};
/// use clip_crush::rules::RoundEngine;
/// use clip_crush::tracks::Track;
///
/// let engine = RoundEngine::new(EngineConfig::default()).unwrap();
/// let mut state = engine.initial_state();
///
/// engine.step(&mut state, Command::StartGame).unwrap();
/// engine.step(&mut state, Command::BeginRound).unwrap();
/// let track = Track::new(1, "Dancing Queen", "ABBA").with_preview("dq.mp3");
/// engine.step(&mut state, Command::ConfirmTrack { track }).unwrap();
///
/// // Team A misses the free first clip, then names the song.
/// engine.step(&mut state, Command::ReportGuess { correct: false }).unwrap();
/// assert_eq!(state.trial_index(), 1);
/// engine.step(&mut state, Command::ReportGuess { correct: true }).unwrap();
///
/// assert_eq!(state.phase, GamePhase::StartScreen);
/// assert_eq!(state.active_team(), TeamId::B);
/// ```
#[derive(Clone, Debug)]
pub struct RoundEngine {
    config: EngineConfig,
}

impl RoundEngine {
    /// Create an engine, validating the configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the trial ladder.
    #[must_use]
    pub fn ladder(&self) -> &TrialLadder {
        &self.config.ladder
    }

    /// Clip durations of every rung, for progress displays.
    #[must_use]
    pub fn trial_durations(&self) -> Vec<u32> {
        self.config.ladder.durations()
    }

    /// A fresh state in the lobby.
    #[must_use]
    pub fn initial_state(&self) -> GameState {
        GameState::new(self.config.initial_balance, self.config.seed)
    }

    // === Transitions ===

    /// Apply a command without touching `state`.
    pub fn apply(&self, state: &GameState, command: Command) -> Result<Transition, EngineError> {
        let mut next = state.clone();
        let mut effects = Effects::new();

        if let Err(err) = self.dispatch(&mut next, command, &mut effects) {
            warn!("rejected command in {}: {}", state.phase, err);
            return Err(err);
        }

        Ok(Transition {
            state: next,
            effects,
        })
    }

    /// Apply a command in place. On error `state` is unchanged.
    pub fn step(&self, state: &mut GameState, command: Command) -> Result<Effects, EngineError> {
        let Transition { state: next, effects } = self.apply(state, command)?;
        *state = next;
        Ok(effects)
    }

    fn dispatch(
        &self,
        state: &mut GameState,
        command: Command,
        fx: &mut Effects,
    ) -> Result<(), EngineError> {
        let name = command.name();

        match command {
            Command::StartGame => {
                self.start_game(state, fx);
                Ok(())
            }
            Command::BeginRound => {
                require(state, name, &[GamePhase::StartScreen])?;
                set_phase(state, GamePhase::SongSelection, fx);
                Ok(())
            }
            Command::SubmitSearch { query } => {
                require(state, name, SELECTING)?;
                self.submit_search(state, &query, fx)
            }
            // Late responses can arrive in any phase; the request id
            // decides whether they still apply.
            Command::SearchResolved { request, outcome } => {
                if state.pending_search != Some(request) {
                    drop_stale(request, fx);
                    return Ok(());
                }
                require(state, name, SELECTING)?;
                self.resolve_search(state, request, outcome, fx);
                Ok(())
            }
            Command::BackToSearch => {
                require(state, name, &[GamePhase::SongResults])?;
                state.clear_search();
                set_phase(state, GamePhase::SongSelection, fx);
                Ok(())
            }
            Command::ConfirmTrack { track } => {
                require(state, name, SELECTING)?;
                self.confirm_track(state, track, fx)
            }
            Command::RequestClip => {
                require(state, name, &[GamePhase::Guessing])?;
                self.request_clip(state, fx)
            }
            Command::ClipResolved { request, succeeded } => {
                if state.pending_clip != Some(request) {
                    drop_stale(request, fx);
                    return Ok(());
                }
                require(state, name, &[GamePhase::Guessing])?;
                resolve_clip(state, request, succeeded, fx);
                Ok(())
            }
            Command::ReportGuess { correct } => {
                require(state, name, &[GamePhase::Guessing])?;
                self.report_guess(state, correct, fx)
            }
            Command::UseSkip => {
                require(state, name, &[GamePhase::Guessing])?;
                self.use_skip(state, fx)
            }
            Command::AbandonRound => {
                require(state, name, &[GamePhase::Guessing])?;
                info!(
                    "{} abandoned round {}, choosing another track",
                    state.active_team(),
                    state.round.number
                );
                state.clear_round_progress();
                set_phase(state, GamePhase::SongSelection, fx);
                Ok(())
            }
        }
    }

    fn start_game(&self, state: &mut GameState, fx: &mut Effects) {
        let starting = match self.config.starting_team {
            StartingTeam::Fixed(team) => team,
            StartingTeam::Alternate if state.phase == GamePhase::Lobby => TeamId::A,
            StartingTeam::Alternate => state.starting_team.other(),
            StartingTeam::Random => state.rng.pick_team(),
        };

        state.reset_for_new_game(self.config.initial_balance, starting);
        info!("new game, {} guesses first", starting);
        set_phase(state, GamePhase::StartScreen, fx);
    }

    fn submit_search(
        &self,
        state: &mut GameState,
        query: &str,
        fx: &mut Effects,
    ) -> Result<(), EngineError> {
        let query = normalize_query(query).ok_or(EngineError::EmptyQuery)?;

        let request = state.next_request_id();
        if let Some(previous) = state.pending_search.replace(request) {
            debug!("{} supersedes {}", request, previous);
        }
        debug!("{}: search {:?}", request, query);

        fx.push(Effect::Search {
            request,
            query: query.to_string(),
        });
        Ok(())
    }

    fn resolve_search(
        &self,
        state: &mut GameState,
        request: RequestId,
        outcome: SearchOutcome,
        fx: &mut Effects,
    ) {
        state.pending_search = None;

        state.search_results = match outcome {
            SearchOutcome::Matches(tracks) => tracks.into_iter().filter(Track::is_playable).collect(),
            SearchOutcome::Failed(reason) => {
                warn!("{}: track lookup failed: {}", request, reason);
                im::Vector::new()
            }
        };

        let playable = state.search_results.len();
        debug!("{}: {} playable tracks", request, playable);
        fx.push(Effect::ResultsReady { playable });

        let phase = if playable > 0 {
            GamePhase::SongResults
        } else {
            GamePhase::SongSelection
        };
        set_phase(state, phase, fx);
    }

    fn confirm_track(
        &self,
        state: &mut GameState,
        track: Track,
        fx: &mut Effects,
    ) -> Result<(), EngineError> {
        if !track.is_playable() {
            return Err(EngineError::MissingPreview { track_id: track.id });
        }

        info!(
            "round {}: {} guesses {}",
            state.round.number,
            state.active_team(),
            track.id
        );

        state.clear_search();
        state.clear_round_progress();
        state.round.target = Some(track);
        set_phase(state, GamePhase::Guessing, fx);
        Ok(())
    }

    fn request_clip(&self, state: &mut GameState, fx: &mut Effects) -> Result<(), EngineError> {
        let trial = *self.current_rung(state)?;
        let preview = state
            .target()
            .and_then(|t| t.preview.clone())
            .ok_or(EngineError::NoTarget)?;

        let request = state.next_request_id();
        if let Some(previous) = state.pending_clip.replace(request) {
            debug!("{} supersedes {}", request, previous);
        }
        debug!(
            "{}: {}s clip for trial {}",
            request, trial.clip_duration_secs, trial.level
        );

        fx.push(Effect::ExtractClip {
            request,
            preview,
            duration_secs: trial.clip_duration_secs,
        });
        Ok(())
    }

    fn report_guess(
        &self,
        state: &mut GameState,
        correct: bool,
        fx: &mut Effects,
    ) -> Result<(), EngineError> {
        if state.target().is_none() {
            return Err(EngineError::NoTarget);
        }
        let index = state.trial_index();
        let team = state.active_team();
        let (after, verdict) = evaluate_guess(
            &self.config.ladder,
            index,
            state.balance(team),
            self.config.initial_balance,
            correct,
        )
        .ok_or(EngineError::TrialOutOfRange {
            index,
            len: self.config.ladder.len(),
        })?;
        set_balance(state, team, after, fx);

        match verdict {
            GuessVerdict::Solved => end_turn(state, TurnOutcome::Guessed { trial_index: index }, fx),
            GuessVerdict::Advance { next_index } => {
                debug!("{} missed trial {}, advancing", team, index + 1);
                state.round.trial_index = next_index;
                state.pending_clip = None;
                fx.push(Effect::TrialAdvanced {
                    team,
                    trial_index: next_index,
                });
            }
            GuessVerdict::Exhausted => end_turn(state, TurnOutcome::Exhausted, fx),
            GuessVerdict::Eliminated => {
                game_over(state, TurnOutcome::Eliminated { trial_index: index }, fx);
            }
        }
        Ok(())
    }

    fn use_skip(&self, state: &mut GameState, fx: &mut Effects) -> Result<(), EngineError> {
        let penalty = self.config.skip_penalty.ok_or(EngineError::SkipDisabled)?;
        let team = state.active_team();
        if state.has_used_skip(team) {
            return Err(EngineError::SkipAlreadyUsed { team });
        }

        state.teams[team].has_used_skip = true;
        let after = debit(state.balance(team), penalty);
        set_balance(state, team, after, fx);

        if is_eliminated(after) {
            let trial_index = state.trial_index();
            game_over(state, TurnOutcome::Eliminated { trial_index }, fx);
        } else {
            end_turn(state, TurnOutcome::Skipped, fx);
        }
        Ok(())
    }

    // === Queries ===

    /// Trial being played, while guessing.
    #[must_use]
    pub fn current_trial(&self, state: &GameState) -> Option<&Trial> {
        if state.phase != GamePhase::Guessing {
            return None;
        }
        self.config.ladder.get(state.trial_index())
    }

    /// Whether the active team may skip right now.
    #[must_use]
    pub fn can_skip(&self, state: &GameState) -> bool {
        state.phase == GamePhase::Guessing
            && self.config.skip_penalty.is_some()
            && !state.has_used_skip(state.active_team())
    }

    /// Final result once the game is over.
    #[must_use]
    pub fn result(&self, state: &GameState) -> Option<GameResult> {
        if state.phase != GamePhase::GameOver {
            return None;
        }
        state.winner.map(|winner| GameResult {
            winner,
            loser: winner.other(),
        })
    }

    fn current_rung(&self, state: &GameState) -> Result<&Trial, EngineError> {
        let index = state.trial_index();
        self.config
            .ladder
            .get(index)
            .ok_or(EngineError::TrialOutOfRange {
                index,
                len: self.config.ladder.len(),
            })
    }
}

fn require(state: &GameState, command: &'static str, allowed: &[GamePhase]) -> Result<(), EngineError> {
    if allowed.contains(&state.phase) {
        Ok(())
    } else {
        Err(EngineError::WrongPhase {
            command,
            phase: state.phase,
        })
    }
}

fn set_phase(state: &mut GameState, to: GamePhase, fx: &mut Effects) {
    let from = state.phase;
    if from == to {
        return;
    }
    debug!("phase {} -> {}", from, to);
    state.phase = to;
    fx.push(Effect::PhaseChanged { from, to });
}

fn set_balance(state: &mut GameState, team: TeamId, balance: i64, fx: &mut Effects) {
    let delta = balance - state.balance(team);
    if delta == 0 {
        return;
    }
    state.teams[team].balance = balance;
    fx.push(Effect::BalanceChanged {
        team,
        delta,
        balance,
    });
}

fn drop_stale(request: RequestId, fx: &mut Effects) {
    debug!("dropping stale response {}", request);
    fx.push(Effect::StaleResponse { request });
}

fn resolve_clip(state: &mut GameState, request: RequestId, succeeded: bool, fx: &mut Effects) {
    state.pending_clip = None;

    if succeeded {
        fx.push(Effect::ClipReady { request });
    } else {
        warn!("{}: clip extraction failed, retry allowed", request);
        fx.push(Effect::ClipFailed { request });
    }
}

fn record_turn(state: &mut GameState, outcome: TurnOutcome) {
    let team = state.active_team();
    let record = TurnRecord {
        round: state.round.number,
        team,
        outcome,
        balance_after: state.balance(team),
    };
    state.history.push_back(record);
}

fn end_turn(state: &mut GameState, outcome: TurnOutcome, fx: &mut Effects) {
    let team = state.active_team();
    let next = team.other();
    record_turn(state, outcome);

    info!(
        "round {} over for {} ({:?}), balance {}; {} guesses next",
        state.round.number,
        team,
        outcome,
        state.balance(team),
        next
    );

    state.round.guessing_team = next;
    state.round.number += 1;
    state.clear_round_progress();
    set_phase(state, GamePhase::StartScreen, fx);
    fx.push(Effect::TurnEnded { team, outcome, next });
}

fn game_over(state: &mut GameState, outcome: TurnOutcome, fx: &mut Effects) {
    let loser = state.active_team();
    let winner = loser.other();
    record_turn(state, outcome);

    info!(
        "game over after round {}: {} at {}, {} wins",
        state.round.number,
        loser,
        state.balance(loser),
        winner
    );

    // The target stays visible on the game-over screen; no more clips.
    state.pending_clip = None;
    state.winner = Some(winner);
    set_phase(state, GamePhase::GameOver, fx);
    fx.push(Effect::GameOver { winner, loser });
}
