//! Round engine bindings for Python.
//!
//! `RoundEngine` here owns both the engine and the current state, so the
//! Python side sees a mutable object. Every command returns the effects it
//! produced as JSON strings.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::{
    Command, ConfigError, Effect, Effects, EngineConfig, EngineError, GameState, RequestId,
    TeamId, TrialLadder,
};
use crate::rules::RoundEngine;
use crate::tracks::SearchOutcome;

use super::py_core::{PyTeamId, PyTrack, PyTrial};

fn config_err(err: ConfigError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Rejected input is a `ValueError`; a command sent out of sequence is a
/// `RuntimeError`.
fn engine_err(err: EngineError) -> PyErr {
    if err.is_invariant_violation() {
        PyRuntimeError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}

fn effects_to_json(effects: &Effects) -> PyResult<Vec<String>> {
    effects
        .iter()
        .map(|e| serde_json::to_string(e).map_err(|err| PyRuntimeError::new_err(err.to_string())))
        .collect()
}

/// Python wrapper for the round engine and its game state.
#[pyclass(name = "RoundEngine")]
pub struct PyRoundEngine {
    engine: RoundEngine,
    state: GameState,
}

impl PyRoundEngine {
    fn from_config(config: EngineConfig) -> PyResult<Self> {
        let engine = RoundEngine::new(config).map_err(config_err)?;
        let state = engine.initial_state();
        Ok(Self { engine, state })
    }

    fn run(&mut self, command: Command) -> PyResult<Effects> {
        self.engine.step(&mut self.state, command).map_err(engine_err)
    }

    fn run_json(&mut self, command: Command) -> PyResult<Vec<String>> {
        let effects = self.run(command)?;
        effects_to_json(&effects)
    }
}

#[pymethods]
impl PyRoundEngine {
    /// Create an engine in the lobby.
    ///
    /// `classic=True` selects the earlier ladder without skips. An
    /// explicit `ladder` replaces the preset's rungs.
    #[new]
    #[pyo3(signature = (classic=false, initial_balance=None, skip_penalty=None, seed=None, ladder=None))]
    fn new(
        classic: bool,
        initial_balance: Option<i64>,
        skip_penalty: Option<i64>,
        seed: Option<u64>,
        ladder: Option<Vec<PyTrial>>,
    ) -> PyResult<Self> {
        let mut config = if classic {
            EngineConfig::classic()
        } else {
            EngineConfig::default()
        };
        if let Some(balance) = initial_balance {
            config = config.with_initial_balance(balance);
        }
        if let Some(penalty) = skip_penalty {
            config = config.with_skip_penalty(penalty);
        }
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        if let Some(trials) = ladder {
            let ladder = TrialLadder::new(trials.into_iter().map(|t| t.0).collect())
                .map_err(config_err)?;
            config = config.with_ladder(ladder);
        }
        Self::from_config(config)
    }

    /// Create an engine from a JSON configuration document.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        Self::from_config(EngineConfig::from_json(json).map_err(config_err)?)
    }

    // === Commands ===

    fn start_game(&mut self) -> PyResult<Vec<String>> {
        self.run_json(Command::StartGame)
    }

    fn begin_round(&mut self) -> PyResult<Vec<String>> {
        self.run_json(Command::BeginRound)
    }

    /// Submit a search. Returns the request id to answer with
    /// `resolve_search` or `fail_search`.
    fn submit_search(&mut self, query: String) -> PyResult<u64> {
        let effects = self.run(Command::SubmitSearch { query })?;
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Search { request, .. } => Some(request.0),
                _ => None,
            })
            .ok_or_else(|| engine_err(EngineError::EmptyQuery))
    }

    fn resolve_search(&mut self, request: u64, tracks: Vec<PyTrack>) -> PyResult<Vec<String>> {
        let outcome = SearchOutcome::Matches(tracks.into_iter().map(|t| t.0).collect());
        self.run_json(Command::SearchResolved {
            request: RequestId(request),
            outcome,
        })
    }

    fn fail_search(&mut self, request: u64, reason: String) -> PyResult<Vec<String>> {
        self.run_json(Command::SearchResolved {
            request: RequestId(request),
            outcome: SearchOutcome::Failed(reason),
        })
    }

    fn back_to_search(&mut self) -> PyResult<Vec<String>> {
        self.run_json(Command::BackToSearch)
    }

    fn confirm_track(&mut self, track: &PyTrack) -> PyResult<Vec<String>> {
        self.run_json(Command::ConfirmTrack {
            track: track.0.clone(),
        })
    }

    /// Request a clip at the current trial. Returns
    /// `(request_id, preview, seconds)`.
    fn request_clip(&mut self) -> PyResult<(u64, String, u32)> {
        let effects = self.run(Command::RequestClip)?;
        effects
            .iter()
            .find_map(|e| match e {
                Effect::ExtractClip {
                    request,
                    preview,
                    duration_secs,
                } => Some((request.0, preview.as_str().to_string(), *duration_secs)),
                _ => None,
            })
            .ok_or_else(|| engine_err(EngineError::NoTarget))
    }

    #[pyo3(signature = (request, succeeded=true))]
    fn resolve_clip(&mut self, request: u64, succeeded: bool) -> PyResult<Vec<String>> {
        self.run_json(Command::ClipResolved {
            request: RequestId(request),
            succeeded,
        })
    }

    fn report_guess(&mut self, correct: bool) -> PyResult<Vec<String>> {
        self.run_json(Command::ReportGuess { correct })
    }

    fn use_skip(&mut self) -> PyResult<Vec<String>> {
        self.run_json(Command::UseSkip)
    }

    fn abandon_round(&mut self) -> PyResult<Vec<String>> {
        self.run_json(Command::AbandonRound)
    }

    // === Queries ===

    #[getter]
    fn phase(&self) -> &'static str {
        self.state.phase.as_str()
    }

    #[getter]
    fn active_team(&self) -> PyTeamId {
        PyTeamId(self.state.active_team())
    }

    #[getter]
    fn round_number(&self) -> u32 {
        self.state.round.number
    }

    #[getter]
    fn trial_index(&self) -> usize {
        self.state.trial_index()
    }

    #[getter]
    fn trial_durations(&self) -> Vec<u32> {
        self.engine.trial_durations()
    }

    #[getter]
    fn target(&self) -> Option<PyTrack> {
        self.state.target().cloned().map(PyTrack)
    }

    #[getter]
    fn search_results(&self) -> Vec<PyTrack> {
        self.state.search_results.iter().cloned().map(PyTrack).collect()
    }

    #[getter]
    fn winner(&self) -> Option<PyTeamId> {
        self.engine.result(&self.state).map(|r| PyTeamId(r.winner))
    }

    fn balance(&self, team: &PyTeamId) -> i64 {
        self.state.balance(team.0)
    }

    /// Both balances as `(team_a, team_b)`.
    fn balances(&self) -> (i64, i64) {
        (self.state.balance(TeamId::A), self.state.balance(TeamId::B))
    }

    fn has_used_skip(&self, team: &PyTeamId) -> bool {
        self.state.has_used_skip(team.0)
    }

    fn can_skip(&self) -> bool {
        self.engine.can_skip(&self.state)
    }

    fn current_trial(&self) -> Option<PyTrial> {
        self.engine.current_trial(&self.state).copied().map(PyTrial)
    }

    fn __repr__(&self) -> String {
        let (a, b) = self.balances();
        format!(
            "RoundEngine(phase={}, round={}, team={}, balances=({}, {}))",
            self.state.phase,
            self.state.round.number,
            self.state.active_team().label(),
            a,
            b
        )
    }
}
