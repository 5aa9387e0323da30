//! Python bindings for the clip-crush round engine.
//!
//! The host (a UI or a bot) drives the engine and performs the lookups and
//! clip extraction itself, answering each request by id.
//!
//! # Quick Start
//!
//! ```python
//! import clip_crush as cc
//!
//! engine = cc.RoundEngine(initial_balance=30, skip_penalty=5)
//! engine.start_game()
//! engine.begin_round()
//!
//! request = engine.submit_search("waterloo")
//! engine.resolve_search(request, [cc.Track(1, "Waterloo", "ABBA", preview="w.mp3")])
//! engine.confirm_track(engine.search_results[0])
//!
//! request, preview, seconds = engine.request_clip()
//! engine.resolve_clip(request, succeeded=True)
//! engine.report_guess(correct=False)
//! assert engine.trial_index == 1
//! ```

use pyo3::prelude::*;

mod py_core;
mod py_engine;

pub use py_core::*;
pub use py_engine::*;

/// clip_crush: round engine for a two-team music-guessing game.
///
/// This module provides:
/// - Team, Track and Trial value types
/// - RoundEngine, holding the engine and the current game state
#[pymodule]
fn clip_crush(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core types
    m.add_class::<PyTeamId>()?;
    m.add_class::<PyTrack>()?;
    m.add_class::<PyTrial>()?;

    // Engine
    m.add_class::<PyRoundEngine>()?;

    Ok(())
}
