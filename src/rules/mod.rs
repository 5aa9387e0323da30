//! Round engine and scoring rules.
//!
//! - `engine`: `RoundEngine`, the pure `(state, command) -> (state, effects)`
//!   transition function
//! - `scoring`: reward/penalty arithmetic and the elimination threshold
//!
//! Hosts never mutate `GameState` directly; every change goes through
//! `RoundEngine::apply` or `RoundEngine::step`.

pub mod engine;
pub mod scoring;

pub use engine::{GameResult, RoundEngine, Transition};
pub use scoring::{credit, debit, evaluate_guess, is_eliminated, GuessVerdict};
