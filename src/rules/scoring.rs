//! Risk scoring: rewards, penalties and the elimination threshold.
//!
//! Pure functions over balances and the trial ladder. The engine feeds
//! them the current rung and applies the verdict to the state.

use crate::core::{Trial, TrialLadder};

/// What a reported guess does to the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessVerdict {
    /// Correct guess: the turn ends, won by the guessing team.
    Solved,
    /// Miss with balance left and a longer clip available.
    Advance { next_index: usize },
    /// Miss on the final rung: the turn ends without game over.
    Exhausted,
    /// Miss that took the balance to zero or below.
    Eliminated,
}

/// Credit `reward`, clamped so the balance never exceeds `cap`.
///
/// A balance already above the cap is left untouched rather than lowered.
#[must_use]
pub fn credit(balance: i64, reward: i64, cap: i64) -> i64 {
    if balance >= cap {
        balance
    } else {
        balance.saturating_add(reward).min(cap)
    }
}

/// Debit `penalty`. No floor: balances may go negative.
#[must_use]
pub fn debit(balance: i64, penalty: i64) -> i64 {
    balance.saturating_sub(penalty)
}

/// Exactly zero is a loss.
#[must_use]
pub fn is_eliminated(balance: i64) -> bool {
    balance <= 0
}

/// Score a guess at rung `index`.
///
/// Returns the new balance and the verdict, or `None` if `index` is not a
/// rung of the ladder. Elimination takes precedence over advancing or
/// exhausting the ladder.
///
/// ```
/// use clip_crush::core::TrialLadder;
/// use clip_crush::rules::{evaluate_guess, GuessVerdict};
///
/// let ladder = TrialLadder::standard();
///
/// // Instant recognition: +2, clamped to the cap.
/// assert_eq!(evaluate_guess(&ladder, 0, 28, 30, true), Some((30, GuessVerdict::Solved)));
///
/// // A miss on rung 1 costs 3 and moves to rung 2.
/// assert_eq!(
///     evaluate_guess(&ladder, 1, 30, 30, false),
///     Some((27, GuessVerdict::Advance { next_index: 2 }))
/// );
/// ```
#[must_use]
pub fn evaluate_guess(
    ladder: &TrialLadder,
    index: usize,
    balance: i64,
    cap: i64,
    correct: bool,
) -> Option<(i64, GuessVerdict)> {
    let trial: &Trial = ladder.get(index)?;

    if correct {
        return Some((credit(balance, trial.reward, cap), GuessVerdict::Solved));
    }

    let balance = debit(balance, trial.penalty);
    let verdict = if is_eliminated(balance) {
        GuessVerdict::Eliminated
    } else if ladder.is_last(index) {
        GuessVerdict::Exhausted
    } else {
        GuessVerdict::Advance {
            next_index: index + 1,
        }
    };

    Some((balance, verdict))
}
