//! Property-based tests for the round engine using proptest.
//!
//! Random command sequences, valid or not, are fed to the engine and the
//! state is checked after every step.

use proptest::prelude::*;

use clip_crush::core::{
    Command, Effect, EngineConfig, GamePhase, GameState, RequestId, TeamId, Trial, TrialLadder,
};
use clip_crush::rules::RoundEngine;
use clip_crush::tracks::{SearchOutcome, Track};

/// What a host might do next, before it is turned into a `Command`.
#[derive(Clone, Debug)]
enum Move {
    Start,
    Begin,
    Search,
    Resolve { playable: bool },
    Back,
    Confirm,
    Clip,
    ClipDone { succeeded: bool },
    /// Answer an earlier search, picked from every id issued so far.
    LateSearch { pick: usize },
    /// Answer an earlier clip request.
    LateClip { pick: usize, succeeded: bool },
    Guess { correct: bool },
    Skip,
    Abandon,
}

fn arbitrary_move() -> impl Strategy<Value = Move> {
    prop_oneof![
        1 => Just(Move::Start),
        3 => Just(Move::Begin),
        3 => Just(Move::Search),
        3 => any::<bool>().prop_map(|playable| Move::Resolve { playable }),
        1 => Just(Move::Back),
        3 => Just(Move::Confirm),
        2 => Just(Move::Clip),
        2 => any::<bool>().prop_map(|succeeded| Move::ClipDone { succeeded }),
        2 => any::<usize>().prop_map(|pick| Move::LateSearch { pick }),
        2 => (any::<usize>(), any::<bool>())
            .prop_map(|(pick, succeeded)| Move::LateClip { pick, succeeded }),
        8 => any::<bool>().prop_map(|correct| Move::Guess { correct }),
        1 => Just(Move::Skip),
        1 => Just(Move::Abandon),
    ]
}

fn arbitrary_config() -> impl Strategy<Value = EngineConfig> {
    (1i64..60, prop::option::of(0i64..15), any::<bool>()).prop_map(
        |(balance, skip, classic)| {
            let base = if classic {
                EngineConfig::classic()
            } else {
                EngineConfig::default()
            };
            let base = base.with_initial_balance(balance);
            match skip {
                Some(penalty) => base.with_skip_penalty(penalty),
                None => base.without_skip(),
            }
        },
    )
}

fn song() -> Track {
    Track::new(1, "Take On Me", "a-ha").with_preview("tom.mp3")
}

/// Tracks issued request ids so responses can reference them.
#[derive(Default)]
struct Host {
    search: Option<RequestId>,
    clip: Option<RequestId>,
    searches: Vec<RequestId>,
    clips: Vec<RequestId>,
}

fn pick_from(ids: &[RequestId], pick: usize) -> RequestId {
    if ids.is_empty() {
        RequestId(u64::MAX)
    } else {
        ids[pick % ids.len()]
    }
}

impl Host {
    fn command(&self, mv: &Move) -> Command {
        match mv {
            Move::Start => Command::StartGame,
            Move::Begin => Command::BeginRound,
            Move::Search => Command::SubmitSearch {
                query: "a-ha".into(),
            },
            Move::Resolve { playable } => Command::SearchResolved {
                request: self.search.unwrap_or(RequestId(0)),
                outcome: SearchOutcome::Matches(if *playable {
                    vec![song()]
                } else {
                    vec![Track::new(2, "Hunting High and Low", "a-ha")]
                }),
            },
            Move::Back => Command::BackToSearch,
            Move::Confirm => Command::ConfirmTrack { track: song() },
            Move::Clip => Command::RequestClip,
            Move::ClipDone { succeeded } => Command::ClipResolved {
                request: self.clip.unwrap_or(RequestId(0)),
                succeeded: *succeeded,
            },
            Move::LateSearch { pick } => Command::SearchResolved {
                request: pick_from(&self.searches, *pick),
                outcome: SearchOutcome::Matches(vec![song()]),
            },
            Move::LateClip { pick, succeeded } => Command::ClipResolved {
                request: pick_from(&self.clips, *pick),
                succeeded: *succeeded,
            },
            Move::Guess { correct } => Command::ReportGuess { correct: *correct },
            Move::Skip => Command::UseSkip,
            Move::Abandon => Command::AbandonRound,
        }
    }

    fn observe(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Search { request, .. } => {
                    self.search = Some(*request);
                    self.searches.push(*request);
                }
                Effect::ExtractClip { request, .. } => {
                    self.clip = Some(*request);
                    self.clips.push(*request);
                }
                _ => {}
            }
        }
    }
}

/// Fields a rejected command must leave alone.
fn snapshot(state: &GameState) -> (GamePhase, i64, i64, usize, TeamId, bool, bool) {
    (
        state.phase,
        state.balance(TeamId::A),
        state.balance(TeamId::B),
        state.trial_index(),
        state.active_team(),
        state.has_used_skip(TeamId::A),
        state.has_used_skip(TeamId::B),
    )
}

proptest! {
    /// Balances never exceed the starting balance, whatever happens.
    #[test]
    fn balance_never_exceeds_cap(
        config in arbitrary_config(),
        moves in prop::collection::vec(arbitrary_move(), 1..120)
    ) {
        let cap = config.initial_balance;
        let engine = RoundEngine::new(config).unwrap();
        let mut state = engine.initial_state();
        let mut host = Host::default();

        for mv in &moves {
            if let Ok(effects) = engine.step(&mut state, host.command(mv)) {
                host.observe(&effects);
            }
            for team in TeamId::ALL {
                prop_assert!(state.balance(team) <= cap);
            }
        }
    }

    /// While guessing, the trial index always names a rung of the ladder
    /// and a target is set.
    #[test]
    fn trial_index_stays_on_ladder(
        config in arbitrary_config(),
        moves in prop::collection::vec(arbitrary_move(), 1..120)
    ) {
        let rungs = config.ladder.len();
        let engine = RoundEngine::new(config).unwrap();
        let mut state = engine.initial_state();
        let mut host = Host::default();

        for mv in &moves {
            if let Ok(effects) = engine.step(&mut state, host.command(mv)) {
                host.observe(&effects);
            }
            if state.phase == GamePhase::Guessing {
                prop_assert!(state.trial_index() < rungs);
                prop_assert!(state.target().is_some());
                prop_assert!(engine.current_trial(&state).is_some());
            } else if state.phase != GamePhase::GameOver {
                prop_assert_eq!(state.trial_index(), 0);
                prop_assert!(state.target().is_none());
            }
        }
    }

    /// A spent skip stays spent until the next game starts.
    #[test]
    fn skip_flag_only_resets_on_new_game(
        config in arbitrary_config(),
        moves in prop::collection::vec(arbitrary_move(), 1..120)
    ) {
        let engine = RoundEngine::new(config).unwrap();
        let mut state = engine.initial_state();
        let mut host = Host::default();

        for mv in &moves {
            let before = [state.has_used_skip(TeamId::A), state.has_used_skip(TeamId::B)];
            let restarted = matches!(mv, Move::Start);

            if let Ok(effects) = engine.step(&mut state, host.command(mv)) {
                host.observe(&effects);
            }

            if !restarted {
                for (i, team) in TeamId::ALL.into_iter().enumerate() {
                    if before[i] {
                        prop_assert!(state.has_used_skip(team));
                    }
                }
            }
        }
    }

    /// Rejected commands change nothing.
    #[test]
    fn rejected_commands_leave_state_alone(
        config in arbitrary_config(),
        moves in prop::collection::vec(arbitrary_move(), 1..120)
    ) {
        let engine = RoundEngine::new(config).unwrap();
        let mut state = engine.initial_state();
        let mut host = Host::default();

        for mv in &moves {
            let before = snapshot(&state);
            match engine.step(&mut state, host.command(mv)) {
                Ok(effects) => host.observe(&effects),
                Err(_) => prop_assert_eq!(snapshot(&state), before),
            }
        }
    }

    /// Collaborator responses are never rejected, whatever the phase or
    /// however late they arrive.
    #[test]
    fn responses_are_never_rejected(
        config in arbitrary_config(),
        moves in prop::collection::vec(arbitrary_move(), 1..160)
    ) {
        let engine = RoundEngine::new(config).unwrap();
        let mut state = engine.initial_state();
        let mut host = Host::default();

        for mv in &moves {
            let is_response = matches!(
                mv,
                Move::Resolve { .. }
                    | Move::ClipDone { .. }
                    | Move::LateSearch { .. }
                    | Move::LateClip { .. }
            );
            match engine.step(&mut state, host.command(mv)) {
                Ok(effects) => host.observe(&effects),
                Err(err) => prop_assert!(!is_response, "{:?} rejected: {}", mv, err),
            }
        }
    }

    /// Game over always has a winner whose opponent is out of points.
    #[test]
    fn game_over_has_eliminated_loser(
        config in arbitrary_config(),
        moves in prop::collection::vec(arbitrary_move(), 1..200)
    ) {
        let engine = RoundEngine::new(config).unwrap();
        let mut state = engine.initial_state();
        let mut host = Host::default();

        for mv in &moves {
            if let Ok(effects) = engine.step(&mut state, host.command(mv)) {
                host.observe(&effects);
            }
            match engine.result(&state) {
                Some(result) => {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                    prop_assert!(state.balance(result.loser) <= 0);
                    prop_assert!(state.balance(result.winner) > 0);
                }
                None => prop_assert!(state.winner.is_none()),
            }
        }
    }

    /// Arbitrary valid ladders drive clip durations rung by rung.
    #[test]
    fn custom_ladder_durations(steps in prop::collection::vec((1u32..10, 0i64..5), 1..8)) {
        let mut secs = 0;
        let trials: Vec<Trial> = steps
            .iter()
            .enumerate()
            .map(|(i, &(step, penalty))| {
                secs += step;
                Trial::new(i as u32 + 1, secs, penalty)
            })
            .collect();
        let ladder = TrialLadder::new(trials.clone()).unwrap();
        let config = EngineConfig::default()
            .with_ladder(ladder)
            .with_initial_balance(1_000);
        let engine = RoundEngine::new(config).unwrap();

        let mut state = engine.initial_state();
        engine.step(&mut state, Command::StartGame).unwrap();
        engine.step(&mut state, Command::BeginRound).unwrap();
        engine.step(&mut state, Command::ConfirmTrack { track: song() }).unwrap();

        for trial in &trials {
            let effects = engine.step(&mut state, Command::RequestClip).unwrap();
            let duration = effects.iter().find_map(|e| match e {
                Effect::ExtractClip { duration_secs, .. } => Some(*duration_secs),
                _ => None,
            });
            prop_assert_eq!(duration, Some(trial.clip_duration_secs));
            engine.step(&mut state, Command::ReportGuess { correct: false }).unwrap();
        }

        prop_assert_eq!(state.phase, GamePhase::StartScreen);
        prop_assert_eq!(state.active_team(), TeamId::B);
    }
}
