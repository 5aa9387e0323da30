//! Engine configuration: the trial ladder and game constants.
//!
//! Hosts configure the engine at startup by providing:
//! - `TrialLadder`: the escalating clip durations, penalties and rewards
//! - `EngineConfig`: the ladder plus balance cap, skip penalty and
//!   starting-team policy
//!
//! Balancing changes only touch this table; the transition logic in
//! `rules` never hardcodes durations or point values.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::team::TeamId;

/// One rung of the trial ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trial {
    /// 1-based ordinal position in the ladder.
    pub level: u32,

    /// Length of the audio clip revealed at this trial.
    pub clip_duration_secs: u32,

    /// Points deducted from the guessing team on a miss at this trial.
    pub penalty: i64,

    /// Points credited on a correct guess at this trial.
    #[serde(default)]
    pub reward: i64,
}

impl Trial {
    /// Create a trial with no reward.
    #[must_use]
    pub const fn new(level: u32, clip_duration_secs: u32, penalty: i64) -> Self {
        Self {
            level,
            clip_duration_secs,
            penalty,
            reward: 0,
        }
    }

    /// Set the reward for a correct guess at this trial.
    #[must_use]
    pub const fn with_reward(mut self, reward: i64) -> Self {
        self.reward = reward;
        self
    }
}

/// Validated, ordered, non-empty ladder of trials.
///
/// ## Example
///
/// ```
/// use clip_crush::core::{Trial, TrialLadder};
///
/// let ladder = TrialLadder::new(vec![
///     Trial::new(1, 1, 0).with_reward(2),
///     Trial::new(2, 5, 3),
///     Trial::new(3, 15, 10),
/// ])
/// .unwrap();
///
/// assert_eq!(ladder.len(), 3);
/// assert!(ladder.is_last(2));
/// assert_eq!(ladder.durations(), vec![1, 5, 15]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Trial>", into = "Vec<Trial>")]
pub struct TrialLadder {
    trials: Vec<Trial>,
}

impl TrialLadder {
    /// Validate and build a ladder.
    ///
    /// Levels must run `1..=N` in order, clips must be non-empty and
    /// strictly longer at each rung, and point values must not be negative.
    pub fn new(trials: Vec<Trial>) -> Result<Self, ConfigError> {
        if trials.is_empty() {
            return Err(ConfigError::EmptyLadder);
        }

        let mut previous: Option<u32> = None;
        for (index, trial) in trials.iter().enumerate() {
            let expected = index as u32 + 1;
            if trial.level != expected {
                return Err(ConfigError::LevelOutOfOrder {
                    index,
                    found: trial.level,
                    expected,
                });
            }
            if trial.clip_duration_secs == 0 {
                return Err(ConfigError::ZeroDuration { level: trial.level });
            }
            if let Some(previous) = previous {
                if trial.clip_duration_secs <= previous {
                    return Err(ConfigError::DurationNotIncreasing {
                        level: trial.level,
                        previous,
                        found: trial.clip_duration_secs,
                    });
                }
            }
            if trial.penalty < 0 {
                return Err(ConfigError::NegativePenalty {
                    level: trial.level,
                    penalty: trial.penalty,
                });
            }
            if trial.reward < 0 {
                return Err(ConfigError::NegativeReward {
                    level: trial.level,
                    reward: trial.reward,
                });
            }
            previous = Some(trial.clip_duration_secs);
        }

        Ok(Self { trials })
    }

    /// The canonical ladder: a free first miss, a reward for instant
    /// recognition, and steep penalties on the long clips.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            trials: vec![
                Trial::new(1, 1, 0).with_reward(2),
                Trial::new(2, 2, 3),
                Trial::new(3, 5, 5),
                Trial::new(4, 10, 10),
                Trial::new(5, 20, 20),
                Trial::new(6, 30, 25),
            ],
        }
    }

    /// The earlier ladder: every miss costs points, instant recognition
    /// still earns 2. Pair with a config that disables skipping, see
    /// `EngineConfig::classic`.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            trials: vec![
                Trial::new(1, 1, 1).with_reward(2),
                Trial::new(2, 5, 3),
                Trial::new(3, 10, 5),
                Trial::new(4, 20, 10),
                Trial::new(5, 30, 15),
            ],
        }
    }

    /// Trial at `index`, if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Trial> {
        self.trials.get(index)
    }

    /// Number of rungs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Always false for a validated ladder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Index of the longest, final rung.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.trials.len() - 1
    }

    /// Whether `index` is the final rung.
    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        index == self.last_index()
    }

    /// Clip durations in ladder order.
    #[must_use]
    pub fn durations(&self) -> Vec<u32> {
        self.trials.iter().map(|t| t.clip_duration_secs).collect()
    }

    /// Iterate over the trials.
    pub fn iter(&self) -> impl Iterator<Item = &Trial> {
        self.trials.iter()
    }
}

impl Default for TrialLadder {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Trial>> for TrialLadder {
    type Error = ConfigError;

    fn try_from(trials: Vec<Trial>) -> Result<Self, Self::Error> {
        Self::new(trials)
    }
}

impl From<TrialLadder> for Vec<Trial> {
    fn from(ladder: TrialLadder) -> Self {
        ladder.trials
    }
}

/// How `StartGame` chooses the first guessing team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartingTeam {
    /// Always the same team.
    Fixed(TeamId),
    /// The team that did not start the previous game.
    Alternate,
    /// Drawn from the seeded game RNG.
    Random,
}

impl Default for StartingTeam {
    fn default() -> Self {
        StartingTeam::Fixed(TeamId::A)
    }
}

/// Complete engine configuration.
///
/// Missing fields in a JSON document fall back to `EngineConfig::default()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Escalating trials.
    pub ladder: TrialLadder,

    /// Starting balance of each team, and the cap rewards cannot exceed.
    pub initial_balance: i64,

    /// Cost of a skip. `None` disables skipping entirely.
    pub skip_penalty: Option<i64>,

    /// Starting-team policy applied on every `StartGame`.
    pub starting_team: StartingTeam,

    /// Seed for the game RNG.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ladder: TrialLadder::standard(),
            initial_balance: 30,
            skip_penalty: Some(5),
            starting_team: StartingTeam::default(),
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// The canonical configuration (reward ladder with skip).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The earlier rules: classic ladder, no skip.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            ladder: TrialLadder::classic(),
            skip_penalty: None,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the trial ladder.
    #[must_use]
    pub fn with_ladder(mut self, ladder: TrialLadder) -> Self {
        self.ladder = ladder;
        self
    }

    /// Set the initial balance (and cap).
    #[must_use]
    pub fn with_initial_balance(mut self, balance: i64) -> Self {
        self.initial_balance = balance;
        self
    }

    /// Set the skip penalty.
    #[must_use]
    pub fn with_skip_penalty(mut self, penalty: i64) -> Self {
        self.skip_penalty = Some(penalty);
        self
    }

    /// Disable skipping.
    #[must_use]
    pub fn without_skip(mut self) -> Self {
        self.skip_penalty = None;
        self
    }

    /// Set the starting-team policy.
    #[must_use]
    pub fn with_starting_team(mut self, policy: StartingTeam) -> Self {
        self.starting_team = policy;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the scalar settings. The ladder validates itself on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance <= 0 {
            return Err(ConfigError::NonPositiveBalance(self.initial_balance));
        }
        if let Some(penalty) = self.skip_penalty {
            if penalty < 0 {
                return Err(ConfigError::NegativeSkipPenalty(penalty));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ladder() {
        let ladder = TrialLadder::standard();
        let penalties: Vec<_> = ladder.iter().map(|t| t.penalty).collect();
        let rewards: Vec<_> = ladder.iter().map(|t| t.reward).collect();

        assert_eq!(penalties, vec![0, 3, 5, 10, 20, 25]);
        assert_eq!(rewards, vec![2, 0, 0, 0, 0, 0]);
        assert_eq!(ladder.last_index(), 5);
        // The presets must pass their own validation.
        assert_eq!(TrialLadder::new(ladder.clone().into()), Ok(ladder));
    }

    #[test]
    fn test_classic_ladder() {
        let ladder = TrialLadder::classic();
        assert_eq!(ladder.durations(), vec![1, 5, 10, 20, 30]);
        let rewards: Vec<_> = ladder.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![2, 0, 0, 0, 0]);
        assert!(TrialLadder::new(ladder.into()).is_ok());
    }

    #[test]
    fn test_ladder_rejects_empty() {
        assert_eq!(TrialLadder::new(vec![]), Err(ConfigError::EmptyLadder));
    }

    #[test]
    fn test_ladder_rejects_bad_levels() {
        let result = TrialLadder::new(vec![Trial::new(1, 1, 0), Trial::new(3, 2, 1)]);
        assert_eq!(
            result,
            Err(ConfigError::LevelOutOfOrder {
                index: 1,
                found: 3,
                expected: 2
            })
        );
    }

    #[test]
    fn test_ladder_rejects_non_increasing_durations() {
        let result = TrialLadder::new(vec![Trial::new(1, 5, 0), Trial::new(2, 5, 1)]);
        assert!(matches!(
            result,
            Err(ConfigError::DurationNotIncreasing { level: 2, .. })
        ));

        let zero = TrialLadder::new(vec![Trial::new(1, 0, 0)]);
        assert_eq!(zero, Err(ConfigError::ZeroDuration { level: 1 }));
    }

    #[test]
    fn test_ladder_rejects_negative_points() {
        let penalty = TrialLadder::new(vec![Trial::new(1, 1, -1)]);
        assert!(matches!(penalty, Err(ConfigError::NegativePenalty { .. })));

        let reward = TrialLadder::new(vec![Trial::new(1, 1, 0).with_reward(-2)]);
        assert!(matches!(reward, Err(ConfigError::NegativeReward { .. })));
    }

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_balance, 30);
        assert_eq!(config.skip_penalty, Some(5));
        assert_eq!(config.starting_team, StartingTeam::Fixed(TeamId::A));
        assert!(config.validate().is_ok());

        let classic = EngineConfig::classic();
        assert_eq!(classic.skip_penalty, None);
        assert_eq!(classic.ladder, TrialLadder::classic());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new()
            .with_initial_balance(50)
            .with_skip_penalty(8)
            .with_starting_team(StartingTeam::Random)
            .with_seed(7);

        assert_eq!(config.initial_balance, 50);
        assert_eq!(config.skip_penalty, Some(8));
        assert_eq!(config.starting_team, StartingTeam::Random);
        assert_eq!(config.seed, 7);
        assert_eq!(config.without_skip().skip_penalty, None);
    }

    #[test]
    fn test_config_validation() {
        let zero = EngineConfig::new().with_initial_balance(0);
        assert_eq!(zero.validate(), Err(ConfigError::NonPositiveBalance(0)));

        let negative_skip = EngineConfig::new().with_skip_penalty(-1);
        assert_eq!(
            negative_skip.validate(),
            Err(ConfigError::NegativeSkipPenalty(-1))
        );
    }

    #[test]
    fn test_config_from_json_partial() {
        let config = EngineConfig::from_json(r#"{ "initial_balance": 40, "starting_team": "alternate" }"#)
            .unwrap();

        assert_eq!(config.initial_balance, 40);
        assert_eq!(config.starting_team, StartingTeam::Alternate);
        assert_eq!(config.ladder, TrialLadder::standard());
    }

    #[test]
    fn test_config_from_json_ladder() {
        let json = r#"{
            "ladder": [
                { "level": 1, "clip_duration_secs": 2, "penalty": 1, "reward": 3 },
                { "level": 2, "clip_duration_secs": 8, "penalty": 4 }
            ],
            "skip_penalty": null,
            "starting_team": { "fixed": "B" }
        }"#;
        let config = EngineConfig::from_json(json).unwrap();

        assert_eq!(config.ladder.len(), 2);
        assert_eq!(config.ladder.get(0).map(|t| t.reward), Some(3));
        assert_eq!(config.ladder.get(1).map(|t| t.reward), Some(0));
        assert_eq!(config.skip_penalty, None);
        assert_eq!(config.starting_team, StartingTeam::Fixed(TeamId::B));
    }

    #[test]
    fn test_config_from_json_rejects_invalid() {
        let bad_ladder = r#"{ "ladder": [] }"#;
        assert!(matches!(
            EngineConfig::from_json(bad_ladder),
            Err(ConfigError::Parse(_))
        ));

        let bad_balance = r#"{ "initial_balance": -3 }"#;
        assert_eq!(
            EngineConfig::from_json(bad_balance),
            Err(ConfigError::NonPositiveBalance(-3))
        );
    }
}
