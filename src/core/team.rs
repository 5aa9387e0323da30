//! Team identification and per-team data storage.
//!
//! ## TeamId
//!
//! Opaque label for one of the two teams, `A` or `B`. The engine never
//! interprets the label beyond telling the two teams apart.
//!
//! ## TeamMap
//!
//! Fixed two-entry per-team storage backed by an array for O(1) access.
//! Supports iteration and indexing by `TeamId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of teams in a game. Always two.
pub const TEAM_COUNT: usize = 2;

/// Team identifier: `TeamId::A` or `TeamId::B`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamId {
    A,
    B,
}

impl TeamId {
    /// Both teams, in label order.
    pub const ALL: [TeamId; TEAM_COUNT] = [TeamId::A, TeamId::B];

    /// The opposing team.
    ///
    /// ```
    /// use clip_crush::core::TeamId;
    ///
    /// assert_eq!(TeamId::A.other(), TeamId::B);
    /// assert_eq!(TeamId::B.other(), TeamId::A);
    /// ```
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            TeamId::A => TeamId::B,
            TeamId::B => TeamId::A,
        }
    }

    /// 0-based storage index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            TeamId::A => 0,
            TeamId::B => 1,
        }
    }

    /// Single-letter label shown to players.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TeamId::A => "A",
            TeamId::B => "B",
        }
    }

    /// Parse a label back into a team ("A"/"B", case-insensitive).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "A" | "a" => Some(TeamId::A),
            "B" | "b" => Some(TeamId::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.label())
    }
}

/// Per-team data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use clip_crush::core::{TeamId, TeamMap};
///
/// let mut balance: TeamMap<i64> = TeamMap::with_value(30);
/// balance[TeamId::B] -= 5;
///
/// assert_eq!(balance[TeamId::A], 30);
/// assert_eq!(balance[TeamId::B], 25);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    data: [T; TEAM_COUNT],
}

impl<T> TeamMap<T> {
    /// Create a new TeamMap with values from a factory function.
    pub fn new(factory: impl Fn(TeamId) -> T) -> Self {
        Self {
            data: [factory(TeamId::A), factory(TeamId::B)],
        }
    }

    /// Create a new TeamMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a team's data.
    #[must_use]
    pub fn get(&self, team: TeamId) -> &T {
        &self.data[team.index()]
    }

    /// Get a mutable reference to a team's data.
    pub fn get_mut(&mut self, team: TeamId) -> &mut T {
        &mut self.data[team.index()]
    }

    /// Iterate over (TeamId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &T)> {
        TeamId::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (TeamId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TeamId, &mut T)> {
        TeamId::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for TeamMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<TeamId> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: TeamId) -> &Self::Output {
        self.get(team)
    }
}

impl<T> IndexMut<TeamId> for TeamMap<T> {
    fn index_mut(&mut self, team: TeamId) -> &mut Self::Output {
        self.get_mut(team)
    }
}
