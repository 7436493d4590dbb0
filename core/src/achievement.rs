//! Achievement levels and the selectable target level (game mode).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tile values that count as achievements, ascending.
pub const ACHIEVEMENT_LEVELS: [u32; 6] = [2048, 4096, 8192, 16384, 32768, 65536];

/// The level a player must reach to win, stored as an index into
/// [`ACHIEVEMENT_LEVELS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GameMode(usize);

impl GameMode {
    pub fn from_index(index: usize) -> Option<Self> {
        (index < ACHIEVEMENT_LEVELS.len()).then_some(GameMode(index))
    }

    pub fn from_level(level: u32) -> Option<Self> {
        ACHIEVEMENT_LEVELS
            .iter()
            .position(|&l| l == level)
            .map(GameMode)
    }

    /// All modes, easiest first.
    pub fn all() -> impl Iterator<Item = GameMode> {
        (0..ACHIEVEMENT_LEVELS.len()).map(GameMode)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn level(self) -> u32 {
        ACHIEVEMENT_LEVELS[self.0]
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// A value that is not one of the [`ACHIEVEMENT_LEVELS`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is not an achievement level (expected one of 2048..=65536)")]
pub struct InvalidLevel(pub String);

impl FromStr for GameMode {
    type Err = InvalidLevel;

    /// Parses a level value such as `"4096"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(GameMode::from_level)
            .ok_or_else(|| InvalidLevel(s.to_string()))
    }
}

impl TryFrom<u32> for GameMode {
    type Error = InvalidLevel;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        GameMode::from_level(level).ok_or_else(|| InvalidLevel(level.to_string()))
    }
}

impl From<GameMode> for u32 {
    fn from(mode: GameMode) -> u32 {
        mode.level()
    }
}

/// A level crossed for the first time this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub level: u32,
    /// The level was at or above the target when it was crossed.
    pub is_win: bool,
}

/// Tracks completed levels and the current target within one session.
///
/// The target starts at the selected [`GameMode`] and moves one level past
/// every level that wins, so continuing after a win aims for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementTracker {
    completed: BTreeSet<u32>,
    target_index: usize,
}

impl AchievementTracker {
    pub fn new(mode: GameMode) -> Self {
        AchievementTracker {
            completed: BTreeSet::new(),
            target_index: mode.index(),
        }
    }

    /// Forget completed levels and aim for `mode` again.
    pub fn reset(&mut self, mode: GameMode) {
        self.completed.clear();
        self.target_index = mode.index();
    }

    /// Index of the level that wins next. Equals `ACHIEVEMENT_LEVELS.len()`
    /// once the top level has been won.
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Level that wins next, `None` once every level has been won.
    pub fn target_level(&self) -> Option<u32> {
        ACHIEVEMENT_LEVELS.get(self.target_index).copied()
    }

    /// Point the target directly at `level`. Returns false for a value that
    /// is not an achievement level.
    pub fn set_target_level(&mut self, level: u32) -> bool {
        match GameMode::from_level(level) {
            Some(mode) => {
                self.target_index = mode.index();
                true
            }
            None => false,
        }
    }

    pub fn is_completed(&self, level: u32) -> bool {
        self.completed.contains(&level)
    }

    /// Completed levels, ascending.
    pub fn completed(&self) -> impl Iterator<Item = u32> + '_ {
        self.completed.iter().copied()
    }

    /// Record every level that `highest_tile` reaches and that was not
    /// completed before, ascending.
    pub fn scan(&mut self, highest_tile: u32) -> Vec<Achievement> {
        let mut reached = Vec::new();
        for (index, &level) in ACHIEVEMENT_LEVELS.iter().enumerate() {
            if highest_tile < level || !self.completed.insert(level) {
                continue;
            }

            let is_win = index >= self.target_index;
            if is_win {
                self.target_index = self.target_index.max(index + 1);
            }
            reached.push(Achievement { level, is_win });
        }
        reached
    }
}
