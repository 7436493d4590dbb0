//! Development helpers that rig the board.
//!
//! [`DebugTools`] only talks to a game through the narrow [`BoardMutator`]
//! interface, so shells opt in by constructing it; the engine never checks
//! for a debug build.

use crate::board::{is_tile_value, SIZE};
use crate::game::GameEvent;
use crate::rng::SpawnRng;

/// Row-major values with no equal neighbours.
const DEAD_BOARD: [u32; SIZE * SIZE] = [
    2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2, 4, 8, 16, 32, 64,
];

/// Values used by [`DebugTools::fill_board`].
const FILL_VALUES: [u32; 6] = [2, 4, 8, 16, 32, 64];

/// Direct write access to a game's board and score.
pub trait BoardMutator {
    fn empty_cells(&self) -> Vec<(usize, usize)>;

    /// Put a fresh tile at `(row, col)`, replacing any tile there.
    /// Callers pass a valid tile value (see [`is_tile_value`]).
    fn place_tile(&mut self, value: u32, row: usize, col: usize);

    fn clear_cell(&mut self, row: usize, col: usize);

    fn add_score(&mut self, points: u32);

    /// Returns false if `level` is not an achievement level.
    fn set_target_level(&mut self, level: u32) -> bool;

    /// Leave the won state without any checks, so the next [`refresh`]
    /// scans achievements again.
    ///
    /// [`refresh`]: BoardMutator::refresh
    fn dismiss_win(&mut self);

    /// Re-run the post-move checks (achievements, then game over).
    fn refresh(&mut self) -> Vec<GameEvent>;

    fn force_game_over(&mut self) -> Vec<GameEvent>;
}

pub struct DebugTools<'a, M: BoardMutator + ?Sized> {
    target: &'a mut M,
}

impl<'a, M: BoardMutator + ?Sized> DebugTools<'a, M> {
    pub fn new(target: &'a mut M) -> Self {
        DebugTools { target }
    }

    /// Fill the board with a dead pattern and end the game.
    pub fn trigger_game_over(&mut self) -> Vec<GameEvent> {
        for (i, &value) in DEAD_BOARD.iter().enumerate() {
            self.target.place_tile(value, i / SIZE, i % SIZE);
        }
        self.target.force_game_over()
    }

    /// Drop a `level` tile in the top-left corner, credit its value, aim
    /// for that level and evaluate. A pending win is dismissed first.
    /// Does nothing for a value no tile can hold.
    pub fn trigger_win(&mut self, level: u32) -> Vec<GameEvent> {
        if !is_tile_value(level) {
            return Vec::new();
        }
        self.target.clear_cell(0, 0);
        self.target.place_tile(level, 0, 0);
        self.target.add_score(level);
        self.target.set_target_level(level);
        self.target.dismiss_win();
        self.target.refresh()
    }

    /// Replace every cell with a random small tile. No evaluation.
    pub fn fill_board<R: SpawnRng + ?Sized>(&mut self, rng: &mut R) {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = FILL_VALUES[rng.next_index(FILL_VALUES.len())];
                self.target.place_tile(value, row, col);
            }
        }
    }

    /// Place `value` in the first empty cell, or the top-left corner when
    /// the board is full. No evaluation.
    ///
    /// Returns `None`, leaving the board alone, unless `value` is a power of
    /// two of at least 2.
    pub fn add_tile(&mut self, value: u32) -> Option<(usize, usize)> {
        if !is_tile_value(value) {
            return None;
        }
        let (row, col) = self.target.empty_cells().first().copied().unwrap_or((0, 0));
        self.target.place_tile(value, row, col);
        Some((row, col))
    }
}
