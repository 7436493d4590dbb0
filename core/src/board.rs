//! The 4x4 tile grid: sliding, merging, spawning and terminal detection.
//!
//! Every direction is reduced to a single "slide towards index 0" primitive
//! ([`slide_line`]) by reading each row or column in the order the tiles
//! travel, sliding it, and writing it back in the same order.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::rng::SpawnRng;
use crate::Direction;

/// Width and height of the board.
pub const SIZE: usize = 4;

/// Probability that a spawned tile is a 2 (otherwise a 4).
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Whether `value` can appear on a tile: a power of two, 2 or more.
pub fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// A numbered tile.
///
/// The `id` is stable for the lifetime of the tile: when two tiles merge the
/// survivor keeps its id and the absorbed tile is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub value: u32,
    pub row: usize,
    pub col: usize,
}

/// A single grid cell.
pub type Cell = Option<Tile>;

/// One row or column, ordered in the direction of travel.
pub type Line = [Cell; SIZE];

/// Two tiles combined during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// Id of the tile that survived with the doubled value.
    pub survivor: u32,
    /// Id of the tile that was destroyed.
    pub absorbed: u32,
    /// Value of the survivor after the merge.
    pub value: u32,
}

/// Result of sliding one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideResult {
    pub line: Line,
    /// Whether the sequence of values differs from the input.
    pub moved: bool,
    /// Sum of the values created by merges.
    pub score: u32,
    pub merges: Vec<Merge>,
}

/// Result of shifting the whole board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shift {
    pub moved: bool,
    pub score: u32,
    pub merges: Vec<Merge>,
}

/// Slide and merge a line towards index 0.
///
/// Algorithm:
/// 1. Compress: move all tiles to the front, keeping their order
/// 2. Merge: one left-to-right pass over adjacent pairs; a merged tile
///    cannot merge again in the same move
/// 3. Compress again
pub fn slide_line(line: &Line) -> SlideResult {
    let mut out = *line;
    compress(&mut out);

    let mut score = 0;
    let mut merges = Vec::new();
    for i in 0..SIZE - 1 {
        if let (Some(left), Some(right)) = (out[i], out[i + 1]) {
            if left.value == right.value {
                let value = left.value * 2;
                out[i] = Some(Tile { value, ..left });
                out[i + 1] = None;
                score += value;
                merges.push(Merge {
                    survivor: left.id,
                    absorbed: right.id,
                    value,
                });
            }
        }
    }

    compress(&mut out);

    SlideResult {
        moved: line_values(line) != line_values(&out),
        line: out,
        score,
        merges,
    }
}

/// Compress a line by moving all tiles to the front.
fn compress(line: &mut Line) {
    let mut write_idx = 0;
    for read_idx in 0..SIZE {
        if line[read_idx].is_some() {
            if write_idx != read_idx {
                let tile = line[read_idx].take();
                line[write_idx] = tile;
            }
            write_idx += 1;
        }
    }
}

fn line_values(line: &Line) -> [u32; SIZE] {
    line.map(|cell| cell.map_or(0, |tile| tile.value))
}

/// Cell coordinates of the `index`-th line for `direction`, listed in the
/// order tiles travel (the first coordinate is the wall they slide into).
fn line_coords(direction: Direction, index: usize) -> [(usize, usize); SIZE] {
    let mut coords = [(0, 0); SIZE];
    for (k, coord) in coords.iter_mut().enumerate() {
        *coord = match direction {
            Direction::Left => (index, k),
            Direction::Right => (index, SIZE - 1 - k),
            Direction::Up => (k, index),
            Direction::Down => (SIZE - 1 - k, index),
        };
    }
    coords
}

/// The game grid.
///
/// Owns its tiles and hands out fresh ids from a counter that only resets
/// on [`Board::clear`].
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE],
    last_id: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Board {
            cells: [[None; SIZE]; SIZE],
            last_id: 0,
        }
    }

    /// Build a board from raw values (0 = empty). Ids are handed out
    /// in row-major order starting at 1.
    pub fn from_values(values: [[u32; SIZE]; SIZE]) -> Self {
        let mut board = Board::new();
        for (row, line) in values.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value != 0 {
                    board.place(value, row, col);
                }
            }
        }
        board
    }

    /// Remove every tile and reset the id counter.
    pub fn clear(&mut self) {
        *self = Board::new();
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Tile> {
        self.cells[row][col].as_ref()
    }

    /// Iterate over tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten().flatten()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Cell values in row-major order, 0 for empty cells.
    pub fn values(&self) -> [[u32; SIZE]; SIZE] {
        self.cells.map(|row| line_values(&row))
    }

    /// Coordinates of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cells[row][col].is_none())
            .collect()
    }

    /// Highest tile value on the board, 0 when empty.
    pub fn highest_tile(&self) -> u32 {
        self.tiles().map(|tile| tile.value).max().unwrap_or(0)
    }

    /// Put a new tile with a fresh id at `(row, col)`, replacing whatever
    /// was there. `value` must satisfy [`is_tile_value`].
    pub fn place(&mut self, value: u32, row: usize, col: usize) -> Tile {
        debug_assert!(is_tile_value(value), "invalid tile value {}", value);
        self.last_id += 1;
        let tile = Tile {
            id: self.last_id,
            value,
            row,
            col,
        };
        self.cells[row][col] = Some(tile);
        tile
    }

    /// Remove and return the tile at `(row, col)`.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<Tile> {
        self.cells[row][col].take()
    }

    /// Spawn a tile in a uniformly chosen empty cell.
    /// 90% chance of 2, 10% chance of 4. Returns `None` on a full board.
    pub fn spawn_random<R: SpawnRng + ?Sized>(&mut self, rng: &mut R) -> Option<Tile> {
        let empty_cells = self.empty_cells();
        if empty_cells.is_empty() {
            return None;
        }

        let (row, col) = empty_cells[rng.next_index(empty_cells.len())];
        let value = if rng.next_unit() < SPAWN_TWO_PROBABILITY {
            2
        } else {
            4
        };
        let tile = self.place(value, row, col);
        debug!("spawned {} at ({}, {}) id={}", value, row, col, tile.id);
        Some(tile)
    }

    /// Slide every line towards `direction`.
    ///
    /// Tiles are moved in place; `row`/`col` of each tile are updated to its
    /// new cell. When nothing changes the board is left exactly as it was.
    pub fn shift(&mut self, direction: Direction) -> Shift {
        let mut shift = Shift::default();

        for index in 0..SIZE {
            let coords = line_coords(direction, index);
            let line = coords.map(|(row, col)| self.cells[row][col]);
            let result = slide_line(&line);
            if !result.moved {
                continue;
            }

            shift.moved = true;
            shift.score += result.score;
            shift.merges.extend(result.merges);
            for ((row, col), cell) in coords.into_iter().zip(result.line) {
                self.cells[row][col] = cell.map(|tile| Tile { row, col, ..tile });
            }
        }

        shift
    }

    /// Whether `direction` would change the board.
    pub fn can_shift(&self, direction: Direction) -> bool {
        self.clone().shift(direction).moved
    }

    /// True when the board is full and no two orthogonal neighbours match.
    pub fn is_game_over(&self) -> bool {
        if !self.empty_cells().is_empty() {
            return false;
        }

        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = self.cells[row][col].map(|tile| tile.value);
                let right = (col + 1 < SIZE).then(|| self.cells[row][col + 1]).flatten();
                let below = (row + 1 < SIZE).then(|| self.cells[row + 1][col]).flatten();
                if [right, below]
                    .iter()
                    .flatten()
                    .any(|neighbour| Some(neighbour.value) == value)
                {
                    return false;
                }
            }
        }

        true
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ tiles: {} }}", self.tile_count())?;
        for row in self.values() {
            for value in row {
                if value == 0 {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+------+------+------+------+")?;
        for row in self.values() {
            write!(f, "|")?;
            for value in row {
                if value == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", value)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
