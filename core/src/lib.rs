//! # 2048 Game Core Engine
//!
//! A pure Rust implementation of 2048 with selectable target levels
//! (2048 up to 65536), a persisted best score and stable tile identities
//! for animating renderers. Designed to be driven synchronously by a UI
//! shell (terminal or browser); the engine does no I/O of its own.
//!
//! - [`board`]: the grid, slide/merge, spawning, game-over detection
//! - [`achievement`]: achievement levels and the target level state
//! - [`game`]: the session state machine tying them together
//! - [`storage`]: best-effort key-value persistence
//! - [`debug`]: a board mutator for development builds of the shells
//!
//! ## Example
//!
//! ```rust
//! use game_2048_core::{Direction, Game, GameEvent};
//!
//! let mut game = Game::new(42);  // Create game with seed 42
//! let outcome = game.step(Direction::Left);
//! println!("Score: {}, Moved: {}", game.score(), outcome.moved);
//! for event in outcome.events {
//!     if let GameEvent::Achievement { level, .. } = event {
//!         println!("reached {}", level);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

pub mod achievement;
pub mod board;
pub mod debug;
pub mod game;
pub mod rng;
pub mod storage;

pub use achievement::{AchievementTracker, GameMode, ACHIEVEMENT_LEVELS};
pub use board::{is_tile_value, Board, Merge, Tile, SIZE};
pub use debug::{BoardMutator, DebugTools};
pub use game::{Game, GameEvent, GameStatus, MoveOutcome, Snapshot};
pub use rng::{FixedRng, SpawnRng};
pub use storage::{KeyValueStore, MemoryStore, StorageError, UnavailableStore};

/// The four possible move directions in 2048.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Convert a u8 to a Direction (0=Up, 1=Down, 2=Left, 3=Right).
    /// Returns None for invalid values.
    pub fn from_u8(value: u8) -> Option<Direction> {
        match value {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Get all four directions.
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }
}
