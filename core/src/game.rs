//! A game session: board, score, best score and the win/loss state machine.

use std::fmt;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::achievement::{AchievementTracker, GameMode};
use crate::board::{Board, Merge, Tile};
use crate::debug::BoardMutator;
use crate::rng::SpawnRng;
use crate::storage::{self, KeyValueStore, MemoryStore};
use crate::Direction;

/// Share of the best score a finished game must beat to count as "near best".
const NEAR_BEST_RATIO: f64 = 0.8;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    #[default]
    Playing,
    /// A target level was reached. Moves are still accepted; achievements
    /// are not re-scanned until [`Game::continue_game`].
    Won,
    /// No legal move remains. Only [`Game::restart`] leaves this state.
    Over,
}

/// Something the UI should announce after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameEvent {
    Achievement {
        level: u32,
        is_win: bool,
        /// Score beats the best score from when this game started.
        is_new_record: bool,
    },
    GameOver {
        final_score: u32,
        highest_tile: u32,
        /// Final score is above 80% of the best score.
        near_best: bool,
    },
}

/// Result of [`Game::step`].
///
/// A move that changes nothing yields the default value: `moved == false`,
/// no score, no spawn and no events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub moved: bool,
    /// Points earned from merges in this move.
    pub score_gained: u32,
    pub merges: Vec<Merge>,
    pub spawned: Option<Tile>,
    pub events: Vec<GameEvent>,
}

/// Everything a renderer needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Occupied cells in row-major order.
    pub tiles: Vec<Tile>,
    pub score: u32,
    pub best_score: u32,
    pub highest_tile: u32,
    pub status: GameStatus,
    pub mode: GameMode,
    /// `None` once every level has been won.
    pub target_level: Option<u32>,
    pub completed_levels: Vec<u32>,
}

/// The 2048 session.
///
/// Generic over the persistence backend `S` and the spawn randomness `R`.
/// [`Game::new`] gives an in-memory store and a seeded [`SmallRng`].
#[derive(Debug, Clone)]
pub struct Game<S = MemoryStore, R = SmallRng> {
    board: Board,
    score: u32,
    best_score: u32,
    best_at_start: u32,
    status: GameStatus,
    mode: GameMode,
    tracker: AchievementTracker,
    store: S,
    rng: R,
}

impl Game {
    /// Create a game with the given seed and no persistence.
    ///
    /// The game starts with two random tiles (90% chance of 2, 10% chance of 4).
    pub fn new(seed: u64) -> Self {
        Game::with_store(MemoryStore::new(), seed)
    }
}

impl<S: KeyValueStore> Game<S, SmallRng> {
    /// Create a seeded game that loads and saves through `store`.
    pub fn with_store(store: S, seed: u64) -> Self {
        Game::from_parts(store, SmallRng::seed_from_u64(seed))
    }

    /// Reseed and restart.
    pub fn reset(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
        self.restart();
    }
}

impl<S: KeyValueStore, R: SpawnRng> Game<S, R> {
    /// Create a game, reading the best score and mode from `store`.
    pub fn from_parts(store: S, rng: R) -> Self {
        let best_score = storage::load_best_score(&store);
        let mode = storage::load_game_mode(&store);
        let mut game = Game {
            board: Board::new(),
            score: 0,
            best_score,
            best_at_start: best_score,
            status: GameStatus::Playing,
            mode,
            tracker: AchievementTracker::new(mode),
            store,
            rng,
        };
        game.restart();
        game
    }

    /// Execute a move in the given direction.
    ///
    /// Ignored entirely when the game is over or when no tile would move.
    /// Otherwise merges are scored, one tile is spawned, and the new board is
    /// checked for achievements and game over.
    pub fn step(&mut self, direction: Direction) -> MoveOutcome {
        if self.status == GameStatus::Over {
            debug!("ignoring {:?}: game is over", direction);
            return MoveOutcome::default();
        }

        let shift = self.board.shift(direction);
        if !shift.moved {
            debug!("ignoring {:?}: nothing moves", direction);
            return MoveOutcome::default();
        }

        self.score += shift.score;
        let spawned = self.board.spawn_random(&mut self.rng);
        let events = self.evaluate();
        debug!(
            "moved {:?}: +{} (score {}), {} merge(s)",
            direction,
            shift.score,
            self.score,
            shift.merges.len()
        );

        MoveOutcome {
            moved: true,
            score_gained: shift.score,
            merges: shift.merges,
            spawned,
            events,
        }
    }

    /// Empty the board, zero the score, forget completed levels, aim for the
    /// selected mode again and spawn two tiles. The best score is kept.
    pub fn restart(&mut self) {
        self.board.clear();
        self.score = 0;
        self.status = GameStatus::Playing;
        self.tracker.reset(self.mode);
        self.best_at_start = self.best_score;
        self.board.spawn_random(&mut self.rng);
        self.board.spawn_random(&mut self.rng);
        info!("new game, target {}", self.mode);
    }

    /// Dismiss a win and keep playing towards the next level.
    /// Does nothing unless the game is in [`GameStatus::Won`].
    ///
    /// The winning move skips the game-over check, so a board left without
    /// moves ends the game here and the `GameOver` event is returned.
    pub fn continue_game(&mut self) -> Vec<GameEvent> {
        if self.status != GameStatus::Won {
            return Vec::new();
        }
        self.status = GameStatus::Playing;
        info!("continuing, next target {:?}", self.tracker.target_level());
        if self.board.is_game_over() {
            return vec![self.finish()];
        }
        Vec::new()
    }

    /// Select a new target level, persist it and restart.
    pub fn change_game_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        storage::save_game_mode(&mut self.store, mode);
        info!("game mode changed to {}", mode);
        self.restart();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Check if the game is over (no legal moves available).
    pub fn is_done(&self) -> bool {
        self.status == GameStatus::Over
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    /// The selected (persisted) game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// The level that wins next in this session.
    pub fn target_level(&self) -> Option<u32> {
        self.tracker.target_level()
    }

    /// Levels reached this session, ascending.
    pub fn completed_levels(&self) -> Vec<u32> {
        self.tracker.completed().collect()
    }

    /// Get the maximum tile value on the board.
    pub fn highest_tile(&self) -> u32 {
        self.board.highest_tile()
    }

    /// Which moves would change the board, in [`Direction::all`] order.
    pub fn legal_directions(&self) -> [bool; 4] {
        Direction::all().map(|direction| self.board.can_shift(direction))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tiles: self.board.tiles().copied().collect(),
            score: self.score,
            best_score: self.best_score,
            highest_tile: self.board.highest_tile(),
            status: self.status,
            mode: self.mode,
            target_level: self.tracker.target_level(),
            completed_levels: self.completed_levels(),
        }
    }

    fn record_score(&mut self) {
        if self.score > self.best_score {
            self.best_score = self.score;
            storage::save_best_score(&mut self.store, self.best_score);
        }
    }

    /// Update the best score, then look for new achievements and game over.
    /// A win on this evaluation takes priority over game over.
    fn evaluate(&mut self) -> Vec<GameEvent> {
        self.record_score();

        let mut events = Vec::new();
        let mut just_won = false;
        if self.status == GameStatus::Playing {
            for achievement in self.tracker.scan(self.board.highest_tile()) {
                if achievement.is_win {
                    self.status = GameStatus::Won;
                    just_won = true;
                }
                info!(
                    "reached {} (win: {}, score {})",
                    achievement.level, achievement.is_win, self.score
                );
                events.push(GameEvent::Achievement {
                    level: achievement.level,
                    is_win: achievement.is_win,
                    is_new_record: self.score > self.best_at_start,
                });
            }
        }

        if !just_won && self.status != GameStatus::Over && self.board.is_game_over() {
            events.push(self.finish());
        }

        events
    }

    fn finish(&mut self) -> GameEvent {
        self.status = GameStatus::Over;
        info!(
            "game over: score {}, highest tile {}",
            self.score,
            self.board.highest_tile()
        );
        GameEvent::GameOver {
            final_score: self.score,
            highest_tile: self.board.highest_tile(),
            near_best: f64::from(self.score) > f64::from(self.best_score) * NEAR_BEST_RATIO,
        }
    }
}

impl<S: KeyValueStore, R: SpawnRng> BoardMutator for Game<S, R> {
    fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.board.empty_cells()
    }

    fn place_tile(&mut self, value: u32, row: usize, col: usize) {
        self.board.place(value, row, col);
    }

    fn clear_cell(&mut self, row: usize, col: usize) {
        self.board.remove(row, col);
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
        self.record_score();
    }

    fn set_target_level(&mut self, level: u32) -> bool {
        self.tracker.set_target_level(level)
    }

    fn dismiss_win(&mut self) {
        if self.status == GameStatus::Won {
            self.status = GameStatus::Playing;
        }
    }

    fn refresh(&mut self) -> Vec<GameEvent> {
        self.evaluate()
    }

    fn force_game_over(&mut self) -> Vec<GameEvent> {
        self.record_score();
        if self.status == GameStatus::Over {
            return Vec::new();
        }
        vec![self.finish()]
    }
}

impl<S, R> fmt::Display for Game<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}  Best: {}", self.score, self.best_score)?;
        write!(f, "{}", self.board)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRng;
    use crate::storage::{UnavailableStore, BEST_SCORE_KEY, GAME_MODE_KEY};

    fn fixed_game() -> Game<MemoryStore, FixedRng> {
        Game::from_parts(MemoryStore::new(), FixedRng::new(0.05))
    }

    fn game_with_mode(level: u32) -> Game<MemoryStore, FixedRng> {
        let mut store = MemoryStore::new();
        storage::save_game_mode(&mut store, GameMode::from_level(level).unwrap());
        Game::from_parts(store, FixedRng::new(0.05))
    }

    const CHECKERBOARD: [[u32; 4]; 4] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    // -------------------------------------------------------------------------
    // Lifecycle tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_game_has_two_tiles() {
        let game = Game::new(42);
        let ids: Vec<u32> = game.board().tiles().map(|t| t.id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.iter().copied().max(), Some(2));
        assert_eq!(game.score(), 0);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(game.board().tiles().all(|t| t.value == 2 || t.value == 4));
    }

    #[test]
    fn test_restart_resets_session_but_keeps_best() {
        let mut game = fixed_game();
        game.board = Board::from_values([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        game.step(Direction::Left);
        assert!(game.is_won());

        game.restart();
        assert_eq!(game.score(), 0);
        assert_eq!(game.best_score(), 2048);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(game.completed_levels().is_empty());
        assert_eq!(game.target_level(), Some(2048));
        let mut ids: Vec<u32> = game.board().tiles().map(|t| t.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_step_determinism() {
        let mut game1 = Game::new(54321);
        let mut game2 = Game::new(54321);

        let directions = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
        for direction in directions.iter().cycle().take(40) {
            game1.step(*direction);
            game2.step(*direction);
            assert_eq!(game1.board(), game2.board());
            assert_eq!(game1.score(), game2.score());
        }
    }

    #[test]
    fn test_reset_with_same_seed_replays_start() {
        let mut game = Game::new(42);
        game.step(Direction::Left);
        game.step(Direction::Up);

        game.reset(42);
        let fresh = Game::new(42);
        assert_eq!(game.board(), fresh.board());
        assert_eq!(game.score(), 0);
    }

    // -------------------------------------------------------------------------
    // Move tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_move_merges_pairs_and_keeps_ids() {
        let mut game = fixed_game();
        game.board = Board::from_values([[2, 2, 4, 4], [0; 4], [0; 4], [0; 4]]);

        let outcome = game.step(Direction::Left);

        assert!(outcome.moved);
        assert_eq!(outcome.score_gained, 12);
        assert_eq!(game.score(), 12);
        let first = game.board().cell(0, 0).copied().unwrap();
        let second = game.board().cell(0, 1).copied().unwrap();
        assert_eq!((first.id, first.value), (1, 4));
        assert_eq!((second.id, second.value), (3, 8));
        assert_eq!(outcome.merges.len(), 2);

        // One new tile with a fresh id in a previously empty cell.
        let spawned = outcome.spawned.unwrap();
        assert_eq!(spawned.id, 5);
        assert_eq!(spawned.value, 2);
        assert_eq!((spawned.row, spawned.col), (0, 2));
        assert_eq!(game.board().tile_count(), 3);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_noop_move_changes_nothing() {
        let mut game = fixed_game();
        game.board = Board::from_values([[2, 0, 0, 0], [4, 0, 0, 0], [8, 0, 0, 0], [16, 0, 0, 0]]);
        game.score = 20;
        let before = game.board().clone();

        let outcome = game.step(Direction::Left);

        assert_eq!(outcome, MoveOutcome::default());
        assert_eq!(game.board(), &before);
        assert_eq!(game.score(), 20);
    }

    #[test]
    fn test_move_into_game_over() {
        let mut game = fixed_game();
        game.board =
            Board::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [0, 8, 16, 32]]);

        let outcome = game.step(Direction::Left);

        assert!(outcome.moved);
        assert!(game.is_done());
        assert_eq!(
            outcome.events,
            vec![GameEvent::GameOver {
                final_score: 0,
                highest_tile: 32,
                near_best: false,
            }]
        );
    }

    #[test]
    fn test_moves_after_game_over_are_ignored() {
        let mut game = fixed_game();
        game.board = Board::from_values(CHECKERBOARD);
        game.status = GameStatus::Over;
        let before = game.board().clone();

        for direction in Direction::all() {
            assert!(!game.step(direction).moved);
        }
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_legal_directions() {
        let mut game = fixed_game();
        game.board = Board::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        // [Up, Down, Left, Right]
        assert_eq!(game.legal_directions(), [false, true, false, true]);
    }

    // -------------------------------------------------------------------------
    // Achievement tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_reaching_target_wins() {
        let mut game = fixed_game();
        game.board = Board::from_values([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = game.step(Direction::Left);

        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(
            outcome.events,
            vec![GameEvent::Achievement {
                level: 2048,
                is_win: true,
                is_new_record: true,
            }]
        );
        assert_eq!(game.target_level(), Some(4096));
        assert_eq!(game.completed_levels(), vec![2048]);
    }

    #[test]
    fn test_win_gated_by_mode() {
        let mut game = game_with_mode(4096);
        assert_eq!(game.mode().level(), 4096);

        game.board = Board::from_values([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = game.step(Direction::Left);
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(
            outcome.events,
            vec![GameEvent::Achievement {
                level: 2048,
                is_win: false,
                is_new_record: true,
            }]
        );

        game.board = Board::from_values([[2048, 2048, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = game.step(Direction::Left);
        assert_eq!(game.status(), GameStatus::Won);
        assert!(matches!(
            outcome.events.as_slice(),
            [GameEvent::Achievement { level: 4096, is_win: true, .. }]
        ));
    }

    #[test]
    fn test_simultaneous_levels_all_reported() {
        let mut game = fixed_game();
        game.board = Board::from_values([[0, 4096, 0, 0], [0; 4], [0; 4], [0; 4]]);

        let outcome = game.step(Direction::Left);

        let levels: Vec<u32> = outcome
            .events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Achievement { level, .. } => Some(*level),
                GameEvent::GameOver { .. } => None,
            })
            .collect();
        assert_eq!(levels, vec![2048, 4096]);
        assert_eq!(game.target_level(), Some(8192));
    }

    #[test]
    fn test_won_state_skips_scan_until_continue() {
        let mut game = fixed_game();
        game.board = Board::from_values([[1024, 1024, 2048, 0], [0; 4], [0; 4], [0; 4]]);
        game.step(Direction::Left);
        assert!(game.is_won());
        assert_eq!(game.board().values()[0][..2], [2048, 2048]);

        // Still accepted while the win is showing, but no new achievement.
        let outcome = game.step(Direction::Left);
        assert!(outcome.moved);
        assert!(outcome.events.is_empty());
        assert_eq!(game.highest_tile(), 4096);
        assert_eq!(game.completed_levels(), vec![2048]);

        // Continuing keeps the board and score, and picks up the new level.
        let score = game.score();
        assert!(game.continue_game().is_empty());
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.score(), score);
        game.board = Board::from_values([[4096, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = game.step(Direction::Right);
        assert!(matches!(
            outcome.events.as_slice(),
            [GameEvent::Achievement { level: 4096, is_win: true, .. }]
        ));
        assert!(game.is_won());
    }

    #[test]
    fn test_win_takes_priority_over_game_over() {
        let mut game = fixed_game();
        // After the merge and spawn the board is full with no pairs.
        game.board = Board::from_values([
            [1024, 1024, 4, 8],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        let outcome = game.step(Direction::Left);
        assert!(game.board().is_game_over());
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(outcome.events.len(), 1);

        // Continuing notices the dead board.
        let events = game.continue_game();
        assert!(matches!(events.as_slice(), [GameEvent::GameOver { .. }]));
        assert!(game.is_done());
    }

    #[test]
    fn test_continue_on_dead_board_ends_game() {
        let mut game = fixed_game();
        game.board = Board::from_values([
            [1024, 1024, 4, 8],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        game.step(Direction::Left);
        assert!(game.is_won());

        let events = game.continue_game();
        assert_eq!(game.status(), GameStatus::Over);
        assert!(game.is_done());
        match events.as_slice() {
            [GameEvent::GameOver {
                final_score,
                highest_tile,
                ..
            }] => {
                assert_eq!(*final_score, game.score());
                assert_eq!(*highest_tile, 2048);
            }
            other => panic!("expected a single game over, got {:?}", other),
        }

        let board = game.board().values();
        for direction in Direction::all() {
            let outcome = game.step(direction);
            assert!(!outcome.moved);
            assert!(outcome.events.is_empty());
        }
        assert_eq!(game.board().values(), board);
        assert!(game.continue_game().is_empty());
    }

    #[test]
    fn test_continue_outside_won_is_noop() {
        let mut game = fixed_game();
        game.board = Board::from_values(CHECKERBOARD);
        game.status = GameStatus::Over;
        assert!(game.continue_game().is_empty());
        assert_eq!(game.status(), GameStatus::Over);
    }

    // -------------------------------------------------------------------------
    // Persistence tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_best_score_persists_and_reloads() {
        let mut game = fixed_game();
        game.board = Board::from_values([[2, 2, 4, 4], [0; 4], [0; 4], [0; 4]]);
        game.step(Direction::Left);
        assert_eq!(game.best_score(), 12);
        assert_eq!(game.store().get(BEST_SCORE_KEY).unwrap().as_deref(), Some("12"));

        let reloaded = Game::from_parts(game.store().clone(), FixedRng::new(0.05));
        assert_eq!(reloaded.best_score(), 12);
    }

    #[test]
    fn test_change_game_mode_persists_and_restarts() {
        let mut game = fixed_game();
        game.board = Board::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        game.step(Direction::Left);
        assert_eq!(game.score(), 4);

        game.change_game_mode(GameMode::from_level(16384).unwrap());

        assert_eq!(game.score(), 0);
        assert_eq!(game.board().tile_count(), 2);
        assert_eq!(game.target_level(), Some(16384));
        assert_eq!(game.store().get(GAME_MODE_KEY).unwrap().as_deref(), Some("3"));
        assert_eq!(game.best_score(), 4);
    }

    #[test]
    fn test_unavailable_store_falls_back_to_defaults() {
        let mut game = Game::with_store(UnavailableStore, 7);
        assert_eq!(game.best_score(), 0);
        assert_eq!(game.mode(), GameMode::default());

        let mut moved = false;
        for direction in Direction::all() {
            moved |= game.step(direction).moved;
        }
        assert!(moved);
        assert_eq!(game.best_score(), game.score());
    }

    #[test]
    fn test_scores_never_decrease() {
        let mut game = Game::new(9);
        let mut last_best = 0;
        for round in 0..3 {
            let mut last_score = 0;
            let mut step = 0;
            while !game.is_done() && step < 2000 {
                let direction = Direction::all()[(step + round) % 4];
                game.step(direction);
                assert!(game.score() >= last_score);
                assert!(game.best_score() >= last_best);
                assert!(game.best_score() >= game.score());
                last_score = game.score();
                last_best = game.best_score();
                step += 1;
                if game.is_won() {
                    let _ = game.continue_game();
                }
            }
            game.restart();
            assert_eq!(game.best_score(), last_best);
        }
    }

    // -------------------------------------------------------------------------
    // Output tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_snapshot() {
        let mut game = fixed_game();
        game.board = Board::from_values([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        game.step(Direction::Left);

        let snapshot = game.snapshot();
        assert_eq!(snapshot.tiles.len(), 2);
        assert_eq!(snapshot.highest_tile, 2048);
        assert_eq!(snapshot.status, GameStatus::Won);
        assert_eq!(snapshot.completed_levels, vec![2048]);
        assert_eq!(snapshot.target_level, Some(4096));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["status"], "won");
        assert_eq!(json["mode"], 2048);
        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::GameOver {
            final_score: 10,
            highest_tile: 8,
            near_best: true,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["kind"], "gameOver");
        assert_eq!(json["final_score"], 10);
    }

    #[test]
    fn test_display_format() {
        let game = Game::new(42);
        let display = format!("{}", game);
        assert!(display.contains("Score: 0"));
        assert!(display.contains("+------+"));
    }
}
