//! # 2048 WebAssembly Bindings
//!
//! This crate provides JavaScript-friendly bindings to the 2048 game engine
//! using wasm-bindgen. It wraps the core session, persists the best score and
//! game mode in `localStorage`, and hands every result to JavaScript as a
//! plain object the page renders without any game logic of its own.

use game_2048_core::{
    DebugTools, Direction, Game, GameEvent, GameMode, KeyValueStore, Merge, MoveOutcome,
    Snapshot, StorageError, Tile,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// `window.localStorage` as a key-value store.
///
/// Every call looks the storage object up again; private browsing modes can
/// make it disappear or throw at any time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
    window
        .local_storage()
        .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
        .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }
}

/// Result of a step operation, serialized for JavaScript.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsStepResult<'a> {
    /// Whether the board changed.
    pub moved: bool,
    /// Points earned from this move.
    pub score_gained: u32,
    /// Tiles combined by this move, for merge animations.
    pub merges: &'a [Merge],
    /// The tile spawned after the move, if any.
    pub spawned: Option<Tile>,
    /// Achievements and game over, in order.
    pub events: &'a [GameEvent],
    /// Full state after the move.
    pub state: Snapshot,
}

/// WebAssembly wrapper for the 2048 game.
#[wasm_bindgen]
pub struct WasmGame {
    game: Game<LocalStorageStore>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game with the given seed.
    ///
    /// The seed is a 64-bit integer used to initialize the deterministic RNG.
    /// Best score and game mode are read from `localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WasmGame {
        WasmGame {
            game: Game::with_store(LocalStorageStore, seed),
        }
    }

    /// Reseed and start a new game.
    pub fn reset(&mut self, seed: u64) {
        self.game.reset(seed);
    }

    /// Start a new game in the current mode.
    pub fn restart(&mut self) {
        self.game.restart();
    }

    /// Execute a move in the given direction.
    ///
    /// Action values:
    /// - 0 = Up
    /// - 1 = Down
    /// - 2 = Left
    /// - 3 = Right
    ///
    /// Returns an object with `moved`, `scoreGained`, `merges`, `spawned`,
    /// `events` and `state`. Invalid actions are ignored (`moved: false`).
    pub fn step(&mut self, action: u8) -> JsValue {
        let outcome = match Direction::from_u8(action) {
            Some(direction) => self.game.step(direction),
            None => MoveOutcome::default(),
        };
        self.create_js_result(&outcome)
    }

    /// Dismiss the win message and keep playing.
    ///
    /// Returns the events array: a game over when the winning move left no
    /// moves, otherwise empty.
    #[wasm_bindgen(js_name = continueGame)]
    pub fn continue_game(&mut self) -> JsValue {
        let events = self.game.continue_game();
        to_js(&events)
    }

    /// Switch the target level (2048 ... 65536) and restart.
    /// Returns false, changing nothing, for any other value.
    #[wasm_bindgen(js_name = changeGameMode)]
    pub fn change_game_mode(&mut self, level: u32) -> bool {
        match GameMode::from_level(level) {
            Some(mode) => {
                self.game.change_game_mode(mode);
                true
            }
            None => false,
        }
    }

    /// Get the full state as a JavaScript object.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> JsValue {
        to_js(&self.game.snapshot())
    }

    /// Get the current score.
    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.game.score()
    }

    #[wasm_bindgen(js_name = getBestScore)]
    pub fn get_best_score(&self) -> u32 {
        self.game.best_score()
    }

    /// Check if the game is over.
    #[wasm_bindgen(js_name = isDone)]
    pub fn is_done(&self) -> bool {
        self.game.is_done()
    }

    #[wasm_bindgen(js_name = isWon)]
    pub fn is_won(&self) -> bool {
        self.game.is_won()
    }

    /// Get the maximum tile value on the board.
    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> u32 {
        self.game.highest_tile()
    }

    /// Get legal actions as an array of 4 booleans [Up, Down, Left, Right].
    #[wasm_bindgen(js_name = getLegalActions)]
    pub fn get_legal_actions(&self) -> Vec<u8> {
        self.game
            .legal_directions()
            .iter()
            .map(|&b| u8::from(b))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Debug helpers, only wired up by development pages
    // -------------------------------------------------------------------------

    /// Fill the board with a dead pattern. Returns the events array.
    #[wasm_bindgen(js_name = debugTriggerGameOver)]
    pub fn debug_trigger_game_over(&mut self) -> JsValue {
        let events = DebugTools::new(&mut self.game).trigger_game_over();
        to_js(&events)
    }

    /// Place a `level` tile and make it the target. Returns the events array.
    #[wasm_bindgen(js_name = debugTriggerWin)]
    pub fn debug_trigger_win(&mut self, level: u32) -> JsValue {
        let events = DebugTools::new(&mut self.game).trigger_win(level);
        to_js(&events)
    }

    /// Place a tile of `value` (a power of two, 2 or more) in the first
    /// empty cell. Returns false, changing nothing, for any other value.
    #[wasm_bindgen(js_name = debugAddTile)]
    pub fn debug_add_tile(&mut self, value: u32) -> bool {
        DebugTools::new(&mut self.game).add_tile(value).is_some()
    }

    /// Helper method to create a JS result object.
    fn create_js_result(&self, outcome: &MoveOutcome) -> JsValue {
        to_js(&JsStepResult {
            moved: outcome.moved,
            score_gained: outcome.score_gained,
            merges: &outcome.merges,
            spawned: outcome.spawned,
            events: &outcome.events,
            state: self.game.snapshot(),
        })
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}
