//! JSON file backed key-value store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use game_2048_core::{KeyValueStore, MemoryStore, StorageError};

/// Keeps every entry in memory and rewrites the whole file on each `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: MemoryStore,
}

impl JsonFileStore {
    /// Load `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| StorageError::Malformed(format!("{}: {}", path.display(), e)))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => MemoryStore::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(JsonFileStore { path, entries })
    }

    /// An empty store that will (over)write `path` on the first `set`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            entries: MemoryStore::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &MemoryStore {
        &self.entries
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.set(key, value)?;
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StorageError::Malformed(e.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_2048_core::storage::{BEST_SCORE_KEY, GAME_MODE_KEY};
    use game_2048_core::{Direction, Game, GameMode};

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("none.json")).unwrap();
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set(GAME_MODE_KEY, "2").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(GAME_MODE_KEY).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_game_persists_mode_and_best_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut game = Game::with_store(JsonFileStore::open(&path).unwrap(), 3);
        game.change_game_mode(GameMode::from_level(8192).unwrap());
        for _ in 0..50 {
            for direction in Direction::all() {
                game.step(direction);
            }
        }
        let best = game.best_score();

        let game = Game::with_store(JsonFileStore::open(&path).unwrap(), 4);
        assert_eq!(game.mode().level(), 8192);
        assert_eq!(game.best_score(), best);
    }
}
