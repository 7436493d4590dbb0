//! Key-value persistence for the best score and the selected game mode.
//!
//! Stores are best-effort: a failed read falls back to the default value and
//! a failed write is logged and dropped. Nothing here can stop a move.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::achievement::GameMode;

/// Key holding the best score as a decimal integer.
pub const BEST_SCORE_KEY: &str = "2048-best-score";

/// Key holding the selected game mode as an index into the level list.
pub const GAME_MODE_KEY: &str = "gameMode";

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed store: {0}")]
    Malformed(String),
}

/// A string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Also serves as the serialized form of file-backed
/// stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A store that fails every call, e.g. when the host has no storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("no backing store".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("no backing store".into()))
    }
}

fn read<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!("reading {key} failed, using default: {err}");
            None
        }
    }
}

fn write<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        warn!("writing {key} failed: {err}");
    }
}

/// Best score, 0 when missing or unreadable.
pub fn load_best_score<S: KeyValueStore + ?Sized>(store: &S) -> u32 {
    read(store, BEST_SCORE_KEY)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

pub fn save_best_score<S: KeyValueStore + ?Sized>(store: &mut S, best: u32) {
    write(store, BEST_SCORE_KEY, &best.to_string());
}

/// Selected mode, the first level when missing or unreadable.
///
/// Values are written as indices, but a raw level value (`"4096"`) is
/// accepted as well.
pub fn load_game_mode<S: KeyValueStore + ?Sized>(store: &S) -> GameMode {
    read(store, GAME_MODE_KEY)
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .and_then(|n| GameMode::from_index(n as usize).or_else(|| GameMode::from_level(n)))
        .unwrap_or_default()
}

pub fn save_game_mode<S: KeyValueStore + ?Sized>(store: &mut S, mode: GameMode) {
    write(store, GAME_MODE_KEY, &mode.index().to_string());
}
