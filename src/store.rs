//! Best-score persistence
//!
//! A tiny integer key-value store. Reads never fail (anything unreadable is
//! zero) and writes are best effort.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const BEST_SCORE_KEY: &str = "best_score";

pub trait ScoreStore {
    fn load_int(&self, key: &str) -> u32;
    fn save_int(&mut self, key: &str, value: u32);
}

/// One plain-text file per key, `<dir>/<key>.txt`, holding a decimal integer.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl ScoreStore for FileStore {
    fn load_int(&self, key: &str) -> u32 {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => text.trim().parse().unwrap_or_else(|_| {
                log::debug!("Ignoring non-numeric {}", path.display());
                0
            }),
            Err(e) => {
                log::debug!("No value at {}: {}", path.display(), e);
                0
            }
        }
    }

    fn save_int(&mut self, key: &str, value: u32) {
        let path = self.path_for(key);
        let result = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&path, value.to_string()));
        match result {
            Ok(()) => log::info!("Saved {} = {} to {}", key, value, path.display()),
            Err(e) => log::warn!("Could not save {} to {}: {}", key, path.display(), e),
        }
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load_int(&self, key: &str) -> u32 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn save_int(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }
}
