// Key-value persistence for the best score
//
// The game loop only sees the ScoreStore trait, so the storage medium is chosen by whoever
// builds the loop: in-memory for tests and simulations, a JSON file for real play.

use log::warn;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Minimal get/set capability
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
}

/// In-process store backed by a HashMap
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a single flat JSON object on disk
///
/// The file is read once on open and rewritten in full on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store, starting empty if the file does not exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read score file '{}': {}", path.display(), e))?;
            serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse score file '{}': {}", path.display(), e))?
        } else {
            HashMap::new()
        };

        Ok(FileStore {
            path,
            values: Mutex::new(values),
        })
    }
}

impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&*values)
            .map_err(|e| format!("Failed to serialize scores: {}", e))?;
        fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write score file '{}': {}", self.path.display(), e))
    }
}

/// Reads the stored high score. Missing or unparseable values count as 0.
pub fn load_high_score<S: ScoreStore + ?Sized>(store: &S, key: &str) -> u32 {
    match store.get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Ignoring stored high score '{}': {}", raw, e);
            0
        }),
        None => 0,
    }
}

pub fn save_high_score<S: ScoreStore + ?Sized>(store: &S, key: &str, score: u32) -> Result<(), String> {
    store.set(key, &score.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("snake_highscore"), None);
        store.set("snake_highscore", "40").unwrap();
        assert_eq!(store.get("snake_highscore"), Some("40".to_string()));
    }

    #[test]
    fn test_load_high_score_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(load_high_score(&store, "snake_highscore"), 0);
        store.set("snake_highscore", "not a number").unwrap();
        assert_eq!(load_high_score(&store, "snake_highscore"), 0);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let path = std::env::temp_dir().join(format!(
            "neon_snake_scores_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        {
            let store = FileStore::open(&path).expect("open new store");
            save_high_score(&store, "snake_highscore", 120).expect("write score");
        }

        let reopened = FileStore::open(&path).expect("reopen store");
        assert_eq!(load_high_score(&reopened, "snake_highscore"), 120);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let path = std::env::temp_dir().join(format!(
            "neon_snake_corrupt_{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();
        assert!(FileStore::open(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
