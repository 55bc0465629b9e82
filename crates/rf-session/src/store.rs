//! Storage boundary for session state.
//!
//! The session never knows where records live: hosts inject a
//! `SettingsStore` and the session reads/writes opaque strings through it.
//! Implemented differently by each host environment:
//! - WASM: bridges to the browser's localStorage
//! - Desktop: a settings directory on disk (`FileStore`)
//! - Tests: an in-memory map (`MemoryStore`)

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Key/value record storage with synchronous reads and writes.
pub trait SettingsStore {
    /// Read the record stored under `key`.
    ///
    /// # Errors
    /// No record under `key`, or the backend failed to read.
    fn load(&self, key: &str) -> Result<String, String>;

    /// Write `value` under `key`, replacing any previous record.
    ///
    /// # Errors
    /// The backend failed to write.
    fn save(&mut self, key: &str, value: &str) -> Result<(), String>;
}

// ─── MemoryStore ─────────────────────────────────────────────────────────

/// In-memory store for hosts without durable storage, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Peek at a raw record (test inspection).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> Result<String, String> {
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| format!("no record under \"{key}\""))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─── FileStore ───────────────────────────────────────────────────────────

/// Disk-backed store: one file per key under a settings directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SettingsStore for FileStore {
    fn load(&self, key: &str) -> Result<String, String> {
        fs::read_to_string(self.path_for(key))
            .map_err(|err| format!("failed to read \"{key}\": {err}"))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), String> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| format!("failed to create settings dir: {err}"))?;
        fs::write(self.path_for(key), value)
            .map_err(|err| format!("failed to write \"{key}\": {err}"))
    }
}
