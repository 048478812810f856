//! Key/value persistence port
//!
//! High scores and settings are stored as JSON strings under fixed keys.
//! Implementations:
//! - `MemoryStore`: in-process map (native builds and tests)
//! - `LocalStorageStore`: browser LocalStorage (wasm32 only)
//!
//! Callers treat every failure as "nothing stored"; nothing here is fatal.

use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
mod local_storage;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// String key/value storage used for scores and preferences
pub trait Store {
    /// Read a value, `Ok(None)` if the key was never written
    fn load(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Write a value, replacing any previous one
    fn save(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Volatile store backed by a HashMap
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// Simulate an unavailable backend (every call fails)
    pub unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails
    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            unavailable: true,
        }
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        if self.unavailable {
            anyhow::bail!("storage unavailable");
        }
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.unavailable {
            anyhow::bail!("storage unavailable");
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
