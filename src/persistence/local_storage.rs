//! Browser LocalStorage backend

use anyhow::{Context, anyhow};

use super::Store;

/// Store backed by `window.localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> anyhow::Result<web_sys::Storage> {
        web_sys::window()
            .context("no window")?
            .local_storage()
            .map_err(|e| anyhow!("localStorage access denied: {:?}", e))?
            .context("localStorage not available")
    }
}

impl Store for LocalStorageStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| anyhow!("failed to read {key}: {:?}", e))
    }

    fn save(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| anyhow!("failed to write {key}: {:?}", e))
    }
}
