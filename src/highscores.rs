//! Best score per difficulty
//!
//! Persisted through the storage port, one entry per difficulty.

use std::collections::BTreeMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::persistence::Store;
use crate::settings::Difficulty;

/// Best score for each difficulty (missing entry means 0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    best: BTreeMap<String, u64>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "cho-snake-highscores";

    /// Create an all-zero table
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score recorded for a difficulty
    pub fn best(&self, difficulty: Difficulty) -> u64 {
        self.best.get(difficulty.as_str()).copied().unwrap_or(0)
    }

    /// Check if a score beats the stored best (zero never qualifies)
    pub fn qualifies(&self, difficulty: Difficulty, score: u64) -> bool {
        score > 0 && score > self.best(difficulty)
    }

    /// Record a finished game, returning whether it set a new record.
    /// Writes through to the store only on a new record.
    pub fn record(&mut self, store: &mut impl Store, difficulty: Difficulty, score: u64) -> bool {
        if !self.qualifies(difficulty, score) {
            return false;
        }
        self.best.insert(difficulty.as_str().to_string(), score);
        log::info!("New {} high score: {}", difficulty.as_str(), score);
        self.save(store);
        true
    }

    /// Load the table, zero baseline if storage is empty, broken or unavailable
    pub fn load(store: &impl Store) -> Self {
        match Self::try_load(store) {
            Ok(Some(scores)) => {
                log::info!("Loaded high scores for {} difficulties", scores.best.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not load high scores: {e:#}");
                Self::new()
            }
        }
    }

    fn try_load(store: &impl Store) -> anyhow::Result<Option<Self>> {
        let Some(json) = store.load(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        let scores = serde_json::from_str(&json).context("corrupt high score table")?;
        Ok(Some(scores))
    }

    /// Save the table; failures are logged and ignored
    pub fn save(&self, store: &mut impl Store) {
        let result = serde_json::to_string(self)
            .context("failed to serialize high scores")
            .and_then(|json| store.save(Self::STORAGE_KEY, &json));
        if let Err(e) = result {
            log::warn!("Could not save high scores: {e:#}");
        }
    }
}
