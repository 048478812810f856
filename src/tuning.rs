//! Data-driven game balance
//!
//! Timing and scoring knobs that are not tied to a difficulty preset.

use serde::{Deserialize, Serialize};

/// Balance parameters carried by every game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    /// Max gap between two eats that keeps the combo alive (ms)
    pub combo_window_ms: u64,
    /// Score needed per level
    pub points_per_level: u64,
    /// Period of the power-up spawn timer (ms)
    pub powerup_spawn_interval_ms: u64,
    /// How long an uncollected power-up stays on the board (ms)
    pub powerup_lifetime_ms: u64,
    /// Slow-motion effect duration (ms)
    pub slowmo_duration_ms: u64,
    /// Double points effect duration (ms)
    pub double_points_duration_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            combo_window_ms: 2500,
            points_per_level: 100,
            powerup_spawn_interval_ms: 15_000,
            powerup_lifetime_ms: 8000,
            slowmo_duration_ms: 8000,
            double_points_duration_ms: 10_000,
        }
    }
}

impl Tuning {
    /// Level for a given score (1-based)
    pub fn level_for_score(&self, score: u64) -> u32 {
        (score / self.points_per_level.max(1)) as u32 + 1
    }
}
