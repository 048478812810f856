//! Difficulty presets and player preferences
//!
//! Preferences are persisted separately from high scores.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::persistence::Store;

/// Difficulty levels selectable at game start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Crazy,
}

/// Speed curve for a difficulty (all values in ms per tick)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedCurve {
    /// Tick interval for a one-segment snake
    pub base_speed: u64,
    /// Fastest allowed tick interval
    pub min_speed: u64,
    /// Interval reduction per food eaten
    pub speed_decrease: u64,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Crazy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Crazy => "crazy",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "crazy" => Some(Difficulty::Crazy),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Crazy => "Crazy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Relaxed pace, perfect for beginners",
            Difficulty::Medium => "A balanced challenge",
            Difficulty::Hard => "Fast reflexes required",
            Difficulty::Crazy => "Pure chaos. Good luck.",
        }
    }

    pub fn speed_curve(&self) -> SpeedCurve {
        let (base_speed, min_speed, speed_decrease) = match self {
            Difficulty::Easy => (320, 120, 6),
            Difficulty::Medium => (220, 90, 7),
            Difficulty::Hard => (150, 65, 8),
            Difficulty::Crazy => (90, 40, 5),
        };
        SpeedCurve {
            base_speed,
            min_speed,
            speed_decrease,
        }
    }
}

impl SpeedCurve {
    /// Tick interval after `foods_eaten` foods, never below `min_speed`
    pub fn interval_ms(&self, foods_eaten: u64) -> u64 {
        self.base_speed
            .saturating_sub(foods_eaten.saturating_mul(self.speed_decrease))
            .max(self.min_speed)
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Last selected difficulty
    pub difficulty: Difficulty,
    /// Presentation layer should stay silent
    #[serde(default)]
    pub muted: bool,
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "cho-snake-settings";

    /// Load settings, falling back to defaults on any failure
    pub fn load(store: &impl Store) -> Self {
        match Self::try_load(store) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings ({})", settings.difficulty.as_str());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings: {e:#}");
                Self::default()
            }
        }
    }

    fn try_load(store: &impl Store) -> anyhow::Result<Option<Self>> {
        let Some(json) = store.load(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        let settings = serde_json::from_str(&json).context("corrupt settings")?;
        Ok(Some(settings))
    }

    /// Save settings; failures are logged and ignored
    pub fn save(&self, store: &mut impl Store) {
        let result = serde_json::to_string(self)
            .context("failed to serialize settings")
            .and_then(|json| store.save(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {e:#}"),
        }
    }
}
