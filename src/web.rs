//! Browser bindings
//!
//! JS owns the frame loop and calls `update(performance.now())`; due timers
//! fire inside that call, one after another. State and events cross the
//! boundary as JSON.

use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::persistence::LocalStorageStore;
use crate::platform::ManualScheduler;
use crate::settings::Difficulty;
use crate::sim::Direction;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already initialized on hot reload
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Cho Snake core loaded");
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct SnakeGame {
    game: Game<ManualScheduler, LocalStorageStore>,
}

#[wasm_bindgen]
impl SnakeGame {
    #[wasm_bindgen(constructor)]
    pub fn new(now_ms: f64) -> SnakeGame {
        let scheduler = ManualScheduler::starting_at(now_ms.max(0.0) as u64);
        SnakeGame {
            game: Game::new(scheduler, LocalStorageStore),
        }
    }

    /// Start a new game; unknown difficulty keys are rejected
    pub fn start(&mut self, difficulty: &str) -> bool {
        match Difficulty::from_str(difficulty) {
            Some(d) => {
                self.game.start(d);
                true
            }
            None => {
                log::warn!("Unknown difficulty: {}", difficulty);
                false
            }
        }
    }

    pub fn pause(&mut self) {
        self.game.pause();
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }

    #[wasm_bindgen(js_name = changeDirection)]
    pub fn change_direction(&mut self, direction: &str) -> bool {
        Direction::from_str(direction).is_some_and(|d| self.game.change_direction(d))
    }

    #[wasm_bindgen(js_name = setMuted)]
    pub fn set_muted(&mut self, muted: bool) {
        self.game.set_muted(muted);
    }

    /// Fire every timer due by `now_ms`
    pub fn update(&mut self, now_ms: f64) {
        self.game.advance_to(now_ms.max(0.0) as u64);
    }

    /// Current snapshot as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.game.snapshot()).unwrap_or_default()
    }

    /// Pending events as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.game.drain_events()).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = highScore)]
    pub fn high_score(&self, difficulty: &str) -> f64 {
        Difficulty::from_str(difficulty)
            .map(|d| self.game.high_scores().best(d) as f64)
            .unwrap_or(0.0)
    }
}
