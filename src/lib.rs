//! Cho Snake - A grid snake arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawning, scoring)
//! - `game`: Session controller wiring the sim to timers and high scores
//! - `platform`: Clock and timer scheduling abstraction
//! - `persistence`: Key/value storage port (LocalStorage on web)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{Game, Snapshot};
pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Board is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 20;
    /// Where a fresh snake starts (single segment)
    pub const INITIAL_HEAD: IVec2 = IVec2::new(10, 10);
    /// A fresh snake moves up
    pub const INITIAL_DIRECTION: IVec2 = IVec2::new(0, -1);
}

/// Cell on the board, (0,0) is top-left
pub type Position = IVec2;

/// True if the cell lies inside the board
#[inline]
pub fn in_bounds(pos: Position) -> bool {
    (0..consts::GRID_SIZE).contains(&pos.x) && (0..consts::GRID_SIZE).contains(&pos.y)
}

/// Wrap a cell back onto the board (torus)
#[inline]
pub fn wrap(pos: Position) -> Position {
    IVec2::new(
        pos.x.rem_euclid(consts::GRID_SIZE),
        pos.y.rem_euclid(consts::GRID_SIZE),
    )
}
