//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One cell per tick, clock time passed in by the caller
//! - Seeded RNG only
//! - No timers, rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod levels;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Collision, CollisionResult, classify};
pub use levels::obstacles_for_level;
pub use state::{
    ActiveEffects, Direction, Food, FoodKind, GameEvent, GameState, GameStatus, PowerUp,
    PowerUpKind,
};
pub use tick::{TickOutcome, advance, change_direction, speed};
