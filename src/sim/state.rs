//! Game state and core simulation types
//!
//! Everything a single session owns lives here. A new session builds a new
//! `GameState`; nothing carries over except what the caller passes in.

use std::collections::VecDeque;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::levels::obstacles_for_level;
use super::spawn::spawn_food;
use crate::Position;
use crate::consts::*;
use crate::settings::Difficulty;
use crate::tuning::Tuning;

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// No game started yet
    Idle,
    /// Snake is moving
    Playing,
    /// Movement suspended
    Paused,
    /// Fatal collision ended the run
    GameOver,
}

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step on the grid (y grows downward)
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Inverse of `delta`
    pub fn from_delta(delta: IVec2) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "UP" => Some(Direction::Up),
            "DOWN" => Some(Direction::Down),
            "LEFT" => Some(Direction::Left),
            "RIGHT" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Food types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Cherry,
    Apple,
    Star,
}

impl FoodKind {
    /// Base points before combo and double points
    pub fn points(&self) -> u64 {
        match self {
            FoodKind::Cherry => 10,
            FoodKind::Apple => 20,
            FoodKind::Star => 50,
        }
    }

    /// Spawn weight out of 100
    pub fn weight(&self) -> u32 {
        match self {
            FoodKind::Cherry => 55,
            FoodKind::Apple => 35,
            FoodKind::Star => 10,
        }
    }

    /// Effect color for presentation
    pub fn color(&self) -> &'static str {
        match self {
            FoodKind::Cherry => "#ef4444",
            FoodKind::Apple => "#22c55e",
            FoodKind::Star => "#facc15",
        }
    }
}

/// Food on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub pos: Position,
    pub kind: FoodKind,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    /// Absorbs one fatal hit
    Shield,
    /// Doubles the tick interval for a while
    #[serde(rename = "slowmo")]
    SlowMo,
    /// Doubles points for a while
    DoublePoints,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Shield,
        PowerUpKind::SlowMo,
        PowerUpKind::DoublePoints,
    ];

    /// Effect color for presentation
    pub fn color(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "#38bdf8",
            PowerUpKind::SlowMo => "#a78bfa",
            PowerUpKind::DoublePoints => "#f97316",
        }
    }

    /// Effect duration, `None` for the one-shot shield
    pub fn duration_ms(&self, tuning: &Tuning) -> Option<u64> {
        match self {
            PowerUpKind::Shield => None,
            PowerUpKind::SlowMo => Some(tuning.slowmo_duration_ms),
            PowerUpKind::DoublePoints => Some(tuning.double_points_duration_ms),
        }
    }
}

/// A power-up waiting on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Position,
    pub kind: PowerUpKind,
}

/// Active power-up effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield: bool,
    pub slowmo: bool,
    pub double_points: bool,
}

impl ActiveEffects {
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Shield => self.shield,
            PowerUpKind::SlowMo => self.slowmo,
            PowerUpKind::DoublePoints => self.double_points,
        }
    }

    pub fn set(&mut self, kind: PowerUpKind, active: bool) {
        match kind {
            PowerUpKind::Shield => self.shield = active,
            PowerUpKind::SlowMo => self.slowmo = active,
            PowerUpKind::DoublePoints => self.double_points = active,
        }
    }

    /// Active kinds in a stable order
    pub fn active(&self) -> Vec<PowerUpKind> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .collect()
    }
}

/// Presentation triggers, emitted in order by each transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GameEvent {
    /// Food eaten at `pos`
    Eat {
        pos: Position,
        kind: FoodKind,
        points: u64,
        combo: u32,
        color: &'static str,
    },
    /// Fatal collision; `pos` is the head's last cell, always on the grid
    Die { pos: Position, score: u64 },
    /// Level increased (obstacles were replaced)
    LevelUp {
        pos: Position,
        level: u32,
        color: &'static str,
    },
    /// Power-up collected at `pos`
    PowerUp {
        pos: Position,
        kind: PowerUpKind,
        color: &'static str,
    },
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG (food, power-ups)
    pub rng: Pcg32,
    pub difficulty: Difficulty,
    pub tuning: Tuning,
    pub status: GameStatus,
    /// Body segments, head first
    pub snake: VecDeque<Position>,
    /// Direction used by the next tick
    pub direction: Direction,
    /// Direction the last tick actually moved in
    pub last_moved: Direction,
    /// `None` only when the board has no free cell
    pub food: Option<Food>,
    pub obstacles: Vec<Position>,
    pub power_up: Option<PowerUp>,
    pub effects: ActiveEffects,
    pub score: u64,
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Total foods eaten this session
    pub foods_eaten: u32,
    pub power_ups_collected: u32,
    /// Clock time of the previous eat (ms)
    pub last_eat_ms: Option<u64>,
    /// Pending presentation events (drained by the caller)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session state with default tuning, status `Idle`
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_tuning(difficulty, seed, Tuning::default())
    }

    pub fn with_tuning(difficulty: Difficulty, seed: u64, tuning: Tuning) -> Self {
        let direction = Direction::from_delta(INITIAL_DIRECTION).unwrap_or(Direction::Up);
        let level = tuning.level_for_score(0);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            tuning,
            status: GameStatus::Idle,
            snake: VecDeque::from([INITIAL_HEAD]),
            direction,
            last_moved: direction,
            food: None,
            obstacles: obstacles_for_level(level),
            power_up: None,
            effects: ActiveEffects::default(),
            score: 0,
            level,
            combo: 0,
            max_combo: 0,
            foods_eaten: 0,
            power_ups_collected: 0,
            last_eat_ms: None,
            events: Vec::new(),
        };
        state.food = spawn_food(&mut state);
        state
    }

    pub fn head(&self) -> Position {
        self.snake.front().copied().unwrap_or(INITIAL_HEAD)
    }

    /// Cell is covered by the snake or an obstacle
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.snake.contains(&pos) || self.obstacles.contains(&pos)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
