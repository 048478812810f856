//! Idle/demo mode steering
//!
//! Greedy: head for the food, never pick a fatal move when a safe one exists.

use super::collision::{Collision, classify};
use super::state::{Direction, GameState};

/// Pick the direction for the next tick
pub fn choose_direction(state: &GameState) -> Direction {
    let current = state.direction;
    let candidates = [current]
        .into_iter()
        .chain(Direction::ALL.into_iter().filter(|d| d.is_horizontal() != current.is_horizontal()))
        .filter(|d| state.snake.len() <= 1 || *d != state.last_moved.opposite());

    let target = state
        .food
        .map(|f| f.pos)
        .or(state.power_up.map(|p| p.pos));

    candidates
        .map(|dir| {
            let next = state.head() + dir.delta();
            let collision = classify(next, &state.snake, &state.obstacles, state.effects.shield);
            // Lower is better: safe first, then shielded, then fatal
            let danger = match collision.kind {
                Collision::Safe => 0,
                Collision::Shield => 1,
                Collision::Dead => 2,
            };
            let distance = target
                .map(|t| (t - collision.head).abs().element_sum())
                .unwrap_or(0);
            (danger, distance, dir)
        })
        .min_by_key(|(danger, distance, _)| (*danger, *distance))
        .map(|(_, _, dir)| dir)
        .unwrap_or(current)
}
