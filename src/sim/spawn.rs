//! Food and power-up placement
//!
//! Cells are drawn uniformly at random and retried until free. After enough
//! misses the free cells are enumerated instead, so a crowded board still
//! finds a spot and a full board yields `None` rather than spinning forever.

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Food, FoodKind, GameState, PowerUp, PowerUpKind};
use crate::Position;
use crate::consts::GRID_SIZE;

/// Random attempts before falling back to enumerating free cells
const MAX_RANDOM_ATTEMPTS: u32 = 64;

/// Pick a random cell for which `occupied` is false
pub fn random_free_cell<R: Rng>(rng: &mut R, occupied: impl Fn(Position) -> bool) -> Option<Position> {
    for _ in 0..MAX_RANDOM_ATTEMPTS {
        let pos = IVec2::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
        if !occupied(pos) {
            return Some(pos);
        }
    }

    let free: Vec<Position> = (0..GRID_SIZE)
        .flat_map(|y| (0..GRID_SIZE).map(move |x| IVec2::new(x, y)))
        .filter(|p| !occupied(*p))
        .collect();
    free.choose(rng).copied()
}

/// Weighted food draw (cherry 55, apple 35, star 10)
pub fn roll_food_kind<R: Rng>(rng: &mut R) -> FoodKind {
    let roll = rng.random_range(0..100u32);
    let mut threshold = 0;
    for kind in [FoodKind::Cherry, FoodKind::Apple] {
        threshold += kind.weight();
        if roll < threshold {
            return kind;
        }
    }
    FoodKind::Star
}

/// New food on a cell free of snake, obstacles and the power-up
pub fn spawn_food(state: &mut GameState) -> Option<Food> {
    let power_up = state.power_up.map(|p| p.pos);
    let GameState {
        rng,
        snake,
        obstacles,
        ..
    } = state;
    let pos = random_free_cell(rng, |p| {
        snake.contains(&p) || obstacles.contains(&p) || power_up == Some(p)
    });
    let food = pos.map(|pos| Food {
        pos,
        kind: roll_food_kind(rng),
    });
    match food {
        Some(f) => log::debug!("Food {:?} at ({}, {})", f.kind, f.pos.x, f.pos.y),
        None => log::warn!("No free cell for food"),
    }
    food
}

/// Place a power-up if none is on the board.
///
/// Returns the new power-up, `None` if one already exists or no cell is free.
pub fn spawn_power_up(state: &mut GameState) -> Option<PowerUp> {
    if state.power_up.is_some() {
        return None;
    }
    let food = state.food.map(|f| f.pos);
    let GameState {
        rng,
        snake,
        obstacles,
        ..
    } = state;
    let pos = random_free_cell(rng, |p| {
        snake.contains(&p) || obstacles.contains(&p) || food == Some(p)
    })?;
    let kind = *PowerUpKind::ALL.choose(rng)?;
    let power_up = PowerUp { pos, kind };
    log::debug!("Power-up {:?} at ({}, {})", kind, pos.x, pos.y);
    state.power_up = Some(power_up);
    Some(power_up)
}

/// Move food and power-up off cells that became obstacles
pub fn relocate_blocked_items(state: &mut GameState) {
    if let Some(old) = state.food.filter(|f| state.obstacles.contains(&f.pos)) {
        // Keep the kind the player was chasing
        state.food = spawn_food(state).map(|moved| Food {
            kind: old.kind,
            ..moved
        });
    }
    if let Some(old) = state.power_up.filter(|p| state.obstacles.contains(&p.pos)) {
        state.power_up = None;
        if let Some(moved) = spawn_power_up(state) {
            state.power_up = Some(PowerUp {
                kind: old.kind,
                ..moved
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_food_never_on_snake_or_obstacles() {
        let mut state = GameState::new(Difficulty::Easy, 42);
        state.obstacles = super::super::levels::obstacles_for_level(5);
        state.snake = (0..GRID_SIZE).map(|x| IVec2::new(x, 0)).collect();
        for _ in 0..200 {
            let food = spawn_food(&mut state).unwrap();
            assert!(!state.is_blocked(food.pos));
        }
    }

    #[test]
    fn test_food_weights_roughly_hold() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            match roll_food_kind(&mut rng) {
                FoodKind::Cherry => counts[0] += 1,
                FoodKind::Apple => counts[1] += 1,
                FoodKind::Star => counts[2] += 1,
            }
        }
        assert!((5000..6000).contains(&counts[0]), "cherry {}", counts[0]);
        assert!((3000..4000).contains(&counts[1]), "apple {}", counts[1]);
        assert!((700..1300).contains(&counts[2]), "star {}", counts[2]);
    }

    #[test]
    fn test_crowded_board_finds_last_cell() {
        let mut rng = Pcg32::seed_from_u64(3);
        let last = IVec2::new(17, 3);
        assert_eq!(random_free_cell(&mut rng, |p| p != last), Some(last));
        assert_eq!(random_free_cell(&mut rng, |_| true), None);
    }

    #[test]
    fn test_power_up_single_and_free() {
        let mut state = GameState::new(Difficulty::Medium, 9);
        let first = spawn_power_up(&mut state).unwrap();
        assert!(!state.is_blocked(first.pos));
        assert_ne!(Some(first.pos), state.food.map(|f| f.pos));
        assert!(spawn_power_up(&mut state).is_none());
        assert_eq!(state.power_up, Some(first));
    }

    #[test]
    fn test_relocate_items_off_new_obstacles() {
        let mut state = GameState::new(Difficulty::Easy, 5);
        state.obstacles = super::super::levels::obstacles_for_level(3);
        let blocked = state.obstacles[0];
        state.food = Some(Food {
            pos: blocked,
            kind: FoodKind::Star,
        });
        state.power_up = Some(PowerUp {
            pos: state.obstacles[1],
            kind: PowerUpKind::Shield,
        });

        relocate_blocked_items(&mut state);

        let food = state.food.unwrap();
        assert!(!state.obstacles.contains(&food.pos));
        assert_eq!(food.kind, FoodKind::Star);
        let power_up = state.power_up.unwrap();
        assert!(!state.obstacles.contains(&power_up.pos));
        assert_eq!(power_up.kind, PowerUpKind::Shield);
    }
}
