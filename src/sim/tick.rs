//! Fixed-interval simulation tick
//!
//! Advances the snake one cell and applies eating, power-up pickup, scoring
//! and level progression. Timers live outside; callers pass the clock time.

use super::collision::{Collision, classify};
use super::levels::obstacles_for_level;
use super::spawn::{relocate_blocked_items, spawn_food};
use super::state::{Direction, FoodKind, GameEvent, GameState, GameStatus, PowerUpKind};
use crate::Position;

/// What a tick did, for the caller that owns the timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing, nothing changed
    Skipped,
    /// Fatal collision, status is now `GameOver`
    Died,
    /// Snake moved one cell
    Moved {
        /// Food eaten this tick
        ate: Option<FoodKind>,
        /// Power-up picked up this tick
        collected: Option<PowerUpKind>,
        /// The shield absorbed a hit this tick
        shield_used: bool,
    },
}

/// Advance the game by one tick at clock time `now_ms`
pub fn advance(state: &mut GameState, now_ms: u64) -> TickOutcome {
    if state.status != GameStatus::Playing {
        return TickOutcome::Skipped;
    }

    expire_combo(state, now_ms);

    let next = state.head() + state.direction.delta();
    let result = classify(next, &state.snake, &state.obstacles, state.effects.shield);
    state.last_moved = state.direction;

    match result.kind {
        Collision::Dead => {
            state.status = GameStatus::GameOver;
            state.events.push(GameEvent::Die {
                pos: state.head(),
                score: state.score,
            });
            log::info!(
                "Game over: score {} level {} length {}",
                state.score,
                state.level,
                state.snake.len()
            );
            TickOutcome::Died
        }
        Collision::Shield => {
            state.effects.shield = false;
            log::debug!("Shield absorbed hit at ({}, {})", next.x, next.y);
            shift_body(state, result.head, false);
            TickOutcome::Moved {
                ate: None,
                collected: None,
                shield_used: true,
            }
        }
        Collision::Safe => {
            let head = result.head;
            let mut ate = None;
            let mut collected = None;

            if let Some(food) = state.food.filter(|f| f.pos == head) {
                state.food = None;
                eat_food(state, food.kind, head, now_ms);
                ate = Some(food.kind);
            } else if let Some(power_up) = state.power_up.filter(|p| p.pos == head) {
                state.power_up = None;
                activate_power_up(state, power_up.kind, head);
                collected = Some(power_up.kind);
            }

            shift_body(state, head, ate.is_some());
            if ate.is_some() {
                // Spawn after the body moved so the new head is excluded
                state.food = spawn_food(state);
            }

            TickOutcome::Moved {
                ate,
                collected,
                shield_used: false,
            }
        }
    }
}

/// Push the new head and drop the tail unless growing
fn shift_body(state: &mut GameState, head: Position, grow: bool) {
    state.snake.push_front(head);
    if !grow {
        state.snake.pop_back();
    }
}

/// Reset a combo whose window has lapsed
pub fn expire_combo(state: &mut GameState, now_ms: u64) {
    if state.combo > 0 && !within_combo_window(state, now_ms) {
        state.combo = 0;
    }
}

fn within_combo_window(state: &GameState, now_ms: u64) -> bool {
    state
        .last_eat_ms
        .is_some_and(|last| now_ms.saturating_sub(last) < state.tuning.combo_window_ms)
}

/// Points for one eat: round(base * (1 + 0.5 * combo) * (2 if double))
pub fn food_points(kind: FoodKind, combo: u32, double_points: bool) -> u64 {
    let multiplier = (1.0 + 0.5 * combo as f64) * if double_points { 2.0 } else { 1.0 };
    (kind.points() as f64 * multiplier).round() as u64
}

/// Score a food eaten at `pos`. Does not move the snake or respawn food.
pub fn eat_food(state: &mut GameState, kind: FoodKind, pos: Position, now_ms: u64) {
    state.foods_eaten += 1;

    // A lapsed window restarts at 0 for this eat
    state.combo = if within_combo_window(state, now_ms) {
        state.combo + 1
    } else {
        0
    };
    state.last_eat_ms = Some(now_ms);
    state.max_combo = state.max_combo.max(state.combo);

    let points = food_points(kind, state.combo, state.effects.double_points);
    state.events.push(GameEvent::Eat {
        pos,
        kind,
        points,
        combo: state.combo,
        color: kind.color(),
    });
    add_score(state, points, pos);
}

/// Add points and run level progression
pub fn add_score(state: &mut GameState, points: u64, pos: Position) {
    state.score += points;
    let level = state.tuning.level_for_score(state.score);
    if level > state.level {
        state.level = level;
        state.obstacles = obstacles_for_level(level);
        relocate_blocked_items(state);
        state.events.push(GameEvent::LevelUp {
            pos,
            level,
            color: "#facc15",
        });
        log::info!("Level up: {} ({} obstacles)", level, state.obstacles.len());
    }
}

/// Turn on a power-up effect. Timed effects are expired by the caller.
pub fn activate_power_up(state: &mut GameState, kind: PowerUpKind, pos: Position) {
    state.effects.set(kind, true);
    state.power_ups_collected += 1;
    state.events.push(GameEvent::PowerUp {
        pos,
        kind,
        color: kind.color(),
    });
    log::debug!("Power-up {:?} active", kind);
}

/// Request a new direction. Only a turn onto the other axis is accepted,
/// and never back onto the cell the snake just left: moving Right, a quick
/// Up then Left before the next tick would put the head on the neck.
pub fn change_direction(state: &mut GameState, direction: Direction) -> bool {
    if state.status != GameStatus::Playing {
        return false;
    }
    if direction.is_horizontal() == state.direction.is_horizontal() {
        return false;
    }
    if direction == state.last_moved.opposite() && state.snake.len() > 1 {
        return false;
    }
    state.direction = direction;
    true
}

/// Tick interval in ms: difficulty curve over foods eaten, doubled in slow-mo
pub fn speed(state: &GameState) -> u64 {
    let foods_eaten = state.snake.len().saturating_sub(1) as u64;
    let interval = state.difficulty.speed_curve().interval_ms(foods_eaten);
    if state.effects.slowmo {
        interval * 2
    } else {
        interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::state::{Food, PowerUp};
    use glam::IVec2;
    use std::collections::VecDeque;

    fn p(x: i32, y: i32) -> Position {
        IVec2::new(x, y)
    }

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(Difficulty::Easy, seed);
        state.status = GameStatus::Playing;
        state
    }

    fn place_food(state: &mut GameState, pos: Position, kind: FoodKind) {
        state.food = Some(Food { pos, kind });
    }

    #[test]
    fn test_eat_scenario() {
        let mut state = playing(1);
        place_food(&mut state, p(10, 9), FoodKind::Cherry);

        let outcome = advance(&mut state, 0);

        assert_eq!(
            outcome,
            TickOutcome::Moved {
                ate: Some(FoodKind::Cherry),
                collected: None,
                shield_used: false
            }
        );
        assert_eq!(state.head(), p(10, 9));
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.score, 10);
        assert_eq!(state.combo, 0);
        let food = state.food.unwrap();
        assert!(!state.snake.contains(&food.pos));
        assert!(matches!(state.events[0], GameEvent::Eat { points: 10, combo: 0, .. }));
    }

    #[test]
    fn test_wall_death() {
        let mut state = playing(2);
        state.snake = VecDeque::from([p(0, 5)]);
        state.direction = Direction::Left;
        let before = state.snake.clone();

        assert_eq!(advance(&mut state, 0), TickOutcome::Died);
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.snake, before);
        // Reported where the head crashed, not off the board
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::Die { pos, .. }) if *pos == p(0, 5)
        ));

        // No further mutation once over
        assert_eq!(advance(&mut state, 100), TickOutcome::Skipped);
        assert_eq!(state.snake, before);
    }

    #[test]
    fn test_shield_wraps_and_is_consumed() {
        let mut state = playing(3);
        state.snake = VecDeque::from([p(0, 5)]);
        state.direction = Direction::Left;
        state.effects.shield = true;

        let outcome = advance(&mut state, 0);
        assert!(matches!(outcome, TickOutcome::Moved { shield_used: true, .. }));
        assert_eq!(state.head(), p(19, 5));
        assert!(!state.effects.shield);
        assert_eq!(state.status, GameStatus::Playing);

        // Second hit without a shield is fatal
        state.snake = VecDeque::from([p(0, 7)]);
        assert_eq!(advance(&mut state, 10), TickOutcome::Died);
    }

    #[test]
    fn test_shield_move_does_not_eat() {
        let mut state = playing(4);
        state.snake = VecDeque::from([p(0, 5)]);
        state.direction = Direction::Left;
        state.effects.shield = true;
        place_food(&mut state, p(19, 5), FoodKind::Star);

        advance(&mut state, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_body_grows_only_on_food() {
        let mut state = playing(5);
        place_food(&mut state, p(0, 0), FoodKind::Apple);
        for i in 0..5 {
            let head = state.head();
            let len = state.snake.len();
            advance(&mut state, i * 100);
            assert_eq!(state.head(), head + Direction::Up.delta());
            assert_eq!(state.snake.len(), len);
        }
    }

    #[test]
    fn test_combo_window() {
        let mut state = playing(6);
        eat_food(&mut state, FoodKind::Cherry, p(1, 1), 1000);
        assert_eq!(state.combo, 0);
        eat_food(&mut state, FoodKind::Cherry, p(1, 1), 3499);
        assert_eq!(state.combo, 1);
        eat_food(&mut state, FoodKind::Cherry, p(1, 1), 4000);
        assert_eq!(state.combo, 2);
        // Exactly the window length is a gap
        eat_food(&mut state, FoodKind::Cherry, p(1, 1), 6500);
        assert_eq!(state.combo, 0);
        assert_eq!(state.max_combo, 2);
        // 10 + 15 + 20 + 10
        assert_eq!(state.score, 55);
    }

    #[test]
    fn test_combo_lapses_on_tick() {
        let mut state = playing(7);
        place_food(&mut state, p(0, 0), FoodKind::Cherry);
        state.combo = 3;
        state.last_eat_ms = Some(0);
        advance(&mut state, 2000);
        assert_eq!(state.combo, 3);
        advance(&mut state, 2500);
        assert_eq!(state.combo, 0);
        assert_eq!(state.max_combo, 0);
    }

    #[test]
    fn test_points_formula() {
        assert_eq!(food_points(FoodKind::Cherry, 0, false), 10);
        assert_eq!(food_points(FoodKind::Cherry, 1, false), 15);
        assert_eq!(food_points(FoodKind::Apple, 3, false), 50);
        assert_eq!(food_points(FoodKind::Star, 1, true), 150);
        assert_eq!(food_points(FoodKind::Cherry, 0, true), 20);
    }

    #[test]
    fn test_level_up_scenario() {
        let mut state = playing(8);
        state.score = 95;
        place_food(&mut state, p(10, 9), FoodKind::Apple);

        advance(&mut state, 0);

        assert_eq!(state.score, 115);
        assert_eq!(state.level, 2);
        assert_eq!(state.obstacles, obstacles_for_level(2));
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::LevelUp { level: 2, .. })));
    }

    #[test]
    fn test_level_up_onto_snake_is_survivable() {
        let mut state = playing(9);
        state.score = 195;
        state.level = 2;
        state.obstacles = obstacles_for_level(2);
        state.snake = VecDeque::from([p(10, 7), p(10, 8)]);
        place_food(&mut state, p(10, 6), FoodKind::Apple);

        advance(&mut state, 0);
        assert_eq!(state.level, 3);
        // The level-3 bar now runs under the head
        assert!(state.obstacles.contains(&state.head()));
        assert!(!state.obstacles.contains(&state.food.unwrap().pos));

        assert!(matches!(advance(&mut state, 100), TickOutcome::Moved { .. }));
        assert_eq!(state.head(), p(10, 5));
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_obstacles_only_change_with_level() {
        let mut state = playing(9);
        add_score(&mut state, 40, p(0, 0));
        assert!(state.obstacles.is_empty());
        add_score(&mut state, 59, p(0, 0));
        assert_eq!(state.level, 1);
        assert!(state.obstacles.is_empty());
        add_score(&mut state, 1, p(0, 0));
        assert_eq!(state.level, 2);
        let level_two = state.obstacles.clone();
        add_score(&mut state, 50, p(0, 0));
        assert_eq!(state.obstacles, level_two);
        assert_eq!(state.level, state.tuning.level_for_score(state.score));
    }

    #[test]
    fn test_power_up_pickup() {
        let mut state = playing(10);
        place_food(&mut state, p(0, 0), FoodKind::Cherry);
        state.power_up = Some(PowerUp {
            pos: p(10, 9),
            kind: PowerUpKind::DoublePoints,
        });

        let outcome = advance(&mut state, 0);
        assert!(matches!(
            outcome,
            TickOutcome::Moved {
                collected: Some(PowerUpKind::DoublePoints),
                ..
            }
        ));
        assert!(state.power_up.is_none());
        assert!(state.effects.double_points);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.power_ups_collected, 1);
    }

    #[test]
    fn test_direction_rules() {
        let mut state = playing(11);
        // Same axis (reverse or same) is ignored
        assert!(!change_direction(&mut state, Direction::Down));
        assert!(!change_direction(&mut state, Direction::Up));
        assert!(change_direction(&mut state, Direction::Left));
        assert_eq!(state.direction, Direction::Left);

        state.status = GameStatus::Paused;
        assert!(!change_direction(&mut state, Direction::Up));
    }

    #[test]
    fn test_no_reversal_within_one_tick() {
        let mut state = playing(12);
        state.snake = VecDeque::from([p(5, 5), p(4, 5)]);
        state.direction = Direction::Right;
        state.last_moved = Direction::Right;

        assert!(change_direction(&mut state, Direction::Up));
        // Left is on the other axis from Up but would fold into the body
        assert!(!change_direction(&mut state, Direction::Left));
        assert_eq!(state.direction, Direction::Up);

        // After the Up move lands, Left is a normal turn
        advance(&mut state, 0);
        assert_eq!(state.head(), p(5, 4));
        assert!(change_direction(&mut state, Direction::Left));
    }

    #[test]
    fn test_speed_curve_and_slowmo() {
        let mut state = playing(13);
        assert_eq!(speed(&state), 320);
        state.snake.extend([p(10, 11), p(10, 12)]);
        assert_eq!(speed(&state), 308);
        state.effects.slowmo = true;
        assert_eq!(speed(&state), 616);
    }
}
