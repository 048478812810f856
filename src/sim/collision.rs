//! Head collision classification
//!
//! Pure function of (next head, body, obstacles, shield): no state is touched.

use serde::{Deserialize, Serialize};

use crate::{Position, in_bounds, wrap};

/// What happens when the head enters a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Nothing hit
    Safe,
    /// Something hit and the shield absorbs it
    Shield,
    /// Something hit with no shield
    Dead,
}

/// Result of classifying a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResult {
    pub kind: Collision,
    /// Cell the head ends up in (wrapped onto the board for `Shield`)
    pub head: Position,
}

/// True if `head` hits a wall, the body (excluding index 0) or an obstacle
pub fn hits_anything<'a>(
    head: Position,
    body: impl IntoIterator<Item = &'a Position>,
    obstacles: &[Position],
) -> bool {
    !in_bounds(head) || body.into_iter().skip(1).any(|p| *p == head) || obstacles.contains(&head)
}

/// Classify the move of the head into `head`.
///
/// `body` is the current snake, head first.
pub fn classify<'a>(
    head: Position,
    body: impl IntoIterator<Item = &'a Position>,
    obstacles: &[Position],
    shield: bool,
) -> CollisionResult {
    if !hits_anything(head, body, obstacles) {
        return CollisionResult {
            kind: Collision::Safe,
            head,
        };
    }
    if shield {
        CollisionResult {
            kind: Collision::Shield,
            head: wrap(head),
        }
    } else {
        CollisionResult {
            kind: Collision::Dead,
            head,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> Position {
        IVec2::new(x, y)
    }

    #[test]
    fn test_open_cell_is_safe() {
        let body = [p(10, 10)];
        let result = classify(p(10, 9), &body, &[], false);
        assert_eq!(result.kind, Collision::Safe);
        assert_eq!(result.head, p(10, 9));
    }

    #[test]
    fn test_left_wall_without_shield_is_dead() {
        let body = [p(0, 5)];
        let result = classify(p(-1, 5), &body, &[], false);
        assert_eq!(result.kind, Collision::Dead);
    }

    #[test]
    fn test_left_wall_with_shield_wraps() {
        let body = [p(0, 5)];
        let result = classify(p(-1, 5), &body, &[], true);
        assert_eq!(result.kind, Collision::Shield);
        assert_eq!(result.head, p(19, 5));
    }

    #[test]
    fn test_body_and_obstacle_hits() {
        let body = [p(5, 5), p(5, 6), p(6, 6), p(6, 5)];
        assert_eq!(classify(p(6, 5), &body, &[], false).kind, Collision::Dead);
        assert_eq!(classify(p(4, 5), &body, &[p(4, 5)], false).kind, Collision::Dead);

        // Shielded hits inside the board keep the cell as-is
        let shielded = classify(p(4, 5), &body, &[p(4, 5)], true);
        assert_eq!(shielded.kind, Collision::Shield);
        assert_eq!(shielded.head, p(4, 5));
    }

    #[test]
    fn test_head_cell_itself_is_ignored() {
        // Index 0 is the current head, never a self hit
        let body = [p(3, 3), p(3, 4)];
        assert_eq!(classify(p(3, 3), &body, &[], false).kind, Collision::Safe);
    }

    proptest! {
        #[test]
        fn prop_classification_is_pure(
            hx in -2i32..22,
            hy in -2i32..22,
            body in prop::collection::vec((0i32..20, 0i32..20), 1..12),
            obstacles in prop::collection::vec((0i32..20, 0i32..20), 0..8),
            shield in any::<bool>(),
        ) {
            let body: Vec<Position> = body.into_iter().map(|(x, y)| p(x, y)).collect();
            let obstacles: Vec<Position> = obstacles.into_iter().map(|(x, y)| p(x, y)).collect();
            let a = classify(p(hx, hy), &body, &obstacles, shield);
            let b = classify(p(hx, hy), &body, &obstacles, shield);
            prop_assert_eq!(a, b);
            if shield {
                prop_assert_ne!(a.kind, Collision::Dead);
            } else {
                prop_assert_ne!(a.kind, Collision::Shield);
            }
            prop_assert!(a.kind == Collision::Dead || in_bounds(a.head));
        }
    }
}
