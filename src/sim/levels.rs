//! Obstacle layouts per level
//!
//! Layouts are a fixed table indexed by level. Levels past the end of the
//! table reuse the last layout.
//!
//! A new layout may land on cells the snake already occupies. Only the cell
//! the head enters is checked, so the snake keeps moving and its tail clears
//! the overlap; food and power-ups are relocated instead.

use glam::IVec2;

use crate::Position;

/// Straight run of obstacle cells (inclusive ranges)
#[derive(Debug, Clone, Copy)]
enum Segment {
    Row { y: i32, x0: i32, x1: i32 },
    Col { x: i32, y0: i32, y1: i32 },
}

use Segment::{Col, Row};

/// Layout for level N is `LEVEL_PATTERNS[N - 1]`
const LEVEL_PATTERNS: &[&[Segment]] = &[
    // Level 1: open board
    &[],
    // Level 2: corner brackets
    &[
        Row { y: 4, x0: 4, x1: 5 },
        Col { x: 4, y0: 5, y1: 5 },
        Row { y: 4, x0: 14, x1: 15 },
        Col { x: 15, y0: 5, y1: 5 },
        Row { y: 15, x0: 4, x1: 5 },
        Col { x: 4, y0: 14, y1: 14 },
        Row { y: 15, x0: 14, x1: 15 },
        Col { x: 15, y0: 14, y1: 14 },
    ],
    // Level 3: two bars
    &[
        Row { y: 6, x0: 6, x1: 13 },
        Row { y: 13, x0: 6, x1: 13 },
    ],
    // Level 4: split walls
    &[
        Col { x: 5, y0: 3, y1: 7 },
        Col { x: 5, y0: 12, y1: 16 },
        Col { x: 14, y0: 3, y1: 7 },
        Col { x: 14, y0: 12, y1: 16 },
    ],
    // Level 5: broken ring
    &[
        Row { y: 3, x0: 3, x1: 7 },
        Row { y: 3, x0: 12, x1: 16 },
        Row { y: 16, x0: 3, x1: 7 },
        Row { y: 16, x0: 12, x1: 16 },
        Col { x: 3, y0: 4, y1: 7 },
        Col { x: 3, y0: 12, y1: 15 },
        Col { x: 16, y0: 4, y1: 7 },
        Col { x: 16, y0: 12, y1: 15 },
    ],
];

/// Number of distinct layouts
pub fn pattern_count() -> usize {
    LEVEL_PATTERNS.len()
}

/// Obstacle cells for a level (1-based, clamped to the last layout)
pub fn obstacles_for_level(level: u32) -> Vec<Position> {
    let index = (level.max(1) as usize - 1).min(LEVEL_PATTERNS.len() - 1);
    let mut cells = Vec::new();
    for segment in LEVEL_PATTERNS[index] {
        match *segment {
            Row { y, x0, x1 } => cells.extend((x0..=x1).map(|x| IVec2::new(x, y))),
            Col { x, y0, y1 } => cells.extend((y0..=y1).map(|y| IVec2::new(x, y))),
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::INITIAL_HEAD;
    use crate::in_bounds;
    use std::collections::HashSet;

    #[test]
    fn test_level_one_is_open() {
        assert!(obstacles_for_level(1).is_empty());
        assert!(obstacles_for_level(0).is_empty());
    }

    #[test]
    fn test_level_two_pattern() {
        let cells = obstacles_for_level(2);
        assert_eq!(cells.len(), 12);
        assert!(cells.contains(&IVec2::new(4, 4)));
        assert!(cells.contains(&IVec2::new(15, 14)));
    }

    #[test]
    fn test_levels_past_table_reuse_last() {
        let last = obstacles_for_level(pattern_count() as u32);
        assert_eq!(obstacles_for_level(pattern_count() as u32 + 1), last);
        assert_eq!(obstacles_for_level(99), last);
    }

    #[test]
    fn test_patterns_valid() {
        for level in 1..=pattern_count() as u32 {
            let cells = obstacles_for_level(level);
            let unique: HashSet<_> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len(), "duplicate cell in level {level}");
            assert!(cells.iter().all(|c| in_bounds(*c)));
            assert!(!cells.contains(&INITIAL_HEAD));
        }
    }
}
