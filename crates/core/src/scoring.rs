//! Scoring module - line-clear points, level progression and gravity periods
//!
//! Rules:
//! - An n-line clear (n in 1..=4) awards `LINE_SCORES[n - 1] * (level + 1)`.
//! - The multiplier uses the level in effect *before* the clear is counted.
//! - The level is `total_rows / 10`, regardless of how rows were grouped into clears.
//! - Gravity period is `1000 / (level + 1) + 200` ms once the level is known.

use crate::types::{GRAVITY_BASE_MS, GRAVITY_FLOOR_MS, LINE_SCORES, ROWS_PER_LEVEL};

/// Points for clearing `lines` rows at once at `level`
///
/// Zero rows, or more than four, score nothing.
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[(lines - 1) as usize].saturating_mul(level.saturating_add(1))
}

/// Level reached after clearing `total_rows` rows
pub fn level_for_rows(total_rows: u32) -> u32 {
    total_rows / ROWS_PER_LEVEL
}

/// Gravity period for a level, in milliseconds
pub fn gravity_interval_ms(level: u32) -> u32 {
    GRAVITY_BASE_MS / level.saturating_add(1) + GRAVITY_FLOOR_MS
}

/// Result of recording one clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub points: u32,
    /// Level before the clear (the multiplier used).
    pub level_before: u32,
    pub level_after: u32,
}

impl ClearOutcome {
    pub fn leveled_up(&self) -> bool {
        self.level_after != self.level_before
    }
}

/// Score, row total and level of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    score: u32,
    rows: u32,
    level: u32,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Count a clear of `lines` rows
    pub fn record_clear(&mut self, lines: u32) -> ClearOutcome {
        let level_before = self.level;
        let points = line_clear_points(lines, level_before);

        self.score = self.score.saturating_add(points);
        self.rows = self.rows.saturating_add(lines);
        self.level = level_for_rows(self.rows);

        ClearOutcome {
            points,
            level_before,
            level_after: self.level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_points_table() {
        assert_eq!(line_clear_points(0, 0), 0);
        assert_eq!(line_clear_points(1, 0), 40);
        assert_eq!(line_clear_points(2, 0), 100);
        assert_eq!(line_clear_points(3, 0), 300);
        assert_eq!(line_clear_points(4, 0), 1200);
        assert_eq!(line_clear_points(5, 0), 0);
    }

    #[test]
    fn test_line_clear_points_scale_with_level() {
        assert_eq!(line_clear_points(1, 1), 80);
        assert_eq!(line_clear_points(4, 2), 3600);
        assert_eq!(line_clear_points(2, 9), 1000);
    }

    #[test]
    fn test_level_for_rows_boundaries() {
        for (rows, level) in [(0, 0), (9, 0), (10, 1), (19, 1), (20, 2), (105, 10)] {
            assert_eq!(level_for_rows(rows), level, "rows={rows}");
        }
    }

    #[test]
    fn test_gravity_interval_shrinks_with_level() {
        assert_eq!(gravity_interval_ms(0), 1200);
        assert_eq!(gravity_interval_ms(1), 700);
        assert_eq!(gravity_interval_ms(3), 450);
        assert_eq!(gravity_interval_ms(999), 201);
    }

    #[test]
    fn test_progress_uses_level_before_the_clear() {
        let mut progress = Progress::new();
        for _ in 0..9 {
            progress.record_clear(1);
        }
        assert_eq!(progress.level(), 0);

        // Crossing from 9 to 13 rows: paid at level 0, then level becomes 1.
        let outcome = progress.record_clear(4);
        assert_eq!(outcome.points, 1200);
        assert_eq!(outcome.level_before, 0);
        assert_eq!(outcome.level_after, 1);
        assert!(outcome.leveled_up());
        assert_eq!(progress.rows(), 13);
        assert_eq!(progress.score(), 9 * 40 + 1200);

        let outcome = progress.record_clear(1);
        assert_eq!(outcome.points, 80);
        assert!(!outcome.leveled_up());
    }
}
