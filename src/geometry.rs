//! Pixel geometry and the pixel-to-grid-unit converter.
//!
//! Everything here is pure: no state, no logging. Resize and layout code
//! call into these helpers with whatever container measurements are current.

use serde::{Deserialize, Serialize};

use crate::models::GridConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`.
    pub fn delta_from(&self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width > 0.0 && self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}

/// Axis-aligned rectangle in container pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Vertical midpoint, used by the drag midpoint-crossing rule.
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Overlapping region, or an empty rect at `self`'s origin when disjoint.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return Rect::new(self.x, self.y, 0.0, 0.0);
        }
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// Rounds halves toward positive infinity, matching how pointer deltas
/// are snapped in browsers (`-0.5` snaps to `0`, `0.5` snaps to `1`).
pub fn round_half_up(value: f32) -> i64 {
    (value + 0.5).floor() as i64
}

/// Width of one grid column track for the given live container width.
///
/// Gaps are not subtracted: one span step is a `container / columns` slice.
pub fn column_width(container_width: f32, grid: &GridConfig) -> f32 {
    container_width.max(1.0) / grid.columns.max(1) as f32
}

/// Converts a horizontal pixel delta into a whole number of columns.
pub fn delta_columns(dx: f32, container_width: f32, grid: &GridConfig) -> i64 {
    round_half_up(dx / column_width(container_width, grid))
}

/// Converts a vertical pixel delta into a whole number of rows.
pub fn delta_rows(dy: f32, grid: &GridConfig) -> i64 {
    round_half_up(dy / grid.row_height.max(1.0))
}

/// Applies a column delta to a starting span, clamped to `[1, columns]`.
pub fn next_col_span(start: u32, delta: i64, grid: &GridConfig) -> u32 {
    let max = grid.columns.max(1) as i64;
    (start as i64 + delta).clamp(1, max) as u32
}

/// Applies a row delta to a starting span, clamped to `[1, max_row_span]`.
pub fn next_row_span(start: u32, delta: i64, max_row_span: u32) -> u32 {
    (start as i64 + delta).clamp(1, max_row_span.max(1) as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: u32) -> GridConfig {
        GridConfig::new(columns, 220.0, 16.0)
    }

    #[test]
    fn test_round_half_up_matches_pointer_snapping() {
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(0.49), 0);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-0.51), -1);
        assert_eq!(round_half_up(2.0), 2);
    }

    #[test]
    fn test_column_width_recomputed_from_container() {
        let g = grid(3);
        assert!((column_width(900.0, &g) - 300.0).abs() < 0.001);
        assert!((column_width(600.0, &g) - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_delta_columns_rounds() {
        let g = grid(3);
        assert_eq!(delta_columns(600.0, 900.0, &g), 2);
        assert_eq!(delta_columns(149.0, 900.0, &g), 0);
        assert_eq!(delta_columns(150.0, 900.0, &g), 1);
        assert_eq!(delta_columns(-450.0, 900.0, &g), -1);
    }

    #[test]
    fn test_delta_rows_uses_row_height() {
        let g = grid(3);
        assert_eq!(delta_rows(440.0, &g), 2);
        assert_eq!(delta_rows(100.0, &g), 0);
        assert_eq!(delta_rows(-330.0, &g), -1);
    }

    #[test]
    fn test_span_clamps() {
        let g = grid(3);
        assert_eq!(next_col_span(1, 10, &g), 3);
        assert_eq!(next_col_span(3, -10, &g), 1);
        assert_eq!(next_row_span(1, -5, 20), 1);
        assert_eq!(next_row_span(1, 500, 20), 20);
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 200.0, 200.0);
        let b = Rect::new(-100.0, 50.0, 400.0, 100.0);
        assert_eq!(a.intersection(&b), Rect::new(0.0, 50.0, 200.0, 100.0));

        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert_eq!(a.intersection(&far).width, 0.0);
    }
}
