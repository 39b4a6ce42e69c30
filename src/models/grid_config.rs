use serde::{Deserialize, Serialize};

pub const MIN_COLUMNS: u32 = 1;
pub const MAX_COLUMNS: u32 = 12;
pub const MIN_ROW_HEIGHT: f32 = 80.0;
pub const MAX_ROW_HEIGHT: f32 = 800.0;
pub const MIN_GAP: f32 = 0.0;
pub const MAX_GAP: f32 = 64.0;

/// Gallery-wide grid settings.
///
/// Every constructor and setter clamps, so a `GridConfig` held by the
/// editor is always within range. Deserialized values are clamped by
/// [`GridConfig::clamped`] when a seed is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub columns: u32,
    pub row_height: f32,
    pub gap: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            row_height: 220.0,
            gap: 16.0,
        }
    }
}

impl GridConfig {
    pub fn new(columns: u32, row_height: f32, gap: f32) -> Self {
        Self {
            columns,
            row_height,
            gap,
        }
        .clamped()
    }

    /// Returns a copy with every field forced into its allowed range.
    pub fn clamped(self) -> Self {
        Self {
            columns: self.columns.clamp(MIN_COLUMNS, MAX_COLUMNS),
            row_height: clamp_finite(self.row_height, MIN_ROW_HEIGHT, MAX_ROW_HEIGHT),
            gap: clamp_finite(self.gap, MIN_GAP, MAX_GAP),
        }
    }

    pub fn set_columns(&mut self, columns: u32) {
        self.columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
    }

    pub fn set_row_height(&mut self, row_height: f32) {
        self.row_height = clamp_finite(row_height, MIN_ROW_HEIGHT, MAX_ROW_HEIGHT);
    }

    pub fn set_gap(&mut self, gap: f32) {
        self.gap = clamp_finite(gap, MIN_GAP, MAX_GAP);
    }

    /// Width of one column track once gaps are taken out of `container_width`.
    pub fn track_width(&self, container_width: f32) -> f32 {
        let cols = self.columns.max(1) as f32;
        let gaps = self.gap * (cols - 1.0);
        ((container_width - gaps) / cols).max(0.0)
    }

    /// Pixel extent of `span` tracks of `track` size with gaps between them.
    pub fn span_extent(&self, track: f32, span: u32) -> f32 {
        let span = span.max(1) as f32;
        track * span + self.gap * (span - 1.0)
    }
}

// NaN would otherwise survive `clamp`.
fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let grid = GridConfig::default();
        assert_eq!(grid.columns, 3);
        assert_eq!(grid.row_height, 220.0);
        assert_eq!(grid.gap, 16.0);
    }

    #[test]
    fn test_new_clamps_out_of_range_values() {
        let grid = GridConfig::new(0, 10.0, -4.0);
        assert_eq!(grid.columns, 1);
        assert_eq!(grid.row_height, 80.0);
        assert_eq!(grid.gap, 0.0);

        let grid = GridConfig::new(40, 5000.0, 500.0);
        assert_eq!(grid.columns, 12);
        assert_eq!(grid.row_height, 800.0);
        assert_eq!(grid.gap, 64.0);
    }

    #[test]
    fn test_setters_clamp() {
        let mut grid = GridConfig::default();
        grid.set_columns(13);
        grid.set_row_height(f32::NAN);
        grid.set_gap(32.0);
        assert_eq!(grid.columns, 12);
        assert_eq!(grid.row_height, 80.0);
        assert_eq!(grid.gap, 32.0);
    }

    #[test]
    fn test_track_and_span_extent() {
        let grid = GridConfig::new(3, 220.0, 16.0);
        let track = grid.track_width(932.0);
        assert!((track - 300.0).abs() < 0.01);
        assert!((grid.span_extent(track, 2) - 616.0).abs() < 0.01);
        assert!((grid.span_extent(220.0, 3) - 692.0).abs() < 0.01);
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = serde_json::to_string(&GridConfig::default()).unwrap();
        assert!(json.contains("\"rowHeight\":220.0"));
    }
}
