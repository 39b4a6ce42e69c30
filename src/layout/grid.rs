use tracing::trace;

use crate::geometry::{Rect, Size};
use crate::layout::{build_tile, LayoutKind, LayoutStrategy, LayoutTree, RenderContext};
use crate::models::ImageItem;

/// Grid placement with `columns` tracks and row-major auto-placement.
///
/// Placement follows sparse auto-flow: a cursor walks forward through the
/// grid and never backfills holes left behind by wide items.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayout;

/// Cell coordinates of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridArea {
    pub row: usize,
    pub col: usize,
    pub col_span: usize,
    pub row_span: usize,
}

/// Occupancy bitmap that grows downward as rows are needed.
struct Occupancy {
    columns: usize,
    rows: Vec<Vec<bool>>,
}

impl Occupancy {
    fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    fn is_free(&self, row: usize, col: usize, col_span: usize, row_span: usize) -> bool {
        (row..row + row_span).all(|r| match self.rows.get(r) {
            Some(cells) => cells[col..col + col_span].iter().all(|taken| !taken),
            None => true,
        })
    }

    fn occupy(&mut self, area: GridArea) {
        while self.rows.len() < area.row + area.row_span {
            self.rows.push(vec![false; self.columns]);
        }
        for r in area.row..area.row + area.row_span {
            for taken in &mut self.rows[r][area.col..area.col + area.col_span] {
                *taken = true;
            }
        }
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl GridLayout {
    /// Auto-places spans into a grid with `columns` tracks.
    ///
    /// Spans wider than the grid are narrowed to fit.
    pub fn place(spans: &[(u32, u32)], columns: u32) -> (Vec<GridArea>, usize) {
        let columns = columns.max(1) as usize;
        let mut grid = Occupancy::new(columns);
        let mut areas = Vec::with_capacity(spans.len());
        let (mut row, mut col) = (0usize, 0usize);

        for &(col_span, row_span) in spans {
            let col_span = (col_span.max(1) as usize).min(columns);
            let row_span = row_span.max(1) as usize;
            loop {
                if col + col_span > columns {
                    col = 0;
                    row += 1;
                    continue;
                }
                if grid.is_free(row, col, col_span, row_span) {
                    break;
                }
                col += 1;
            }
            let area = GridArea {
                row,
                col,
                col_span,
                row_span,
            };
            grid.occupy(area);
            areas.push(area);
            col += col_span;
        }

        (areas, grid.row_count())
    }
}

impl LayoutStrategy for GridLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Grid
    }

    fn arrange(&self, items: &[ImageItem], ctx: &RenderContext<'_>) -> LayoutTree {
        let grid = ctx.grid;
        let width = ctx.container.width.max(0.0);
        let spans: Vec<(u32, u32)> = items
            .iter()
            .map(|item| item.grid_spans().unwrap_or((1, 1)))
            .collect();
        let (areas, row_count) = Self::place(&spans, grid.columns);

        let track = grid.track_width(width);
        let tiles = items
            .iter()
            .zip(&areas)
            .enumerate()
            .map(|(index, (item, area))| {
                let cell = Rect::new(
                    area.col as f32 * (track + grid.gap),
                    area.row as f32 * (grid.row_height + grid.gap),
                    grid.span_extent(track, area.col_span as u32),
                    grid.span_extent(grid.row_height, area.row_span as u32),
                );
                build_tile(item, index, cell, ctx, 0, true)
            })
            .collect();

        let height = if row_count == 0 {
            0.0
        } else {
            grid.span_extent(grid.row_height, row_count as u32)
        };
        trace!(items = items.len(), rows = row_count, "Grid layout computed");

        LayoutTree {
            kind: LayoutKind::Grid,
            container: Size::new(width, height),
            tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::{approx, items};
    use crate::models::{GridConfig, ImageItemPatch, ImageStore};
    use std::collections::HashSet;

    fn area(row: usize, col: usize, col_span: usize, row_span: usize) -> GridArea {
        GridArea {
            row,
            col,
            col_span,
            row_span,
        }
    }

    #[test]
    fn test_single_spans_flow_row_major() {
        let (areas, rows) = GridLayout::place(&[(1, 1); 5], 3);
        assert_eq!(rows, 2);
        assert_eq!(areas[0], area(0, 0, 1, 1));
        assert_eq!(areas[2], area(0, 2, 1, 1));
        assert_eq!(areas[3], area(1, 0, 1, 1));
    }

    #[test]
    fn test_wide_item_wraps_and_leaves_hole() {
        let (areas, _) = GridLayout::place(&[(1, 1), (1, 1), (2, 1), (1, 1)], 3);
        assert_eq!(areas[2], area(1, 0, 2, 1));
        // Sparse flow: the hole at (0, 2) is not backfilled.
        assert_eq!(areas[3], area(1, 2, 1, 1));
    }

    #[test]
    fn test_tall_item_is_skipped_around() {
        let (areas, rows) = GridLayout::place(&[(1, 2), (1, 1), (1, 1), (1, 1), (1, 1)], 3);
        assert_eq!(areas[0], area(0, 0, 1, 2));
        assert_eq!(areas[3], area(1, 1, 1, 1));
        assert_eq!(areas[4], area(1, 2, 1, 1));
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_oversized_span_is_narrowed() {
        let (areas, _) = GridLayout::place(&[(9, 1)], 3);
        assert_eq!(areas[0].col_span, 3);
    }

    #[test]
    fn test_cells_use_track_row_height_and_gap() {
        let grid = GridConfig::new(3, 220.0, 16.0);
        let mut store = ImageStore::with_items(&grid, items(&[(100, 100); 4]));
        let first = store.items()[0].id;
        store.update_image(first, &ImageItemPatch::spans(2, 2));

        let locked = HashSet::new();
        let ctx = RenderContext::new(Size::new(932.0, 600.0), grid, &locked);
        let tree = GridLayout.arrange(store.items(), &ctx);

        let big = tree.tiles[0].cell;
        assert!(approx(big.width, 616.0));
        assert!(approx(big.height, 456.0));

        let next = tree.tiles[1].cell;
        assert!(approx(next.x, 632.0));
        assert!(approx(next.y, 0.0));

        let third = tree.tiles[2].cell;
        assert!(approx(third.x, 632.0));
        assert!(approx(third.y, 236.0));

        assert!(approx(tree.container.height, 692.0));
    }

    #[test]
    fn test_empty_grid() {
        let locked = HashSet::new();
        let ctx = RenderContext::new(Size::new(900.0, 600.0), GridConfig::default(), &locked);
        let tree = GridLayout.arrange(&[], &ctx);
        assert!(tree.tiles.is_empty());
        assert_eq!(tree.container.height, 0.0);
    }
}
