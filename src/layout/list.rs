use crate::geometry::{Rect, Size};
use crate::layout::{build_tile, LayoutKind, LayoutStrategy, LayoutTree, RenderContext};
use crate::models::ImageItem;

/// Vertical stack, one full-width item per row.
///
/// Rows are `rowHeight` tall; an aspect-locked item takes the height its
/// ratio gives at full width instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListLayout;

impl LayoutStrategy for ListLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::List
    }

    fn arrange(&self, items: &[ImageItem], ctx: &RenderContext<'_>) -> LayoutTree {
        let width = ctx.container.width.max(0.0);
        let gap = ctx.grid.gap;
        let mut y = 0.0f32;
        let mut tiles = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                y += gap;
            }
            let height = if ctx.is_locked(item) {
                width / item.aspect_ratio
            } else {
                ctx.grid.row_height
            };
            let cell = Rect::new(0.0, y, width, height);
            tiles.push(build_tile(item, index, cell, ctx, 0, true));
            y += height;
        }

        LayoutTree {
            kind: LayoutKind::List,
            container: Size::new(width, y),
            tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::{approx, items};
    use crate::models::{GridConfig, ImageId, ImageItemPatch, ImageStore};
    use std::collections::HashSet;

    #[test]
    fn test_rows_stack_full_width() {
        let locked = HashSet::new();
        let grid = GridConfig::new(3, 200.0, 10.0);
        let ctx = RenderContext::new(Size::new(800.0, 600.0), grid, &locked);
        let tree = ListLayout.arrange(&items(&[(100, 100), (400, 100), (50, 300)]), &ctx);

        let ys: Vec<f32> = tree.tiles.iter().map(|t| t.cell.y).collect();
        assert_eq!(ys, vec![0.0, 210.0, 420.0]);
        assert!(tree.tiles.iter().all(|t| approx(t.cell.width, 800.0)));
        assert!(approx(tree.container.height, 620.0));
    }

    #[test]
    fn test_spans_are_ignored() {
        let grid = GridConfig::default();
        let mut store = ImageStore::with_items(&grid, items(&[(100, 100), (100, 100)]));
        store.update_image(ImageId(1), &ImageItemPatch::spans(3, 4));
        let locked = HashSet::new();
        let ctx = RenderContext::new(Size::new(500.0, 600.0), grid, &locked);
        let tree = ListLayout.arrange(store.items(), &ctx);
        assert!(approx(tree.tiles[0].cell.height, grid.row_height));
        assert!(approx(tree.tiles[0].cell.width, 500.0));
    }

    #[test]
    fn test_locked_row_takes_aspect_height() {
        let mut locked = HashSet::new();
        locked.insert(ImageId(1));
        let ctx = RenderContext::new(Size::new(800.0, 600.0), GridConfig::default(), &locked);
        let tree = ListLayout.arrange(&items(&[(400, 100)]), &ctx);
        assert!(approx(tree.tiles[0].cell.height, 200.0));
    }
}
