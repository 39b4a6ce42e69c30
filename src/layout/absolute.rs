use crate::geometry::{Rect, Size};
use crate::layout::{build_tile, LayoutKind, LayoutStrategy, LayoutTree, RenderContext};
use crate::models::{ImageItem, Placement};

/// Free-form canvas.
///
/// Items with absolute placement are drawn at their literal `x, y, w, h`
/// and `zIndex`. Items without canvas geometry are stacked down the left
/// edge at intrinsic size (narrowed to the canvas width) at z-index 0 and
/// flagged `positioned: false`; nothing reconciles them with canvas items.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteLayout;

impl LayoutStrategy for AbsoluteLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Absolute
    }

    fn arrange(&self, items: &[ImageItem], ctx: &RenderContext<'_>) -> LayoutTree {
        let width = ctx.container.width.max(0.0);
        let mut flow_y = 0.0f32;
        let mut extent = 0.0f32;
        let mut tiles = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let tile = match &item.placement {
                Placement::Absolute(abs) => {
                    let cell = Rect::new(abs.x, abs.y, abs.w.max(0.0), abs.h.max(0.0));
                    build_tile(item, index, cell, ctx, abs.z_index, true)
                }
                Placement::Grid(_) => {
                    let natural = item.intrinsic_size();
                    let scale = if natural.width > width && natural.width > 0.0 {
                        width / natural.width
                    } else {
                        1.0
                    };
                    let cell =
                        Rect::new(0.0, flow_y, natural.width * scale, natural.height * scale);
                    flow_y = cell.bottom();
                    build_tile(item, index, cell, ctx, 0, false)
                }
            };
            extent = extent.max(tile.cell.bottom());
            tiles.push(tile);
        }

        LayoutTree {
            kind: LayoutKind::Absolute,
            container: Size::new(width, ctx.container.height.max(extent)),
            tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::items;
    use crate::models::{AbsolutePlacement, GridConfig, ImageLayout};
    use std::collections::HashSet;

    fn canvas_items() -> Vec<ImageItem> {
        let mut items = items(&[(640, 480), (2000, 1000), (100, 100)]);
        items[0].layout = ImageLayout::Absolute;
        items[0].placement = Placement::Absolute(AbsolutePlacement {
            x: 50.0,
            y: 60.0,
            w: 120.0,
            h: 80.0,
            z_index: 2,
        });
        items[2].layout = ImageLayout::Absolute;
        items[2].placement = Placement::Absolute(AbsolutePlacement {
            x: 10.0,
            y: 900.0,
            w: 100.0,
            h: 100.0,
            z_index: 1,
        });
        items
    }

    #[test]
    fn test_absolute_items_use_literal_geometry() {
        let locked = HashSet::new();
        let ctx = RenderContext::new(Size::new(800.0, 700.0), GridConfig::default(), &locked);
        let tree = AbsoluteLayout.arrange(&canvas_items(), &ctx);

        let tile = &tree.tiles[0];
        assert_eq!(tile.cell, Rect::new(50.0, 60.0, 120.0, 80.0));
        assert_eq!(tile.z_index, 2);
        assert!(tile.positioned);
    }

    #[test]
    fn test_unpositioned_items_flow_without_guarantees() {
        let locked = HashSet::new();
        let ctx = RenderContext::new(Size::new(800.0, 700.0), GridConfig::default(), &locked);
        let tree = AbsoluteLayout.arrange(&canvas_items(), &ctx);

        let tile = &tree.tiles[1];
        assert!(!tile.positioned);
        assert_eq!(tile.z_index, 0);
        assert_eq!(tile.cell, Rect::new(0.0, 0.0, 800.0, 400.0));
    }

    #[test]
    fn test_container_fills_viewport_or_content() {
        let locked = HashSet::new();
        let ctx = RenderContext::new(Size::new(800.0, 700.0), GridConfig::default(), &locked);
        let tree = AbsoluteLayout.arrange(&canvas_items(), &ctx);
        assert_eq!(tree.container.height, 1000.0);

        let tree = AbsoluteLayout.arrange(&canvas_items()[..2], &ctx);
        assert_eq!(tree.container.height, 700.0);
    }

    #[test]
    fn test_paint_order_follows_z_index() {
        let locked = HashSet::new();
        let ctx = RenderContext::new(Size::new(800.0, 700.0), GridConfig::default(), &locked);
        let tree = AbsoluteLayout.arrange(&canvas_items(), &ctx);
        let order: Vec<usize> = tree.paint_order().iter().map(|t| t.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }
}
