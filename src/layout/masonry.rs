use crate::geometry::{Rect, Size};
use crate::layout::{build_tile, LayoutKind, LayoutStrategy, LayoutTree, RenderContext};
use crate::models::ImageItem;

/// Narrowest track masonry lays out. Containers too narrow for their gaps
/// overflow instead of collapsing every tile to zero height.
const MIN_TRACK_WIDTH: f32 = 1.0;

/// Column-balanced flow into `columns` vertical tracks.
///
/// Items are taken in sequence order and each one drops into the currently
/// shortest track (leftmost on ties). Tile height follows the item's aspect
/// ratio at track width.
#[derive(Debug, Clone, Copy, Default)]
pub struct MasonryLayout;

impl MasonryLayout {
    /// Index of the shortest track, preferring the leftmost.
    fn shortest(heights: &[f32]) -> usize {
        let mut best = 0;
        for (i, h) in heights.iter().enumerate() {
            if *h < heights[best] {
                best = i;
            }
        }
        best
    }
}

impl LayoutStrategy for MasonryLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Masonry
    }

    fn arrange(&self, items: &[ImageItem], ctx: &RenderContext<'_>) -> LayoutTree {
        let grid = ctx.grid;
        let width = ctx.container.width.max(0.0);
        let columns = grid.columns.max(1) as usize;
        let track = grid.track_width(width).max(MIN_TRACK_WIDTH);
        let mut heights = vec![0.0f32; columns];
        let mut filled = vec![false; columns];
        let mut tiles = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let col = Self::shortest(&heights);
            let ar = if item.aspect_ratio > 0.0 {
                item.aspect_ratio
            } else {
                1.0
            };
            let height = track / ar;
            let y = if filled[col] {
                heights[col] + grid.gap
            } else {
                0.0
            };
            let cell = Rect::new(col as f32 * (track + grid.gap), y, track, height);
            tiles.push(build_tile(item, index, cell, ctx, 0, true));
            heights[col] = y + height;
            filled[col] = true;
        }

        let extent = grid.span_extent(track, columns as u32);
        let height = heights.iter().copied().fold(0.0f32, f32::max);
        LayoutTree {
            kind: LayoutKind::Masonry,
            container: Size::new(width.max(extent), height),
            tiles,
        }
    }
}
