//! Layout strategies that turn the ordered item sequence into a positioned
//! visual tree.
//!
//! All four strategies read the same `&[ImageItem]` and never mutate it.
//! They differ only in how the container is laid out and which item fields
//! they treat as authoritative:
//!
//! | Strategy | Uses spans | Uses canvas geometry |
//! |----------|-----------|----------------------|
//! | Grid     | yes       | no                   |
//! | List     | no        | no                   |
//! | Masonry  | no        | no                   |
//! | Absolute | no        | yes (absolute items) |

pub mod absolute;
pub mod fit;
pub mod grid;
pub mod layout_cache;
pub mod list;
pub mod masonry;
pub mod shape;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};
use crate::models::{GridConfig, ImageId, ImageItem};

pub use absolute::AbsoluteLayout;
pub use fit::{fit_content, FittedImage};
pub use grid::GridLayout;
pub use layout_cache::{CachedRenderer, LayoutCache};
pub use list::ListLayout;
pub use masonry::MasonryLayout;
pub use shape::Clip;

/// Which strategy renders the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    #[default]
    Grid,
    List,
    Masonry,
    Absolute,
}

impl LayoutKind {
    pub fn strategy(self) -> &'static dyn LayoutStrategy {
        match self {
            Self::Grid => &GridLayout,
            Self::List => &ListLayout,
            Self::Masonry => &MasonryLayout,
            Self::Absolute => &AbsoluteLayout,
        }
    }

    pub fn arrange(self, items: &[ImageItem], ctx: &RenderContext<'_>) -> LayoutTree {
        self.strategy().arrange(items, ctx)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
            Self::Masonry => "masonry",
            Self::Absolute => "absolute",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            "masonry" => Ok(Self::Masonry),
            "absolute" | "canvas" => Ok(Self::Absolute),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

/// Measurements and UI-only state a strategy needs besides the items.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Live container size. `height` is the viewport height available to
    /// the absolute canvas; flow strategies ignore it.
    pub container: Size,
    pub grid: GridConfig,
    /// Items whose displayed box must keep their aspect ratio.
    pub aspect_locked: &'a HashSet<ImageId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(container: Size, grid: GridConfig, aspect_locked: &'a HashSet<ImageId>) -> Self {
        Self {
            container,
            grid,
            aspect_locked,
        }
    }

    pub fn is_locked(&self, item: &ImageItem) -> bool {
        self.aspect_locked.contains(&item.id) && item.aspect_ratio > 0.0
    }
}

/// One tile of the visual tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedTile {
    pub id: ImageId,
    /// Position in the item sequence.
    pub index: usize,
    /// Box the strategy allotted to the item.
    pub cell: Rect,
    /// Shaped frame inside `cell` (layout style and aspect lock applied).
    pub frame: Rect,
    pub image: FittedImage,
    pub clip: Clip,
    pub shadow_blur: f32,
    pub z_index: i32,
    /// False for items drawn on the absolute canvas without canvas geometry.
    pub positioned: bool,
}

/// The positioned visual tree produced by a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTree {
    pub kind: LayoutKind,
    pub container: Size,
    pub tiles: Vec<PositionedTile>,
}

impl LayoutTree {
    pub fn tile(&self, id: ImageId) -> Option<&PositionedTile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Tiles in paint order: ascending z-index, sequence order within ties.
    pub fn paint_order(&self) -> Vec<&PositionedTile> {
        let mut tiles: Vec<&PositionedTile> = self.tiles.iter().collect();
        tiles.sort_by_key(|t| (t.z_index, t.index));
        tiles
    }
}

/// A layout algorithm over the shared item sequence.
pub trait LayoutStrategy: Sync {
    fn kind(&self) -> LayoutKind;

    fn arrange(&self, items: &[ImageItem], ctx: &RenderContext<'_>) -> LayoutTree;
}

/// Shapes, locks and fits an item into the cell its strategy chose.
pub(crate) fn build_tile(
    item: &ImageItem,
    index: usize,
    cell: Rect,
    ctx: &RenderContext<'_>,
    z_index: i32,
    positioned: bool,
) -> PositionedTile {
    let mut frame = shape::frame_within(item, cell);
    if ctx.is_locked(item) {
        frame = fit::aspect_box(frame, item.aspect_ratio, item.h_align, item.v_align);
    }
    let image = fit::fit_content(
        item.fit,
        item.intrinsic_size(),
        frame,
        item.h_align,
        item.v_align,
    );
    PositionedTile {
        id: item.id,
        index,
        cell,
        frame,
        image,
        clip: shape::clip_for(item, &frame),
        shadow_blur: item.shadow.blur(),
        z_index,
        positioned,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::ImageItem;

    pub fn items(dims: &[(u32, u32)]) -> Vec<ImageItem> {
        dims.iter()
            .enumerate()
            .map(|(i, (w, h))| ImageItem::new(ImageId(i as u64 + 1), format!("{i}.png"), *w, *h))
            .collect()
    }

    pub fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }
}
