//! Per-layout shaping of a tile inside the box its strategy allotted.

use crate::geometry::Rect;
use crate::layout::fit::aspect_box;
use crate::models::{HAlign, ImageItem, ImageLayout, RadiusClass, VAlign};

/// How a tile's frame is clipped when painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clip {
    None,
    Rounded(f32),
    Circle,
}

/// Resolves the frame an item occupies within `cell`.
///
/// Whole-cell styles fill the cell. Aligned styles keep the image's aspect
/// ratio and pin it to an edge or corner. Half and quarter styles take that
/// fraction of the cell.
pub fn frame_within(item: &ImageItem, cell: Rect) -> Rect {
    let ar = item.aspect_ratio;
    match item.layout {
        ImageLayout::Default
        | ImageLayout::Rounded
        | ImageLayout::Full
        | ImageLayout::Grid
        | ImageLayout::Absolute => cell,
        ImageLayout::Circle => aspect_box(cell, 1.0, HAlign::Center, VAlign::Center),
        ImageLayout::Left => aspect_box(cell, ar, HAlign::Left, VAlign::Center),
        ImageLayout::Right => aspect_box(cell, ar, HAlign::Right, VAlign::Center),
        ImageLayout::Center => aspect_box(cell, ar, HAlign::Center, VAlign::Center),
        ImageLayout::TopCenter => aspect_box(cell, ar, HAlign::Center, VAlign::Top),
        ImageLayout::BottomLeft => aspect_box(cell, ar, HAlign::Left, VAlign::Bottom),
        ImageLayout::BottomRight => aspect_box(cell, ar, HAlign::Right, VAlign::Bottom),
        ImageLayout::HalfLeft => Rect::new(cell.x, cell.y, cell.width / 2.0, cell.height),
        ImageLayout::HalfRight => Rect::new(
            cell.x + cell.width / 2.0,
            cell.y,
            cell.width / 2.0,
            cell.height,
        ),
        ImageLayout::QuarterTopLeft => quarter(cell, 0.0, 0.0),
        ImageLayout::QuarterTopRight => quarter(cell, 1.0, 0.0),
        ImageLayout::QuarterBottomLeft => quarter(cell, 0.0, 1.0),
        ImageLayout::QuarterBottomRight => quarter(cell, 1.0, 1.0),
    }
}

fn quarter(cell: Rect, fx: f32, fy: f32) -> Rect {
    let w = cell.width / 2.0;
    let h = cell.height / 2.0;
    Rect::new(cell.x + w * fx, cell.y + h * fy, w, h)
}

/// Clip shape for the item's layout and radius class.
pub fn clip_for(item: &ImageItem, frame: &Rect) -> Clip {
    let pill = frame.width.min(frame.height) / 2.0;
    match item.layout {
        ImageLayout::Circle => Clip::Circle,
        ImageLayout::Full => Clip::None,
        // Rounded always rounds, even when the class says none.
        ImageLayout::Rounded if item.radius == RadiusClass::None => {
            Clip::Rounded(RadiusClass::Md.pixels())
        }
        _ => match item.radius {
            RadiusClass::None => Clip::None,
            r => Clip::Rounded(r.pixels().min(pill)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageId;

    fn item(layout: ImageLayout, w: u32, h: u32) -> ImageItem {
        let mut item = ImageItem::new(ImageId(1), "a.png", w, h);
        item.layout = layout;
        item
    }

    #[test]
    fn test_whole_cell_layouts() {
        let cell = Rect::new(10.0, 20.0, 300.0, 200.0);
        for layout in [ImageLayout::Default, ImageLayout::Rounded, ImageLayout::Grid] {
            assert_eq!(frame_within(&item(layout, 10, 10), cell), cell);
        }
    }

    #[test]
    fn test_circle_is_centered_square() {
        let cell = Rect::new(0.0, 0.0, 300.0, 200.0);
        let frame = frame_within(&item(ImageLayout::Circle, 10, 10), cell);
        assert_eq!(frame, Rect::new(50.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn test_aligned_layouts_keep_aspect() {
        let cell = Rect::new(0.0, 0.0, 400.0, 200.0);
        let left = frame_within(&item(ImageLayout::Left, 100, 100), cell);
        assert_eq!(left, Rect::new(0.0, 0.0, 200.0, 200.0));
        let right = frame_within(&item(ImageLayout::BottomRight, 100, 100), cell);
        assert_eq!(right, Rect::new(200.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn test_half_and_quarter() {
        let cell = Rect::new(0.0, 0.0, 400.0, 200.0);
        assert_eq!(
            frame_within(&item(ImageLayout::HalfRight, 1, 1), cell),
            Rect::new(200.0, 0.0, 200.0, 200.0)
        );
        assert_eq!(
            frame_within(&item(ImageLayout::QuarterBottomLeft, 1, 1), cell),
            Rect::new(0.0, 100.0, 200.0, 100.0)
        );
    }

    #[test]
    fn test_clip_shapes() {
        let frame = Rect::new(0.0, 0.0, 100.0, 60.0);
        assert_eq!(clip_for(&item(ImageLayout::Circle, 1, 1), &frame), Clip::Circle);
        assert_eq!(clip_for(&item(ImageLayout::Full, 1, 1), &frame), Clip::None);
        assert_eq!(
            clip_for(&item(ImageLayout::Default, 1, 1), &frame),
            Clip::Rounded(8.0)
        );

        let mut pill = item(ImageLayout::Default, 1, 1);
        pill.radius = RadiusClass::Full;
        assert_eq!(clip_for(&pill, &frame), Clip::Rounded(30.0));
    }
}
