//! `object-fit` / `object-position` geometry.
//!
//! Given an image's natural size and the frame it is drawn into, computes
//! where the scaled content lands and which part of it stays visible after
//! clipping to the frame. Pure geometry, no pixels.

use crate::geometry::{Rect, Size};
use crate::models::{FitMode, HAlign, VAlign};

/// Result of fitting content into a frame, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedImage {
    /// Where the scaled content is drawn. May extend past the frame.
    pub content: Rect,
    /// `content` clipped to the frame.
    pub visible: Rect,
    /// Uniform scale applied to the natural size (`Fill` reports the
    /// horizontal factor).
    pub scale: f32,
}

impl FittedImage {
    /// True when part of the content falls outside the frame.
    pub fn is_cropped(&self) -> bool {
        self.visible.width + 0.01 < self.content.width
            || self.visible.height + 0.01 < self.content.height
    }

    /// True when the frame has uncovered area around the content.
    pub fn is_letterboxed(&self, frame: &Rect) -> bool {
        self.visible.width + 0.01 < frame.width || self.visible.height + 0.01 < frame.height
    }
}

/// Fits `natural` into `frame` with the given mode and alignment.
///
/// Alignment works like a percentage `object-position`: the leftover space
/// (negative when content overflows) is distributed by the alignment factor.
pub fn fit_content(
    mode: FitMode,
    natural: Size,
    frame: Rect,
    h_align: HAlign,
    v_align: VAlign,
) -> FittedImage {
    let (content_size, scale) = fitted_size(mode, natural, frame.size());
    let x = frame.x + (frame.width - content_size.width) * h_align.factor();
    let y = frame.y + (frame.height - content_size.height) * v_align.factor();
    let content = Rect::new(x, y, content_size.width, content_size.height);
    FittedImage {
        content,
        visible: content.intersection(&frame),
        scale,
    }
}

/// Size of the drawn content for a fit mode, plus the scale used.
pub fn fitted_size(mode: FitMode, natural: Size, target: Size) -> (Size, f32) {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return (target, 1.0);
    }
    let sx = target.width / natural.width;
    let sy = target.height / natural.height;
    match mode {
        FitMode::Fill => (target, sx),
        FitMode::Cover => scaled(natural, sx.max(sy)),
        FitMode::Contain => scaled(natural, sx.min(sy)),
        FitMode::ScaleDown => scaled(natural, sx.min(sy).min(1.0)),
        FitMode::None => (natural, 1.0),
    }
}

fn scaled(natural: Size, scale: f32) -> (Size, f32) {
    (
        Size::new(natural.width * scale, natural.height * scale),
        scale,
    )
}

/// Largest box with the given aspect ratio that fits in `frame`, aligned.
pub fn aspect_box(frame: Rect, aspect_ratio: f32, h_align: HAlign, v_align: VAlign) -> Rect {
    if aspect_ratio <= 0.0 || !aspect_ratio.is_finite() {
        return frame;
    }
    let (size, _) = fitted_size(
        FitMode::Contain,
        Size::new(aspect_ratio, 1.0),
        frame.size(),
    );
    Rect::new(
        frame.x + (frame.width - size.width) * h_align.factor(),
        frame.y + (frame.height - size.height) * v_align.factor(),
        size.width,
        size.height,
    )
}
