use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::Size;

/// Largest box a freshly switched absolute item occupies on the canvas.
const ABSOLUTE_SEED_BOX: f32 = 320.0;

/// Stable identifier assigned by the store. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// Placement style of a tile. Declaration order is the cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageLayout {
    #[default]
    Default,
    Rounded,
    Circle,
    Full,
    Left,
    Right,
    Center,
    Grid,
    TopCenter,
    BottomLeft,
    BottomRight,
    HalfLeft,
    HalfRight,
    QuarterTopLeft,
    QuarterTopRight,
    QuarterBottomLeft,
    QuarterBottomRight,
    Absolute,
}

impl ImageLayout {
    pub const ALL: [ImageLayout; 18] = [
        Self::Default,
        Self::Rounded,
        Self::Circle,
        Self::Full,
        Self::Left,
        Self::Right,
        Self::Center,
        Self::Grid,
        Self::TopCenter,
        Self::BottomLeft,
        Self::BottomRight,
        Self::HalfLeft,
        Self::HalfRight,
        Self::QuarterTopLeft,
        Self::QuarterTopRight,
        Self::QuarterBottomLeft,
        Self::QuarterBottomRight,
        Self::Absolute,
    ];

    /// The next layout in cycling order, wrapping after `Absolute`.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn is_absolute(self) -> bool {
        self == Self::Absolute
    }
}

/// Coarse display-size hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageSize {
    Thumbnail,
    #[default]
    Medium,
    Large,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RadiusClass {
    None,
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
    Full,
}

impl RadiusClass {
    /// Corner radius in pixels. `Full` is resolved against the frame later.
    pub fn pixels(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Sm => 4.0,
            Self::Md => 8.0,
            Self::Lg => 16.0,
            Self::Xl => 24.0,
            Self::Full => f32::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowClass {
    None,
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl ShadowClass {
    /// Blur radius in pixels.
    pub fn blur(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Sm => 2.0,
            Self::Md => 6.0,
            Self::Lg => 15.0,
            Self::Xl => 25.0,
        }
    }
}

/// How image content fills its box, with `object-fit` semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    Fill,
    #[default]
    Cover,
    Contain,
    ScaleDown,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HAlign {
    pub fn factor(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VAlign {
    pub fn factor(self) -> f32 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPlacement {
    pub col_span: u32,
    pub row_span: u32,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self {
            col_span: 1,
            row_span: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsolutePlacement {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub z_index: i32,
}

/// The authoritative geometry of an item. Exactly one variant is live.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "placement", rename_all = "kebab-case")]
pub enum Placement {
    Grid(GridPlacement),
    Absolute(AbsolutePlacement),
}

impl Default for Placement {
    fn default() -> Self {
        Self::Grid(GridPlacement::default())
    }
}

impl Placement {
    pub fn as_grid(&self) -> Option<&GridPlacement> {
        match self {
            Self::Grid(g) => Some(g),
            Self::Absolute(_) => None,
        }
    }

    pub fn as_absolute(&self) -> Option<&AbsolutePlacement> {
        match self {
            Self::Absolute(a) => Some(a),
            Self::Grid(_) => None,
        }
    }
}

/// One visual tile of the gallery.
///
/// Serialized flat, with a `placement` tag naming the live geometry.
/// Documents without the tag are still accepted: the variant then follows
/// `layout`, and missing spans or canvas fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    pub id: ImageId,
    pub src: String,
    pub alt: String,
    pub caption: String,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f32,
    pub layout: ImageLayout,
    pub size: ImageSize,
    pub radius: RadiusClass,
    pub shadow: ShadowClass,
    pub fit: FitMode,
    pub h_align: HAlign,
    pub v_align: VAlign,
    #[serde(flatten)]
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum PlacementKind {
    Grid,
    Absolute,
}

/// Wire form of `ImageItem` with every geometry field optional.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageItemRepr {
    id: ImageId,
    src: String,
    #[serde(default)]
    alt: String,
    #[serde(default)]
    caption: String,
    width: u32,
    height: u32,
    #[serde(default)]
    aspect_ratio: f32,
    #[serde(default)]
    layout: ImageLayout,
    #[serde(default)]
    size: ImageSize,
    #[serde(default)]
    radius: RadiusClass,
    #[serde(default)]
    shadow: ShadowClass,
    #[serde(default)]
    fit: FitMode,
    #[serde(default)]
    h_align: HAlign,
    #[serde(default)]
    v_align: VAlign,
    placement: Option<PlacementKind>,
    col_span: Option<u32>,
    row_span: Option<u32>,
    x: Option<f32>,
    y: Option<f32>,
    w: Option<f32>,
    h: Option<f32>,
    z_index: Option<i32>,
}

impl From<ImageItemRepr> for ImageItem {
    fn from(repr: ImageItemRepr) -> Self {
        let kind = repr.placement.unwrap_or(if repr.layout.is_absolute() {
            PlacementKind::Absolute
        } else {
            PlacementKind::Grid
        });

        let mut item = ImageItem {
            id: repr.id,
            src: repr.src,
            alt: repr.alt,
            caption: repr.caption,
            width: repr.width,
            height: repr.height,
            aspect_ratio: repr.aspect_ratio,
            layout: repr.layout,
            size: repr.size,
            radius: repr.radius,
            shadow: repr.shadow,
            fit: repr.fit,
            h_align: repr.h_align,
            v_align: repr.v_align,
            placement: Placement::default(),
        };
        item.placement = match kind {
            PlacementKind::Grid => Placement::Grid(GridPlacement {
                col_span: repr.col_span.unwrap_or(1),
                row_span: repr.row_span.unwrap_or(1),
            }),
            PlacementKind::Absolute => {
                let (seed_w, seed_h) = item.seed_canvas_size();
                Placement::Absolute(AbsolutePlacement {
                    x: repr.x.unwrap_or(0.0),
                    y: repr.y.unwrap_or(0.0),
                    w: repr.w.unwrap_or(seed_w),
                    h: repr.h.unwrap_or(seed_h),
                    z_index: repr.z_index.unwrap_or(0),
                })
            }
        };
        item
    }
}

impl<'de> Deserialize<'de> for ImageItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ImageItemRepr::deserialize(deserializer).map(Self::from)
    }
}

impl ImageItem {
    /// Creates an item with default style for a freshly decoded image.
    pub fn new(id: ImageId, src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            src: src.into(),
            alt: String::new(),
            caption: String::new(),
            width,
            height,
            aspect_ratio: aspect_ratio(width, height),
            layout: ImageLayout::Default,
            size: ImageSize::default(),
            radius: RadiusClass::Md,
            shadow: ShadowClass::Md,
            fit: FitMode::Cover,
            h_align: HAlign::default(),
            v_align: VAlign::default(),
            placement: Placement::default(),
        }
    }

    pub fn intrinsic_size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    pub fn grid_spans(&self) -> Option<(u32, u32)> {
        self.placement.as_grid().map(|g| (g.col_span, g.row_span))
    }

    /// Switches the placement style, keeping placement and layout in step.
    ///
    /// Moving into `Absolute` seeds canvas geometry from the intrinsic size;
    /// moving out of it resets to a 1x1 grid placement.
    pub fn set_layout(&mut self, layout: ImageLayout, next_z_index: i32) {
        match (layout.is_absolute(), &self.placement) {
            (true, Placement::Grid(_)) => {
                let (w, h) = self.seed_canvas_size();
                self.placement = Placement::Absolute(AbsolutePlacement {
                    x: 0.0,
                    y: 0.0,
                    w,
                    h,
                    z_index: next_z_index,
                });
            }
            (false, Placement::Absolute(_)) => {
                self.placement = Placement::Grid(GridPlacement::default());
            }
            _ => {}
        }
        self.layout = layout;
    }

    fn seed_canvas_size(&self) -> (f32, f32) {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        let scale = (ABSOLUTE_SEED_BOX / w).min(ABSOLUTE_SEED_BOX / h).min(1.0);
        (w * scale, h * scale)
    }

    /// Brings `layout` back in line with `placement` after deserialization.
    pub(crate) fn normalize(&mut self) {
        match self.placement {
            Placement::Absolute(_) => self.layout = ImageLayout::Absolute,
            Placement::Grid(_) if self.layout.is_absolute() => {
                self.layout = ImageLayout::Default;
            }
            Placement::Grid(_) => {}
        }
        if self.aspect_ratio <= 0.0 || !self.aspect_ratio.is_finite() {
            self.aspect_ratio = aspect_ratio(self.width, self.height);
        }
    }
}

pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// A partial update merged into an item by `ImageStore::update_image`.
///
/// `layout` is applied first; span and canvas fields are then applied only
/// when they match the resulting placement variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageItemPatch {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub layout: Option<ImageLayout>,
    pub size: Option<ImageSize>,
    pub radius: Option<RadiusClass>,
    pub shadow: Option<ShadowClass>,
    pub fit: Option<FitMode>,
    pub h_align: Option<HAlign>,
    pub v_align: Option<VAlign>,
    pub col_span: Option<u32>,
    pub row_span: Option<u32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub w: Option<f32>,
    pub h: Option<f32>,
    pub z_index: Option<i32>,
}

impl ImageItemPatch {
    pub fn spans(col_span: u32, row_span: u32) -> Self {
        Self {
            col_span: Some(col_span),
            row_span: Some(row_span),
            ..Default::default()
        }
    }

    pub fn canvas_size(w: f32, h: f32) -> Self {
        Self {
            w: Some(w),
            h: Some(h),
            ..Default::default()
        }
    }

    pub fn canvas_position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn layout(layout: ImageLayout) -> Self {
        Self {
            layout: Some(layout),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
