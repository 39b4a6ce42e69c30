//! Resize and canvas-move gestures.
//!
//! Both controllers snapshot the item's geometry and the pointer position
//! on press, then recompute from the total delta on every move. A move
//! never accumulates rounding from the previous one.

use tracing::{debug, trace};

use crate::geometry::{self, Point};
use crate::interaction::{PointerBus, PointerCapture};
use crate::models::{GridConfig, ImageId, ImageItemPatch, ImageStore, Placement};

/// Smallest canvas width or height a pixel resize can produce.
pub const MIN_CANVAS_SIZE: f32 = 20.0;

/// What a resize gesture changes, with the values captured on press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeMode {
    /// Grid items snap to whole columns and rows.
    Span { start_col: u32, start_row: u32 },
    /// Canvas items resize in pixels.
    Pixels { start_w: f32, start_h: f32 },
}

impl ResizeMode {
    fn for_placement(placement: &Placement) -> Self {
        match placement {
            Placement::Grid(g) => Self::Span {
                start_col: g.col_span,
                start_row: g.row_span,
            },
            Placement::Absolute(a) => Self::Pixels {
                start_w: a.w,
                start_h: a.h,
            },
        }
    }
}

/// The geometry written by one pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeUpdate {
    Spans {
        id: ImageId,
        col_span: u32,
        row_span: u32,
    },
    Pixels {
        id: ImageId,
        w: f32,
        h: f32,
    },
}

#[derive(Debug)]
struct ResizeSession {
    item_id: ImageId,
    origin: Point,
    mode: ResizeMode,
    _capture: PointerCapture,
}

/// Drives the corner-handle resize of one item at a time.
#[derive(Debug)]
pub struct ResizeController {
    bus: PointerBus,
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new(bus: PointerBus) -> Self {
        Self { bus, session: None }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_item(&self) -> Option<ImageId> {
        self.session.as_ref().map(|s| s.item_id)
    }

    pub fn mode(&self) -> Option<ResizeMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Presses the resize handle of `id`. Ignored while another resize is
    /// running or when the item does not exist.
    pub fn begin(&mut self, store: &ImageStore, id: ImageId, pointer: Point) -> bool {
        if self.session.is_some() {
            trace!(%id, "Resize already in progress");
            return false;
        }
        let Some(item) = store.get(id) else {
            return false;
        };
        let mode = ResizeMode::for_placement(&item.placement);
        self.session = Some(ResizeSession {
            item_id: id,
            origin: pointer,
            mode,
            _capture: self.bus.capture("resize"),
        });
        debug!(%id, ?mode, "Resize started");
        true
    }

    /// Applies the pointer's total travel since press to the item.
    ///
    /// Column width is derived from `container_width` on each call, so a
    /// container resize mid-gesture is picked up on the next move.
    pub fn pointer_move(
        &mut self,
        store: &mut ImageStore,
        grid: &GridConfig,
        container_width: f32,
        pointer: Point,
    ) -> Option<ResizeUpdate> {
        let session = self.session.as_ref()?;
        let id = session.item_id;
        let (dx, dy) = pointer.delta_from(session.origin);

        let (update, patch) = match session.mode {
            ResizeMode::Span {
                start_col,
                start_row,
            } => {
                let col_span = geometry::next_col_span(
                    start_col,
                    geometry::delta_columns(dx, container_width, grid),
                    grid,
                );
                let row_span = geometry::next_row_span(
                    start_row,
                    geometry::delta_rows(dy, grid),
                    store.max_row_span(),
                );
                (
                    ResizeUpdate::Spans {
                        id,
                        col_span,
                        row_span,
                    },
                    ImageItemPatch::spans(col_span, row_span),
                )
            }
            ResizeMode::Pixels { start_w, start_h } => {
                let w = (start_w + dx).max(MIN_CANVAS_SIZE);
                let h = (start_h + dy).max(MIN_CANVAS_SIZE);
                (
                    ResizeUpdate::Pixels { id, w, h },
                    ImageItemPatch::canvas_size(w, h),
                )
            }
        };

        if !store.update_image(id, &patch) {
            debug!(%id, "Resized item disappeared, ending gesture");
            self.session = None;
            return None;
        }
        trace!(?update, "Resize move");
        Some(update)
    }

    /// Releases the pointer. The last move's geometry stays.
    pub fn end(&mut self) -> Option<ImageId> {
        let session = self.session.take()?;
        debug!(id = %session.item_id, "Resize ended");
        Some(session.item_id)
    }
}

#[derive(Debug)]
struct MoveSession {
    item_id: ImageId,
    origin: Point,
    start_x: f32,
    start_y: f32,
    _capture: PointerCapture,
}

/// Drags canvas items around the absolute view.
#[derive(Debug)]
pub struct MoveController {
    bus: PointerBus,
    session: Option<MoveSession>,
}

impl MoveController {
    pub fn new(bus: PointerBus) -> Self {
        Self { bus, session: None }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_item(&self) -> Option<ImageId> {
        self.session.as_ref().map(|s| s.item_id)
    }

    /// Grabs a canvas item and raises it to the front. Grid items cannot
    /// be moved this way.
    pub fn begin(&mut self, store: &mut ImageStore, id: ImageId, pointer: Point) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(start) = store.get(id).and_then(|i| i.placement.as_absolute().copied()) else {
            return false;
        };
        store.bring_to_front(id);
        self.session = Some(MoveSession {
            item_id: id,
            origin: pointer,
            start_x: start.x,
            start_y: start.y,
            _capture: self.bus.capture("move"),
        });
        debug!(%id, x = start.x, y = start.y, "Move started");
        true
    }

    /// Moves the item by the pointer's total travel, never past the
    /// canvas' top-left corner.
    pub fn pointer_move(&mut self, store: &mut ImageStore, pointer: Point) -> Option<Point> {
        let session = self.session.as_ref()?;
        let (dx, dy) = pointer.delta_from(session.origin);
        let x = (session.start_x + dx).max(0.0);
        let y = (session.start_y + dy).max(0.0);
        let id = session.item_id;

        if !store.update_image(id, &ImageItemPatch::canvas_position(x, y)) {
            self.session = None;
            return None;
        }
        Some(Point::new(x, y))
    }

    pub fn end(&mut self) -> Option<ImageId> {
        let session = self.session.take()?;
        debug!(id = %session.item_id, "Move ended");
        Some(session.item_id)
    }
}
