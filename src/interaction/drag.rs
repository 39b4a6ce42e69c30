//! Drag-to-reorder with a midpoint-crossing rule.
//!
//! The sequence is reordered incrementally while hovering, so a drop only
//! ends the gesture. Cancelling keeps whatever order the last committed
//! hover produced; there is no rollback.
//!
//! # Midpoint rule
//!
//! When the dragged item sits next to the hovered one, swapping as soon as
//! the pointer enters the target would swap straight back on the next
//! event. A hover therefore commits only once the pointer has crossed the
//! target's vertical midpoint in the direction of travel.

use tracing::{debug, trace};

use crate::geometry::Rect;
use crate::models::{ImageId, ImageStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Current logical index of the dragged item; follows each commit.
        source_index: usize,
        item_id: ImageId,
    },
}

/// What a hover event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverOutcome {
    NotDragging,
    /// Hovering the dragged item's own slot.
    SameIndex,
    /// The pointer has not crossed the target's midpoint yet.
    Waiting,
    /// The hovered index does not exist.
    OutOfRange,
    Reordered { from: usize, to: usize },
}

#[derive(Debug, Default)]
pub struct DragReorderController {
    state: DragState,
}

impl DragReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged_item(&self) -> Option<ImageId> {
        match self.state {
            DragState::Dragging { item_id, .. } => Some(item_id),
            DragState::Idle => None,
        }
    }

    /// Starts dragging the item at `index`. Returns false for a bad index.
    pub fn begin(&mut self, store: &ImageStore, index: usize) -> bool {
        let Some(item) = store.items().get(index) else {
            return false;
        };
        self.state = DragState::Dragging {
            source_index: index,
            item_id: item.id,
        };
        debug!(index, id = %item.id, "Drag started");
        true
    }

    /// Handles the pointer hovering the tile at `hover_index`.
    ///
    /// `target` is the hovered tile's box and `pointer_y` the pointer's
    /// vertical position, both in client coordinates. The dragged item's
    /// index is looked up again first, so removals or reorders made while
    /// dragging never move a different item. A drag whose item is gone
    /// ends here.
    pub fn hover(
        &mut self,
        store: &mut ImageStore,
        hover_index: usize,
        target: Rect,
        pointer_y: f32,
    ) -> HoverOutcome {
        let DragState::Dragging { item_id, .. } = self.state else {
            return HoverOutcome::NotDragging;
        };
        let Some(source_index) = store.position(item_id) else {
            debug!(id = %item_id, "Dragged item removed, ending drag");
            self.state = DragState::Idle;
            return HoverOutcome::NotDragging;
        };
        self.state = DragState::Dragging {
            source_index,
            item_id,
        };

        if source_index == hover_index {
            return HoverOutcome::SameIndex;
        }
        if hover_index >= store.len() {
            return HoverOutcome::OutOfRange;
        }

        let midpoint = target.mid_y();
        let moving_down = source_index < hover_index;
        if moving_down && pointer_y < midpoint {
            trace!(source_index, hover_index, pointer_y, midpoint, "Waiting for midpoint");
            return HoverOutcome::Waiting;
        }
        if !moving_down && pointer_y > midpoint {
            trace!(source_index, hover_index, pointer_y, midpoint, "Waiting for midpoint");
            return HoverOutcome::Waiting;
        }

        if !store.reorder(source_index, hover_index) {
            return HoverOutcome::OutOfRange;
        }
        self.state = DragState::Dragging {
            source_index: hover_index,
            item_id,
        };
        debug!(from = source_index, to = hover_index, "Drag reorder committed");
        HoverOutcome::Reordered {
            from: source_index,
            to: hover_index,
        }
    }

    /// Pointer released: the order is already final.
    pub fn drop_item(&mut self) -> Option<ImageId> {
        let dragged = self.dragged_item();
        self.state = DragState::Idle;
        if let Some(id) = dragged {
            debug!(%id, "Drag dropped");
        }
        dragged
    }

    /// Drag aborted: same as a drop, earlier commits stay.
    pub fn cancel(&mut self) -> Option<ImageId> {
        let dragged = self.dragged_item();
        self.state = DragState::Idle;
        if let Some(id) = dragged {
            debug!(%id, "Drag cancelled");
        }
        dragged
    }
}
