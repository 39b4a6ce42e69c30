//! Pointer-driven gestures over the item store.
//!
//! - `DragReorderController` - incremental reorder with the midpoint rule
//! - `ResizeController` - span or pixel resize with live preview
//! - `MoveController` - canvas repositioning of absolute items
//! - `PointerBus` - scoped pointer captures for the gestures above

pub mod capture;
pub mod drag;
pub mod resize;

pub use capture::{PointerBus, PointerCapture};
pub use drag::{DragReorderController, DragState, HoverOutcome};
pub use resize::{MoveController, ResizeController, ResizeMode, ResizeUpdate, MIN_CANVAS_SIZE};
