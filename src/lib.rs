//! tilewall: a headless image-gallery layout engine.
//!
//! Images are decoded for their intrinsic size, kept in an ordered store,
//! rearranged by drag and resize gestures, laid out by one of four views
//! and saved as a serde-serializable [`GalleryConfig`].

pub mod editor;
pub mod error;
pub mod geometry;
pub mod image_loader;
pub mod interaction;
pub mod layout;
pub mod models;
pub mod panel;
pub mod persistence;
pub mod scanner;
pub mod uploads;

pub use editor::{EditorOptions, GalleryEditor};
pub use error::GalleryError;
pub use layout::{LayoutKind, LayoutTree, PositionedTile};
pub use models::{GalleryConfig, GridConfig, ImageId, ImageItem, ImageItemPatch, ImageLayout};
pub use persistence::{SaveStatus, SaveTarget};
pub use uploads::AddOrder;
