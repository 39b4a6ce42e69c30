pub mod gallery_config;
pub mod grid_config;
pub mod image_item;
pub mod item_store;

pub use gallery_config::*;
pub use grid_config::*;
pub use image_item::*;
pub use item_store::*;
