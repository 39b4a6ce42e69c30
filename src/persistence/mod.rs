//! The save boundary and the collaborators that sit behind it.
//!
//! The editor only knows `SaveTarget`. Where a gallery ends up (a SQLite
//! row, a JSON file, a host callback) is the collaborator's business.

pub mod json;
pub mod sqlite;

use std::future::Future;

use crate::models::GalleryConfig;

pub use json::JsonFileStore;
pub use sqlite::{GallerySlot, GallerySummary, SqliteGalleryStore};

/// Durable storage for a full gallery configuration.
///
/// Implementations may fail; the editor catches the error, logs it and
/// keeps its in-memory state.
pub trait SaveTarget {
    fn save(&self, config: &GalleryConfig) -> impl Future<Output = anyhow::Result<()>>;
}

/// Adapts an async closure into a `SaveTarget`.
pub struct SaveFn<F>(pub F);

impl<F, Fut> SaveTarget for SaveFn<F>
where
    F: Fn(GalleryConfig) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    fn save(&self, config: &GalleryConfig) -> impl Future<Output = anyhow::Result<()>> {
        (self.0)(config.clone())
    }
}

/// Outcome of an explicit save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Failed,
}

impl SaveStatus {
    pub fn is_saved(self) -> bool {
        self == Self::Saved
    }
}
