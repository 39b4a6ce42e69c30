//! Directory discovery of image files.
//!
//! Files are matched by extension only; content sniffing happens later in
//! the decode queue, which rejects anything that is not really an image.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::image_loader::{mime_for_extension, ImageFile};

/// Configuration for the file scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to scan directories recursively.
    pub recursive: bool,
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: 0, // unlimited
            follow_symlinks: false,
        }
    }
}

pub fn is_image_extension(ext: &str) -> bool {
    mime_for_extension(ext).is_some_and(|mime| mime.starts_with("image/"))
}

#[derive(Debug, Clone, Default)]
pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Discovers image files under `dir` on the blocking pool.
    pub async fn scan(&self, dir: &Path) -> Result<Vec<ImageFile>> {
        let dir = dir.to_path_buf();
        let config = self.config.clone();

        info!("Scanning {:?} for images", dir);
        let paths = task::spawn_blocking(move || Self::discover_files(&dir, &config))
            .await
            .context("Scan task panicked")??;

        info!("Found {} image files", paths.len());
        Ok(paths.into_iter().map(ImageFile::from_path).collect())
    }

    /// Lists image files under `dir`, sorted by path.
    pub fn discover_files(dir: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {:?}", dir);
        }

        let mut walker = WalkDir::new(dir).follow_links(config.follow_symlinks);

        if !config.recursive {
            walker = walker.max_depth(1);
        } else if config.max_depth > 0 {
            walker = walker.max_depth(config.max_depth);
        }

        let mut paths = Vec::new();

        for entry in walker.into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !is_image_extension(ext) {
                continue;
            }
            paths.push(path.to_path_buf());
        }

        // Sort by path for consistent ordering
        paths.sort();
        debug!(count = paths.len(), "Discovered image files");

        Ok(paths)
    }
}
