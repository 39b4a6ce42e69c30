use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::GalleryConfig;
use crate::persistence::SaveTarget;

/// Writes the configuration as pretty JSON to a single file.
///
/// Saves go through a sibling temp file and a rename, so a failed write
/// leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, config: &GalleryConfig) -> Result<()> {
        let json = config.to_json().context("Failed to serialize gallery")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {:?}", tmp))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {:?}", self.path))?;

        debug!(path = ?self.path, images = config.images.len(), "Wrote gallery JSON");
        Ok(())
    }

    /// Reads the stored configuration, `None` when the file does not exist.
    pub async fn load(&self) -> Result<Option<GalleryConfig>> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {:?}", self.path));
            }
        };
        let config = GalleryConfig::from_json(&json)
            .with_context(|| format!("Invalid gallery JSON in {:?}", self.path))?;
        Ok(Some(config))
    }
}

impl SaveTarget for JsonFileStore {
    fn save(&self, config: &GalleryConfig) -> impl Future<Output = Result<()>> {
        self.write(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GridConfig, ImageId, ImageItem};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("out").join("gallery.json"));

        let config = GalleryConfig {
            grid: GridConfig::new(2, 300.0, 4.0),
            images: vec![ImageItem::new(ImageId(7), "a.png", 10, 20)],
            class_name: Some("hero".into()),
            ..Default::default()
        };
        store.save(&config).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(config));
        assert!(!dir.path().join("out").join("gallery.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_document_is_seedable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"grid":{"columns":40}}"#).unwrap();

        let config = JsonFileStore::new(&path).load().await.unwrap().unwrap();
        assert_eq!(config.grid.columns, 12);
        assert!(config.images.is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_target_fails() {
        let dir = tempdir().unwrap();
        // A directory where the file should be.
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let result = JsonFileStore::new(&path).save(&GalleryConfig::default()).await;
        assert!(result.is_err());
    }
}
