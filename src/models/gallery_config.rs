use serde::{Deserialize, Serialize};

use crate::error::GalleryError;
use crate::models::{GridConfig, ImageItem, ImageLayout, ImageSize};

/// The unit of persistence: grid settings plus the ordered image list.
///
/// Every field defaults, so a partial document can seed an editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryConfig {
    pub grid: GridConfig,
    pub images: Vec<ImageItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<ImageLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl GalleryConfig {
    pub fn to_json(&self) -> Result<String, GalleryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GalleryError> {
        let mut config: GalleryConfig = serde_json::from_str(json)?;
        config.normalize();
        Ok(config)
    }

    /// Clamps the grid and repairs item layouts that disagree with their
    /// placement. Applied to anything that arrives from outside the engine.
    pub fn normalize(&mut self) {
        self.grid = self.grid.clamped();
        for item in &mut self.images {
            item.normalize();
        }
    }
}
