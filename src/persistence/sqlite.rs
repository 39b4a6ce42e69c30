//! SQLite store of named gallery configurations.
//!
//! Each gallery is one row holding its configuration as JSON. The database
//! lives at `XDG_CONFIG_HOME/tilewall/galleries.sqlite` unless a path is
//! given.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::models::GalleryConfig;
use crate::persistence::SaveTarget;

pub struct SqliteGalleryStore {
    conn: Connection,
}

/// Listing entry for a stored gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySummary {
    pub name: String,
    pub image_count: usize,
    pub updated_at: i64,
}

impl SqliteGalleryStore {
    /// Opens or creates the database at the default XDG location.
    pub fn open_default() -> Result<Self> {
        let db_path = Self::default_db_path()?;
        Self::open(&db_path)
    }

    /// Returns the default database path based on XDG directories.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "tilewall")
            .context("Failed to determine project directories")?;

        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;

        Ok(config_dir.join("galleries.sqlite"))
    }

    /// Opens or creates the database at `path`.
    ///
    /// Uses WAL journaling with `synchronous = NORMAL`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA foreign_keys = ON;
            ",
        )
        .context("Failed to configure SQLite pragmas")?;

        let store = Self { conn };
        store.create_tables()?;

        info!("Opened gallery store at {:?}", path);
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS galleries (
                name TEXT PRIMARY KEY NOT NULL,
                config_json TEXT NOT NULL,
                image_count INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_galleries_updated ON galleries(updated_at);
            ",
            )
            .context("Failed to create database tables")?;

        debug!("Database tables created/verified");
        Ok(())
    }

    /// Inserts or replaces the gallery stored under `name`.
    pub fn save_gallery(&self, name: &str, config: &GalleryConfig) -> Result<()> {
        let json = config
            .to_json()
            .with_context(|| format!("Failed to serialize gallery '{}'", name))?;

        self.conn
            .execute(
                "
            INSERT INTO galleries (name, config_json, image_count, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(name) DO UPDATE SET
                config_json = excluded.config_json,
                image_count = excluded.image_count,
                updated_at = excluded.updated_at
            ",
                params![name, json, config.images.len() as i64, now_secs()],
            )
            .with_context(|| format!("Failed to save gallery '{}'", name))?;

        debug!(name, images = config.images.len(), "Saved gallery");
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Option<GalleryConfig>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT config_json FROM galleries WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to query gallery '{}'", name))?;

        json.map(|json| {
            GalleryConfig::from_json(&json)
                .with_context(|| format!("Stored gallery '{}' is not valid JSON", name))
        })
        .transpose()
    }

    /// All stored galleries, most recently saved first.
    pub fn list(&self) -> Result<Vec<GallerySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, image_count, updated_at FROM galleries ORDER BY updated_at DESC, name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(GallerySummary {
                name: row.get(0)?,
                image_count: row.get::<_, i64>(1)? as usize,
                updated_at: row.get(2)?,
            })
        })?;

        let galleries = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list galleries")?;
        Ok(galleries)
    }

    /// Removes a gallery. Returns whether it existed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM galleries WHERE name = ?1", params![name])
            .with_context(|| format!("Failed to delete gallery '{}'", name))?;
        Ok(deleted > 0)
    }

    /// A save target writing to the gallery called `name`.
    pub fn slot(&self, name: impl Into<String>) -> GallerySlot<'_> {
        GallerySlot {
            store: self,
            name: name.into(),
        }
    }
}

/// One named gallery inside a `SqliteGalleryStore`.
pub struct GallerySlot<'a> {
    store: &'a SqliteGalleryStore,
    name: String,
}

impl GallerySlot<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SaveTarget for GallerySlot<'_> {
    fn save(&self, config: &GalleryConfig) -> impl Future<Output = Result<()>> {
        std::future::ready(self.store.save_gallery(&self.name, config))
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AbsolutePlacement, GridConfig, ImageId, ImageItem, ImageLayout, Placement,
    };
    use tempfile::tempdir;

    fn sample_config() -> GalleryConfig {
        let mut canvas = ImageItem::new(ImageId(3), "c.png", 640, 480);
        canvas.layout = ImageLayout::Absolute;
        canvas.placement = Placement::Absolute(AbsolutePlacement {
            x: 50.0,
            y: 60.0,
            w: 120.0,
            h: 80.0,
            z_index: 2,
        });
        GalleryConfig {
            grid: GridConfig::new(4, 200.0, 8.0),
            images: vec![
                ImageItem::new(ImageId(1), "a.png", 400, 300),
                ImageItem::new(ImageId(2), "b.png", 300, 400),
                canvas,
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_open_and_create() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("test.sqlite");

        let store = SqliteGalleryStore::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = SqliteGalleryStore::open(&dir.path().join("test.sqlite")).unwrap();

        let config = sample_config();
        store.save_gallery("home", &config).unwrap();
        let loaded = store.load("home").unwrap().unwrap();
        assert_eq!(loaded, config);

        let abs = loaded.images[2].placement.as_absolute().copied().unwrap();
        assert_eq!((abs.x, abs.y, abs.w, abs.h, abs.z_index), (50.0, 60.0, 120.0, 80.0, 2));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = SqliteGalleryStore::open(&dir.path().join("test.sqlite")).unwrap();

        let mut config = sample_config();
        store.save_gallery("home", &config).unwrap();
        config.images.pop();
        store.save_gallery("home", &config).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].image_count, 2);
        assert_eq!(store.load("home").unwrap().unwrap().images.len(), 2);
    }

    #[test]
    fn test_missing_and_delete() {
        let dir = tempdir().unwrap();
        let store = SqliteGalleryStore::open(&dir.path().join("test.sqlite")).unwrap();

        assert!(store.load("nope").unwrap().is_none());
        store.save_gallery("a", &GalleryConfig::default()).unwrap();
        store.save_gallery("b", &GalleryConfig::default()).unwrap();

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_slot_is_a_save_target() {
        let dir = tempdir().unwrap();
        let store = SqliteGalleryStore::open(&dir.path().join("test.sqlite")).unwrap();

        let slot = store.slot("landing");
        assert_eq!(slot.name(), "landing");
        slot.save(&sample_config()).await.unwrap();
        assert_eq!(store.load("landing").unwrap(), Some(sample_config()));
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.sqlite");
        {
            let store = SqliteGalleryStore::open(&db_path).unwrap();
            store.save_gallery("kept", &sample_config()).unwrap();
        }
        let store = SqliteGalleryStore::open(&db_path).unwrap();
        assert!(store.load("kept").unwrap().is_some());
    }
}
