use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;
use xxhash_rust::xxh3::xxh3_64;

use crate::layout::{LayoutKind, LayoutTree, RenderContext};
use crate::models::{ImageItem, Placement};

/// Default number of cached layout trees.
pub const DEFAULT_CACHE_ENTRIES: usize = 8;

/// LRU cache of computed layout trees.
///
/// Keys are an xxh3 hash over everything a strategy reads: the view, the
/// container size, the grid settings, every item's geometry and style in
/// sequence order, and the aspect-lock set. Any mutation therefore misses
/// naturally; there is no explicit invalidation on edit.
pub struct LayoutCache {
    cache: Mutex<LruCache<u64, LayoutTree>>,
}

impl LayoutCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes the cache key for one render request.
    pub fn compute_key(kind: LayoutKind, items: &[ImageItem], ctx: &RenderContext<'_>) -> u64 {
        let mut input = Vec::with_capacity(32 + items.len() * 64);

        input.push(kind as u8);
        input.extend_from_slice(&ctx.container.width.to_le_bytes());
        input.extend_from_slice(&ctx.container.height.to_le_bytes());
        input.extend_from_slice(&ctx.grid.columns.to_le_bytes());
        input.extend_from_slice(&ctx.grid.row_height.to_le_bytes());
        input.extend_from_slice(&ctx.grid.gap.to_le_bytes());

        for item in items {
            input.extend_from_slice(&item.id.0.to_le_bytes());
            input.extend_from_slice(&item.width.to_le_bytes());
            input.extend_from_slice(&item.height.to_le_bytes());
            input.extend_from_slice(&item.aspect_ratio.to_le_bytes());
            input.push(item.layout as u8);
            input.push(item.radius as u8);
            input.push(item.shadow as u8);
            input.push(item.fit as u8);
            input.push(item.h_align as u8);
            input.push(item.v_align as u8);
            input.push(ctx.aspect_locked.contains(&item.id) as u8);
            match &item.placement {
                Placement::Grid(g) => {
                    input.push(0);
                    input.extend_from_slice(&g.col_span.to_le_bytes());
                    input.extend_from_slice(&g.row_span.to_le_bytes());
                }
                Placement::Absolute(a) => {
                    input.push(1);
                    for v in [a.x, a.y, a.w, a.h] {
                        input.extend_from_slice(&v.to_le_bytes());
                    }
                    input.extend_from_slice(&a.z_index.to_le_bytes());
                }
            }
        }

        xxh3_64(&input)
    }

    pub fn get(&self, key: u64) -> Option<LayoutTree> {
        self.cache.lock().get(&key).cloned()
    }

    pub fn set(&self, key: u64, tree: LayoutTree) {
        self.cache.lock().put(key, tree);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}

/// Layout computation with automatic caching.
#[derive(Default)]
pub struct CachedRenderer {
    pub cache: LayoutCache,
}

impl CachedRenderer {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LayoutCache::new(capacity),
        }
    }

    /// Renders through the cache; O(n) hashing on a hit, full layout on a miss.
    pub fn render(
        &self,
        kind: LayoutKind,
        items: &[ImageItem],
        ctx: &RenderContext<'_>,
    ) -> LayoutTree {
        let key = LayoutCache::compute_key(kind, items, ctx);
        if let Some(tree) = self.cache.get(key) {
            trace!(%kind, key, "Layout cache hit");
            return tree;
        }

        let tree = kind.arrange(items, ctx);
        self.cache.set(key, tree.clone());
        tree
    }

    pub fn invalidate(&self) {
        self.cache.clear();
    }
}
