//! `GalleryEditor`: the single entry point a host drives.
//!
//! The editor owns the item store, the grid settings, the active view, the
//! gesture controllers and the decode queue. Every mutation happens
//! synchronously on the caller's thread; only decoding runs elsewhere, and
//! its results are appended when the host calls [`GalleryEditor::pump`] or
//! [`GalleryEditor::settle`].

use std::collections::HashSet;

use tracing::{debug, error, info};

use crate::geometry::{Point, Rect, Size};
use crate::image_loader::ImageFile;
use crate::interaction::{
    DragReorderController, HoverOutcome, MoveController, PointerBus, ResizeController,
    ResizeUpdate,
};
use crate::layout::layout_cache::DEFAULT_CACHE_ENTRIES;
use crate::layout::{CachedRenderer, LayoutKind, LayoutTree, RenderContext};
use crate::models::{
    GalleryConfig, GridConfig, ImageId, ImageItem, ImageItemPatch, ImageLayout, ImageSize,
    ImageStore, SelectCallback, MAX_ROW_SPAN,
};
use crate::panel::{ConfigPanel, SelectedStyle, StyleEdit};
use crate::persistence::{SaveStatus, SaveTarget};
use crate::uploads::{AddOrder, DecodeOutcome, DecodeQueue};

/// Fired with the saved configuration after a successful save.
pub type ConfigCallback = Box<dyn Fn(&GalleryConfig)>;

/// Fired with the images a host loads into the editor.
pub type LoadCallback = Box<dyn Fn(&[ImageItem])>;

/// Editor behaviour that is not part of the persisted configuration.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// How concurrently decoded files are appended.
    pub add_order: AddOrder,
    /// View shown when the editor starts.
    pub view: LayoutKind,
    /// Number of layout trees kept by the render cache.
    pub cache_capacity: usize,
    pub max_row_span: u32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            add_order: AddOrder::Completion,
            view: LayoutKind::Grid,
            cache_capacity: DEFAULT_CACHE_ENTRIES,
            max_row_span: MAX_ROW_SPAN,
        }
    }
}

pub struct GalleryEditor {
    store: ImageStore,
    grid: GridConfig,
    view: LayoutKind,
    default_layout: Option<ImageLayout>,
    default_size: Option<ImageSize>,
    class_name: Option<String>,
    bus: PointerBus,
    drag: DragReorderController,
    resize: ResizeController,
    mover: MoveController,
    panel: ConfigPanel,
    uploads: DecodeQueue,
    renderer: CachedRenderer,
    aspect_locked: HashSet<ImageId>,
    on_update_config: Option<ConfigCallback>,
    on_load: Option<LoadCallback>,
}

impl std::fmt::Debug for GalleryEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryEditor")
            .field("store", &self.store)
            .field("grid", &self.grid)
            .field("view", &self.view)
            .field("pending_decodes", &self.uploads.in_flight())
            .finish_non_exhaustive()
    }
}

impl Default for GalleryEditor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl GalleryEditor {
    pub fn new(options: EditorOptions) -> Self {
        Self::from_config(GalleryConfig::default(), options)
    }

    /// Seeds the editor from a (possibly partial) configuration.
    pub fn from_config(mut seed: GalleryConfig, options: EditorOptions) -> Self {
        seed.normalize();
        let bus = PointerBus::new();
        let mut store = ImageStore::with_items(&seed.grid, seed.images);
        store.set_max_row_span(options.max_row_span);
        debug!(
            images = store.len(),
            columns = seed.grid.columns,
            view = %options.view,
            "Editor created"
        );

        Self {
            store,
            grid: seed.grid,
            view: options.view,
            default_layout: seed.layout,
            default_size: seed.size,
            class_name: seed.class_name,
            drag: DragReorderController::new(),
            resize: ResizeController::new(bus.clone()),
            mover: MoveController::new(bus.clone()),
            bus,
            panel: ConfigPanel::new(),
            uploads: DecodeQueue::new(options.add_order),
            renderer: CachedRenderer::new(options.cache_capacity),
            aspect_locked: HashSet::new(),
            on_update_config: None,
            on_load: None,
        }
    }

    pub fn on_select_image(&mut self, callback: SelectCallback) {
        self.store.on_select(callback);
    }

    pub fn on_update_config(&mut self, callback: ConfigCallback) {
        self.on_update_config = Some(callback);
    }

    pub fn on_load(&mut self, callback: LoadCallback) {
        self.on_load = Some(callback);
    }

    /// Replaces the gallery with `config` and fires the load callback.
    ///
    /// Host-driven only: adding files never fires it. Gestures in progress
    /// are abandoned.
    pub fn load(&mut self, mut config: GalleryConfig) {
        config.normalize();
        self.cancel_gestures();
        self.aspect_locked.clear();

        self.store.reset(&config.grid, config.images);
        self.grid = config.grid;
        self.default_layout = config.layout;
        self.default_size = config.size;
        self.class_name = config.class_name;
        info!(images = self.store.len(), "Gallery loaded");

        if let Some(callback) = &self.on_load {
            callback(self.store.items());
        }
    }

    pub fn items(&self) -> &[ImageItem] {
        self.store.items()
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn grid(&self) -> GridConfig {
        self.grid
    }

    pub fn view(&self) -> LayoutKind {
        self.view
    }

    pub fn set_view(&mut self, view: LayoutKind) {
        if self.view != view {
            debug!(from = %self.view, to = %view, "View changed");
            self.view = view;
        }
    }

    pub fn bus(&self) -> &PointerBus {
        &self.bus
    }

    pub fn panel(&self) -> &ConfigPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ConfigPanel {
        &mut self.panel
    }

    // ---------------------------------------------------------------------
    // Adding files
    // ---------------------------------------------------------------------

    /// Queues one file for decoding. The item appears once the decode has
    /// finished and [`pump`](Self::pump) or [`settle`](Self::settle) runs.
    pub fn add_file(&mut self, file: ImageFile) -> u64 {
        self.uploads.submit(file)
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = ImageFile>) -> Vec<u64> {
        files.into_iter().map(|f| self.add_file(f)).collect()
    }

    pub fn pending_decodes(&self) -> usize {
        self.uploads.in_flight() + self.uploads.held()
    }

    /// Appends whatever has finished decoding. Returns the new ids.
    pub fn pump(&mut self) -> Vec<ImageId> {
        let outcomes = self.uploads.poll();
        self.apply_decoded(outcomes)
    }

    /// Waits for every queued decode and appends the results.
    pub async fn settle(&mut self) -> Vec<ImageId> {
        let outcomes = self.uploads.settle().await;
        self.apply_decoded(outcomes)
    }

    /// Appends decoded images, styled with the gallery's default layout and
    /// size when the configuration names them.
    fn apply_decoded(&mut self, outcomes: Vec<DecodeOutcome>) -> Vec<ImageId> {
        let defaults = ImageItemPatch {
            layout: self.default_layout,
            size: self.default_size,
            ..Default::default()
        };
        outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                DecodeOutcome::Decoded { image, .. } => {
                    let id = self.store.append(image.src, image.width, image.height);
                    if !defaults.is_empty() {
                        self.store.update_image(id, &defaults);
                    }
                    Some(id)
                }
                // Already logged by the queue; nothing is shown to the user.
                DecodeOutcome::Rejected { .. } => None,
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Store operations
    // ---------------------------------------------------------------------

    /// Removes an item, ending any gesture that was holding it.
    pub fn remove(&mut self, id: ImageId) -> bool {
        if self.drag.dragged_item() == Some(id) {
            self.drag.cancel();
        }
        if self.resize.active_item() == Some(id) {
            self.resize.end();
        }
        if self.mover.active_item() == Some(id) {
            self.mover.end();
        }
        self.aspect_locked.remove(&id);
        self.store.remove_image(id).is_some()
    }

    pub fn update(&mut self, id: ImageId, patch: &ImageItemPatch) -> bool {
        self.store.update_image(id, patch)
    }

    pub fn select(&mut self, id: Option<ImageId>) {
        self.store.select_image(id);
    }

    pub fn selected(&self) -> Option<&ImageItem> {
        self.store.selected()
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        self.store.reorder(from, to)
    }

    pub fn bring_to_front(&mut self, id: ImageId) -> bool {
        self.store.bring_to_front(id)
    }

    /// Advances the item's layout to the next value, wrapping at the end.
    pub fn cycle_layout(&mut self, id: ImageId) -> Option<ImageLayout> {
        let next = self.store.get(id)?.layout.next();
        self.store
            .update_image(id, &ImageItemPatch::layout(next))
            .then_some(next)
    }

    /// Flips the display-only aspect lock. Returns the new state.
    pub fn toggle_aspect_lock(&mut self, id: ImageId) -> bool {
        if self.store.get(id).is_none() {
            return false;
        }
        let locked = if self.aspect_locked.remove(&id) {
            false
        } else {
            self.aspect_locked.insert(id);
            true
        };
        debug!(%id, locked, "Aspect lock toggled");
        locked
    }

    pub fn is_aspect_locked(&self, id: ImageId) -> bool {
        self.aspect_locked.contains(&id)
    }

    // ---------------------------------------------------------------------
    // Configuration panel
    // ---------------------------------------------------------------------

    pub fn set_columns(&mut self, columns: u32) {
        self.panel.set_columns(&mut self.grid, &mut self.store, columns);
    }

    pub fn set_row_height(&mut self, row_height: f32) {
        self.panel.set_row_height(&mut self.grid, row_height);
    }

    pub fn set_gap(&mut self, gap: f32) {
        self.panel.set_gap(&mut self.grid, gap);
    }

    pub fn selected_style(&self) -> Option<SelectedStyle> {
        self.panel.selected_style(&self.store)
    }

    pub fn edit_selected(&mut self, edit: StyleEdit) -> bool {
        self.panel.edit_selected(&mut self.store, edit)
    }

    // ---------------------------------------------------------------------
    // Gestures
    // ---------------------------------------------------------------------

    /// Whether `id` is held by a resize or move gesture.
    fn is_sized_or_moved(&self, id: ImageId) -> bool {
        self.resize.active_item() == Some(id) || self.mover.active_item() == Some(id)
    }

    pub fn begin_drag(&mut self, index: usize) -> bool {
        let Some(id) = self.store.items().get(index).map(|i| i.id) else {
            return false;
        };
        if self.is_sized_or_moved(id) {
            debug!(%id, "Drag refused, item is being resized");
            return false;
        }
        self.drag.begin(&self.store, index)
    }

    pub fn drag_hover(&mut self, hover_index: usize, target: Rect, pointer_y: f32) -> HoverOutcome {
        self.drag
            .hover(&mut self.store, hover_index, target, pointer_y)
    }

    pub fn end_drag(&mut self) -> Option<ImageId> {
        self.drag.drop_item()
    }

    pub fn cancel_drag(&mut self) -> Option<ImageId> {
        self.drag.cancel()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn begin_resize(&mut self, id: ImageId, pointer: Point) -> bool {
        if self.drag.dragged_item() == Some(id) || self.mover.active_item() == Some(id) {
            debug!(%id, "Resize refused, item is being dragged");
            return false;
        }
        self.resize.begin(&self.store, id, pointer)
    }

    /// Live resize step. `container_width` is the current measured width.
    pub fn resize_to(&mut self, container_width: f32, pointer: Point) -> Option<ResizeUpdate> {
        self.resize
            .pointer_move(&mut self.store, &self.grid, container_width, pointer)
    }

    pub fn end_resize(&mut self) -> Option<ImageId> {
        self.resize.end()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    pub fn begin_move(&mut self, id: ImageId, pointer: Point) -> bool {
        if self.drag.dragged_item() == Some(id) || self.resize.active_item() == Some(id) {
            return false;
        }
        self.mover.begin(&mut self.store, id, pointer)
    }

    pub fn move_to(&mut self, pointer: Point) -> Option<Point> {
        self.mover.pointer_move(&mut self.store, pointer)
    }

    pub fn end_move(&mut self) -> Option<ImageId> {
        self.mover.end()
    }

    fn cancel_gestures(&mut self) {
        self.drag.cancel();
        self.resize.end();
        self.mover.end();
    }

    // ---------------------------------------------------------------------
    // Rendering and persistence
    // ---------------------------------------------------------------------

    /// Lays out the current items in the active view.
    pub fn render(&self, container: Size) -> LayoutTree {
        self.render_as(self.view, container)
    }

    pub fn render_as(&self, view: LayoutKind, container: Size) -> LayoutTree {
        let ctx = RenderContext::new(container, self.grid, &self.aspect_locked);
        self.renderer.render(view, self.store.items(), &ctx)
    }

    /// Snapshot of everything that is persisted.
    pub fn config(&self) -> GalleryConfig {
        GalleryConfig {
            grid: self.grid,
            images: self.store.items().to_vec(),
            layout: self.default_layout,
            size: self.default_size,
            class_name: self.class_name.clone(),
        }
    }

    /// Hands the current configuration to `target`.
    ///
    /// A failure is logged and reported as [`SaveStatus::Failed`]; the
    /// editor's state is left exactly as it was.
    pub async fn save<T: SaveTarget>(&self, target: &T) -> SaveStatus {
        let config = self.config();
        match target.save(&config).await {
            Ok(()) => {
                info!(images = config.images.len(), "Gallery saved");
                if let Some(callback) = &self.on_update_config {
                    callback(&config);
                }
                SaveStatus::Saved
            }
            Err(e) => {
                error!("Failed to save gallery: {:#}", e);
                SaveStatus::Failed
            }
        }
    }
}
