//! Grid-wide settings and per-image style editing.
//!
//! The panel owns no copy of the gallery. Grid edits write straight into
//! the editor's `GridConfig`, and style edits go through
//! `ImageStore::update_image` on the selected id. Opening and closing the
//! panel never saves.

use tracing::debug;

use crate::models::{
    FitMode, GridConfig, HAlign, ImageId, ImageItemPatch, ImageLayout, ImageSize, ImageStore,
    RadiusClass, ShadowClass, VAlign,
};

/// One field edit applied to the selected image.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleEdit {
    Alt(String),
    Caption(String),
    Radius(RadiusClass),
    Shadow(ShadowClass),
    ColSpan(u32),
    RowSpan(u32),
    Layout(ImageLayout),
    Fit(FitMode),
    HAlign(HAlign),
    VAlign(VAlign),
    Size(ImageSize),
}

impl StyleEdit {
    pub fn to_patch(&self) -> ImageItemPatch {
        let mut patch = ImageItemPatch::default();
        match self {
            Self::Alt(alt) => patch.alt = Some(alt.clone()),
            Self::Caption(caption) => patch.caption = Some(caption.clone()),
            Self::Radius(radius) => patch.radius = Some(*radius),
            Self::Shadow(shadow) => patch.shadow = Some(*shadow),
            Self::ColSpan(span) => patch.col_span = Some(*span),
            Self::RowSpan(span) => patch.row_span = Some(*span),
            Self::Layout(layout) => patch.layout = Some(*layout),
            Self::Fit(fit) => patch.fit = Some(*fit),
            Self::HAlign(align) => patch.h_align = Some(*align),
            Self::VAlign(align) => patch.v_align = Some(*align),
            Self::Size(size) => patch.size = Some(*size),
        }
        patch
    }
}

/// Snapshot of the selected image's editable fields, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedStyle {
    pub id: ImageId,
    pub alt: String,
    pub caption: String,
    pub radius: RadiusClass,
    pub shadow: ShadowClass,
    pub layout: ImageLayout,
    pub fit: FitMode,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub size: ImageSize,
    /// `None` for canvas items, which have no spans.
    pub spans: Option<(u32, u32)>,
}

#[derive(Debug, Default)]
pub struct ConfigPanel {
    open: bool,
}

impl ConfigPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        debug!("Config panel closed");
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Sets the column count and narrows any span that no longer fits.
    pub fn set_columns(&self, grid: &mut GridConfig, store: &mut ImageStore, columns: u32) {
        grid.set_columns(columns);
        store.set_column_limit(grid.columns);
        debug!(columns = grid.columns, "Grid columns changed");
    }

    pub fn set_row_height(&self, grid: &mut GridConfig, row_height: f32) {
        grid.set_row_height(row_height);
        debug!(row_height = grid.row_height, "Grid row height changed");
    }

    pub fn set_gap(&self, grid: &mut GridConfig, gap: f32) {
        grid.set_gap(gap);
        debug!(gap = grid.gap, "Grid gap changed");
    }

    pub fn selected_style(&self, store: &ImageStore) -> Option<SelectedStyle> {
        let item = store.selected()?;
        Some(SelectedStyle {
            id: item.id,
            alt: item.alt.clone(),
            caption: item.caption.clone(),
            radius: item.radius,
            shadow: item.shadow,
            layout: item.layout,
            fit: item.fit,
            h_align: item.h_align,
            v_align: item.v_align,
            size: item.size,
            spans: item.grid_spans(),
        })
    }

    /// Writes `edit` to the selected image. Returns false with nothing
    /// selected.
    pub fn edit_selected(&self, store: &mut ImageStore, edit: StyleEdit) -> bool {
        let Some(id) = store.selected_id() else {
            return false;
        };
        store.update_image(id, &edit.to_patch())
    }
}
