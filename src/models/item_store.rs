//! The ordered image sequence and the single selection pointer.
//!
//! `ImageStore` is the only owner of `ImageItem`s. Controllers, the panel
//! and the renderers borrow it and go through its methods for every change.
//! Requests naming an unknown id or index are silent no-ops; the return
//! value says whether anything happened.

use tracing::{debug, trace, warn};

use crate::models::{
    AbsolutePlacement, GridConfig, ImageId, ImageItem, ImageItemPatch, Placement,
};

/// Practical ceiling for `rowSpan`.
pub const MAX_ROW_SPAN: u32 = 20;

/// Callback fired with the newly selected item, or `None` when cleared.
pub type SelectCallback = Box<dyn Fn(Option<&ImageItem>)>;

pub struct ImageStore {
    items: Vec<ImageItem>,
    selected: Option<ImageId>,
    /// `None` once the id space above the highest seeded id is used up.
    next_id: Option<u64>,
    max_col_span: u32,
    max_row_span: u32,
    on_select: Option<SelectCallback>,
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("items", &self.items.len())
            .field("selected", &self.selected)
            .field("next_id", &self.next_id)
            .field("max_col_span", &self.max_col_span)
            .field("max_row_span", &self.max_row_span)
            .field("on_select", &self.on_select.as_ref().map(|_| "<closure>"))
            .finish()
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new(&GridConfig::default())
    }
}

impl ImageStore {
    pub fn new(grid: &GridConfig) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            next_id: Some(1),
            max_col_span: grid.columns,
            max_row_span: MAX_ROW_SPAN,
            on_select: None,
        }
    }

    /// Seeds the store with existing items. Ids are kept; new ids continue
    /// above the highest one seen. Duplicate ids after the first are
    /// re-assigned so lookups by id stay unambiguous.
    pub fn with_items(grid: &GridConfig, items: Vec<ImageItem>) -> Self {
        let mut store = Self::new(grid);
        store.next_id = items
            .iter()
            .map(|i| i.id.0)
            .max()
            .map_or(Some(1), |m| m.checked_add(1));
        for mut item in items {
            if store.position(item.id).is_some() {
                item.id = store.allocate_id();
            }
            store.clamp_item_spans(&mut item);
            store.items.push(item);
        }
        store
    }

    /// Sets the `rowSpan` ceiling and clamps every stored span to it.
    pub fn set_max_row_span(&mut self, max_row_span: u32) {
        self.max_row_span = max_row_span.max(1);
        self.set_column_limit(self.max_col_span);
    }

    /// Replaces the whole sequence. The selection is cleared; the selection
    /// callback and the row ceiling are kept.
    pub fn reset(&mut self, grid: &GridConfig, items: Vec<ImageItem>) {
        let had_selection = self.selected.is_some();
        let on_select = self.on_select.take();
        let max_row_span = self.max_row_span;

        *self = Self::with_items(grid, items);
        self.on_select = on_select;
        self.set_max_row_span(max_row_span);

        if had_selection {
            self.notify_select();
        }
        debug!(items = self.items.len(), "Store reset");
    }

    pub fn on_select(&mut self, callback: SelectCallback) {
        self.on_select = Some(callback);
    }

    pub fn items(&self) -> &[ImageItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn position(&self, id: ImageId) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    pub fn selected_id(&self) -> Option<ImageId> {
        self.selected
    }

    /// Resolves the selection against the live sequence.
    pub fn selected(&self) -> Option<&ImageItem> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Reserves the next id without inserting anything.
    ///
    /// When a seed has pushed the counter to `u64::MAX`, ids come from the
    /// lowest value not held by a live item instead.
    pub fn allocate_id(&mut self) -> ImageId {
        if let Some(next) = self.next_id {
            self.next_id = next.checked_add(1);
            return ImageId(next);
        }
        let mut candidate = 1;
        while self.position(ImageId(candidate)).is_some() {
            candidate += 1;
        }
        warn!(id = candidate, "Id counter exhausted, using lowest free id");
        ImageId(candidate)
    }

    /// Appends a decoded image with default style and returns its id.
    pub fn append(&mut self, src: impl Into<String>, width: u32, height: u32) -> ImageId {
        let id = self.allocate_id();
        let item = ImageItem::new(id, src, width, height);
        debug!(%id, width, height, index = self.items.len(), "Appended image");
        self.items.push(item);
        id
    }

    /// Removes the item; clears the selection when it pointed at it.
    pub fn remove_image(&mut self, id: ImageId) -> Option<ImageItem> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
            self.notify_select();
        }
        debug!(%id, index, "Removed image");
        Some(removed)
    }

    /// Merges `patch` into the item with `id`. The single mutation path for
    /// resize, style edits and layout cycling.
    pub fn update_image(&mut self, id: ImageId, patch: &ImageItemPatch) -> bool {
        let next_z = self.next_z_index();
        let (max_col, max_row) = (self.max_col_span, self.max_row_span);
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            trace!(%id, "update_image: unknown id");
            return false;
        };

        if let Some(layout) = patch.layout {
            item.set_layout(layout, next_z);
        }
        if let Some(src) = &patch.src {
            item.src = src.clone();
        }
        if let Some(alt) = &patch.alt {
            item.alt = alt.clone();
        }
        if let Some(caption) = &patch.caption {
            item.caption = caption.clone();
        }
        if let Some(size) = patch.size {
            item.size = size;
        }
        if let Some(radius) = patch.radius {
            item.radius = radius;
        }
        if let Some(shadow) = patch.shadow {
            item.shadow = shadow;
        }
        if let Some(fit) = patch.fit {
            item.fit = fit;
        }
        if let Some(h_align) = patch.h_align {
            item.h_align = h_align;
        }
        if let Some(v_align) = patch.v_align {
            item.v_align = v_align;
        }

        match &mut item.placement {
            Placement::Grid(grid) => {
                if let Some(col_span) = patch.col_span {
                    grid.col_span = col_span.clamp(1, max_col.max(1));
                }
                if let Some(row_span) = patch.row_span {
                    grid.row_span = row_span.clamp(1, max_row);
                }
            }
            Placement::Absolute(abs) => apply_canvas_patch(abs, patch),
        }

        trace!(%id, ?patch, "Updated image");
        true
    }

    /// Toggles selection: selecting the selected item clears it.
    pub fn select_image(&mut self, id: Option<ImageId>) {
        let next = match id {
            Some(id) if self.selected == Some(id) => None,
            Some(id) if self.position(id).is_some() => Some(id),
            Some(_) => return,
            None => None,
        };
        if next != self.selected {
            self.selected = next;
            debug!(selected = ?self.selected, "Selection changed");
            self.notify_select();
        }
    }

    /// Moves one item from `from` to `to`, shifting the ones between.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len {
            trace!(from, to, len, "reorder: index out of range");
            return false;
        }
        if from == to {
            return true;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        trace!(from, to, "Reordered");
        true
    }

    /// Raises an absolute item above every other canvas item.
    pub fn bring_to_front(&mut self, id: ImageId) -> bool {
        let z = self.next_z_index();
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        match &mut item.placement {
            Placement::Absolute(abs) => {
                abs.z_index = z;
                true
            }
            Placement::Grid(_) => false,
        }
    }

    /// Applies a new column count as the span ceiling and clamps every
    /// stored `colSpan` to it.
    pub fn set_column_limit(&mut self, columns: u32) {
        self.max_col_span = columns.max(1);
        let mut items = std::mem::take(&mut self.items);
        for item in &mut items {
            self.clamp_item_spans(item);
        }
        self.items = items;
    }

    pub fn max_row_span(&self) -> u32 {
        self.max_row_span
    }

    fn clamp_item_spans(&self, item: &mut ImageItem) {
        if let Placement::Grid(grid) = &mut item.placement {
            grid.col_span = grid.col_span.clamp(1, self.max_col_span);
            grid.row_span = grid.row_span.clamp(1, self.max_row_span);
        }
    }

    fn next_z_index(&self) -> i32 {
        self.items
            .iter()
            .filter_map(|i| i.placement.as_absolute())
            .map(|a| a.z_index)
            .max()
            .map_or(1, |z| z.saturating_add(1))
    }

    fn notify_select(&self) {
        if let Some(callback) = &self.on_select {
            callback(self.selected());
        }
    }
}

fn apply_canvas_patch(abs: &mut AbsolutePlacement, patch: &ImageItemPatch) {
    if let Some(x) = patch.x {
        abs.x = x;
    }
    if let Some(y) = patch.y {
        abs.y = y;
    }
    if let Some(w) = patch.w {
        abs.w = w;
    }
    if let Some(h) = patch.h {
        abs.h = h;
    }
    if let Some(z) = patch.z_index {
        abs.z_index = z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FitMode, ImageLayout, RadiusClass};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_with(n: usize) -> ImageStore {
        let mut store = ImageStore::default();
        for i in 0..n {
            store.append(format!("{i}.png"), 400, 300);
        }
        store
    }

    fn ids(store: &ImageStore) -> Vec<u64> {
        store.items().iter().map(|i| i.id.0).collect()
    }

    #[test]
    fn test_append_assigns_unique_ids() {
        let store = store_with(3);
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert!(store
            .items()
            .iter()
            .all(|i| i.grid_spans() == Some((1, 1))));
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let mut store = store_with(2);
        store.remove_image(ImageId(2));
        let id = store.append("new.png", 10, 10);
        assert_eq!(id, ImageId(3));
    }

    #[test]
    fn test_add_then_remove_restores_sequence() {
        let mut store = store_with(3);
        let before = store.items().to_vec();
        let id = store.append("extra.png", 50, 50);
        assert!(store.remove_image(id).is_some());
        assert_eq!(store.items(), before.as_slice());
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut store = store_with(3);
        store.select_image(Some(ImageId(2)));
        assert_eq!(store.selected_id(), Some(ImageId(2)));
        store.remove_image(ImageId(2));
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = store_with(2);
        assert!(store.remove_image(ImageId(99)).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_select_toggles() {
        let mut store = store_with(2);
        store.select_image(Some(ImageId(1)));
        assert_eq!(store.selected_id(), Some(ImageId(1)));
        store.select_image(Some(ImageId(1)));
        assert_eq!(store.selected_id(), None);
        store.select_image(Some(ImageId(2)));
        store.select_image(None);
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_select_unknown_keeps_selection() {
        let mut store = store_with(2);
        store.select_image(Some(ImageId(1)));
        store.select_image(Some(ImageId(42)));
        assert_eq!(store.selected_id(), Some(ImageId(1)));
    }

    #[test]
    fn test_select_callback_fires_on_change() {
        let seen: Rc<RefCell<Vec<Option<u64>>>> = Rc::new(RefCell::new(Vec::new()));
        let mut store = store_with(2);
        let sink = Rc::clone(&seen);
        store.on_select(Box::new(move |item| {
            sink.borrow_mut().push(item.map(|i| i.id.0));
        }));

        store.select_image(Some(ImageId(1)));
        store.select_image(Some(ImageId(1)));
        store.select_image(Some(ImageId(2)));
        store.remove_image(ImageId(2));

        assert_eq!(*seen.borrow(), vec![Some(1), None, Some(2), None]);
    }

    #[test]
    fn test_update_writes_back_to_sequence() {
        let mut store = store_with(2);
        store.select_image(Some(ImageId(2)));
        let patch = ImageItemPatch {
            caption: Some("sunset".into()),
            radius: Some(RadiusClass::Xl),
            fit: Some(FitMode::Contain),
            ..Default::default()
        };
        assert!(store.update_image(ImageId(2), &patch));

        let item = &store.items()[1];
        assert_eq!(item.caption, "sunset");
        assert_eq!(item.radius, RadiusClass::Xl);
        assert_eq!(item.fit, FitMode::Contain);
        assert_eq!(store.selected().unwrap().caption, "sunset");
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut store = store_with(1);
        assert!(!store.update_image(ImageId(5), &ImageItemPatch::spans(2, 2)));
    }

    #[test]
    fn test_update_clamps_spans() {
        let mut store = store_with(1);
        store.update_image(ImageId(1), &ImageItemPatch::spans(9, 0));
        assert_eq!(store.items()[0].grid_spans(), Some((3, 1)));
        store.update_image(ImageId(1), &ImageItemPatch::spans(1, 500));
        assert_eq!(store.items()[0].grid_spans(), Some((1, MAX_ROW_SPAN)));
    }

    #[test]
    fn test_canvas_fields_ignored_for_grid_items() {
        let mut store = store_with(1);
        store.update_image(ImageId(1), &ImageItemPatch::canvas_position(10.0, 10.0));
        assert!(store.items()[0].placement.as_absolute().is_none());
    }

    #[test]
    fn test_layout_switch_then_canvas_patch() {
        let mut store = store_with(2);
        store.update_image(ImageId(1), &ImageItemPatch::layout(ImageLayout::Absolute));
        store.update_image(ImageId(2), &ImageItemPatch::layout(ImageLayout::Absolute));
        store.update_image(ImageId(1), &ImageItemPatch::canvas_position(50.0, 60.0));

        let first = store.items()[0].placement.as_absolute().copied().unwrap();
        let second = store.items()[1].placement.as_absolute().copied().unwrap();
        assert_eq!((first.x, first.y), (50.0, 60.0));
        assert_eq!(first.z_index, 1);
        assert_eq!(second.z_index, 2);

        assert!(store.bring_to_front(ImageId(1)));
        let first = store.items()[0].placement.as_absolute().copied().unwrap();
        assert_eq!(first.z_index, 3);
    }

    #[test]
    fn test_reorder_moves_and_shifts() {
        let mut store = store_with(5);
        assert!(store.reorder(4, 0));
        assert_eq!(ids(&store), vec![5, 1, 2, 3, 4]);
        assert!(store.reorder(0, 2));
        assert_eq!(ids(&store), vec![1, 2, 5, 3, 4]);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let mut store = store_with(3);
        assert!(!store.reorder(0, 3));
        assert!(!store.reorder(7, 0));
        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn test_column_limit_clamps_existing_spans() {
        let mut store = ImageStore::new(&GridConfig::new(6, 220.0, 16.0));
        let id = store.append("a.png", 10, 10);
        store.update_image(id, &ImageItemPatch::spans(5, 1));
        store.set_column_limit(2);
        assert_eq!(store.get(id).unwrap().grid_spans(), Some((2, 1)));
    }

    #[test]
    fn test_reset_keeps_callback_and_clears_selection() {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let mut store = store_with(2);
        let sink = Rc::clone(&fired);
        store.on_select(Box::new(move |item| sink.borrow_mut().push(item.is_some())));
        store.set_max_row_span(4);
        store.select_image(Some(ImageId(1)));

        let mut tall = ImageItem::new(ImageId(5), "t.png", 1, 1);
        tall.placement = Placement::Grid(crate::models::GridPlacement {
            col_span: 1,
            row_span: 10,
        });
        store.reset(&GridConfig::default(), vec![tall]);

        assert_eq!(*fired.borrow(), vec![true, false]);
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.items()[0].grid_spans(), Some((1, 4)));
        assert_eq!(store.append("n.png", 1, 1), ImageId(6));
    }

    #[test]
    fn test_seeded_ids_continue_and_duplicates_are_reassigned() {
        let items = vec![
            ImageItem::new(ImageId(10), "a.png", 1, 1),
            ImageItem::new(ImageId(10), "b.png", 1, 1),
        ];
        let mut store = ImageStore::with_items(&GridConfig::default(), items);
        assert_eq!(ids(&store), vec![10, 11]);
        assert_eq!(store.append("c.png", 1, 1), ImageId(12));
    }

    #[test]
    fn test_seeded_max_id_does_not_overflow() {
        let items = vec![
            ImageItem::new(ImageId(u64::MAX - 1), "a.png", 1, 1),
            ImageItem::new(ImageId(1), "b.png", 1, 1),
        ];
        let mut store = ImageStore::with_items(&GridConfig::default(), items);
        assert_eq!(store.append("c.png", 1, 1), ImageId(u64::MAX));
        assert_eq!(store.append("d.png", 1, 1), ImageId(2));
        assert_eq!(store.append("e.png", 1, 1), ImageId(3));
        assert_eq!(ids(&store), vec![u64::MAX - 1, 1, u64::MAX, 2, 3]);

        let seeded = vec![
            ImageItem::new(ImageId(u64::MAX), "x.png", 1, 1),
            ImageItem::new(ImageId(u64::MAX), "y.png", 1, 1),
        ];
        let store = ImageStore::with_items(&GridConfig::default(), seeded);
        assert_eq!(ids(&store), vec![u64::MAX, 1]);
    }

    proptest! {
        #[test]
        fn reorder_same_index_is_identity(n in 1usize..12, i in 0usize..12) {
            let mut store = store_with(n);
            let before = ids(&store);
            store.reorder(i % n, i % n);
            prop_assert_eq!(ids(&store), before);
        }

        #[test]
        fn adjacent_reorder_round_trips(n in 2usize..12, i in 0usize..11) {
            let i = i % (n - 1);
            let mut store = store_with(n);
            let before = ids(&store);
            store.reorder(i, i + 1);
            store.reorder(i + 1, i);
            prop_assert_eq!(ids(&store), before.clone());
            store.reorder(i + 1, i);
            store.reorder(i, i + 1);
            prop_assert_eq!(ids(&store), before);
        }
    }
}
