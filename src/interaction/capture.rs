//! Scoped pointer captures.
//!
//! A gesture that must keep receiving pointer moves after the pointer leaves
//! its handle takes a `PointerCapture` from the shared `PointerBus`. The
//! capture is released when the guard drops: on pointer-up, when the owning
//! controller is torn down, or when a new gesture replaces the old one. No
//! code path can leave a capture registered behind a finished gesture.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::trace;

#[derive(Debug, Default)]
struct BusState {
    next_id: u64,
    /// Active capture id -> owner label.
    active: BTreeMap<u64, &'static str>,
}

/// Registry of live pointer captures, shared by all gesture controllers of
/// one gallery.
#[derive(Debug, Clone, Default)]
pub struct PointerBus {
    state: Rc<RefCell<BusState>>,
}

impl PointerBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a capture for `owner`; released when the guard drops.
    pub fn capture(&self, owner: &'static str) -> PointerCapture {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.active.insert(id, owner);
        trace!(id, owner, "Pointer captured");
        PointerCapture {
            state: Rc::clone(&self.state),
            id,
        }
    }

    pub fn active_captures(&self) -> usize {
        self.state.borrow().active.len()
    }

    /// Owner labels of the captures currently held.
    pub fn owners(&self) -> Vec<&'static str> {
        self.state.borrow().active.values().copied().collect()
    }
}

/// Guard for one pointer capture.
#[derive(Debug)]
pub struct PointerCapture {
    state: Rc<RefCell<BusState>>,
    id: u64,
}

impl PointerCapture {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if let Some(owner) = self.state.borrow_mut().active.remove(&self.id) {
            trace!(id = self.id, owner, "Pointer released");
        }
    }
}
