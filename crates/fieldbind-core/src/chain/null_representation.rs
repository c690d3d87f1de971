//! Maps a missing model value to a presentation sentinel

use std::cell::{Cell, RefCell};

/// One-shot adapter at the front of every chain
///
/// While enabled, a missing model value is presented as the sentinel. Once
/// [`disable`](Self::disable) has been called it stays disabled.
#[derive(Debug)]
pub struct NullRepresentationAdapter<P> {
    enabled: Cell<bool>,
    sentinel: RefCell<P>,
}

impl<P: Clone> NullRepresentationAdapter<P> {
    pub fn new(sentinel: P) -> Self {
        Self {
            enabled: Cell::new(true),
            sentinel: RefCell::new(sentinel),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Replace the sentinel. Returns `false` when the adapter is disabled.
    pub fn set_sentinel(&self, sentinel: P) -> bool {
        if !self.is_enabled() {
            return false;
        }
        *self.sentinel.borrow_mut() = sentinel;
        true
    }

    pub fn sentinel(&self) -> P {
        self.sentinel.borrow().clone()
    }

    pub fn disable(&self) {
        self.enabled.set(false);
    }

    /// Presentation for a missing model value
    pub fn represent(&self) -> Option<P> {
        self.is_enabled().then(|| self.sentinel())
    }
}
