//! Edge-triggered "end of list is near" detection for infinite scroll.
//!
//! The sentinel is the virtual row just past the last list entry.  After each
//! frame the caller reports whether it falls inside the visible window plus a
//! pre-trigger margin; [`Sentinel::observe`] turns that level signal into a
//! single enter event per invisible→visible transition.

/// Rows of look-ahead before the end of the list counts as visible.
pub const DEFAULT_PREFETCH_ROWS: usize = 10;

#[derive(Debug)]
pub struct Sentinel {
    margin: usize,
    visible: bool,
}

impl Sentinel {
    pub fn new(margin: usize) -> Self {
        Self {
            margin,
            visible: false,
        }
    }

    /// Whether the sentinel is within `margin` rows of a window showing
    /// `rows` rows from `offset`, in a list of `len` entries.
    pub fn is_near(&self, offset: usize, rows: usize, len: usize) -> bool {
        offset + rows + self.margin >= len
    }

    /// Feed the current visibility.  Returns `true` only on the transition
    /// into view.
    pub fn observe(&mut self, near: bool) -> bool {
        let entered = near && !self.visible;
        self.visible = near;
        entered
    }

    /// Forget the last observation so a still-visible sentinel fires again.
    ///
    /// Called when the list under it changes (a page was committed) or when
    /// infinite mode is switched on.
    pub fn rearm(&mut self) {
        self.visible = false;
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new(DEFAULT_PREFETCH_ROWS)
    }
}
