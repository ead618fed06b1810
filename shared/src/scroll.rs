//! Near-end detection for the paginated grids.
//!
//! The shell reports a [`LayoutSnapshot`] on every scroll or layout change.
//! [`is_near_end`] is the level signal; [`ScrollObserver`] turns it into a
//! rising edge so pagination is requested once per approach to the end.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub total_item_count: usize,
    pub last_visible_index: usize,
}

impl LayoutSnapshot {
    #[must_use]
    pub const fn new(total_item_count: usize, last_visible_index: usize) -> Self {
        Self {
            total_item_count,
            last_visible_index,
        }
    }
}

/// `last_visible_index >= total_item_count - threshold`.
///
/// An empty grid is never near its end, unlike the bare formula which holds
/// for `0 >= 0 - threshold`. The first page is requested on start instead.
#[must_use]
pub fn is_near_end(snapshot: LayoutSnapshot, threshold: usize) -> bool {
    snapshot.total_item_count > 0
        && snapshot.last_visible_index.saturating_add(threshold) >= snapshot.total_item_count
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollObserver {
    threshold: usize,
    near_end: bool,
}

impl ScrollObserver {
    #[must_use]
    pub const fn new(threshold: usize) -> Self {
        Self {
            threshold,
            near_end: false,
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    #[must_use]
    pub const fn is_near_end(&self) -> bool {
        self.near_end
    }

    /// Records a snapshot. Returns `true` only on the false-to-true transition.
    pub fn observe(&mut self, snapshot: LayoutSnapshot) -> bool {
        let near_end = is_near_end(snapshot, self.threshold);
        let rising = near_end && !self.near_end;
        self.near_end = near_end;
        rising
    }

    pub fn reset(&mut self) {
        self.near_end = false;
    }
}
