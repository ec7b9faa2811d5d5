#![forbid(unsafe_code)]

//! Placeholder extents above and below the materialized window.
//!
//! The top and bottom proxies stand in for every record that is not
//! materialized, so the total scrollable extent approximates
//! `count × max_item_height` without rendering those records.
//!
//! # Invariants
//!
//! 1. Both extents are non-negative; every setter clamps at zero.
//! 2. Incremental growth corrects the proxy on the growing side by the
//!    *measured* growth of the content, not the estimate, so the total extent
//!    moves smoothly as the window slides.
//!
//! The estimate is an approximation. When real item heights differ from
//! `max_item_height`, the top proxy can disagree with the content it stands
//! in for; the engine forces it to zero once the window reaches record 0.

use bufferlist_core::Px;

/// The two placeholder extents, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProxyHeights {
    top: Px,
    bottom: Px,
}

impl ProxyHeights {
    /// Both proxies collapsed.
    pub const ZERO: Self = Self { top: 0, bottom: 0 };

    /// Create clamped extents.
    #[must_use]
    pub fn new(top: Px, bottom: Px) -> Self {
        Self {
            top: top.max(0),
            bottom: bottom.max(0),
        }
    }

    /// Extent above the window.
    #[must_use]
    pub const fn top(&self) -> Px {
        self.top
    }

    /// Extent below the window.
    #[must_use]
    pub const fn bottom(&self) -> Px {
        self.bottom
    }

    /// Sum of both extents.
    #[must_use]
    pub const fn total(&self) -> Px {
        self.top + self.bottom
    }

    /// Set the top extent, clamped at zero.
    pub fn set_top(&mut self, top: Px) {
        self.top = top.max(0);
    }

    /// Set the bottom extent, clamped at zero.
    pub fn set_bottom(&mut self, bottom: Px) {
        self.bottom = bottom.max(0);
    }
}

/// Estimates proxy extents from the configured item height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyModel {
    max_item_height: Px,
}

impl ProxyModel {
    /// Create a model; non-positive estimates are treated as 1px.
    #[must_use]
    pub fn new(max_item_height: Px) -> Self {
        Self {
            max_item_height: max_item_height.max(1),
        }
    }

    /// The per-item estimate.
    #[must_use]
    pub const fn max_item_height(&self) -> Px {
        self.max_item_height
    }

    /// Estimated extent of `records` unmaterialized records.
    #[must_use]
    pub fn estimate(&self, records: usize) -> Px {
        Px::try_from(records)
            .unwrap_or(Px::MAX)
            .saturating_mul(self.max_item_height)
    }

    /// Top proxy for a window starting at `first`. Record 0 needs no proxy;
    /// otherwise the measured offset of an already materialized boundary node
    /// wins over the estimate.
    #[must_use]
    pub fn estimate_top(&self, first: usize, measured_offset: Option<Px>) -> Px {
        if first == 0 {
            return 0;
        }
        measured_offset.unwrap_or_else(|| self.estimate(first)).max(0)
    }

    /// Bottom proxy for a window ending at `last` in a store of `count`.
    #[must_use]
    pub fn estimate_bottom(&self, last: usize, count: usize) -> Px {
        self.estimate(count.saturating_sub(last + 1))
    }

    /// Bottom proxy once the window reaches the last record: whatever viewport
    /// space the content leaves unfilled.
    #[must_use]
    pub fn true_bottom(&self, viewport_height: Px, content_height: Px) -> Px {
        (viewport_height - content_height).max(0)
    }

    /// First record index estimated to sit at `position`, one record early so
    /// the window starts above the viewport.
    #[must_use]
    pub fn index_at(&self, position: Px) -> usize {
        let estimated = position.div_euclid(self.max_item_height) - 1;
        usize::try_from(estimated.max(0)).unwrap_or(usize::MAX)
    }

    /// Shrink the bottom proxy by the measured content growth of an append.
    pub fn absorb_append(&self, proxies: &mut ProxyHeights, growth: Px) {
        proxies.set_bottom(proxies.bottom() - growth);
    }

    /// Shrink the top proxy by the measured content growth of an insert.
    pub fn absorb_insert(&self, proxies: &mut ProxyHeights, growth: Px) {
        proxies.set_top(proxies.top() - growth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extents_clamp_at_zero() {
        let mut p = ProxyHeights::new(-5, 10);
        assert_eq!(p, ProxyHeights::new(0, 10));
        p.set_bottom(-1);
        assert_eq!(p.bottom(), 0);
        p.set_top(40);
        assert_eq!(p.total(), 40);
    }

    #[test]
    fn initial_window_estimate() {
        let model = ProxyModel::new(85);
        assert_eq!(model.estimate_top(0, Some(999)), 0);
        assert_eq!(model.estimate_bottom(49, 1000), 80_750);
        assert_eq!(model.estimate_bottom(999, 1000), 0);
    }

    #[test]
    fn measured_offset_beats_estimate() {
        let model = ProxyModel::new(85);
        assert_eq!(model.estimate_top(10, None), 850);
        assert_eq!(model.estimate_top(10, Some(612)), 612);
    }

    #[test]
    fn index_at_position() {
        let model = ProxyModel::new(85);
        assert_eq!(model.index_at(42_500), 499);
        assert_eq!(model.index_at(0), 0);
        assert_eq!(model.index_at(84), 0);
        assert_eq!(model.index_at(170), 1);
        assert_eq!(model.index_at(-300), 0);
    }

    #[test]
    fn absorb_growth() {
        let model = ProxyModel::new(85);
        let mut p = ProxyHeights::new(1_000, 2_000);
        model.absorb_append(&mut p, 1_500);
        assert_eq!(p.bottom(), 500);
        model.absorb_append(&mut p, 1_500);
        assert_eq!(p.bottom(), 0);
        model.absorb_insert(&mut p, 400);
        assert_eq!(p.top(), 600);
    }

    #[test]
    fn true_bottom_fills_leftover_viewport() {
        let model = ProxyModel::new(85);
        assert_eq!(model.true_bottom(600, 250), 350);
        assert_eq!(model.true_bottom(600, 4_000), 0);
    }

    proptest! {
        #[test]
        fn proxies_never_negative(
            top in -10_000i64..10_000,
            bottom in -10_000i64..10_000,
            growth in proptest::collection::vec(-5_000i64..5_000, 0..20),
        ) {
            let model = ProxyModel::new(85);
            let mut p = ProxyHeights::new(top, bottom);
            for g in growth {
                model.absorb_append(&mut p, g);
                model.absorb_insert(&mut p, g);
                prop_assert!(p.top() >= 0);
                prop_assert!(p.bottom() >= 0);
            }
        }
    }
}
