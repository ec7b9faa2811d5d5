#![forbid(unsafe_code)]

//! Capability interface between the engine and the scrollable host.
//!
//! A host is whatever actually owns item nodes and a scrollable viewport: a
//! DOM adapter, a retained-mode GUI list, a terminal pane, or the simulated
//! host used in tests. The engine drives it through [`ListHost`] and never
//! assumes anything beyond these operations.
//!
//! Offsets reported by the host are measured from the top of the scroll
//! content, i.e. they include the top proxy.

use bufferlist_core::{ItemExtent, Px};

use crate::proxy::ProxyHeights;
use crate::renderer::RenderedBatch;

/// Operation on the pinned (floating) group header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderOp {
    /// Move the header out of view.
    Hide,
    /// Replace the header text.
    SetText(String),
    /// Push the header up by this many pixels.
    Translate(Px),
    /// Remove any translation.
    ResetTranslate,
}

/// Everything the engine needs from its host.
pub trait ListHost {
    /// Height of the visible viewport.
    fn viewport_height(&self) -> Px;

    /// Current scroll offset of the viewport.
    fn scroll_position(&self) -> Px;

    /// Scroll to `y` without emitting scroll notifications for this change.
    fn scroll_to_silently(&mut self, y: Px);

    /// Enable or disable user scrolling.
    fn set_scroll_enabled(&mut self, enabled: bool);

    /// Measured height of all materialized item nodes.
    fn content_height(&self) -> Px;

    /// Measured extent of the node for record `index`, if materialized.
    fn item_extent(&self, index: usize) -> Option<ItemExtent>;

    /// Discard every materialized node and materialize `batch`.
    fn replace_items(&mut self, batch: RenderedBatch);

    /// Materialize `batch` after the last node.
    fn append_items(&mut self, batch: RenderedBatch);

    /// Materialize `batch` before the first node.
    fn insert_items(&mut self, batch: RenderedBatch);

    /// Discard every materialized node.
    fn clear_items(&mut self);

    /// Resize the top and bottom placeholders.
    fn set_proxy_heights(&mut self, proxies: ProxyHeights);

    /// Height of the pinned header.
    fn pinned_header_height(&self) -> Px;

    /// Apply a pinned-header operation.
    fn apply_header_op(&mut self, op: HeaderOp);
}
