#![forbid(unsafe_code)]

//! Minimal in-crate host for unit tests: fixed item height, plus an extra
//! header row on records that open a group.

use std::collections::VecDeque;

use bufferlist_core::{ItemExtent, Px};

use crate::host::{HeaderOp, ListHost};
use crate::proxy::ProxyHeights;
use crate::renderer::{RenderedBatch, RenderedItem};

#[derive(Debug)]
pub(crate) struct FixedHost {
    viewport: Px,
    item_height: Px,
    header_row: Px,
    nodes: VecDeque<RenderedItem>,
    proxies: ProxyHeights,
    scroll: Px,
    scroll_enabled: bool,
    silent_scrolls: usize,
    header_ops: Vec<HeaderOp>,
}

impl FixedHost {
    pub(crate) fn new(viewport: Px, item_height: Px) -> Self {
        Self {
            viewport,
            item_height,
            header_row: 0,
            nodes: VecDeque::new(),
            proxies: ProxyHeights::ZERO,
            scroll: 0,
            scroll_enabled: true,
            silent_scrolls: 0,
            header_ops: Vec::new(),
        }
    }

    pub(crate) fn with_header_row(mut self, height: Px) -> Self {
        self.header_row = height;
        self
    }

    fn node_height(&self, item: &RenderedItem) -> Px {
        self.item_height + if item.header.is_some() { self.header_row } else { 0 }
    }

    pub(crate) fn set_scroll(&mut self, y: Px) {
        self.scroll = y;
    }

    pub(crate) fn proxies(&self) -> ProxyHeights {
        self.proxies
    }

    pub(crate) fn materialized(&self) -> Vec<usize> {
        self.nodes.iter().map(|item| item.index).collect()
    }

    pub(crate) fn node(&self, index: usize) -> Option<&RenderedItem> {
        self.nodes.iter().find(|item| item.index == index)
    }

    pub(crate) fn silent_scrolls(&self) -> usize {
        self.silent_scrolls
    }

    pub(crate) fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    pub(crate) fn take_header_ops(&mut self) -> Vec<HeaderOp> {
        std::mem::take(&mut self.header_ops)
    }
}

impl ListHost for FixedHost {
    fn viewport_height(&self) -> Px {
        self.viewport
    }

    fn scroll_position(&self) -> Px {
        self.scroll
    }

    fn scroll_to_silently(&mut self, y: Px) {
        self.scroll = y;
        self.silent_scrolls += 1;
    }

    fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }

    fn content_height(&self) -> Px {
        self.nodes.iter().map(|item| self.node_height(item)).sum()
    }

    fn item_extent(&self, index: usize) -> Option<ItemExtent> {
        let mut top = self.proxies.top();
        for item in &self.nodes {
            let height = self.node_height(item);
            if item.index == index {
                return Some(ItemExtent::new(top, height));
            }
            top += height;
        }
        None
    }

    fn replace_items(&mut self, batch: RenderedBatch) {
        self.nodes = batch.into_items().into();
    }

    fn append_items(&mut self, batch: RenderedBatch) {
        self.nodes.extend(batch.into_items());
    }

    fn insert_items(&mut self, batch: RenderedBatch) {
        for item in batch.into_items().into_iter().rev() {
            self.nodes.push_front(item);
        }
    }

    fn clear_items(&mut self) {
        self.nodes.clear();
    }

    fn set_proxy_heights(&mut self, proxies: ProxyHeights) {
        self.proxies = proxies;
    }

    fn pinned_header_height(&self) -> Px {
        30
    }

    fn apply_header_op(&mut self, op: HeaderOp) {
        self.header_ops.push(op);
    }
}
