#![forbid(unsafe_code)]

//! Simulated host: a viewport over measured item nodes and two proxies.
//!
//! The host lays nodes out top to bottom after the top proxy. Node heights
//! come from a per-record function, so tests can make real heights disagree
//! with the engine's `max_item_height` estimate. Records that open a group
//! carry an extra header row.
//!
//! Every capability call is recorded as a [`HostOp`] so tests can assert on
//! what the engine asked for, and the log can be dumped as JSONL.

use std::collections::VecDeque;
use std::fmt;

use bufferlist::{HeaderOp, ListHost, ProxyHeights, RenderedBatch, RenderedItem};
use bufferlist_core::{ItemExtent, Px};
use serde_json::json;

/// One capability call made by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    Replace { first: usize, last: usize },
    Append { first: usize, last: usize },
    Insert { first: usize, last: usize },
    Clear,
    Proxies { top: Px, bottom: Px },
    SilentScroll(Px),
    ScrollEnabled(bool),
    Header(HeaderOp),
}

impl HostOp {
    /// JSON form for JSONL dumps.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Replace { first, last } => json!({"op": "replace", "first": first, "last": last}),
            Self::Append { first, last } => json!({"op": "append", "first": first, "last": last}),
            Self::Insert { first, last } => json!({"op": "insert", "first": first, "last": last}),
            Self::Clear => json!({"op": "clear"}),
            Self::Proxies { top, bottom } => json!({"op": "proxies", "top": top, "bottom": bottom}),
            Self::SilentScroll(y) => json!({"op": "silent_scroll", "y": y}),
            Self::ScrollEnabled(enabled) => json!({"op": "scroll_enabled", "enabled": enabled}),
            Self::Header(op) => match op {
                HeaderOp::Hide => json!({"op": "header", "action": "hide"}),
                HeaderOp::SetText(text) => json!({"op": "header", "action": "text", "text": text}),
                HeaderOp::Translate(y) => json!({"op": "header", "action": "translate", "y": y}),
                HeaderOp::ResetTranslate => json!({"op": "header", "action": "reset"}),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    item: RenderedItem,
    height: Px,
}

/// What the pinned header currently looks like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedHeaderView {
    pub text: Option<String>,
    pub hidden: bool,
    pub translate: Px,
}

/// A host that lays out nodes in memory.
pub struct SimulatedHost {
    viewport: Px,
    header_row: Px,
    pinned_header_height: Px,
    item_height: Box<dyn Fn(usize) -> Px>,
    nodes: VecDeque<Node>,
    proxies: ProxyHeights,
    scroll: Px,
    scroll_enabled: bool,
    header: PinnedHeaderView,
    log: Vec<HostOp>,
}

impl fmt::Debug for SimulatedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedHost")
            .field("viewport", &self.viewport)
            .field("nodes", &self.nodes.len())
            .field("proxies", &self.proxies)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

impl SimulatedHost {
    /// A host with a `viewport` px tall viewport and 85px items.
    #[must_use]
    pub fn new(viewport: Px) -> Self {
        Self {
            viewport,
            header_row: 0,
            pinned_header_height: 30,
            item_height: Box::new(|_| 85),
            nodes: VecDeque::new(),
            proxies: ProxyHeights::ZERO,
            scroll: 0,
            scroll_enabled: true,
            header: PinnedHeaderView::default(),
            log: Vec::new(),
        }
    }

    /// Every item is `height` px tall.
    #[must_use]
    pub fn with_uniform_height(self, height: Px) -> Self {
        self.with_item_heights(move |_| height)
    }

    /// Item heights by record index.
    #[must_use]
    pub fn with_item_heights(mut self, heights: impl Fn(usize) -> Px + 'static) -> Self {
        self.item_height = Box::new(heights);
        self
    }

    /// Extra height of the in-list header row on group-opening records.
    #[must_use]
    pub fn with_header_row(mut self, height: Px) -> Self {
        self.header_row = height;
        self
    }

    /// Height of the pinned header.
    #[must_use]
    pub fn with_pinned_header_height(mut self, height: Px) -> Self {
        self.pinned_header_height = height;
        self
    }

    fn node(&self, item: RenderedItem) -> Node {
        let header = if item.header.is_some() {
            self.header_row
        } else {
            0
        };
        let height = (self.item_height)(item.index) + header;
        Node { item, height }
    }

    /// Total scrollable extent: both proxies plus the content.
    #[must_use]
    pub fn total_extent(&self) -> Px {
        self.proxies.total() + self.content_height()
    }

    /// Largest scroll offset a user can reach.
    #[must_use]
    pub fn max_scroll(&self) -> Px {
        (self.total_extent() - self.viewport).max(0)
    }

    /// A user scroll: clamped to the scrollable extent, ignored while
    /// scrolling is disabled. Returns the resulting position.
    pub fn scroll_user_to(&mut self, y: Px) -> Px {
        if self.scroll_enabled {
            self.scroll = y.clamp(0, self.max_scroll());
        }
        self.scroll
    }

    /// Indices of materialized records, top to bottom.
    #[must_use]
    pub fn materialized(&self) -> Vec<usize> {
        self.nodes.iter().map(|node| node.item.index).collect()
    }

    /// The rendered item for record `index`.
    #[must_use]
    pub fn rendered(&self, index: usize) -> Option<&RenderedItem> {
        self.nodes
            .iter()
            .find(|node| node.item.index == index)
            .map(|node| &node.item)
    }

    /// Whether user scrolling is enabled.
    #[must_use]
    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    /// Proxy extents last set by the engine.
    #[must_use]
    pub fn proxies(&self) -> ProxyHeights {
        self.proxies
    }

    /// Pinned header as last drawn.
    #[must_use]
    pub fn header(&self) -> &PinnedHeaderView {
        &self.header
    }

    /// Everything the engine asked for so far.
    #[must_use]
    pub fn log(&self) -> &[HostOp] {
        &self.log
    }

    /// Drain the log.
    pub fn take_log(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.log)
    }

    /// The log as JSON lines.
    #[must_use]
    pub fn log_jsonl(&self) -> String {
        self.log
            .iter()
            .map(|op| op.to_json().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn record_batch(&mut self, batch: &RenderedBatch, op: fn(usize, usize) -> HostOp) {
        if let (Some(first), Some(last)) = (batch.first_index(), batch.last_index()) {
            self.log.push(op(first, last));
        }
    }
}

impl ListHost for SimulatedHost {
    fn viewport_height(&self) -> Px {
        self.viewport
    }

    fn scroll_position(&self) -> Px {
        self.scroll
    }

    fn scroll_to_silently(&mut self, y: Px) {
        self.scroll = y;
        self.log.push(HostOp::SilentScroll(y));
    }

    fn set_scroll_enabled(&mut self, enabled: bool) {
        if self.scroll_enabled != enabled {
            self.log.push(HostOp::ScrollEnabled(enabled));
        }
        self.scroll_enabled = enabled;
    }

    fn content_height(&self) -> Px {
        self.nodes.iter().map(|node| node.height).sum()
    }

    fn item_extent(&self, index: usize) -> Option<ItemExtent> {
        let mut top = self.proxies.top();
        for node in &self.nodes {
            if node.item.index == index {
                return Some(ItemExtent::new(top, node.height));
            }
            top += node.height;
        }
        None
    }

    fn replace_items(&mut self, batch: RenderedBatch) {
        self.record_batch(&batch, |first, last| HostOp::Replace { first, last });
        self.nodes = batch
            .into_items()
            .into_iter()
            .map(|item| self.node(item))
            .collect();
    }

    fn append_items(&mut self, batch: RenderedBatch) {
        self.record_batch(&batch, |first, last| HostOp::Append { first, last });
        for item in batch.into_items() {
            let node = self.node(item);
            self.nodes.push_back(node);
        }
    }

    fn insert_items(&mut self, batch: RenderedBatch) {
        self.record_batch(&batch, |first, last| HostOp::Insert { first, last });
        for item in batch.into_items().into_iter().rev() {
            let node = self.node(item);
            self.nodes.push_front(node);
        }
    }

    fn clear_items(&mut self) {
        self.log.push(HostOp::Clear);
        self.nodes.clear();
    }

    fn set_proxy_heights(&mut self, proxies: ProxyHeights) {
        if self.proxies != proxies {
            self.log.push(HostOp::Proxies {
                top: proxies.top(),
                bottom: proxies.bottom(),
            });
        }
        self.proxies = proxies;
    }

    fn pinned_header_height(&self) -> Px {
        self.pinned_header_height
    }

    fn apply_header_op(&mut self, op: HeaderOp) {
        match &op {
            HeaderOp::Hide => self.header.hidden = true,
            HeaderOp::SetText(text) => {
                self.header.text = Some(text.clone());
                self.header.hidden = false;
            }
            HeaderOp::Translate(y) => {
                self.header.translate = *y;
                self.header.hidden = false;
            }
            HeaderOp::ResetTranslate => {
                self.header.translate = 0;
                self.header.hidden = false;
            }
        }
        self.log.push(HostOp::Header(op));
    }
}
