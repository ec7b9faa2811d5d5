#![forbid(unsafe_code)]

//! Window manager: which records are materialized, and how the window moves.
//!
//! The window is the inclusive index range of records that currently exist as
//! item nodes in the host. On every scroll tick [`decide`] looks at where the
//! viewport sits relative to the materialized content and picks one of four
//! [`WindowDecision`]s; [`WindowManager::realize`] then drives the host and
//! the proxy extents to match.
//!
//! # Invariants
//!
//! 1. When `count > 0` and a window exists, `0 <= top <= bottom < count`.
//! 2. An append never moves `top`; an insert never moves `bottom`.
//! 3. A full replace at an estimated index materializes exactly
//!    `min(minimum_items, count)` records.
//! 4. Deciding twice at the same position with no mutation in between yields
//!    [`WindowDecision::None`] the second time.
//!
//! # Decision rules
//!
//! With `top_margin = position - top_proxy` and
//! `bottom_margin = (position + viewport) - (top_proxy + content)`:
//!
//! | Condition | Decision |
//! |-----------|----------|
//! | no window yet | replace at the estimated index |
//! | `top_margin <= -viewport` or `bottom_margin >= viewport` | replace at the estimated index |
//! | scrolling down and `bottom_margin > -edge` | append `batch_size` |
//! | scrolling up, `top_margin < edge`, `top > 0` | insert `batch_size` |
//! | otherwise | none |
//!
//! An incremental decision whose range is already covered is downgraded to
//! none. The estimated index is `max(floor(position / max_item_height) - 1, 0)`.
//!
//! A window left reaching past a shrunk store is clamped first; whatever the
//! rules pick is then realized as a replace of the clamped target, so nodes
//! for records that no longer exist never survive a tick.

use bufferlist_core::{Px, ScrollDirection};

use crate::config::ListConfig;
use crate::group_index::GroupIndex;
use crate::host::ListHost;
use crate::proxy::{ProxyHeights, ProxyModel};
use crate::renderer::ItemRenderer;
use crate::store::{ItemSource, RecordStore};

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// Inclusive range of materialized record indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    top: usize,
    bottom: usize,
}

impl Window {
    /// Create a window; the bounds are swapped if given inverted.
    #[must_use]
    pub fn new(top: usize, bottom: usize) -> Self {
        Self {
            top: top.min(bottom),
            bottom: top.max(bottom),
        }
    }

    /// First materialized index.
    #[must_use]
    pub const fn top(&self) -> usize {
        self.top
    }

    /// Last materialized index.
    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.bottom
    }

    /// Number of materialized records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bottom - self.top + 1
    }

    /// Whether `index` is materialized.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.top && index <= self.bottom
    }

    /// Whether every index of `self` is also in `other`.
    #[must_use]
    pub const fn is_within(&self, other: &Window) -> bool {
        self.top >= other.top && self.bottom <= other.bottom
    }

    /// Clamp into a store of `count` records. `None` when nothing of the
    /// window survives.
    #[must_use]
    pub fn clamp_to(self, count: usize) -> Option<Self> {
        let max_index = count.checked_sub(1)?;
        (self.top <= max_index).then(|| Self::new(self.top, self.bottom.min(max_index)))
    }

    /// The replace window of `len` records starting at `start`, pulled back
    /// so it fits a store of `count` records.
    #[must_use]
    pub fn replace_at(start: usize, len: usize, count: usize) -> Option<Self> {
        let len = len.min(count);
        if len == 0 {
            return None;
        }
        let start = start.min(count - len);
        Some(Self::new(start, start + len - 1))
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// What a scroll tick does to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowDecision {
    /// The current window covers the viewport.
    None,
    /// Grow at the bottom to the target window.
    Append(Window),
    /// Grow at the top to the target window.
    Insert(Window),
    /// Discard every node and materialize the target window.
    Replace(Window),
}

impl WindowDecision {
    /// The window after realization, if the decision changes anything.
    #[must_use]
    pub const fn target(&self) -> Option<Window> {
        match *self {
            Self::None => None,
            Self::Append(w) | Self::Insert(w) | Self::Replace(w) => Some(w),
        }
    }

    /// Whether the decision keeps existing nodes.
    #[must_use]
    pub const fn is_incremental(&self) -> bool {
        matches!(self, Self::Append(_) | Self::Insert(_))
    }

    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Append(_) => "append",
            Self::Insert(_) => "insert",
            Self::Replace(_) => "replace",
        }
    }
}

/// Viewport measurements a decision is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollSnapshot {
    pub position: Px,
    pub viewport_height: Px,
    pub content_height: Px,
    pub top_proxy: Px,
}

impl ScrollSnapshot {
    /// Viewport top relative to the top of the materialized content
    /// (positive when the content top is above the viewport).
    #[must_use]
    pub const fn list_top_margin(&self) -> Px {
        self.position - self.top_proxy
    }

    /// Viewport bottom relative to the bottom of the materialized content
    /// (positive when the content ends inside the viewport).
    #[must_use]
    pub const fn list_bottom_margin(&self) -> Px {
        (self.position + self.viewport_height) - (self.top_proxy + self.content_height)
    }
}

/// Pick the window change for one scroll tick.
#[must_use]
pub fn decide(
    current: Option<Window>,
    count: usize,
    snapshot: &ScrollSnapshot,
    direction: ScrollDirection,
    config: &ListConfig,
) -> WindowDecision {
    let Some(max_index) = count.checked_sub(1) else {
        return WindowDecision::None;
    };
    let estimated = || {
        let start = ProxyModel::new(config.max_item_height).index_at(snapshot.position);
        Window::replace_at(start, config.minimum_items, count)
            .map_or(WindowDecision::None, WindowDecision::Replace)
    };
    let Some(stored) = current else {
        return estimated();
    };
    let Some(current) = stored.clamp_to(count) else {
        return estimated();
    };
    // Nodes past the end of the store are still materialized; only a full
    // replace can drop them.
    let stale = current != stored;

    let viewport = snapshot.viewport_height;
    let top_margin = snapshot.list_top_margin();
    let bottom_margin = snapshot.list_bottom_margin();
    if top_margin <= -viewport || bottom_margin >= viewport {
        return estimated();
    }

    let edge = config.edge_threshold;
    let candidate = if direction.is_down() && bottom_margin > -edge {
        let bottom = current.bottom.saturating_add(config.batch_size).min(max_index);
        WindowDecision::Append(Window::new(current.top, bottom))
    } else if !direction.is_down() && top_margin < edge && current.top > 0 {
        let top = current.top.saturating_sub(config.batch_size);
        WindowDecision::Insert(Window::new(top, current.bottom))
    } else {
        WindowDecision::None
    };

    let decision = match candidate.target() {
        Some(target) if target.is_within(&current) => WindowDecision::None,
        _ => candidate,
    };
    if stale {
        return WindowDecision::Replace(decision.target().unwrap_or(current));
    }
    decision
}

// ---------------------------------------------------------------------------
// WindowManager
// ---------------------------------------------------------------------------

/// Whether a window mutation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Updating,
}

/// Everything the manager knows about the materialized list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowState {
    /// Materialized range; `None` when nothing is materialized.
    pub window: Option<Window>,
    /// Proxy extents last pushed to the host.
    pub proxies: ProxyHeights,
    /// Scroll position of the previous tick, for direction detection.
    pub last_position: Px,
    /// Materialized records that open a group, in index order.
    pub group_heads: Vec<usize>,
}

/// Owns the window state and realizes decisions against a host.
#[derive(Debug, Clone)]
pub struct WindowManager {
    config: ListConfig,
    model: ProxyModel,
    state: WindowState,
    phase: Phase,
}

impl WindowManager {
    /// A manager with nothing materialized.
    #[must_use]
    pub fn new(config: &ListConfig) -> Self {
        Self {
            config: config.clone(),
            model: ProxyModel::new(config.max_item_height),
            state: WindowState::default(),
            phase: Phase::Idle,
        }
    }

    /// Full state.
    #[must_use]
    pub fn state(&self) -> &WindowState {
        &self.state
    }

    /// Materialized range.
    #[must_use]
    pub fn window(&self) -> Option<Window> {
        self.state.window
    }

    /// Current proxy extents.
    #[must_use]
    pub fn proxies(&self) -> ProxyHeights {
        self.state.proxies
    }

    /// Materialized group-opening records.
    #[must_use]
    pub fn group_heads(&self) -> &[usize] {
        &self.state.group_heads
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether scroll ticks are currently dropped.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.phase == Phase::Updating
    }

    /// Enter `Updating`. Returns the phase to restore afterwards.
    pub fn begin_update(&mut self) -> Phase {
        std::mem::replace(&mut self.phase, Phase::Updating)
    }

    /// Restore the phase returned by [`Self::begin_update`].
    pub fn end_update(&mut self, previous: Phase) {
        self.phase = previous;
    }

    /// Last seen scroll position.
    #[must_use]
    pub fn last_position(&self) -> Px {
        self.state.last_position
    }

    /// Record the scroll position; returns the direction of travel since the
    /// previous one.
    pub fn track_position(&mut self, position: Px) -> ScrollDirection {
        let direction = ScrollDirection::between(self.state.last_position, position);
        self.state.last_position = position;
        direction
    }

    /// Whether record `index` is materialized.
    #[must_use]
    pub fn is_materialized(&self, index: usize) -> bool {
        self.state.window.is_some_and(|w| w.contains(index))
    }

    /// Measure the host for a decision.
    #[must_use]
    pub fn snapshot<H: ListHost>(&self, host: &H) -> ScrollSnapshot {
        ScrollSnapshot {
            position: host.scroll_position(),
            viewport_height: host.viewport_height(),
            content_height: host.content_height(),
            top_proxy: self.state.proxies.top(),
        }
    }

    /// Decide the window change for the host's current scroll position.
    #[must_use]
    pub fn decide<H: ListHost>(
        &self,
        host: &H,
        count: usize,
        direction: ScrollDirection,
    ) -> WindowDecision {
        decide(
            self.state.window,
            count,
            &self.snapshot(host),
            direction,
            &self.config,
        )
    }

    /// Drive the host to the decided window. Incremental decisions against a
    /// window that reaches past the store are realized as a replace.
    pub fn realize<H: ListHost, S: RecordStore>(
        &mut self,
        host: &mut H,
        source: &ItemSource<'_, S>,
        groups: Option<&GroupIndex>,
        decision: WindowDecision,
    ) {
        let Some(target) = decision.target() else {
            return;
        };
        let _span = tracing::debug_span!("realize", kind = decision.kind()).entered();
        tracing::debug!(
            top = target.top,
            bottom = target.bottom,
            kind = decision.kind(),
            "window decision"
        );
        let count = source.count();
        let stale = self
            .state
            .window
            .is_some_and(|w| w.clamp_to(count) != Some(w));
        let previous = self.begin_update();
        match decision {
            WindowDecision::Append(_) | WindowDecision::Insert(_) if stale => {
                self.replace(host, source, groups, target.top, target.len());
            }
            WindowDecision::Append(_) => self.append_to(host, source, groups, target.bottom),
            WindowDecision::Insert(_) => self.insert_to(host, source, groups, target.top),
            WindowDecision::Replace(_) => {
                self.replace(host, source, groups, target.top, target.len());
            }
            WindowDecision::None => {}
        }
        self.end_update(previous);
    }

    /// Discard every node and materialize `len` records from `start`. The
    /// range is pulled back to fit the store. Returns the new window.
    pub fn replace<H: ListHost, S: RecordStore>(
        &mut self,
        host: &mut H,
        source: &ItemSource<'_, S>,
        groups: Option<&GroupIndex>,
        start: usize,
        len: usize,
    ) -> Option<Window> {
        let count = source.count();
        let Some(target) = Window::replace_at(start, len, count) else {
            self.clear(host);
            return None;
        };

        // Measure before the old nodes go away.
        let measured = host.item_extent(target.top).map(|extent| extent.top);
        let top = self.model.estimate_top(target.top, measured);

        let batch = renderer(groups).render(source, target.top, target.bottom);
        self.state.group_heads = batch.group_starts().collect();
        host.replace_items(batch);

        self.state.proxies =
            ProxyHeights::new(top, self.model.estimate_bottom(target.bottom, count));
        self.state.window = Some(target);
        self.settle_bottom(host, count);
        host.set_proxy_heights(self.state.proxies);
        Some(target)
    }

    /// Discard everything: no nodes, zero proxies, scrolling disabled.
    pub fn clear<H: ListHost>(&mut self, host: &mut H) {
        host.clear_items();
        self.state.window = None;
        self.state.group_heads.clear();
        self.state.proxies = ProxyHeights::ZERO;
        host.set_proxy_heights(ProxyHeights::ZERO);
        host.set_scroll_enabled(false);
    }

    fn append_to<H: ListHost, S: RecordStore>(
        &mut self,
        host: &mut H,
        source: &ItemSource<'_, S>,
        groups: Option<&GroupIndex>,
        bottom: usize,
    ) {
        let count = source.count();
        let Some(current) = self.state.window else {
            return;
        };
        let first = current.bottom + 1;
        let last = bottom.min(count.saturating_sub(1));
        if first > last {
            return;
        }

        let before = host.content_height();
        let batch = renderer(groups).render(source, first, last);
        self.state.group_heads.extend(batch.group_starts());
        host.append_items(batch);
        let growth = host.content_height() - before;

        self.model.absorb_append(&mut self.state.proxies, growth);
        self.state.window = Some(Window::new(current.top, last));
        self.settle_bottom(host, count);
        host.set_proxy_heights(self.state.proxies);
    }

    fn insert_to<H: ListHost, S: RecordStore>(
        &mut self,
        host: &mut H,
        source: &ItemSource<'_, S>,
        groups: Option<&GroupIndex>,
        top: usize,
    ) {
        let count = source.count();
        let Some(current) = self.state.window else {
            return;
        };
        // Nothing above record 0.
        let Some(last) = current.top.checked_sub(1) else {
            return;
        };
        let first = top.min(last);

        let before = host.content_height();
        let batch = renderer(groups).render(source, first, last);
        let mut heads: Vec<usize> = batch.group_starts().collect();
        heads.append(&mut self.state.group_heads);
        self.state.group_heads = heads;
        host.insert_items(batch);
        let growth = host.content_height() - before;

        self.model.absorb_insert(&mut self.state.proxies, growth);
        self.state.window = Some(Window::new(first, current.bottom));
        if first == 0 {
            // The estimate drifts; at the true top the proxy must vanish and
            // record 0 sit flush with the viewport top.
            self.state.proxies.set_top(0);
            host.set_proxy_heights(self.state.proxies);
            host.scroll_to_silently(0);
            self.state.last_position = 0;
        }
        self.settle_bottom(host, count);
        host.set_proxy_heights(self.state.proxies);
    }

    /// At the last record the bottom proxy only fills leftover viewport.
    fn settle_bottom<H: ListHost>(&mut self, host: &H, count: usize) {
        let at_end = self
            .state
            .window
            .is_some_and(|w| count > 0 && w.bottom == count - 1);
        if at_end {
            let bottom = self
                .model
                .true_bottom(host.viewport_height(), host.content_height());
            self.state.proxies.set_bottom(bottom);
        }
    }

    /// Materialized records whose bottom edge lies below the scroll position,
    /// ending with the first one that reaches past the viewport.
    #[must_use]
    pub fn visible_records<H: ListHost>(&self, host: &H) -> Vec<usize> {
        let Some(window) = self.state.window else {
            return Vec::new();
        };
        let position = host.scroll_position();
        let viewport = host.viewport_height();
        let mut visible = Vec::new();
        for index in window.top..=window.bottom {
            let Some(extent) = host.item_extent(index) else {
                continue;
            };
            let bottom = extent.bottom();
            if bottom > position {
                visible.push(index);
                if bottom - position > viewport {
                    break;
                }
            }
        }
        visible
    }

    /// First visible record, if any is materialized.
    #[must_use]
    pub fn first_visible<H: ListHost>(&self, host: &H) -> Option<usize> {
        self.visible_records(host).first().copied()
    }
}

fn renderer(groups: Option<&GroupIndex>) -> ItemRenderer<'_> {
    groups.map_or_else(ItemRenderer::ungrouped, ItemRenderer::grouped)
}
