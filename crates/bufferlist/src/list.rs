#![forbid(unsafe_code)]

//! The buffered list: composition root of the windowing engine.
//!
//! [`BufferedList`] owns a [`ListHost`] and wires the window manager, group
//! index, header pinner and cleanup scheduler together. The host forwards
//! its notifications (scroll start/tick/end, store changes, item gestures,
//! jump-bar activations) and calls [`BufferedList::poll_timers`] from its
//! event loop; the engine answers by driving the host and by queueing
//! [`ListEvent`]s for the application.
//!
//! # Re-entrancy
//!
//! Everything runs on one event loop. The window manager's phase is
//! `Updating` while a render or cleanup is in flight, and scroll ticks that
//! arrive meanwhile are dropped, not queued: the next tick recomputes from
//! fresher state. Store changes are not guarded and always re-render.
//! Programmatic scrolls go through [`ListHost::scroll_to_silently`] so they
//! never feed back into [`BufferedList::on_scroll`].

use std::mem;

use bufferlist_core::{ItemGesture, SwipeDirection};
use web_time::Instant;

use crate::cleanup::{CleanupScheduler, DelayedTask};
use crate::config::{ConfigError, ListConfig, SelectTrigger};
use crate::group_index::GroupIndex;
use crate::host::ListHost;
use crate::pinned_header::{HeaderAnchor, HeaderOps, HeaderPinner};
use crate::proxy::ProxyHeights;
use crate::store::{ItemSource, RecordStore, StoreChange};
use crate::window::{Phase, Window, WindowDecision, WindowManager};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Notification for the application. Records are identified by index and
/// resolved through the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// The disclosure control of a record was activated.
    Disclose { index: usize },
    ItemTouchStart { index: usize },
    ItemTouchEnd { index: usize },
    ItemTap { index: usize },
    ItemDoubleTap { index: usize },
    ItemSwipe {
        index: usize,
        direction: SwipeDirection,
    },
    /// The configured trigger gesture asks to select a record.
    SelectRequested { index: usize },
    /// A jump-bar symbol moved the list to `index`.
    GroupJump { symbol: String, index: usize },
}

/// Result of a scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// An update was in flight; the tick was ignored.
    Dropped,
    /// The tick was evaluated.
    Applied(WindowDecision),
}

// ---------------------------------------------------------------------------
// BufferedList
// ---------------------------------------------------------------------------

/// A scrollable list that keeps a bounded window of records materialized.
#[derive(Debug)]
pub struct BufferedList<H: ListHost> {
    config: ListConfig,
    host: H,
    windows: WindowManager,
    groups: Option<GroupIndex>,
    alphabet: Vec<String>,
    pinner: HeaderPinner,
    cleanup: CleanupScheduler,
    select_lock: DelayedTask,
    suspended: Option<Phase>,
    first_refresh_done: bool,
    events: Vec<ListEvent>,
}

impl<H: ListHost> BufferedList<H> {
    /// Create an engine over `host`. Nothing is rendered until
    /// [`Self::refresh`].
    pub fn new(config: ListConfig, host: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            windows: WindowManager::new(&config),
            cleanup: CleanupScheduler::new(config.cleanup_delay(), config.cleanup_boundary),
            config,
            host,
            groups: None,
            alphabet: Vec::new(),
            pinner: HeaderPinner::new(),
            select_lock: DelayedTask::new(),
            suspended: None,
            first_refresh_done: false,
            events: Vec::new(),
        })
    }

    /// Attach a jump bar alphabet. Symbols are matched case-insensitively.
    #[must_use]
    pub fn with_jump_alphabet<I, T>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.alphabet = symbols
            .into_iter()
            .map(|symbol| symbol.as_ref().to_uppercase())
            .collect();
        self.groups = None;
        self
    }

    // -- accessors --

    #[must_use]
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give the host back.
    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    /// Materialized range.
    #[must_use]
    pub fn window(&self) -> Option<Window> {
        self.windows.window()
    }

    /// Current proxy extents.
    #[must_use]
    pub fn proxies(&self) -> ProxyHeights {
        self.windows.proxies()
    }

    /// Current phase of the window manager.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.windows.phase()
    }

    /// The group index, once built.
    #[must_use]
    pub fn group_index(&self) -> Option<&GroupIndex> {
        self.groups.as_ref()
    }

    /// The jump bar alphabet.
    #[must_use]
    pub fn jump_alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// Pinned header state.
    #[must_use]
    pub fn pinned_header(&self) -> &HeaderPinner {
        &self.pinner
    }

    /// Whether a cleanup is pending.
    #[must_use]
    pub fn cleanup_pending(&self) -> bool {
        self.cleanup.is_armed()
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<ListEvent> {
        mem::take(&mut self.events)
    }

    // -- rendering --

    /// Render from the store.
    ///
    /// The first call renders `minimum_items` records from the top. Later
    /// calls rebuild the group index and re-render around the first visible
    /// record.
    pub fn refresh<S: RecordStore>(&mut self, source: &ItemSource<'_, S>) {
        if self.grouping_active() {
            self.rebuild_groups(source.store());
        }
        if self.first_refresh_done {
            self.update_item_list(source);
            return;
        }
        self.first_refresh_done = true;
        self.host.set_proxy_heights(ProxyHeights::ZERO);
        tracing::debug!(count = source.count(), "first refresh");
        if source.count() > 0 {
            self.refresh_at(source, 0);
        }
    }

    /// Re-render starting at record `index` and scroll it to the top of the
    /// viewport. Returns the new window, `None` for an empty store.
    pub fn scroll_to_record<S: RecordStore>(
        &mut self,
        source: &ItemSource<'_, S>,
        index: usize,
    ) -> Option<Window> {
        if self.config.grouped {
            self.ensure_groups(source.store());
        }
        self.refresh_at(source, index)
    }

    fn refresh_at<S: RecordStore>(
        &mut self,
        source: &ItemSource<'_, S>,
        index: usize,
    ) -> Option<Window> {
        let max_index = source.count().checked_sub(1)?;
        let index = index.min(max_index);
        let previous = self.windows.begin_update();

        let groups = render_groups(&self.config, self.groups.as_ref());
        let window = self.windows.replace(
            &mut self.host,
            source,
            groups,
            index,
            self.config.minimum_items,
        );
        let anchor = self
            .host
            .item_extent(index)
            .map_or_else(|| self.windows.proxies().top(), |extent| extent.top);
        self.host.set_scroll_enabled(true);
        self.host.scroll_to_silently(anchor);
        let _ = self.windows.track_position(anchor);
        self.update_pinned_header(source.store());

        self.windows.end_update(previous);
        window
    }

    /// Re-render after a store change or cleanup: `minimum_items` records
    /// from a few records above the first visible one, or the empty state.
    fn update_item_list<S: RecordStore>(&mut self, source: &ItemSource<'_, S>) {
        let count = source.count();
        if count == 0 {
            self.windows.clear(&mut self.host);
            let ops = self.pinner.hide_header();
            self.apply_header_ops(ops);
            return;
        }

        let previous = self.windows.begin_update();
        let first_visible = self.windows.first_visible(&self.host).unwrap_or(0);
        let start = first_visible
            .saturating_sub(self.config.refresh_anchor_margin)
            .min(count - 1);
        let groups = render_groups(&self.config, self.groups.as_ref());
        self.windows.replace(
            &mut self.host,
            source,
            groups,
            start,
            self.config.minimum_items,
        );
        self.windows.end_update(previous);
        self.host.set_scroll_enabled(true);
        self.update_pinned_header(source.store());
    }

    // -- scrolling --

    /// The user started scrolling.
    pub fn on_scroll_start(&mut self) {
        let _ = self.windows.track_position(self.host.scroll_position());
    }

    /// One scroll tick at the host's current position.
    pub fn on_scroll<S: RecordStore>(&mut self, source: &ItemSource<'_, S>) -> ScrollOutcome {
        self.cleanup.cancel();
        if self.windows.is_updating() {
            tracing::trace!(
                position = self.host.scroll_position(),
                "scroll tick dropped while updating"
            );
            return ScrollOutcome::Dropped;
        }
        if self.config.grouped {
            self.ensure_groups(source.store());
        }

        let position = self.host.scroll_position();
        let direction = self.windows.track_position(position);
        let decision = self.windows.decide(&self.host, source.count(), direction);
        let groups = render_groups(&self.config, self.groups.as_ref());
        self.windows.realize(&mut self.host, source, groups, decision);
        self.update_pinned_header(source.store());
        ScrollOutcome::Applied(decision)
    }

    /// Scrolling stopped: optionally lock selection, then arm cleanup.
    pub fn on_scroll_end(&mut self, now: Instant) {
        if self.config.block_scroll_select {
            self.select_lock.arm(now, self.config.select_block());
        }
        self.cleanup.arm(now);
    }

    /// Run due timers. Returns true when cleanup collapsed the window.
    pub fn poll_timers<S: RecordStore>(
        &mut self,
        source: &ItemSource<'_, S>,
        now: Instant,
    ) -> bool {
        let _ = self.select_lock.take_if_due(now);
        if !self.cleanup.fire_if_due(now) {
            return false;
        }
        let len = self.windows.window().map_or(0, |w| w.len());
        if !self.cleanup.should_shrink(len) {
            return false;
        }
        if self.windows.is_updating() {
            self.cleanup.arm(now);
            return false;
        }
        tracing::debug!(window_len = len, "cleanup collapsing window");
        self.update_item_list(source);
        true
    }

    /// Earliest pending timer, for hosts that sleep between events.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.cleanup.deadline(), self.select_lock.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Hold the engine in `Updating` across host work spanning several
    /// event-loop turns. Scroll ticks are dropped until [`Self::resume`].
    pub fn suspend(&mut self) {
        if self.suspended.is_none() {
            self.suspended = Some(self.windows.begin_update());
        }
    }

    /// Leave a [`Self::suspend`].
    pub fn resume(&mut self) {
        if let Some(previous) = self.suspended.take() {
            self.windows.end_update(previous);
        }
    }

    /// The list is about to be hidden: stop any scroll motion in place.
    pub fn on_before_hide(&mut self) {
        let position = self.host.scroll_position();
        self.host.scroll_to_silently(position);
    }

    /// Records at least partly inside the viewport.
    #[must_use]
    pub fn visible_records(&self) -> Vec<usize> {
        self.windows.visible_records(&self.host)
    }

    // -- store --

    /// The store changed membership or content.
    ///
    /// The group index is rebuilt only for membership changes. An in-place
    /// update must keep the record in its group; a record moving between
    /// groups is reported as a remove and an add.
    pub fn on_store_change<S: RecordStore>(
        &mut self,
        source: &ItemSource<'_, S>,
        change: StoreChange,
    ) {
        tracing::debug!(?change, count = source.count(), "store changed");
        if self.grouping_active() && change.affects_membership() {
            self.rebuild_groups(source.store());
        }
        self.update_item_list(source);
    }

    // -- grouping --

    /// A jump-bar symbol was activated. Returns the record jumped to.
    pub fn jump_to_symbol<S: RecordStore>(
        &mut self,
        source: &ItemSource<'_, S>,
        symbol: &str,
    ) -> Option<usize> {
        if self.alphabet.is_empty() {
            return None;
        }
        let store = source.store();
        self.ensure_groups(store);
        let symbol = symbol.to_uppercase();
        let index = self.groups.as_ref()?.jump_table()?.target(&symbol)?;

        self.refresh_at(source, index);
        if self.config.pins_headers() {
            let key = store.group_key_at(index);
            let ops = self.pinner.pin_text(&key);
            self.apply_header_ops(ops);
        }
        tracing::debug!(symbol = %symbol, index, "group jump");
        self.events.push(ListEvent::GroupJump { symbol, index });
        Some(index)
    }

    fn grouping_active(&self) -> bool {
        self.config.grouped || !self.alphabet.is_empty()
    }

    fn rebuild_groups<S: RecordStore>(&mut self, store: &S) {
        self.groups = Some(GroupIndex::build(store, &self.alphabet));
    }

    fn ensure_groups<S: RecordStore>(&mut self, store: &S) {
        let stale = self
            .groups
            .as_ref()
            .is_none_or(|groups| groups.record_count() != store.count());
        if stale {
            self.rebuild_groups(store);
        }
    }

    fn update_pinned_header<S: RecordStore>(&mut self, store: &S) {
        if !self.config.pins_headers() {
            return;
        }
        self.ensure_groups(store);
        let Some(groups) = self.groups.as_ref() else {
            return;
        };
        let anchors: Vec<HeaderAnchor<'_>> = self
            .windows
            .group_heads()
            .iter()
            .filter_map(|&index| {
                self.host
                    .item_extent(index)
                    .map(|extent| HeaderAnchor::new(extent.top, store.group_key_at(index)))
            })
            .collect();
        let ops = self.pinner.update(
            self.host.scroll_position(),
            self.host.pinned_header_height(),
            &anchors,
            groups,
        );
        self.apply_header_ops(ops);
    }

    fn apply_header_ops(&mut self, ops: HeaderOps) {
        for op in ops {
            self.host.apply_header_op(op);
        }
    }

    // -- items --

    /// A gesture landed on record `index`. Returns false when the record is
    /// not materialized.
    pub fn on_item_gesture<S: RecordStore>(
        &mut self,
        source: &ItemSource<'_, S>,
        index: usize,
        gesture: ItemGesture,
        now: Instant,
    ) -> bool {
        if !self.windows.is_materialized(index) || source.record(index).is_none() {
            return false;
        }
        let event = match gesture {
            ItemGesture::TouchStart => Some(ListEvent::ItemTouchStart { index }),
            ItemGesture::TouchMove => None,
            ItemGesture::TouchEnd => Some(ListEvent::ItemTouchEnd { index }),
            ItemGesture::Tap => Some(ListEvent::ItemTap { index }),
            ItemGesture::DoubleTap => Some(ListEvent::ItemDoubleTap { index }),
            ItemGesture::Swipe { direction, .. } => Some(ListEvent::ItemSwipe { index, direction }),
        };
        self.events.extend(event);

        let triggers = match self.config.trigger {
            SelectTrigger::Tap => matches!(gesture, ItemGesture::Tap),
            SelectTrigger::DoubleTap => matches!(gesture, ItemGesture::DoubleTap),
        };
        if triggers && !self.is_selection_blocked(now) {
            self.events.push(ListEvent::SelectRequested { index });
        }
        true
    }

    /// The disclosure control of record `index` was activated.
    pub fn on_disclose<S: RecordStore>(
        &mut self,
        source: &ItemSource<'_, S>,
        index: usize,
    ) -> bool {
        if !self.windows.is_materialized(index) || source.record(index).is_none() {
            return false;
        }
        self.events.push(ListEvent::Disclose { index });
        true
    }

    /// Whether selection is locked after a recent scroll end.
    #[must_use]
    pub fn is_selection_blocked(&self, now: Instant) -> bool {
        self.select_lock.is_armed() && !self.select_lock.is_due(now)
    }
}

fn render_groups<'g>(
    config: &ListConfig,
    groups: Option<&'g GroupIndex>,
) -> Option<&'g GroupIndex> {
    groups.filter(|_| config.grouped)
}
