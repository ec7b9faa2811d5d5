#![forbid(unsafe_code)]

//! Pinned (floating) group header.
//!
//! While a grouped list scrolls, a header above the content shows the group
//! the viewport is currently inside. When the next group's header reaches it,
//! the pinned header is pushed up and keeps showing the previous group until
//! the incoming header passes the top edge.
//!
//! [`HeaderPinner`] remembers what the host currently shows and emits only
//! the [`HeaderOp`]s needed to reach the new state, so an unchanged header
//! causes no redraw.

use std::borrow::Cow;

use bufferlist_core::Px;
use smallvec::SmallVec;

use crate::group_index::GroupIndex;
use crate::host::HeaderOp;

/// Operations produced by one pinner update.
pub type HeaderOps = SmallVec<[HeaderOp; 2]>;

/// A materialized group header: the top of the record that opens the group
/// and the group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAnchor<'a> {
    pub top: Px,
    pub key: Cow<'a, str>,
}

impl<'a> HeaderAnchor<'a> {
    #[must_use]
    pub fn new(top: Px, key: impl Into<Cow<'a, str>>) -> Self {
        Self {
            top,
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderView {
    Hidden,
    Shown { offset: Px },
}

/// Tracks and updates the pinned header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPinner {
    text: Option<String>,
    view: HeaderView,
}

impl Default for HeaderPinner {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderPinner {
    /// A pinner whose header is shown, untranslated, with no text.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: None,
            view: HeaderView::Shown { offset: 0 },
        }
    }

    /// Text currently shown, `None` when hidden or never set.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether the header is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.view == HeaderView::Hidden
    }

    /// Current push-up offset (0 when untranslated or hidden).
    #[must_use]
    pub fn offset(&self) -> Px {
        match self.view {
            HeaderView::Shown { offset } => offset,
            HeaderView::Hidden => 0,
        }
    }

    /// Recompute the header for `scroll`.
    ///
    /// `anchors` are the materialized group headers in index order.
    #[must_use]
    pub fn update(
        &mut self,
        scroll: Px,
        header_height: Px,
        anchors: &[HeaderAnchor<'_>],
        groups: &GroupIndex,
    ) -> HeaderOps {
        let mut ops = HeaderOps::new();
        if scroll <= 0 {
            self.hide(&mut ops);
            return ops;
        }

        let move_top = scroll + header_height;
        if let Some(anchor) = anchors.iter().rev().find(|anchor| anchor.top < move_top) {
            if anchor.top > scroll {
                let pushed = move_top - anchor.top;
                let previous = groups.previous_group(&anchor.key);
                self.show(previous, pushed, &mut ops);
            } else {
                self.show(Some(anchor.key.as_ref()), 0, &mut ops);
            }
        } else if let Some(first) = anchors.first() {
            let previous = groups.previous_group(&first.key);
            self.show(previous, 0, &mut ops);
        }
        ops
    }

    /// Set the header text without recomputing position, as after a jump.
    #[must_use]
    pub fn pin_text(&mut self, text: &str) -> HeaderOps {
        let mut ops = HeaderOps::new();
        let offset = self.offset();
        self.show(Some(text), offset, &mut ops);
        ops
    }

    /// Hide the header.
    #[must_use]
    pub fn hide_header(&mut self) -> HeaderOps {
        let mut ops = HeaderOps::new();
        self.hide(&mut ops);
        ops
    }

    fn hide(&mut self, ops: &mut HeaderOps) {
        if self.view != HeaderView::Hidden {
            ops.push(HeaderOp::Hide);
            self.view = HeaderView::Hidden;
        }
        self.text = None;
    }

    fn show(&mut self, text: Option<&str>, offset: Px, ops: &mut HeaderOps) {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            self.hide(ops);
            return;
        };
        if self.text.as_deref() != Some(text) {
            ops.push(HeaderOp::SetText(text.to_string()));
            self.text = Some(text.to_string());
        }
        if self.view != (HeaderView::Shown { offset }) {
            ops.push(if offset == 0 {
                HeaderOp::ResetTranslate
            } else {
                HeaderOp::Translate(offset)
            });
            self.view = HeaderView::Shown { offset };
        }
    }
}
