#![forbid(unsafe_code)]

//! Item rendering for a contiguous index range.
//!
//! [`ItemRenderer`] turns `[first, last]` into a [`RenderedBatch`]: one
//! [`RenderedItem`] per record, carrying the template output, the group
//! header marker for records that open a group, and style flags for
//! selection. It is a pure function of the range and its collaborators.

use bitflags::bitflags;

use crate::group_index::GroupIndex;
use crate::store::{ItemSource, RecordStore};

/// Produces the markup fragment for one record.
pub trait ItemTemplate<R: ?Sized> {
    /// Render the record at `index`.
    fn render(&self, index: usize, record: &R) -> String;
}

impl<R: ?Sized, F> ItemTemplate<R> for F
where
    F: Fn(usize, &R) -> String,
{
    fn render(&self, index: usize, record: &R) -> String {
        self(index, record)
    }
}

/// Reports whether a record is part of the current selection.
pub trait SelectionProvider<R: ?Sized> {
    fn is_selected(&self, record: &R) -> bool;
}

impl<R: ?Sized, F> SelectionProvider<R> for F
where
    F: Fn(&R) -> bool,
{
    fn is_selected(&self, record: &R) -> bool {
        self(record)
    }
}

bitflags! {
    /// Visual flags attached to a rendered item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ItemFlags: u8 {
        /// The record is selected.
        const SELECTED    = 0b0000_0001;
        /// The record opens a group and carries a header marker.
        const GROUP_START = 0b0000_0010;
    }
}

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    /// Record index.
    pub index: usize,
    /// Template output.
    pub markup: String,
    /// Group header text inserted before the record, if it opens a group.
    pub header: Option<String>,
    /// Style flags.
    pub flags: ItemFlags,
}

impl RenderedItem {
    /// Returns true when the record is selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.flags.contains(ItemFlags::SELECTED)
    }
}

/// A contiguous run of rendered records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBatch {
    items: Vec<RenderedItem>,
}

impl RenderedBatch {
    /// The rendered items in index order.
    #[must_use]
    pub fn items(&self) -> &[RenderedItem] {
        &self.items
    }

    /// Consume the batch.
    #[must_use]
    pub fn into_items(self) -> Vec<RenderedItem> {
        self.items
    }

    /// Number of rendered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the first rendered record.
    #[must_use]
    pub fn first_index(&self) -> Option<usize> {
        self.items.first().map(|item| item.index)
    }

    /// Index of the last rendered record.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.items.last().map(|item| item.index)
    }

    /// Indices of records that open a group, in order.
    pub fn group_starts(&self) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .filter(|item| item.flags.contains(ItemFlags::GROUP_START))
            .map(|item| item.index)
    }
}

/// Renders index ranges, consulting the group index for header markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemRenderer<'g> {
    groups: Option<&'g GroupIndex>,
}

impl<'g> ItemRenderer<'g> {
    /// A renderer that never inserts headers.
    #[must_use]
    pub fn ungrouped() -> Self {
        Self { groups: None }
    }

    /// A renderer that marks group starts found in `groups`.
    #[must_use]
    pub fn grouped(groups: &'g GroupIndex) -> Self {
        Self {
            groups: Some(groups),
        }
    }

    /// Render `[first, last]`. Indices past the end of the store are skipped,
    /// and an inverted range renders nothing.
    #[must_use]
    pub fn render<S: RecordStore>(
        &self,
        source: &ItemSource<'_, S>,
        first: usize,
        last: usize,
    ) -> RenderedBatch {
        if first > last {
            return RenderedBatch::default();
        }
        let store = source.store();
        let last = last.min(store.count().saturating_sub(1));
        let mut items = Vec::with_capacity((last + 1).saturating_sub(first));
        for index in first..=last {
            let Some(record) = store.record_at(index) else {
                break;
            };
            let mut flags = ItemFlags::empty();
            if source.is_selected(record) {
                flags |= ItemFlags::SELECTED;
            }
            let header = self.groups.and_then(|groups| {
                let key = store.group_key_of(record);
                (groups.group_start_index(&key) == Some(index)).then(|| key.into_owned())
            });
            if header.is_some() {
                flags |= ItemFlags::GROUP_START;
            }
            items.push(RenderedItem {
                index,
                markup: source.template().render(index, record),
                header,
                flags,
            });
        }
        RenderedBatch { items }
    }
}
