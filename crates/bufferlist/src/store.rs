#![forbid(unsafe_code)]

//! Record store seam.
//!
//! The engine never owns record data. It addresses records by index through
//! [`RecordStore`] and learns about membership changes through
//! [`StoreChange`] notifications delivered by the host.

use std::borrow::Cow;
use std::fmt;

use crate::renderer::{ItemTemplate, SelectionProvider};

/// Ordered, randomly addressable record set with an exact count.
pub trait RecordStore {
    /// The record type.
    type Record;

    /// Number of records.
    fn count(&self) -> usize;

    /// Record at `index`, or `None` when out of range.
    fn record_at(&self, index: usize) -> Option<&Self::Record>;

    /// Group key of a record. Adjacent records sharing a key form a group.
    fn group_key_of<'a>(&'a self, record: &'a Self::Record) -> Cow<'a, str> {
        let _ = record;
        Cow::Borrowed("")
    }

    /// Group key of the record at `index`, empty when out of range.
    fn group_key_at(&self, index: usize) -> Cow<'_, str> {
        match self.record_at(index) {
            Some(record) => self.group_key_of(record),
            None => Cow::Borrowed(""),
        }
    }
}

/// Membership change reported by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreChange {
    /// `len` records inserted starting at `index`.
    Add { index: usize, len: usize },
    /// `len` records removed starting at `index`.
    Remove { index: usize, len: usize },
    /// The record at `index` changed in place.
    Update { index: usize },
    /// Every record was removed.
    Clear,
}

impl StoreChange {
    /// Returns true when the change can alter group boundaries or count.
    #[must_use]
    pub fn affects_membership(&self) -> bool {
        !matches!(self, Self::Update { .. })
    }
}

// ---------------------------------------------------------------------------
// VecStore
// ---------------------------------------------------------------------------

type Grouper<T> = Box<dyn Fn(&T) -> String>;

/// Owned store backed by a `Vec`, with an optional grouping function.
pub struct VecStore<T> {
    records: Vec<T>,
    grouper: Option<Grouper<T>>,
}

impl<T: fmt::Debug> fmt::Debug for VecStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecStore")
            .field("records", &self.records)
            .field("grouped", &self.grouper.is_some())
            .finish()
    }
}

impl<T> Default for VecStore<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> VecStore<T> {
    /// Create an ungrouped store.
    #[must_use]
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            grouper: None,
        }
    }

    /// Derive group keys with `grouper`.
    #[must_use]
    pub fn with_grouper(mut self, grouper: impl Fn(&T) -> String + 'static) -> Self {
        self.grouper = Some(Box::new(grouper));
        self
    }

    /// Borrow the records.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Insert records at `index` (clamped to the end) and describe the change.
    pub fn insert(&mut self, index: usize, records: impl IntoIterator<Item = T>) -> StoreChange {
        let index = index.min(self.records.len());
        let before = self.records.len();
        self.records.splice(index..index, records);
        StoreChange::Add {
            index,
            len: self.records.len() - before,
        }
    }

    /// Append records and describe the change.
    pub fn push(&mut self, records: impl IntoIterator<Item = T>) -> StoreChange {
        self.insert(self.records.len(), records)
    }

    /// Remove up to `len` records starting at `index` and describe the change.
    pub fn remove(&mut self, index: usize, len: usize) -> StoreChange {
        let start = index.min(self.records.len());
        let end = start.saturating_add(len).min(self.records.len());
        self.records.drain(start..end);
        if self.records.is_empty() {
            StoreChange::Clear
        } else {
            StoreChange::Remove {
                index: start,
                len: end - start,
            }
        }
    }

    /// Replace the record at `index`. Returns `None` when out of range.
    pub fn update(&mut self, index: usize, record: T) -> Option<StoreChange> {
        let slot = self.records.get_mut(index)?;
        *slot = record;
        Some(StoreChange::Update { index })
    }

    /// Remove every record.
    pub fn clear(&mut self) -> StoreChange {
        self.records.clear();
        StoreChange::Clear
    }
}

impl<T> RecordStore for VecStore<T> {
    type Record = T;

    fn count(&self) -> usize {
        self.records.len()
    }

    fn record_at(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    fn group_key_of<'a>(&'a self, record: &'a T) -> Cow<'a, str> {
        match &self.grouper {
            Some(grouper) => Cow::Owned(grouper(record)),
            None => Cow::Borrowed(""),
        }
    }
}

// ---------------------------------------------------------------------------
// ItemSource
// ---------------------------------------------------------------------------

/// The external collaborators an engine call needs: the store, the item
/// template, and an optional selection provider.
pub struct ItemSource<'a, S: RecordStore> {
    store: &'a S,
    template: &'a dyn ItemTemplate<S::Record>,
    selection: Option<&'a dyn SelectionProvider<S::Record>>,
}

impl<'a, S: RecordStore> ItemSource<'a, S> {
    /// Bundle a store with its item template.
    #[must_use]
    pub fn new(store: &'a S, template: &'a dyn ItemTemplate<S::Record>) -> Self {
        Self {
            store,
            template,
            selection: None,
        }
    }

    /// Attach a selection provider.
    #[must_use]
    pub fn with_selection(mut self, selection: &'a dyn SelectionProvider<S::Record>) -> Self {
        self.selection = Some(selection);
        self
    }

    /// The store.
    #[must_use]
    pub fn store(&self) -> &'a S {
        self.store
    }

    /// Number of records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Resolve a record by index.
    #[must_use]
    pub fn record(&self, index: usize) -> Option<&'a S::Record> {
        self.store.record_at(index)
    }

    /// The item template.
    #[must_use]
    pub fn template(&self) -> &'a dyn ItemTemplate<S::Record> {
        self.template
    }

    /// Whether `record` is currently selected.
    #[must_use]
    pub fn is_selected(&self, record: &S::Record) -> bool {
        self.selection
            .is_some_and(|selection| selection.is_selected(record))
    }
}
