#![forbid(unsafe_code)]

//! Group index and alphabetic jump table.
//!
//! [`GroupIndex::build`] makes one forward scan over the store and records,
//! for every group key in order of first appearance, the index of its first
//! record and a link to the group before it. When a jump alphabet is given
//! the same scan fills a [`JumpTable`] mapping every symbol to a record index.
//!
//! # Invariants
//!
//! 1. Group start indices strictly increase in discovery order.
//! 2. After a build over a non-empty store every alphabet symbol maps to an
//!    index in `[0, count)`.
//!
//! # Jump-table fill rule
//!
//! Each record's symbol is the first grapheme of its group key, uppercased,
//! or the first alphabet symbol when that is not in the alphabet. The first
//! time a symbol is seen, every still-unset symbol before it in the alphabet
//! points at the previous record, and the symbol itself points at the current
//! record. Symbols never seen after the scan point at the last record.
//!
//! Rebuilding is O(n), so callers rebuild on membership changes only.

use std::borrow::Cow;

use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::store::RecordStore;

/// One group discovered during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    /// Group key.
    pub key: String,
    /// Index of the first record in the group.
    pub start_index: usize,
    /// Position of the preceding group in [`GroupIndex::groups`].
    pub previous: Option<usize>,
}

/// Mapping from jump symbols to record indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    symbols: Vec<String>,
    targets: Vec<usize>,
    positions: FxHashMap<String, usize>,
}

impl JumpTable {
    /// Record index for `symbol`; the lookup is case-insensitive.
    #[must_use]
    pub fn target(&self, symbol: &str) -> Option<usize> {
        let upper = symbol.to_uppercase();
        self.positions.get(&upper).map(|&pos| self.targets[pos])
    }

    /// The alphabet, in order.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// `(symbol, target)` pairs in alphabet order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.symbols
            .iter()
            .map(String::as_str)
            .zip(self.targets.iter().copied())
    }
}

/// Group key to record-range index, with an optional jump table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupIndex {
    groups: Vec<GroupEntry>,
    by_key: FxHashMap<String, usize>,
    jump: Option<JumpTable>,
    record_count: usize,
}

impl GroupIndex {
    /// Scan `store` once. An empty `alphabet` builds no jump table.
    #[must_use]
    pub fn build<S: RecordStore>(store: &S, alphabet: &[String]) -> Self {
        let count = store.count();
        let mut groups: Vec<GroupEntry> = Vec::new();
        let mut by_key: FxHashMap<String, usize> = FxHashMap::default();
        let mut filler = (!alphabet.is_empty()).then(|| JumpFiller::new(alphabet));

        for index in 0..count {
            let key = store.group_key_at(index);
            if !by_key.contains_key(key.as_ref()) {
                let ordinal = groups.len();
                by_key.insert(key.clone().into_owned(), ordinal);
                groups.push(GroupEntry {
                    key: key.clone().into_owned(),
                    start_index: index,
                    previous: ordinal.checked_sub(1),
                });
            }
            if let Some(filler) = filler.as_mut() {
                filler.observe(&key, index);
            }
        }

        let jump = filler.filter(|_| count > 0).map(|f| f.finish(count));
        tracing::debug!(
            records = count,
            groups = groups.len(),
            jump_symbols = alphabet.len(),
            "group index rebuilt"
        );
        Self {
            groups,
            by_key,
            jump,
            record_count: count,
        }
    }

    /// Number of records the index was built over.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Groups in discovery order.
    #[must_use]
    pub fn groups(&self) -> &[GroupEntry] {
        &self.groups
    }

    /// The jump table, if an alphabet was supplied.
    #[must_use]
    pub fn jump_table(&self) -> Option<&JumpTable> {
        self.jump.as_ref()
    }

    /// Group entry for `key`.
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&GroupEntry> {
        self.by_key.get(key).map(|&ordinal| &self.groups[ordinal])
    }

    /// First record index of group `key`.
    #[must_use]
    pub fn group_start_index(&self, key: &str) -> Option<usize> {
        self.group(key).map(|entry| entry.start_index)
    }

    /// Key of the group before `key`. `None` for the first group or an
    /// unknown key.
    #[must_use]
    pub fn previous_group(&self, key: &str) -> Option<&str> {
        let previous = self.group(key)?.previous?;
        Some(self.groups[previous].key.as_str())
    }

    /// `key` itself when it names a group; otherwise the group its jump
    /// symbol lands in.
    #[must_use]
    pub fn closest_group(&self, key: &str) -> Option<&str> {
        if let Some(entry) = self.group(key) {
            return Some(entry.key.as_str());
        }
        let jump = self.jump.as_ref()?;
        let symbol = jump_symbol(key, &jump.symbols);
        let target = jump.target(symbol)?;
        self.group_containing(target).map(|entry| entry.key.as_str())
    }

    /// The group whose range contains record `index`.
    #[must_use]
    pub fn group_containing(&self, index: usize) -> Option<&GroupEntry> {
        if index >= self.record_count {
            return None;
        }
        let pos = self
            .groups
            .partition_point(|entry| entry.start_index <= index);
        pos.checked_sub(1).map(|ordinal| &self.groups[ordinal])
    }
}

/// Jump symbol for a group key: its first grapheme uppercased, or the first
/// alphabet symbol when that is not part of the alphabet.
#[must_use]
pub fn jump_symbol<'a>(key: &str, alphabet: &'a [String]) -> &'a str {
    let first: Cow<'_, str> = match key.graphemes(true).next() {
        Some(g) => Cow::Owned(g.to_uppercase()),
        None => Cow::Borrowed(""),
    };
    alphabet
        .iter()
        .find(|symbol| symbol.as_str() == first)
        .or_else(|| alphabet.first())
        .map_or("", String::as_str)
}

// ---------------------------------------------------------------------------
// Jump table construction
// ---------------------------------------------------------------------------

struct JumpFiller<'a> {
    alphabet: &'a [String],
    positions: FxHashMap<String, usize>,
    targets: Vec<Option<usize>>,
    cursor: usize,
}

impl<'a> JumpFiller<'a> {
    fn new(alphabet: &'a [String]) -> Self {
        let mut positions = FxHashMap::default();
        for (pos, symbol) in alphabet.iter().enumerate() {
            positions.entry(symbol.to_uppercase()).or_insert(pos);
        }
        Self {
            alphabet,
            positions,
            targets: vec![None; alphabet.len()],
            cursor: 0,
        }
    }

    fn observe(&mut self, key: &str, index: usize) {
        let symbol = jump_symbol(key, self.alphabet);
        let Some(&pos) = self.positions.get(&symbol.to_uppercase()) else {
            return;
        };
        if self.targets[pos].is_some() {
            return;
        }
        if pos >= self.cursor {
            let previous = index.saturating_sub(1);
            for slot in &mut self.targets[self.cursor..pos] {
                slot.get_or_insert(previous);
            }
            self.cursor = pos + 1;
        }
        self.targets[pos] = Some(index);
    }

    fn finish(self, count: usize) -> JumpTable {
        let last = count.saturating_sub(1);
        JumpTable {
            symbols: self.alphabet.to_vec(),
            targets: self
                .targets
                .into_iter()
                .map(|target| target.unwrap_or(last))
                .collect(),
            positions: self.positions,
        }
    }
}
