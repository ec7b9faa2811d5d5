#![forbid(unsafe_code)]

//! Windowing engine for scrollable lists over large record sets.
//!
//! This crate provides:
//! - [`BufferedList`], which keeps a bounded window of records materialized
//!   in a host and slides it as the user scrolls
//! - [`GroupIndex`] for group headers, the pinned header and jump bars
//! - [`ListHost`] and [`RecordStore`], the seams to the UI and the data
//!
//! The host owns item nodes and the viewport; the engine only decides which
//! records exist as nodes and how large the placeholders around them are.

/// Deferred window cleanup after scrolling stops.
pub mod cleanup;
/// Engine configuration and its errors.
pub mod config;
/// Group index and jump table.
pub mod group_index;
/// Host capability interface.
pub mod host;
/// The composition root.
pub mod list;
/// Pinned group header.
pub mod pinned_header;
/// Placeholder extents.
pub mod proxy;
/// Item rendering.
pub mod renderer;
/// Record store seam.
pub mod store;
/// Window decisions and realization.
pub mod window;

#[cfg(test)]
mod testing;

pub use cleanup::{CleanupScheduler, DelayedTask};
pub use config::{ConfigError, ListConfig, SelectTrigger};
pub use group_index::{GroupEntry, GroupIndex, JumpTable};
pub use host::{HeaderOp, ListHost};
pub use list::{BufferedList, ListEvent, ScrollOutcome};
pub use pinned_header::{HeaderAnchor, HeaderPinner};
pub use proxy::{ProxyHeights, ProxyModel};
pub use renderer::{
    ItemFlags, ItemRenderer, ItemTemplate, RenderedBatch, RenderedItem, SelectionProvider,
};
pub use store::{ItemSource, RecordStore, StoreChange, VecStore};
pub use window::{Phase, ScrollSnapshot, Window, WindowDecision, WindowManager, WindowState};

pub use bufferlist_core::{ItemExtent, ItemGesture, Px, ScrollDirection, SwipeDirection};
