#![forbid(unsafe_code)]

//! Core: pixel geometry, item gestures, and logging for the buffered list.
//!
//! # Role in bufferlist
//! `bufferlist-core` is the input layer. It owns the small vocabulary shared
//! by the windowing engine and any host that embeds it: pixel offsets and
//! extents, scroll direction, and the gestures a host reports against a
//! materialized list item.
//!
//! # How it fits in the system
//! The engine (`bufferlist`) consumes [`gesture::ItemGesture`] values and
//! [`geometry::Px`] measurements from its host and never talks to a concrete
//! UI toolkit, so this crate stays free of rendering concerns.

pub mod geometry;
pub mod gesture;
pub mod logging;

pub use geometry::{ItemExtent, Px, ScrollDirection};
pub use gesture::{ItemGesture, SwipeDirection};
