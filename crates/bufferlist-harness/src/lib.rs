#![forbid(unsafe_code)]

//! Test harness for the buffered list.
//!
//! This crate provides:
//! - [`SimulatedHost`], an in-memory viewport with measured item nodes
//! - [`ManualClock`] for deterministic cleanup and selection-lock timing
//! - [`ScrollDriver`] to replay scroll gestures and settle timers
//!
//! The end-to-end suites live in `tests/`.

/// Deterministic time.
pub mod clock;
/// Gesture replay.
pub mod driver;
/// In-memory host.
pub mod sim_host;

pub use clock::ManualClock;
pub use driver::{FRAME, ScrollDriver, steps};
pub use sim_host::{HostOp, PinnedHeaderView, SimulatedHost};
