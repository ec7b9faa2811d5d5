#![forbid(unsafe_code)]

//! Scroll gestures and timer settling against a simulated host.
//!
//! A gesture is what a real viewport reports for one drag or fling: a scroll
//! start, a tick per frame, and a scroll end. Frames are 16ms apart on the
//! manual clock.

use std::time::Duration;

use bufferlist::{BufferedList, ItemSource, ListHost, RecordStore, ScrollOutcome};
use bufferlist_core::Px;

use crate::clock::ManualClock;
use crate::sim_host::SimulatedHost;

/// Simulated frame interval.
pub const FRAME: Duration = Duration::from_millis(16);

const SETTLE_ROUNDS: usize = 8;

/// Positions from `from` to `to` in steps of at most `step`, ending exactly
/// at `to`. `from` itself is not included.
#[must_use]
pub fn steps(from: Px, to: Px, step: Px) -> Vec<Px> {
    let step = step.abs().max(1);
    let mut positions = Vec::new();
    let mut y = from;
    while y != to {
        y = if to > y {
            (y + step).min(to)
        } else {
            (y - step).max(to)
        };
        positions.push(y);
    }
    positions
}

/// Drives one list through gestures.
pub struct ScrollDriver<'c> {
    clock: &'c mut ManualClock,
}

impl<'c> ScrollDriver<'c> {
    #[must_use]
    pub fn new(clock: &'c mut ManualClock) -> Self {
        Self { clock }
    }

    /// One gesture through `positions`. Returns the outcome of every tick.
    pub fn gesture<S: RecordStore>(
        &mut self,
        list: &mut BufferedList<SimulatedHost>,
        source: &ItemSource<'_, S>,
        positions: impl IntoIterator<Item = Px>,
    ) -> Vec<ScrollOutcome> {
        list.on_scroll_start();
        let mut outcomes = Vec::new();
        for y in positions {
            list.host_mut().scroll_user_to(y);
            outcomes.push(list.on_scroll(source));
            self.clock.advance(FRAME);
        }
        list.on_scroll_end(self.clock.now());
        outcomes
    }

    /// A gesture from the current position to `to`.
    pub fn scroll_to<S: RecordStore>(
        &mut self,
        list: &mut BufferedList<SimulatedHost>,
        source: &ItemSource<'_, S>,
        to: Px,
        step: Px,
    ) -> Vec<ScrollOutcome> {
        let from = list.host().scroll_position();
        self.gesture(list, source, steps(from, to, step))
    }

    /// Run pending timers until none is left. Returns true when a cleanup
    /// collapsed the window. A suspended list re-arms its cleanup, so the
    /// number of rounds is bounded.
    pub fn settle<S: RecordStore>(
        &mut self,
        list: &mut BufferedList<SimulatedHost>,
        source: &ItemSource<'_, S>,
    ) -> bool {
        let mut collapsed = false;
        for _ in 0..SETTLE_ROUNDS {
            let Some(deadline) = list.next_deadline() else {
                break;
            };
            let now = self.clock.advance_to(deadline);
            collapsed |= list.poll_timers(source, now);
        }
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_end_exactly_at_target() {
        assert_eq!(steps(0, 250, 100), vec![100, 200, 250]);
        assert_eq!(steps(250, 0, 100), vec![150, 50, 0]);
        assert!(steps(40, 40, 10).is_empty());
        assert_eq!(steps(0, 3, 0), vec![1, 2, 3]);
    }
}
