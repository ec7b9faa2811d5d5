#![forbid(unsafe_code)]

//! Deterministic time for timer-driven tests.
//!
//! The engine never reads the clock itself; every timer-aware call takes a
//! `now`. [`ManualClock`] produces those instants from a fixed origin and
//! only moves when told to.

use std::time::Duration;

use web_time::Instant;

/// A clock that advances only on request.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Duration,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Start at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// The current simulated instant.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    /// Time since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Move forward by `by`.
    pub fn advance(&mut self, by: Duration) -> Instant {
        self.elapsed += by;
        self.now()
    }

    /// Move forward by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) -> Instant {
        self.advance(Duration::from_millis(ms))
    }

    /// Move forward to `deadline`, or stay put if it already passed.
    pub fn advance_to(&mut self, deadline: Instant) -> Instant {
        if deadline > self.now() {
            self.elapsed += deadline - self.now();
        }
        self.now()
    }
}
