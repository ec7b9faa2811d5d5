#![forbid(unsafe_code)]

//! Deferred window cleanup.
//!
//! Long incremental scroll sessions grow the window well past
//! `minimum_items`. Once scrolling stops, [`CleanupScheduler`] waits a short
//! delay and then asks the engine to collapse the window back with a full
//! replace. The delay matters: hosts report scroll end when the user merely
//! flicks the list for further scrolling, and a new scroll tick cancels the
//! pending cleanup.
//!
//! Time is passed in explicitly, so the host's event loop (or a test clock)
//! decides when [`CleanupScheduler::fire_if_due`] runs. At most one cleanup
//! is pending at any time; arming again replaces the deadline.

use std::time::Duration;

use web_time::Instant;

/// A cancelable one-shot deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayedTask {
    deadline: Option<Instant>,
}

impl DelayedTask {
    /// An unarmed task.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the task to fire `delay` after `now`.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Disarm the task.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether the task is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has passed at `now` (does not disarm).
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarm and return true if the deadline has passed at `now`.
    pub fn take_if_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Arms cleanup on scroll end and decides whether a due cleanup shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupScheduler {
    task: DelayedTask,
    delay: Duration,
    boundary: usize,
}

impl CleanupScheduler {
    /// Cleanup fires `delay` after scroll end and shrinks windows longer
    /// than `boundary`.
    #[must_use]
    pub const fn new(delay: Duration, boundary: usize) -> Self {
        Self {
            task: DelayedTask::new(),
            delay,
            boundary,
        }
    }

    /// Scroll ended: (re)arm.
    pub fn arm(&mut self, now: Instant) {
        self.task.arm(now, self.delay);
    }

    /// Scroll tick: cancel.
    pub fn cancel(&mut self) {
        self.task.cancel();
    }

    /// Whether a cleanup is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.task.is_armed()
    }

    /// The pending deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.task.deadline()
    }

    /// Whether a window of `window_len` records should be collapsed.
    #[must_use]
    pub const fn should_shrink(&self, window_len: usize) -> bool {
        window_len > self.boundary
    }

    /// Disarm and return true when the cleanup is due at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        self.task.take_if_due(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn fires_once_after_delay() {
        let t0 = Instant::now();
        let mut cleanup = CleanupScheduler::new(DELAY, 125);
        assert!(!cleanup.fire_if_due(t0 + DELAY));

        cleanup.arm(t0);
        assert!(cleanup.is_armed());
        assert!(!cleanup.fire_if_due(t0 + Duration::from_millis(249)));
        assert!(cleanup.fire_if_due(t0 + DELAY));
        assert!(!cleanup.is_armed());
        assert!(!cleanup.fire_if_due(t0 + DELAY * 4));
    }

    #[test]
    fn cancel_on_tick_prevents_firing() {
        let t0 = Instant::now();
        let mut cleanup = CleanupScheduler::new(DELAY, 125);
        cleanup.arm(t0);
        cleanup.cancel();
        assert!(!cleanup.fire_if_due(t0 + DELAY * 2));
    }

    #[test]
    fn rearm_replaces_deadline() {
        let t0 = Instant::now();
        let mut cleanup = CleanupScheduler::new(DELAY, 125);
        cleanup.arm(t0);
        cleanup.arm(t0 + Duration::from_millis(200));
        assert_eq!(cleanup.deadline(), Some(t0 + Duration::from_millis(450)));
        assert!(!cleanup.fire_if_due(t0 + Duration::from_millis(300)));
        assert!(cleanup.fire_if_due(t0 + Duration::from_millis(450)));
    }

    #[test]
    fn shrink_threshold_is_exclusive() {
        let cleanup = CleanupScheduler::new(DELAY, 125);
        assert!(!cleanup.should_shrink(125));
        assert!(cleanup.should_shrink(126));
        assert!(cleanup.should_shrink(149));
    }

    #[test]
    fn delayed_task_due_does_not_disarm() {
        let t0 = Instant::now();
        let mut task = DelayedTask::new();
        task.arm(t0, Duration::from_millis(100));
        assert!(task.is_due(t0 + Duration::from_millis(100)));
        assert!(task.is_armed());
        assert!(task.take_if_due(t0 + Duration::from_millis(100)));
        assert!(!task.is_armed());
    }
}
