#![forbid(unsafe_code)]

//! Cancellable trailing-edge debounce.
//!
//! [`Debouncer`] holds at most one deadline. Scheduling again pushes the
//! deadline out; polling after the deadline fires exactly once. The host
//! drives it by polling, so there is no background thread and nothing to
//! join on shutdown.
//!
//! All methods take `now` explicitly (the `_at` style) so behavior is
//! deterministic under a manual clock.

use std::time::{Duration, Instant};

/// A single pending deadline that restarts on every schedule.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
    disposed: bool,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            disposed: false,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the timer. Ignored once disposed.
    pub fn schedule_at(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.deadline = Some(now + self.delay);
    }

    /// Returns `true` once when the deadline has passed, clearing it.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending deadline, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Cancel and refuse every later schedule.
    pub fn dispose(&mut self) {
        self.deadline = None;
        self.disposed = true;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Time left before the deadline, `Duration::ZERO` if already due.
    #[must_use]
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.checked_duration_since(now).unwrap_or(Duration::ZERO))
    }
}
