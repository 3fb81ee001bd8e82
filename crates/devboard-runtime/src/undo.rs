#![forbid(unsafe_code)]

//! Bounded snapshot history for undo/redo.
//!
//! The history stores whole snapshots rather than inverse operations. The
//! caller hands in the *current* snapshot on every undo/redo so the history
//! never needs to know what the live document looks like.
//!
//! # Invariants
//!
//! 1. `undo_depth() <= config.max_depth` at all times.
//! 2. Pushing at capacity evicts exactly one entry, the oldest.
//! 3. Every push clears the redo side.
//! 4. `undo` then `redo` (with the returned snapshot as current) restores the
//!    original current snapshot, and vice versa.
//!
//! # Failure Modes
//!
//! | Call | Condition | Behavior |
//! |------|-----------|----------|
//! | `undo` | nothing to undo | `None`, state unchanged |
//! | `redo` | nothing to redo | `None`, state unchanged |
//! | `push` | `max_depth == 0` | entry dropped, history stays empty |

use std::fmt;

/// Default number of undo steps kept.
pub const MAX_HISTORY: usize = 50;

/// Configuration for [`SnapshotHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of snapshots on the undo side.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_HISTORY,
        }
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Linear undo/redo history over snapshots of type `T`.
#[derive(Clone)]
pub struct SnapshotHistory<T> {
    past: Vec<T>,
    /// Top of the stack is the next redo.
    future: Vec<T>,
    config: HistoryConfig,
}

impl<T> Default for SnapshotHistory<T> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<T> SnapshotHistory<T> {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    /// Record `snapshot` as the state before an edit.
    pub fn push(&mut self, snapshot: T) {
        self.past.push(snapshot);
        self.trim_past();
        self.future.clear();
        tracing::debug!(depth = self.past.len(), "history push");
    }

    /// Step back. `current` moves to the redo side; the returned snapshot is
    /// the state to restore.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.past.pop()?;
        self.future.push(current);
        tracing::debug!(
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "history undo"
        );
        Some(previous)
    }

    /// Step forward. `current` moves back to the undo side, subject to the
    /// same bound as [`push`](Self::push).
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.future.pop()?;
        self.past.push(current);
        self.trim_past();
        tracing::debug!(
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "history redo"
        );
        Some(next)
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    fn trim_past(&mut self) {
        while self.past.len() > self.config.max_depth {
            self.past.remove(0);
        }
    }
}

impl<T> fmt::Debug for SnapshotHistory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotHistory")
            .field("undo_depth", &self.past.len())
            .field("redo_depth", &self.future.len())
            .field("max_depth", &self.config.max_depth)
            .finish()
    }
}
