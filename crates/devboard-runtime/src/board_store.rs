#![forbid(unsafe_code)]

//! The board persistence layer.
//!
//! [`BoardStore`] owns one board and everything that keeps it durable and
//! undoable: the snapshot history, the last recorded content snapshot, the
//! storage backend and the autosave debouncer.
//!
//! # Lifecycle
//!
//! ```text
//!   open ──▶ restore from storage (no autosave)
//!              │
//!              ▼
//!   update_board / set_board / set_viewport / undo / redo / reset
//!              │ (re)schedule autosave
//!              ▼
//!   tick ──▶ write when the debounce deadline has passed
//!              │
//!   dispose ──▶ pending write cancelled, nothing is written afterwards
//! ```
//!
//! # Invariants
//!
//! 1. The recorded snapshot always equals the content of the live board.
//! 2. History is only pushed by content changes through `update_board`,
//!    always with the snapshot from *before* the change.
//! 3. Viewport changes never reach history.
//! 4. Undo and redo keep the current viewport.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Stored board absent, malformed or too new | Fresh empty board, `warn!` for bad data |
//! | Storage read or write error | Logged at `warn!`, swallowed |
//! | Import rejected | `stage_import` returns `false`, state untouched |
//! | Explicit save fails | `try_flush` returns the [`StorageError`] |

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use devboard_board::{BoardDocument, ContentSnapshot, parse_stored_value};
use devboard_core::viewport::Viewport;

use crate::clock::Clock;
use crate::debounce::Debouncer;
use crate::storage::{StorageBackend, StorageError, StorageResult};
use crate::transfer::{
    ExportArtifact, ImportError, MAX_IMPORT_BYTES, export_board, try_import_from_slice,
};
use crate::undo::{HistoryConfig, MAX_HISTORY, SnapshotHistory};

/// Default autosave delay.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// Configuration for a [`BoardStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Quiet period after the last change before the board is written.
    pub autosave_delay: Duration,
    /// Undo depth.
    pub max_history: usize,
    /// Ceiling for staged imports.
    pub max_import_bytes: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            autosave_delay: AUTOSAVE_DELAY,
            max_history: MAX_HISTORY,
            max_import_bytes: MAX_IMPORT_BYTES,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_history(mut self, depth: usize) -> Self {
        self.max_history = depth;
        self
    }

    #[must_use]
    pub fn with_max_import_bytes(mut self, bytes: u64) -> Self {
        self.max_import_bytes = bytes;
        self
    }

    /// Defaults overlaid with `DEVBOARD_AUTOSAVE_MS`, `DEVBOARD_MAX_HISTORY`
    /// and `DEVBOARD_MAX_IMPORT_BYTES`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    /// Unparseable values are ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(ms) = parse_var::<u64>(&lookup, "DEVBOARD_AUTOSAVE_MS") {
            config.autosave_delay = Duration::from_millis(ms);
        }
        if let Some(depth) = parse_var::<usize>(&lookup, "DEVBOARD_MAX_HISTORY") {
            config.max_history = depth;
        }
        if let Some(bytes) = parse_var::<u64>(&lookup, "DEVBOARD_MAX_IMPORT_BYTES") {
            config.max_import_bytes = bytes;
        }
        config
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

/// One board with history, autosave and import/export.
pub struct BoardStore<B: BoardDocument> {
    board: B,
    recorded: ContentSnapshot<B>,
    history: SnapshotHistory<ContentSnapshot<B>>,
    storage: Arc<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    autosave: Debouncer,
    pending_import: Option<B>,
    config: StoreConfig,
}

impl<B: BoardDocument> BoardStore<B> {
    /// Storage key for this board kind.
    pub const STORAGE_KEY: &'static str = B::KIND.storage_key();

    /// Restore the board from `storage`, or start with an empty one.
    ///
    /// Restoring does not schedule an autosave.
    pub fn open(
        storage: Arc<dyn StorageBackend>,
        clock: impl Clock + 'static,
        config: StoreConfig,
    ) -> Self {
        let board = restore::<B>(storage.as_ref()).unwrap_or_else(B::empty);
        let recorded = ContentSnapshot::capture(&board);
        Self {
            board,
            recorded,
            history: SnapshotHistory::new(
                HistoryConfig::default().with_max_depth(config.max_history),
            ),
            storage,
            clock: Box::new(clock),
            autosave: Debouncer::new(config.autosave_delay),
            pending_import: None,
            config,
        }
    }

    #[must_use]
    pub fn board(&self) -> &B {
        &self.board
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.board.viewport()
    }

    #[must_use]
    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Apply a content edit.
    ///
    /// If the content differs from the recorded snapshot, the recorded
    /// snapshot is pushed onto history first. Autosave is scheduled either
    /// way since the viewport may have changed.
    pub fn update_board(&mut self, board: B) {
        let next = ContentSnapshot::capture(&board);
        if next != self.recorded {
            let previous = std::mem::replace(&mut self.recorded, next);
            self.history.push(previous);
        }
        self.board = board;
        self.schedule_autosave();
    }

    /// Replace the board without recording history.
    ///
    /// Meant for viewport-only changes. Content changed this way becomes the
    /// new baseline and cannot be undone.
    pub fn set_board(&mut self, board: B) {
        self.recorded = ContentSnapshot::capture(&board);
        self.board = board;
        self.schedule_autosave();
    }

    /// Store a new viewport. Never touches history.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.board.viewport() == viewport {
            return;
        }
        self.board.set_viewport(viewport);
        self.schedule_autosave();
    }

    /// Replace the viewport without scheduling an autosave.
    ///
    /// For normalising a restored viewport, e.g. clamping its zoom. The
    /// adjusted viewport is written with the next real change.
    pub fn restore_viewport(&mut self, viewport: Viewport) {
        self.board.set_viewport(viewport);
    }

    /// Restore the previous content, keeping the current viewport.
    pub fn undo(&mut self) -> bool {
        let current = self.recorded.clone();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.restore_snapshot(previous);
        true
    }

    /// Re-apply undone content, keeping the current viewport.
    pub fn redo(&mut self) -> bool {
        let current = self.recorded.clone();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore_snapshot(next);
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history(&self) -> &SnapshotHistory<ContentSnapshot<B>> {
        &self.history
    }

    /// Export the board stamped with `exported_at`.
    pub fn export_json(&self, exported_at: DateTime<Utc>) -> serde_json::Result<ExportArtifact> {
        export_board(&self.board, exported_at)
    }

    /// Export the board stamped with the store's clock.
    pub fn export_json_now(&self) -> serde_json::Result<ExportArtifact> {
        self.export_json(self.clock.wall_now())
    }

    /// Validate `bytes` as an export and hold the board for confirmation.
    ///
    /// On failure the current board and any previously staged import are
    /// left as they were.
    pub fn stage_import(&mut self, bytes: &[u8]) -> bool {
        self.try_stage_import(bytes)
            .map_err(|error| tracing::warn!(kind = %B::KIND, %error, "import rejected"))
            .is_ok()
    }

    /// [`stage_import`](Self::stage_import) reporting why an import was
    /// refused.
    pub fn try_stage_import(&mut self, bytes: &[u8]) -> Result<(), ImportError> {
        let board = try_import_from_slice::<B>(bytes, self.config.max_import_bytes)?;
        tracing::debug!(kind = %B::KIND, id = board.id(), "import staged");
        self.pending_import = Some(board);
        Ok(())
    }

    #[must_use]
    pub fn pending_import(&self) -> Option<&B> {
        self.pending_import.as_ref()
    }

    /// Replace the board with the staged import. The replacement is an
    /// ordinary edit and can be undone.
    pub fn confirm_import(&mut self) -> bool {
        let Some(board) = self.pending_import.take() else {
            return false;
        };
        self.update_board(board);
        true
    }

    /// Drop the staged import. Returns whether one was staged.
    pub fn cancel_import(&mut self) -> bool {
        self.pending_import.take().is_some()
    }

    /// Replace the board with a fresh empty one and forget history.
    pub fn reset(&mut self) {
        self.board = B::empty();
        self.recorded = ContentSnapshot::capture(&self.board);
        self.history.clear();
        self.pending_import = None;
        tracing::debug!(kind = %B::KIND, "board reset");
        self.schedule_autosave();
    }

    /// Write if the autosave deadline has passed. Returns whether a write
    /// succeeded.
    pub fn tick(&mut self) -> bool {
        self.tick_at(self.clock.now())
    }

    /// [`tick`](Self::tick) at an explicit instant.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.autosave.poll_at(now) {
            self.save_now()
        } else {
            false
        }
    }

    /// Write immediately, cancelling any pending autosave.
    pub fn flush(&mut self) -> bool {
        if self.autosave.is_disposed() {
            return false;
        }
        self.autosave.cancel();
        self.save_now()
    }

    /// Write immediately, returning the failure instead of logging it.
    pub fn try_flush(&mut self) -> StorageResult<()> {
        if self.autosave.is_disposed() {
            return Err(StorageError::Unavailable("board store is disposed".into()));
        }
        self.autosave.cancel();
        let bytes = self.write_board()?;
        tracing::debug!(kind = %B::KIND, backend = self.storage.name(), bytes, "board saved");
        Ok(())
    }

    /// Time until the pending autosave is due.
    #[must_use]
    pub fn autosave_due_in(&self) -> Option<Duration> {
        self.autosave.time_until_fire(self.clock.now())
    }

    #[must_use]
    pub fn is_autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Cancel the pending autosave. Nothing is written after this.
    pub fn dispose(&mut self) {
        self.autosave.dispose();
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.autosave.is_disposed()
    }

    fn restore_snapshot(&mut self, snapshot: ContentSnapshot<B>) {
        let viewport = self.board.viewport();
        self.recorded = snapshot.clone();
        self.board = snapshot.into_board(viewport);
        self.schedule_autosave();
    }

    fn schedule_autosave(&mut self) {
        self.autosave.schedule_at(self.clock.now());
    }

    fn write_board(&self) -> StorageResult<usize> {
        let json = serde_json::to_string(&self.board)?;
        self.storage.save(Self::STORAGE_KEY, &json)?;
        Ok(json.len())
    }

    fn save_now(&self) -> bool {
        match self.write_board() {
            Ok(bytes) => {
                tracing::debug!(
                    kind = %B::KIND,
                    backend = self.storage.name(),
                    bytes,
                    "board saved"
                );
                true
            }
            Err(error) => {
                tracing::warn!(
                    kind = %B::KIND,
                    backend = self.storage.name(),
                    %error,
                    "autosave failed"
                );
                false
            }
        }
    }
}

fn restore<B: BoardDocument>(storage: &dyn StorageBackend) -> Option<B> {
    let key = B::KIND.storage_key();
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(kind = %B::KIND, "no stored board");
            return None;
        }
        Err(error) => {
            tracing::warn!(kind = %B::KIND, backend = storage.name(), %error, "could not read stored board");
            return None;
        }
    };
    let value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(kind = %B::KIND, %error, "stored board is not JSON");
            return None;
        }
    };
    let board = parse_stored_value::<B>(value)?;
    tracing::debug!(kind = %B::KIND, id = board.id(), "restored board");
    Some(board)
}

impl<B: BoardDocument> fmt::Debug for BoardStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardStore")
            .field("kind", &B::KIND)
            .field("board_id", &self.board.id())
            .field("history", &self.history)
            .field("backend", &self.storage.name())
            .field("autosave_pending", &self.autosave.is_pending())
            .field("pending_import", &self.pending_import.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;
    use devboard_board::{DomainModelingBoard, EventStormingBoard, Flow, StoryMappingBoard};
    use devboard_core::geometry::Point;

    fn store_with(storage: Arc<MemoryStorage>) -> (BoardStore<EventStormingBoard>, ManualClock) {
        let clock = ManualClock::default();
        let store = BoardStore::open(storage, clock.clone(), StoreConfig::default());
        (store, clock)
    }

    fn with_flow(board: &EventStormingBoard, name: &str) -> EventStormingBoard {
        let mut next = board.clone();
        next.add_flow(Flow::new(name, Point::ZERO));
        next
    }

    #[test]
    fn opens_empty_without_scheduling() {
        let storage = Arc::new(MemoryStorage::new());
        let (store, _) = store_with(storage.clone());
        assert!(store.board().flows.is_empty());
        assert!(!store.is_autosave_pending());
        assert!(!store.can_undo());
        assert_eq!(storage.load(BoardStore::<EventStormingBoard>::STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn restores_stored_board() {
        let storage = Arc::new(MemoryStorage::new());
        let mut board = EventStormingBoard::empty();
        board.add_flow(Flow::new("Saved", Point::ZERO));
        storage
            .save("devboard.event-storming", &serde_json::to_string(&board).unwrap())
            .unwrap();
        let (store, _) = store_with(storage);
        assert_eq!(store.board(), &board);
        assert!(!store.is_autosave_pending());
    }

    #[test]
    fn malformed_or_future_storage_falls_back_to_empty() {
        for raw in [
            "{oops",
            r#"{"flows":[],"connections":[]}"#,
            r#"{"id":"b","version":99,"flows":[],"connections":[]}"#,
        ] {
            let storage = Arc::new(MemoryStorage::new());
            storage.save("devboard.event-storming", raw).unwrap();
            let (store, _) = store_with(storage);
            assert!(store.board().flows.is_empty(), "input: {raw}");
            assert_eq!(store.board().name, "Event Storming");
        }
    }

    #[test]
    fn content_edit_pushes_previous_snapshot() {
        let (mut store, _) = store_with(Arc::new(MemoryStorage::new()));
        let original = store.board().clone();
        store.update_board(with_flow(&original, "A"));
        assert!(store.can_undo());
        assert!(store.undo());
        assert_eq!(store.board(), &original);
        assert!(store.redo());
        assert_eq!(store.board().flows.len(), 1);
    }

    #[test]
    fn unchanged_content_records_nothing() {
        let (mut store, _) = store_with(Arc::new(MemoryStorage::new()));
        let same = store.board().clone();
        store.update_board(same);
        assert!(!store.can_undo());
        assert!(store.is_autosave_pending());
    }

    #[test]
    fn viewport_changes_never_create_history() {
        let (mut store, _) = store_with(Arc::new(MemoryStorage::new()));
        store.set_viewport(Viewport::new(10.0, 10.0, 1.5));
        let mut moved = store.board().clone();
        moved.viewport = Viewport::new(-5.0, 0.0, 0.5);
        store.update_board(moved.clone());
        store.set_board(moved);
        assert!(!store.can_undo());
        assert_eq!(store.viewport(), Viewport::new(-5.0, 0.0, 0.5));
    }

    #[test]
    fn undo_keeps_current_viewport() {
        let (mut store, _) = store_with(Arc::new(MemoryStorage::new()));
        let edited = with_flow(store.board(), "A");
        store.update_board(edited);
        let vp = Viewport::new(120.0, 40.0, 1.2);
        store.set_viewport(vp);
        assert!(store.undo());
        assert!(store.board().flows.is_empty());
        assert_eq!(store.viewport(), vp);
    }

    #[test]
    fn edit_after_undo_clears_redo() {
        let (mut store, _) = store_with(Arc::new(MemoryStorage::new()));
        let a = with_flow(store.board(), "A");
        store.update_board(a);
        store.undo();
        assert!(store.can_redo());
        let b = with_flow(store.board(), "B");
        store.update_board(b);
        assert!(!store.can_redo());
        assert_eq!(store.history().undo_depth(), 1);
    }

    #[test]
    fn autosave_waits_for_quiet_period() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut store, clock) = store_with(storage.clone());
        let key = BoardStore::<EventStormingBoard>::STORAGE_KEY;

        let edited = with_flow(store.board(), "A");
        store.update_board(edited);
        clock.advance(Duration::from_millis(300));
        assert!(!store.tick());
        let edited = with_flow(store.board(), "B");
        store.update_board(edited);
        clock.advance(Duration::from_millis(300));
        assert!(!store.tick());
        assert_eq!(storage.load(key).unwrap(), None);

        clock.advance(Duration::from_millis(200));
        assert!(store.tick());
        let saved: EventStormingBoard =
            serde_json::from_str(&storage.load(key).unwrap().unwrap()).unwrap();
        assert_eq!(&saved, store.board());
        assert!(!store.tick());
    }

    #[test]
    fn dispose_cancels_pending_write() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut store, clock) = store_with(storage.clone());
        let edited = with_flow(store.board(), "A");
        store.update_board(edited);
        store.dispose();
        clock.advance(Duration::from_secs(5));
        assert!(!store.tick());
        let edited = with_flow(store.board(), "B");
        store.update_board(edited);
        clock.advance(Duration::from_secs(5));
        assert!(!store.tick());
        assert!(!store.flush());
        assert_eq!(storage.load("devboard.event-storming").unwrap(), None);
    }

    #[test]
    fn flush_writes_immediately() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut store, _) = store_with(storage.clone());
        store.set_viewport(Viewport::new(1.0, 2.0, 1.0));
        assert!(store.flush());
        assert!(!store.is_autosave_pending());
        assert!(storage.load("devboard.event-storming").unwrap().is_some());
    }

    #[test]
    fn quota_failure_is_swallowed() {
        let storage = Arc::new(MemoryStorage::with_quota(16));
        let (mut store, clock) = store_with(storage.clone());
        let edited = with_flow(store.board(), "A");
        store.update_board(edited.clone());
        clock.advance(AUTOSAVE_DELAY);
        assert!(!store.tick());
        assert_eq!(store.board(), &edited);
        assert_eq!(storage.used_bytes(), 0);
    }

    #[test]
    fn reset_clears_history_and_schedules() {
        let (mut store, _) = store_with(Arc::new(MemoryStorage::new()));
        let old_id = store.board().id.clone();
        let edited = with_flow(store.board(), "A");
        store.update_board(edited);
        store.reset();
        assert!(!store.can_undo());
        assert!(store.board().flows.is_empty());
        assert_ne!(store.board().id, old_id);
        assert!(store.is_autosave_pending());
    }

    #[test]
    fn staged_import_is_confirmed_as_undoable_edit() {
        let (mut store, clock) = store_with(Arc::new(MemoryStorage::new()));
        let mut incoming = EventStormingBoard::empty();
        incoming.name = "Imported".into();
        incoming.add_flow(Flow::new("X", Point::ZERO));
        let artifact = export_board(&incoming, clock.wall_now()).unwrap();

        assert!(store.stage_import(artifact.contents.as_bytes()));
        assert_eq!(store.pending_import().map(|b| b.name.as_str()), Some("Imported"));
        assert_eq!(store.board().name, "Event Storming");

        assert!(store.confirm_import());
        assert_eq!(store.board(), &incoming);
        assert!(store.pending_import().is_none());
        assert!(store.undo());
        assert_eq!(store.board().name, "Event Storming");
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let clock = ManualClock::default();
        let config = StoreConfig::default().with_max_import_bytes(64);
        let mut store: BoardStore<EventStormingBoard> =
            BoardStore::open(Arc::new(MemoryStorage::new()), clock, config);
        let before = store.board().clone();

        assert!(!store.stage_import(&vec![b' '; 65]));
        assert!(!store.stage_import(b"not json"));
        assert!(!store.stage_import(br#"{"version":1,"board":{}}"#));
        assert!(store.pending_import().is_none());
        assert!(!store.confirm_import());
        assert!(!store.cancel_import());
        assert_eq!(store.board(), &before);
        assert!(!store.can_undo());
        assert!(!store.is_autosave_pending());
    }

    #[test]
    fn default_import_ceiling_is_ten_mebibytes() {
        assert_eq!(MAX_IMPORT_BYTES, 10 * 1024 * 1024);
        let (mut store, clock) = store_with(Arc::new(MemoryStorage::new()));
        assert_eq!(store.config().max_import_bytes, MAX_IMPORT_BYTES);
        let before = store.board().clone();

        let mut incoming = EventStormingBoard::empty();
        incoming.name = "Padded".into();
        let mut exact = export_board(&incoming, clock.wall_now()).unwrap().contents.into_bytes();
        exact.resize(usize::try_from(MAX_IMPORT_BYTES).unwrap(), b' ');
        let mut over = exact.clone();
        over.push(b' ');

        assert!(matches!(
            store.try_stage_import(&over),
            Err(ImportError::TooLarge { size, limit })
                if size == MAX_IMPORT_BYTES + 1 && limit == MAX_IMPORT_BYTES
        ));
        assert!(!store.stage_import(&over));
        assert!(store.pending_import().is_none());
        assert_eq!(store.board(), &before);

        assert!(store.stage_import(&exact));
        assert_eq!(store.pending_import().map(|b| b.name.as_str()), Some("Padded"));
        assert_eq!(store.board(), &before);
    }

    #[test]
    fn restored_viewport_adjustment_does_not_schedule() {
        let (mut store, _) = store_with(Arc::new(MemoryStorage::new()));
        store.restore_viewport(Viewport::new(3.0, 4.0, 2.0));
        assert_eq!(store.viewport(), Viewport::new(3.0, 4.0, 2.0));
        assert!(!store.is_autosave_pending());
        assert!(!store.can_undo());
    }

    #[test]
    fn try_flush_reports_backend_failure() {
        let mut store: BoardStore<EventStormingBoard> = BoardStore::open(
            Arc::new(BrokenStorage),
            ManualClock::default(),
            StoreConfig::default(),
        );
        assert!(matches!(store.try_flush(), Err(StorageError::Io(_))));

        let mut quota: BoardStore<EventStormingBoard> = BoardStore::open(
            Arc::new(MemoryStorage::with_quota(8)),
            ManualClock::default(),
            StoreConfig::default(),
        );
        assert!(matches!(quota.try_flush(), Err(StorageError::QuotaExceeded { quota: 8, .. })));

        let (mut disposed, _) = store_with(Arc::new(MemoryStorage::new()));
        disposed.dispose();
        assert!(matches!(disposed.try_flush(), Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn export_uses_clock_date() {
        let (mut store, clock) = store_with(Arc::new(MemoryStorage::new()));
        let mut board = store.board().clone();
        board.name = "Q3 Planning".into();
        store.update_board(board);
        clock.advance(Duration::from_secs(86_400 * 3));
        let artifact = store.export_json_now().unwrap();
        assert_eq!(artifact.filename, "event-storming-q3-planning-1970-01-04.json");
    }

    #[test]
    fn kinds_use_their_own_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = ManualClock::default();
        let mut dm: BoardStore<DomainModelingBoard> =
            BoardStore::open(storage.clone(), clock.clone(), StoreConfig::default());
        let mut sm: BoardStore<StoryMappingBoard> =
            BoardStore::open(storage.clone(), clock, StoreConfig::default());
        assert!(dm.flush());
        assert!(sm.flush());
        assert!(storage.load("devboard.domain-modeling").unwrap().is_some());
        assert!(storage.load("devboard.story-mapping").unwrap().is_some());
        assert!(storage.load("devboard.event-storming").unwrap().is_none());
    }

    #[test]
    fn config_from_lookup_ignores_garbage() {
        let config = StoreConfig::from_lookup(|name| match name {
            "DEVBOARD_AUTOSAVE_MS" => Some("250".into()),
            "DEVBOARD_MAX_HISTORY" => Some("lots".into()),
            "DEVBOARD_MAX_IMPORT_BYTES" => Some(" 1024 ".into()),
            _ => None,
        });
        assert_eq!(config.autosave_delay, Duration::from_millis(250));
        assert_eq!(config.max_history, MAX_HISTORY);
        assert_eq!(config.max_import_bytes, 1024);
    }

    struct BrokenStorage;

    impl StorageBackend for BrokenStorage {
        fn name(&self) -> &str {
            "BrokenStorage"
        }

        fn load(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("offline".into()))
        }

        fn save(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn unreadable_storage_still_opens() {
        let mut store: BoardStore<EventStormingBoard> = BoardStore::open(
            Arc::new(BrokenStorage),
            ManualClock::default(),
            StoreConfig::default(),
        );
        assert!(store.board().flows.is_empty());
        assert!(!store.flush());
    }
}
