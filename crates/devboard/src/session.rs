#![forbid(unsafe_code)]

//! One open board: a viewport controller and a board store kept in step.
//!
//! The controller owns navigation, the store owns content and durability.
//! After every input the session copies the controller's viewport into the
//! store, so autosave captures where the user was looking without that ever
//! reaching undo history. Undo/redo shortcuts are recognised here and sent to
//! the store.

use std::sync::Arc;

use devboard_board::BoardDocument;
use devboard_core::event::{Event, HistoryShortcut};
use devboard_core::geometry::Size;
use devboard_core::viewport::{ViewportConfig, ViewportController};
use devboard_runtime::{BoardStore, Clock, ExportArtifact, StorageBackend, StoreConfig};

/// Configuration for a [`BoardSession`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    pub viewport: ViewportConfig,
    pub store: StoreConfig,
}

impl SessionConfig {
    #[must_use]
    pub fn with_viewport(mut self, viewport: ViewportConfig) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }
}

/// A board being viewed and edited.
#[derive(Debug)]
pub struct BoardSession<B: BoardDocument> {
    controller: ViewportController,
    store: BoardStore<B>,
}

impl<B: BoardDocument> BoardSession<B> {
    /// Restore the board and put the view where it was left.
    pub fn open(
        storage: Arc<dyn StorageBackend>,
        clock: impl Clock + 'static,
        config: SessionConfig,
    ) -> Self {
        let store = BoardStore::open(storage, clock, config.store);
        let mut controller = ViewportController::new(config.viewport);
        controller.set_viewport(store.viewport());
        let mut session = Self { controller, store };
        // A stored zoom outside the configured range was clamped above.
        let viewport = session.controller.viewport();
        if viewport != session.store.viewport() {
            tracing::debug!(kind = %B::KIND, zoom = viewport.zoom, "restored viewport clamped");
            session.store.restore_viewport(viewport);
        }
        session
    }

    #[must_use]
    pub fn board(&self) -> &B {
        self.store.board()
    }

    #[must_use]
    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    #[must_use]
    pub fn store(&self) -> &BoardStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut BoardStore<B> {
        &mut self.store
    }

    /// Route one input event. Returns `true` if the session consumed it.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Key(key) = event {
            match HistoryShortcut::from_key(key) {
                Some(HistoryShortcut::Undo) => return self.undo(),
                Some(HistoryShortcut::Redo) => return self.redo(),
                None => {}
            }
        }
        let consumed = self.controller.handle_event(event);
        self.sync_viewport();
        consumed
    }

    /// Apply a content edit to a copy of the board and record it.
    pub fn edit(&mut self, f: impl FnOnce(&mut B)) {
        let mut next = self.store.board().clone();
        f(&mut next);
        next.set_viewport(self.controller.viewport());
        self.store.update_board(next);
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    pub fn set_container_size(&mut self, size: Size) {
        self.controller.set_container_size(size);
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.controller.zoom_in();
        self.sync_viewport();
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.controller.zoom_out();
        self.sync_viewport();
        changed
    }

    pub fn reset_view(&mut self) {
        self.controller.reset_view();
        self.sync_viewport();
    }

    /// Abort an in-progress pan, e.g. on focus loss.
    pub fn cancel_pan(&mut self) -> bool {
        let cancelled = self.controller.cancel();
        self.sync_viewport();
        cancelled
    }

    /// Stage and confirm an import in one step. The current view is kept.
    pub fn import(&mut self, bytes: &[u8]) -> bool {
        match self.try_import(bytes) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(kind = %B::KIND, %error, "import rejected");
                false
            }
        }
    }

    /// [`import`](Self::import) reporting why the file was refused.
    pub fn try_import(&mut self, bytes: &[u8]) -> crate::Result<()> {
        self.store.try_stage_import(bytes)?;
        let viewport = self.controller.viewport();
        self.store.confirm_import();
        self.store.set_viewport(viewport);
        Ok(())
    }

    pub fn export(&self) -> crate::Result<ExportArtifact> {
        Ok(self.store.export_json_now()?)
    }

    /// Write the board now instead of waiting for autosave.
    pub fn save(&mut self) -> crate::Result<()> {
        Ok(self.store.try_flush()?)
    }

    /// Drive autosave. Call from the host's event loop.
    pub fn tick(&mut self) -> bool {
        self.store.tick()
    }

    pub fn flush(&mut self) -> bool {
        self.store.flush()
    }

    /// Stop autosave and drop pointer capture.
    pub fn close(&mut self) {
        self.controller.cancel();
        self.sync_viewport();
        self.store.dispose();
        tracing::debug!(kind = %B::KIND, "board session closed");
    }

    fn sync_viewport(&mut self) {
        self.store.set_viewport(self.controller.viewport());
    }
}
