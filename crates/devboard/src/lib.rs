#![forbid(unsafe_code)]

//! devboard public facade crate.
//!
//! Re-exports the canvas core, the connection router, the board model and
//! the persistence runtime, plus [`BoardSession`], which pairs one viewport
//! controller with one board store the way a canvas page uses them.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use devboard_core::event::{
    Event, HistoryShortcut, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton,
    PointerEvent, PointerEventKind, PointerId, WheelEvent,
};
pub use devboard_core::geometry::{Point, Rect, Size};
pub use devboard_core::viewport::{
    PanState, Viewport, ViewportConfig, ViewportController, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};

// --- Routing re-exports ----------------------------------------------------

pub use devboard_route::{
    ConnectionRoute, Direction, ManhattanPath, build_manhattan_path, connection_direction,
    entry_point, exit_point, midpoint_of_path, route_between,
};

// --- Board re-exports ------------------------------------------------------

pub use devboard_board::{
    Activity, BoardDocument, BoardKind, BoundedContext, BusinessModelCanvas, Connection,
    ContentSnapshot, ContextMapPattern, DomainModelingBoard, EventStormingBoard, ExampleMapping,
    Flow, Hotspot, NodeRef, Note, Rule, SCHEMA_VERSION, SlotType, StickyNote, StoryMappingBoard,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "file-storage")]
pub use devboard_runtime::FileStorage;
#[cfg(feature = "runtime")]
pub use devboard_runtime::{
    BoardStore, Clock, ExportArtifact, ImportError, ManualClock, MemoryStorage, SnapshotHistory,
    StorageBackend, StorageError, StoreConfig, SystemClock, import_from_json, import_from_path,
};

#[cfg(feature = "runtime")]
pub mod session;
#[cfg(feature = "runtime")]
pub use session::{BoardSession, SessionConfig};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for devboard hosts.
#[derive(Debug)]
pub enum Error {
    /// Storage backend failure.
    #[cfg(feature = "runtime")]
    Storage(StorageError),
    /// Import refused.
    #[cfg(feature = "runtime")]
    Import(ImportError),
    /// Board could not be encoded.
    Serialization(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "runtime")]
            Self::Storage(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Import(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "serialization error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "runtime")]
            Self::Storage(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Import(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

#[cfg(feature = "runtime")]
impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

#[cfg(feature = "runtime")]
impl From<ImportError> for Error {
    fn from(err: ImportError) -> Self {
        Self::Import(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

/// Standard result type for devboard APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoardDocument, BoardKind, Connection, DomainModelingBoard, Error, Event,
        EventStormingBoard, Point, Rect, Result, Size, StoryMappingBoard, Viewport,
        ViewportController,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{BoardSession, BoardStore, MemoryStorage, StoreConfig, SystemClock};

    pub use crate::{board, core, route};
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use devboard_board as board;
pub use devboard_core as core;
pub use devboard_route as route;
#[cfg(feature = "runtime")]
pub use devboard_runtime as runtime;
