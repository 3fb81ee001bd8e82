#![forbid(unsafe_code)]

//! Runtime services for devboard boards.
//!
//! - [`undo`]: bounded snapshot history
//! - [`clock`] and [`debounce`]: injectable time and the autosave timer
//! - [`storage`]: key/value backends (memory, file)
//! - [`transfer`]: export and import of board files
//! - [`board_store`]: [`BoardStore`], which ties them together for one board
//!
//! The runtime never spawns threads. Hosts call [`BoardStore::tick`] from
//! their event loop; autosave happens there.

pub mod board_store;
pub mod clock;
pub mod debounce;
pub mod storage;
pub mod transfer;
pub mod undo;

pub use board_store::{AUTOSAVE_DELAY, BoardStore, StoreConfig};
pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::Debouncer;
#[cfg(feature = "file-storage")]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, StorageBackend, StorageError, StorageResult};
pub use transfer::{
    ExportArtifact, ImportError, MAX_IMPORT_BYTES, export_board, import_from_json,
    import_from_path, try_import_from_path, try_import_from_slice,
};
pub use undo::{HistoryConfig, MAX_HISTORY, SnapshotHistory};
