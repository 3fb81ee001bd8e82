#![forbid(unsafe_code)]

//! Durable key/value storage for boards.
//!
//! Each board kind is persisted under its own key as the board's full JSON.
//! Backends are plain string stores; validation and schema upgrade happen in
//! the layer above.
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: backends never panic; every operation returns
//!    a [`StorageResult`].
//! 2. **Atomic writes**: [`FileStorage`] writes to a temporary file and
//!    renames it over the target, so a crash never leaves half a board.
//! 3. **Last write wins**: there is no locking across processes.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returned to caller |
//! | `StorageError::Serialization` | Board could not be encoded | Returned to caller |
//! | `StorageError::QuotaExceeded` | Memory quota too small | Write rejected, old value kept |
//! | `StorageError::Unavailable` | Key unusable as a file name | Returned to caller |
//! | `StorageError::Corruption` | Poisoned lock | Returned to caller |
//! | Missing key | First run | `Ok(None)` |
//!
//! # Feature Gates
//!
//! - `file-storage` (default): enables [`FileStorage`].

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// A board could not be encoded for storage.
    Serialization(String),
    /// The write would exceed the backend's byte quota.
    QuotaExceeded { needed: usize, quota: usize },
    /// Backend cannot serve the request.
    Unavailable(String),
    /// Backend state is corrupted.
    Corruption(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::QuotaExceeded { needed, quota } => {
                write!(f, "storage quota exceeded: {needed} bytes needed, {quota} allowed")
            }
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_)
            | StorageError::QuotaExceeded { .. }
            | StorageError::Unavailable(_)
            | StorageError::Corruption(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A pluggable string store keyed by board kind.
///
/// Implementations must be `Send + Sync`.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read the value under `key`. `Ok(None)` if nothing was ever stored.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value under `key`.
    fn save(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete the value under `key`. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage for tests and ephemeral sessions.
///
/// An optional byte quota models a full browser-style storage area: a write
/// that would push the total size of all values past the quota fails with
/// [`StorageError::QuotaExceeded`].
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory storage that rejects writes beyond `bytes` in total.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            data: RwLock::default(),
            quota: Some(bytes),
        }
    }

    /// Total bytes currently stored.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.data
            .read()
            .map(|g| g.values().map(String::len).sum())
            .unwrap_or(0)
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        if let Some(quota) = self.quota {
            let others: usize = guard
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .field("quota", &self.quota)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires file-storage feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "file-storage")]
mod file_storage {
    use super::*;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// Directory-backed storage: one `<key>.json` file per key.
    ///
    /// # Atomic Writes
    ///
    /// 1. Write to `<key>.json.tmp`
    /// 2. Flush and sync
    /// 3. Rename over `<key>.json`
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        /// Create a file storage rooted at `dir`.
        ///
        /// The directory does not need to exist; it is created on first save.
        #[must_use]
        pub fn new(dir: impl AsRef<Path>) -> Self {
            Self {
                dir: dir.as_ref().to_path_buf(),
            }
        }

        /// Storage under `$XDG_STATE_HOME/{app_name}/`, falling back to
        /// `~/.local/state/{app_name}/`, then `./{app_name}/`.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            Self {
                dir: dirs_or_fallback().join(app_name),
            }
        }

        #[must_use]
        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
            if key.is_empty()
                || key.starts_with('.')
                || key.contains(['/', '\\'])
                || key.contains("..")
            {
                return Err(StorageError::Unavailable(format!(
                    "`{key}` is not usable as a file name"
                )));
            }
            Ok(self.dir.join(format!("{key}.json")))
        }
    }

    /// Get state directory, falling back to current dir if unavailable.
    fn dirs_or_fallback() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn load(&self, key: &str) -> StorageResult<Option<String>> {
            let path = self.path_for(key)?;
            if !path.exists() {
                return Ok(None);
            }
            Ok(Some(fs::read_to_string(&path)?))
        }

        fn save(&self, key: &str, value: &str) -> StorageResult<()> {
            let path = self.path_for(key)?;
            fs::create_dir_all(&self.dir)?;

            let mut tmp_path = path.clone();
            tmp_path.set_extension("json.tmp");
            {
                let file = File::create(&tmp_path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(value.as_bytes())?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &path)?;

            tracing::debug!(path = %path.display(), bytes = value.len(), "saved board");
            Ok(())
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            let path = self.path_for(key)?;
            if path.exists() {
                fs::remove_file(&path)?;
            }
            Ok(())
        }

        fn is_available(&self) -> bool {
            if !self.dir.exists() {
                return fs::create_dir_all(&self.dir).is_ok();
            }
            let probe = self.dir.join(".devboard_test_write");
            if fs::write(&probe, b"test").is_ok() {
                let _ = fs::remove_file(&probe);
                return true;
            }
            false
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage").field("dir", &self.dir).finish()
        }
    }
}

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load("k").unwrap(), None);
        storage.save("k", "{\"id\":\"a\"}").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("{\"id\":\"a\"}"));
        storage.remove("k").unwrap();
        assert_eq!(storage.load("k").unwrap(), None);
        storage.remove("k").unwrap();
    }

    #[test]
    fn quota_rejects_and_keeps_old_value() {
        let storage = MemoryStorage::with_quota(8);
        storage.save("k", "1234").unwrap();
        // Overwriting the same key only counts the new value.
        storage.save("k", "12345678").unwrap();
        let err = storage.save("k", "123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 9, quota: 8 }));
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("12345678"));
        assert_eq!(storage.used_bytes(), 8);
    }

    #[test]
    fn error_display_and_source() {
        use std::error::Error as _;
        let io = StorageError::from(std::io::Error::other("disk gone"));
        assert!(io.to_string().contains("disk gone"));
        assert!(io.source().is_some());
        let quota = StorageError::QuotaExceeded { needed: 10, quota: 5 };
        assert!(quota.to_string().contains("quota"));
        assert!(quota.source().is_none());
        let encode = StorageError::from(serde_json::from_str::<u8>("x").unwrap_err());
        assert!(matches!(encode, StorageError::Serialization(_)));
        assert!(encode.to_string().starts_with("serialization error"));
    }

    #[cfg(feature = "file-storage")]
    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.save("../escape", "x"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(storage.load("a/b").is_err());
    }

    #[cfg(feature = "file-storage")]
    #[test]
    fn file_storage_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        assert!(storage.is_available());
        storage.save("devboard.story-mapping", "{}").unwrap();
        let names: Vec<_> = std::fs::read_dir(storage.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["devboard.story-mapping.json".to_string()]);
    }
}
