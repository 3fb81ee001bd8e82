#![forbid(unsafe_code)]

//! Board export and import.
//!
//! Export wraps a board in the `{ version, exportedAt, board }` envelope and
//! names the file `<tool>-<name>-<YYYY-MM-DD>.json`. Import accepts at most
//! [`MAX_IMPORT_BYTES`] of UTF-8 JSON, checks the envelope shape, then decodes
//! and upgrades the board.
//!
//! The `import_*` functions return `None` on any failure and log the reason;
//! the `try_import_*` functions return the reason as an [`ImportError`].

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use devboard_board::schema::{export_violation, parse_export_value};
use devboard_board::{BoardDocument, ExportEnvelope, export_filename};
use serde_json::Value;

/// Largest import accepted, in bytes (10 MiB).
pub const MAX_IMPORT_BYTES: u64 = 10 * 1024 * 1024;

/// A ready-to-save export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub contents: String,
}

/// Why an import was refused.
#[derive(Debug)]
pub enum ImportError {
    /// Input exceeds the size ceiling.
    TooLarge { size: u64, limit: u64 },
    /// The file could not be read.
    Io(std::io::Error),
    /// Not UTF-8 or not JSON.
    Malformed(String),
    /// Valid JSON that is not an acceptable export for this board kind.
    Invalid(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::TooLarge { size, limit } => {
                write!(f, "import too large: {size} bytes exceeds {limit}")
            }
            ImportError::Io(e) => write!(f, "I/O error: {e}"),
            ImportError::Malformed(msg) => write!(f, "malformed import: {msg}"),
            ImportError::Invalid(msg) => write!(f, "invalid import: {msg}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(e) => Some(e),
            ImportError::TooLarge { .. } | ImportError::Malformed(_) | ImportError::Invalid(_) => {
                None
            }
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        ImportError::Io(e)
    }
}

/// Serialize `board` into an export file stamped with `exported_at`.
pub fn export_board<B: BoardDocument>(
    board: &B,
    exported_at: DateTime<Utc>,
) -> serde_json::Result<ExportArtifact> {
    let envelope = ExportEnvelope::new(board.clone(), exported_at);
    let contents = serde_json::to_string_pretty(&envelope)?;
    let filename = export_filename(B::KIND, board.name(), exported_at.date_naive());
    tracing::debug!(kind = %B::KIND, %filename, bytes = contents.len(), "exported board");
    Ok(ExportArtifact { filename, contents })
}

/// Decode an export from raw bytes, refusing anything over `limit` bytes.
pub fn try_import_from_slice<B: BoardDocument>(bytes: &[u8], limit: u64) -> Result<B, ImportError> {
    let size = bytes.len() as u64;
    if size > limit {
        return Err(ImportError::TooLarge { size, limit });
    }
    let text = std::str::from_utf8(bytes).map_err(|e| ImportError::Malformed(e.to_string()))?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;
    if let Some(reason) = export_violation::<B>(&value) {
        return Err(ImportError::Invalid(reason));
    }
    parse_export_value(value)
        .ok_or_else(|| ImportError::Invalid("board does not match its schema".into()))
}

/// Decode an export file, checking its size before reading it.
pub fn try_import_from_path<B: BoardDocument>(
    path: impl AsRef<Path>,
    limit: u64,
) -> Result<B, ImportError> {
    let path = path.as_ref();
    let size = fs::metadata(path)?.len();
    if size > limit {
        return Err(ImportError::TooLarge { size, limit });
    }
    let bytes = fs::read(path)?;
    try_import_from_slice(&bytes, limit)
}

/// Decode an export from raw bytes. `None` on any failure.
#[must_use]
pub fn import_from_json<B: BoardDocument>(bytes: &[u8]) -> Option<B> {
    try_import_from_slice(bytes, MAX_IMPORT_BYTES)
        .map_err(|error| tracing::warn!(kind = %B::KIND, %error, "import rejected"))
        .ok()
}

/// Decode an export file. `None` on any failure.
#[must_use]
pub fn import_from_path<B: BoardDocument>(path: impl AsRef<Path>) -> Option<B> {
    try_import_from_path(path, MAX_IMPORT_BYTES)
        .map_err(|error| tracing::warn!(kind = %B::KIND, %error, "import rejected"))
        .ok()
}
