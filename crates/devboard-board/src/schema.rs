#![forbid(unsafe_code)]

//! Structural validation and schema upgrade for stored and exported boards.
//!
//! Two document shapes reach this module:
//!
//! - the **stored** form, which is the bare board JSON kept under the board
//!   kind's storage key;
//! - the **export** envelope `{ version, exportedAt, board }` produced by
//!   export and accepted by import.
//!
//! Both are checked against the board variant's root shape before serde sees
//! them, so a document that merely happens to deserialize (for example an
//! empty object where every field has a default) is still rejected.
//!
//! # Upgrade rules
//!
//! | Missing in older document | Loaded as |
//! |---------------------------|-----------|
//! | `version` | `1` |
//! | sub-document (`businessModelCanvas`, `exampleMapping`) | empty sub-document |
//! | later-introduced arrays | empty |
//! | `viewport` | `{0, 0, 1}` |
//! | flow / context / note `size` | the kind's default size |
//!
//! Documents claiming a version newer than [`SCHEMA_VERSION`] are rejected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{BoardDocument, BoardKind};

/// Current document schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// Version assumed for documents written before `version` was recorded.
pub(crate) fn legacy_version() -> u32 {
    1
}

/// The export file envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope<B> {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub board: B,
}

impl<B: BoardDocument> ExportEnvelope<B> {
    #[must_use]
    pub fn new(board: B, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            exported_at,
            board,
        }
    }
}

/// Why a board value fails the root-shape check, or `None` if it passes.
#[must_use]
pub fn board_violation<B: BoardDocument>(value: &Value) -> Option<String> {
    let Some(root) = value.as_object() else {
        return Some("board is not an object".into());
    };
    match root.get("id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => {}
        _ => return Some("board has no root id".into()),
    }
    if let Some(version) = root.get("version") {
        match version.as_u64() {
            Some(v) if v <= u64::from(SCHEMA_VERSION) => {}
            Some(v) => return Some(format!("board version {v} is newer than {SCHEMA_VERSION}")),
            None => return Some("board version is not a number".into()),
        }
    }
    for field in B::REQUIRED_ARRAYS {
        match root.get(*field).and_then(Value::as_array) {
            Some(items) if items.iter().all(Value::is_object) => {}
            Some(_) => return Some(format!("`{field}` holds a non-object entry")),
            None => return Some(format!("`{field}` is missing or not an array")),
        }
    }
    for field in B::OPTIONAL_ARRAYS {
        if root.get(*field).is_some_and(|v| !v.is_array()) {
            return Some(format!("`{field}` is not an array"));
        }
    }
    None
}

/// Why an export envelope is unacceptable, or `None` if it passes.
#[must_use]
pub fn export_violation<B: BoardDocument>(value: &Value) -> Option<String> {
    let Some(root) = value.as_object() else {
        return Some("export is not an object".into());
    };
    match root.get("version").and_then(Value::as_u64) {
        Some(v) if (1..=u64::from(SCHEMA_VERSION)).contains(&v) => {}
        Some(v) => return Some(format!("unsupported export version {v}")),
        None => return Some("export has no numeric version".into()),
    }
    match root.get("board") {
        Some(board) => board_violation::<B>(board),
        None => Some("export has no board".into()),
    }
}

/// True if `value` has the root shape of a `B` board.
#[must_use]
pub fn validate_board_value<B: BoardDocument>(value: &Value) -> bool {
    board_violation::<B>(value).is_none()
}

/// True if `value` is an acceptable export envelope for a `B` board.
#[must_use]
pub fn validate_export_data<B: BoardDocument>(value: &Value) -> bool {
    export_violation::<B>(value).is_none()
}

/// Decode a stored board, applying the upgrade rules.
///
/// Returns `None` for anything that is not a valid `B` board.
#[must_use]
pub fn parse_stored_value<B: BoardDocument>(value: Value) -> Option<B> {
    if let Some(reason) = board_violation::<B>(&value) {
        tracing::warn!(kind = %B::KIND, %reason, "discarding stored board");
        return None;
    }
    decode_board(value)
}

/// Decode the board out of an export envelope, applying the upgrade rules.
#[must_use]
pub fn parse_export_value<B: BoardDocument>(value: Value) -> Option<B> {
    if let Some(reason) = export_violation::<B>(&value) {
        tracing::warn!(kind = %B::KIND, %reason, "rejecting export data");
        return None;
    }
    let Value::Object(mut root) = value else {
        return None;
    };
    decode_board(root.remove("board")?)
}

fn decode_board<B: BoardDocument>(value: Value) -> Option<B> {
    match serde_json::from_value::<B>(value) {
        Ok(mut board) => {
            board.upgrade();
            Some(board)
        }
        Err(error) => {
            tracing::warn!(kind = %B::KIND, %error, "board does not match its schema");
            None
        }
    }
}

/// `<tool>-<name>-<YYYY-MM-DD>.json`, with the name slugified.
#[must_use]
pub fn export_filename(kind: BoardKind, name: &str, date: NaiveDate) -> String {
    format!(
        "{}-{}-{}.json",
        kind.slug(),
        slugify(name),
        date.format("%Y-%m-%d")
    )
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "board".into()
    } else {
        slug
    }
}
