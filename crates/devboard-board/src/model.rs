#![forbid(unsafe_code)]

//! Entities shared by the board variants.
//!
//! JSON field names are camelCase to stay compatible with documents written
//! by the web tools. Fields added after the first schema version carry
//! `#[serde(default)]` so older documents still load.

use std::collections::BTreeMap;

use devboard_core::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Size given to flows stored before flows had an explicit size.
pub const DEFAULT_FLOW_SIZE: Size = Size::new(320.0, 200.0);
/// Default size of a bounded context.
pub const DEFAULT_CONTEXT_SIZE: Size = Size::new(280.0, 180.0);
/// Default size of free-floating notes and hotspots.
pub const DEFAULT_NOTE_SIZE: Size = Size::new(160.0, 100.0);
/// Default size of a story-map activity.
pub const DEFAULT_ACTIVITY_SIZE: Size = Size::new(200.0, 120.0);

fn default_flow_size() -> Size {
    DEFAULT_FLOW_SIZE
}

fn default_context_size() -> Size {
    DEFAULT_CONTEXT_SIZE
}

fn default_note_size() -> Size {
    DEFAULT_NOTE_SIZE
}

fn default_activity_size() -> Size {
    DEFAULT_ACTIVITY_SIZE
}

/// A fresh random identifier.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A text note living inside a slot, a sub-document block, or a story column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

impl Note {
    /// Create a note with a fresh id.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
        }
    }
}

/// A free-floating sticky note on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickyNote {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub position: Point,
    #[serde(default = "default_note_size")]
    pub size: Size,
}

impl StickyNote {
    #[must_use]
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            position,
            size: DEFAULT_NOTE_SIZE,
        }
    }
}

/// A hotspot: an open question or problem pinned to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub position: Point,
    #[serde(default = "default_note_size")]
    pub size: Size,
}

impl Hotspot {
    #[must_use]
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            position,
            size: DEFAULT_NOTE_SIZE,
        }
    }
}

/// Sticky-note lanes of an event-storming flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotType {
    Actor,
    Command,
    Aggregate,
    DomainEvent,
    Policy,
    ReadModel,
    ExternalSystem,
}

impl SlotType {
    /// All slots in display order.
    pub const ALL: [Self; 7] = [
        Self::Actor,
        Self::Command,
        Self::Aggregate,
        Self::DomainEvent,
        Self::Policy,
        Self::ReadModel,
        Self::ExternalSystem,
    ];
}

/// A positioned event-storming flow with its sticky-note slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub position: Point,
    #[serde(default = "default_flow_size")]
    pub size: Size,
    #[serde(default)]
    pub slots: BTreeMap<SlotType, Vec<Note>>,
}

impl Flow {
    /// Create an empty flow with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            position,
            size: DEFAULT_FLOW_SIZE,
            slots: BTreeMap::new(),
        }
    }

    /// Append a note to a slot.
    pub fn add_note(&mut self, slot: SlotType, note: Note) {
        self.slots.entry(slot).or_default().push(note);
    }

    /// Notes in a slot (empty if the slot was never used).
    #[must_use]
    pub fn notes(&self, slot: SlotType) -> &[Note] {
        self.slots.get(&slot).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// A bounded context on the domain-modeling board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedContext {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub position: Point,
    #[serde(default = "default_context_size")]
    pub size: Size,
    #[serde(default)]
    pub description: String,
}

impl BoundedContext {
    #[must_use]
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            position,
            size: DEFAULT_CONTEXT_SIZE,
            description: String::new(),
        }
    }
}

/// A story-map activity column with its stories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub position: Point,
    #[serde(default = "default_activity_size")]
    pub size: Size,
    #[serde(default)]
    pub stories: Vec<Note>,
}

impl Activity {
    #[must_use]
    pub fn new(title: impl Into<String>, position: Point) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            position,
            size: DEFAULT_ACTIVITY_SIZE,
            stories: Vec::new(),
        }
    }
}

/// Context-map relationship between two bounded contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextMapPattern {
    Partnership,
    SharedKernel,
    CustomerSupplier,
    Conformist,
    AnticorruptionLayer,
    OpenHostService,
    PublishedLanguage,
    SeparateWays,
}

/// A directed link between two nodes.
///
/// The endpoint field names are historical: they may reference any node
/// kind, not only flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub from_flow_id: String,
    pub to_flow_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<ContextMapPattern>,
}

impl Connection {
    /// Create a connection with a fresh id.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            from_flow_id: from.into(),
            to_flow_id: to.into(),
            label: None,
            pattern: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: ContextMapPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// True if either endpoint is `node_id`.
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.from_flow_id == node_id || self.to_flow_id == node_id
    }
}

impl devboard_route::ConnectionEnds for Connection {
    fn connection_id(&self) -> &str {
        &self.id
    }

    fn from_id(&self) -> &str {
        &self.from_flow_id
    }

    fn to_id(&self) -> &str {
        &self.to_flow_id
    }
}
