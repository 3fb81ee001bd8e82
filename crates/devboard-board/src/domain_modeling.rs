#![forbid(unsafe_code)]

//! The domain-modeling board: a context map plus a Business Model Canvas.

use devboard_core::geometry::Point;
use devboard_core::viewport::Viewport;
use serde::{Deserialize, Serialize};

use crate::document::{BoardDocument, BoardKind};
use crate::model::{BoundedContext, Connection, Note, StickyNote, new_id};
use crate::node::NodeRef;
use crate::schema::{SCHEMA_VERSION, legacy_version};

/// The nine blocks of a Business Model Canvas.
///
/// Boards saved before the canvas existed load with an empty one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessModelCanvas {
    pub key_partners: Vec<Note>,
    pub key_activities: Vec<Note>,
    pub key_resources: Vec<Note>,
    pub value_propositions: Vec<Note>,
    pub customer_relationships: Vec<Note>,
    pub channels: Vec<Note>,
    pub customer_segments: Vec<Note>,
    pub cost_structure: Vec<Note>,
    pub revenue_streams: Vec<Note>,
}

impl BusinessModelCanvas {
    /// True when no block holds a note.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks().iter().all(|b| b.is_empty())
    }

    fn blocks(&self) -> [&Vec<Note>; 9] {
        [
            &self.key_partners,
            &self.key_activities,
            &self.key_resources,
            &self.value_propositions,
            &self.customer_relationships,
            &self.channels,
            &self.customer_segments,
            &self.cost_structure,
            &self.revenue_streams,
        ]
    }
}

/// Bounded contexts, their relationships, and the business model behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainModelingBoard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub contexts: Vec<BoundedContext>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub notes: Vec<StickyNote>,
    #[serde(default)]
    pub business_model_canvas: BusinessModelCanvas,
    #[serde(default)]
    pub viewport: Viewport,
}

impl DomainModelingBoard {
    /// Add a bounded context and return its id.
    pub fn add_context(&mut self, context: BoundedContext) -> String {
        let id = context.id.clone();
        self.contexts.push(context);
        id
    }

    #[must_use]
    pub fn context(&self, id: &str) -> Option<&BoundedContext> {
        self.contexts.iter().find(|c| c.id == id)
    }
}

impl BoardDocument for DomainModelingBoard {
    const KIND: BoardKind = BoardKind::DomainModeling;
    const REQUIRED_ARRAYS: &'static [&'static str] = &["contexts", "connections"];
    const OPTIONAL_ARRAYS: &'static [&'static str] = &["notes"];

    fn empty() -> Self {
        Self {
            id: new_id(),
            name: Self::KIND.default_name().to_string(),
            version: SCHEMA_VERSION,
            contexts: Vec::new(),
            connections: Vec::new(),
            notes: Vec::new(),
            business_model_canvas: BusinessModelCanvas::default(),
            viewport: Viewport::IDENTITY,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn schema_version(&self) -> u32 {
        self.version
    }

    fn set_schema_version(&mut self, version: u32) {
        self.version = version;
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn connections_mut(&mut self) -> &mut Vec<Connection> {
        &mut self.connections
    }

    fn nodes(&self) -> Vec<NodeRef<'_>> {
        self.contexts
            .iter()
            .map(NodeRef::Context)
            .chain(self.notes.iter().map(NodeRef::Note))
            .collect()
    }

    fn move_node(&mut self, id: &str, position: Point) -> bool {
        if let Some(c) = self.contexts.iter_mut().find(|c| c.id == id) {
            c.position = position;
        } else if let Some(n) = self.notes.iter_mut().find(|n| n.id == id) {
            n.position = position;
        } else {
            return false;
        }
        true
    }

    fn remove_node_entity(&mut self, id: &str) -> bool {
        let before = self.contexts.len() + self.notes.len();
        self.contexts.retain(|c| c.id != id);
        self.notes.retain(|n| n.id != id);
        before != self.contexts.len() + self.notes.len()
    }
}
