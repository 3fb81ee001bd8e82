#![forbid(unsafe_code)]

//! The event-storming board.

use devboard_core::geometry::Point;
use devboard_core::viewport::Viewport;
use serde::{Deserialize, Serialize};

use crate::document::{BoardDocument, BoardKind};
use crate::model::{Connection, Flow, Hotspot, StickyNote, new_id};
use crate::node::NodeRef;
use crate::schema::{SCHEMA_VERSION, legacy_version};

/// Flows of sticky-note slots plus free notes and hotspots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStormingBoard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub flows: Vec<Flow>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub notes: Vec<StickyNote>,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl EventStormingBoard {
    /// Add a flow and return its id.
    pub fn add_flow(&mut self, flow: Flow) -> String {
        let id = flow.id.clone();
        self.flows.push(flow);
        id
    }

    #[must_use]
    pub fn flow(&self, id: &str) -> Option<&Flow> {
        self.flows.iter().find(|f| f.id == id)
    }

    pub fn flow_mut(&mut self, id: &str) -> Option<&mut Flow> {
        self.flows.iter_mut().find(|f| f.id == id)
    }
}

impl BoardDocument for EventStormingBoard {
    const KIND: BoardKind = BoardKind::EventStorming;
    const REQUIRED_ARRAYS: &'static [&'static str] = &["flows", "connections"];
    const OPTIONAL_ARRAYS: &'static [&'static str] = &["notes", "hotspots"];

    fn empty() -> Self {
        Self {
            id: new_id(),
            name: Self::KIND.default_name().to_string(),
            version: SCHEMA_VERSION,
            flows: Vec::new(),
            connections: Vec::new(),
            notes: Vec::new(),
            hotspots: Vec::new(),
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
        self.flows
            .iter()
            .map(NodeRef::Flow)
            .chain(self.hotspots.iter().map(NodeRef::Hotspot))
            .chain(self.notes.iter().map(NodeRef::Note))
            .collect()
    }

    fn move_node(&mut self, id: &str, position: Point) -> bool {
        if let Some(f) = self.flows.iter_mut().find(|f| f.id == id) {
            f.position = position;
        } else if let Some(h) = self.hotspots.iter_mut().find(|h| h.id == id) {
            h.position = position;
        } else if let Some(n) = self.notes.iter_mut().find(|n| n.id == id) {
            n.position = position;
        } else {
            return false;
        }
        true
    }

    fn remove_node_entity(&mut self, id: &str) -> bool {
        let before = self.flows.len() + self.hotspots.len() + self.notes.len();
        self.flows.retain(|f| f.id != id);
        self.hotspots.retain(|h| h.id != id);
        self.notes.retain(|n| n.id != id);
        before != self.flows.len() + self.hotspots.len() + self.notes.len()
    }
}
