#![forbid(unsafe_code)]

//! The story-mapping board with its example-mapping sub-document.

use devboard_core::geometry::Point;
use devboard_core::viewport::Viewport;
use serde::{Deserialize, Serialize};

use crate::document::{BoardDocument, BoardKind};
use crate::model::{Activity, Connection, Note, StickyNote, new_id};
use crate::node::NodeRef;
use crate::schema::{SCHEMA_VERSION, legacy_version};

/// A business rule with its concrete examples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub examples: Vec<Note>,
}

impl Rule {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            examples: Vec::new(),
        }
    }
}

/// Example mapping for one story: rules, examples and open questions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleMapping {
    pub story: String,
    pub rules: Vec<Rule>,
    pub questions: Vec<Note>,
}

impl ExampleMapping {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.story.is_empty() && self.rules.is_empty() && self.questions.is_empty()
    }
}

/// Activities (the backbone) with their stories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryMappingBoard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub notes: Vec<StickyNote>,
    #[serde(default)]
    pub example_mapping: ExampleMapping,
    #[serde(default)]
    pub viewport: Viewport,
}

impl StoryMappingBoard {
    /// Add an activity and return its id.
    pub fn add_activity(&mut self, activity: Activity) -> String {
        let id = activity.id.clone();
        self.activities.push(activity);
        id
    }

    /// Append a story to an activity. Returns `false` if the activity is gone.
    pub fn add_story(&mut self, activity_id: &str, story: Note) -> bool {
        match self.activities.iter_mut().find(|a| a.id == activity_id) {
            Some(activity) => {
                activity.stories.push(story);
                true
            }
            None => false,
        }
    }
}

impl BoardDocument for StoryMappingBoard {
    const KIND: BoardKind = BoardKind::StoryMapping;
    const REQUIRED_ARRAYS: &'static [&'static str] = &["activities"];
    const OPTIONAL_ARRAYS: &'static [&'static str] = &["connections", "notes"];

    fn empty() -> Self {
        Self {
            id: new_id(),
            name: Self::KIND.default_name().to_string(),
            version: SCHEMA_VERSION,
            activities: Vec::new(),
            connections: Vec::new(),
            notes: Vec::new(),
            example_mapping: ExampleMapping::default(),
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
        self.activities
            .iter()
            .map(NodeRef::Activity)
            .chain(self.notes.iter().map(NodeRef::Note))
            .collect()
    }

    fn move_node(&mut self, id: &str, position: Point) -> bool {
        if let Some(a) = self.activities.iter_mut().find(|a| a.id == id) {
            a.position = position;
        } else if let Some(n) = self.notes.iter_mut().find(|n| n.id == id) {
            n.position = position;
        } else {
            return false;
        }
        true
    }

    fn remove_node_entity(&mut self, id: &str) -> bool {
        let before = self.activities.len() + self.notes.len();
        self.activities.retain(|a| a.id != id);
        self.notes.retain(|n| n.id != id);
        before != self.activities.len() + self.notes.len()
    }
}
