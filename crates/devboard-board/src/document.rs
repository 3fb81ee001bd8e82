#![forbid(unsafe_code)]

//! The [`BoardDocument`] trait shared by every board variant.

use std::collections::HashMap;
use std::fmt;

use devboard_core::geometry::{Point, Rect};
use devboard_core::viewport::Viewport;
use devboard_route::{RoutedConnection, route_connections};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::Connection;
use crate::node::NodeRef;
use crate::schema::SCHEMA_VERSION;

/// Which canvas tool a board belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardKind {
    EventStorming,
    DomainModeling,
    StoryMapping,
}

impl BoardKind {
    /// Tool slug used in export filenames.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::EventStorming => "event-storming",
            Self::DomainModeling => "domain-modeling",
            Self::StoryMapping => "story-mapping",
        }
    }

    /// Durable storage key holding this tool's board.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::EventStorming => "devboard.event-storming",
            Self::DomainModeling => "devboard.domain-modeling",
            Self::StoryMapping => "devboard.story-mapping",
        }
    }

    /// Name given to a freshly created board.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::EventStorming => "Event Storming",
            Self::DomainModeling => "Domain Model",
            Self::StoryMapping => "Story Map",
        }
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A board root document.
///
/// Implementors are plain serde types; the trait adds the handful of
/// operations the history, persistence and routing layers rely on.
pub trait BoardDocument:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + 'static
{
    const KIND: BoardKind;

    /// Top-level arrays present since the first schema version. A stored or
    /// imported document without them is invalid.
    const REQUIRED_ARRAYS: &'static [&'static str];

    /// Top-level arrays added later; missing ones are defaulted to empty,
    /// present ones must still be arrays.
    const OPTIONAL_ARRAYS: &'static [&'static str];

    /// A new board with a fresh id and no content.
    fn empty() -> Self;

    /// Root identifier.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn schema_version(&self) -> u32;

    fn set_schema_version(&mut self, version: u32);

    fn viewport(&self) -> Viewport;

    fn set_viewport(&mut self, viewport: Viewport);

    fn connections(&self) -> &[Connection];

    fn connections_mut(&mut self) -> &mut Vec<Connection>;

    /// Every positioned entity that can be a connection endpoint.
    fn nodes(&self) -> Vec<NodeRef<'_>>;

    /// Move the node with `id`. Returns `false` if no such node exists.
    fn move_node(&mut self, id: &str, position: Point) -> bool;

    /// Remove the node entity itself, leaving connections alone.
    fn remove_node_entity(&mut self, id: &str) -> bool;

    /// Find a node by id.
    fn node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.nodes().into_iter().find(|n| n.id() == id)
    }

    /// Add a connection if both endpoints exist.
    fn add_connection(&mut self, connection: Connection) -> bool {
        if self.node(&connection.from_flow_id).is_none()
            || self.node(&connection.to_flow_id).is_none()
        {
            return false;
        }
        self.connections_mut().push(connection);
        true
    }

    /// Connect two nodes, returning the new connection id.
    fn connect(&mut self, from: &str, to: &str) -> Option<String> {
        let connection = Connection::new(from, to);
        let id = connection.id.clone();
        self.add_connection(connection).then_some(id)
    }

    /// Remove a node together with every connection touching it.
    fn remove_node(&mut self, id: &str) -> bool {
        let Some(node) = self.node(id).map(|n| n.kind()) else {
            return false;
        };
        if !self.remove_node_entity(id) {
            return false;
        }
        let before = self.connections().len();
        self.connections_mut().retain(|c| !c.touches(id));
        tracing::debug!(
            kind = %Self::KIND,
            node,
            id,
            connections_removed = before - self.connections().len(),
            "removed node"
        );
        true
    }

    /// Connections with at least one endpoint that no longer resolves.
    fn dangling_connections(&self) -> Vec<&Connection> {
        let bounds = self.node_bounds();
        self.connections()
            .iter()
            .filter(|c| {
                !bounds.contains_key(c.from_flow_id.as_str())
                    || !bounds.contains_key(c.to_flow_id.as_str())
            })
            .collect()
    }

    /// Bounding rectangles keyed by node id.
    fn node_bounds(&self) -> HashMap<&str, Rect> {
        self.nodes().into_iter().map(|n| (n.id(), n.bounds())).collect()
    }

    /// Route every connection whose endpoints resolve.
    fn routes(&self) -> Vec<RoutedConnection<'_, Connection>> {
        let bounds = self.node_bounds();
        route_connections(self.connections(), |id| bounds.get(id).copied())
    }

    /// Bring a document from an older schema version up to date. Field-level
    /// defaults are applied by serde during deserialization; this records the
    /// new version.
    fn upgrade(&mut self) {
        let from = self.schema_version();
        if from < SCHEMA_VERSION {
            self.set_schema_version(SCHEMA_VERSION);
            tracing::debug!(
                kind = %Self::KIND,
                from,
                to = SCHEMA_VERSION,
                "upgraded board schema"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_distinct() {
        let keys = [
            BoardKind::EventStorming.storage_key(),
            BoardKind::DomainModeling.storage_key(),
            BoardKind::StoryMapping.storage_key(),
        ];
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn kind_display_is_slug() {
        assert_eq!(BoardKind::StoryMapping.to_string(), "story-mapping");
    }
}
