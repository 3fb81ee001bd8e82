#![forbid(unsafe_code)]

//! Whole-connection routing and batch routing over resolved endpoints.

use devboard_core::geometry::{Point, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::manhattan::{
    Direction, ManhattanPath, build_manhattan_path, connection_direction, entry_point,
    exit_point, midpoint_of_path,
};

/// Everything a renderer needs to draw one connection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ConnectionRoute {
    pub direction: Direction,
    pub exit: Point,
    pub entry: Point,
    pub path: ManhattanPath,
    pub label_anchor: Point,
}

/// Route a connection from node `from` to node `to`.
///
/// The direction is chosen from the nodes' top-left positions, so nodes of
/// different sizes still pick the same direction as their placement suggests.
#[must_use]
pub fn route_between(from: &Rect, to: &Rect) -> ConnectionRoute {
    let direction = connection_direction(from.origin(), to.origin());
    let exit = exit_point(from, direction);
    let entry = entry_point(to, direction);
    ConnectionRoute {
        direction,
        exit,
        entry,
        path: build_manhattan_path(exit, entry, direction),
        label_anchor: midpoint_of_path(exit, entry),
    }
}

/// Anything with an id and two endpoint ids.
pub trait ConnectionEnds {
    fn connection_id(&self) -> &str;
    fn from_id(&self) -> &str;
    fn to_id(&self) -> &str;
}

/// A routed connection, borrowed from its source.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedConnection<'a, C> {
    pub connection: &'a C,
    pub route: ConnectionRoute,
}

/// Route every connection whose endpoints `lookup` can resolve.
///
/// Connections with a missing endpoint are skipped: they have nothing to
/// render, and the caller is responsible for not creating them.
pub fn route_connections<'a, C, F>(connections: &'a [C], lookup: F) -> Vec<RoutedConnection<'a, C>>
where
    C: ConnectionEnds,
    F: Fn(&str) -> Option<Rect>,
{
    connections
        .iter()
        .filter_map(|connection| {
            let (Some(from), Some(to)) = (lookup(connection.from_id()), lookup(connection.to_id()))
            else {
                tracing::debug!(
                    connection = connection.connection_id(),
                    from = connection.from_id(),
                    to = connection.to_id(),
                    "connection endpoint not found, skipping route"
                );
                return None;
            };
            Some(RoutedConnection {
                connection,
                route: route_between(&from, &to),
            })
        })
        .collect()
}
