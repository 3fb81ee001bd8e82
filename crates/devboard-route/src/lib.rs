#![forbid(unsafe_code)]

//! Connection routing for board canvases.
//!
//! Given two axis-aligned node rectangles, the router picks a dominant
//! direction, attaches the connection to the facing edges and joins them with
//! a three-segment Manhattan polyline. Everything here is a pure function of
//! geometry: no styling, no board types, no state.
//!
//! # Pipeline
//!
//! 1. [`connection_direction`] from the two node positions
//! 2. [`exit_point`] on the source, [`entry_point`] on the target
//! 3. [`build_manhattan_path`] between them
//! 4. [`midpoint_of_path`] for label placement
//!
//! [`route_between`] runs all four; [`route_connections`] does it for a batch
//! of connections, skipping any whose endpoints cannot be resolved.

pub mod manhattan;
pub mod route;

pub use manhattan::{
    Direction, ManhattanPath, build_manhattan_path, connection_direction, entry_point,
    exit_point, midpoint_of_path,
};
pub use route::{ConnectionEnds, ConnectionRoute, RoutedConnection, route_between, route_connections};
