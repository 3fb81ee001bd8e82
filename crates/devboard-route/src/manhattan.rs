#![forbid(unsafe_code)]

//! Direction selection, attachment points and Manhattan paths.

use std::fmt;

use devboard_core::geometry::{Point, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dominant travel direction of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Right, Self::Left, Self::Down, Self::Up];

    /// True for `Right` and `Left`.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Right | Self::Left)
    }

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::Down => Self::Up,
            Self::Up => Self::Down,
        }
    }

    /// Lowercase name, as used in serialized routes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the dominant direction from `from` to `to`.
///
/// Horizontal wins exact ties (`|dx| == |dy|`), and zero deltas count as
/// positive, so two nodes at the same position connect `Right`.
#[must_use]
pub fn connection_direction(from: Point, to: Point) -> Direction {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy >= 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Midpoint of the edge of `node` that faces `direction`.
#[must_use]
pub fn exit_point(node: &Rect, direction: Direction) -> Point {
    edge_midpoint(node, direction)
}

/// Midpoint of the edge of `node` opposite `direction`: a connection
/// travelling right arrives at the target's left edge.
#[must_use]
pub fn entry_point(node: &Rect, direction: Direction) -> Point {
    edge_midpoint(node, direction.opposite())
}

fn edge_midpoint(node: &Rect, side: Direction) -> Point {
    let mid_x = node.x + node.width / 2.0;
    let mid_y = node.y + node.height / 2.0;
    match side {
        Direction::Right => Point::new(node.x + node.width, mid_y),
        Direction::Left => Point::new(node.x, mid_y),
        Direction::Down => Point::new(mid_x, node.y + node.height),
        Direction::Up => Point::new(mid_x, node.y),
    }
}

/// A four-point orthogonal polyline.
///
/// Displays as an SVG path: `M x0 y0 L x1 y1 L x2 y2 L x3 y3`. Points may
/// coincide for degenerate inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ManhattanPath {
    pub points: [Point; 4],
}

impl ManhattanPath {
    /// First point.
    #[must_use]
    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// Last point.
    #[must_use]
    pub fn end(&self) -> Point {
        self.points[3]
    }

    /// Total length of the three segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].x - w[0].x).abs() + (w[1].y - w[0].y).abs())
            .sum()
    }

    /// The SVG `d` attribute for this path.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ManhattanPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [p0, p1, p2, p3] = self.points;
        write!(
            f,
            "M {} {} L {} {} L {} {} L {} {}",
            p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
        )
    }
}

/// Join `exit` and `entry` with a Manhattan polyline.
///
/// Horizontal directions go H-V-H through the vertical midline
/// `xm = (exit.x + entry.x) / 2`; vertical directions go V-H-V through
/// `ym = (exit.y + entry.y) / 2`.
#[must_use]
pub fn build_manhattan_path(exit: Point, entry: Point, direction: Direction) -> ManhattanPath {
    let points = if direction.is_horizontal() {
        let xm = (exit.x + entry.x) / 2.0;
        [exit, Point::new(xm, exit.y), Point::new(xm, entry.y), entry]
    } else {
        let ym = (exit.y + entry.y) / 2.0;
        [exit, Point::new(exit.x, ym), Point::new(entry.x, ym), entry]
    };
    ManhattanPath { points }
}

/// Arithmetic midpoint of the two endpoints (not of the routed polyline),
/// used to anchor labels and badges.
#[must_use]
pub fn midpoint_of_path(exit: Point, entry: Point) -> Point {
    exit.midpoint(entry)
}
