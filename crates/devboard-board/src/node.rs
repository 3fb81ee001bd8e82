#![forbid(unsafe_code)]

//! Uniform view over every positioned entity on a board.

use devboard_core::geometry::{Point, Rect};

use crate::model::{Activity, BoundedContext, Flow, Hotspot, StickyNote};

/// A borrowed positioned entity. Any of these can be a connection endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Flow(&'a Flow),
    Context(&'a BoundedContext),
    Hotspot(&'a Hotspot),
    Note(&'a StickyNote),
    Activity(&'a Activity),
}

impl<'a> NodeRef<'a> {
    #[must_use]
    pub fn id(&self) -> &'a str {
        match self {
            Self::Flow(n) => &n.id,
            Self::Context(n) => &n.id,
            Self::Hotspot(n) => &n.id,
            Self::Note(n) => &n.id,
            Self::Activity(n) => &n.id,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Point {
        match self {
            Self::Flow(n) => n.position,
            Self::Context(n) => n.position,
            Self::Hotspot(n) => n.position,
            Self::Note(n) => n.position,
            Self::Activity(n) => n.position,
        }
    }

    /// Bounding rectangle used for routing.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let size = match self {
            Self::Flow(n) => n.size,
            Self::Context(n) => n.size,
            Self::Hotspot(n) => n.size,
            Self::Note(n) => n.size,
            Self::Activity(n) => n.size,
        };
        Rect::from_origin_size(self.position(), size)
    }

    /// Short kind name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Flow(_) => "flow",
            Self::Context(_) => "context",
            Self::Hotspot(_) => "hotspot",
            Self::Note(_) => "note",
            Self::Activity(_) => "activity",
        }
    }
}
