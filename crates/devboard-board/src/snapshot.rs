#![forbid(unsafe_code)]

//! Canonical content snapshots.
//!
//! A snapshot is a board with its viewport reset, paired with the board's
//! canonical JSON. Two snapshots are equal exactly when their canonical
//! strings are equal, so structurally identical boards compare equal no
//! matter how they were built.
//!
//! Canonical form is `serde_json::Value` rendered compactly. Object keys come
//! out sorted because `serde_json` maps are ordered without the
//! `preserve_order` feature, and every keyed collection in the model is a
//! `BTreeMap`.

use devboard_core::viewport::Viewport;
use serde::Serialize;

use crate::document::BoardDocument;

/// Render `value` in canonical (sorted-key, compact) JSON.
pub fn canonical_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string(&value)
}

/// Board content without navigation state.
#[derive(Debug, Clone)]
pub struct ContentSnapshot<B> {
    content: B,
    canonical: String,
}

impl<B: BoardDocument> ContentSnapshot<B> {
    /// Snapshot the content of `board`. The viewport is not part of content.
    #[must_use]
    pub fn capture(board: &B) -> Self {
        let mut content = board.clone();
        content.set_viewport(Viewport::IDENTITY);
        let canonical = match canonical_json(&content) {
            Ok(json) => json,
            Err(error) => {
                tracing::error!(kind = %B::KIND, %error, "board failed to canonicalize");
                format!("{content:?}")
            }
        };
        Self { content, canonical }
    }

    /// The snapshot content recombined with `viewport`.
    #[must_use]
    pub fn into_board(self, viewport: Viewport) -> B {
        let mut board = self.content;
        board.set_viewport(viewport);
        board
    }

    #[must_use]
    pub fn content(&self) -> &B {
        &self.content
    }

    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl<B> PartialEq for ContentSnapshot<B> {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl<B> Eq for ContentSnapshot<B> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Flow, Note, SlotType};
    use crate::EventStormingBoard;
    use devboard_core::geometry::Point;
    use std::collections::BTreeMap;

    #[test]
    fn canonical_json_sorts_keys() {
        let mut map = BTreeMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        assert_eq!(canonical_json(&map).unwrap(), r#"{"alpha":2,"zeta":1}"#);

        let value = serde_json::json!({"b": 1, "a": {"d": 2, "c": 3}});
        assert_eq!(canonical_json(&value).unwrap(), r#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[test]
    fn viewport_is_not_content() {
        let mut board = EventStormingBoard::empty();
        let a = ContentSnapshot::capture(&board);
        board.viewport = Viewport::new(40.0, -10.0, 1.5);
        let b = ContentSnapshot::capture(&board);
        assert_eq!(a, b);
        assert_eq!(b.content().viewport, Viewport::IDENTITY);
    }

    #[test]
    fn content_edits_change_the_snapshot() {
        let mut board = EventStormingBoard::empty();
        let before = ContentSnapshot::capture(&board);
        board.add_flow(Flow::new("Checkout", Point::ZERO));
        assert_ne!(before, ContentSnapshot::capture(&board));
    }

    #[test]
    fn slot_insertion_order_does_not_matter() {
        let mut board = EventStormingBoard::empty();
        let mut flow = Flow::new("f", Point::ZERO);
        flow.id = "fixed".into();
        let mut first = flow.clone();
        let mut second = flow;
        let event = Note { id: "e".into(), text: "Order placed".into() };
        let command = Note { id: "c".into(), text: "Place order".into() };
        first.add_note(SlotType::DomainEvent, event.clone());
        first.add_note(SlotType::Command, command.clone());
        second.add_note(SlotType::Command, command);
        second.add_note(SlotType::DomainEvent, event);

        board.flows = vec![first];
        let a = ContentSnapshot::capture(&board);
        board.flows = vec![second];
        let b = ContentSnapshot::capture(&board);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn into_board_restores_given_viewport() {
        let board = EventStormingBoard::empty();
        let snap = ContentSnapshot::capture(&board);
        let vp = Viewport::new(1.0, 2.0, 0.5);
        assert_eq!(snap.into_board(vp).viewport, vp);
    }
}
