#![forbid(unsafe_code)]

//! Core: canvas geometry, input events, and the viewport controller.
//!
//! Nothing in this crate knows what a board contains. The viewport
//! controller consumes plain pointer/wheel/key events and produces a
//! `{x, y, zoom}` transform; board content lives in `devboard-board`.

pub mod event;
pub mod geometry;
pub mod viewport;

pub use event::{
    Event, HistoryShortcut, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton,
    PointerEvent, PointerEventKind, PointerId, WheelEvent,
};
pub use geometry::{Point, Rect, Size};
pub use viewport::{
    PanState, Viewport, ViewportConfig, ViewportController, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};
