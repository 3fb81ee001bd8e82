#![forbid(unsafe_code)]

//! Canvas input events.
//!
//! These mirror the browser's pointer, wheel and keyboard events closely
//! enough that a host can translate them one-to-one:
//!
//! - Pointer coordinates are relative to the canvas container, in screen px.
//! - `button` follows the DOM numbering: 0 = primary, 1 = middle, 2 = secondary.
//! - Wheel events carry only `deltaY`; horizontal scrolling is not used.
//! - Key events distinguish the first press from auto-repeat.

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical canvas input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Pointer down/move/up.
    Pointer(PointerEvent),
    /// Mouse wheel or trackpad scroll.
    Wheel(WheelEvent),
    /// Keyboard press/repeat/release.
    Key(KeyEvent),
}

/// Identifier of an active pointer (mouse, pen, or touch contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub u32);

/// Which button a pointer event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button, pen contact, or touch.
    Primary,
    /// Middle button (wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
    /// Any other button code.
    Other(u16),
}

impl PointerButton {
    /// Map a DOM `button` code.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }

    /// The DOM `button` code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Primary => 0,
            Self::Middle => 1,
            Self::Secondary => 2,
            Self::Other(code) => code,
        }
    }
}

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
}

/// A pointer event in container-relative screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub pointer_id: PointerId,
    pub button: PointerButton,
    pub position: Point,
}

impl PointerEvent {
    /// Create a pointer event for the default pointer.
    #[must_use]
    pub const fn new(kind: PointerEventKind, button: PointerButton, x: f64, y: f64) -> Self {
        Self {
            kind,
            pointer_id: PointerId(0),
            button,
            position: Point::new(x, y),
        }
    }

    /// Shorthand for a pointer-down event.
    #[must_use]
    pub const fn down(button: PointerButton, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, button, x, y)
    }

    /// Shorthand for a pointer-move event.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, PointerButton::Primary, x, y)
    }

    /// Shorthand for a pointer-up event.
    #[must_use]
    pub const fn up(button: PointerButton, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, button, x, y)
    }

    /// Attach a pointer id.
    #[must_use]
    pub const fn with_pointer_id(mut self, id: PointerId) -> Self {
        self.pointer_id = id;
        self
    }
}

/// A wheel event. `position` is relative to the viewport's container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub delta_y: f64,
    pub position: Point,
}

impl WheelEvent {
    /// Create a wheel event at a container-relative position.
    #[must_use]
    pub const fn new(delta_y: f64, x: f64, y: f64) -> Self {
        Self {
            delta_y,
            position: Point::new(x, y),
        }
    }
}

/// Key codes the canvas cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// The pan modifier.
    Space,
    Escape,
    /// A regular character key.
    Char(char),
    /// Anything else; the canvas ignores it.
    Other,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        /// Meta / Command.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// True for auto-repeat events.
    #[must_use]
    pub const fn is_repeat(&self) -> bool {
        matches!(self.kind, KeyEventKind::Repeat)
    }
}

/// Undo/redo keyboard shortcut recognised by [`HistoryShortcut::from_key`].
///
/// Ctrl+Z (or Cmd+Z) undoes, adding Shift redoes. Hosts route the result to
/// their board store; the canvas core never acts on it by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryShortcut {
    Undo,
    Redo,
}

impl HistoryShortcut {
    /// Classify a key press.
    #[must_use]
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if !key
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::META)
        {
            return None;
        }
        match key.code {
            KeyCode::Char('z' | 'Z') if key.modifiers.contains(Modifiers::SHIFT) => {
                Some(Self::Redo)
            }
            KeyCode::Char('z' | 'Z') => Some(Self::Undo),
            _ => None,
        }
    }
}
