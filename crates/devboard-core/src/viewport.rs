#![forbid(unsafe_code)]

//! Pan and zoom for the board canvas.
//!
//! [`ViewportController`] turns pointer, wheel and keyboard input into a
//! [`Viewport`] transform. It never looks at board content and never records
//! history: viewport changes are navigation, not edits.
//!
//! # State Machine
//!
//! ```text
//!            primary down + space held,
//!            or middle down
//!   ┌──────┐ ───────────────────────────▶ ┌─────────┐
//!   │ Idle │                              │ Panning │ ◀─┐ pointer move:
//!   └──────┘ ◀─────────────────────────── └─────────┘ ──┘ translate
//!            pointer up (release capture)
//! ```
//!
//! Wheel zoom and the programmatic `zoom_in`/`zoom_out`/`reset_view` work in
//! either state.
//!
//! # Invariants
//!
//! 1. `config.zoom_min <= viewport.zoom <= config.zoom_max` after every call.
//! 2. A zoom keeps the world point under its anchor fixed on screen.
//! 3. Panning changes `x`/`y` only; zoom is untouched.
//! 4. The change callback fires once per actual change and never for no-ops
//!    (`reset_view` is the exception and always fires).
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | Move/up without an active pan | Ignored |
//! | Move/up from a different pointer | Ignored |
//! | Zero or NaN wheel delta | Ignored |
//! | Zoom already at a bound | No-op, no callback |
//! | Non-finite restored zoom | Replaced with 1.0, then clamped |

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, PointerButton, PointerEvent, PointerEventKind,
    PointerId, WheelEvent,
};
use crate::geometry::{Point, Size};

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.25;
/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 2.0;
/// Zoom increment per wheel notch or zoom button press.
pub const ZOOM_STEP: f64 = 0.1;

/// The pan/zoom transform: `screen = world * zoom + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Viewport {
    /// No pan, zoom 1.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a viewport.
    pub const fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }

    /// Convert a container-relative screen point to canvas coordinates.
    #[must_use]
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.zoom, (p.y - self.y) / self.zoom)
    }

    /// Convert a canvas point to container-relative screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.x, p.y * self.zoom + self.y)
    }

    /// Rescale to `zoom`, keeping the world point under `anchor` in place.
    #[must_use]
    pub fn zoomed_at(&self, zoom: f64, anchor: Point) -> Self {
        let scale = zoom / self.zoom;
        Self {
            x: anchor.x - (anchor.x - self.x) * scale,
            y: anchor.y - (anchor.y - self.y) * scale,
            zoom,
        }
    }
}

/// Zoom limits and step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl ViewportConfig {
    /// Set the zoom range.
    #[must_use]
    pub fn with_zoom_range(mut self, min: f64, max: f64) -> Self {
        self.zoom_min = min;
        self.zoom_max = max;
        self
    }

    /// Set the zoom step.
    #[must_use]
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }

    /// Repair nonsensical values instead of rejecting them.
    ///
    /// Swapped bounds are reordered; non-positive or non-finite values fall
    /// back to the defaults.
    #[must_use]
    pub fn normalized(self) -> Self {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        let mut min = if valid(self.zoom_min) { self.zoom_min } else { ZOOM_MIN };
        let mut max = if valid(self.zoom_max) { self.zoom_max } else { ZOOM_MAX };
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        let step = if valid(self.zoom_step) { self.zoom_step } else { ZOOM_STEP };
        Self {
            zoom_min: min,
            zoom_max: max,
            zoom_step: step,
        }
    }

    /// Clamp a zoom factor into range.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        zoom.clamp(self.zoom_min, self.zoom_max)
    }
}

/// Interaction state of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanState {
    Idle,
    Panning {
        /// Captured pointer; move/up from other pointers are ignored.
        pointer: PointerId,
        pointer_start: Point,
        viewport_start: Viewport,
    },
}

type ChangeCallback = Box<dyn FnMut(Viewport)>;

/// Pan/zoom state machine for one board canvas.
///
/// Each open board owns its own controller.
pub struct ViewportController {
    viewport: Viewport,
    config: ViewportConfig,
    state: PanState,
    space_held: bool,
    container: Size,
    on_change: Option<ChangeCallback>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl ViewportController {
    /// Create an idle controller at the identity viewport.
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            viewport: Viewport::IDENTITY,
            config: config.normalized(),
            state: PanState::Idle,
            space_held: false,
            container: Size::default(),
            on_change: None,
        }
    }

    /// Start from a restored viewport (zoom is clamped, no callback).
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = self.sanitize(viewport);
        self
    }

    /// Register the callback invoked after every viewport change.
    pub fn on_viewport_change(&mut self, callback: impl FnMut(Viewport) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Current transform.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Current interaction state.
    #[must_use]
    pub fn state(&self) -> PanState {
        self.state
    }

    /// True while a pan gesture is active.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self.state, PanState::Panning { .. })
    }

    /// The pointer captured by an active pan, if any.
    #[must_use]
    pub fn captured_pointer(&self) -> Option<PointerId> {
        match self.state {
            PanState::Panning { pointer, .. } => Some(pointer),
            PanState::Idle => None,
        }
    }

    /// Whether the space modifier is currently held.
    #[must_use]
    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    /// Size of the element hosting the canvas; `zoom_in`/`zoom_out` anchor
    /// on its centre.
    pub fn set_container_size(&mut self, size: Size) {
        self.container = size;
    }

    /// Replace the viewport, e.g. when a stored board is restored.
    ///
    /// Returns `true` if the viewport changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        let next = self.sanitize(viewport);
        self.apply(next)
    }

    /// Dispatch any canvas event. Returns `true` if the controller consumed it.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Pointer(ev) => match ev.kind {
                PointerEventKind::Down => self.handle_pointer_down(ev),
                PointerEventKind::Move => self.handle_pointer_move(ev),
                PointerEventKind::Up => self.handle_pointer_up(ev),
            },
            Event::Wheel(ev) => self.handle_wheel(ev),
            Event::Key(ev) => match ev.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => self.handle_key_down(ev),
                KeyEventKind::Release => self.handle_key_up(ev),
            },
        }
    }

    /// Begin a pan on middle-button down, or primary-button down while
    /// space is held. Any other press is left for the host (node drags,
    /// selection).
    pub fn handle_pointer_down(&mut self, ev: &PointerEvent) -> bool {
        if self.is_panning() {
            return false;
        }
        let starts_pan = match ev.button {
            PointerButton::Middle => true,
            PointerButton::Primary => self.space_held,
            PointerButton::Secondary | PointerButton::Other(_) => false,
        };
        if !starts_pan {
            return false;
        }
        self.state = PanState::Panning {
            pointer: ev.pointer_id,
            pointer_start: ev.position,
            viewport_start: self.viewport,
        };
        tracing::trace!(
            pointer = ev.pointer_id.0,
            x = ev.position.x,
            y = ev.position.y,
            "viewport pan started"
        );
        true
    }

    /// Translate the viewport by the pointer's travel since the pan began.
    pub fn handle_pointer_move(&mut self, ev: &PointerEvent) -> bool {
        let PanState::Panning {
            pointer,
            pointer_start,
            viewport_start,
        } = self.state
        else {
            return false;
        };
        if pointer != ev.pointer_id {
            return false;
        }
        let delta = ev.position - pointer_start;
        self.apply(Viewport::new(
            viewport_start.x + delta.x,
            viewport_start.y + delta.y,
            self.viewport.zoom,
        ));
        true
    }

    /// End the pan and release pointer capture.
    pub fn handle_pointer_up(&mut self, ev: &PointerEvent) -> bool {
        match self.state {
            PanState::Panning { pointer, .. } if pointer == ev.pointer_id => {
                self.state = PanState::Idle;
                tracing::trace!(
                    x = self.viewport.x,
                    y = self.viewport.y,
                    "viewport pan finished"
                );
                true
            }
            _ => false,
        }
    }

    /// Zoom one step toward or away from the cursor.
    pub fn handle_wheel(&mut self, ev: &WheelEvent) -> bool {
        if ev.delta_y == 0.0 || ev.delta_y.is_nan() {
            return false;
        }
        let direction = (-ev.delta_y).signum();
        self.zoom_by(direction, ev.position)
    }

    /// Track the space modifier. Key repeat is ignored so only the first
    /// press of a hold counts. Escape aborts an active pan.
    pub fn handle_key_down(&mut self, ev: &KeyEvent) -> bool {
        match ev.code {
            KeyCode::Space => {
                if ev.is_repeat() || self.space_held {
                    return false;
                }
                self.space_held = true;
                true
            }
            KeyCode::Escape => self.cancel(),
            KeyCode::Char(_) | KeyCode::Other => false,
        }
    }

    /// Release the space modifier. An active pan keeps going until pointer up.
    pub fn handle_key_up(&mut self, ev: &KeyEvent) -> bool {
        if ev.code != KeyCode::Space || !self.space_held {
            return false;
        }
        self.space_held = false;
        true
    }

    /// Zoom in one step around the container centre.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(1.0, self.container.center())
    }

    /// Zoom out one step around the container centre.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-1.0, self.container.center())
    }

    /// Jump back to the identity viewport. Always notifies.
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::IDENTITY;
        self.notify();
    }

    /// Abort an active pan, restoring the viewport it started from and
    /// releasing capture. Used on Escape or focus loss.
    pub fn cancel(&mut self) -> bool {
        let PanState::Panning { viewport_start, .. } = self.state else {
            return false;
        };
        self.state = PanState::Idle;
        self.apply(viewport_start);
        tracing::trace!("viewport pan cancelled");
        true
    }

    fn zoom_by(&mut self, direction: f64, anchor: Point) -> bool {
        let old = self.viewport.zoom;
        let new = self.config.clamp_zoom(old + direction * self.config.zoom_step);
        if new == old {
            return false;
        }
        let next = self.viewport.zoomed_at(new, anchor);
        tracing::trace!(from = old, to = new, ax = anchor.x, ay = anchor.y, "viewport zoom");
        self.apply(next)
    }

    fn sanitize(&self, viewport: Viewport) -> Viewport {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Viewport::new(
            finite(viewport.x),
            finite(viewport.y),
            self.config.clamp_zoom(viewport.zoom),
        )
    }

    fn apply(&mut self, next: Viewport) -> bool {
        if next == self.viewport {
            return false;
        }
        self.viewport = next;
        self.notify();
        true
    }

    fn notify(&mut self) {
        let viewport = self.viewport;
        if let Some(callback) = self.on_change.as_mut() {
            callback(viewport);
        }
    }
}

impl fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("viewport", &self.viewport)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("space_held", &self.space_held)
            .field("container", &self.container)
            .field("has_callback", &self.on_change.is_some())
            .finish()
    }
}
