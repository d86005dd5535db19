//! Input model: modifier keys, mouse buttons, handle directions, and the
//! gesture state machine.
//!
//! `Modifiers` captures the user's intent at the time of a pointer event.
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying everything needed to recompute geometry from the
//! gesture's start on each move. Geometry is always derived from the start
//! state, never accumulated tick by tick.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::LayerId;
use crate::snap::Rect;

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift: toggles selection on click; locks aspect ratio while resizing.
    pub shift: bool,
    /// Alt / Option: resize symmetrically about the layer's center.
    pub alt: bool,
    /// Space: suppresses layer interaction so the pointer pans the canvas.
    pub space: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// One of the eight resize grips around a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleDirection {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl HandleDirection {
    /// All directions, clockwise from north.
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    #[must_use]
    pub fn moves_horizontal(self) -> bool {
        self.moves_left() || self.moves_right()
    }

    #[must_use]
    pub fn moves_vertical(self) -> bool {
        self.moves_top() || self.moves_bottom()
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        self.moves_horizontal() && self.moves_vertical()
    }

    /// Position of this handle on `rect`.
    #[must_use]
    pub fn anchor_point(self, rect: &Rect) -> Point {
        let x = if self.moves_left() {
            rect.left()
        } else if self.moves_right() {
            rect.right()
        } else {
            rect.center_x()
        };
        let y = if self.moves_top() {
            rect.top()
        } else if self.moves_bottom() {
            rect.bottom()
        } else {
            rect.center_y()
        };
        Point::new(x, y)
    }
}

/// Persistent UI state the engine reads and the host renders.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Selected layer ids in selection order, without duplicates.
    pub selection: Vec<LayerId>,
    /// Snapping on or off.
    pub snap_enabled: bool,
    /// Snap distance in canvas units.
    pub snap_threshold: f64,
}

impl Default for UiState {
    fn default() -> Self {
        Self { selection: Vec::new(), snap_enabled: true, snap_threshold: crate::consts::SNAP_THRESHOLD }
    }
}

impl UiState {
    #[must_use]
    pub fn is_selected(&self, id: &LayerId) -> bool {
        self.selection.contains(id)
    }

    /// Replace the selection with a single layer.
    pub fn select_only(&mut self, id: LayerId) {
        self.selection.clear();
        self.selection.push(id);
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: LayerId) -> bool {
        if let Some(index) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(index);
            false
        } else {
            self.selection.push(id);
            true
        }
    }
}

/// Start-of-gesture record for one dragged layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOrigin {
    pub id: LayerId,
    /// Pixel rectangle at gesture start.
    pub rect: Rect,
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed to recompute
/// geometry from the start on every move.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas with space held.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// The user is moving the current selection.
    Dragging {
        /// Screen-space pointer position at gesture start.
        start_screen: Point,
        /// Every dragged layer's pixel rectangle at gesture start.
        origins: Vec<DragOrigin>,
        /// Set once any move has written geometry.
        moved: bool,
    },
    /// The user is resizing a single layer by one of its eight handles.
    Resizing {
        id: LayerId,
        direction: HandleDirection,
        /// Screen-space pointer position at gesture start.
        start_screen: Point,
        /// Pixel rectangle at gesture start.
        orig: Rect,
        /// Set once any move has written geometry.
        moved: bool,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
