//! Transform engine: turns pointer gestures into layer geometry updates.
//!
//! [`EngineCore`] owns the scene being edited, the camera, the selection and
//! the active gesture. Gestures are modal (`begin` on pointer-down, `move` on
//! every pointer-move, `end` on pointer-up or Escape) and recompute geometry
//! from the state recorded at `begin` on every tick, querying the snap solver
//! afresh each time. Every handler returns the [`Action`]s the host should
//! process; the engine itself never talks to history or rendering.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::camera::{Camera, Point};
use crate::consts::MIN_LAYER_SIZE;
use crate::doc::{Geometry, Layer, LayerId, Length, Scene, SceneError, Size};
use crate::hit::{self, HitPart};
use crate::input::{Button, DragOrigin, HandleDirection, InputState, Key, Modifiers, UiState};
use crate::snap::{self, Axis, Candidate, Guide, Rect};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A layer's geometry at `size` was rewritten.
    LayerUpdated { id: LayerId, size: Size, geometry: Geometry },
    /// The selection changed; carries the new selection in order.
    SelectionChanged(Vec<LayerId>),
    /// The advisory guide lines changed; empty means "clear guides".
    GuidesChanged(Vec<Guide>),
    /// The camera pan changed.
    PanChanged { pan_x: f64, pan_y: f64 },
    /// The camera zoom changed (pan moves with it).
    ZoomChanged { pan_x: f64, pan_y: f64, zoom: f64 },
    /// A gesture that changed the scene ended; record a history snapshot.
    Commit,
}

/// Resize modifiers resolved for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeMode {
    /// Resize symmetrically about the layer's center.
    pub center: bool,
    /// Preserve the width/height ratio.
    pub aspect: bool,
}

/// Core engine state, independent of any rendering surface.
#[derive(Debug, Default)]
pub struct EngineCore {
    scene: Scene,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    active_size: Option<Size>,
    guides: Vec<Guide>,
}

impl EngineCore {
    /// Create an engine editing `scene`, with its first size active.
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        let active_size = scene.sizes().first().copied();
        Self { scene, active_size, ..Self::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The currently selected layers, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[LayerId] {
        &self.ui.selection
    }

    #[must_use]
    pub fn active_size(&self) -> Option<Size> {
        self.active_size
    }

    /// Guides from the most recent gesture tick.
    #[must_use]
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    #[must_use]
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.scene.layer(id)
    }

    // --- Scene inputs ---

    /// Replace the whole scene, e.g. after an undo/redo restore.
    ///
    /// Any gesture in progress is dropped and selection entries that no
    /// longer exist are removed.
    pub fn replace_scene(&mut self, scene: Scene) -> Vec<Action> {
        let mut actions = Vec::new();
        self.scene = scene;
        self.input = InputState::Idle;
        if self.active_size.is_none_or(|s| !self.scene.has_size(s)) {
            self.active_size = self.scene.sizes().first().copied();
        }
        let before = self.ui.selection.len();
        let scene = &self.scene;
        self.ui.selection.retain(|id| scene.layer(id).is_some());
        if self.ui.selection.len() != before {
            actions.push(Action::SelectionChanged(self.ui.selection.clone()));
        }
        self.clear_guides(&mut actions);
        actions
    }

    /// Switch the size being edited.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownSize`] if the scene does not list `size`.
    pub fn set_active_size(&mut self, size: Size) -> Result<(), SceneError> {
        if !self.scene.has_size(size) {
            return Err(SceneError::UnknownSize(size));
        }
        self.input = InputState::Idle;
        self.guides.clear();
        self.active_size = Some(size);
        Ok(())
    }

    /// Delete a layer and drop it from the selection.
    pub fn delete_layer(&mut self, id: &LayerId) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.scene.remove_layer(id).is_none() {
            return actions;
        }
        if self.ui.is_selected(id) {
            self.ui.selection.retain(|s| s != id);
            actions.push(Action::SelectionChanged(self.ui.selection.clone()));
        }
        actions.push(Action::Commit);
        actions
    }

    // --- Selection ---

    /// Replace the selection with exactly `id`.
    pub fn select(&mut self, id: LayerId) -> Vec<Action> {
        if self.ui.selection == [id] {
            return Vec::new();
        }
        self.ui.select_only(id);
        vec![Action::SelectionChanged(self.ui.selection.clone())]
    }

    /// Add `id` to the selection, or remove it if already selected.
    pub fn toggle_selection(&mut self, id: LayerId) -> Vec<Action> {
        if self.scene.layer(&id).is_none() {
            return Vec::new();
        }
        self.ui.toggle(id);
        vec![Action::SelectionChanged(self.ui.selection.clone())]
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.ui.selection.is_empty() {
            return Vec::new();
        }
        self.ui.selection.clear();
        vec![Action::SelectionChanged(Vec::new())]
    }

    // --- Drag ---

    /// Start dragging after a pointer-down on the body of `clicked`.
    ///
    /// Selection rules: a plain click on an unselected layer selects only it,
    /// shift-click toggles it, and a plain click on a selected layer keeps the
    /// whole selection. Locked layers are never moved; if `clicked` itself
    /// ends up unselected or locked, no drag starts.
    pub fn begin_drag(&mut self, clicked: LayerId, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(size) = self.active_size else {
            return actions;
        };
        let Some(layer) = self.scene.layer(&clicked) else {
            return actions;
        };
        let clicked_locked = layer.locked;

        let selection_before = self.ui.selection.clone();
        if modifiers.shift {
            self.ui.toggle(clicked);
        } else if !self.ui.is_selected(&clicked) {
            self.ui.select_only(clicked);
        }
        if self.ui.selection != selection_before {
            actions.push(Action::SelectionChanged(self.ui.selection.clone()));
        }

        if clicked_locked || !self.ui.is_selected(&clicked) {
            return actions;
        }

        let origins: Vec<DragOrigin> = self
            .ui
            .selection
            .iter()
            .filter_map(|id| {
                let layer = self.scene.layer(id)?;
                if layer.locked {
                    return None;
                }
                Some(DragOrigin { id: *id, rect: layer.rect(size)? })
            })
            .collect();
        if origins.is_empty() {
            return actions;
        }

        tracing::debug!(layers = origins.len(), %size, "drag started");
        self.input = InputState::Dragging { start_screen: screen_pt, origins, moved: false };
        actions
    }

    /// Move the dragged selection so the pointer is at `screen_pt`.
    pub fn drag_to(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(size) = self.active_size else {
            return actions;
        };
        let InputState::Dragging { start_screen, origins, moved } = &mut self.input else {
            return actions;
        };
        let (dx, dy) = self.camera.screen_delta_to_canvas(*start_screen, screen_pt);
        *moved = true;
        let origins = origins.clone();

        let moved_rects: Vec<Rect> = origins.iter().map(|o| o.rect.offset(dx, dy)).collect();
        let Some(bbox) = Rect::bounding(&moved_rects) else {
            return actions;
        };

        let snapped = if self.ui.snap_enabled {
            let candidates = self.snap_candidates(size, |id| self.ui.is_selected(id));
            snap::solve(&bbox, &candidates, self.ui.snap_threshold)
        } else {
            snap::SnapResult::default()
        };

        let (total_dx, total_dy) = (dx + snapped.offset_x, dy + snapped.offset_y);
        for origin in &origins {
            let Some(config) = self.scene.size_config(&origin.id, size) else {
                continue;
            };
            let geometry = Geometry {
                x: Length::px(origin.rect.x + total_dx),
                y: Length::px(origin.rect.y + total_dy),
                width: config.width,
                height: config.height,
            };
            if self.scene.set_geometry(&origin.id, size, geometry).is_ok() {
                actions.push(Action::LayerUpdated { id: origin.id, size, geometry });
            }
        }

        self.set_guides(snapped.guides, &mut actions);
        actions
    }

    // --- Resize ---

    /// Start resizing `id` by the handle at `direction`.
    ///
    /// No-op when the layer is locked, absent at the active size, or when
    /// more than one layer is selected.
    pub fn begin_resize(&mut self, id: LayerId, direction: HandleDirection, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(size) = self.active_size else {
            return actions;
        };
        if self.ui.selection.len() > 1 {
            return actions;
        }
        let Some(layer) = self.scene.layer(&id) else {
            return actions;
        };
        if layer.locked {
            return actions;
        }
        let Some(orig) = layer.rect(size) else {
            return actions;
        };

        if self.ui.selection != [id] {
            self.ui.select_only(id);
            actions.push(Action::SelectionChanged(self.ui.selection.clone()));
        }

        tracing::debug!(%id, ?direction, %size, "resize started");
        self.input = InputState::Resizing { id, direction, start_screen: screen_pt, orig, moved: false };
        actions
    }

    /// Resize so the grabbed handle follows the pointer at `screen_pt`.
    ///
    /// Shift (or the layer's persistent aspect lock) preserves the aspect
    /// ratio; Alt resizes about the center.
    pub fn resize_to(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(size) = self.active_size else {
            return actions;
        };
        let InputState::Resizing { id, direction, start_screen, orig, moved } = &mut self.input else {
            return actions;
        };
        let (id, direction, orig) = (*id, *direction, *orig);
        let (dx, dy) = self.camera.screen_delta_to_canvas(*start_screen, screen_pt);
        *moved = true;

        let persistent_lock = self.scene.layer(&id).is_some_and(|l| l.aspect_ratio_locked);
        let mode = ResizeMode { center: modifiers.alt, aspect: persistent_lock || modifiers.shift };

        let (rect, guides) = if self.ui.snap_enabled {
            let candidates = self.snap_candidates(size, |other| *other == id);
            snapped_resize(orig, direction, mode, dx, dy, &candidates, self.ui.snap_threshold)
        } else {
            (resize_rect(orig, direction, mode, dx, dy, None), Vec::new())
        };

        let geometry = Geometry::from_rect(rect);
        if self.scene.set_geometry(&id, size, geometry).is_ok() {
            actions.push(Action::LayerUpdated { id, size, geometry });
        }
        self.set_guides(guides, &mut actions);
        actions
    }

    // --- Gesture end ---

    /// Finish the active gesture. Geometry written during the gesture stays;
    /// a [`Action::Commit`] is emitted if anything changed.
    pub fn end_gesture(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        let changed = match std::mem::take(&mut self.input) {
            InputState::Dragging { moved, .. } | InputState::Resizing { moved, .. } => moved,
            InputState::Panning { .. } | InputState::Idle => false,
        };
        self.clear_guides(&mut actions);
        if changed {
            tracing::debug!("gesture committed");
            actions.push(Action::Commit);
        }
        actions
    }

    /// End a drag; no-op unless a drag is active.
    pub fn end_drag(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Dragging { .. }) { self.end_gesture() } else { Vec::new() }
    }

    /// End a resize; no-op unless a resize is active.
    pub fn end_resize(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Resizing { .. }) { self.end_gesture() } else { Vec::new() }
    }

    /// Abort the active gesture (Escape). There is no rollback, so this is
    /// the same as ending it.
    pub fn cancel(&mut self) -> Vec<Action> {
        if !self.input.is_idle() {
            tracing::debug!("gesture cancelled");
        }
        self.end_gesture()
    }

    // --- Host event wiring ---

    /// Pointer pressed at `screen_pt`.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_idle() {
            return Vec::new();
        }
        if modifiers.space {
            self.input = InputState::Panning { last_screen: screen_pt };
            return Vec::new();
        }
        let Some(size) = self.active_size else {
            return Vec::new();
        };

        let canvas_pt = self.camera.screen_to_canvas(screen_pt);
        match hit::hit_test(canvas_pt, &self.scene, size, &self.camera, &self.ui.selection) {
            Some(hit) => match hit.part {
                HitPart::ResizeHandle(direction) => self.begin_resize(hit.layer_id, direction, screen_pt),
                HitPart::Body => self.begin_drag(hit.layer_id, screen_pt, modifiers),
            },
            None if modifiers.shift => Vec::new(),
            None => self.clear_selection(),
        }
    }

    /// Pointer moved to `screen_pt`. Hosts should capture the pointer so
    /// moves outside the canvas still arrive.
    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        if let InputState::Panning { last_screen } = &mut self.input {
            self.camera.pan_x += screen_pt.x - last_screen.x;
            self.camera.pan_y += screen_pt.y - last_screen.y;
            *last_screen = screen_pt;
            return vec![Action::PanChanged { pan_x: self.camera.pan_x, pan_y: self.camera.pan_y }];
        }
        match self.input {
            InputState::Dragging { .. } => self.drag_to(screen_pt),
            InputState::Resizing { .. } => self.resize_to(screen_pt, modifiers),
            InputState::Idle | InputState::Panning { .. } => Vec::new(),
        }
    }

    /// Pointer released.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.end_gesture()
    }

    /// Wheel scrolled over `screen_pt`. Negative `delta_y` zooms in.
    pub fn on_wheel(&mut self, screen_pt: Point, delta_y: f64) -> Vec<Action> {
        if !delta_y.is_finite() || delta_y.abs() < f64::EPSILON {
            return Vec::new();
        }
        let before = self.camera.zoom;
        self.camera.zoom_about(screen_pt, (-delta_y * 0.001).exp());
        if (self.camera.zoom - before).abs() < f64::EPSILON {
            return Vec::new();
        }
        vec![Action::ZoomChanged { pan_x: self.camera.pan_x, pan_y: self.camera.pan_y, zoom: self.camera.zoom }]
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() { self.cancel() } else { Vec::new() }
    }

    // --- Internals ---

    /// Snap candidates at `size`: the canvas first, then every visible layer
    /// not matched by `exclude`, in z-order.
    fn snap_candidates<F>(&self, size: Size, exclude: F) -> Vec<Candidate>
    where
        F: Fn(&LayerId) -> bool,
    {
        std::iter::once(Candidate::Canvas(size.bounds()))
            .chain(
                self.scene
                    .layers()
                    .iter()
                    .filter(|l| !exclude(&l.id))
                    .filter_map(|l| l.rect(size).map(Candidate::Layer)),
            )
            .collect()
    }

    fn set_guides(&mut self, guides: Vec<Guide>, actions: &mut Vec<Action>) {
        if guides != self.guides {
            self.guides = guides;
            actions.push(Action::GuidesChanged(self.guides.clone()));
        }
    }

    fn clear_guides(&mut self, actions: &mut Vec<Action>) {
        self.set_guides(Vec::new(), actions);
    }
}

// =============================================================
// Resize geometry
// =============================================================

/// Geometry for a resize of `orig` by handle `direction` with pointer delta
/// `(dx, dy)` in canvas units.
///
/// In every mode the grabbed edge moves by exactly the pointer delta (until
/// a clamp kicks in), so an edge can be placed at canvas position `t` by
/// passing `t - original_edge` as the delta.
///
/// `driver` forces which axis determines the scale when the aspect ratio is
/// locked; `None` lets a corner pick the axis with the larger delta.
#[must_use]
pub fn resize_rect(orig: Rect, direction: HandleDirection, mode: ResizeMode, dx: f64, dy: f64, driver: Option<Axis>) -> Rect {
    let sx = if direction.moves_left() { -1.0 } else { 1.0 };
    let sy = if direction.moves_top() { -1.0 } else { 1.0 };
    let k = if mode.center { 2.0 } else { 1.0 };
    let target_w = orig.width + k * sx * dx;
    let target_h = orig.height + k * sy * dy;

    let aspect = mode.aspect && orig.width > 0.0 && orig.height > 0.0;
    if !aspect {
        let w = if direction.moves_horizontal() { target_w.max(MIN_LAYER_SIZE) } else { orig.width };
        let h = if direction.moves_vertical() { target_h.max(MIN_LAYER_SIZE) } else { orig.height };
        return place(orig, direction, mode.center, w, h);
    }

    let axis = driver.unwrap_or(if direction.is_corner() {
        if dx.abs() >= dy.abs() { Axis::X } else { Axis::Y }
    } else if direction.moves_horizontal() {
        Axis::X
    } else {
        Axis::Y
    });
    let scale = match axis {
        Axis::X => target_w / orig.width,
        Axis::Y => target_h / orig.height,
    };
    let min_scale = (MIN_LAYER_SIZE / orig.width).max(MIN_LAYER_SIZE / orig.height);
    let scale = scale.max(min_scale);
    place(orig, direction, mode.center, orig.width * scale, orig.height * scale)
}

/// Position a `w`×`h` box so the anchor implied by `direction` stays fixed:
/// the center when resizing from center, otherwise the opposite corner or
/// the center of the opposite edge.
fn place(orig: Rect, direction: HandleDirection, center: bool, w: f64, h: f64) -> Rect {
    if center {
        return Rect::new(orig.center_x() - w / 2.0, orig.center_y() - h / 2.0, w, h);
    }
    let x = if direction.moves_left() {
        orig.right() - w
    } else if direction.moves_right() {
        orig.x
    } else {
        orig.center_x() - w / 2.0
    };
    let y = if direction.moves_top() {
        orig.bottom() - h
    } else if direction.moves_bottom() {
        orig.y
    } else {
        orig.center_y() - h / 2.0
    };
    Rect::new(x, y, w, h)
}

/// Resize, then snap each edge the handle moves and re-derive the geometry
/// from the snapped edge under the same mode.
///
/// With the aspect ratio locked only one axis may snap (horizontal first);
/// the other axis follows from the ratio.
#[must_use]
pub fn snapped_resize(
    orig: Rect,
    direction: HandleDirection,
    mode: ResizeMode,
    dx: f64,
    dy: f64,
    candidates: &[Candidate],
    threshold: f64,
) -> (Rect, Vec<Guide>) {
    let base = resize_rect(orig, direction, mode, dx, dy, None);

    let edge_x = if direction.moves_right() {
        Some((base.right(), orig.right()))
    } else if direction.moves_left() {
        Some((base.left(), orig.left()))
    } else {
        None
    };
    let edge_y = if direction.moves_bottom() {
        Some((base.bottom(), orig.bottom()))
    } else if direction.moves_top() {
        Some((base.top(), orig.top()))
    } else {
        None
    };

    let snap_x = edge_x.and_then(|(now, start)| {
        snap::snap_line(now, Axis::X, candidates, threshold).map(|line| (line - start, line))
    });
    let snap_y = edge_y.and_then(|(now, start)| {
        snap::snap_line(now, Axis::Y, candidates, threshold).map(|line| (line - start, line))
    });

    let (rect, guides) = if mode.aspect {
        if let Some((snap_dx, line)) = snap_x {
            (resize_rect(orig, direction, mode, snap_dx, dy, Some(Axis::X)), vec![Guide::Vertical(line)])
        } else if let Some((snap_dy, line)) = snap_y {
            (resize_rect(orig, direction, mode, dx, snap_dy, Some(Axis::Y)), vec![Guide::Horizontal(line)])
        } else {
            (base, Vec::new())
        }
    } else {
        let mut guides = Vec::new();
        let final_dx = snap_x.map_or(dx, |(snap_dx, line)| {
            guides.push(Guide::Vertical(line));
            snap_dx
        });
        let final_dy = snap_y.map_or(dy, |(snap_dy, line)| {
            guides.push(Guide::Horizontal(line));
            snap_dy
        });
        (resize_rect(orig, direction, mode, final_dx, final_dy, None), guides)
    };

    // The minimum size can pull a snapped edge back off its line.
    let guides = guides.into_iter().filter(|guide| edge_on_guide(rect, direction, *guide)).collect();
    (rect, guides)
}

/// Whether the edge `direction` moves still lies on `guide`.
fn edge_on_guide(rect: Rect, direction: HandleDirection, guide: Guide) -> bool {
    let (edge, line) = match guide {
        Guide::Vertical(line) if direction.moves_right() => (rect.right(), line),
        Guide::Vertical(line) if direction.moves_left() => (rect.left(), line),
        Guide::Horizontal(line) if direction.moves_bottom() => (rect.bottom(), line),
        Guide::Horizontal(line) if direction.moves_top() => (rect.top(), line),
        Guide::Vertical(_) | Guide::Horizontal(_) => return false,
    };
    (edge - line).abs() < 1e-6
}
