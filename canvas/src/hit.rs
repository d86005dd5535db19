#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{LayerId, Scene, Size};
use crate::input::HandleDirection;

/// Which part of a layer was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(HandleDirection),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub layer_id: LayerId,
    pub part: HitPart,
}

/// Test which layer (if any) is under `canvas_pt` at `size`.
///
/// Resize handles of a single selected, unlocked layer are checked first, with
/// a slop of [`HANDLE_RADIUS_PX`] screen pixels. Bodies are then checked
/// topmost first. Layers absent at `size` are never hit.
#[must_use]
pub fn hit_test(canvas_pt: Point, scene: &Scene, size: Size, camera: &Camera, selection: &[LayerId]) -> Option<Hit> {
    if let [selected] = selection {
        if let Some(hit) = hit_handle(canvas_pt, scene, size, camera, selected) {
            return Some(hit);
        }
    }

    scene.layers().iter().find_map(|layer| {
        let rect = layer.rect(size)?;
        rect.contains(canvas_pt.x, canvas_pt.y)
            .then_some(Hit { layer_id: layer.id, part: HitPart::Body })
    })
}

fn hit_handle(canvas_pt: Point, scene: &Scene, size: Size, camera: &Camera, id: &LayerId) -> Option<Hit> {
    let layer = scene.layer(id)?;
    if layer.locked {
        return None;
    }
    let rect = layer.rect(size)?;
    let slop = camera.screen_dist_to_canvas(HANDLE_RADIUS_PX);
    HandleDirection::ALL.into_iter().find_map(|direction| {
        let anchor = direction.anchor_point(&rect);
        let within = (canvas_pt.x - anchor.x).abs() <= slop && (canvas_pt.y - anchor.y).abs() <= slop;
        within.then_some(Hit { layer_id: layer.id, part: HitPart::ResizeHandle(direction) })
    })
}
