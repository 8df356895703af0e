//! Mesh point dragging.
//!
//! [`MeshInteraction`] is a two-state machine. A pointer-down on a mesh handle
//! captures that point; every following move writes the point's new position
//! straight into the [`DocumentStore`]; pointer-up or leaving the surface releases
//! it. There is no preview state: each intermediate position is committed.

use serde::{Deserialize, Serialize};

use crate::command::MeshPointUpdate;
use crate::{
    BackgroundKind, DocumentStore, GradientKind, MeshPoint, MeshPointId, Rect, Snapshot,
    StudioResult, ThumbnailState,
};

/// Side length of a mesh drag handle, in canvas pixels.
pub const HANDLE_SIZE: f32 = 24.0;

/// On-screen rectangle occupied by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge in screen pixels.
    pub left: f32,
    /// Top edge in screen pixels.
    pub top: f32,
    /// Width in screen pixels.
    pub width: f32,
    /// Height in screen pixels.
    pub height: f32,
}

impl BoundingBox {
    /// Create a bounding box.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a screen position to canvas percentages, clamped to `0..=100`.
    #[must_use]
    pub fn pointer_to_percent(&self, x: f32, y: f32) -> (f32, f32) {
        (
            to_percent(x - self.left, self.width),
            to_percent(y - self.top, self.height),
        )
    }
}

fn to_percent(offset: f32, extent: f32) -> f32 {
    if !(extent > 0.0 && extent.is_finite()) || !offset.is_finite() {
        return 0.0;
    }
    (offset / extent * 100.0).clamp(0.0, 100.0)
}

/// Phase of a pointer event on the interactive surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Event phase.
    pub phase: PointerPhase,
    /// Screen x.
    pub x: f32,
    /// Screen y.
    pub y: f32,
    /// Handle the host already hit-tested, if any.
    pub target: Option<MeshPointId>,
}

impl PointerEvent {
    /// Create an event without a pre-resolved target.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            target: None,
        }
    }

    /// Attach a hit-tested handle.
    #[must_use]
    pub fn with_target(mut self, target: MeshPointId) -> Self {
        self.target = Some(target);
        self
    }
}

/// State of the drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No point captured.
    #[default]
    Idle,
    /// The given point follows the pointer.
    Dragging(MeshPointId),
}

/// Drives mesh point drags from pointer events.
#[derive(Debug, Clone, Default)]
pub struct MeshInteraction {
    state: DragState,
}

impl MeshInteraction {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drag state.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a point is captured.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Topmost mesh handle under a screen position.
    ///
    /// Handles only exist while the background is a mesh gradient. Later points are
    /// drawn above earlier ones, so they win ties.
    #[must_use]
    pub fn hit_test(
        state: &ThumbnailState,
        bbox: &BoundingBox,
        x: f32,
        y: f32,
    ) -> Option<MeshPointId> {
        handles(state)
            .iter()
            .rev()
            .find(|p| handle_rect(state, bbox, p).contains_point(x, y))
            .map(|p| p.id)
    }

    /// Feed one pointer event.
    ///
    /// Returns the new snapshot when the event moved a point.
    ///
    /// # Errors
    ///
    /// Propagates a refused store update; the drag stays captured.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        bbox: &BoundingBox,
        store: &mut DocumentStore,
    ) -> StudioResult<Option<Snapshot>> {
        match event.phase {
            PointerPhase::Down => {
                let state = store.state();
                let target = match event.target {
                    Some(id) if handles(state).iter().any(|p| p.id == id) => Some(id),
                    Some(id) => {
                        tracing::debug!(point = %id, "pointer target has no handle, ignoring");
                        None
                    }
                    None => Self::hit_test(state, bbox, event.x, event.y),
                };
                if let Some(id) = target {
                    tracing::debug!(point = %id, "mesh drag started");
                    self.state = DragState::Dragging(id);
                }
                Ok(None)
            }
            PointerPhase::Move => {
                let DragState::Dragging(id) = self.state else {
                    return Ok(None);
                };
                let exists = store
                    .state()
                    .background()
                    .gradient
                    .mesh_points
                    .iter()
                    .any(|p| p.id == id);
                if !exists {
                    tracing::debug!(point = %id, "captured mesh point vanished, releasing");
                    self.state = DragState::Idle;
                    return Ok(None);
                }
                let (x, y) = bbox.pointer_to_percent(event.x, event.y);
                store
                    .update_mesh_point(id, &MeshPointUpdate::position(x, y))
                    .map(Some)
            }
            PointerPhase::Up | PointerPhase::Leave => {
                if let DragState::Dragging(id) = self.state {
                    tracing::debug!(point = %id, phase = ?event.phase, "mesh drag ended");
                }
                self.state = DragState::Idle;
                Ok(None)
            }
        }
    }
}

/// Mesh points that currently have drag handles.
fn handles(state: &ThumbnailState) -> &[MeshPoint] {
    let background = state.background();
    if background.kind == BackgroundKind::Gradient && background.gradient.kind == GradientKind::Mesh
    {
        &background.gradient.mesh_points
    } else {
        &[]
    }
}

/// Screen rectangle of a point's handle; the handle scales with the preview.
fn handle_rect(state: &ThumbnailState, bbox: &BoundingBox, point: &MeshPoint) -> Rect {
    let size = HANDLE_SIZE * bbox.width / state.resolution().width_f32();
    let cx = bbox.left + point.x / 100.0 * bbox.width;
    let cy = bbox.top + point.y / 100.0 * bbox.height;
    Rect::new(cx - size / 2.0, cy - size / 2.0, size, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::GradientUpdate;

    fn bbox() -> BoundingBox {
        BoundingBox::new(100.0, 50.0, 640.0, 335.0)
    }

    fn mesh_store() -> (DocumentStore, MeshPointId) {
        let mut store = DocumentStore::new();
        store
            .update_gradient(GradientUpdate {
                kind: Some(GradientKind::Mesh),
                ..GradientUpdate::default()
            })
            .expect("mesh");
        let id = store.add_mesh_point().expect("point");
        (store, id)
    }

    #[test]
    fn test_corners_map_to_extremes() {
        let b = bbox();
        assert_eq!(b.pointer_to_percent(100.0, 50.0), (0.0, 0.0));
        assert_eq!(b.pointer_to_percent(740.0, 385.0), (100.0, 100.0));
    }

    #[test]
    fn test_outside_positions_clamp() {
        let b = bbox();
        assert_eq!(b.pointer_to_percent(-500.0, -500.0), (0.0, 0.0));
        assert_eq!(b.pointer_to_percent(5000.0, 5000.0), (100.0, 100.0));
        let (x, y) = b.pointer_to_percent(420.0, 10_000.0);
        assert!((x - 50.0).abs() < 1e-4);
        assert!((y - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_degenerate_box_yields_origin() {
        let b = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(b.pointer_to_percent(10.0, 10.0), (0.0, 0.0));
    }

    #[test]
    fn test_down_on_handle_starts_drag() {
        let (mut store, id) = mesh_store();
        let mut ctl = MeshInteraction::new();
        // The new point sits at the center of the box.
        let down = PointerEvent::new(PointerPhase::Down, 420.0, 217.5);
        ctl.handle(&down, &bbox(), &mut store).expect("down");
        assert_eq!(ctl.state(), DragState::Dragging(id));
    }

    #[test]
    fn test_down_off_handle_stays_idle() {
        let (mut store, _) = mesh_store();
        let mut ctl = MeshInteraction::new();
        let down = PointerEvent::new(PointerPhase::Down, 110.0, 60.0);
        ctl.handle(&down, &bbox(), &mut store).expect("down");
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_handles_absent_outside_mesh_mode() {
        let mut store = DocumentStore::new();
        store.add_mesh_point().expect("point");
        store
            .update_gradient(GradientUpdate {
                kind: Some(GradientKind::Linear),
                ..GradientUpdate::default()
            })
            .expect("linear");
        assert!(MeshInteraction::hit_test(store.state(), &bbox(), 420.0, 217.5).is_none());
    }

    #[test]
    fn test_move_commits_each_position() {
        let (mut store, id) = mesh_store();
        let mut ctl = MeshInteraction::new();
        let b = bbox();
        ctl.handle(
            &PointerEvent::new(PointerPhase::Down, 0.0, 0.0).with_target(id),
            &b,
            &mut store,
        )
        .expect("down");

        let snap = ctl
            .handle(&PointerEvent::new(PointerPhase::Move, 100.0, 50.0), &b, &mut store)
            .expect("move")
            .expect("snapshot");
        let p = &snap.background().gradient.mesh_points[0];
        assert!(p.x.abs() < f32::EPSILON && p.y.abs() < f32::EPSILON);

        ctl.handle(&PointerEvent::new(PointerPhase::Move, 900.0, 900.0), &b, &mut store)
            .expect("move");
        let p = &store.state().background().gradient.mesh_points[0];
        assert!((p.x - 100.0).abs() < f32::EPSILON);
        assert!((p.y - 100.0).abs() < f32::EPSILON);

        ctl.handle(&PointerEvent::new(PointerPhase::Leave, 0.0, 0.0), &b, &mut store)
            .expect("leave");
        assert_eq!(ctl.state(), DragState::Idle);
        let after = ctl
            .handle(&PointerEvent::new(PointerPhase::Move, 420.0, 217.5), &b, &mut store)
            .expect("idle move");
        assert!(after.is_none());
    }

    #[test]
    fn test_vanished_point_releases_drag() {
        let (mut store, id) = mesh_store();
        let mut ctl = MeshInteraction::new();
        let b = bbox();
        ctl.handle(
            &PointerEvent::new(PointerPhase::Down, 0.0, 0.0).with_target(id),
            &b,
            &mut store,
        )
        .expect("down");
        store.remove_mesh_point(id).expect("remove");

        let result = ctl
            .handle(&PointerEvent::new(PointerPhase::Move, 300.0, 200.0), &b, &mut store)
            .expect("move");
        assert!(result.is_none());
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_host_target_ignored_outside_mesh_mode() {
        let (mut store, id) = mesh_store();
        store
            .update_gradient(GradientUpdate {
                kind: Some(GradientKind::Radial),
                ..GradientUpdate::default()
            })
            .expect("radial");
        let mut ctl = MeshInteraction::new();
        let down = PointerEvent::new(PointerPhase::Down, 420.0, 217.5).with_target(id);
        ctl.handle(&down, &bbox(), &mut store).expect("down");
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_host_target_for_unknown_point_ignored() {
        let (mut store, _) = mesh_store();
        let mut ctl = MeshInteraction::new();
        let down =
            PointerEvent::new(PointerPhase::Down, 420.0, 217.5).with_target(MeshPointId::new());
        ctl.handle(&down, &bbox(), &mut store).expect("down");
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_handle_edge_scales_with_preview() {
        let (store, id) = mesh_store();
        // Half-scale preview: the 24 px handle spans 12 screen pixels.
        let b = bbox();
        assert_eq!(MeshInteraction::hit_test(store.state(), &b, 426.0, 223.5), Some(id));
        assert!(MeshInteraction::hit_test(store.state(), &b, 426.5, 217.5).is_none());
    }
}
