//! Vertex and side entities.
//!
//! - `MovementState`: blocked/active flags shared by vertices and sides.
//! - `Vertex`: position plus derived interior angle and drag region.
//! - `Side`: two vertex labels; length is recomputed on every call.

use serde::{Deserialize, Serialize};

use super::labels::{SideLabel, VertexLabel};
use crate::collision::BlockReason;
use crate::geom::{CollisionBody, Point2};

/// Why further movement is currently prevented, plus the drag flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementState {
    pub blocked_by_bounds: bool,
    pub blocked_by_shape: bool,
    pub is_active: bool,
}

impl MovementState {
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked_by_bounds || self.blocked_by_shape
    }

    /// Overwrite the blocked flags from a collision verdict.
    pub fn record(&mut self, reason: BlockReason) {
        self.blocked_by_bounds = reason == BlockReason::BoundsCollision;
        self.blocked_by_shape =
            matches!(reason, BlockReason::ShapeCollision | BlockReason::Degenerate);
    }

    #[inline]
    pub fn clear_blocked(&mut self) {
        self.blocked_by_bounds = false;
        self.blocked_by_shape = false;
    }
}

/// One corner of the figure. Owned by `Shape`; only the solver's commit step
/// writes `position`.
#[derive(Clone, Debug)]
pub struct Vertex {
    label: VertexLabel,
    pub(crate) position: Point2,
    pub(crate) angle: Option<f64>,
    pub(crate) movement: MovementState,
    pub(crate) drag_region: CollisionBody,
}

impl Vertex {
    pub(crate) fn new(label: VertexLabel, position: Point2) -> Self {
        Self {
            label,
            position,
            angle: None,
            movement: MovementState::default(),
            drag_region: CollisionBody::default(),
        }
    }

    #[inline]
    pub fn label(&self) -> VertexLabel {
        self.label
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Interior angle in `(0, 2π)`; `None` while a neighbour coincides with this vertex.
    #[inline]
    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    #[inline]
    pub fn movement(&self) -> MovementState {
        self.movement
    }

    /// Advisory convex region this vertex can currently be dragged within.
    #[inline]
    pub fn drag_region(&self) -> &CollisionBody {
        &self.drag_region
    }
}

/// Segment between two consecutive vertices.
#[derive(Clone, Debug)]
pub struct Side {
    label: SideLabel,
    pub(crate) movement: MovementState,
}

impl Side {
    pub(crate) fn new(label: SideLabel) -> Self {
        Self {
            label,
            movement: MovementState::default(),
        }
    }

    #[inline]
    pub fn label(&self) -> SideLabel {
        self.label
    }

    #[inline]
    pub fn movement(&self) -> MovementState {
        self.movement
    }

    /// Endpoint positions looked up from the owning vertex array.
    #[inline]
    pub fn endpoints(&self, vertices: &[Vertex; 4]) -> (Point2, Point2) {
        let (a, b) = self.label.vertices();
        (vertices[a.index()].position, vertices[b.index()].position)
    }

    #[inline]
    pub fn length(&self, vertices: &[Vertex; 4]) -> f64 {
        let (p, q) = self.endpoints(vertices);
        (q - p).norm()
    }

    /// Direction angle of `start → end` in `(-π, π]`.
    #[inline]
    pub fn orientation(&self, vertices: &[Vertex; 4]) -> f64 {
        let (p, q) = self.endpoints(vertices);
        let d = q - p;
        d.y.atan2(d.x)
    }
}
