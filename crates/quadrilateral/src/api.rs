//! Curated surface for callers (CLI, benches, tests).
//!
//! Prefer these re-exports for consistency across tools; breaking changes follow
//! the module paths they point at.

// Geometry
pub use crate::geom::{
    angle_between, centroid, interior_angle, polygon_signed_area, segments_intersect,
    signed_area, CollisionBody, Point2, Tolerances,
};
// Figure model
pub use crate::shape::{
    LabelParseError, MovementState, Shape, ShapeError, Side, SideLabel, Vertex, VertexLabel,
    VertexPair,
};
// Constraints and moves
pub use crate::collision::{BlockReason, Bounds, CollisionDetector, CollisionResult};
pub use crate::solver::{
    Direction, KeyStep, MoveCfg, MoveOutcome, MoveSolver, RotationOutcome, SideMoveOutcome,
};
// Classification
pub use crate::classifier::{classify, NamedQuadrilateralCategory, Predicates};
pub use crate::snapshot::{CategoryChange, ChangeDetector, ShapeSnapshot};
// Session
pub use crate::session::{
    DeviceSample, MoveRequest, RequestOutcome, RequestSender, Session, TickReport,
};
// Random figures
pub use crate::rand::{draw_quad_radial, draw_shape, DeviceNoise, RadialCfg, ReplayToken};
