//! Quadrilateral constraint and classification engine.
//!
//! A single four-vertex figure is kept valid (simple, counter-clockwise,
//! non-degenerate, inside its bounds) while vertices, sides or the whole
//! figure are moved, and every state is classified into one named category.
//!
//! Layout
//! - `geom`: planar helpers and convex collision bodies.
//! - `shape`: labels, vertex/side entities, the `Shape` aggregate.
//! - `collision`: validity of candidate positions and block reasons.
//! - `solver`: path-sampled moves that stop at the last valid position.
//! - `snapshot`, `classifier`: derived measurements and category rules.
//! - `session`: per-tick request queue and category-change events.
//! - `rand`: seeded random figures and device-noise jitter.
//!
//! API Policy
//! - `api` and `prelude` are convenience surfaces; module paths are the source
//!   of truth and may change together with them.

pub mod api;
mod cfg;
pub mod classifier;
pub mod collision;
pub mod geom;
pub mod rand;
pub mod session;
pub mod shape;
pub mod snapshot;
pub mod solver;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use classifier::{classify, NamedQuadrilateralCategory};
pub use geom::{Point2, Tolerances};
pub use nalgebra::Vector2 as Vec2;
pub use shape::{Shape, ShapeError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::classifier::{classify, NamedQuadrilateralCategory};
    pub use crate::collision::{BlockReason, Bounds};
    pub use crate::geom::{Point2, Tolerances};
    pub use crate::session::{MoveRequest, Session, TickReport};
    pub use crate::shape::{Shape, SideLabel, VertexLabel};
    pub use crate::snapshot::{CategoryChange, ShapeSnapshot};
    pub use crate::solver::{Direction, KeyStep, MoveCfg, MoveOutcome, MoveSolver};
}
