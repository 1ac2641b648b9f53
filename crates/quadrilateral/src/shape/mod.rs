//! The four-vertex figure: labels, entities and the `Shape` aggregate.
//!
//! Purpose
//! - Hold exactly four vertices in the fixed cyclic order A–B–C–D and the four
//!   sides between consecutive vertices.
//! - Guarantee, after construction and after every accepted move, that the
//!   polygon is simple, counter-clockwise with area above `min_area`, has every
//!   side above `min_side_length`, and interior angles summing to 2π.
//!
//! Only `crate::solver` writes positions (through `Shape::commit`).
//!
//! Code cross-refs: `crate::collision::CollisionDetector`, `crate::solver::MoveSolver`

mod entities;
mod error;
mod labels;
mod quad;

pub use entities::{MovementState, Side, Vertex};
pub use error::ShapeError;
pub use labels::{LabelParseError, SideLabel, VertexLabel, VertexPair};
pub use quad::Shape;
