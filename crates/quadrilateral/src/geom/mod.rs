//! Planar geometry helpers for the four-vertex figure.
//!
//! Purpose
//! - Point/vector arithmetic on `nalgebra::Vector2<f64>`, angle-between,
//!   segment intersection, shoelace area and eps-aware comparisons.
//! - Convex point-list bodies with a separating-axis overlap test and
//!   half-plane clipping (bounds checks, drag regions).
//!
//! All functions are total: degenerate input yields `None` or a well-defined
//! boolean instead of a panic.
//!
//! Code cross-refs: `Tolerances`, `CollisionBody`, `crate::collision`

mod sat;
mod types;
mod util;

pub use sat::CollisionBody;
pub use types::{Point2, Tolerances};
pub use util::{
    angle_between, centroid, cross, interior_angle, nearly_equal, polygon_signed_area,
    rotate_about, segments_intersect, signed_area,
};

#[cfg(test)]
mod tests;
