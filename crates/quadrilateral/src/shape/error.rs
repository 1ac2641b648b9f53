use std::fmt;

use super::labels::{SideLabel, VertexLabel};

/// Construction-time invariant violations. Steady-state moves never produce
/// these; the solver clips or rejects instead.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeError {
    WrongVertexCount { found: usize },
    NonFinite { vertex: VertexLabel },
    NotSimple,
    NonPositiveArea { area: f64 },
    SideTooShort { side: SideLabel, length: f64 },
    OutOfBounds { vertex: VertexLabel },
    VerticesTooClose { a: VertexLabel, b: VertexLabel },
    AngleSumMismatch { sum: f64 },
    InvalidBounds { reason: String },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongVertexCount { found } => {
                write!(f, "a quadrilateral needs exactly 4 vertices, got {found}")
            }
            Self::NonFinite { vertex } => write!(f, "vertex {vertex} has a non-finite coordinate"),
            Self::NotSimple => write!(f, "sides intersect; the polygon is not simple"),
            Self::NonPositiveArea { area } => {
                write!(f, "signed area {area} is not positive (collapsed or clockwise)")
            }
            Self::SideTooShort { side, length } => {
                write!(f, "side {side} has length {length}, below the minimum")
            }
            Self::OutOfBounds { vertex } => write!(f, "vertex {vertex} lies outside the bounds"),
            Self::VerticesTooClose { a, b } => {
                write!(f, "the bodies around vertices {a} and {b} overlap")
            }
            Self::AngleSumMismatch { sum } => {
                write!(f, "interior angles sum to {sum}, expected 2π")
            }
            Self::InvalidBounds { reason } => write!(f, "invalid bounds: {reason}"),
        }
    }
}

impl std::error::Error for ShapeError {}
