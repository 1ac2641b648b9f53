//! Immutable angle/length captures and category-change detection.
//!
//! A snapshot is taken after every committed move and compared against the
//! previous tick's category; nothing observes mutable fields directly.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::classifier::{classify, NamedQuadrilateralCategory};
use crate::geom::{interior_angle, polygon_signed_area, Point2, Tolerances};
use crate::shape::{SideLabel, VertexLabel};

/// Interior angles (A, B, C, D) and side lengths (AB, BC, CD, DA) at one instant.
///
/// Angles are measured on the inside of the polygon whichever way it is
/// traversed, and `area` is the unsigned enclosed area, so a mirrored
/// traversal of the same figure yields the same values in reversed order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub angles: [Option<f64>; 4],
    pub lengths: [f64; 4],
    pub area: f64,
}

impl ShapeSnapshot {
    pub fn from_points(points: &[Point2; 4]) -> Self {
        let signed = polygon_signed_area(points);
        let angles = std::array::from_fn(|i| {
            interior_angle(points[(i + 3) % 4], points[i], points[(i + 1) % 4], signed)
        });
        let lengths = std::array::from_fn(|i| (points[(i + 1) % 4] - points[i]).norm());
        Self {
            angles,
            lengths,
            area: signed.abs(),
        }
    }

    #[inline]
    pub fn angle(&self, label: VertexLabel) -> Option<f64> {
        self.angles[label.index()]
    }

    #[inline]
    pub fn length(&self, label: SideLabel) -> f64 {
        self.lengths[label.index()]
    }

    /// `None` if any angle is undefined.
    pub fn angle_sum(&self) -> Option<f64> {
        self.angles.iter().copied().sum()
    }

    /// All four angles, if defined.
    pub fn defined_angles(&self) -> Option<[f64; 4]> {
        let [a, b, c, d] = self.angles;
        Some([a?, b?, c?, d?])
    }

    /// Some angle exceeds π by more than `eps`.
    pub fn has_reflex_angle(&self, eps: f64) -> bool {
        self.angles.iter().flatten().any(|&a| a > PI + eps)
    }

    #[inline]
    pub fn classify(&self, tol: &Tolerances) -> NamedQuadrilateralCategory {
        classify(self, tol)
    }
}

/// Category transition emitted at most once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChange {
    pub previous: NamedQuadrilateralCategory,
    pub current: NamedQuadrilateralCategory,
}

/// Remembers the last observed category and reports edges.
#[derive(Clone, Copy, Debug)]
pub struct ChangeDetector {
    previous: NamedQuadrilateralCategory,
}

impl ChangeDetector {
    pub fn new(initial: NamedQuadrilateralCategory) -> Self {
        Self { previous: initial }
    }

    #[inline]
    pub fn previous(&self) -> NamedQuadrilateralCategory {
        self.previous
    }

    /// Classify `snapshot` and return a change if it differs from the last call.
    pub fn observe(&mut self, snapshot: &ShapeSnapshot, tol: &Tolerances) -> Option<CategoryChange> {
        self.observe_category(classify(snapshot, tol))
    }

    pub fn observe_category(&mut self, current: NamedQuadrilateralCategory) -> Option<CategoryChange> {
        if current == self.previous {
            return None;
        }
        let change = CategoryChange {
            previous: self.previous,
            current,
        };
        self.previous = current;
        Some(change)
    }
}
