//! Shape classifier: snapshot → exactly one named category.
//!
//! Purpose
//! - Evaluate a fixed set of tolerance predicates once, then walk the
//!   categories from most specific to most general and return the first match.
//!
//! Why this design
//! - A square also satisfies the rectangle, rhombus and parallelogram
//!   predicates; checking specific-to-general makes the answer unique.
//! - Every comparison goes through `nearly_equal` with the same `Tolerances`,
//!   and composite predicates are built from the same primitives, so a figure
//!   can never be a square without also passing the rhombus test.
//! - Predicates only use index relations that are preserved by cyclic
//!   relabeling and by reversing the traversal, so the result is invariant
//!   under both.
//!
//! Parallel sides are read off the angles: sides `k` and `k+2` are parallel
//! iff the two angles on the transversal side `k+3` sum to π.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::{nearly_equal, Tolerances};
use crate::snapshot::ShapeSnapshot;

/// Named quadrilateral categories, most specific first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamedQuadrilateralCategory {
    Square,
    Rectangle,
    Rhombus,
    Parallelogram,
    Kite,
    IsoscelesTrapezoid,
    Trapezoid,
    Concave,
    Generic,
}

impl NamedQuadrilateralCategory {
    pub const ALL: [NamedQuadrilateralCategory; 9] = [
        Self::Square,
        Self::Rectangle,
        Self::Rhombus,
        Self::Parallelogram,
        Self::Kite,
        Self::IsoscelesTrapezoid,
        Self::Trapezoid,
        Self::Concave,
        Self::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "SQUARE",
            Self::Rectangle => "RECTANGLE",
            Self::Rhombus => "RHOMBUS",
            Self::Parallelogram => "PARALLELOGRAM",
            Self::Kite => "KITE",
            Self::IsoscelesTrapezoid => "ISOSCELES_TRAPEZOID",
            Self::Trapezoid => "TRAPEZOID",
            Self::Concave => "CONCAVE",
            Self::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for NamedQuadrilateralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean facts about one snapshot under one set of tolerances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Predicates {
    /// Angles defined, area above `min_area`, no reflex angle.
    pub convex: bool,
    /// Angles defined and (collapsed area or some angle > π).
    pub concave: bool,
    pub all_right_angles: bool,
    pub all_sides_equal: bool,
    pub opposite_sides_equal: bool,
    pub opposite_angles_equal: bool,
    /// `[AB ∥ CD, BC ∥ DA]`.
    pub parallel: [bool; 2],
    /// Two adjacent-side pairs equal, symmetric about a diagonal.
    pub kite: bool,
    /// Exactly one parallel pair whose legs are equal.
    pub isosceles_legs: bool,
}

impl Predicates {
    pub fn evaluate(s: &ShapeSnapshot, tol: &Tolerances) -> Self {
        let l = s.lengths;
        let len_eq = |i: usize, j: usize| nearly_equal(l[i % 4], l[j % 4], tol.length_eps);
        let Some(a) = s.defined_angles() else {
            return Self::default();
        };
        let ang_eq = |i: usize, j: usize| nearly_equal(a[i % 4], a[j % 4], tol.angle_eps);

        let collapsed = s.area <= tol.min_area;
        let reflex = s.has_reflex_angle(tol.angle_eps);
        let convex = !collapsed && !reflex;

        let max_len = l.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_len = l.iter().copied().fold(f64::INFINITY, f64::min);
        let parallel: [bool; 2] =
            std::array::from_fn(|k| nearly_equal(a[k] + a[(k + 3) % 4], PI, tol.angle_eps));
        let kite = (0..2).any(|k| {
            len_eq(k + 3, k) && len_eq(k + 1, k + 2) && ang_eq(k + 1, k + 3)
        });
        let isosceles_legs = parallel[0] != parallel[1] && {
            let k = if parallel[0] { 0 } else { 1 };
            len_eq(k + 1, k + 3)
        };

        Self {
            convex,
            concave: collapsed || reflex,
            all_right_angles: a.iter().all(|&x| nearly_equal(x, FRAC_PI_2, tol.angle_eps)),
            all_sides_equal: nearly_equal(max_len, min_len, tol.length_eps),
            opposite_sides_equal: len_eq(0, 2) && len_eq(1, 3),
            opposite_angles_equal: ang_eq(0, 2) && ang_eq(1, 3),
            parallel,
            kite,
            isosceles_legs,
        }
    }

    #[inline]
    pub fn parallel_pairs(&self) -> usize {
        self.parallel.iter().filter(|&&p| p).count()
    }
}

type Rule = (NamedQuadrilateralCategory, fn(&Predicates) -> bool);

fn is_square(p: &Predicates) -> bool {
    p.convex && p.all_right_angles && p.all_sides_equal
}

fn is_rectangle(p: &Predicates) -> bool {
    p.convex && p.all_right_angles
}

fn is_rhombus(p: &Predicates) -> bool {
    p.convex && p.all_sides_equal
}

fn is_parallelogram(p: &Predicates) -> bool {
    p.convex && p.parallel_pairs() == 2
}

fn is_kite(p: &Predicates) -> bool {
    p.convex && p.kite
}

fn is_isosceles_trapezoid(p: &Predicates) -> bool {
    p.convex && p.isosceles_legs
}

fn is_trapezoid(p: &Predicates) -> bool {
    p.convex && p.parallel_pairs() == 1
}

fn is_concave(p: &Predicates) -> bool {
    p.concave
}

fn is_generic(_: &Predicates) -> bool {
    true
}

/// Resolution order; first match wins. `Generic` always matches.
const RULES: [Rule; 9] = [
    (NamedQuadrilateralCategory::Square, is_square),
    (NamedQuadrilateralCategory::Rectangle, is_rectangle),
    (NamedQuadrilateralCategory::Rhombus, is_rhombus),
    (NamedQuadrilateralCategory::Parallelogram, is_parallelogram),
    (NamedQuadrilateralCategory::Kite, is_kite),
    (NamedQuadrilateralCategory::IsoscelesTrapezoid, is_isosceles_trapezoid),
    (NamedQuadrilateralCategory::Trapezoid, is_trapezoid),
    (NamedQuadrilateralCategory::Concave, is_concave),
    (NamedQuadrilateralCategory::Generic, is_generic),
];

/// Total, deterministic classification of a snapshot.
pub fn classify(snapshot: &ShapeSnapshot, tol: &Tolerances) -> NamedQuadrilateralCategory {
    let p = Predicates::evaluate(snapshot, tol);
    RULES
        .iter()
        .find(|(_, rule)| rule(&p))
        .map(|(category, _)| *category)
        .unwrap_or(NamedQuadrilateralCategory::Generic)
}
