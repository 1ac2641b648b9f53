//! Convex point-list bodies and the separating-axis test.
//!
//! A body is a convex polygon in counter-clockwise order. One point is a
//! degenerate body with no axes of its own, so `overlaps` against a point is
//! the point-in-polygon test.

use super::types::Point2;
use super::util::{cross, polygon_signed_area};
use crate::cfg::ORIENT_EPS;

/// Convex polygon used for overlap/containment queries.
///
/// Invariants:
/// - Points are in counter-clockwise order (or a single point / segment).
/// - Bodies are rebuilt from positions for each query; nothing caches them
///   across moves except the advisory drag regions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionBody {
    points: Vec<Point2>,
}

impl CollisionBody {
    /// Wrap a convex point list, re-ordering to counter-clockwise if needed.
    pub fn new(mut points: Vec<Point2>) -> Self {
        if polygon_signed_area(&points) < 0.0 {
            points.reverse();
        }
        Self { points }
    }

    /// Degenerate body of a single point.
    #[inline]
    pub fn point(p: Point2) -> Self {
        Self { points: vec![p] }
    }

    /// Axis-aligned rectangle with corners `min` and `max`.
    pub fn rect(min: Point2, max: Point2) -> Self {
        Self {
            points: vec![
                Point2::new(min.x, min.y),
                Point2::new(max.x, min.y),
                Point2::new(max.x, max.y),
                Point2::new(min.x, max.y),
            ],
        }
    }

    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        polygon_signed_area(&self.points)
    }

    /// Convexity check (counter-clockwise, no reflex turn, non-zero area).
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        if n < 3 || self.area() <= 0.0 {
            return false;
        }
        (0..n).all(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            cross(b - a, c - b) >= -ORIENT_EPS
        })
    }

    /// Edge normals (not normalized). Zero-length edges are skipped.
    fn axes(&self) -> impl Iterator<Item = Point2> + '_ {
        let n = self.points.len();
        let edges = if n < 2 { 0 } else { n };
        (0..edges).filter_map(move |i| {
            let e = self.points[(i + 1) % n] - self.points[i];
            if e.norm() <= ORIENT_EPS {
                None
            } else {
                Some(Point2::new(e.y, -e.x))
            }
        })
    }

    /// Projection interval of the body onto `axis`.
    pub fn project(&self, axis: Point2) -> (f64, f64) {
        self.points
            .iter()
            .map(|p| p.dot(&axis))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            })
    }

    /// Separating-axis overlap test. Touching counts as overlapping.
    pub fn overlaps(&self, other: &CollisionBody) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        for axis in self.axes().chain(other.axes()) {
            let (a_lo, a_hi) = self.project(axis);
            let (b_lo, b_hi) = other.project(axis);
            let slack = ORIENT_EPS * axis.norm().max(1.0);
            if a_hi < b_lo - slack || b_hi < a_lo - slack {
                return false;
            }
        }
        true
    }

    /// Point membership via the degenerate-body SAT test.
    #[inline]
    pub fn contains_point(&self, p: Point2) -> bool {
        self.overlaps(&CollisionBody::point(p))
    }

    /// Distance from `p` to the nearest edge line, positive inside.
    ///
    /// Meaningful for convex bodies; fewer than three points give -∞.
    pub fn clearance(&self, p: Point2) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return f64::NEG_INFINITY;
        }
        (0..n)
            .filter_map(|i| {
                let a = self.points[i];
                let e = self.points[(i + 1) % n] - a;
                let len = e.norm();
                // Left normal points inward for counter-clockwise order.
                (len > ORIENT_EPS).then(|| cross(e, p - a) / len)
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Keep the part of the body with `n · x <= c` (Sutherland–Hodgman, one edge).
    pub fn clip_halfplane(&self, n: Point2, c: f64) -> CollisionBody {
        let len = self.points.len();
        if len == 0 {
            return self.clone();
        }
        let inside = |p: &Point2| n.dot(p) <= c + ORIENT_EPS;
        let mut out = Vec::with_capacity(len + 1);
        let mut prev = self.points[len - 1];
        for &cur in &self.points {
            let cur_in = inside(&cur);
            let prev_in = inside(&prev);
            if cur_in != prev_in {
                let denom = n.dot(&(cur - prev));
                if denom.abs() > ORIENT_EPS {
                    let t = (c - n.dot(&prev)) / denom;
                    out.push(prev + (cur - prev) * t);
                }
            }
            if cur_in {
                out.push(cur);
            }
            prev = cur;
        }
        CollisionBody { points: out }
    }
}
