use std::f64::consts::TAU;

use nalgebra::Matrix2;

use super::types::Point2;
use crate::cfg::ORIENT_EPS;

/// z-component of `u × v`.
#[inline]
pub fn cross(u: Point2, v: Point2) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Eps-tolerant equality. All angle/length comparisons go through here.
#[inline]
pub fn nearly_equal(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Unsigned angle between `u` and `v` in `[0, π]`; `None` if either is zero-length.
pub fn angle_between(u: Point2, v: Point2) -> Option<f64> {
    let nu = u.norm();
    let nv = v.norm();
    if !(nu > ORIENT_EPS && nv > ORIENT_EPS) || !nu.is_finite() || !nv.is_finite() {
        return None;
    }
    // atan2 stays accurate near 0 and π where acos loses digits.
    Some(cross(u, v).abs().atan2(u.dot(&v)))
}

/// Interior angle at `at` in `(0, 2π)`, measured on the inside of a polygon
/// whose signed area has the sign of `winding`.
///
/// Returns `None` when a neighbour coincides with `at` or `winding` is zero.
pub fn interior_angle(prev: Point2, at: Point2, next: Point2, winding: f64) -> Option<f64> {
    if winding == 0.0 || !winding.is_finite() {
        return None;
    }
    let u = prev - at;
    let w = next - at;
    let theta = angle_between(u, w)?;
    // For CCW order a convex corner turns left, i.e. cross(u, w) < 0.
    if cross(u, w) * winding.signum() > 0.0 {
        Some(TAU - theta)
    } else {
        Some(theta)
    }
}

/// Orientation of `r` relative to the directed line `p → q`, snapped to 0 near collinear.
#[inline]
fn orientation(p: Point2, q: Point2, r: Point2) -> f64 {
    let o = cross(q - p, r - p);
    let scale = (q - p).norm().max(1.0) * (r - p).norm().max(1.0);
    if o.abs() <= ORIENT_EPS * scale {
        0.0
    } else {
        o.signum()
    }
}

/// `r` lies within the bounding box of `p..q` (used for collinear cases).
#[inline]
fn on_segment(p: Point2, q: Point2, r: Point2) -> bool {
    r.x <= p.x.max(q.x) + ORIENT_EPS
        && r.x >= p.x.min(q.x) - ORIENT_EPS
        && r.y <= p.y.max(q.y) + ORIENT_EPS
        && r.y >= p.y.min(q.y) - ORIENT_EPS
}

/// Closed segment intersection test. Touching endpoints and collinear
/// overlaps count as intersecting.
pub fn segments_intersect(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return true;
    }
    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Shoelace area of a closed polygon; positive for counter-clockwise order.
pub fn polygon_signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            // determinant of [p q]
            Matrix2::from_columns(&[p, q]).determinant()
        })
        .sum();
    0.5 * twice
}

/// Shoelace area of the quadrilateral `p1 p2 p3 p4`.
#[inline]
pub fn signed_area(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> f64 {
    polygon_signed_area(&[p1, p2, p3, p4])
}

/// Vertex average.
pub fn centroid(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point2::zeros(), |acc, p| acc + p);
    Some(sum / points.len() as f64)
}

/// Rotate `p` counter-clockwise by `radians` about `pivot`.
pub fn rotate_about(p: Point2, pivot: Point2, radians: f64) -> Point2 {
    let (s, c) = radians.sin_cos();
    let m = nalgebra::matrix![c, -s; s, c];
    pivot + m * (p - pivot)
}
