//! Collision detector: validity verdicts for proposed vertex positions.
//!
//! Purpose
//! - Decide whether a proposed figure would self-intersect, leave the bounding
//!   region or collapse, without touching any state. Callers apply the verdict.
//!
//! Model
//! - Shape collision: each pair of opposite sides is tested with
//!   `segments_intersect`; adjacent sides folding back onto each other and
//!   overlapping vertex bodies also count. Vertex bodies are discs of
//!   `vertex_radius`, so rigid rotations never change their overlap.
//! - Bounds: separating-axis test of the moving vertex point against the
//!   convex bounds polygon; with a radius, the disc must keep that much
//!   clearance from every bounds edge.
//! - `check_step` compares against the figure a move starts from: overlap
//!   and bounds depth that are already there only block when they grow.
//! - Degenerate: a side shorter than `min_side_length`, or signed area at or
//!   below `min_area` (which also rejects a flipped winding).
//!
//! Checks run in that order; the first failing check names the reason.

use serde::{Deserialize, Serialize};

use crate::cfg::{BOUNDS_HALF_EXTENT, ORIENT_EPS};
use crate::geom::{cross, polygon_signed_area, segments_intersect, CollisionBody, Point2, Tolerances};
use crate::shape::{ShapeError, SideLabel, VertexLabel};

/// Why a proposal was refused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    #[default]
    None,
    ShapeCollision,
    BoundsCollision,
    Degenerate,
}

impl BlockReason {
    #[inline]
    pub fn is_blocked(self) -> bool {
        self != BlockReason::None
    }
}

/// Detector verdict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub blocked: bool,
    pub reason: BlockReason,
}

impl CollisionResult {
    pub const CLEAR: CollisionResult = CollisionResult {
        blocked: false,
        reason: BlockReason::None,
    };

    #[inline]
    pub fn blocked(reason: BlockReason) -> Self {
        Self {
            blocked: reason.is_blocked(),
            reason,
        }
    }
}

/// Convex region every vertex must stay inside.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    body: CollisionBody,
}

impl Default for Bounds {
    fn default() -> Self {
        let h = Point2::new(BOUNDS_HALF_EXTENT, BOUNDS_HALF_EXTENT);
        Self {
            body: CollisionBody::rect(-h, h),
        }
    }
}

impl Bounds {
    /// Axis-aligned rectangle; `min` must be strictly below/left of `max`.
    pub fn rect(min: Point2, max: Point2) -> Result<Self, ShapeError> {
        if !(min.x < max.x && min.y < max.y) {
            return Err(ShapeError::InvalidBounds {
                reason: format!("empty rectangle {min:?}..{max:?}"),
            });
        }
        Ok(Self {
            body: CollisionBody::rect(min, max),
        })
    }

    /// Arbitrary convex polygon (either winding).
    pub fn polygon(points: Vec<Point2>) -> Result<Self, ShapeError> {
        let body = CollisionBody::new(points);
        if !body.is_convex() {
            return Err(ShapeError::InvalidBounds {
                reason: "bounds polygon must be convex with positive area".into(),
            });
        }
        Ok(Self { body })
    }

    #[inline]
    pub fn body(&self) -> &CollisionBody {
        &self.body
    }

    #[inline]
    pub fn contains_point(&self, p: Point2) -> bool {
        self.body.contains_point(p)
    }
}

/// Pure validity checks against fixed bounds and tolerances.
#[derive(Clone, Copy, Debug)]
pub struct CollisionDetector<'a> {
    bounds: &'a Bounds,
    tol: Tolerances,
    vertex_radius: f64,
}

impl<'a> CollisionDetector<'a> {
    pub fn new(bounds: &'a Bounds, tol: Tolerances) -> Self {
        Self {
            bounds,
            tol,
            vertex_radius: 0.0,
        }
    }

    /// Give each vertex a circular body of this radius.
    pub fn with_vertex_radius(mut self, radius: f64) -> Self {
        self.vertex_radius = radius.max(0.0);
        self
    }

    #[inline]
    pub fn vertex_radius(&self) -> f64 {
        self.vertex_radius
    }

    /// Verdict for moving `label` to `proposed` with the other three held fixed.
    pub fn check_vertex_move(
        &self,
        positions: &[Point2; 4],
        label: VertexLabel,
        proposed: Point2,
    ) -> CollisionResult {
        let mut candidate = *positions;
        candidate[label.index()] = proposed;
        self.check(&candidate, &[label])
    }

    /// Verdict for a full candidate figure where `moving` vertices changed.
    #[inline]
    pub fn check(&self, positions: &[Point2; 4], moving: &[VertexLabel]) -> CollisionResult {
        self.verdict(None, positions, moving)
    }

    /// Verdict for reaching `to` from the committed figure `from`.
    ///
    /// Crossings, folds and collapse block unconditionally. A body overlap or a
    /// body sticking out of the bounds that `from` already has only blocks when
    /// `to` makes it deeper, so a vertex can always back out of one.
    #[inline]
    pub fn check_step(
        &self,
        from: &[Point2; 4],
        to: &[Point2; 4],
        moving: &[VertexLabel],
    ) -> CollisionResult {
        self.verdict(Some(from), to, moving)
    }

    /// Verdict treating every vertex as moved (construction, reset).
    #[inline]
    pub fn check_all(&self, positions: &[Point2; 4]) -> CollisionResult {
        self.check(positions, &VertexLabel::ALL)
    }

    fn verdict(
        &self,
        from: Option<&[Point2; 4]>,
        to: &[Point2; 4],
        moving: &[VertexLabel],
    ) -> CollisionResult {
        if self.sides_collide(to, moving) || self.bodies_deepen(from, to, moving) {
            return CollisionResult::blocked(BlockReason::ShapeCollision);
        }
        if moving.iter().any(|&l| self.leaves_bounds(from, to, l)) {
            return CollisionResult::blocked(BlockReason::BoundsCollision);
        }
        if self.degenerate(to) {
            return CollisionResult::blocked(BlockReason::Degenerate);
        }
        CollisionResult::CLEAR
    }

    /// Opposite sides crossing, adjacent sides folding, or vertex bodies overlapping.
    pub fn shape_collision(&self, positions: &[Point2; 4], moving: &[VertexLabel]) -> bool {
        self.sides_collide(positions, moving) || self.bodies_deepen(None, positions, moving)
    }

    /// Opposite sides crossing or adjacent sides folding onto each other.
    pub fn sides_collide(&self, positions: &[Point2; 4], moving: &[VertexLabel]) -> bool {
        let crossing = [SideLabel::AB, SideLabel::BC].into_iter().any(|s| {
            let o = s.opposite();
            if !moving.iter().any(|&m| s.touches(m) || o.touches(m)) {
                return false;
            }
            let (a, b) = s.vertices();
            let (c, d) = o.vertices();
            segments_intersect(
                positions[a.index()],
                positions[b.index()],
                positions[c.index()],
                positions[d.index()],
            )
        });
        crossing
            || VertexLabel::ALL.into_iter().any(|v| {
                let at = positions[v.index()];
                let u = positions[v.prev().index()] - at;
                let w = positions[v.next().index()] - at;
                let scale = u.norm() * w.norm();
                scale > 0.0 && cross(u, w).abs() <= ORIENT_EPS * scale.max(1.0) && u.dot(&w) > 0.0
            })
    }

    /// Penetration depth of the bodies around `a` and `b`; positive when they overlap.
    #[inline]
    pub fn body_overlap(&self, positions: &[Point2; 4], a: VertexLabel, b: VertexLabel) -> f64 {
        2.0 * self.vertex_radius - (positions[a.index()] - positions[b.index()]).norm()
    }

    fn bodies_deepen(
        &self,
        from: Option<&[Point2; 4]>,
        to: &[Point2; 4],
        moving: &[VertexLabel],
    ) -> bool {
        if self.vertex_radius <= 0.0 {
            return false;
        }
        moving.iter().any(|&m| {
            VertexLabel::ALL
                .into_iter()
                .filter(|&o| o != m)
                .any(|o| {
                    deepens(
                        self.body_overlap(to, m, o),
                        from.map(|f| self.body_overlap(f, m, o)),
                    )
                })
        })
    }

    /// How far the body at `p` reaches past the bounds; positive when outside.
    #[inline]
    pub fn bounds_depth(&self, p: Point2) -> f64 {
        self.vertex_radius - self.bounds.body().clearance(p)
    }

    /// The vertex body at `p` is not fully inside the bounds.
    pub fn out_of_bounds(&self, p: Point2) -> bool {
        if self.vertex_radius <= 0.0 {
            // Point vs polygon: the degenerate-body SAT test.
            return !self.bounds.contains_point(p);
        }
        self.bounds_depth(p) > ORIENT_EPS
    }

    fn leaves_bounds(&self, from: Option<&[Point2; 4]>, to: &[Point2; 4], l: VertexLabel) -> bool {
        let p = to[l.index()];
        if self.vertex_radius <= 0.0 || !self.bounds.contains_point(p) {
            return !self.bounds.contains_point(p);
        }
        deepens(
            self.bounds_depth(p),
            from.map(|f| self.bounds_depth(f[l.index()])),
        )
    }

    /// Coincident vertices or non-positive/too-small area.
    pub fn degenerate(&self, positions: &[Point2; 4]) -> bool {
        let short_side = (0..4).any(|i| {
            (positions[(i + 1) % 4] - positions[i]).norm() < self.tol.min_side_length
        });
        short_side || polygon_signed_area(positions) <= self.tol.min_area
    }
}

/// A positive depth blocks unless the same depth (or more) was already there.
/// A start within the slack gets no allowance, so valid figures stay valid.
#[inline]
fn deepens(now: f64, before: Option<f64>) -> bool {
    now > ORIENT_EPS && before.map_or(true, |b| b <= ORIENT_EPS || now > b + ORIENT_EPS)
}
