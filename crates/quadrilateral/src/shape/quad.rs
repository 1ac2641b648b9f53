use std::f64::consts::TAU;

use super::entities::{MovementState, Side, Vertex};
use super::error::ShapeError;
use super::labels::{SideLabel, VertexLabel};
use crate::classifier::{classify, NamedQuadrilateralCategory};
use crate::collision::{BlockReason, Bounds, CollisionDetector};
use crate::geom::{interior_angle, nearly_equal, polygon_signed_area, CollisionBody, Point2, Tolerances};
use crate::snapshot::ShapeSnapshot;

/// Quadrilateral aggregate. Vertices and sides are created once; only
/// positions (and the flags/derived values that follow them) change.
#[derive(Clone, Debug)]
pub struct Shape {
    vertices: [Vertex; 4],
    sides: [Side; 4],
    bounds: Bounds,
    tol: Tolerances,
}

impl Shape {
    /// Build from positions for A, B, C, D. Fails fast on any invariant violation.
    pub fn new(points: [Point2; 4], bounds: Bounds, tol: Tolerances) -> Result<Self, ShapeError> {
        validate(&points, &bounds, tol, 0.0)?;
        let mut shape = Self {
            vertices: VertexLabel::ALL.map(|l| Vertex::new(l, points[l.index()])),
            sides: SideLabel::ALL.map(Side::new),
            bounds,
            tol,
        };
        shape.refresh_derived();
        Ok(shape)
    }

    /// Same as `new` for a slice of any length; only four points are accepted.
    pub fn from_slice(points: &[Point2], bounds: Bounds, tol: Tolerances) -> Result<Self, ShapeError> {
        let arr: [Point2; 4] = points
            .try_into()
            .map_err(|_| ShapeError::WrongVertexCount {
                found: points.len(),
            })?;
        Self::new(arr, bounds, tol)
    }

    /// Default bounds and tolerances.
    pub fn with_defaults(points: [Point2; 4]) -> Result<Self, ShapeError> {
        Self::new(points, Bounds::default(), Tolerances::default())
    }

    #[inline]
    pub fn positions(&self) -> [Point2; 4] {
        self.vertices.each_ref().map(|v| v.position)
    }

    #[inline]
    pub fn position(&self, label: VertexLabel) -> Point2 {
        self.vertices[label.index()].position
    }

    #[inline]
    pub fn vertex(&self, label: VertexLabel) -> &Vertex {
        &self.vertices[label.index()]
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex; 4] {
        &self.vertices
    }

    #[inline]
    pub fn side(&self, label: SideLabel) -> &Side {
        &self.sides[label.index()]
    }

    #[inline]
    pub fn sides(&self) -> &[Side; 4] {
        &self.sides
    }

    #[inline]
    pub fn side_length(&self, label: SideLabel) -> f64 {
        self.sides[label.index()].length(&self.vertices)
    }

    #[inline]
    pub fn angle(&self, label: VertexLabel) -> Option<f64> {
        self.vertices[label.index()].angle
    }

    #[inline]
    pub fn signed_area(&self) -> f64 {
        polygon_signed_area(&self.positions())
    }

    /// Sum of the four interior angles; `None` if any is undefined.
    pub fn angle_sum(&self) -> Option<f64> {
        self.vertices.iter().map(|v| v.angle).sum()
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn tolerances(&self) -> Tolerances {
        self.tol
    }

    /// Detector bound to this figure's bounds and tolerances.
    #[inline]
    pub fn detector(&self) -> CollisionDetector<'_> {
        CollisionDetector::new(&self.bounds, self.tol)
    }

    pub fn snapshot(&self) -> ShapeSnapshot {
        ShapeSnapshot::from_points(&self.positions())
    }

    /// Category re-derived from the current positions.
    pub fn category(&self) -> NamedQuadrilateralCategory {
        classify(&self.snapshot(), &self.tol)
    }

    /// Re-run every construction check against the current state.
    pub fn check_invariants(&self) -> Result<(), ShapeError> {
        validate(&self.positions(), &self.bounds, self.tol, 0.0)?;
        let sum = self.angle_sum().ok_or(ShapeError::NotSimple)?;
        if !nearly_equal(sum, TAU, self.tol.angle_eps) {
            return Err(ShapeError::AngleSumMismatch { sum });
        }
        Ok(())
    }

    /// Construction checks with circular vertex bodies of `vertex_radius`:
    /// bodies may not overlap and must lie inside the bounds.
    pub fn check_clearance(&self, vertex_radius: f64) -> Result<(), ShapeError> {
        validate(&self.positions(), &self.bounds, self.tol, vertex_radius)
    }

    /// Write accepted positions. Callers have already validated them.
    pub(crate) fn commit(&mut self, positions: [Point2; 4]) {
        for (v, p) in self.vertices.iter_mut().zip(positions) {
            v.position = p;
        }
        self.refresh_derived();
        debug_assert!(
            self.check_invariants().is_ok(),
            "commit broke an invariant: {:?}",
            self.check_invariants()
        );
    }

    pub(crate) fn vertex_movement_mut(&mut self, label: VertexLabel) -> &mut MovementState {
        &mut self.vertices[label.index()].movement
    }

    pub(crate) fn side_movement_mut(&mut self, label: SideLabel) -> &mut MovementState {
        &mut self.sides[label.index()].movement
    }

    /// Angles and drag regions follow positions.
    fn refresh_derived(&mut self) {
        let positions = self.positions();
        let winding = polygon_signed_area(&positions);
        for l in VertexLabel::ALL {
            let angle = interior_angle(
                positions[l.prev().index()],
                positions[l.index()],
                positions[l.next().index()],
                winding,
            );
            let region = drag_region(&positions, l, &self.bounds);
            let v = &mut self.vertices[l.index()];
            v.angle = angle;
            v.drag_region = region;
        }
    }
}

/// Bounds clipped by the lines through the two sides not touching `label`,
/// keeping the half-plane the vertex currently sits in.
fn drag_region(positions: &[Point2; 4], label: VertexLabel, bounds: &Bounds) -> CollisionBody {
    let at = positions[label.index()];
    let far_sides = [
        SideLabel::from_index(label.index() + 1),
        SideLabel::from_index(label.index() + 2),
    ];
    far_sides
        .into_iter()
        .fold(bounds.body().clone(), |region, side| {
            let (a, b) = side.vertices();
            let p = positions[a.index()];
            let e = positions[b.index()] - p;
            let mut n = Point2::new(e.y, -e.x);
            let mut c = n.dot(&p);
            let offset = n.dot(&at) - c;
            if offset.abs() <= f64::EPSILON * n.norm() {
                return region;
            }
            if offset > 0.0 {
                n = -n;
                c = -c;
            }
            region.clip_halfplane(n, c)
        })
}

fn validate(
    points: &[Point2; 4],
    bounds: &Bounds,
    tol: Tolerances,
    vertex_radius: f64,
) -> Result<(), ShapeError> {
    if let Some(l) = VertexLabel::ALL
        .into_iter()
        .find(|l| !(points[l.index()].x.is_finite() && points[l.index()].y.is_finite()))
    {
        return Err(ShapeError::NonFinite { vertex: l });
    }
    let det = CollisionDetector::new(bounds, tol).with_vertex_radius(vertex_radius);
    let verdict = det.check_all(points);
    match verdict.reason {
        BlockReason::None => Ok(()),
        BlockReason::ShapeCollision => {
            if det.sides_collide(points, &VertexLabel::ALL) {
                return Err(ShapeError::NotSimple);
            }
            let close = VertexLabel::ALL.into_iter().find_map(|a| {
                VertexLabel::ALL
                    .into_iter()
                    .filter(|&b| b > a)
                    .find(|&b| det.body_overlap(points, a, b) > 0.0)
                    .map(|b| (a, b))
            });
            match close {
                Some((a, b)) => Err(ShapeError::VerticesTooClose { a, b }),
                None => Err(ShapeError::NotSimple),
            }
        }
        BlockReason::BoundsCollision => {
            let vertex = VertexLabel::ALL
                .into_iter()
                .find(|l| det.out_of_bounds(points[l.index()]))
                .unwrap_or(VertexLabel::A);
            Err(ShapeError::OutOfBounds { vertex })
        }
        BlockReason::Degenerate => {
            let short = SideLabel::ALL.into_iter().find_map(|s| {
                let (a, b) = s.vertices();
                let length = (points[b.index()] - points[a.index()]).norm();
                (length < tol.min_side_length).then_some((s, length))
            });
            match short {
                Some((side, length)) => Err(ShapeError::SideTooShort { side, length }),
                None => Err(ShapeError::NonPositiveArea {
                    area: polygon_signed_area(points),
                }),
            }
        }
    }
}
