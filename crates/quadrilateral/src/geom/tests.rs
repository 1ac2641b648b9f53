use super::*;
use nalgebra::vector;
use proptest::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

fn unit_square() -> [Point2; 4] {
    [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ]
}

fn square_body(center: Point2, half: f64) -> CollisionBody {
    let h = vector![half, half];
    CollisionBody::rect(center - h, center + h)
}

fn dart() -> [Point2; 4] {
    [
        vector![0.0, 0.0],
        vector![2.0, 1.0],
        vector![4.0, 0.0],
        vector![2.0, 3.0],
    ]
}

#[test]
fn angle_between_basic_and_degenerate() {
    let a = angle_between(vector![1.0, 0.0], vector![0.0, 2.0]).unwrap();
    assert!((a - FRAC_PI_2).abs() < 1e-12);
    let b = angle_between(vector![1.0, 0.0], vector![-3.0, 0.0]).unwrap();
    assert!((b - PI).abs() < 1e-12);
    let c = angle_between(vector![1.0, 1.0], vector![2.0, 2.0]).unwrap();
    assert!(c.abs() < 1e-12);
    assert!(angle_between(Point2::zeros(), vector![1.0, 0.0]).is_none());
    assert!(angle_between(vector![f64::NAN, 0.0], vector![1.0, 0.0]).is_none());
}

#[test]
fn segments_crossing_touching_and_disjoint() {
    // proper crossing
    assert!(segments_intersect(
        vector![0.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
        vector![1.0, 0.0]
    ));
    // shared endpoint counts
    assert!(segments_intersect(
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0]
    ));
    // T-junction: endpoint on the interior of the other segment
    assert!(segments_intersect(
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0]
    ));
    // parallel, disjoint
    assert!(!segments_intersect(
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![0.0, 1.0],
        vector![1.0, 1.0]
    ));
    // would cross only if extended
    assert!(!segments_intersect(
        vector![0.0, 0.0],
        vector![1.0, 1.0],
        vector![3.0, 0.0],
        vector![2.0, 1.0]
    ));
}

#[test]
fn collinear_overlap_vs_collinear_gap() {
    assert!(segments_intersect(
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![1.0, 0.0],
        vector![3.0, 0.0]
    ));
    assert!(!segments_intersect(
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![2.0, 0.0],
        vector![3.0, 0.0]
    ));
}

#[test]
fn shoelace_sign_follows_winding() {
    let [a, b, c, d] = unit_square();
    assert!((signed_area(a, b, c, d) - 1.0).abs() < 1e-12);
    assert!((signed_area(d, c, b, a) + 1.0).abs() < 1e-12);
    assert_eq!(polygon_signed_area(&[a, b]), 0.0);
    let [a, b, c, d] = dart();
    assert!((signed_area(a, b, c, d) - 4.0).abs() < 1e-12);
}

#[test]
fn interior_angles_square_and_reflex() {
    let p = unit_square();
    for i in 0..4 {
        let ang = interior_angle(p[(i + 3) % 4], p[i], p[(i + 1) % 4], 1.0).unwrap();
        assert!((ang - FRAC_PI_2).abs() < 1e-12, "corner {i}: {ang}");
    }
    let d = dart();
    let at_b = interior_angle(d[0], d[1], d[2], 1.0).unwrap();
    assert!(at_b > PI, "B is the reflex corner: {at_b}");
    let sum: f64 = (0..4)
        .map(|i| interior_angle(d[(i + 3) % 4], d[i], d[(i + 1) % 4], 1.0).unwrap())
        .sum();
    assert!((sum - TAU).abs() < 1e-9);
    // Reversed winding flips which side is "inside".
    let outside = interior_angle(d[0], d[1], d[2], -1.0).unwrap();
    assert!((outside + at_b - TAU).abs() < 1e-12);
    assert!(interior_angle(d[0], d[1], d[2], 0.0).is_none());
    assert!(interior_angle(d[1], d[1], d[2], 1.0).is_none());
}

#[test]
fn centroid_and_rotation() {
    let c = centroid(&unit_square()).unwrap();
    assert_eq!(c, vector![0.5, 0.5]);
    assert!(centroid(&[]).is_none());
    let r = rotate_about(vector![1.0, 0.5], c, FRAC_PI_2);
    assert!((r - vector![0.5, 1.0]).norm() < 1e-12);
}

#[test]
fn sat_overlap_touch_and_separation() {
    let a = square_body(vector![0.0, 0.0], 0.5);
    let near = square_body(vector![0.5, 0.0], 0.5);
    let touch = square_body(vector![1.0, 0.0], 0.5);
    let far = square_body(vector![1.5, 0.0], 0.5);
    assert!(a.overlaps(&near));
    assert!(a.overlaps(&touch));
    assert!(!a.overlaps(&far));
    // Diagonal separation needs the rotated body's own axes.
    let diamond = CollisionBody::new(vec![
        vector![0.9, 0.4],
        vector![1.4, 0.9],
        vector![0.9, 1.4],
        vector![0.4, 0.9],
    ]);
    assert!(!a.overlaps(&diamond));
}

#[test]
fn point_bodies_and_membership() {
    let sq = CollisionBody::rect(vector![-1.0, -1.0], vector![1.0, 1.0]);
    assert!(sq.contains_point(vector![0.3, -0.9]));
    assert!(sq.contains_point(vector![1.0, 1.0]));
    assert!(!sq.contains_point(vector![1.01, 0.0]));
    assert!(CollisionBody::point(vector![0.3, 0.3]).overlaps(&sq));
    assert!(!CollisionBody::default().overlaps(&sq));
}

#[test]
fn clearance_is_distance_to_nearest_edge() {
    let sq = CollisionBody::rect(vector![-1.0, -1.0], vector![1.0, 1.0]);
    assert!((sq.clearance(vector![0.0, 0.0]) - 1.0).abs() < 1e-12);
    assert!((sq.clearance(vector![0.5, -0.2]) - 0.5).abs() < 1e-12);
    assert!(sq.clearance(vector![1.0, 0.0]).abs() < 1e-12);
    assert!((sq.clearance(vector![2.0, 0.0]) + 1.0).abs() < 1e-12);
    // Clockwise input is re-ordered, so the sign convention holds.
    let cw = CollisionBody::new(sq.points().iter().rev().copied().collect());
    assert!((cw.clearance(vector![0.0, 0.5]) - 0.5).abs() < 1e-12);
    assert_eq!(
        CollisionBody::point(vector![0.0, 0.0]).clearance(vector![0.0, 0.0]),
        f64::NEG_INFINITY
    );
}

#[test]
fn new_reorders_clockwise_input() {
    let cw = CollisionBody::new(vec![
        vector![0.0, 0.0],
        vector![0.0, 1.0],
        vector![1.0, 1.0],
        vector![1.0, 0.0],
    ]);
    assert!((cw.area() - 1.0).abs() < 1e-12);
    assert!(cw.is_convex());
    assert!(!CollisionBody::new(dart().to_vec()).is_convex());
}

#[test]
fn clip_halfplane_cuts_square_in_half() {
    let sq = CollisionBody::rect(vector![0.0, 0.0], vector![2.0, 2.0]);
    let half = sq.clip_halfplane(vector![1.0, 0.0], 1.0);
    assert!((half.area() - 2.0).abs() < 1e-12);
    assert!(half.contains_point(vector![0.5, 1.0]));
    assert!(!half.contains_point(vector![1.5, 1.0]));
    // Keeping everything or nothing.
    assert_eq!(sq.clip_halfplane(vector![1.0, 0.0], 10.0), sq);
    assert!(sq.clip_halfplane(vector![1.0, 0.0], -1.0).is_empty());
}

#[test]
fn tolerances_device_is_looser() {
    let d = Tolerances::device();
    let s = Tolerances::default();
    assert!(d.angle_eps > s.angle_eps && d.length_eps > s.length_eps);
    assert_eq!(d.min_area, s.min_area);
    assert!(nearly_equal(1.0, 1.0 + s.length_eps * 0.5, s.length_eps));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn rotation_preserves_area_and_angles(theta in -PI..PI, cx in -2.0f64..2.0, cy in -2.0f64..2.0) {
        let pivot = vector![cx, cy];
        let p = dart().map(|q| rotate_about(q, pivot, theta));
        let [a, b, c, d] = p;
        prop_assert!((signed_area(a, b, c, d) - 4.0).abs() < 1e-9);
        let ang = interior_angle(a, b, c, 1.0).unwrap();
        let ref_ang = interior_angle(dart()[0], dart()[1], dart()[2], 1.0).unwrap();
        prop_assert!((ang - ref_ang).abs() < 1e-9);
    }

    #[test]
    fn intersection_is_symmetric(
        c in prop::array::uniform8(-2.0f64..2.0)
    ) {
        let (p1, p2, q1, q2) = (
            vector![c[0], c[1]], vector![c[2], c[3]],
            vector![c[4], c[5]], vector![c[6], c[7]],
        );
        prop_assert_eq!(
            segments_intersect(p1, p2, q1, q2),
            segments_intersect(q1, q2, p1, p2)
        );
        prop_assert_eq!(
            segments_intersect(p1, p2, q1, q2),
            segments_intersect(p2, p1, q2, q1)
        );
    }
}
