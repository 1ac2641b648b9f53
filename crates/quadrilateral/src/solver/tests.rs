use super::*;
use crate::collision::Bounds;
use crate::geom::Tolerances;
use crate::rand::{draw_shape, RadialCfg, ReplayToken};
use nalgebra::vector;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::FRAC_PI_4;

fn unit_square(bounds: Bounds) -> Shape {
    Shape::new(
        [
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
        ],
        bounds,
        Tolerances::default(),
    )
    .unwrap()
}

fn small_bounds() -> Bounds {
    Bounds::rect(vector![-0.5, -0.5], vector![1.5, 1.5]).unwrap()
}

#[test]
fn free_move_is_accepted_exactly() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let desired = vector![1.2, 1.3];
    let out = solver.propose_vertex_move(&mut shape, VertexLabel::C, desired);
    assert_eq!(out.accepted, desired);
    assert_eq!(out.reason, BlockReason::None);
    assert_eq!(shape.position(VertexLabel::C), desired);
    assert!(shape.check_invariants().is_ok());
    assert!(!shape.vertex(VertexLabel::C).movement().is_blocked());
}

#[test]
fn crossing_side_da_is_clipped_with_shape_collision() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let desired = vector![-0.5, 1.0];
    let out = solver.propose_vertex_move(&mut shape, VertexLabel::C, desired);
    assert_ne!(out.accepted, desired);
    assert_eq!(out.reason, BlockReason::ShapeCollision);
    // Stopped short of D, on the requested path.
    assert!(out.accepted.x > 0.0 && out.accepted.x < 1.0);
    assert!((out.accepted.y - 1.0).abs() < 1e-12);
    assert_eq!(shape.position(VertexLabel::C), out.accepted);
    assert!(shape.check_invariants().is_ok());
    let m = shape.vertex(VertexLabel::C).movement();
    assert!(m.blocked_by_shape && !m.blocked_by_bounds);
    // The other vertices never move.
    assert_eq!(shape.position(VertexLabel::A), vector![0.0, 0.0]);
    assert_eq!(shape.position(VertexLabel::B), vector![1.0, 0.0]);
    assert_eq!(shape.position(VertexLabel::D), vector![0.0, 1.0]);
}

#[test]
fn repeating_an_accepted_position_is_a_no_op() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let first = solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![-0.5, 1.0]);
    let second = solver.propose_vertex_move(&mut shape, VertexLabel::C, first.accepted);
    assert_eq!(second.accepted, first.accepted);
    assert_eq!(second.reason, BlockReason::None);
    let third = solver.propose_vertex_move(&mut shape, VertexLabel::C, first.accepted);
    assert_eq!(third, second);
}

#[test]
fn bounds_clip_stops_at_the_edge() {
    let mut shape = unit_square(small_bounds());
    let solver = MoveSolver::default();
    let out = solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![3.0, 1.0]);
    assert_eq!(out.reason, BlockReason::BoundsCollision);
    assert!(out.accepted.x <= 1.5);
    assert!(1.5 - out.accepted.x <= solver.cfg().step_resolution);
    assert!(shape.vertex(VertexLabel::C).movement().blocked_by_bounds);

    // Already at the edge: the first sample is blocked, nothing moves.
    let before = shape.position(VertexLabel::C);
    let again = solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![2.0, 1.0]);
    assert_eq!(again.accepted, before);
    assert_eq!(again.reason, BlockReason::BoundsCollision);
}

#[test]
fn accepted_move_flags_an_upcoming_boundary() {
    let mut shape = unit_square(small_bounds());
    let solver = MoveSolver::default();
    let out = solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![1.5, 1.0]);
    assert_eq!(out.reason, BlockReason::None);
    assert_eq!(out.accepted, vector![1.5, 1.0]);
    assert!(shape.vertex(VertexLabel::C).movement().blocked_by_bounds);
    // Moving back away clears the flag.
    solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![1.2, 1.0]);
    assert!(!shape.vertex(VertexLabel::C).movement().is_blocked());
}

#[test]
fn collapsing_onto_a_neighbour_is_degenerate() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    // Target keeps the sides apart but CD is shorter than the minimum.
    let out = solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![0.005, 1.0]);
    assert_eq!(out.reason, BlockReason::Degenerate);
    let cd = shape.side_length(SideLabel::CD);
    assert!(cd >= shape.tolerances().min_side_length);
    assert!(cd <= shape.tolerances().min_side_length + solver.cfg().step_resolution);
    assert!(shape.check_invariants().is_ok());
}

#[test]
fn flipping_the_winding_is_refused() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let out = solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![-1.0, -1.0]);
    assert!(out.is_blocked());
    assert_ne!(out.accepted, vector![-1.0, -1.0]);
    assert!(shape.signed_area() > 0.0);
    assert!(shape.check_invariants().is_ok());
}

#[test]
fn non_finite_target_is_rejected() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let out = solver.propose_vertex_move(&mut shape, VertexLabel::B, vector![f64::NAN, 0.0]);
    assert_eq!(out.accepted, vector![1.0, 0.0]);
    assert_eq!(out.reason, BlockReason::BoundsCollision);
}

#[test]
fn key_steps_use_configured_increments() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let up = KeyStep {
        direction: Direction::Up,
        fine: false,
    };
    let out = solver.propose_key_step(&mut shape, VertexLabel::C, up);
    assert_eq!(out.accepted, vector![1.0, 1.25]);
    let fine_right = KeyStep {
        direction: Direction::Right,
        fine: true,
    };
    let out = solver.propose_key_step(&mut shape, VertexLabel::C, fine_right);
    assert_eq!(out.accepted, vector![1.0625, 1.25]);
}

#[test]
fn side_drag_moves_both_endpoints() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let out = solver.propose_side_move(&mut shape, SideLabel::AB, vector![0.0, -0.5]);
    assert_eq!(out.reason, BlockReason::None);
    assert_eq!(out.accepted, (vector![0.0, -0.5], vector![1.0, -0.5]));
    assert_eq!(shape.position(VertexLabel::A), vector![0.0, -0.5]);
    assert_eq!(shape.position(VertexLabel::B), vector![1.0, -0.5]);
    assert!(shape.check_invariants().is_ok());
}

#[test]
fn side_drag_through_the_opposite_side_is_clipped() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let out = solver.propose_side_move(&mut shape, SideLabel::AB, vector![0.0, 2.0]);
    assert!(out.reason.is_blocked());
    assert!(out.accepted.0.y < 1.0);
    assert!(shape.side(SideLabel::AB).movement().blocked_by_shape);
    assert!(shape.check_invariants().is_ok());
}

#[test]
fn rotation_is_rigid_and_bounded() {
    let tight = Bounds::rect(vector![-0.1, -0.1], vector![1.1, 1.1]).unwrap();
    let mut shape = unit_square(tight);
    let solver = MoveSolver::default();
    let out = solver.propose_rotation(&mut shape, FRAC_PI_4);
    assert_eq!(out.reason, BlockReason::BoundsCollision);
    assert!(out.accepted_radians > 0.0 && out.accepted_radians < FRAC_PI_4);
    assert!(shape.check_invariants().is_ok());
    assert_eq!(shape.category(), crate::classifier::NamedQuadrilateralCategory::Square);
    assert!(shape.vertices().iter().any(|v| v.movement().blocked_by_bounds));

    let mut roomy = unit_square(Bounds::default());
    let out = solver.propose_rotation(&mut roomy, FRAC_PI_4);
    assert_eq!(out.reason, BlockReason::None);
    assert_eq!(out.accepted_radians, FRAC_PI_4);
    for l in [SideLabel::AB, SideLabel::BC, SideLabel::CD, SideLabel::DA] {
        assert!((roomy.side_length(l) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn grab_and_release_toggle_active() {
    let mut shape = unit_square(small_bounds());
    let solver = MoveSolver::default();
    solver.set_active(&mut shape, VertexLabel::C, true);
    assert!(shape.vertex(VertexLabel::C).movement().is_active);
    solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![5.0, 1.0]);
    assert!(shape.vertex(VertexLabel::C).movement().blocked_by_bounds);
    solver.set_active(&mut shape, VertexLabel::C, false);
    assert_eq!(shape.vertex(VertexLabel::C).movement(), Default::default());
}

#[test]
fn vertex_radius_keeps_bodies_apart() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::new(MoveCfg {
        vertex_radius: 0.1,
        ..MoveCfg::default()
    });
    let out = solver.propose_vertex_move(&mut shape, VertexLabel::C, vector![0.1, 0.1]);
    assert_eq!(out.reason, BlockReason::ShapeCollision);
    let c = shape.position(VertexLabel::C);
    // Discs of radius 0.1 around A and C must not overlap.
    assert!(c.norm() > 0.2 - 1e-9, "{c:?}");
    assert!(c.norm() < 0.2 + 0.01, "{c:?}");
}

fn padded_solver() -> MoveSolver {
    MoveSolver::new(MoveCfg {
        vertex_radius: 0.1,
        ..MoveCfg::default()
    })
}

#[test]
fn vertex_inside_another_body_can_back_out() {
    let mut shape = Shape::with_defaults([
        vector![0.0, 0.0],
        vector![0.15, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ])
    .unwrap();
    let solver = padded_solver();
    let closer = solver.propose_vertex_move(&mut shape, VertexLabel::B, vector![0.1, 0.0]);
    assert_eq!(closer.reason, BlockReason::ShapeCollision);
    assert_eq!(closer.accepted, vector![0.15, 0.0]);

    let away = solver.propose_vertex_move(&mut shape, VertexLabel::B, vector![1.0, 0.0]);
    assert_eq!(away.reason, BlockReason::None);
    assert_eq!(shape.position(VertexLabel::B), vector![1.0, 0.0]);
    assert!(shape.check_clearance(0.1).is_ok());
}

#[test]
fn vertex_on_the_bounds_edge_can_move_inward() {
    let corner = Bounds::rect(vector![0.0, 0.0], vector![2.0, 2.0]).unwrap();
    let mut shape = unit_square(corner);
    let solver = padded_solver();
    let outward = solver.propose_vertex_move(&mut shape, VertexLabel::A, vector![0.0, -0.5]);
    assert_eq!(outward.reason, BlockReason::BoundsCollision);
    assert_eq!(shape.position(VertexLabel::A), vector![0.0, 0.0]);

    let inward = solver.propose_vertex_move(&mut shape, VertexLabel::A, vector![0.3, 0.3]);
    assert_eq!(inward.reason, BlockReason::None);
    assert_eq!(shape.position(VertexLabel::A), vector![0.3, 0.3]);
    assert!(!shape.vertex(VertexLabel::A).movement().is_blocked());
}

#[test]
fn rotation_with_vertex_bodies_is_only_stopped_by_bounds() {
    let small = Shape::with_defaults([
        vector![0.0, 0.0],
        vector![0.25, 0.0],
        vector![0.25, 0.25],
        vector![0.0, 0.25],
    ])
    .unwrap();
    let solver = padded_solver();
    let mut roomy = small.clone();
    let out = solver.propose_rotation(&mut roomy, FRAC_PI_4);
    assert_eq!(out.reason, BlockReason::None);
    assert_eq!(out.accepted_radians, FRAC_PI_4);

    let mut rng = StdRng::seed_from_u64(7);
    let snug = Bounds::rect(vector![-0.2, -0.2], vector![1.2, 1.2]).unwrap();
    let mut shape = unit_square(snug);
    for _ in 0..40 {
        let radians = rng.gen_range(-3.0..3.0);
        let out = solver.propose_rotation(&mut shape, radians);
        assert!(
            matches!(out.reason, BlockReason::None | BlockReason::BoundsCollision),
            "{out:?}"
        );
        assert!(shape.check_clearance(0.1).is_ok());
    }
}

#[test]
fn non_finite_side_delta_sets_flags() {
    let mut shape = unit_square(Bounds::default());
    let solver = MoveSolver::default();
    let out = solver.propose_side_move(&mut shape, SideLabel::CD, vector![f64::NAN, 0.0]);
    assert_eq!(out.reason, BlockReason::BoundsCollision);
    assert_eq!(out.accepted, (vector![1.0, 1.0], vector![0.0, 1.0]));
    assert!(shape.side(SideLabel::CD).movement().blocked_by_bounds);
    assert!(shape.vertex(VertexLabel::C).movement().blocked_by_bounds);
    assert!(shape.vertex(VertexLabel::D).movement().blocked_by_bounds);
    assert!(!shape.vertex(VertexLabel::A).movement().is_blocked());
}

#[test]
fn randomized_drags_keep_invariants_seeded() {
    let mut rng = StdRng::seed_from_u64(42);
    let solver = MoveSolver::default();
    let mut shape = unit_square(Bounds::default());
    for _ in 0..300 {
        let label = VertexLabel::from_index(rng.gen_range(0..4));
        let desired = vector![rng.gen_range(-3.5..3.5), rng.gen_range(-3.5..3.5)];
        let out = solver.propose_vertex_move(&mut shape, label, desired);
        assert!(shape.check_invariants().is_ok(), "{out:?}");
        if out.reason == BlockReason::None {
            assert_eq!(out.accepted, desired);
        }
    }
}

proptest! {
    #[test]
    fn accepted_moves_preserve_invariants(
        seed in 0u64..1_000,
        moves in proptest::collection::vec((0usize..4, -2.5f64..2.5, -2.5f64..2.5), 1..8),
    ) {
        let mut shape = draw_shape(
            RadialCfg::default(),
            ReplayToken::new(seed, 0),
            Bounds::default(),
            Tolerances::default(),
        )
        .expect("valid draw");
        let solver = MoveSolver::default();
        for (i, x, y) in moves {
            let label = VertexLabel::from_index(i);
            let desired = vector![x, y];
            let crosses = shape
                .detector()
                .shape_collision(&{
                    let mut p = shape.positions();
                    p[label.index()] = desired;
                    p
                }, &[label]);
            let out = solver.propose_vertex_move(&mut shape, label, desired);
            prop_assert!(shape.check_invariants().is_ok());
            if out.reason == BlockReason::None {
                prop_assert_eq!(out.accepted, desired);
            }
            if crosses {
                prop_assert_ne!(out.accepted, desired);
                prop_assert_eq!(out.reason, BlockReason::ShapeCollision);
            }
        }
    }
}
