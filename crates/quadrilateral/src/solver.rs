//! Movement constraint solver: turns a proposed displacement into the
//! position that is actually committed.
//!
//! Purpose
//! - Sample the straight path from the current to the desired position at a
//!   fixed resolution, ask the collision detector about each sample, and
//!   commit the last sample before the first blocked one.
//! - Samples go through `CollisionDetector::check_step` against the figure
//!   the move started from, so a vertex already touching another body or
//!   the bounds edge can still move away from it.
//! - The figure is valid immediately after every commit; a move that is
//!   blocked on its first sample leaves the figure untouched.
//!
//! Blocked reason reported to the caller
//! - If the desired end state is itself invalid, its reason is reported (the
//!   thing the user asked for is impossible, whatever the path hit first).
//! - Otherwise the first blocked sample's reason is reported.
//! - After a full acceptance, the movement flags look one more step along the
//!   same direction so feedback layers can show an upcoming boundary.
//!
//! Code cross-refs: `CollisionDetector`, `Shape::commit`, `MoveCfg`

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cfg;
use crate::collision::{BlockReason, CollisionDetector};
use crate::geom::{centroid, rotate_about, Point2};
use crate::shape::{Shape, SideLabel, VertexLabel};

/// Solver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveCfg {
    /// Distance between path samples (model units).
    pub step_resolution: f64,
    /// Displacement of one key press.
    pub key_step: f64,
    /// Displacement of one key press with the fine modifier.
    pub fine_key_step: f64,
    /// Radius of the disc body around each vertex (0 = point).
    pub vertex_radius: f64,
}

impl Default for MoveCfg {
    fn default() -> Self {
        Self {
            step_resolution: cfg::STEP_RESOLUTION,
            key_step: cfg::KEY_STEP,
            fine_key_step: cfg::FINE_KEY_STEP,
            vertex_radius: 0.0,
        }
    }
}

/// Arrow-key direction (y up).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn unit(self) -> Point2 {
        match self {
            Self::Up => Point2::new(0.0, 1.0),
            Self::Down => Point2::new(0.0, -1.0),
            Self::Left => Point2::new(-1.0, 0.0),
            Self::Right => Point2::new(1.0, 0.0),
        }
    }
}

/// One discrete key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStep {
    pub direction: Direction,
    #[serde(default)]
    pub fine: bool,
}

/// Result of a vertex move: `{acceptedPosition, blockedReason}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub accepted: Point2,
    pub reason: BlockReason,
}

impl MoveOutcome {
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.reason.is_blocked()
    }
}

/// Result of a side drag: accepted endpoint positions in traversal order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideMoveOutcome {
    pub accepted: (Point2, Point2),
    pub reason: BlockReason,
}

/// Result of a whole-figure rotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationOutcome {
    pub accepted_radians: f64,
    pub reason: BlockReason,
}

/// Furthest accepted path fraction plus the reason reported to the caller.
#[derive(Clone, Copy, Debug)]
struct PathVerdict {
    t: f64,
    reason: BlockReason,
}

impl PathVerdict {
    #[inline]
    fn complete(&self) -> bool {
        !self.reason.is_blocked()
    }
}

/// Stateless apart from its configuration; the shape is passed in per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveSolver {
    cfg: MoveCfg,
}

impl MoveSolver {
    pub fn new(cfg: MoveCfg) -> Self {
        Self { cfg }
    }

    #[inline]
    pub fn cfg(&self) -> &MoveCfg {
        &self.cfg
    }

    fn detector<'a>(&self, shape: &'a Shape) -> CollisionDetector<'a> {
        shape.detector().with_vertex_radius(self.cfg.vertex_radius)
    }

    /// Sample `candidate(t)` for `t ∈ (0, 1]` and stop at the first blocked sample.
    fn walk<F>(
        &self,
        det: &CollisionDetector<'_>,
        path_len: f64,
        moving: &[VertexLabel],
        candidate: F,
    ) -> PathVerdict
    where
        F: Fn(f64) -> [Point2; 4],
    {
        let step = self.cfg.step_resolution.max(f64::EPSILON);
        let n = ((path_len / step).ceil() as usize).clamp(1, cfg::MAX_PATH_SAMPLES);
        let start = candidate(0.0);
        let mut last_ok = 0.0;
        let mut first_block = BlockReason::None;
        for i in 1..=n {
            let t = i as f64 / n as f64;
            let verdict = det.check_step(&start, &candidate(t), moving);
            if verdict.blocked {
                trace!(sample = i, of = n, reason = ?verdict.reason, "path blocked");
                first_block = verdict.reason;
                break;
            }
            last_ok = t;
        }
        if !first_block.is_blocked() {
            return PathVerdict {
                t: 1.0,
                reason: BlockReason::None,
            };
        }
        let target = det.check_step(&start, &candidate(1.0), moving);
        PathVerdict {
            t: last_ok,
            reason: if target.blocked {
                target.reason
            } else {
                first_block
            },
        }
    }

    /// Move one vertex toward `desired`; the sole position-mutation entry point
    /// for vertex drags.
    pub fn propose_vertex_move(
        &self,
        shape: &mut Shape,
        label: VertexLabel,
        desired: Point2,
    ) -> MoveOutcome {
        let current = shape.position(label);
        if !(desired.x.is_finite() && desired.y.is_finite()) {
            shape
                .vertex_movement_mut(label)
                .record(BlockReason::BoundsCollision);
            return MoveOutcome {
                accepted: current,
                reason: BlockReason::BoundsCollision,
            };
        }
        let delta = desired - current;
        if delta.norm() <= f64::EPSILON {
            return MoveOutcome {
                accepted: current,
                reason: BlockReason::None,
            };
        }

        let positions = shape.positions();
        let with = |p: Point2| {
            let mut out = positions;
            out[label.index()] = p;
            out
        };
        let (verdict, accepted, flag_reason) = {
            let det = self.detector(shape);
            let verdict = self.walk(&det, delta.norm(), &[label], |t| with(current + delta * t));
            let accepted = if verdict.complete() {
                desired
            } else {
                current + delta * verdict.t
            };
            let flag_reason = if verdict.complete() {
                let ahead = accepted + delta.normalize() * self.cfg.step_resolution;
                det.check_step(&with(accepted), &with(ahead), &[label]).reason
            } else {
                verdict.reason
            };
            (verdict, accepted, flag_reason)
        };

        if accepted != current {
            shape.commit(with(accepted));
        }
        shape.vertex_movement_mut(label).record(flag_reason);
        if verdict.reason.is_blocked() {
            debug!(
                vertex = %label,
                reason = ?verdict.reason,
                fraction = verdict.t,
                "vertex move clipped"
            );
        }
        MoveOutcome {
            accepted,
            reason: verdict.reason,
        }
    }

    /// Relative form of `propose_vertex_move`.
    pub fn propose_vertex_delta(
        &self,
        shape: &mut Shape,
        label: VertexLabel,
        delta: Point2,
    ) -> MoveOutcome {
        let desired = shape.position(label) + delta;
        self.propose_vertex_move(shape, label, desired)
    }

    /// One key press worth of movement.
    pub fn propose_key_step(&self, shape: &mut Shape, label: VertexLabel, key: KeyStep) -> MoveOutcome {
        let amount = if key.fine {
            self.cfg.fine_key_step
        } else {
            self.cfg.key_step
        };
        self.propose_vertex_delta(shape, label, key.direction.unit() * amount)
    }

    /// Translate both endpoints of `side` together.
    pub fn propose_side_move(&self, shape: &mut Shape, side: SideLabel, delta: Point2) -> SideMoveOutcome {
        let (a, b) = side.vertices();
        let positions = shape.positions();
        let current = (positions[a.index()], positions[b.index()]);
        let moving = [a, b];
        if !(delta.x.is_finite() && delta.y.is_finite()) {
            shape.side_movement_mut(side).record(BlockReason::BoundsCollision);
            for v in moving {
                shape.vertex_movement_mut(v).record(BlockReason::BoundsCollision);
            }
            return SideMoveOutcome {
                accepted: current,
                reason: BlockReason::BoundsCollision,
            };
        }
        if delta.norm() <= f64::EPSILON {
            return SideMoveOutcome {
                accepted: current,
                reason: BlockReason::None,
            };
        }
        let shifted = |d: Point2| {
            let mut out = positions;
            out[a.index()] += d;
            out[b.index()] += d;
            out
        };
        let (verdict, flag_reason) = {
            let det = self.detector(shape);
            let verdict = self.walk(&det, delta.norm(), &moving, |t| shifted(delta * t));
            let flag_reason = if verdict.complete() {
                let ahead = delta + delta.normalize() * self.cfg.step_resolution;
                det.check_step(&shifted(delta), &shifted(ahead), &moving).reason
            } else {
                verdict.reason
            };
            (verdict, flag_reason)
        };

        let applied = if verdict.complete() {
            delta
        } else {
            delta * verdict.t
        };
        if verdict.t > 0.0 {
            shape.commit(shifted(applied));
        }
        shape.side_movement_mut(side).record(flag_reason);
        for v in moving {
            shape.vertex_movement_mut(v).record(flag_reason);
        }
        if verdict.reason.is_blocked() {
            debug!(side = %side, reason = ?verdict.reason, fraction = verdict.t, "side move clipped");
        }
        SideMoveOutcome {
            accepted: (current.0 + applied, current.1 + applied),
            reason: verdict.reason,
        }
    }

    /// Rotate the whole figure about its vertex centroid (counter-clockwise
    /// for positive `radians`). Only the bounds can stop a rigid rotation.
    pub fn propose_rotation(&self, shape: &mut Shape, radians: f64) -> RotationOutcome {
        if !radians.is_finite() || radians == 0.0 {
            return RotationOutcome {
                accepted_radians: 0.0,
                reason: BlockReason::None,
            };
        }
        let positions = shape.positions();
        let Some(pivot) = centroid(&positions) else {
            return RotationOutcome {
                accepted_radians: 0.0,
                reason: BlockReason::None,
            };
        };
        let rotated = |theta: f64| positions.map(|p| rotate_about(p, pivot, theta));
        let radius = positions
            .iter()
            .map(|p| (p - pivot).norm())
            .fold(0.0, f64::max);
        let (verdict, stuck) = {
            let det = self.detector(shape);
            let verdict = self.walk(&det, radius * radians.abs(), &VertexLabel::ALL, |t| {
                rotated(radians * t)
            });
            let target = rotated(radians);
            let stuck = VertexLabel::ALL.map(|l| det.out_of_bounds(target[l.index()]));
            (verdict, stuck)
        };

        let accepted_radians = radians * verdict.t;
        if verdict.t > 0.0 {
            shape.commit(rotated(accepted_radians));
        }
        for l in VertexLabel::ALL {
            let reason = if verdict.reason.is_blocked() && stuck[l.index()] {
                verdict.reason
            } else {
                BlockReason::None
            };
            shape.vertex_movement_mut(l).record(reason);
        }
        if verdict.reason.is_blocked() {
            debug!(radians, accepted_radians, reason = ?verdict.reason, "rotation clipped");
        }
        RotationOutcome {
            accepted_radians,
            reason: verdict.reason,
        }
    }

    /// Mark a vertex as grabbed or released. Releasing clears its blocked flags.
    pub fn set_active(&self, shape: &mut Shape, label: VertexLabel, active: bool) {
        let m = shape.vertex_movement_mut(label);
        m.is_active = active;
        if !active {
            m.clear_blocked();
        }
    }
}

#[cfg(test)]
mod tests;
