//! Per-tick request processing and category-change notification.
//!
//! Purpose
//! - Serialize every move request (pointer drags, key presses, device-bridge
//!   samples) into one FIFO queue drained once per tick.
//! - After draining, recompute the snapshot and emit at most one
//!   `CategoryChange { previous, current }` if the category differs from the
//!   previous tick.
//!
//! Concurrency
//! - Single writer: only `Session::tick` (through `MoveSolver`) or a direct
//!   `propose_vertex_move` call mutates positions, and both need `&mut Session`.
//! - Producers on other threads hold a cloneable `RequestSender`; their
//!   requests are pulled into the queue at the start of the next tick, after
//!   requests enqueued directly.
//! - Each request is resolved completely before the next one is looked at;
//!   two requests for the same vertex are never merged.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::NamedQuadrilateralCategory;
use crate::geom::Point2;
use crate::shape::{Shape, ShapeError, SideLabel, VertexLabel};
use crate::snapshot::{CategoryChange, ChangeDetector, ShapeSnapshot};
use crate::solver::{KeyStep, MoveCfg, MoveOutcome, MoveSolver, RotationOutcome, SideMoveOutcome};

/// A queued mutation request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveRequest {
    /// Drag a vertex to an absolute position.
    MoveVertex { vertex: VertexLabel, to: Point2 },
    /// Displace a vertex.
    NudgeVertex { vertex: VertexLabel, delta: Point2 },
    /// One discrete key press on a vertex.
    Key { vertex: VertexLabel, step: KeyStep },
    /// Drag a side (both endpoints) by a displacement.
    MoveSide { side: SideLabel, delta: Point2 },
    /// Rotate the whole figure about its centroid.
    Rotate { radians: f64 },
    Grab { vertex: VertexLabel },
    Release { vertex: VertexLabel },
    /// Restore the figure the session was created with.
    Reset,
}

/// Normalized sample from a device bridge; the transport is unknown here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviceSample {
    VertexDelta { vertex: VertexLabel, delta: Point2 },
    Rotation { radians: f64 },
}

impl From<DeviceSample> for MoveRequest {
    fn from(s: DeviceSample) -> Self {
        match s {
            DeviceSample::VertexDelta { vertex, delta } => MoveRequest::NudgeVertex { vertex, delta },
            DeviceSample::Rotation { radians } => MoveRequest::Rotate { radians },
        }
    }
}

/// What happened to one request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestOutcome {
    Vertex { vertex: VertexLabel, outcome: MoveOutcome },
    Side { side: SideLabel, outcome: SideMoveOutcome },
    Rotation { outcome: RotationOutcome },
    Grabbed { vertex: VertexLabel },
    Released { vertex: VertexLabel },
    Reset,
}

/// Summary of one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub outcomes: Vec<RequestOutcome>,
    pub positions: [Point2; 4],
    pub category: NamedQuadrilateralCategory,
    pub change: Option<CategoryChange>,
}

/// Cloneable handle for producers outside the tick loop.
#[derive(Clone, Debug)]
pub struct RequestSender {
    tx: Sender<MoveRequest>,
}

impl RequestSender {
    /// `false` once the session is gone.
    pub fn send(&self, req: impl Into<MoveRequest>) -> bool {
        self.tx.send(req.into()).is_ok()
    }
}

type Listener = Box<dyn FnMut(&CategoryChange) + Send>;

/// Owns the figure, the request queue and the change detector.
pub struct Session {
    shape: Shape,
    initial: [Point2; 4],
    solver: MoveSolver,
    queue: VecDeque<MoveRequest>,
    tx: Sender<MoveRequest>,
    rx: Receiver<MoveRequest>,
    tick: u64,
    changes: ChangeDetector,
    listeners: Vec<Listener>,
}

impl Session {
    /// Fails if the figure is already blocked under `cfg.vertex_radius`, since
    /// `Reset` would return to it.
    pub fn new(shape: Shape, cfg: MoveCfg) -> Result<Self, ShapeError> {
        shape.check_clearance(cfg.vertex_radius)?;
        let (tx, rx) = mpsc::channel();
        let changes = ChangeDetector::new(shape.category());
        Ok(Self {
            initial: shape.positions(),
            shape,
            solver: MoveSolver::new(cfg),
            queue: VecDeque::new(),
            tx,
            rx,
            tick: 0,
            changes,
            listeners: Vec::new(),
        })
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn solver(&self) -> &MoveSolver {
        &self.solver
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Requests waiting for the next tick (channel backlog not included).
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn current_category(&self) -> NamedQuadrilateralCategory {
        self.shape.category()
    }

    pub fn current_snapshot(&self) -> ShapeSnapshot {
        self.shape.snapshot()
    }

    pub fn sender(&self) -> RequestSender {
        RequestSender {
            tx: self.tx.clone(),
        }
    }

    pub fn enqueue(&mut self, req: impl Into<MoveRequest>) {
        self.queue.push_back(req.into());
    }

    /// Called synchronously from `tick` with each emitted change.
    pub fn on_category_change<F>(&mut self, listener: F)
    where
        F: FnMut(&CategoryChange) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Resolve a vertex move immediately. Any resulting category change is
    /// reported by the next `tick`.
    pub fn propose_vertex_move(&mut self, vertex: VertexLabel, desired: Point2) -> MoveOutcome {
        self.solver.propose_vertex_move(&mut self.shape, vertex, desired)
    }

    /// Drain the queue in order, then emit at most one category change.
    pub fn tick(&mut self) -> TickReport {
        self.queue.extend(self.rx.try_iter());
        let mut outcomes = Vec::with_capacity(self.queue.len());
        while let Some(req) = self.queue.pop_front() {
            outcomes.push(self.apply(req));
        }
        self.tick += 1;

        let category = self.shape.category();
        let change = self.changes.observe_category(category);
        if let Some(c) = &change {
            debug!(tick = self.tick, previous = %c.previous, current = %c.current, "category changed");
            for l in &mut self.listeners {
                l(c);
            }
        }
        if !outcomes.is_empty() {
            debug!(tick = self.tick, requests = outcomes.len(), "tick drained queue");
        }
        TickReport {
            tick: self.tick,
            outcomes,
            positions: self.shape.positions(),
            category,
            change,
        }
    }

    fn apply(&mut self, req: MoveRequest) -> RequestOutcome {
        let shape = &mut self.shape;
        let solver = &self.solver;
        match req {
            MoveRequest::MoveVertex { vertex, to } => RequestOutcome::Vertex {
                vertex,
                outcome: solver.propose_vertex_move(shape, vertex, to),
            },
            MoveRequest::NudgeVertex { vertex, delta } => RequestOutcome::Vertex {
                vertex,
                outcome: solver.propose_vertex_delta(shape, vertex, delta),
            },
            MoveRequest::Key { vertex, step } => RequestOutcome::Vertex {
                vertex,
                outcome: solver.propose_key_step(shape, vertex, step),
            },
            MoveRequest::MoveSide { side, delta } => RequestOutcome::Side {
                side,
                outcome: solver.propose_side_move(shape, side, delta),
            },
            MoveRequest::Rotate { radians } => RequestOutcome::Rotation {
                outcome: solver.propose_rotation(shape, radians),
            },
            MoveRequest::Grab { vertex } => {
                solver.set_active(shape, vertex, true);
                RequestOutcome::Grabbed { vertex }
            }
            MoveRequest::Release { vertex } => {
                solver.set_active(shape, vertex, false);
                RequestOutcome::Released { vertex }
            }
            MoveRequest::Reset => {
                shape.commit(self.initial);
                for v in VertexLabel::ALL {
                    solver.set_active(shape, v, false);
                }
                for side in SideLabel::ALL {
                    shape.side_movement_mut(side).clear_blocked();
                }
                debug!("figure reset");
                RequestOutcome::Reset
            }
        }
    }
}
