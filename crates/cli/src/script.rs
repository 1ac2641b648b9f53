//! Replay scripts: a starting figure plus per-tick request batches.
//!
//! ```json
//! {
//!   "points": [[0,0],[1,0],[1,1],[0,1]],
//!   "bounds": { "min": [-3,-3], "max": [3,3] },
//!   "ticks": [
//!     [{ "kind": "move_vertex", "vertex": "C", "to": [1.0, 2.0] }],
//!     [{ "kind": "rotate", "radians": 0.2 }]
//!   ]
//! }
//! ```

use anyhow::{anyhow, Context, Result};
use quadrilateral::api::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct RectBounds {
    pub min: Point2,
    pub max: Point2,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Script {
    pub points: Vec<Point2>,
    #[serde(default)]
    pub bounds: Option<RectBounds>,
    #[serde(default)]
    pub tolerances: Option<Tolerances>,
    #[serde(default)]
    pub move_cfg: Option<MoveCfg>,
    #[serde(default)]
    pub ticks: Vec<Vec<MoveRequest>>,
}

/// The configuration a replay actually ran with, after defaults are filled in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSetup {
    pub tolerances: Tolerances,
    pub move_cfg: MoveCfg,
    /// Outline of the bounding region, counter-clockwise.
    pub bounds: Vec<Point2>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Trace {
    pub setup: RunSetup,
    pub initial_category: NamedQuadrilateralCategory,
    pub ticks: Vec<TickReport>,
    pub changes: Vec<CategoryChange>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn build_shape(&self) -> Result<Shape> {
        let bounds = match &self.bounds {
            Some(b) => Bounds::rect(b.min, b.max)?,
            None => Bounds::default(),
        };
        let tol = self.tolerances.unwrap_or_default();
        Ok(Shape::from_slice(&self.points, bounds, tol)?)
    }

    /// Run every tick batch through a fresh session.
    pub fn replay(&self) -> Result<Trace> {
        let shape = self.build_shape().context("building the starting figure")?;
        let setup = RunSetup {
            tolerances: shape.tolerances(),
            move_cfg: self.move_cfg.unwrap_or_default(),
            bounds: shape.bounds().body().points().to_vec(),
        };
        let mut session =
            Session::new(shape, setup.move_cfg).context("the starting figure cannot move")?;
        let initial_category = session.current_category();
        let mut ticks = Vec::with_capacity(self.ticks.len());
        for batch in &self.ticks {
            for req in batch {
                session.enqueue(*req);
            }
            ticks.push(session.tick());
        }
        let changes = ticks.iter().filter_map(|t| t.change).collect();
        Ok(Trace {
            setup,
            initial_category,
            ticks,
            changes,
        })
    }
}

/// Parse `"x,y x,y x,y x,y"` (whitespace or `;` between points).
pub fn parse_points(text: &str) -> Result<Vec<Point2>> {
    text.split(|c: char| c.is_whitespace() || c == ';')
        .filter(|t| !t.is_empty())
        .map(|tok| {
            let (x, y) = tok
                .split_once(',')
                .ok_or_else(|| anyhow!("point {tok:?} is not of the form x,y"))?;
            let x: f64 = x.trim().parse().with_context(|| format!("x in {tok:?}"))?;
            let y: f64 = y.trim().parse().with_context(|| format!("y in {tok:?}"))?;
            Ok(Point2::new(x, y))
        })
        .collect()
}
