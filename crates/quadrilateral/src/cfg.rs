//! Tuned constants (internal).
//!
//! Policy
//! - Defaults are fixed constants chosen against the end-to-end scenarios in the
//!   tests. They reflect expected input jitter from pointer drags and the
//!   physical-device bridge, not machine epsilon.
//! - Call sites read them through `Tolerances` / `MoveCfg` so a caller can
//!   override a value without touching this file.

/// Angle comparison slack (radians) for pointer/keyboard input.
pub(crate) const ANGLE_EPS: f64 = 1e-2;
/// Length comparison slack (model units) for pointer/keyboard input.
pub(crate) const LENGTH_EPS: f64 = 1e-2;
/// Angle slack for noisy physical-device samples.
pub(crate) const DEVICE_ANGLE_EPS: f64 = 5e-2;
/// Length slack for noisy physical-device samples.
pub(crate) const DEVICE_LENGTH_EPS: f64 = 5e-2;
/// Sides shorter than this count as coincident vertices.
pub(crate) const MIN_SIDE_LENGTH: f64 = 1e-2;
/// Enclosed area at or below this counts as collapsed.
pub(crate) const MIN_AREA: f64 = 1e-4;
/// Path sampling resolution for the movement solver. Kept below
/// `MIN_SIDE_LENGTH` so a vertex cannot hop over a forbidden zone in one sample.
pub(crate) const STEP_RESOLUTION: f64 = 5e-3;
/// Displacement of one discrete key press.
pub(crate) const KEY_STEP: f64 = 0.25;
/// Displacement of one key press with the fine modifier held.
pub(crate) const FINE_KEY_STEP: f64 = 0.0625;
/// Half-extent of the default play area (square centred on the origin).
pub(crate) const BOUNDS_HALF_EXTENT: f64 = 3.0;
/// Orientation tests treat |cross| at or below this as collinear.
pub(crate) const ORIENT_EPS: f64 = 1e-12;
/// Upper bound on samples per path; longer paths sample more coarsely.
pub(crate) const MAX_PATH_SAMPLES: usize = 20_000;
