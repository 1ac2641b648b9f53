//! Seeded random figures and device-style jitter.
//!
//! Purpose
//! - Reproducible valid quadrilaterals for property tests, benches and the
//!   `sample` CLI command.
//! - A jitter source that mimics noisy physical-device samples.
//!
//! Model
//! - Four equally spaced angles on [0, 2π) plus a random phase, bounded
//!   angular jitter (< half the spacing, so the order is preserved) and radial
//!   jitter. Sorted angles around a centre give a simple, counter-clockwise,
//!   star-shaped polygon (convex or concave).
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::collision::Bounds;
use crate::geom::{Point2, Tolerances};
use crate::shape::Shape;

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialCfg {
    /// Angular jitter as a fraction of the base spacing π/2. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii are `base_radius * (1 + u)` with `u ∈ [-radial_jitter, radial_jitter]`. Clamped to [0, 0.9].
    pub radial_jitter: f64,
    pub base_radius: f64,
    pub center: Point2,
    pub random_phase: bool,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            angle_jitter_frac: 0.3,
            radial_jitter: 0.4,
            base_radius: 1.0,
            center: Point2::zeros(),
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw four counter-clockwise points (A, B, C, D) by radial jitter.
pub fn draw_quad_radial(cfg: RadialCfg, tok: ReplayToken) -> [Point2; 4] {
    let mut rng = tok.to_std_rng();
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = cfg.base_radius.max(1e-6);
    let delta = std::f64::consts::FRAC_PI_2;
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    std::array::from_fn(|k| {
        let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
        let th = phase + (k as f64) * delta + jitter;
        let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
        let r = (1.0 + u) * r0;
        cfg.center + Point2::new(th.cos() * r, th.sin() * r)
    })
}

/// Draw a `Shape`; `None` if the draw violates the bounds or tolerances.
pub fn draw_shape(cfg: RadialCfg, tok: ReplayToken, bounds: Bounds, tol: Tolerances) -> Option<Shape> {
    Shape::new(draw_quad_radial(cfg, tok), bounds, tol).ok()
}

/// Uniform jitter in a square of half-extent `amplitude`, seeded.
#[derive(Clone, Debug)]
pub struct DeviceNoise {
    amplitude: f64,
    rng: StdRng,
}

impl DeviceNoise {
    pub fn new(amplitude: f64, seed: u64) -> Self {
        Self {
            amplitude: amplitude.abs(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `p` plus fresh noise.
    pub fn jitter(&mut self, p: Point2) -> Point2 {
        if self.amplitude == 0.0 {
            return p;
        }
        let a = self.amplitude;
        p + Point2::new(self.rng.gen_range(-a..=a), self.rng.gen_range(-a..=a))
    }

    /// Jitter every point of a figure independently.
    pub fn jitter_all(&mut self, points: [Point2; 4]) -> [Point2; 4] {
        points.map(|p| self.jitter(p))
    }
}
