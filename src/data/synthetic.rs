//! Seeded synthetic regression problems.
//!
//! `X` entries are standard normal (Box–Muller), `beta_true` is uniform in
//! `[-5, 5)` and `y = X·beta_true`, optionally plus Gaussian noise with standard
//! deviation `0.1 · std(X·beta_true)`. The same `(n, d, seed)` always yields
//! bit-identical output, whichever rank generates it.

use crate::error::{zeroed, RegError};
use crate::regression::{Dataset, ProblemShape};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Relative noise level used by [`SyntheticData::generate`].
pub const NOISE_RATIO: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticData {
    pub shape: ProblemShape,
    /// Row-major `n × d`.
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub beta_true: Vec<f64>,
}

fn standard_normal(rng: &mut StdRng) -> f64 {
    // 1 - U keeps the logarithm finite
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

impl SyntheticData {
    /// Noisy problem: `y = X·beta_true + ε`.
    pub fn generate(shape: ProblemShape, seed: u64) -> Result<Self, RegError> {
        Self::build(shape, seed, NOISE_RATIO)
    }

    /// Exact problem: `y = X·beta_true`.
    pub fn noiseless(shape: ProblemShape, seed: u64) -> Result<Self, RegError> {
        Self::build(shape, seed, 0.0)
    }

    fn build(shape: ProblemShape, seed: u64, noise_ratio: f64) -> Result<Self, RegError> {
        let ProblemShape { samples: n, features: d } = shape;
        let mut rng = StdRng::seed_from_u64(seed);

        let mut x = zeroed("X", shape.elements()?)?;
        for v in x.iter_mut() {
            *v = standard_normal(&mut rng);
        }
        let beta_true: Vec<f64> = (0..d).map(|_| rng.gen_range(-5.0..5.0)).collect();

        let mut y = zeroed("y", n)?;
        for (yi, row) in y.iter_mut().zip(x.chunks_exact(d)) {
            *yi = row.iter().zip(&beta_true).map(|(a, b)| a * b).sum();
        }

        if noise_ratio > 0.0 {
            let mean = y.iter().sum::<f64>() / n as f64;
            let std = (y.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64).sqrt();
            let level = noise_ratio * std;
            for yi in y.iter_mut() {
                *yi += level * standard_normal(&mut rng);
            }
            debug!("synthetic data n={n}, d={d}, seed={seed}: signal std {std:.4}, noise {level:.4}");
        } else {
            debug!("synthetic data n={n}, d={d}, seed={seed}: noiseless");
        }

        Ok(SyntheticData { shape, x, y, beta_true })
    }

    pub fn dataset(&self) -> Result<Dataset<'_>, RegError> {
        Dataset::new(&self.x, &self.y, self.shape)
    }
}
