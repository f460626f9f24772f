//! Synthetic observation sets for demonstrations and tests.
//!
//! The core sampler never depends on this module; it exists so callers and
//! tests can build datasets with known ground-truth parameters.

use crate::error::{GibbsError, Result};
use crate::model::Dataset;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

/// Generate `n` points from y = intercept + slope·x + ε with x ~ Normal(0, 1)
/// and ε ~ Normal(0, 1/sqrt(precision)), deterministically from `seed`.
pub fn linear_dataset(
    n: usize,
    intercept: f64,
    slope: f64,
    precision: f64,
    seed: u64,
) -> Result<Dataset> {
    if !(precision.is_finite() && precision > 0.0) {
        return Err(GibbsError::NonPositive {
            name: "precision",
            value: precision,
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise_sd = 1.0 / precision.sqrt();
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for _ in 0..n {
        let xi: f64 = StandardNormal.sample(&mut rng);
        let eps: f64 = StandardNormal.sample(&mut rng);
        x.push(xi);
        y.push(intercept + slope * xi + noise_sd * eps);
    }
    Dataset::new(x, y)
}
