//! Closed-form conditional posteriors for the three regression parameters.
//!
//! The model is y_i = intercept + slope·x_i + ε_i with ε ~ Normal(0, 1/precision),
//! Gaussian priors on both coefficients and a Gamma(shape, rate) prior on the
//! precision. Conjugacy makes every full conditional exact: Gaussian for the
//! coefficients, Gamma for the precision, so a Gibbs step is a single draw.
//!
//! Posterior-parameter computation is split from the draws so the algebra can
//! be checked analytically in tests.

use crate::model::Dataset;
use rand::Rng;
use rand_distr::{Distribution, Gamma, StandardNormal};

/// Mean and precision of a Gaussian conditional posterior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalParams {
    pub mean: f64,
    pub precision: f64,
}

/// Shape and rate of a Gamma conditional posterior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    pub shape: f64,
    pub rate: f64,
}

// ── Intercept ───────────────────────────────────────────────────────

/// Conditional posterior of the intercept given slope and noise precision.
///
///   precision' = tau_0 + precision · N
///   mean'      = (tau_0·mu_0 + precision · Σ(y_i − slope·x_i)) / precision'
pub fn intercept_posterior(
    data: &Dataset,
    slope: f64,
    precision: f64,
    prior_mean: f64,
    prior_precision: f64,
) -> NormalParams {
    let n = data.len() as f64;
    let resid_sum: f64 = data
        .y()
        .iter()
        .zip(data.x())
        .map(|(&yi, &xi)| yi - slope * xi)
        .sum();
    let post_precision = prior_precision + precision * n;
    let post_mean = (prior_precision * prior_mean + precision * resid_sum) / post_precision;
    NormalParams {
        mean: post_mean,
        precision: post_precision,
    }
}

/// Draw the intercept from its conditional posterior.
pub fn sample_intercept<R: Rng>(
    data: &Dataset,
    slope: f64,
    precision: f64,
    prior_mean: f64,
    prior_precision: f64,
    rng: &mut R,
) -> f64 {
    draw_normal(
        intercept_posterior(data, slope, precision, prior_mean, prior_precision),
        rng,
    )
}

// ── Slope ───────────────────────────────────────────────────────────

/// Conditional posterior of the slope given intercept and noise precision.
///
///   precision' = tau_1 + precision · Σ x_i²
///   mean'      = (tau_1·mu_1 + precision · Σ((y_i − intercept)·x_i)) / precision'
pub fn slope_posterior(
    data: &Dataset,
    intercept: f64,
    precision: f64,
    prior_mean: f64,
    prior_precision: f64,
) -> NormalParams {
    let sum_x_sq: f64 = data.x().iter().map(|&xi| xi * xi).sum();
    let cross_sum: f64 = data
        .y()
        .iter()
        .zip(data.x())
        .map(|(&yi, &xi)| (yi - intercept) * xi)
        .sum();
    let post_precision = prior_precision + precision * sum_x_sq;
    let post_mean = (prior_precision * prior_mean + precision * cross_sum) / post_precision;
    NormalParams {
        mean: post_mean,
        precision: post_precision,
    }
}

/// Draw the slope from its conditional posterior.
pub fn sample_slope<R: Rng>(
    data: &Dataset,
    intercept: f64,
    precision: f64,
    prior_mean: f64,
    prior_precision: f64,
    rng: &mut R,
) -> f64 {
    draw_normal(
        slope_posterior(data, intercept, precision, prior_mean, prior_precision),
        rng,
    )
}

// ── Precision ───────────────────────────────────────────────────────

/// Conditional posterior of the noise precision given both coefficients.
///
///   shape' = alpha + N/2
///   rate'  = beta + Σ(y_i − intercept − slope·x_i)² / 2
pub fn precision_posterior(
    data: &Dataset,
    intercept: f64,
    slope: f64,
    shape: f64,
    rate: f64,
) -> GammaParams {
    let n = data.len() as f64;
    let rss: f64 = data
        .y()
        .iter()
        .zip(data.x())
        .map(|(&yi, &xi)| {
            let r = yi - intercept - slope * xi;
            r * r
        })
        .sum();
    GammaParams {
        shape: shape + n / 2.0,
        rate: rate + rss / 2.0,
    }
}

/// Draw the noise precision from its conditional Gamma posterior.
pub fn sample_precision<R: Rng>(
    data: &Dataset,
    intercept: f64,
    slope: f64,
    shape: f64,
    rate: f64,
    rng: &mut R,
) -> f64 {
    let post = precision_posterior(data, intercept, slope, shape, rate);
    // rand_distr's Gamma is parameterized by (shape, scale), not (shape, rate).
    // Feeding the rate directly would skew every draw by a factor of rate²
    // without any error, so the inversion happens here and nowhere else.
    let scale = 1.0 / post.rate;
    let gamma = Gamma::new(post.shape, scale).expect("posterior shape and scale are positive");
    gamma.sample(rng)
}

fn draw_normal<R: Rng>(params: NormalParams, rng: &mut R) -> f64 {
    let sd = 1.0 / params.precision.sqrt();
    let z: f64 = StandardNormal.sample(rng);
    params.mean + sd * z
}
