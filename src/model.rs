use crate::error::{GibbsError, Result};

/// An immutable set of paired observations (x_i, y_i).
///
/// Construction is the single validation point: lengths must match, the set
/// must be non-empty, and every value must be finite. Downstream code relies
/// on these invariants instead of re-checking per call.
#[derive(Debug, Clone)]
pub struct Dataset {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Dataset {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(GibbsError::LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        if x.is_empty() {
            return Err(GibbsError::EmptyData);
        }
        for (i, &v) in x.iter().enumerate() {
            if !v.is_finite() {
                return Err(GibbsError::NonFinite {
                    name: "x",
                    index: i,
                    value: v,
                });
            }
        }
        for (i, &v) in y.iter().enumerate() {
            if !v.is_finite() {
                return Err(GibbsError::NonFinite {
                    name: "y",
                    index: i,
                    value: v,
                });
            }
        }
        Ok(Self { x, y })
    }

    /// Number of observation pairs. Always at least 1.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }
}

/// The (intercept, slope, precision) triple carried between iterations.
///
/// Within one sweep the fields are updated in declaration order, each update
/// reading the freshest values of the other two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamState {
    pub intercept: f64,
    pub slope: f64,
    pub precision: f64,
}

impl ParamState {
    pub fn new(intercept: f64, slope: f64, precision: f64) -> Self {
        Self {
            intercept,
            slope,
            precision,
        }
    }

    /// Fields as `[intercept, slope, precision]`.
    pub fn as_array(&self) -> [f64; 3] {
        [self.intercept, self.slope, self.precision]
    }
}

/// Prior specification for the regression model.
///
/// Gaussian priors on intercept and slope are given as (mean, precision);
/// the noise precision carries a Gamma(shape, rate) prior. Values are plain
/// fields so callers can build the struct literally; drivers call
/// [`Hyperparameters::validate`] once at the start of a run.
#[derive(Debug, Clone, Copy)]
pub struct Hyperparameters {
    pub intercept_prior_mean: f64,
    pub intercept_prior_precision: f64,
    pub slope_prior_mean: f64,
    pub slope_prior_precision: f64,
    pub shape: f64,
    pub rate: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            intercept_prior_mean: 0.0,
            intercept_prior_precision: 0.01,
            slope_prior_mean: 0.0,
            slope_prior_precision: 0.01,
            shape: 0.01,
            rate: 0.01,
        }
    }
}

impl Hyperparameters {
    /// Check every field against its valid range.
    pub fn validate(&self) -> Result<()> {
        check_finite("intercept_prior_mean", self.intercept_prior_mean)?;
        check_finite("slope_prior_mean", self.slope_prior_mean)?;
        check_positive("intercept_prior_precision", self.intercept_prior_precision)?;
        check_positive("slope_prior_precision", self.slope_prior_precision)?;
        check_positive("shape", self.shape)?;
        check_positive("rate", self.rate)?;
        Ok(())
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GibbsError::NonFiniteParameter { name, value })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GibbsError::NonPositive { name, value })
    }
}
