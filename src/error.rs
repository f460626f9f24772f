use thiserror::Error;

/// Errors surfaced by dataset construction, configuration, and sampling.
///
/// Every variant is fatal. The sampler is a deterministic-given-seed
/// sequential transform, so an invalid input or violated invariant aborts
/// the run instead of continuing with meaningless state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GibbsError {
    #[error("observation arrays differ in length: x has {x_len} values, y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("observation set is empty; at least one (x, y) pair is required")]
    EmptyData,

    #[error("non-finite value in observations: {name}[{index}] = {value}")]
    NonFinite {
        name: &'static str,
        index: usize,
        value: f64,
    },

    #[error("{name} must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    #[error("{name} must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("iteration count must be at least 1")]
    ZeroIterations,

    #[error("precision draw at iteration {iteration} is not positive ({value}); sampler state is corrupt")]
    DegeneratePrecision { iteration: usize, value: f64 },
}

pub type Result<T> = std::result::Result<T, GibbsError>;
