//! Error and warning taxonomy.
//!
//! - Structural/geometric failures are fatal and surface immediately:
//!   `InfeasiblePolytope`, `SamplingStall`, `PolytopeError`, `ConfigError`.
//! - `DegenerateDirection` is local to a single walk step and retried.
//! - `ConvergenceWarning` is statistical and never aborts a run; it is carried
//!   in the `VolumeEstimate` and logged.

use thiserror::Error;

/// Structural problems detected while building an `HPolytope`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolytopeError {
    #[error("polytope dimension must be positive")]
    ZeroDimension,
    #[error("constraint {row} has {got} coefficients, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("constraint matrix has {rows} rows but right-hand side has {rhs} entries")]
    RhsMismatch { rows: usize, rhs: usize },
    #[error("invalid family parameters: {reason}")]
    InvalidFamily { reason: String },
}

/// A ray through the current point has no resolvable chord: unbounded on one
/// side, empty, or numerically inverted. Callers redraw the direction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("direction yields no bounded chord through the point")]
pub struct DegenerateDirection;

/// The inscribed-ball LP has no usable optimum.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InfeasiblePolytope {
    #[error("polytope is unbounded (inscribed-ball or bounding LP is unbounded)")]
    Unbounded,
    #[error("polytope has empty interior (largest inscribed radius {radius:e})")]
    EmptyInterior { radius: f64 },
    #[error("simplex pivot limit reached after {iterations} iterations")]
    PivotLimit { iterations: usize },
}

/// The walk could not find a non-degenerate chord within the retry budget.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("random walk stalled: {retries} consecutive degenerate directions")]
pub struct SamplingStall {
    pub retries: usize,
}

/// Rejected `RunConfig` values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("relative_error must be finite and non-negative, got {0}")]
    NegativeRelativeError(f64),
    #[error("ball_ratio must lie strictly between 0 and 1, got {0}")]
    BallRatioOutOfRange(f64),
}

/// Non-fatal statistical quality issues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvergenceWarning {
    #[error("phase {phase}: none of {samples} samples hit the inner ball; ratio is a guess")]
    EmptyPhase { phase: usize, samples: usize },
    #[error("phase {phase}: all {samples} samples hit the inner ball; ratio is a guess")]
    SaturatedPhase { phase: usize, samples: usize },
    #[error("rounding skipped: {reason}")]
    RoundingSkipped { reason: String },
}

/// Fatal outcome of `estimate_volume`.
#[derive(Error, Debug)]
pub enum EstimationError {
    #[error("invalid run configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("polytope is not well formed (finite rows, nonzero normals, at least n+1 constraints)")]
    Malformed,
    #[error(transparent)]
    Infeasible(#[from] InfeasiblePolytope),
    #[error(transparent)]
    Stall(#[from] SamplingStall),
    #[error("could not start worker pool: {0}")]
    ThreadPool(String),
}
