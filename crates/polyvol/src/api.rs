//! Curated API surface for callers (the CLI, benches, tests).
//!
//! Prefer these re-exports over deep module paths; internal layout may change.

// Polytopes
pub use crate::hpoly::families::{
    birkhoff, cross_polytope, cube, product_simplex, simplex, skinny_cube, CROSS_POLYTOPE_MAX_DIM,
};
pub use crate::hpoly::{HPolytope, Halfspace};
// Balls
pub use crate::ball::measure::{ln_factorial, log_ball_volume, log_unit_ball_volume};
pub use crate::ball::{compute_inner_ball, enclosing_radius, Ball, InnerBall};
// Sampling
pub use crate::rng::RandomSource;
pub use crate::walk::{sample_walk, RandomWalkSampler, WalkKind, WalkState};
// Estimation
pub use crate::estimate::rounding::{fit_rounding, Rounding, RoundingOutcome};
pub use crate::estimate::{
    estimate_volume, BallSchedule, PhaseReport, RunConfig, RunFlags, RunSummary, VolumeEstimate,
    VolumeEstimator,
};
// Errors
pub use crate::error::{
    ConfigError, ConvergenceWarning, DegenerateDirection, EstimationError, InfeasiblePolytope,
    PolytopeError, SamplingStall,
};
