//! Randomized volume estimation for convex polytopes in H-representation.
//!
//! Pipeline: `hpoly::HPolytope` → `ball::compute_inner_ball` →
//! `estimate::estimate_volume`, which drives `walk::RandomWalkSampler`
//! through a schedule of nested balls.
//!
//! API Policy
//! - `api` and `prelude` are the curated surface; module paths may move.
//! - Every stochastic entry point takes an explicit `rng::RandomSource`.
//!   There is no global RNG.

pub mod api;
pub mod ball;
mod cfg;
pub mod error;
pub mod estimate;
pub mod hpoly;
pub mod rng;
pub mod scalar;
pub mod walk;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use ball::{compute_inner_ball, InnerBall};
pub use estimate::{estimate_volume, RunConfig, VolumeEstimate};
pub use walk::sample_walk;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::ball::{compute_inner_ball, enclosing_radius, Ball, InnerBall};
    pub use crate::error::{
        ConvergenceWarning, EstimationError, InfeasiblePolytope, PolytopeError, SamplingStall,
    };
    pub use crate::estimate::{estimate_volume, RunConfig, RunFlags, VolumeEstimate};
    pub use crate::hpoly::{families, HPolytope, Halfspace};
    pub use crate::rng::RandomSource;
    pub use crate::scalar::Real;
    pub use crate::walk::{sample_walk, RandomWalkSampler, WalkKind};
    pub use nalgebra::{DMatrix, DVector};
}
