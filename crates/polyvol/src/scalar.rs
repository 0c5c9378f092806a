//! Scalar abstraction shared by every stage of the engine.
//!
//! The estimator, the inscribed-ball LP and the walks are written once against
//! `T: Real` and run unchanged at `f32` or `f64` precision. Tuning knobs live
//! in `RunConfig` as plain `f64` and are converted at the point of use.

use nalgebra::RealField;

/// Floating scalar usable by the engine: arithmetic, ordering and
/// transcendental functions via `nalgebra::RealField`.
///
/// Blanket-implemented; never implement it by hand.
pub trait Real: RealField + Copy + Send + Sync {
    /// Literal conversion (`0.5`, `400.0`, ...).
    #[inline]
    fn lit(x: f64) -> Self {
        nalgebra::convert(x)
    }

    #[inline]
    fn of_count(k: usize) -> Self {
        nalgebra::convert(k as f64)
    }

    /// Lossy view as `f64` for logging and reports.
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self.to_subset().unwrap_or(f64::NAN)
    }

    /// `base` lifted to at least a few thousand ulps of the type, so a tolerance
    /// written for `f64` stays meaningful at `f32`.
    #[inline]
    fn tolerance(base: f64) -> Self {
        let floor = <Self as approx::AbsDiffEq>::default_epsilon() * Self::lit(1e3);
        Self::lit(base).max(floor)
    }
}

impl<T: RealField + Copy + Send + Sync> Real for T {}
