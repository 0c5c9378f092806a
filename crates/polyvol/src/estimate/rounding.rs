//! Covariance rounding.
//!
//! Sample the body, fit `Σ = L Lᵀ`, and estimate the volume of
//! `P' = {y : A(μ + L y) <= b}` instead: `vol(P) = |det L| · vol(P')`.
//! A round `P'` needs far fewer phases than a skinny `P`.

use nalgebra::{Cholesky, DMatrix, DVector};
use rand::RngCore;

use crate::error::SamplingStall;
use crate::hpoly::HPolytope;
use crate::rng::RandomSource;
use crate::scalar::Real;
use crate::walk::{RandomWalkSampler, WalkState};

/// Affine map `x = shift + transform · y` with `transform` lower triangular.
#[derive(Clone, Debug, PartialEq)]
pub struct Rounding<T: Real> {
    pub shift: DVector<T>,
    pub transform: DMatrix<T>,
    /// `ln det(transform)`.
    pub log_det: T,
}

impl<T: Real> Rounding<T> {
    /// The rounded body `{y : A(shift + transform · y) <= b}`.
    pub fn apply(&self, polytope: &HPolytope<T>) -> HPolytope<T> {
        polytope.pull_back(&self.transform, &self.shift)
    }

    /// Map a point of the rounded body back to the original coordinates.
    pub fn to_original(&self, y: &DVector<T>) -> DVector<T> {
        &self.shift + &self.transform * y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RoundingOutcome<T: Real> {
    Applied(Rounding<T>),
    Skipped { reason: String },
}

/// Draw `count` chained samples from `start` and fit the rounding map.
pub fn fit_rounding<T: Real, R: RngCore>(
    sampler: &RandomWalkSampler<'_, T>,
    start: &DVector<T>,
    count: usize,
    walk_length: usize,
    rng: &mut RandomSource<R>,
) -> Result<RoundingOutcome<T>, SamplingStall> {
    let n = start.len();
    if count <= n {
        return Ok(RoundingOutcome::Skipped {
            reason: format!("{count} samples cannot fit a covariance in dimension {n}"),
        });
    }
    let mut state = WalkState::new(sampler.polytope(), start.clone());
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        sampler.advance(None, &mut state, walk_length, rng)?;
        points.push(state.point().clone());
    }

    Ok(fit_points(&points))
}

/// Fit the rounding map to `points` through their mean and covariance.
///
/// Skips when the covariance has no usable Cholesky factor, which happens
/// whenever the points span less than the full space.
pub fn fit_points<T: Real>(points: &[DVector<T>]) -> RoundingOutcome<T> {
    let Some(n) = points.first().map(|p| p.len()) else {
        return RoundingOutcome::Skipped {
            reason: "no samples to fit".into(),
        };
    };
    let count = points.len();
    if count <= n {
        return RoundingOutcome::Skipped {
            reason: format!("{count} samples cannot fit a covariance in dimension {n}"),
        };
    }
    let inv = T::one() / T::of_count(count);
    let mean = points.iter().fold(DVector::zeros(n), |acc, p| acc + p) * inv;
    let mut cov = DMatrix::<T>::zeros(n, n);
    for p in points {
        let d = p - &mean;
        cov.ger(T::one(), &d, &d, T::one());
    }
    cov /= T::of_count(count - 1);

    let Some(chol) = Cholesky::new(cov) else {
        return RoundingOutcome::Skipped {
            reason: "sample covariance is not positive definite".into(),
        };
    };
    let transform = chol.l();
    let log_det = transform
        .diagonal()
        .iter()
        .fold(T::zero(), |acc, &v| acc + v.ln());
    if !log_det.is_finite() {
        return RoundingOutcome::Skipped {
            reason: "covariance factor is numerically singular".into(),
        };
    }
    RoundingOutcome::Applied(Rounding {
        shift: mean,
        transform,
        log_det,
    })
}
