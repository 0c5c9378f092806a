//! Euclidean balls: the inscribed (Chebyshev) ball that anchors the
//! estimator, phase balls, and their log-volumes.
//!
//! Purpose
//! - `compute_inner_ball` gives the starting ball `B_0 ⊆ P`.
//! - `enclosing_radius` gives `R` with `P ⊆ B(c, R)`, the last phase ball.
//! - `measure` turns radii into log-volumes.
//!
//! Why this design
//! - Both LPs are tiny and dense (`m × (n+1)`), so a dense-tableau simplex
//!   keeps the dependency stack at nalgebra.
//!
//! Code cross-refs: `crate::estimate::engine` (phase schedule), `crate::walk`
//! (ball-restricted chords).

mod chebyshev;
mod lp;
pub mod measure;

use nalgebra::DVector;

pub use chebyshev::{compute_inner_ball, enclosing_radius};

use crate::cfg::FEAS_EPS;
use crate::hpoly::HPolytope;
use crate::scalar::Real;

/// Largest ball inside a polytope.
///
/// Invariant: `a_i · center + radius · ‖a_i‖ <= b_i` for every row, and
/// `radius > 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct InnerBall<T: Real> {
    pub center: DVector<T>,
    pub radius: T,
}

impl<T: Real> InnerBall<T> {
    /// Check the containment invariant against `polytope` within tolerance.
    pub fn is_inscribed_in(&self, polytope: &HPolytope<T>) -> bool {
        let eps = T::tolerance(FEAS_EPS);
        let ac = polytope.a() * &self.center;
        (0..polytope.num_constraints()).all(|i| {
            ac[i] + self.radius * polytope.row_norms()[i] <= polytope.b()[i] + eps
        })
    }

    pub fn as_ball(&self) -> Ball<T> {
        Ball::new(self.center.clone(), self.radius)
    }

    pub fn log_volume(&self) -> T {
        measure::log_ball_volume(self.center.len(), self.radius)
    }
}

/// Closed ball `{x : ‖x - center‖ <= radius}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ball<T: Real> {
    pub center: DVector<T>,
    pub radius: T,
}

impl<T: Real> Ball<T> {
    #[inline]
    pub fn new(center: DVector<T>, radius: T) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.center.len()
    }

    /// Membership with a relative tolerance on the squared radius.
    #[inline]
    pub fn contains(&self, p: &DVector<T>) -> bool {
        let eps = T::tolerance(FEAS_EPS);
        let r2 = self.radius * self.radius;
        (p - &self.center).norm_squared() <= r2 * (T::one() + eps)
    }

    pub fn log_volume(&self) -> T {
        measure::log_ball_volume(self.dim(), self.radius)
    }

    /// Parameters `(t_lo, t_hi)` where `p + t·d` crosses the sphere.
    ///
    /// `p` is assumed inside (or within tolerance of) the ball; `d != 0`.
    pub fn chord(&self, p: &DVector<T>, d: &DVector<T>) -> (T, T) {
        let q = p - &self.center;
        self.chord_from_offset(d.norm_squared(), q.dot(d), q.norm_squared())
    }

    /// Line-sphere roots of `dd·t² + 2·qd·t + (qq - r²) = 0`, with the
    /// discriminant clamped so points a hair outside still get a chord.
    #[inline]
    pub(crate) fn chord_from_offset(&self, dd: T, qd: T, qq: T) -> (T, T) {
        let disc = (qd * qd - dd * (qq - self.radius * self.radius)).max(T::zero());
        let root = disc.sqrt();
        ((-qd - root) / dd, (-qd + root) / dd)
    }
}

impl<T: Real> From<InnerBall<T>> for Ball<T> {
    fn from(b: InnerBall<T>) -> Self {
        Ball::new(b.center, b.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn ball_chord_hits_sphere() {
        let ball = Ball::<f64>::new(dvector![1.0, 1.0], 2.0);
        let p = dvector![1.5, 1.0];
        let d = dvector![0.0, 3.0];
        let (lo, hi) = ball.chord(&p, &d);
        for t in [lo, hi] {
            let x = &p + &d * t;
            assert!(((&x - &ball.center).norm() - 2.0).abs() < 1e-12);
        }
        assert!(lo < 0.0 && hi > 0.0);
    }

    #[test]
    fn ball_membership_tolerance() {
        let ball = Ball::<f64>::new(dvector![0.0, 0.0, 0.0], 1.0);
        assert!(ball.contains(&dvector![1.0, 0.0, 0.0]));
        assert!(!ball.contains(&dvector![0.8, 0.8, 0.0]));
    }

    #[test]
    fn inner_ball_converts_to_ball() {
        let inner = InnerBall::<f64> {
            center: dvector![0.25, 0.5],
            radius: 0.25,
        };
        let ball: Ball<f64> = inner.clone().into();
        assert_eq!(ball, inner.as_ball());
        assert!((ball.log_volume() - inner.log_volume()).abs() < 1e-15);
        assert!((ball.log_volume().exp() - std::f64::consts::PI / 16.0).abs() < 1e-12);
    }
}
