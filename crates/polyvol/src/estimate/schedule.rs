//! Radii of the nested phase balls.

use crate::scalar::Real;

/// Increasing radii `r_0 < r_1 < … < r_k` with `r_{i+1} = r_i · β^{-1/n}`,
/// closed by the enclosing radius `R`.
///
/// Ball `i` and ball `i+1` bound phase `i`; there are `k = radii.len() - 1`
/// phases and always at least one. Only the single-phase schedule of a body
/// with `r_0 = R` repeats a radius.
#[derive(Clone, Debug, PartialEq)]
pub struct BallSchedule<T: Real> {
    radii: Vec<T>,
}

impl<T: Real> BallSchedule<T> {
    /// Geometric radii all the way from `inner` to `outer`.
    pub fn geometric(inner: T, outer: T, dim: usize, ball_ratio: f64) -> Self {
        Self::trimmed(inner, outer, outer, dim, ball_ratio)
    }

    /// Geometric radii from `inner` until the first one at or past `target`,
    /// then a single closing phase out to `outer`.
    ///
    /// `target` is where the body's mass thins out; radii between it and the
    /// enclosing radius would only add phases whose ratio is almost 1.
    pub fn trimmed(inner: T, target: T, outer: T, dim: usize, ball_ratio: f64) -> Self {
        let growth = T::lit(ball_ratio).powf(-T::one() / T::of_count(dim));
        let outer = outer.max(inner);
        let target = target.min(outer);
        let steps = ((target / inner).ln() / growth.ln()).to_f64_lossy().ceil();
        // Non-finite or non-positive step counts collapse to the closing phase.
        let steps = if steps.is_finite() && steps > 0.0 {
            steps as usize
        } else {
            0
        };
        let mut radii: Vec<T> = std::iter::successors(Some(inner), |&r| Some(r * growth))
            .take(steps + 1)
            .take_while(|&r| r < outer)
            .collect();
        if radii.is_empty() {
            radii.push(inner);
        }
        radii.push(outer);
        Self { radii }
    }

    pub fn radii(&self) -> &[T] {
        &self.radii
    }

    pub fn phases(&self) -> usize {
        self.radii.len() - 1
    }

    /// `(inner, outer)` radii of phase `i`.
    pub fn phase(&self, i: usize) -> (T, T) {
        (self.radii[i], self.radii[i + 1])
    }
}
