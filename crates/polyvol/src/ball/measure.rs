//! Euclidean ball volumes in log-space.
//!
//! `V_n(r) = r^n π^{n/2} / Γ(n/2 + 1)`. The gamma factor is an iterative
//! product over integers (even `n`) or half-integers times `√π` (odd `n`),
//! summed as logarithms so nothing overflows for large `n`.

use crate::scalar::Real;

/// `ln k!` as a running sum of logarithms.
pub fn ln_factorial(k: usize) -> f64 {
    (2..=k).map(|j| (j as f64).ln()).sum()
}

/// `ln Γ(n/2 + 1)` for a positive integer `n`.
pub fn ln_gamma_half_plus_one<T: Real>(n: usize) -> T {
    if n % 2 == 0 {
        (2..=n / 2).fold(T::zero(), |acc, j| acc + T::of_count(j).ln())
    } else {
        // Γ(k + 1/2 + 1) = Π_{j=0}^{k} (j + 1/2) · √π with k = (n - 1) / 2.
        let half = T::lit(0.5);
        (0..=(n - 1) / 2).fold(half * T::pi().ln(), |acc, j| {
            acc + (T::of_count(j) + half).ln()
        })
    }
}

/// `ln V_n(1)`.
pub fn log_unit_ball_volume<T: Real>(n: usize) -> T {
    T::of_count(n) * T::lit(0.5) * T::pi().ln() - ln_gamma_half_plus_one::<T>(n)
}

/// `ln V_n(r)` for `r > 0`.
pub fn log_ball_volume<T: Real>(n: usize, radius: T) -> T {
    T::of_count(n) * radius.ln() + log_unit_ball_volume::<T>(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn low_dimensional_unit_balls() {
        let cases = [(1, 2.0), (2, PI), (3, 4.0 * PI / 3.0), (4, PI * PI / 2.0)];
        for (n, v) in cases {
            let got = log_unit_ball_volume::<f64>(n).exp();
            assert!((got - v).abs() < 1e-12, "n={n}: {got} vs {v}");
        }
    }

    #[test]
    fn gamma_matches_factorial_for_even_n() {
        for k in 0..20 {
            let lg: f64 = ln_gamma_half_plus_one(2 * k);
            assert!((lg - ln_factorial(k)).abs() < 1e-10);
        }
    }

    #[test]
    fn radius_scales_as_power_of_dimension() {
        let n = 7;
        let diff: f64 = log_ball_volume(n, 3.0) - log_ball_volume(n, 1.0);
        assert!((diff - 7.0 * 3f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn high_dimension_stays_finite() {
        let v: f64 = log_unit_ball_volume(400);
        assert!(v.is_finite() && v < -500.0);
        let v32: f32 = log_unit_ball_volume(400);
        assert!(((v32 as f64) - v).abs() / v.abs() < 1e-4);
    }
}
