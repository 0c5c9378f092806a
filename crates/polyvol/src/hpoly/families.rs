//! Reference polytope families with closed-form volumes.
//!
//! Purpose
//! - Deterministic bodies for accuracy tests, benches and `polyvol generate`.
//! - Every constructor returns the same constraint order for the same
//!   parameters, so `.ine` files written from them are stable.
//!
//! Volumes (for checking estimates)
//! - `cube(n, h)`: `(2h)^n`; `skinny_cube(n, l)`: `2^(n-1) · 2l`.
//! - `cross_polytope(n)`: `2^n / n!`; `simplex(n)`: `1 / n!`.
//! - `product_simplex(p, q)`: `1 / (p! q!)`.
//! - `birkhoff(k)`: no closed form; B3 = 1/8, B4 ≈ 9.70018e-4,
//!   B5 ≈ 2.25e-7, B6 ≈ 9.455459196e-13 in the `(k-1)^2` free coordinates
//!   used here.

use nalgebra::DVector;

use super::types::{HPolytope, Halfspace};
use crate::error::PolytopeError;
use crate::scalar::Real;

/// Largest cross-polytope dimension accepted (it has `2^n` facets).
pub const CROSS_POLYTOPE_MAX_DIM: usize = 20;

fn invalid(reason: impl Into<String>) -> PolytopeError {
    PolytopeError::InvalidFamily {
        reason: reason.into(),
    }
}

fn axis<T: Real>(n: usize, i: usize, value: T) -> DVector<T> {
    let mut v = DVector::zeros(n);
    v[i] = value;
    v
}

/// Axis-aligned cube `[-h, h]^n`.
pub fn cube<T: Real>(n: usize, half_width: T) -> Result<HPolytope<T>, PolytopeError> {
    if half_width <= T::zero() {
        return Err(invalid("cube half-width must be positive"));
    }
    box_from_half_widths(&vec![half_width; n])
}

/// `[-1, 1]^(n-1) × [-l, l]`: a cube stretched along the last axis.
pub fn skinny_cube<T: Real>(n: usize, long_half_width: T) -> Result<HPolytope<T>, PolytopeError> {
    if n == 0 {
        return Err(PolytopeError::ZeroDimension);
    }
    if long_half_width <= T::zero() {
        return Err(invalid("skinny cube long side must be positive"));
    }
    let mut widths = vec![T::one(); n];
    widths[n - 1] = long_half_width;
    box_from_half_widths(&widths)
}

fn box_from_half_widths<T: Real>(widths: &[T]) -> Result<HPolytope<T>, PolytopeError> {
    let n = widths.len();
    let mut hs = Vec::with_capacity(2 * n);
    for (i, &w) in widths.iter().enumerate() {
        hs.push(Halfspace::new(axis(n, i, T::one()), w));
        hs.push(Halfspace::new(axis(n, i, -T::one()), w));
    }
    HPolytope::new(n, hs)
}

/// Unit cross-polytope `{x : Σ|x_i| <= 1}` as `2^n` sign-vector facets.
pub fn cross_polytope<T: Real>(n: usize) -> Result<HPolytope<T>, PolytopeError> {
    if n > CROSS_POLYTOPE_MAX_DIM {
        return Err(invalid(format!(
            "cross-polytope limited to n <= {CROSS_POLYTOPE_MAX_DIM} (2^n facets)"
        )));
    }
    let hs = (0u64..(1u64 << n))
        .map(|mask| {
            let a = DVector::from_fn(n, |i, _| {
                if mask & (1 << i) == 0 {
                    T::one()
                } else {
                    -T::one()
                }
            });
            Halfspace::new(a, T::one())
        })
        .collect();
    HPolytope::new(n, hs)
}

/// Standard simplex `{x >= 0, Σ x_i <= 1}`.
pub fn simplex<T: Real>(n: usize) -> Result<HPolytope<T>, PolytopeError> {
    let mut hs: Vec<_> = (0..n)
        .map(|i| Halfspace::new(axis(n, i, -T::one()), T::zero()))
        .collect();
    hs.push(Halfspace::new(DVector::from_element(n, T::one()), T::one()));
    HPolytope::new(n, hs)
}

/// Product `Δ_p × Δ_q` of two standard simplices in R^(p+q).
pub fn product_simplex<T: Real>(p: usize, q: usize) -> Result<HPolytope<T>, PolytopeError> {
    if p == 0 || q == 0 {
        return Err(invalid("product simplex factors must have positive dimension"));
    }
    let n = p + q;
    let mut hs: Vec<_> = (0..n)
        .map(|i| Halfspace::new(axis(n, i, -T::one()), T::zero()))
        .collect();
    hs.push(Halfspace::new(
        DVector::from_fn(n, |i, _| if i < p { T::one() } else { T::zero() }),
        T::one(),
    ));
    hs.push(Halfspace::new(
        DVector::from_fn(n, |i, _| if i >= p { T::one() } else { T::zero() }),
        T::one(),
    ));
    HPolytope::new(n, hs)
}

/// Birkhoff polytope `B_k` (doubly stochastic `k × k` matrices) in the
/// coordinates of its leading `(k-1) × (k-1)` block.
///
/// The last row/column are determined by the block; the constraints are
/// nonnegativity of all `k^2` entries:
/// - `x_ij >= 0` for the block,
/// - row and column sums of the block `<= 1`,
/// - bottom-right entry `Σ x_ij - (k - 2) >= 0`.
pub fn birkhoff<T: Real>(k: usize) -> Result<HPolytope<T>, PolytopeError> {
    if k < 2 {
        return Err(invalid("Birkhoff polytope needs k >= 2"));
    }
    let d = k - 1;
    let n = d * d;
    let idx = |i: usize, j: usize| i * d + j;
    let mut hs = Vec::with_capacity(k * k);
    for v in 0..n {
        hs.push(Halfspace::new(axis(n, v, -T::one()), T::zero()));
    }
    for i in 0..d {
        let mut a = DVector::zeros(n);
        for j in 0..d {
            a[idx(i, j)] = T::one();
        }
        hs.push(Halfspace::new(a, T::one()));
    }
    for j in 0..d {
        let mut a = DVector::zeros(n);
        for i in 0..d {
            a[idx(i, j)] = T::one();
        }
        hs.push(Halfspace::new(a, T::one()));
    }
    hs.push(Halfspace::new(
        DVector::from_element(n, -T::one()),
        -T::of_count(k - 2),
    ));
    HPolytope::new(n, hs)
}
