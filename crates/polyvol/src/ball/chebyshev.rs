//! Chebyshev (largest inscribed) ball and a bounding radius.
//!
//! LP: maximize `r` s.t. `a_i·x + r‖a_i‖ <= b_i`, with `x` free.
//! Substituting `r = r0 + ρ` with `r0 = min_i b_i/‖a_i‖` turns every
//! right-hand side into `b_i - r0‖a_i‖ >= 0`, so `(x, ρ) = 0` is a feasible
//! starting vertex for the simplex in `super::lp`.

use nalgebra::{DMatrix, DVector};

use super::lp::{maximize, Lp, LpOutcome};
use super::InnerBall;
use crate::cfg::{PARALLEL_EPS, RADIUS_EPS};
use crate::error::InfeasiblePolytope;
use crate::hpoly::HPolytope;
use crate::scalar::Real;

fn solved<T: Real>(out: LpOutcome<T>) -> Result<(DVector<T>, T), InfeasiblePolytope> {
    match out {
        LpOutcome::Optimal { z, value } => Ok((z, value)),
        LpOutcome::Unbounded => Err(InfeasiblePolytope::Unbounded),
        LpOutcome::PivotLimit { iterations } => Err(InfeasiblePolytope::PivotLimit { iterations }),
    }
}

/// Largest ball inside `polytope`.
///
/// Errors: `Unbounded` when the radius can grow without limit,
/// `EmptyInterior` when the optimal radius is at or below the tolerance,
/// `PivotLimit` when the simplex does not settle.
pub fn compute_inner_ball<T: Real>(
    polytope: &HPolytope<T>,
) -> Result<InnerBall<T>, InfeasiblePolytope> {
    let n = polytope.dim();
    let a = polytope.a();
    let b = polytope.b();
    let norms = polytope.row_norms();
    let zero_norm = T::tolerance(PARALLEL_EPS);

    // Zero rows read `0 <= b_i`: drop them, or fail if violated.
    let mut rows = Vec::with_capacity(polytope.num_constraints());
    for i in 0..polytope.num_constraints() {
        if norms[i] > zero_norm {
            rows.push(i);
        } else if b[i] < T::zero() {
            return Err(InfeasiblePolytope::EmptyInterior {
                radius: f64::NEG_INFINITY,
            });
        }
    }
    let Some(r0) = rows
        .iter()
        .map(|&i| b[i] / norms[i])
        .reduce(|acc, v| acc.min(v))
    else {
        return Err(InfeasiblePolytope::Unbounded);
    };

    let lp = Lp {
        m: DMatrix::from_fn(rows.len(), n + 1, |r, j| {
            let i = rows[r];
            if j < n {
                a[(i, j)]
            } else {
                norms[i]
            }
        }),
        h: DVector::from_iterator(rows.len(), rows.iter().map(|&i| b[i] - r0 * norms[i])),
        c: DVector::from_fn(n + 1, |j, _| if j == n { T::one() } else { T::zero() }),
        free: vec![true; n + 1],
    };
    let (z, _) = solved(maximize(&lp))?;
    let radius = r0 + z[n];
    if !radius.is_finite() || radius <= T::tolerance(RADIUS_EPS) {
        return Err(InfeasiblePolytope::EmptyInterior {
            radius: radius.to_f64_lossy(),
        });
    }
    let center = z.rows(0, n).into_owned();
    tracing::debug!(dim = n, radius = radius.to_f64_lossy(), "inner ball");
    Ok(InnerBall { center, radius })
}

/// Radius `R` with `polytope ⊆ B(center, R)`.
///
/// Solves `max ±x_j` over the polytope (2n LPs, shifted to `center`) and
/// returns the norm of the farthest box corner. `center` must be interior.
pub fn enclosing_radius<T: Real>(
    polytope: &HPolytope<T>,
    center: &DVector<T>,
) -> Result<T, InfeasiblePolytope> {
    let n = polytope.dim();
    let h = polytope.b() - polytope.a() * center;
    let mut sq = T::zero();
    for j in 0..n {
        let mut extent = T::zero();
        for sign in [T::one(), -T::one()] {
            let lp = Lp {
                m: polytope.a().clone(),
                h: h.clone(),
                c: DVector::from_fn(n, |k, _| if k == j { sign } else { T::zero() }),
                free: vec![true; n],
            };
            let (_, value) = solved(maximize(&lp))?;
            extent = extent.max(value);
        }
        sq += extent * extent;
    }
    Ok(sq.sqrt())
}
