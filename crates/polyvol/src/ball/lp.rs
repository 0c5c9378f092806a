//! Dense-tableau primal simplex for the small LPs of this crate.
//!
//! Form: maximize `c·z` subject to `M z <= h` with `h >= 0`, so the origin is
//! a feasible vertex and no phase one is needed. Each variable is either
//! nonnegative or free; free variables are split as `z = z⁺ - z⁻`.
//!
//! Pricing is Dantzig (most negative reduced cost). After a streak of
//! degenerate pivots we switch to Bland's rule, which cannot cycle.

use nalgebra::{DMatrix, DVector};

use crate::cfg::PIVOT_EPS;
use crate::scalar::Real;

#[derive(Clone, Debug)]
pub(crate) struct Lp<T: Real> {
    pub m: DMatrix<T>,
    pub h: DVector<T>,
    pub c: DVector<T>,
    pub free: Vec<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum LpOutcome<T: Real> {
    Optimal { z: DVector<T>, value: T },
    Unbounded,
    PivotLimit { iterations: usize },
}

struct Tableau<T: Real> {
    t: DMatrix<T>,
    basis: Vec<usize>,
    rows: usize,
    rhs: usize,
}

impl<T: Real> Tableau<T> {
    fn objective(&self, col: usize) -> T {
        self.t[(self.rows, col)]
    }

    fn entering(&self, bland: bool, eps: T) -> Option<usize> {
        let mut best: Option<(usize, T)> = None;
        for col in 0..self.rhs {
            let rc = self.objective(col);
            if rc >= -eps {
                continue;
            }
            if bland {
                return Some(col);
            }
            if best.map_or(true, |(_, v)| rc < v) {
                best = Some((col, rc));
            }
        }
        best.map(|(col, _)| col)
    }

    /// Min-ratio row; ties go to the smallest basic index (Bland).
    fn leaving(&self, col: usize, eps: T) -> Option<(usize, T)> {
        let mut best: Option<(usize, T)> = None;
        for row in 0..self.rows {
            let coef = self.t[(row, col)];
            if coef <= eps {
                continue;
            }
            let ratio = self.t[(row, self.rhs)] / coef;
            let better = match best {
                None => true,
                Some((r, v)) => {
                    ratio < v - eps || (ratio <= v + eps && self.basis[row] < self.basis[r])
                }
            };
            if better {
                best = Some((row, ratio));
            }
        }
        best
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let p = self.t[(row, col)];
        let width = self.t.ncols();
        for j in 0..width {
            self.t[(row, j)] /= p;
        }
        for i in 0..=self.rows {
            if i == row {
                continue;
            }
            let f = self.t[(i, col)];
            if f == T::zero() {
                continue;
            }
            for j in 0..width {
                let delta = f * self.t[(row, j)];
                self.t[(i, j)] -= delta;
            }
        }
        self.basis[row] = col;
    }
}

/// Solve `lp`; see the module docs for the accepted form.
pub(crate) fn maximize<T: Real>(lp: &Lp<T>) -> LpOutcome<T> {
    let rows = lp.m.nrows();
    let vars = lp.m.ncols();
    debug_assert_eq!(lp.h.len(), rows);
    debug_assert_eq!(lp.c.len(), vars);
    debug_assert_eq!(lp.free.len(), vars);

    // Column layout: [z⁺ / z (per var), z⁻ (free vars only), slacks, rhs].
    let mut neg_col = vec![None; vars];
    let mut next = vars;
    for (j, &free) in lp.free.iter().enumerate() {
        if free {
            neg_col[j] = Some(next);
            next += 1;
        }
    }
    let structural = next;
    let rhs = structural + rows;
    let mut t = DMatrix::<T>::zeros(rows + 1, rhs + 1);
    for i in 0..rows {
        for j in 0..vars {
            let v = lp.m[(i, j)];
            t[(i, j)] = v;
            if let Some(nc) = neg_col[j] {
                t[(i, nc)] = -v;
            }
        }
        t[(i, structural + i)] = T::one();
        t[(i, rhs)] = lp.h[i].max(T::zero());
    }
    for j in 0..vars {
        t[(rows, j)] = -lp.c[j];
        if let Some(nc) = neg_col[j] {
            t[(rows, nc)] = lp.c[j];
        }
    }
    let mut tab = Tableau {
        t,
        basis: (structural..structural + rows).collect(),
        rows,
        rhs,
    };

    let eps = T::tolerance(PIVOT_EPS);
    let max_iter = 50 * (rows + rhs).max(10);
    let degenerate_limit = rows.max(8);
    let mut streak = 0usize;
    for _ in 0..max_iter {
        let Some(col) = tab.entering(streak > degenerate_limit, eps) else {
            return LpOutcome::Optimal {
                z: extract(&tab, vars, &neg_col),
                value: tab.t[(rows, rhs)],
            };
        };
        let Some((row, ratio)) = tab.leaving(col, eps) else {
            return LpOutcome::Unbounded;
        };
        if ratio <= eps {
            streak += 1;
        } else {
            streak = 0;
        }
        tab.pivot(row, col);
    }
    LpOutcome::PivotLimit {
        iterations: max_iter,
    }
}

fn extract<T: Real>(tab: &Tableau<T>, vars: usize, neg_col: &[Option<usize>]) -> DVector<T> {
    let mut expanded = DVector::<T>::zeros(tab.rhs);
    for (row, &b) in tab.basis.iter().enumerate() {
        expanded[b] = tab.t[(row, tab.rhs)];
    }
    DVector::from_fn(vars, |j, _| {
        let pos = expanded[j];
        match neg_col[j] {
            Some(nc) => pos - expanded[nc],
            None => pos,
        }
    })
}
