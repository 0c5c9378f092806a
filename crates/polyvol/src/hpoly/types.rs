//! Core n-D types: half-spaces and the dense H-representation polytope.

use nalgebra::{DMatrix, DVector};

use crate::cfg::{FEAS_EPS, PARALLEL_EPS};
use crate::error::{DegenerateDirection, PolytopeError};
use crate::scalar::Real;

/// Closed half-space `a · x <= b` in R^n.
///
/// Invariants:
/// - `a` is not normalized; `b` is any finite real.
/// - Membership uses `<= b + FEAS_EPS`.
#[derive(Clone, Debug, PartialEq)]
pub struct Halfspace<T: Real> {
    pub a: DVector<T>,
    pub b: T,
}

impl<T: Real> Halfspace<T> {
    #[inline]
    pub fn new(a: DVector<T>, b: T) -> Self {
        Self { a, b }
    }
    #[inline]
    pub fn satisfies(&self, p: &DVector<T>) -> bool {
        self.a.dot(p) <= self.b + T::tolerance(FEAS_EPS)
    }
}

/// Convex polytope `{x : A x <= b}` in R^n, stored densely.
///
/// Invariants:
/// - `a` is `m × n`, `b` has `m` entries, `row_norms[i] = ‖a_i‖`.
/// - Never mutated after construction. Boundedness and a nonempty interior
///   are the caller's promise; `is_well_formed` checks what can be checked
///   cheaply.
#[derive(Clone, Debug)]
pub struct HPolytope<T: Real> {
    a: DMatrix<T>,
    b: DVector<T>,
    row_norms: DVector<T>,
}

impl<T: Real> HPolytope<T> {
    /// Build from an ordered list of half-spaces in R^`dim`.
    pub fn new(dim: usize, halfspaces: Vec<Halfspace<T>>) -> Result<Self, PolytopeError> {
        if dim == 0 {
            return Err(PolytopeError::ZeroDimension);
        }
        for (row, hs) in halfspaces.iter().enumerate() {
            if hs.a.len() != dim {
                return Err(PolytopeError::DimensionMismatch {
                    row,
                    expected: dim,
                    got: hs.a.len(),
                });
            }
        }
        let m = halfspaces.len();
        let a = DMatrix::from_fn(m, dim, |i, j| halfspaces[i].a[j]);
        let b = DVector::from_iterator(m, halfspaces.iter().map(|h| h.b));
        Self::from_matrix(a, b)
    }

    /// Build from `A` (`m × n`) and `b` (`m`).
    pub fn from_matrix(a: DMatrix<T>, b: DVector<T>) -> Result<Self, PolytopeError> {
        if a.ncols() == 0 {
            return Err(PolytopeError::ZeroDimension);
        }
        if a.nrows() != b.len() {
            return Err(PolytopeError::RhsMismatch {
                rows: a.nrows(),
                rhs: b.len(),
            });
        }
        let row_norms = DVector::from_iterator(a.nrows(), a.row_iter().map(|r| r.norm()));
        Ok(Self { a, b, row_norms })
    }

    /// Build from `.ine`-style rows `[b, -a_1, ..., -a_n]`.
    pub fn from_ine_rows(rows: &[Vec<T>]) -> Result<Self, PolytopeError> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if width < 2 {
            return Err(PolytopeError::ZeroDimension);
        }
        let dim = width - 1;
        let mut hs = Vec::with_capacity(rows.len());
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(PolytopeError::DimensionMismatch {
                    row,
                    expected: dim,
                    got: r.len().saturating_sub(1),
                });
            }
            let a = DVector::from_iterator(dim, r[1..].iter().map(|&v| -v));
            hs.push(Halfspace::new(a, r[0]));
        }
        Self::new(dim, hs)
    }

    /// Rows `[b, -a_1, ..., -a_n]`, the inverse of `from_ine_rows`.
    pub fn to_ine_rows(&self) -> Vec<Vec<T>> {
        (0..self.num_constraints())
            .map(|i| {
                let mut row = Vec::with_capacity(self.dim() + 1);
                row.push(self.b[i]);
                row.extend(self.a.row(i).iter().map(|&v| -v));
                row
            })
            .collect()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.a.ncols()
    }
    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.a.nrows()
    }
    #[inline]
    pub fn a(&self) -> &DMatrix<T> {
        &self.a
    }
    #[inline]
    pub fn b(&self) -> &DVector<T> {
        &self.b
    }
    #[inline]
    pub fn row_norms(&self) -> &DVector<T> {
        &self.row_norms
    }

    pub fn halfspace(&self, i: usize) -> Halfspace<T> {
        Halfspace::new(self.a.row(i).transpose(), self.b[i])
    }

    pub fn halfspaces(&self) -> impl Iterator<Item = Halfspace<T>> + '_ {
        (0..self.num_constraints()).map(|i| self.halfspace(i))
    }

    /// True iff every constraint holds within `FEAS_EPS`.
    pub fn contains(&self, p: &DVector<T>) -> bool {
        let eps = T::tolerance(FEAS_EPS);
        let ax = &self.a * p;
        ax.iter().zip(self.b.iter()).all(|(&l, &r)| l <= r + eps)
    }

    /// Cheap structural sanity: finite data, nonzero normals, and at least
    /// `n + 1` constraints (fewer can never bound a body in R^n).
    pub fn is_well_formed(&self) -> bool {
        let eps = T::tolerance(PARALLEL_EPS);
        self.num_constraints() > self.dim()
            && self.a.iter().all(|v| v.is_finite())
            && self.b.iter().all(|v| v.is_finite())
            && self.row_norms.iter().all(|&nrm| nrm > eps)
    }

    /// Parameters `(t_near, t_far)` with `point + t·direction` on the boundary.
    ///
    /// `direction` need not be unit; `t` is measured in its units.
    pub fn boundary_distance(
        &self,
        point: &DVector<T>,
        direction: &DVector<T>,
    ) -> Result<(T, T), DegenerateDirection> {
        let ax = &self.a * point;
        let ad = &self.a * direction;
        self.chord(&ax, &ad)
    }

    /// Chord along a general direction given cached `ax = A·x` and `ad = A·d`.
    pub(crate) fn chord(
        &self,
        ax: &DVector<T>,
        ad: &DVector<T>,
    ) -> Result<(T, T), DegenerateDirection> {
        let mut clip = ChordClip::new();
        for i in 0..self.num_constraints() {
            clip.add(ad[i], self.b[i] - ax[i]);
        }
        clip.finish()
    }

    /// Chord along coordinate axis `axis` given cached `ax = A·x`; O(m).
    pub fn coordinate_distance(
        &self,
        ax: &DVector<T>,
        axis: usize,
    ) -> Result<(T, T), DegenerateDirection> {
        let mut clip = ChordClip::new();
        for i in 0..self.num_constraints() {
            clip.add(self.a[(i, axis)], self.b[i] - ax[i]);
        }
        clip.finish()
    }

    /// Preimage `{y : A (M y + t) <= b}` of the polytope under `x = M y + t`.
    pub fn pull_back(&self, m: &DMatrix<T>, t: &DVector<T>) -> Self {
        let a_new = &self.a * m;
        let b_new = &self.b - &self.a * t;
        let row_norms = DVector::from_iterator(a_new.nrows(), a_new.row_iter().map(|r| r.norm()));
        Self {
            a: a_new,
            b: b_new,
            row_norms,
        }
    }

    /// Push-forward under invertible affine map `y = M x + t`.
    ///
    /// Derivation: with `A x <= b` and `x = M^{-1}(y - t)` we get
    /// `(A M^{-1}) y <= b + (A M^{-1}) t`, i.e. the pull-back through the
    /// inverse map. Returns `None` when `M` is singular.
    pub fn push_forward(&self, m: &DMatrix<T>, t: &DVector<T>) -> Option<Self> {
        let minv = m.clone().try_inverse()?;
        let shift = -(&minv * t);
        Some(self.pull_back(&minv, &shift))
    }
}

/// Running intersection of per-constraint ray bounds `slope · t <= slack`.
struct ChordClip<T: Real> {
    lo: Option<T>,
    hi: Option<T>,
    eps: T,
}

impl<T: Real> ChordClip<T> {
    fn new() -> Self {
        Self {
            lo: None,
            hi: None,
            eps: T::tolerance(PARALLEL_EPS),
        }
    }

    #[inline]
    fn add(&mut self, slope: T, slack: T) {
        // Clamp: points a hair outside a facet still own the chord through t = 0.
        let slack = slack.max(T::zero());
        if slope > self.eps {
            let t = slack / slope;
            self.hi = Some(self.hi.map_or(t, |h| h.min(t)));
        } else if slope < -self.eps {
            let t = slack / slope;
            self.lo = Some(self.lo.map_or(t, |l| l.max(t)));
        }
    }

    fn finish(self) -> Result<(T, T), DegenerateDirection> {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) if lo.is_finite() && hi.is_finite() && lo <= hi => Ok((lo, hi)),
            _ => Err(DegenerateDirection),
        }
    }
}
