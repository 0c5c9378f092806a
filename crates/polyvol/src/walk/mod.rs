//! Hit-and-run random walks inside `P ∩ B`.
//!
//! Purpose
//! - Produce near-uniform points in a polytope, optionally cut by a phase
//!   ball, for the multiphase estimator.
//!
//! Why this design
//! - The walk state caches `A·x`. A coordinate step changes one entry of `x`,
//!   so the chord and the cache update are both O(m) instead of O(mn).
//!   Rounding drift is bounded by recomputing the cache every
//!   `RESYNC_STEPS` steps.
//! - Degenerate chords are redrawn a bounded number of times; exhausting the
//!   budget is a `SamplingStall`, never an infinite loop.
//!
//! References
//! - Smith (1984), hit-and-run; Lovász–Vempala, mixing bounds.

use nalgebra::DVector;
use rand::RngCore;

use crate::ball::Ball;
use crate::cfg::{CHORD_EPS, RESYNC_STEPS};
use crate::error::SamplingStall;
use crate::hpoly::HPolytope;
use crate::rng::RandomSource;
use crate::scalar::Real;

/// Consecutive degenerate directions tolerated before a step gives up.
pub const DEFAULT_MAX_RETRIES: usize = 32;

/// Direction distribution of a walk step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WalkKind {
    /// Uniform coordinate axis; O(m) per step.
    #[default]
    CoordinateHitAndRun,
    /// Uniform direction on the sphere; O(mn) per step.
    HitAndRun,
}

/// Current point of a chain plus the cached `A·x`.
#[derive(Clone, Debug)]
pub struct WalkState<T: Real> {
    point: DVector<T>,
    ax: DVector<T>,
    since_sync: usize,
}

impl<T: Real> WalkState<T> {
    pub fn new(polytope: &HPolytope<T>, point: DVector<T>) -> Self {
        let ax = polytope.a() * &point;
        Self {
            point,
            ax,
            since_sync: 0,
        }
    }

    #[inline]
    pub fn point(&self) -> &DVector<T> {
        &self.point
    }

    pub fn into_point(self) -> DVector<T> {
        self.point
    }

    fn resync(&mut self, polytope: &HPolytope<T>) {
        self.since_sync += 1;
        if self.since_sync >= RESYNC_STEPS {
            self.ax = polytope.a() * &self.point;
            self.since_sync = 0;
        }
    }
}

/// Hit-and-run sampler over a fixed polytope.
#[derive(Clone, Debug)]
pub struct RandomWalkSampler<'a, T: Real> {
    polytope: &'a HPolytope<T>,
    kind: WalkKind,
    max_retries: usize,
}

impl<'a, T: Real> RandomWalkSampler<'a, T> {
    pub fn new(polytope: &'a HPolytope<T>, kind: WalkKind) -> Self {
        Self {
            polytope,
            kind,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    pub fn polytope(&self) -> &'a HPolytope<T> {
        self.polytope
    }

    /// One hit-and-run move of `state` inside `P ∩ ball`.
    pub fn step<R: RngCore>(
        &self,
        ball: Option<&Ball<T>>,
        state: &mut WalkState<T>,
        rng: &mut RandomSource<R>,
    ) -> Result<(), SamplingStall> {
        let min_chord = T::tolerance(CHORD_EPS);
        for _ in 0..self.max_retries {
            let moved = match self.kind {
                WalkKind::CoordinateHitAndRun => self.coordinate_move(ball, state, rng, min_chord),
                WalkKind::HitAndRun => self.sphere_move(ball, state, rng, min_chord),
            };
            if moved {
                state.resync(self.polytope);
                return Ok(());
            }
        }
        Err(SamplingStall {
            retries: self.max_retries,
        })
    }

    fn coordinate_move<R: RngCore>(
        &self,
        ball: Option<&Ball<T>>,
        state: &mut WalkState<T>,
        rng: &mut RandomSource<R>,
        min_chord: T,
    ) -> bool {
        let axis = rng.index(self.polytope.dim());
        let Ok((mut lo, mut hi)) = self.polytope.coordinate_distance(&state.ax, axis) else {
            return false;
        };
        if let Some(ball) = ball {
            let q = &state.point - &ball.center;
            let (blo, bhi) = ball.chord_from_offset(T::one(), q[axis], q.norm_squared());
            lo = lo.max(blo);
            hi = hi.min(bhi);
        }
        if hi - lo <= min_chord {
            return false;
        }
        let t = rng.uniform_in(lo, hi);
        state.point[axis] += t;
        state.ax.axpy(t, &self.polytope.a().column(axis), T::one());
        true
    }

    fn sphere_move<R: RngCore>(
        &self,
        ball: Option<&Ball<T>>,
        state: &mut WalkState<T>,
        rng: &mut RandomSource<R>,
        min_chord: T,
    ) -> bool {
        let n = self.polytope.dim();
        let d = DVector::from_fn(n, |_, _| rng.standard_normal::<T>());
        let norm = d.norm();
        if norm <= T::zero() {
            return false;
        }
        let d = d / norm;
        let ad = self.polytope.a() * &d;
        let Ok((mut lo, mut hi)) = self.polytope.chord(&state.ax, &ad) else {
            return false;
        };
        if let Some(ball) = ball {
            let (blo, bhi) = ball.chord(&state.point, &d);
            lo = lo.max(blo);
            hi = hi.min(bhi);
        }
        if hi - lo <= min_chord {
            return false;
        }
        let t = rng.uniform_in(lo, hi);
        state.point.axpy(t, &d, T::one());
        state.ax.axpy(t, &ad, T::one());
        true
    }

    /// `walk_length` steps from the current state.
    pub fn advance<R: RngCore>(
        &self,
        ball: Option<&Ball<T>>,
        state: &mut WalkState<T>,
        walk_length: usize,
        rng: &mut RandomSource<R>,
    ) -> Result<(), SamplingStall> {
        for _ in 0..walk_length {
            self.step(ball, state, rng)?;
        }
        Ok(())
    }

    /// Endpoint of a fresh `walk_length`-step walk from `start`.
    ///
    /// `start` must lie in `P ∩ ball`.
    pub fn sample<R: RngCore>(
        &self,
        ball: Option<&Ball<T>>,
        start: &DVector<T>,
        walk_length: usize,
        rng: &mut RandomSource<R>,
    ) -> Result<DVector<T>, SamplingStall> {
        debug_assert!(self.polytope.contains(start));
        let mut state = WalkState::new(self.polytope, start.clone());
        self.advance(ball, &mut state, walk_length, rng)?;
        Ok(state.into_point())
    }
}

/// One coordinate hit-and-run sample with the default retry budget.
pub fn sample_walk<T: Real, R: RngCore>(
    polytope: &HPolytope<T>,
    ball: Option<&Ball<T>>,
    start: &DVector<T>,
    walk_length: usize,
    rng: &mut RandomSource<R>,
) -> Result<DVector<T>, SamplingStall> {
    RandomWalkSampler::new(polytope, WalkKind::default()).sample(ball, start, walk_length, rng)
}
