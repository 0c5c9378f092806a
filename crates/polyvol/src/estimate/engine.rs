//! Multiphase Monte Carlo driver.
//!
//! Phases run outside in. Phase `i` samples `B_{i+1} ∩ P` and counts hits in
//! `B_i`; the volume telescopes as
//! `ln vol(P) = ln vol(B_0) - Σ ln ratio_i (+ ln det L with rounding)`.
//!
//! Before the phases, a pilot walk over `P` measures how far the body's mass
//! reaches from the center. Radii stop growing geometrically once they pass
//! the `ball_ratio` quantile of those distances, and one closing phase runs
//! out to the enclosing radius. A phase whose samples all hit (or all miss)
//! its inner ball is therefore degenerate unless both radii coincide; it is
//! retried with more samples and reported as a `ConvergenceWarning`.
//!
//! Each worker owns a forked `RandomSource` and a chain anchor. A phase
//! splits its sample count over the workers in a fixed way and sums their
//! hits, so a fixed seed and thread count replay bit for bit.

use std::cmp::Ordering;

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::RngCore;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::config::RunConfig;
use super::report::{PhaseReport, RunSummary, VolumeEstimate};
use super::rounding::{fit_rounding, RoundingOutcome};
use super::schedule::BallSchedule;
use crate::ball::{compute_inner_ball, enclosing_radius, Ball, InnerBall};
use crate::error::{ConvergenceWarning, EstimationError, SamplingStall};
use crate::hpoly::HPolytope;
use crate::rng::RandomSource;
use crate::scalar::Real;
use crate::walk::{RandomWalkSampler, WalkState};

macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

/// A sampling chain bound to one rayon task.
struct Worker<T: Real> {
    rng: RandomSource<StdRng>,
    /// Last point known to lie in the current phase's outer ball.
    anchor: DVector<T>,
}

impl<T: Real> Worker<T> {
    fn run_phase(
        &mut self,
        sampler: &RandomWalkSampler<'_, T>,
        outer: &Ball<T>,
        inner: &Ball<T>,
        count: usize,
        walk_length: usize,
    ) -> Result<usize, SamplingStall> {
        let mut state = WalkState::new(sampler.polytope(), self.anchor.clone());
        let mut hits = 0;
        for _ in 0..count {
            sampler.advance(Some(outer), &mut state, walk_length, &mut self.rng)?;
            if inner.contains(state.point()) {
                hits += 1;
                self.anchor.copy_from(state.point());
            }
        }
        Ok(hits)
    }

    /// Distances from `center` of `count` chained samples of the whole body.
    fn distances(
        &mut self,
        sampler: &RandomWalkSampler<'_, T>,
        center: &DVector<T>,
        count: usize,
        walk_length: usize,
    ) -> Result<Vec<T>, SamplingStall> {
        let mut state = WalkState::new(sampler.polytope(), self.anchor.clone());
        let mut out = Vec::with_capacity(count.min(1 << 16));
        for _ in 0..count {
            sampler.advance(None, &mut state, walk_length, &mut self.rng)?;
            out.push((state.point() - center).norm());
        }
        Ok(out)
    }
}

fn spawn_workers<T: Real, R: RngCore>(
    rng: &mut RandomSource<R>,
    threads: usize,
    start: &DVector<T>,
) -> Vec<Worker<T>> {
    (0..threads)
        .map(|k| Worker {
            rng: rng.fork(k as u64),
            anchor: start.clone(),
        })
        .collect()
}

/// Share of `total` samples assigned to worker `k` of `workers`.
fn share(total: usize, k: usize, workers: usize) -> usize {
    total / workers + usize::from(k < total % workers)
}

/// Value at fraction `q` of the sorted `values`; `None` when empty.
fn quantile<T: Real>(mut values: Vec<T>, q: f64) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let k = ((values.len() - 1) as f64 * q.clamp(0.0, 1.0)).round() as usize;
    let (_, v, _) =
        values.select_nth_unstable_by(k, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(*v)
}

/// Ratio reported for a phase still degenerate after its retries: half a
/// sample off the observed 0 or 1.
fn best_effort_ratio<T: Real>(hits: usize, count: usize) -> T {
    let half = T::one() / T::of_count(count.saturating_mul(2));
    if hits == 0 {
        half
    } else {
        T::one() - half
    }
}

/// `ln(mean(exp(logs)))` without overflow.
fn log_mean_exp<T: Real>(logs: &[T]) -> T {
    let Some(max) = logs.iter().copied().reduce(|a, b| a.max(b)) else {
        return T::zero();
    };
    let sum = logs.iter().fold(T::zero(), |acc, &l| acc + (l - max).exp());
    max + sum.ln() - T::of_count(logs.len()).ln()
}

/// Volume estimator for one polytope and one configuration.
pub struct VolumeEstimator<'a, T: Real> {
    polytope: &'a HPolytope<T>,
    config: RunConfig,
}

/// Everything fixed before the repetitions start.
struct Plan<'a, T: Real> {
    sampler: RandomWalkSampler<'a, T>,
    inner: InnerBall<T>,
    schedule: BallSchedule<T>,
    samples: usize,
    walk_length: usize,
    log_base: T,
}

impl<'a, T: Real> VolumeEstimator<'a, T> {
    pub fn new(polytope: &'a HPolytope<T>, config: RunConfig) -> Result<Self, EstimationError> {
        config.validate()?;
        if !polytope.is_well_formed() {
            return Err(EstimationError::Malformed);
        }
        Ok(Self { polytope, config })
    }

    pub fn run<R: RngCore>(
        &self,
        rng: &mut RandomSource<R>,
    ) -> Result<VolumeEstimate<T>, EstimationError> {
        let cfg = &self.config;
        let n = self.polytope.dim();
        let pool = ThreadPoolBuilder::new()
            .num_threads(cfg.thread_count)
            .build()
            .map_err(|e| EstimationError::ThreadPool(e.to_string()))?;
        let mut warnings = Vec::new();

        let mut inner = compute_inner_ball(self.polytope)?;
        let walk_length = cfg.walk_length_for(n);
        let mut rounding_log_det = T::zero();
        let rounded;
        let body: &HPolytope<T> = if cfg.flags.use_rounding {
            let sampler = RandomWalkSampler::new(self.polytope, cfg.walk)
                .with_max_retries(cfg.max_direction_retries);
            let count = cfg.rounding_samples.saturating_mul(n);
            match fit_rounding(&sampler, &inner.center, count, walk_length, rng)? {
                RoundingOutcome::Applied(r) => {
                    rounded = r.apply(self.polytope);
                    inner = compute_inner_ball(&rounded)?;
                    rounding_log_det = r.log_det;
                    progress!(
                        cfg.flags.verbose,
                        log_det = r.log_det.to_f64_lossy(),
                        samples = count,
                        "rounding applied"
                    );
                    &rounded
                }
                RoundingOutcome::Skipped { reason } => {
                    let w = ConvergenceWarning::RoundingSkipped { reason };
                    tracing::warn!("{w}");
                    warnings.push(w);
                    self.polytope
                }
            }
        } else {
            self.polytope
        };

        let sampler =
            RandomWalkSampler::new(body, cfg.walk).with_max_retries(cfg.max_direction_retries);
        let outer = enclosing_radius(body, &inner.center)?;
        let pilot = cfg.base_samples_for(n);
        let target = self.pilot_radius(&pool, &sampler, &inner.center, pilot, walk_length, rng)?;
        let schedule = BallSchedule::trimmed(inner.radius, target, outer, n, cfg.ball_ratio);
        let samples = cfg.samples_for(n, schedule.phases());
        progress!(
            cfg.flags.verbose,
            dim = n,
            constraints = body.num_constraints(),
            inner_radius = inner.radius.to_f64_lossy(),
            outer_radius = outer.to_f64_lossy(),
            pilot_radius = target.to_f64_lossy(),
            phases = schedule.phases(),
            samples_per_phase = samples,
            walk_length,
            "volume run planned"
        );

        let plan = Plan {
            sampler,
            log_base: rounding_log_det + inner.log_volume(),
            inner,
            schedule,
            samples,
            walk_length,
        };

        let mut runs = Vec::with_capacity(cfg.repetitions);
        for rep in 0..cfg.repetitions {
            let mut workers = spawn_workers(rng, cfg.thread_count, &plan.inner.center);
            let run = self.repetition(&pool, &plan, &mut workers, &mut warnings)?;
            progress!(
                cfg.flags.verbose,
                repetition = rep,
                volume = run.log_volume.exp().to_f64_lossy(),
                "repetition done"
            );
            runs.push(run);
        }

        let logs: Vec<T> = runs.iter().map(|r| r.log_volume).collect();
        let log_volume = log_mean_exp(&logs);
        tracing::info!(
            volume = log_volume.exp().to_f64_lossy(),
            repetitions = runs.len(),
            warnings = warnings.len(),
            "volume estimate"
        );
        Ok(VolumeEstimate {
            log_volume,
            runs,
            warnings,
            inner_ball: plan.inner,
            enclosing_radius: outer,
            rounding_log_det,
        })
    }

    /// `ball_ratio` quantile of the distance from `center` over `count`
    /// pilot samples of the body.
    fn pilot_radius<R: RngCore>(
        &self,
        pool: &ThreadPool,
        sampler: &RandomWalkSampler<'_, T>,
        center: &DVector<T>,
        count: usize,
        walk_length: usize,
        rng: &mut RandomSource<R>,
    ) -> Result<T, SamplingStall> {
        let mut workers = spawn_workers(rng, self.config.thread_count, center);
        let threads = workers.len();
        let distances: Vec<T> = pool
            .install(|| {
                workers
                    .par_iter_mut()
                    .enumerate()
                    .map(|(k, w)| {
                        w.distances(sampler, center, share(count, k, threads), walk_length)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })?
            .into_iter()
            .flatten()
            .collect();
        Ok(quantile(distances, self.config.ball_ratio).unwrap_or_else(T::zero))
    }

    fn repetition(
        &self,
        pool: &ThreadPool,
        plan: &Plan<'_, T>,
        workers: &mut [Worker<T>],
        warnings: &mut Vec<ConvergenceWarning>,
    ) -> Result<RunSummary<T>, EstimationError> {
        let cfg = &self.config;
        let center = &plan.inner.center;
        let threads = workers.len();
        let mut log_volume = plan.log_base;
        let mut phases = Vec::with_capacity(plan.schedule.phases());

        for index in (0..plan.schedule.phases()).rev() {
            let (r_in, r_out) = plan.schedule.phase(index);
            let outer = Ball::new(center.clone(), r_out);
            let inner = Ball::new(center.clone(), r_in);
            let mut count = plan.samples;
            let mut retries = 0;
            // Equal radii make every sample a hit, and that ratio is exact.
            let degenerate =
                |hits: usize, total: usize| hits == 0 || (hits == total && r_in < r_out);
            let hits = loop {
                let hits: usize = pool.install(|| {
                    workers
                        .par_iter_mut()
                        .enumerate()
                        .map(|(k, w)| {
                            w.run_phase(
                                &plan.sampler,
                                &outer,
                                &inner,
                                share(count, k, threads),
                                plan.walk_length,
                            )
                        })
                        .collect::<Result<Vec<_>, _>>()
                })?
                .into_iter()
                .sum();
                if !degenerate(hits, count) || retries >= cfg.max_phase_retries {
                    break hits;
                }
                retries += 1;
                count = count.saturating_mul(2);
            };

            let ratio = if degenerate(hits, count) {
                let w = if hits == 0 {
                    ConvergenceWarning::EmptyPhase {
                        phase: index,
                        samples: count,
                    }
                } else {
                    ConvergenceWarning::SaturatedPhase {
                        phase: index,
                        samples: count,
                    }
                };
                tracing::warn!("{w}");
                warnings.push(w);
                best_effort_ratio(hits, count)
            } else {
                T::of_count(hits) / T::of_count(count)
            };
            log_volume -= ratio.ln();
            progress!(
                cfg.flags.verbose,
                phase = index,
                radius = r_in.to_f64_lossy(),
                outer_radius = r_out.to_f64_lossy(),
                samples = count,
                hits,
                ratio = ratio.to_f64_lossy(),
                "phase done"
            );
            phases.push(PhaseReport {
                index,
                radius: r_in,
                outer_radius: r_out,
                samples: count,
                hits,
                ratio,
                retries,
            });
        }
        Ok(RunSummary { log_volume, phases })
    }
}

/// Estimate `vol(polytope)` with `config`, drawing all randomness from `rng`.
pub fn estimate_volume<T: Real, R: RngCore>(
    polytope: &HPolytope<T>,
    config: &RunConfig,
    rng: &mut RandomSource<R>,
) -> Result<VolumeEstimate<T>, EstimationError> {
    VolumeEstimator::new(polytope, config.clone())?.run(rng)
}
