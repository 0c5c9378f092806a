//! Run configuration for `estimate_volume`.
//!
//! Every knob has an independent default, so callers write
//! `RunConfig { thread_count: 4, ..RunConfig::default() }`. Counts that
//! depend on the dimension (`walk_length`, samples per phase) are `None` by
//! default and resolved through `walk_length_for` / `samples_for`.

use crate::error::ConfigError;
use crate::walk::{WalkKind, DEFAULT_MAX_RETRIES};

/// Boolean switches of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// Precondition the body by its sample covariance before estimating.
    pub use_rounding: bool,
    /// Log phase progress at `info` instead of `debug`.
    pub verbose: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Fixed sample count per phase; `None` uses the `n ln n / e²` rule.
    pub samples_per_phase: Option<usize>,
    /// Walk steps between consecutive samples; `None` means `10 + n/10`.
    pub walk_length: Option<usize>,
    pub thread_count: usize,
    /// Target relative error ε; `0` disables the derived sample floor.
    pub relative_error: f64,
    /// `e` in the sample-count rule (smaller is more samples).
    pub error_parameter: f64,
    /// `c` in the sample-count rule `c · n · ln n / e²`.
    pub sample_constant: f64,
    /// Volume ratio β between consecutive phase balls, in `(0, 1)`.
    pub ball_ratio: f64,
    pub walk: WalkKind,
    /// Independent estimates averaged into the result.
    pub repetitions: usize,
    pub max_direction_retries: usize,
    /// Doublings of the sample count tried on a phase with zero hits.
    pub max_phase_retries: usize,
    /// Rounding draws `rounding_samples · n` points.
    pub rounding_samples: usize,
    pub flags: RunFlags,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            samples_per_phase: None,
            walk_length: None,
            thread_count: 1,
            relative_error: 0.0,
            error_parameter: 1.0,
            sample_constant: 400.0,
            ball_ratio: 0.5,
            walk: WalkKind::default(),
            repetitions: 1,
            max_direction_retries: DEFAULT_MAX_RETRIES,
            max_phase_retries: 3,
            rounding_samples: 20,
            flags: RunFlags::default(),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn nonzero(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroCount { field })
    } else {
        Ok(())
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(s) = self.samples_per_phase {
            nonzero("samples_per_phase", s)?;
        }
        if let Some(w) = self.walk_length {
            nonzero("walk_length", w)?;
        }
        nonzero("thread_count", self.thread_count)?;
        nonzero("repetitions", self.repetitions)?;
        nonzero("max_direction_retries", self.max_direction_retries)?;
        positive("error_parameter", self.error_parameter)?;
        positive("sample_constant", self.sample_constant)?;
        if !(self.relative_error.is_finite() && self.relative_error >= 0.0) {
            return Err(ConfigError::NegativeRelativeError(self.relative_error));
        }
        if !(self.ball_ratio > 0.0 && self.ball_ratio < 1.0) {
            return Err(ConfigError::BallRatioOutOfRange(self.ball_ratio));
        }
        if self.flags.use_rounding {
            nonzero("rounding_samples", self.rounding_samples)?;
        }
        Ok(())
    }

    pub fn walk_length_for(&self, dim: usize) -> usize {
        self.walk_length.unwrap_or(10 + dim / 10)
    }

    /// Samples per phase before the relative-error floor.
    ///
    /// `ln n` is taken at `max(n, 2)` so one-dimensional bodies still sample.
    pub fn base_samples_for(&self, dim: usize) -> usize {
        if let Some(s) = self.samples_per_phase {
            return s;
        }
        let n = dim.max(2) as f64;
        let e = self.error_parameter;
        ((self.sample_constant * n * n.ln() / (e * e)).ceil() as usize).max(1)
    }

    /// Samples per phase for a run with `phases` phases.
    ///
    /// With `relative_error = ε > 0` the count is raised to
    /// `ceil(k (1 - β) / (β ε²))`: each phase ratio `p >= β` has relative
    /// variance at most `(1 - β) / (β N)`, and `k` phases add up.
    pub fn samples_for(&self, dim: usize, phases: usize) -> usize {
        let base = self.base_samples_for(dim);
        if self.relative_error <= 0.0 {
            return base;
        }
        let beta = self.ball_ratio;
        let eps = self.relative_error;
        let floor = (phases.max(1) as f64 * (1.0 - beta) / (beta * eps * eps)).ceil() as usize;
        base.max(floor)
    }
}
