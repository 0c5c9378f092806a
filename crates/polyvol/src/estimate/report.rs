//! Results of a volume run.

use crate::ball::InnerBall;
use crate::error::ConvergenceWarning;
use crate::scalar::Real;

/// One phase: the fraction of samples from `B(c, outer_radius) ∩ P` that
/// landed in `B(c, radius)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseReport<T: Real> {
    pub index: usize,
    pub radius: T,
    pub outer_radius: T,
    pub samples: usize,
    pub hits: usize,
    /// `hits / samples`, or the `1/(2N)` fallback when `hits == 0`.
    pub ratio: T,
    /// Sample-count doublings spent on this phase.
    pub retries: usize,
}

/// One independent repetition.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary<T: Real> {
    pub log_volume: T,
    pub phases: Vec<PhaseReport<T>>,
}

impl<T: Real> RunSummary<T> {
    pub fn total_samples(&self) -> usize {
        self.phases.iter().map(|p| p.samples).sum()
    }
}

/// Averaged estimate plus everything needed to audit it.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeEstimate<T: Real> {
    /// `ln` of the mean of the repetitions' volumes.
    pub log_volume: T,
    pub runs: Vec<RunSummary<T>>,
    pub warnings: Vec<ConvergenceWarning>,
    /// Inner ball of the body actually sampled (after rounding, if any).
    pub inner_ball: InnerBall<T>,
    pub enclosing_radius: T,
    /// `ln |det L|` added by rounding; zero without it.
    pub rounding_log_det: T,
}

impl<T: Real> VolumeEstimate<T> {
    pub fn volume(&self) -> T {
        self.log_volume.exp()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn phases(&self) -> usize {
        self.runs.first().map_or(0, |r| r.phases.len())
    }

    pub fn total_samples(&self) -> usize {
        self.runs.iter().map(RunSummary::total_samples).sum()
    }
}
