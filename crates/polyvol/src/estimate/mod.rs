//! Volume estimation by a sequence of nested balls.
//!
//! Purpose
//! - Turn the inner ball, the walk, and a radius schedule into a volume
//!   with a statistical (not exact) accuracy contract.
//!
//! Why this design
//! - Consecutive balls differ in volume by the factor `ball_ratio`, so each
//!   phase ratio is bounded away from zero (P is star-shaped about the
//!   center) and a few thousand samples pin it down.
//! - Everything is accumulated in log-space; ratios and ball volumes span
//!   hundreds of orders of magnitude in high dimension.
//!
//! References
//! - Dyer–Frieze–Kannan (1991); Lovász–Vempala (2006);
//!   Emiris–Fisikopoulos, "Efficient random-walk methods for approximating
//!   polytope volume" (2014).

pub mod config;
mod engine;
mod report;
pub mod rounding;
mod schedule;

pub use config::{RunConfig, RunFlags};
pub use engine::{estimate_volume, VolumeEstimator};
pub use report::{PhaseReport, RunSummary, VolumeEstimate};
pub use schedule::BallSchedule;
