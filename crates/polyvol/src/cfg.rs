//! Tolerance defaults (internal).
//!
//! Policy
//! - Fixed `f64` constants, lifted per scalar type through `Real::tolerance`.
//!   Run-level knobs belong in `estimate::RunConfig`, not here.

/// Membership slack used by `HPolytope::contains` and ball membership.
pub(crate) const FEAS_EPS: f64 = 1e-9;
/// `|a_i · d|` below this counts as parallel to constraint `i`.
pub(crate) const PARALLEL_EPS: f64 = 1e-12;
/// Chords shorter than this are treated as degenerate and redrawn.
pub(crate) const CHORD_EPS: f64 = 1e-12;
/// Pivot/reduced-cost threshold for the dense simplex.
pub(crate) const PIVOT_EPS: f64 = 1e-10;
/// Inscribed radii at or below this mean the body has empty interior.
pub(crate) const RADIUS_EPS: f64 = 1e-9;
/// Walk steps between exact recomputations of the cached `A·x`.
pub(crate) const RESYNC_STEPS: usize = 512;
