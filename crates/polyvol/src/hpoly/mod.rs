//! n-D convex polytopes in H-representation.
//!
//! Purpose
//! - The immutable body every other stage reads: membership, ray/chord
//!   queries for the walks, and affine pull-backs for rounding.
//!
//! Assumptions and conventions
//! - Half-spaces use `a·x <= b`; neither `a` nor `b` is normalized. Row norms
//!   are cached because the inscribed-ball LP needs them.
//! - `.ine` rows are `b  -a_1 … -a_n` (constant term, then negated normal).
//! - Equality tests use tolerances from `crate::cfg`, lifted per scalar type.
//!
//! Code cross-refs: `crate::ball` (Chebyshev LP), `crate::walk` (chords).

pub mod families;
mod types;

pub use types::{HPolytope, Halfspace};

#[cfg(test)]
mod tests;
