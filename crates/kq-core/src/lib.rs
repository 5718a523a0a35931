//! # kq-core
//!
//! Core types, traits, and error definitions for kumquat.
//!
//! This crate provides the building blocks shared by the quadrature engine:
//! numeric type aliases, the error taxonomy, validated integration domains,
//! and tolerance configuration.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

/// Integration domains: bounds, shapes, and singularity flags.
pub mod interval;

/// Tolerance and work-budget configuration.
pub mod tolerance;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for counts, sizes, and indices.
pub type Size = usize;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{BoxedError, Error, IntegrandFailure, Result};
pub use interval::{Bound, DomainShape, Interval};
pub use tolerance::ToleranceConfig;
