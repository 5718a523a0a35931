//! # kumquat
//!
//! Automatic numerical integration of real functions of one variable over
//! finite, half-infinite and infinite domains.
//!
//! This crate is a **façade** over the workspace crates. Application code
//! should depend on it rather than on the individual `kq-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! kumquat = "0.1"
//! ```
//!
//! ```rust
//! use kumquat::{integrate, Algorithm, IntegrationOptions};
//!
//! // ∫₀¹ 1/√x dx = 2, singular at the lower endpoint
//! let options = IntegrationOptions::default().with_singular_at_lower(true);
//! let r = integrate(|x: f64| 1.0 / x.sqrt(), 0.0, 1.0, &options).unwrap();
//! assert_eq!(r.algorithm, Algorithm::TanhSinh);
//! assert!((r.value - 2.0).abs() < 1e-8);
//!
//! // Reversed finite bounds are rejected before the integrand runs.
//! let err = integrate(|x: f64| x, 5.0, 2.0, &IntegrationOptions::default()).unwrap_err();
//! assert!(err.is_domain());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use kq_core as core;

/// Integrand adapter, algorithms, and dispatcher.
pub use kq_quadrature as quadrature;

pub use kq_core::{Error, Interval, Real, Result, ToleranceConfig};
pub use kq_quadrature::{
    integrate, Algorithm, EvaluationResult, Fallible, Integrand, IntegrationOptions, KronrodRule,
};
