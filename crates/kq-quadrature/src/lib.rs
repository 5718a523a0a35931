//! # kq-quadrature
//!
//! Numerical integration of real functions of one variable: adaptive
//! Gauss–Kronrod, the double-exponential family (tanh-sinh, sinh-sinh,
//! exp-sinh) and a step-halving trapezoidal rule, behind a dispatcher that
//! picks an algorithm from the shape of the domain.
//!
//! ```
//! use kq_quadrature::{integrate, Algorithm, IntegrationOptions};
//!
//! // ∫₋∞^∞ exp(−x²) dx = √π
//! let r = integrate(|x: f64| (-x * x).exp(), f64::NEG_INFINITY, f64::INFINITY,
//!                   &IntegrationOptions::default()).unwrap();
//! assert_eq!(r.algorithm, Algorithm::SinhSinh);
//! assert!((r.value - std::f64::consts::PI.sqrt()).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Algorithm names and domain compatibility.
pub mod algorithm;

/// Option handling, algorithm selection and the integration entry point.
pub mod dispatcher;

/// The integrand abstraction and its adapter.
pub mod integrand;

/// Integration algorithms.
pub mod integrals;

/// Result of an integration run.
pub mod result;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use algorithm::Algorithm;
pub use dispatcher::{integrate, integrate_interval, select_algorithm, IntegrationOptions};
pub use integrals::{
    ExpSinh, GaussKronrod, KronrodRule, Quadrature, SinhSinh, TanhSinh, Trapezoidal,
};
pub use integrand::{Fallible, Integrand, IntegrandAdapter};
pub use result::EvaluationResult;
