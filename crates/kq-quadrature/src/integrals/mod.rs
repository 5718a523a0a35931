//! Numerical integration algorithms.
//!
//! Provides adaptive Gauss–Kronrod, the three double-exponential
//! substitutions (tanh-sinh, sinh-sinh, exp-sinh), and a step-halving
//! trapezoidal rule. All of them implement [`Quadrature`].

mod double_exponential;
pub mod exp_sinh;
pub mod gauss_kronrod;
mod kronrod_tables;
pub mod sinh_sinh;
pub mod tanh_sinh;
pub mod trapezoidal;

use kq_core::{fail, Interval, Result, ToleranceConfig};

use crate::{Algorithm, EvaluationResult, IntegrandAdapter};

pub use exp_sinh::ExpSinh;
pub use gauss_kronrod::{GaussKronrod, KronrodRule};
pub use sinh_sinh::SinhSinh;
pub use tanh_sinh::TanhSinh;
pub use trapezoidal::Trapezoidal;

/// A numerical integrator.
///
/// Implementations validate that `interval` has a shape they support before
/// evaluating anything, and propagate integrand failures unchanged.
pub trait Quadrature {
    /// Which algorithm this is.
    fn algorithm(&self) -> Algorithm;

    /// Integrate the adapted function over `interval`.
    ///
    /// Fails with a convergence error if the work budget in `tolerance` is
    /// exhausted before `error ≤ max(absolute, relative·|value|)`.
    fn integrate(
        &self,
        adapter: &mut IntegrandAdapter<'_>,
        interval: &Interval,
        tolerance: &ToleranceConfig,
    ) -> Result<EvaluationResult>;
}

/// Fail with a domain error unless `algorithm` can handle `interval`.
pub(crate) fn require_support(algorithm: Algorithm, interval: &Interval) -> Result<()> {
    if !algorithm.supports(interval.shape()) {
        fail!(
            "{algorithm} cannot integrate over a {} domain {interval}",
            interval.shape()
        );
    }
    Ok(())
}

/// Minimum number of refinement levels before a level-doubling rule may
/// declare convergence, capped by the configured budget.
pub(crate) const MIN_LEVELS: usize = 4;
