//! Outcome of a successful integration run.

use kq_core::{Real, Size};

use crate::Algorithm;

/// Estimate of a definite integral together with its error bound.
///
/// Produced once per successful run and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    /// Estimated value of the integral.
    pub value: Real,
    /// Estimated absolute error of `value`.
    pub error: Real,
    /// Number of integrand evaluations performed.
    pub evaluations: Size,
    /// Estimate of ∫|f|, useful for judging cancellation in `value`.
    pub l1_norm: Real,
    /// Refinement levels used (double-exponential and trapezoidal rules)
    /// or accepted sub-intervals (Gauss–Kronrod).
    pub levels: Size,
    /// Algorithm that produced the estimate.
    pub algorithm: Algorithm,
}

impl EvaluationResult {
    /// Condition number of the summation, `l1_norm / |value|`.
    ///
    /// Large values mean heavy cancellation; infinite when `value` is 0.
    pub fn condition_number(&self) -> Real {
        self.l1_norm / self.value.abs()
    }
}
