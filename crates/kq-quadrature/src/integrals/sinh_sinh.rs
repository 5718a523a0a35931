//! Sinh-Sinh quadrature over the whole real line.
//!
//! $x = \sinh(\frac\pi2 \sinh t)$ maps the real line onto itself with
//! double-exponential spreading toward both ends, so integrands that decay
//! at ±∞ turn into double-exponentially decaying integrands in t.

use std::f64::consts::{FRAC_2_PI, FRAC_PI_2};

use kq_core::{Interval, Real, Result, ToleranceConfig};

use super::{
    double_exponential::{self, Substitution},
    require_support, Quadrature,
};
use crate::{Algorithm, EvaluationResult, IntegrandAdapter};

/// Sinh-Sinh quadrature on `(−∞, +∞)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinhSinh;

impl SinhSinh {
    /// Create a new integrator.
    pub fn new() -> Self {
        Self
    }
}

struct SinhSinhMap {
    t_max: Real,
}

impl SinhSinhMap {
    fn new() -> Self {
        // sinh(u) and cosh(u) stay finite for u ≤ ln(MAX).
        Self {
            t_max: (FRAC_2_PI * Real::MAX.ln()).asinh(),
        }
    }
}

impl Substitution for SinhSinhMap {
    fn t_range(&self) -> (Real, Real) {
        (-self.t_max, self.t_max)
    }

    fn node(&self, t: Real) -> Option<(Real, Real)> {
        let u = FRAC_PI_2 * t.sinh();
        let x = u.sinh();
        let w = FRAC_PI_2 * t.cosh() * u.cosh();
        (x.is_finite() && w.is_finite()).then_some((x, w))
    }
}

impl Quadrature for SinhSinh {
    fn algorithm(&self) -> Algorithm {
        Algorithm::SinhSinh
    }

    fn integrate(
        &self,
        adapter: &mut IntegrandAdapter<'_>,
        interval: &Interval,
        tolerance: &ToleranceConfig,
    ) -> Result<EvaluationResult> {
        require_support(self.algorithm(), interval)?;
        double_exponential::integrate(&SinhSinhMap::new(), self.algorithm(), adapter, tolerance)
    }
}
