//! Exp-Sinh quadrature over half-infinite domains.
//!
//! For `[a, +∞)` the substitution is $x = a + \exp(\frac\pi2 \sinh t)$; for
//! `(−∞, b]` it is mirrored, $x = b − \exp(\frac\pi2 \sinh t)$. The
//! exponential compresses the infinite tail while the finite end is
//! approached double exponentially, so mild endpoint singularities at the
//! finite bound are tolerated as well.

use std::f64::consts::{FRAC_2_PI, FRAC_PI_2};

use kq_core::{fail, Bound, Interval, Real, Result, ToleranceConfig};

use super::{
    double_exponential::{self, Substitution},
    require_support, Quadrature,
};
use crate::{Algorithm, EvaluationResult, IntegrandAdapter};

/// Exp-Sinh quadrature on `[a, +∞)` or `(−∞, b]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpSinh;

impl ExpSinh {
    /// Create a new integrator.
    pub fn new() -> Self {
        Self
    }
}

struct ExpSinhMap {
    endpoint: Real,
    /// +1 for `[a, ∞)`, −1 for `(−∞, b]`.
    direction: Real,
    t_min: Real,
    t_max: Real,
}

impl ExpSinhMap {
    fn new(endpoint: Real, direction: Real) -> Self {
        // exp(u) stays finite for u ≤ ln(MAX) and non-zero for u ≥ ln(MIN_POSITIVE).
        Self {
            endpoint,
            direction,
            t_min: (FRAC_2_PI * Real::MIN_POSITIVE.ln()).asinh(),
            t_max: (FRAC_2_PI * Real::MAX.ln()).asinh(),
        }
    }
}

impl Substitution for ExpSinhMap {
    fn t_range(&self) -> (Real, Real) {
        (self.t_min, self.t_max)
    }

    fn node(&self, t: Real) -> Option<(Real, Real)> {
        let e = (FRAC_PI_2 * t.sinh()).exp();
        let x = self.endpoint + self.direction * e;
        let w = FRAC_PI_2 * t.cosh() * e;
        if x == self.endpoint || !x.is_finite() || w <= 0.0 || !w.is_finite() {
            return None;
        }
        Some((x, w))
    }
}

impl Quadrature for ExpSinh {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ExpSinh
    }

    fn integrate(
        &self,
        adapter: &mut IntegrandAdapter<'_>,
        interval: &Interval,
        tolerance: &ToleranceConfig,
    ) -> Result<EvaluationResult> {
        require_support(self.algorithm(), interval)?;
        let map = match (interval.lower(), interval.upper()) {
            (Bound::Finite(a), Bound::PosInfinity) => ExpSinhMap::new(a, 1.0),
            (Bound::NegInfinity, Bound::Finite(b)) => ExpSinhMap::new(b, -1.0),
            _ => fail!("{interval} is not half-infinite"),
        };
        double_exponential::integrate(&map, self.algorithm(), adapter, tolerance)
    }
}
