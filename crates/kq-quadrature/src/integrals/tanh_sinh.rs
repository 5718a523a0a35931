//! Tanh-Sinh quadrature on finite intervals `[a, b]`.
//!
//! With u = π/2 · sinh t, the node at t sits at a distance h·c from the
//! nearer endpoint, where h = (b − a)/2 and c = 1 − tanh|u| = 2/(1 + e^{2|u|})
//! is computed directly rather than as a difference. Its weight is
//! h · π/2 · cosh t · c(2 − c), the same complement rewriting sech²u. Nodes
//! therefore approach a and b as closely as floating point allows without
//! ever rounding onto them, and neither endpoint is evaluated.

use std::f64::consts::{FRAC_2_PI, FRAC_PI_2};

use kq_core::{fail, Interval, Real, Result, ToleranceConfig};

use super::{
    double_exponential::{self, Substitution},
    require_support, Quadrature,
};
use crate::{Algorithm, EvaluationResult, IntegrandAdapter};

/// Tanh-Sinh quadrature.
#[derive(Debug, Clone, Copy, Default)]
pub struct TanhSinh;

impl TanhSinh {
    /// Create a new integrator.
    pub fn new() -> Self {
        Self
    }
}

struct TanhSinhMap {
    a: Real,
    b: Real,
    half: Real,
    t_max: Real,
}

impl TanhSinhMap {
    fn new(a: Real, b: Real) -> Self {
        // Beyond t_max the complement 2/(1+e^{2u}) underflows.
        let u_max = 0.5 * (2.0 / Real::MIN_POSITIVE).ln();
        Self {
            a,
            b,
            half: 0.5 * (b - a),
            t_max: (FRAC_2_PI * u_max).asinh(),
        }
    }
}

impl Substitution for TanhSinhMap {
    fn t_range(&self) -> (Real, Real) {
        (-self.t_max, self.t_max)
    }

    fn node(&self, t: Real) -> Option<(Real, Real)> {
        let u = FRAC_PI_2 * t.sinh();
        // complement = 1 − tanh|u|, in (0, 1]
        let complement = 2.0 / (1.0 + (2.0 * u.abs()).exp());
        let offset = self.half * complement;
        let x = if t < 0.0 {
            self.a + offset
        } else {
            self.b - offset
        };
        // sech²(u) = 1 − tanh²(u) = c (2 − c)
        let w = self.half * FRAC_PI_2 * t.cosh() * complement * (2.0 - complement);
        if x <= self.a || x >= self.b || w <= 0.0 || !w.is_finite() {
            return None;
        }
        Some((x, w))
    }
}

impl Quadrature for TanhSinh {
    fn algorithm(&self) -> Algorithm {
        Algorithm::TanhSinh
    }

    fn integrate(
        &self,
        adapter: &mut IntegrandAdapter<'_>,
        interval: &Interval,
        tolerance: &ToleranceConfig,
    ) -> Result<EvaluationResult> {
        require_support(self.algorithm(), interval)?;
        let Some((a, b)) = interval.finite_bounds() else {
            fail!("{interval} is not finite");
        };
        let map = TanhSinhMap::new(a, b);
        double_exponential::integrate(&map, self.algorithm(), adapter, tolerance)
    }
}
