//! Composite trapezoidal rule with successive step halving.
//!
//! Each level doubles the panel count and only evaluates the new midpoints,
//! reusing the previous estimate. Smooth periodic integrands over a whole
//! period converge geometrically; everything else converges like h².

use kq_core::{fail, Error, Interval, Real, Result, ToleranceConfig};
use tracing::{debug, trace};

use super::{require_support, Quadrature, MIN_LEVELS};
use crate::{Algorithm, EvaluationResult, IntegrandAdapter};

/// Step-halving trapezoidal integrator on finite intervals.
///
/// Evaluates both endpoints, so the integrand must be finite there.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trapezoidal;

impl Trapezoidal {
    /// Create a new integrator.
    pub fn new() -> Self {
        Self
    }
}

impl Quadrature for Trapezoidal {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Trapezoidal
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
        let algorithm = self.algorithm();
        let max_levels = tolerance.max_iterations();
        let min_levels = MIN_LEVELS.min(max_levels);
        let width = b - a;

        let fa = adapter.evaluate(a)?;
        let fb = adapter.evaluate(b)?;
        let mut value = 0.5 * width * (fa + fb);
        let mut l1 = 0.5 * width * (fa.abs() + fb.abs());
        let mut error = Real::INFINITY;
        let mut panels: u64 = 1;

        for level in 1..=max_levels {
            let Some(doubled) = panels.checked_mul(2) else {
                break;
            };
            panels = doubled;
            let h = width / panels as Real;
            let mut sum = 0.0;
            let mut abs_sum = 0.0;
            for i in (1..panels).step_by(2) {
                let y = adapter.evaluate(a + i as Real * h)?;
                sum += y;
                abs_sum += y.abs();
            }
            let next = 0.5 * value + h * sum;
            l1 = 0.5 * l1 + h * abs_sum;
            error = (next - value).abs();
            value = next;
            trace!(%algorithm, level, panels, value, error, "refinement level");

            if level >= min_levels && tolerance.is_satisfied(error, value) {
                return Ok(EvaluationResult {
                    value,
                    error,
                    evaluations: adapter.evaluations(),
                    l1_norm: l1,
                    levels: level,
                    algorithm,
                });
            }
        }

        debug!(
            %algorithm,
            value,
            error,
            max_levels,
            evaluations = adapter.evaluations(),
            "refinement budget exhausted"
        );
        Err(Error::Convergence {
            estimate: value,
            error,
            evaluations: adapter.evaluations(),
        })
    }
}
