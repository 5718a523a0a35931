//! Level-doubling driver shared by the double-exponential rules.
//!
//! After a change of variable x = φ(t) the integral becomes
//! ∫ f(φ(t)) φ'(t) dt over the real line, whose integrand decays double
//! exponentially, so the plain trapezoidal rule in t converges very fast.
//! Level 0 samples every integer t; each further level halves the step and
//! only evaluates the new odd multiples, reusing the previous sum:
//!
//! I_k = I_{k−1}/2 + h_k · Σ_new w(t) f(φ(t))
//!
//! The difference between consecutive levels is the error estimate.
//!
//! Far out in the tails the abscissae reach magnitudes where an ordinary
//! decaying integrand can no longer be evaluated in floating point (x²
//! overflows while exp(−x) underflows, giving NaN). A non-finite sample
//! lying outside every finite sample seen so far truncates the t-line at
//! that point and contributes nothing. A non-finite sample between two
//! finite ones is an integrand error.

use kq_core::{Error, IntegrandFailure, Real, Result, ToleranceConfig};
use tracing::{debug, trace};

use super::MIN_LEVELS;
use crate::{Algorithm, EvaluationResult, IntegrandAdapter};

/// A change of variable from the real t-line onto an integration domain.
pub(crate) trait Substitution {
    /// The t-range outside of which every node has zero weight.
    fn t_range(&self) -> (Real, Real);

    /// Abscissa and weight (including the Jacobian and any interval
    /// scaling) at `t`.
    ///
    /// `None` when the node is unrepresentable: its weight underflows or
    /// overflows, or its abscissa rounds onto a finite endpoint.
    fn node(&self, t: Real) -> Option<(Real, Real)>;
}

/// The open part of the t-line still sampled, and the span of t values
/// whose samples came back finite.
#[derive(Debug)]
struct Window {
    lo: Real,
    hi: Real,
    finite: Option<(Real, Real)>,
}

impl Window {
    fn new() -> Self {
        Self {
            lo: Real::NEG_INFINITY,
            hi: Real::INFINITY,
            finite: None,
        }
    }

    fn admits(&self, t: Real) -> bool {
        self.lo < t && t < self.hi
    }

    fn is_interior(&self, t: Real) -> bool {
        self.finite.is_some_and(|(lo, hi)| lo < t && t < hi)
    }

    /// Fold one sweep into the window. `span` covers the finite samples of
    /// the sweep and `tail` holds its non-finite ones in increasing t.
    fn settle(&mut self, span: Option<(Real, Real)>, tail: Vec<(Real, Error)>) -> Result<()> {
        self.finite = match (self.finite, span) {
            (Some((lo, hi)), Some((s_lo, s_hi))) => Some((lo.min(s_lo), hi.max(s_hi))),
            (known, None) => known,
            (None, fresh) => fresh,
        };
        let Some((finite_lo, finite_hi)) = self.finite else {
            // Nothing finite anywhere: the integrand is unusable.
            return match tail.into_iter().next() {
                Some((_, err)) => Err(err),
                None => Ok(()),
            };
        };
        for (t, err) in tail {
            if t < finite_lo {
                self.lo = self.lo.max(t);
            } else if t > finite_hi {
                self.hi = self.hi.min(t);
            } else {
                return Err(err);
            }
            trace!(t, lo = self.lo, hi = self.hi, "tail truncated at non-finite sample");
        }
        Ok(())
    }
}

/// Weighted sum and weighted L1 sum over one set of nodes.
struct Sweep {
    sum: Real,
    l1: Real,
}

fn sweep<S: Substitution>(
    map: &S,
    adapter: &mut IntegrandAdapter<'_>,
    window: &mut Window,
    h: Real,
    odd_only: bool,
) -> Result<Sweep> {
    let (t_min, t_max) = map.t_range();
    let mut k = (t_min / h).ceil() as i64;
    let k_max = (t_max / h).floor() as i64;
    if odd_only && k.rem_euclid(2) == 0 {
        k += 1;
    }
    let stride = if odd_only { 2 } else { 1 };

    let mut sum = 0.0;
    let mut l1 = 0.0;
    let mut span: Option<(Real, Real)> = None;
    let mut tail = Vec::new();
    while k <= k_max {
        let t = k as Real * h;
        k += stride;
        if !window.admits(t) {
            continue;
        }
        let Some((x, w)) = map.node(t) else {
            continue;
        };
        let y = match adapter.evaluate(x) {
            Ok(y) => y,
            Err(
                err @ Error::Integrand {
                    source: IntegrandFailure::NonFinite(_),
                    ..
                },
            ) => {
                if window.is_interior(t) {
                    return Err(err);
                }
                tail.push((t, err));
                continue;
            }
            Err(err) => return Err(err),
        };
        span = Some(span.map_or((t, t), |(lo, _)| (lo, t)));
        let term = w * y;
        // Finite f times an extreme weight can still overflow.
        if term.is_finite() {
            sum += term;
            l1 += term.abs();
        }
    }
    window.settle(span, tail)?;
    Ok(Sweep { sum, l1 })
}

/// Run the level-doubling refinement for `map` until `tolerance` is met or
/// `tolerance.max_iterations()` levels have been added.
pub(crate) fn integrate<S: Substitution>(
    map: &S,
    algorithm: Algorithm,
    adapter: &mut IntegrandAdapter<'_>,
    tolerance: &ToleranceConfig,
) -> Result<EvaluationResult> {
    let max_levels = tolerance.max_iterations();
    let min_levels = MIN_LEVELS.min(max_levels);

    let mut window = Window::new();
    let mut h = 1.0;
    let first = sweep(map, adapter, &mut window, h, false)?;
    let mut value = h * first.sum;
    let mut l1 = h * first.l1;
    let mut error = Real::INFINITY;

    for level in 1..=max_levels {
        h *= 0.5;
        let fresh = sweep(map, adapter, &mut window, h, true)?;
        let next = 0.5 * value + h * fresh.sum;
        l1 = 0.5 * l1 + h * fresh.l1;
        error = (next - value).abs();
        value = next;
        trace!(%algorithm, level, value, error, "refinement level");

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
