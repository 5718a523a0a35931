//! Algorithm selection and the top-level integration entry point.
//!
//! Every precondition (interval shape, singularity flags, tolerances,
//! algorithm/domain compatibility) is checked here before the integrand is
//! called for the first time, so a domain error never costs an evaluation.

use kq_core::tolerance::{
    default_relative_tolerance, DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_MAX_ITERATIONS,
};
use kq_core::{DomainShape, Interval, Real, Result, Size, ToleranceConfig};
use tracing::debug;

use crate::integrals::{
    require_support, ExpSinh, GaussKronrod, KronrodRule, Quadrature, SinhSinh, TanhSinh,
    Trapezoidal,
};
use crate::{Algorithm, EvaluationResult, Integrand, IntegrandAdapter};

// ── Options ───────────────────────────────────────────────────────────────────

/// Caller-facing options for [`integrate`].
///
/// Built from [`Default`] and refined with the `with_*` methods. Nothing is
/// validated until [`integrate`] runs.
///
/// ```
/// use kq_quadrature::{Algorithm, IntegrationOptions};
///
/// let options = IntegrationOptions::default()
///     .with_relative_tolerance(1e-10)
///     .with_algorithm(Algorithm::TanhSinh)
///     .with_singular_at_lower(true);
/// assert_eq!(options.algorithm(), Some(Algorithm::TanhSinh));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationOptions {
    absolute_tolerance: Real,
    relative_tolerance: Real,
    max_iterations: Size,
    algorithm: Option<Algorithm>,
    singular_at_lower: bool,
    singular_at_upper: bool,
    kronrod_rule: KronrodRule,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            relative_tolerance: default_relative_tolerance(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            algorithm: None,
            singular_at_lower: false,
            singular_at_upper: false,
            kronrod_rule: KronrodRule::default(),
        }
    }
}

impl IntegrationOptions {
    /// Set the absolute tolerance.
    pub fn with_absolute_tolerance(mut self, tolerance: Real) -> Self {
        self.absolute_tolerance = tolerance;
        self
    }

    /// Set the relative tolerance.
    pub fn with_relative_tolerance(mut self, tolerance: Real) -> Self {
        self.relative_tolerance = tolerance;
        self
    }

    /// Set the maximum refinement levels (or Gauss–Kronrod bisection depth).
    pub fn with_max_iterations(mut self, max_iterations: Size) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Force a specific algorithm instead of the automatic choice.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Select the algorithm by name; `"auto"` restores the automatic choice.
    ///
    /// Unknown names are a domain error.
    pub fn with_algorithm_name(mut self, name: &str) -> Result<Self> {
        self.algorithm = if name.trim().eq_ignore_ascii_case("auto") {
            None
        } else {
            Some(name.parse()?)
        };
        Ok(self)
    }

    /// Flag the lower endpoint as a suspected integrable singularity.
    pub fn with_singular_at_lower(mut self, singular: bool) -> Self {
        self.singular_at_lower = singular;
        self
    }

    /// Flag the upper endpoint as a suspected integrable singularity.
    pub fn with_singular_at_upper(mut self, singular: bool) -> Self {
        self.singular_at_upper = singular;
        self
    }

    /// Use `rule` for Gauss–Kronrod.
    pub fn with_kronrod_rule(mut self, rule: KronrodRule) -> Self {
        self.kronrod_rule = rule;
        self
    }

    /// Select the Gauss–Kronrod rule by its Kronrod point count
    /// (15, 21, 31, 41, 51 or 61).
    pub fn with_kronrod_points(mut self, points: Size) -> Result<Self> {
        self.kronrod_rule = KronrodRule::try_from(points)?;
        Ok(self)
    }

    /// Requested algorithm, or `None` for the automatic choice.
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    /// Gauss–Kronrod rule pair.
    pub fn kronrod_rule(&self) -> KronrodRule {
        self.kronrod_rule
    }

    /// Validate the tolerance fields.
    pub fn tolerance(&self) -> Result<ToleranceConfig> {
        ToleranceConfig::new(
            self.absolute_tolerance,
            self.relative_tolerance,
            self.max_iterations,
        )
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// The algorithm used when the caller does not pick one.
///
/// Finite intervals use Gauss–Kronrod unless an endpoint is flagged as
/// singular, in which case tanh-sinh is used. Infinite domains use
/// sinh-sinh, half-infinite domains exp-sinh.
pub fn select_algorithm(interval: &Interval) -> Algorithm {
    match interval.shape() {
        DomainShape::Finite if interval.has_singularity() => Algorithm::TanhSinh,
        DomainShape::Finite => Algorithm::GaussKronrod,
        DomainShape::Infinite => Algorithm::SinhSinh,
        DomainShape::UpperInfinite | DomainShape::LowerInfinite => Algorithm::ExpSinh,
    }
}

/// Integrate `integrand` from `lower` to `upper`.
///
/// Either bound may be `±∞`. Fails with a domain error, before any
/// evaluation, if the bounds, tolerances, singularity flags or requested
/// algorithm are invalid; with a convergence error if the work budget runs
/// out; and with an integrand error as soon as the integrand fails.
///
/// ```
/// use kq_quadrature::{integrate, IntegrationOptions};
///
/// let r = integrate(|x: f64| x * x, 0.0, 3.0, &IntegrationOptions::default()).unwrap();
/// assert!((r.value - 9.0).abs() < 1e-12);
///
/// let r = integrate(|x: f64| (-x).exp(), 0.0, f64::INFINITY, &IntegrationOptions::default())
///     .unwrap();
/// assert!((r.value - 1.0).abs() < 1e-8);
/// ```
pub fn integrate<I: Integrand>(
    mut integrand: I,
    lower: Real,
    upper: Real,
    options: &IntegrationOptions,
) -> Result<EvaluationResult> {
    let interval = Interval::new(lower, upper)?
        .with_singularities(options.singular_at_lower, options.singular_at_upper)?;
    let tolerance = options.tolerance()?;
    let algorithm = options
        .algorithm
        .unwrap_or_else(|| select_algorithm(&interval));
    integrate_interval(
        &mut integrand,
        &interval,
        &tolerance,
        algorithm,
        options.kronrod_rule,
    )
}

/// Integrate over an already validated `interval` with an explicit
/// algorithm.
pub fn integrate_interval(
    integrand: &mut dyn Integrand,
    interval: &Interval,
    tolerance: &ToleranceConfig,
    algorithm: Algorithm,
    kronrod_rule: KronrodRule,
) -> Result<EvaluationResult> {
    require_support(algorithm, interval)?;
    debug!(%algorithm, %interval, ?tolerance, "integrating");

    let quadrature: Box<dyn Quadrature> = match algorithm {
        Algorithm::GaussKronrod => Box::new(GaussKronrod::new(kronrod_rule)),
        Algorithm::TanhSinh => Box::new(TanhSinh::new()),
        Algorithm::SinhSinh => Box::new(SinhSinh::new()),
        Algorithm::ExpSinh => Box::new(ExpSinh::new()),
        Algorithm::Trapezoidal => Box::new(Trapezoidal::new()),
    };
    let mut adapter = IntegrandAdapter::new(integrand);
    let outcome = quadrature.integrate(&mut adapter, interval, tolerance);
    match &outcome {
        Ok(r) => debug!(
            %algorithm,
            value = r.value,
            error = r.error,
            evaluations = r.evaluations,
            "integration converged"
        ),
        Err(err) => debug!(
            %algorithm,
            evaluations = adapter.evaluations(),
            %err,
            "integration failed"
        ),
    }
    outcome
}
