//! The boundary between caller code and the quadrature engine.
//!
//! [`Integrand`] is the single capability the engine needs from a caller:
//! "evaluate at a real point, possibly failing". Plain closures
//! `FnMut(Real) -> Real` implement it directly; closures returning a
//! `Result` are wrapped in [`Fallible`].
//!
//! [`IntegrandAdapter`] is what the algorithms actually call. It invokes the
//! integrand exactly once per request, counts evaluations, and turns every
//! way the caller's code can fail (an `Err`, a panic, a NaN or infinite
//! return) into [`Error::Integrand`] so that an algorithm can unwind with
//! `?`.

use std::panic::{self, AssertUnwindSafe};

use kq_core::{BoxedError, Error, IntegrandFailure, Real, Result, Size};

/// A real function of one real variable that may fail.
pub trait Integrand {
    /// Evaluate the function at `x`.
    fn evaluate(&mut self, x: Real) -> std::result::Result<Real, BoxedError>;
}

impl<F> Integrand for F
where
    F: FnMut(Real) -> Real,
{
    fn evaluate(&mut self, x: Real) -> std::result::Result<Real, BoxedError> {
        Ok(self(x))
    }
}

/// Wraps a closure returning `Result<Real, E>` as an [`Integrand`].
///
/// ```
/// use kq_quadrature::{Fallible, Integrand};
///
/// let mut f = Fallible(|x: f64| {
///     if x < 0.0 {
///         Err("negative input")
///     } else {
///         Ok(x.sqrt())
///     }
/// });
/// assert_eq!(f.evaluate(4.0).unwrap(), 2.0);
/// assert!(f.evaluate(-1.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Fallible<F>(pub F);

impl<F, E> Integrand for Fallible<F>
where
    F: FnMut(Real) -> std::result::Result<Real, E>,
    E: Into<BoxedError>,
{
    fn evaluate(&mut self, x: Real) -> std::result::Result<Real, BoxedError> {
        (self.0)(x).map_err(Into::into)
    }
}

/// Uniform, repeatedly invocable view of a caller's integrand.
///
/// Borrows the integrand for the duration of a single integration run.
pub struct IntegrandAdapter<'a> {
    integrand: &'a mut dyn Integrand,
    evaluations: Size,
}

impl<'a> IntegrandAdapter<'a> {
    /// Wrap `integrand`.
    pub fn new(integrand: &'a mut dyn Integrand) -> Self {
        Self {
            integrand,
            evaluations: 0,
        }
    }

    /// Call the integrand once at `x`.
    ///
    /// Fails with [`Error::Integrand`] if the integrand returns an error,
    /// panics, or produces a non-finite value.
    pub fn evaluate(&mut self, x: Real) -> Result<Real> {
        self.evaluations += 1;
        let integrand = &mut *self.integrand;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| integrand.evaluate(x)));
        let failure = match outcome {
            Ok(Ok(y)) if y.is_finite() => return Ok(y),
            Ok(Ok(y)) => IntegrandFailure::NonFinite(y),
            Ok(Err(err)) => IntegrandFailure::from(err),
            Err(payload) => IntegrandFailure::Panicked(panic_message(payload.as_ref())),
        };
        Err(Error::Integrand {
            abscissa: x,
            source: failure,
        })
    }

    /// Number of integrand calls made so far.
    pub fn evaluations(&self) -> Size {
        self.evaluations
    }
}

impl std::fmt::Debug for IntegrandAdapter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrandAdapter")
            .field("evaluations", &self.evaluations)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
