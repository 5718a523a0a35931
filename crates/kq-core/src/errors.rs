//! Error types for kumquat.
//!
//! Every failure of an integration run is one of three kinds: the request
//! itself was invalid ([`Error::Domain`]), the work budget ran out before the
//! tolerance was met ([`Error::Convergence`]), or the caller's integrand
//! failed ([`Error::Integrand`]). The `ensure!` and `fail!` macros defined
//! here produce domain errors for precondition checks.

use std::sync::Arc;

use thiserror::Error;

use crate::Real;

/// Boxed error type returned by fallible integrands.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The top-level error type used throughout kumquat.
#[derive(Debug, Error, Clone)]
pub enum Error {
    /// Invalid interval, tolerance, option, or algorithm/domain pairing.
    ///
    /// Always reported before the integrand is evaluated.
    #[error("domain error: {0}")]
    Domain(String),

    /// The iteration, level, or subdivision budget was exhausted without
    /// meeting the requested tolerance.
    #[error(
        "failed to converge: best estimate {estimate} with error {error} \
         after {evaluations} evaluations"
    )]
    Convergence {
        /// Best estimate of the integral reached before giving up.
        estimate: Real,
        /// Error estimate attached to `estimate`.
        error: Real,
        /// Number of integrand evaluations spent.
        evaluations: usize,
    },

    /// The caller's integrand failed while being evaluated.
    #[error("integrand failed at x = {abscissa}: {source}")]
    Integrand {
        /// Point at which the integrand was being evaluated.
        abscissa: Real,
        /// What went wrong inside the integrand.
        #[source]
        source: IntegrandFailure,
    },
}

impl Error {
    /// `true` for [`Error::Domain`].
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::Domain(_))
    }

    /// `true` for [`Error::Convergence`].
    pub fn is_convergence(&self) -> bool {
        matches!(self, Error::Convergence { .. })
    }

    /// `true` for [`Error::Integrand`].
    pub fn is_integrand(&self) -> bool {
        matches!(self, Error::Integrand { .. })
    }
}

/// The reason an integrand evaluation failed.
#[derive(Debug, Error, Clone)]
pub enum IntegrandFailure {
    /// The integrand returned an error of its own.
    #[error("integrand raised an error: {0}")]
    Raised(#[source] Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// The integrand panicked; holds the panic message.
    #[error("integrand panicked: {0}")]
    Panicked(String),

    /// The integrand returned NaN or an infinity.
    #[error("integrand returned non-finite value {0}")]
    NonFinite(Real),
}

impl From<BoxedError> for IntegrandFailure {
    fn from(err: BoxedError) -> Self {
        IntegrandFailure::Raised(Arc::from(err))
    }
}

/// Shorthand `Result` type used throughout kumquat.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Domain(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use kq_core::{ensure, errors::Error};
/// fn positive(x: f64) -> kq_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).unwrap_err().is_domain());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Domain(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Domain(...))` immediately.
///
/// # Example
/// ```
/// use kq_core::{fail, errors::Error};
/// fn always_err() -> kq_core::errors::Result<()> {
///     fail!("unsupported request");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Domain(format!($($msg)*)))
    };
}
