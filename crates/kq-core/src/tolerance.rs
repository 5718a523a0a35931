//! Accuracy targets and work budgets for an integration run.

use crate::{ensure, errors::Result, Real, Size};

/// Default absolute tolerance.
pub const DEFAULT_ABSOLUTE_TOLERANCE: Real = 1.0e-12;

/// Default maximum number of refinement levels / subdivision depth.
pub const DEFAULT_MAX_ITERATIONS: Size = 15;

/// Default relative tolerance, `sqrt(f64::EPSILON)`.
pub fn default_relative_tolerance() -> Real {
    Real::EPSILON.sqrt()
}

/// Combined absolute/relative accuracy target plus the maximum work
/// allowed to reach it.
///
/// Immutable once built; algorithms only read it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceConfig {
    absolute: Real,
    relative: Real,
    max_iterations: Size,
}

impl ToleranceConfig {
    /// Create a new configuration.
    ///
    /// Both tolerances must be finite and non-negative with at least one
    /// strictly positive, and `max_iterations` must be at least 1.
    pub fn new(absolute: Real, relative: Real, max_iterations: Size) -> Result<Self> {
        ensure!(
            absolute.is_finite() && absolute >= 0.0,
            "absolute tolerance must be finite and non-negative, got {absolute}"
        );
        ensure!(
            relative.is_finite() && relative >= 0.0,
            "relative tolerance must be finite and non-negative, got {relative}"
        );
        ensure!(
            absolute > 0.0 || relative > 0.0,
            "at least one of the absolute and relative tolerances must be positive"
        );
        ensure!(
            max_iterations >= 1,
            "max iterations must be at least 1, got {max_iterations}"
        );
        Ok(Self {
            absolute,
            relative,
            max_iterations,
        })
    }

    /// Absolute tolerance.
    pub fn absolute(&self) -> Real {
        self.absolute
    }

    /// Relative tolerance.
    pub fn relative(&self) -> Real {
        self.relative
    }

    /// Maximum refinement levels (or subdivision depth).
    pub fn max_iterations(&self) -> Size {
        self.max_iterations
    }

    /// Error allowed for an integral whose estimate is `estimate`:
    /// `max(absolute, relative·|estimate|)`.
    #[inline]
    pub fn target(&self, estimate: Real) -> Real {
        self.absolute.max(self.relative * estimate.abs())
    }

    /// Return `true` if `error` meets the target for `estimate`.
    #[inline]
    pub fn is_satisfied(&self, error: Real, estimate: Real) -> bool {
        error <= self.target(estimate)
    }
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            absolute: DEFAULT_ABSOLUTE_TOLERANCE,
            relative: default_relative_tolerance(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}
