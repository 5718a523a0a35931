//! Integration domains.
//!
//! An [`Interval`] is a validated pair of [`Bound`]s plus optional flags
//! marking a finite endpoint as a suspected integrable singularity. The
//! infinite sentinels `f64::INFINITY` / `f64::NEG_INFINITY` select the
//! unbounded variants.

use std::fmt;

use crate::{ensure, errors::Result, Real};

/// One end of an integration domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// A finite endpoint.
    Finite(Real),
    /// −∞.
    NegInfinity,
    /// +∞.
    PosInfinity,
}

impl Bound {
    /// Classify a real number, mapping the infinities to their variants.
    ///
    /// NaN is rejected.
    pub fn from_real(x: Real) -> Result<Self> {
        ensure!(!x.is_nan(), "integration bound must not be NaN");
        Ok(if x == Real::INFINITY {
            Bound::PosInfinity
        } else if x == Real::NEG_INFINITY {
            Bound::NegInfinity
        } else {
            Bound::Finite(x)
        })
    }

    /// The bound as a real number (±∞ for the unbounded variants).
    pub fn value(&self) -> Real {
        match *self {
            Bound::Finite(x) => x,
            Bound::NegInfinity => Real::NEG_INFINITY,
            Bound::PosInfinity => Real::INFINITY,
        }
    }

    /// `true` if the bound is finite.
    pub fn is_finite(&self) -> bool {
        matches!(self, Bound::Finite(_))
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Finite(x) => write!(f, "{x}"),
            Bound::NegInfinity => f.write_str("-inf"),
            Bound::PosInfinity => f.write_str("+inf"),
        }
    }
}

/// Shape of an integration domain, used for algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainShape {
    /// `[a, b]` with both ends finite.
    Finite,
    /// `[a, +∞)`.
    UpperInfinite,
    /// `(−∞, b]`.
    LowerInfinite,
    /// `(−∞, +∞)`.
    Infinite,
}

impl DomainShape {
    /// `true` when exactly one bound is infinite.
    pub fn is_semi_infinite(self) -> bool {
        matches!(self, DomainShape::UpperInfinite | DomainShape::LowerInfinite)
    }
}

impl fmt::Display for DomainShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DomainShape::Finite => "finite",
            DomainShape::UpperInfinite => "[a, +inf)",
            DomainShape::LowerInfinite => "(-inf, b]",
            DomainShape::Infinite => "(-inf, +inf)",
        })
    }
}

/// A validated integration domain.
///
/// Invariants: a finite interval has `lower < upper`, the lower bound is
/// never +∞ and the upper bound never −∞, and singularity flags are only
/// set on finite endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lower: Bound,
    upper: Bound,
    singular_lower: bool,
    singular_upper: bool,
}

impl Interval {
    /// Build an interval from two reals; ±∞ select unbounded ends.
    pub fn new(lower: Real, upper: Real) -> Result<Self> {
        let lo = Bound::from_real(lower)?;
        let hi = Bound::from_real(upper)?;
        ensure!(
            lo != Bound::PosInfinity,
            "lower bound cannot be +inf"
        );
        ensure!(
            hi != Bound::NegInfinity,
            "upper bound cannot be -inf"
        );
        if let (Bound::Finite(a), Bound::Finite(b)) = (lo, hi) {
            ensure!(
                a < b,
                "lower bound ({a}) must be strictly less than upper bound ({b})"
            );
        }
        Ok(Self {
            lower: lo,
            upper: hi,
            singular_lower: false,
            singular_upper: false,
        })
    }

    /// Flag endpoints as suspected integrable singularities.
    ///
    /// Flagging an infinite endpoint is a domain error.
    pub fn with_singularities(mut self, lower: bool, upper: bool) -> Result<Self> {
        ensure!(
            !lower || self.lower.is_finite(),
            "singularity flag set on infinite lower bound"
        );
        ensure!(
            !upper || self.upper.is_finite(),
            "singularity flag set on infinite upper bound"
        );
        self.singular_lower = lower;
        self.singular_upper = upper;
        Ok(self)
    }

    /// The lower bound.
    pub fn lower(&self) -> Bound {
        self.lower
    }

    /// The upper bound.
    pub fn upper(&self) -> Bound {
        self.upper
    }

    /// Classify the domain.
    pub fn shape(&self) -> DomainShape {
        match (self.lower, self.upper) {
            (Bound::Finite(_), Bound::Finite(_)) => DomainShape::Finite,
            (Bound::Finite(_), _) => DomainShape::UpperInfinite,
            (_, Bound::Finite(_)) => DomainShape::LowerInfinite,
            _ => DomainShape::Infinite,
        }
    }

    /// Both bounds, when the interval is finite.
    pub fn finite_bounds(&self) -> Option<(Real, Real)> {
        match (self.lower, self.upper) {
            (Bound::Finite(a), Bound::Finite(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// Whether the lower endpoint is flagged singular.
    pub fn singular_at_lower(&self) -> bool {
        self.singular_lower
    }

    /// Whether the upper endpoint is flagged singular.
    pub fn singular_at_upper(&self) -> bool {
        self.singular_upper
    }

    /// Whether either endpoint is flagged singular.
    pub fn has_singularity(&self) -> bool {
        self.singular_lower || self.singular_upper
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_interval() {
        let i = Interval::new(0.0, 1.0).unwrap();
        assert_eq!(i.shape(), DomainShape::Finite);
        assert_eq!(i.finite_bounds(), Some((0.0, 1.0)));
        assert!(!i.has_singularity());
    }

    #[test]
    fn reversed_or_empty_interval_rejected() {
        assert!(Interval::new(5.0, 2.0).unwrap_err().is_domain());
        assert!(Interval::new(1.0, 1.0).unwrap_err().is_domain());
    }

    #[test]
    fn nan_bound_rejected() {
        assert!(Interval::new(Real::NAN, 1.0).is_err());
        assert!(Interval::new(0.0, Real::NAN).is_err());
    }

    #[test]
    fn infinite_shapes() {
        let up = Interval::new(0.0, Real::INFINITY).unwrap();
        assert_eq!(up.shape(), DomainShape::UpperInfinite);
        assert!(up.shape().is_semi_infinite());
        let down = Interval::new(Real::NEG_INFINITY, 3.0).unwrap();
        assert_eq!(down.shape(), DomainShape::LowerInfinite);
        let all = Interval::new(Real::NEG_INFINITY, Real::INFINITY).unwrap();
        assert_eq!(all.shape(), DomainShape::Infinite);
        assert_eq!(all.finite_bounds(), None);
    }

    #[test]
    fn misoriented_infinities_rejected() {
        assert!(Interval::new(Real::INFINITY, Real::INFINITY).is_err());
        assert!(Interval::new(Real::NEG_INFINITY, Real::NEG_INFINITY).is_err());
        assert!(Interval::new(Real::INFINITY, 0.0).is_err());
    }

    #[test]
    fn singularity_flags_only_on_finite_ends() {
        let i = Interval::new(0.0, 1.0)
            .unwrap()
            .with_singularities(true, false)
            .unwrap();
        assert!(i.singular_at_lower());
        assert!(!i.singular_at_upper());

        let semi = Interval::new(0.0, Real::INFINITY).unwrap();
        assert!(semi.with_singularities(true, false).is_ok());
        assert!(semi.with_singularities(false, true).unwrap_err().is_domain());
    }

    #[test]
    fn display() {
        let i = Interval::new(Real::NEG_INFINITY, 2.5).unwrap();
        assert_eq!(i.to_string(), "[-inf, 2.5]");
    }
}
