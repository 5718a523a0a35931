//! Names of the available quadrature algorithms.

use std::{fmt, str::FromStr};

use kq_core::{fail, DomainShape, Error};

/// A quadrature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Adaptive Gauss–Kronrod on a finite interval.
    GaussKronrod,
    /// Tanh-sinh on a finite interval, robust to endpoint singularities.
    TanhSinh,
    /// Sinh-sinh on `(−∞, +∞)`.
    SinhSinh,
    /// Exp-sinh on `[a, +∞)` or `(−∞, b]`.
    ExpSinh,
    /// Composite trapezoidal rule with step halving on a finite interval.
    Trapezoidal,
}

impl Algorithm {
    /// All algorithms, in a fixed order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::GaussKronrod,
        Algorithm::TanhSinh,
        Algorithm::SinhSinh,
        Algorithm::ExpSinh,
        Algorithm::Trapezoidal,
    ];

    /// Canonical option name, e.g. `"gauss-kronrod"`.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::GaussKronrod => "gauss-kronrod",
            Algorithm::TanhSinh => "tanh-sinh",
            Algorithm::SinhSinh => "sinh-sinh",
            Algorithm::ExpSinh => "exp-sinh",
            Algorithm::Trapezoidal => "trapezoidal",
        }
    }

    /// Whether the algorithm can integrate over a domain of this shape.
    pub fn supports(self, shape: DomainShape) -> bool {
        match self {
            Algorithm::GaussKronrod | Algorithm::TanhSinh | Algorithm::Trapezoidal => {
                shape == DomainShape::Finite
            }
            Algorithm::SinhSinh => shape == DomainShape::Infinite,
            Algorithm::ExpSinh => shape.is_semi_infinite(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match Algorithm::ALL.into_iter().find(|a| a.name() == normalized) {
            Some(algorithm) => Ok(algorithm),
            None => fail!("unknown algorithm '{s}'"),
        }
    }
}
