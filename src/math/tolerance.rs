use core::cmp::Ordering;

use crate::math::{Real, DEFAULT_EPSILON};

/// Error returned when constructing a [`Tolerance`] from an invalid epsilon.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
#[error("the tolerance epsilon must be finite and non-negative (got {0})")]
pub struct InvalidToleranceError(pub Real);

/// Equivalence context for fuzzy floating-point comparisons.
///
/// Every geometric predicate in the library (point equality, hyperplane side
/// classification, cut validity) goes through a `Tolerance` supplied by the
/// caller at tree or shape construction; nothing in the engine hardcodes an
/// epsilon. Two values are considered equal when their absolute difference
/// does not exceed the configured epsilon.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerance {
    eps: Real,
}

impl Tolerance {
    /// Creates a tolerance from the given epsilon.
    ///
    /// The epsilon must be finite and non-negative.
    pub fn new(eps: Real) -> Result<Self, InvalidToleranceError> {
        if eps.is_finite() && eps >= 0.0 {
            Ok(Self { eps })
        } else {
            Err(InvalidToleranceError(eps))
        }
    }

    /// The epsilon backing this tolerance.
    #[inline]
    pub fn epsilon(&self) -> Real {
        self.eps
    }

    /// Returns `true` if `a` and `b` are equal within the tolerance.
    #[inline]
    pub fn eq(&self, a: Real, b: Real) -> bool {
        approx::abs_diff_eq!(a, b, epsilon = self.eps)
    }

    /// Returns `true` if `a` is zero within the tolerance.
    #[inline]
    pub fn is_zero(&self, a: Real) -> bool {
        self.eq(a, 0.0)
    }

    /// Compares `a` against zero, treating values within the tolerance of
    /// zero as equal to it.
    #[inline]
    pub fn sign(&self, a: Real) -> Ordering {
        self.cmp(a, 0.0)
    }

    /// Fuzzy three-way comparison of `a` and `b`.
    #[inline]
    pub fn cmp(&self, a: Real, b: Real) -> Ordering {
        if self.eq(a, b) {
            Ordering::Equal
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// Returns `true` if `a` is strictly less than `b` beyond the tolerance.
    #[inline]
    pub fn lt(&self, a: Real, b: Real) -> bool {
        self.cmp(a, b) == Ordering::Less
    }

    /// Returns `true` if `a` is strictly greater than `b` beyond the tolerance.
    #[inline]
    pub fn gt(&self, a: Real, b: Real) -> bool {
        self.cmp(a, b) == Ordering::Greater
    }

    /// Returns `true` if `a` is less than or fuzzily equal to `b`.
    #[inline]
    pub fn lte(&self, a: Real, b: Real) -> bool {
        self.cmp(a, b) != Ordering::Greater
    }

    /// Returns `true` if `a` is greater than or fuzzily equal to `b`.
    #[inline]
    pub fn gte(&self, a: Real, b: Real) -> bool {
        self.cmp(a, b) != Ordering::Less
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_respect_epsilon() {
        let tol = Tolerance::new(1.0e-3).unwrap();

        assert!(tol.eq(1.0, 1.0 + 5.0e-4));
        assert!(!tol.eq(1.0, 1.002));
        assert!(tol.is_zero(-9.0e-4));
        assert_eq!(tol.sign(2.0e-3), Ordering::Greater);
        assert_eq!(tol.sign(-2.0e-3), Ordering::Less);
        assert_eq!(tol.sign(4.0e-4), Ordering::Equal);
        assert!(tol.lt(1.0, 1.1));
        assert!(!tol.lt(1.0, 1.0005));
        assert!(tol.gte(1.0005, 1.0));
        assert!(tol.lte(1.0005, 1.0));
    }

    #[test]
    fn invalid_epsilons_are_rejected() {
        assert!(Tolerance::new(-1.0e-6).is_err());
        assert!(Tolerance::new(Real::NAN).is_err());
        assert!(Tolerance::new(Real::INFINITY).is_err());
        assert!(Tolerance::new(0.0).is_ok());
    }
}
