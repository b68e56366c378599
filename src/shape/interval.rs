//! Closed intervals of the real line, possibly extending to infinity.

use crate::math::{Real, Tolerance};
use crate::shape::ShapeError;

/// A closed interval `[lo, hi]` with `lo <= hi`; either endpoint may be
/// infinite.
///
/// Intervals parameterize convex subsets of lines: a [`crate::shape::LineSubset`]
/// is a line plus the interval of its 1D parameterization it covers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    lo: Real,
    hi: Real,
}

impl Interval {
    /// The interval covering the whole real line.
    pub fn full() -> Self {
        Self {
            lo: Real::NEG_INFINITY,
            hi: Real::INFINITY,
        }
    }

    /// Creates an interval from its bounds.
    ///
    /// Fails if either bound is NaN or if `lo > hi`.
    pub fn new(lo: Real, hi: Real) -> Result<Self, ShapeError> {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            Err(ShapeError::InvalidInterval(lo, hi))
        } else {
            Ok(Self { lo, hi })
        }
    }

    /// Builds an interval without validating; internal use where bounds
    /// are known ordered.
    pub(crate) fn new_unchecked(lo: Real, hi: Real) -> Self {
        debug_assert!(!(lo > hi));
        Self { lo, hi }
    }

    /// The lower bound.
    #[inline]
    pub fn lo(&self) -> Real {
        self.lo
    }

    /// The upper bound.
    #[inline]
    pub fn hi(&self) -> Real {
        self.hi
    }

    /// Returns `true` if both bounds are finite.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    /// The length of the interval; infinite for unbounded intervals.
    #[inline]
    pub fn size(&self) -> Real {
        self.hi - self.lo
    }

    /// Returns `true` if the interval has (within tolerance) zero length.
    pub fn is_degenerate(&self, tol: &Tolerance) -> bool {
        self.is_bounded() && tol.is_zero(self.size())
    }

    /// Returns `true` if `t` lies in the interval, within tolerance.
    pub fn contains(&self, t: Real, tol: &Tolerance) -> bool {
        tol.gte(t, self.lo) && tol.lte(t, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_validates_bounds() {
        assert!(Interval::new(1.0, 0.0).is_err());
        assert!(Interval::new(Real::NAN, 0.0).is_err());
        assert!(Interval::new(0.0, 0.0).is_ok());
        assert!(Interval::new(Real::NEG_INFINITY, 3.0).is_ok());
    }

    #[test]
    fn size_and_membership() {
        let tol = Tolerance::default();
        let i = Interval::new(-1.0, 2.0).unwrap();
        assert_eq!(i.size(), 3.0);
        assert!(i.is_bounded());
        assert!(i.contains(0.0, &tol));
        assert!(i.contains(2.0, &tol));
        assert!(!i.contains(2.1, &tol));

        let full = Interval::full();
        assert!(!full.is_bounded());
        assert_eq!(full.size(), Real::INFINITY);
        assert!(full.contains(1.0e12, &tol));
    }
}
