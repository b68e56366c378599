//! Line segments in three-dimensional space.

use crate::math::{Point3, Real, Tolerance};
use crate::shape::ShapeError;

/// A directed segment between two points in space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment3 {
    /// The segment's first point.
    pub a: Point3<Real>,
    /// The segment's second point.
    pub b: Point3<Real>,
}

impl Segment3 {
    /// Creates a segment from two distinct endpoints.
    pub fn new(a: Point3<Real>, b: Point3<Real>) -> Result<Self, ShapeError> {
        if a == b {
            return Err(ShapeError::CoincidentPoints);
        }
        Ok(Self { a, b })
    }

    /// The unnormalized direction `b - a`.
    #[inline]
    pub fn scaled_direction(&self) -> na::Vector3<Real> {
        self.b - self.a
    }

    /// The segment length.
    #[inline]
    pub fn length(&self) -> Real {
        self.scaled_direction().norm()
    }

    /// Returns `true` when the endpoints coincide within tolerance.
    #[inline]
    pub fn is_point_like(&self, tol: &Tolerance) -> bool {
        tol.is_zero(self.length())
    }
}
