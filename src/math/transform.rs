//! Affine transforms with an explicit non-invertible error.

use na::{Matrix3, Matrix4};

use crate::math::{Point2, Point3, Real, Vector2, Vector3};

/// Error returned when inverting a singular affine transform.
///
/// This is deliberately a dedicated type so that callers can distinguish a
/// singular matrix from other invalid-argument conditions.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
#[error("the affine transform is singular and cannot be inverted")]
pub struct NonInvertibleTransformError;

/// An affine transform of the Euclidean plane, stored as a homogeneous
/// 3×3 matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform2 {
    matrix: Matrix3<Real>,
}

/// An affine transform of Euclidean 3-space, stored as a homogeneous
/// 4×4 matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform3 {
    matrix: Matrix4<Real>,
}

impl Transform2 {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Builds a transform from a homogeneous matrix.
    pub fn from_matrix(matrix: Matrix3<Real>) -> Self {
        Self { matrix }
    }

    /// A pure translation.
    pub fn translation(v: Vector2<Real>) -> Self {
        Self {
            matrix: Matrix3::new_translation(&v),
        }
    }

    /// A non-uniform scaling about the origin.
    pub fn scaling(sx: Real, sy: Real) -> Self {
        Self {
            matrix: Matrix3::new_nonuniform_scaling(&Vector2::new(sx, sy)),
        }
    }

    /// A counterclockwise rotation about the origin.
    pub fn rotation(angle: Real) -> Self {
        Self {
            matrix: na::Rotation2::new(angle).to_homogeneous(),
        }
    }

    /// The homogeneous matrix backing this transform.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<Real> {
        &self.matrix
    }

    /// Applies this transform to a point.
    pub fn apply(&self, pt: &Point2<Real>) -> Point2<Real> {
        self.matrix.transform_point(pt)
    }

    /// Applies this transform to a vector (ignores the translation part).
    pub fn apply_vector(&self, v: &Vector2<Real>) -> Vector2<Real> {
        self.matrix.transform_vector(v)
    }

    /// Returns `self ∘ other`, the transform applying `other` first.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// The inverse of this transform.
    ///
    /// Fails with [`NonInvertibleTransformError`] when the matrix is
    /// singular.
    pub fn inverse(&self) -> Result<Self, NonInvertibleTransformError> {
        self.matrix
            .try_inverse()
            .map(|matrix| Self { matrix })
            .ok_or(NonInvertibleTransformError)
    }
}

impl Transform3 {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Builds a transform from a homogeneous matrix.
    pub fn from_matrix(matrix: Matrix4<Real>) -> Self {
        Self { matrix }
    }

    /// A pure translation.
    pub fn translation(v: Vector3<Real>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&v),
        }
    }

    /// A non-uniform scaling about the origin.
    pub fn scaling(sx: Real, sy: Real, sz: Real) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)),
        }
    }

    /// A rotation given by an axis-angle vector.
    pub fn rotation(axis_angle: Vector3<Real>) -> Self {
        Self {
            matrix: na::Rotation3::new(axis_angle).to_homogeneous(),
        }
    }

    /// The homogeneous matrix backing this transform.
    #[inline]
    pub fn matrix(&self) -> &Matrix4<Real> {
        &self.matrix
    }

    /// Applies this transform to a point.
    pub fn apply(&self, pt: &Point3<Real>) -> Point3<Real> {
        self.matrix.transform_point(pt)
    }

    /// Applies this transform to a vector (ignores the translation part).
    pub fn apply_vector(&self, v: &Vector3<Real>) -> Vector3<Real> {
        self.matrix.transform_vector(v)
    }

    /// Returns `self ∘ other`, the transform applying `other` first.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// The inverse of this transform.
    ///
    /// Fails with [`NonInvertibleTransformError`] when the matrix is
    /// singular.
    pub fn inverse(&self) -> Result<Self, NonInvertibleTransformError> {
        self.matrix
            .try_inverse()
            .map(|matrix| Self { matrix })
            .ok_or(NonInvertibleTransformError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn transform2_round_trip() {
        let t = Transform2::translation(Vector2::new(1.0, -2.0))
            .compose(&Transform2::rotation(0.5))
            .compose(&Transform2::scaling(2.0, 3.0));
        let inv = t.inverse().unwrap();

        let p = Point2::new(0.25, -4.0);
        let q = inv.apply(&t.apply(&p));
        assert_relative_eq!(p, q, epsilon = 1.0e-12);
    }

    #[test]
    fn transform3_round_trip() {
        let t = Transform3::translation(Vector3::new(1.0, 2.0, 3.0))
            .compose(&Transform3::rotation(Vector3::new(0.0, 0.3, 0.0)));
        let inv = t.inverse().unwrap();

        let p = Point3::new(-1.0, 0.5, 2.0);
        let q = inv.apply(&t.apply(&p));
        assert_relative_eq!(p, q, epsilon = 1.0e-12);
    }

    #[test]
    fn singular_transforms_report_a_dedicated_error() {
        let flat = Transform2::scaling(1.0, 0.0);
        assert_eq!(flat.inverse(), Err(NonInvertibleTransformError));

        let flat3 = Transform3::scaling(0.0, 1.0, 1.0);
        assert_eq!(flat3.inverse(), Err(NonInvertibleTransformError));
    }
}
