//! Concrete hyperplanes and hyperplane convex subsets for Euclidean
//! 1/2/3-space, plus the region-tree aliases built on them.

pub use self::convex_area::ConvexArea;
pub use self::interval::Interval;
pub use self::line::{Line, LineSubset, RegionTree2};
pub use self::oriented_point::{OrientedPoint, OrientedPointSubset, RegionTree1};
pub use self::plane::{Plane, PlaneSubset, RegionTree3};
pub use self::segment3::Segment3;

mod convex_area;
mod interval;
mod line;
mod oriented_point;
mod plane;
mod segment3;

use crate::math::Real;

/// Error raised when constructing a degenerate or ill-formed shape.
///
/// Construction either fully succeeds or fails with this error; shapes are
/// never partially constructed.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum ShapeError {
    /// A direction vector was zero (or too close to zero to normalize).
    #[error("the direction vector must have non-zero length")]
    ZeroDirection,
    /// A normal vector was zero (or too close to zero to normalize).
    #[error("the normal vector must have non-zero length")]
    ZeroNormal,
    /// Two supposedly distinct points coincide.
    #[error("the given points are too close together to define a shape")]
    CoincidentPoints,
    /// Interval bounds were reversed or not numbers.
    #[error("invalid interval bounds [{0}, {1}]")]
    InvalidInterval(Real, Real),
}
