//! Scalar and point type aliases, plus the tolerance context mediating
//! every geometric comparison in the library.

pub use self::tolerance::{InvalidToleranceError, Tolerance};
pub use self::transform::{NonInvertibleTransformError, Transform2, Transform3};

mod tolerance;
mod transform;

pub use na::{Point1, Point2, Point3, Unit, Vector1, Vector2, Vector3};

/// The scalar type used throughout this crate.
#[cfg(feature = "f32")]
pub type Real = f32;

/// The scalar type used throughout this crate.
#[cfg(not(feature = "f32"))]
pub type Real = f64;

/// The default tolerance used for geometric operations when the caller does
/// not supply one.
///
/// Machine epsilon is far too tight for chained geometric predicates, so
/// this is a looser value suited to coordinates of roughly unit magnitude.
#[cfg(feature = "f32")]
pub const DEFAULT_EPSILON: Real = 1.0e-5;

/// The default tolerance used for geometric operations when the caller does
/// not supply one.
///
/// Machine epsilon is far too tight for chained geometric predicates, so
/// this is a looser value suited to coordinates of roughly unit magnitude.
#[cfg(not(feature = "f32"))]
pub const DEFAULT_EPSILON: Real = 1.0e-10;
