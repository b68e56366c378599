//! Lines in the Euclidean plane and their convex subsets.

use na::Unit;

use crate::math::{Point2, Real, Tolerance, Transform2, Vector2, DEFAULT_EPSILON};
use crate::partition::{Hyperplane, HyperplaneConvexSubset, RegionBspTree, Split};
use crate::shape::{Interval, ShapeError};

/// An oriented line in the plane.
///
/// The line is parameterized as `origin + t * direction`. Its **plus** side
/// lies to the right of the direction of travel: the plane normal is the
/// direction rotated clockwise by 90°. The x-axis line (direction `+x`)
/// therefore has the lower half-plane `y < 0` as its plus side.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    origin: Point2<Real>,
    direction: Unit<Vector2<Real>>,
}

impl Line {
    /// Creates a line from a point it passes through and a direction.
    ///
    /// Fails if the direction has (near-)zero length.
    pub fn try_new(origin: Point2<Real>, direction: Vector2<Real>) -> Result<Self, ShapeError> {
        let direction =
            Unit::try_new(direction, DEFAULT_EPSILON).ok_or(ShapeError::ZeroDirection)?;
        Ok(Self { origin, direction })
    }

    /// Creates the line through two distinct points, directed from `a`
    /// toward `b`.
    pub fn from_points(a: Point2<Real>, b: Point2<Real>) -> Result<Self, ShapeError> {
        Self::try_new(a, b - a).map_err(|_| ShapeError::CoincidentPoints)
    }

    /// Creates a line from its unit normal and signed distance: points `p`
    /// satisfy `normal · p + offset = 0`, with the plus side where the
    /// expression is positive.
    pub fn from_normal_offset(normal: Vector2<Real>, offset: Real) -> Result<Self, ShapeError> {
        let normal = Unit::try_new(normal, DEFAULT_EPSILON).ok_or(ShapeError::ZeroNormal)?;
        // normal = (direction.y, -direction.x)
        let direction = Vector2::new(-normal.y, normal.x);
        Ok(Self {
            origin: Point2::from(normal.into_inner() * -offset),
            direction: Unit::new_unchecked(direction),
        })
    }

    /// The x-axis, directed toward `+x`; its plus side is `y < 0`.
    pub fn x_axis() -> Self {
        Self {
            origin: Point2::origin(),
            direction: Unit::new_unchecked(Vector2::x()),
        }
    }

    /// The y-axis, directed toward `+y`; its plus side is `x > 0`.
    pub fn y_axis() -> Self {
        Self {
            origin: Point2::origin(),
            direction: Unit::new_unchecked(Vector2::y()),
        }
    }

    /// A point on the line.
    #[inline]
    pub fn origin(&self) -> Point2<Real> {
        self.origin
    }

    /// The unit direction of the line.
    #[inline]
    pub fn direction(&self) -> Unit<Vector2<Real>> {
        self.direction
    }

    /// The unit normal of the line, pointing into the plus half-plane.
    #[inline]
    pub fn normal(&self) -> Vector2<Real> {
        Vector2::new(self.direction.y, -self.direction.x)
    }

    /// The parameter of the orthogonal projection of `pt` onto the line.
    #[inline]
    pub fn project_parameter(&self, pt: &Point2<Real>) -> Real {
        self.direction.dot(&(pt - self.origin))
    }

    /// The point at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point2<Real> {
        self.origin + self.direction.into_inner() * t
    }

    /// The parameter at which this line crosses `other`, or `None` for
    /// (anti-)parallel lines.
    pub fn intersection_parameter(&self, other: &Line, tol: &Tolerance) -> Option<Real> {
        let denom = other.normal().dot(&self.direction);
        if tol.is_zero(denom) {
            None
        } else {
            Some(-other.offset(&self.origin) / denom)
        }
    }

    /// The image of this line under an affine transform.
    ///
    /// Fails if the transform collapses the line's direction.
    pub fn transformed(&self, t: &Transform2) -> Result<Self, ShapeError> {
        Self::from_points(t.apply(&self.origin), t.apply(&self.point_at(1.0)))
            .map_err(|_| ShapeError::ZeroDirection)
    }
}

impl Hyperplane for Line {
    type Point = Point2<Real>;
    type Subset = LineSubset;

    fn offset(&self, pt: &Point2<Real>) -> Real {
        self.normal().dot(&(pt - self.origin))
    }

    fn reverse(&self) -> Self {
        Self {
            origin: self.origin,
            direction: -self.direction,
        }
    }

    fn similar_orientation(&self, other: &Self) -> bool {
        self.direction.dot(&other.direction) > 0.0
    }

    fn span(&self) -> LineSubset {
        LineSubset {
            line: self.clone(),
            interval: Interval::full(),
        }
    }
}

/// A convex subset of a [`Line`]: a segment, a ray, or the full line,
/// represented as the line plus a parameter interval.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSubset {
    line: Line,
    interval: Interval,
}

impl LineSubset {
    /// The subset of `line` covering the given parameter interval.
    pub fn new(line: Line, interval: Interval) -> Self {
        Self { line, interval }
    }

    /// The full span of `line`.
    pub fn span(line: Line) -> Self {
        Self {
            line,
            interval: Interval::full(),
        }
    }

    /// The segment between two distinct points, directed from `a` to `b`.
    ///
    /// The region boundary convention makes the area to the left of the
    /// travel direction (the minus side) the inside.
    pub fn segment(a: Point2<Real>, b: Point2<Real>) -> Result<Self, ShapeError> {
        let line = Line::from_points(a, b)?;
        let hi = line.project_parameter(&b);
        Ok(Self {
            line,
            interval: Interval::new_unchecked(0.0, hi),
        })
    }

    /// The parameter interval of this subset.
    #[inline]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// The line containing this subset.
    #[inline]
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Returns `true` if both endpoints are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.interval.is_bounded()
    }

    /// The finite start point, if any.
    pub fn start_point(&self) -> Option<Point2<Real>> {
        self.interval
            .lo()
            .is_finite()
            .then(|| self.line.point_at(self.interval.lo()))
    }

    /// The finite end point, if any.
    pub fn end_point(&self) -> Option<Point2<Real>> {
        self.interval
            .hi()
            .is_finite()
            .then(|| self.line.point_at(self.interval.hi()))
    }

    /// The image of this subset under an affine transform.
    ///
    /// Finite endpoints map to the images of the corresponding points;
    /// infinite bounds stay infinite. The transformed line is directed from
    /// the image of the start toward the image of the end, so the carried
    /// interval stays increasing.
    pub fn transformed(&self, t: &Transform2) -> Result<Self, ShapeError> {
        let line = self.line.transformed(t)?;
        let map = |p: Real| {
            if p.is_finite() {
                line.project_parameter(&t.apply(&self.line.point_at(p)))
            } else {
                p
            }
        };
        let interval = Interval::new_unchecked(map(self.interval.lo()), map(self.interval.hi()));
        Ok(Self { line, interval })
    }

    /// The signed offset of the subset's carrier line from `splitter` at
    /// parameter `t` (which may be infinite).
    fn offset_at(&self, t: Real, offset_origin: Real, denom: Real) -> Real {
        if t.is_finite() {
            offset_origin + t * denom
        } else if t > 0.0 {
            denom * Real::INFINITY
        } else {
            -denom * Real::INFINITY
        }
    }
}

impl HyperplaneConvexSubset for LineSubset {
    type Hyperplane = Line;

    fn hyperplane(&self) -> &Line {
        &self.line
    }

    fn split(&self, splitter: &Line, tol: &Tolerance) -> Split<Self> {
        use core::cmp::Ordering::*;

        let denom = splitter.normal().dot(&self.line.direction);
        let offset_origin = splitter.offset(&self.line.origin);

        if tol.is_zero(denom) {
            // Parallel lines: the whole subset shares one offset.
            return match tol.sign(offset_origin) {
                Less => Split::Minus(self.clone()),
                Equal => Split::On,
                Greater => Split::Plus(self.clone()),
            };
        }

        let (lo, hi) = (self.interval.lo(), self.interval.hi());
        let s_lo = tol.sign(self.offset_at(lo, offset_origin, denom));
        let s_hi = tol.sign(self.offset_at(hi, offset_origin, denom));

        match (s_lo, s_hi) {
            (Equal, Equal) => Split::On,
            (Less, Less) | (Less, Equal) | (Equal, Less) => Split::Minus(self.clone()),
            (Greater, Greater) | (Greater, Equal) | (Equal, Greater) => Split::Plus(self.clone()),
            _ => {
                let t = -offset_origin / denom;
                let (minus_iv, plus_iv) = if s_lo == Less {
                    (
                        Interval::new_unchecked(lo, t),
                        Interval::new_unchecked(t, hi),
                    )
                } else {
                    (
                        Interval::new_unchecked(t, hi),
                        Interval::new_unchecked(lo, t),
                    )
                };

                let minus = Self::new(self.line.clone(), minus_iv);
                let plus = Self::new(self.line.clone(), plus_iv);
                if minus.is_degenerate(tol) {
                    Split::Plus(self.clone())
                } else if plus.is_degenerate(tol) {
                    Split::Minus(self.clone())
                } else {
                    Split::Both { minus, plus }
                }
            }
        }
    }

    fn reverse(&self) -> Self {
        // Reversing the line negates the parameterization, so the
        // interval bounds swap and negate.
        Self {
            line: self.line.reverse(),
            interval: Interval::new_unchecked(-self.interval.hi(), -self.interval.lo()),
        }
    }

    fn is_degenerate(&self, tol: &Tolerance) -> bool {
        self.interval.is_degenerate(tol)
    }
}

/// A region of the Euclidean plane.
pub type RegionTree2 = RegionBspTree<LineSubset>;

impl RegionTree2 {
    /// The area of the region; infinite when any inside cell is
    /// unbounded.
    pub fn area(&self) -> Real {
        match self.signed_boundary_sums() {
            Some((double_area, _)) => double_area / 2.0,
            None => Real::INFINITY,
        }
    }

    /// The barycenter of the region, or `None` for empty or unbounded
    /// regions.
    pub fn barycenter(&self) -> Option<Point2<Real>> {
        let (double_area, moment) = self.signed_boundary_sums()?;
        if self.tolerance().is_zero(double_area) {
            None
        } else {
            Some(Point2::from(moment / (3.0 * double_area)))
        }
    }

    /// The image of the region under an affine transform, rebuilt from its
    /// transformed boundary.
    ///
    /// A reflecting transform mirrors the plane, so each transformed
    /// boundary is reversed to keep the inside on its minus side.
    pub fn transformed(&self, t: &Transform2) -> Result<Self, ShapeError> {
        if self.is_full() {
            return Ok(self.clone());
        }

        let m = t.matrix();
        let reflects = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)] < 0.0;

        let mut boundaries = Vec::new();
        for piece in self.boundaries() {
            let mapped = piece.transformed(t)?;
            boundaries.push(if reflects {
                HyperplaneConvexSubset::reverse(&mapped)
            } else {
                mapped
            });
        }
        Ok(Self::from_boundaries(*self.tolerance(), boundaries))
    }

    /// Green's-theorem sums over the boundary: twice the signed area, and
    /// the (unnormalized) first moment. `None` for unbounded regions.
    ///
    /// Boundary pieces are oriented with the inside on their left, so the
    /// edge sum is orientation-consistent regardless of piece order.
    fn signed_boundary_sums(&self) -> Option<(Real, Vector2<Real>)> {
        if self.is_full() {
            return None;
        }

        let mut double_area = 0.0;
        let mut moment = Vector2::zeros();
        for piece in self.boundaries() {
            let (a, b) = match (piece.start_point(), piece.end_point()) {
                (Some(a), Some(b)) => (a.coords, b.coords),
                _ => return None,
            };
            let cross = a.x * b.y - a.y * b.x;
            double_area += cross;
            moment += (a + b) * cross;
        }
        Some((double_area, moment))
    }
}
