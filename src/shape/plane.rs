//! Planes in three-dimensional space and their convex subsets.
//!
//! A plane carries an orthonormal in-plane basis `(u, v)` with normal
//! `w = u × v`. Splitting a plane subset by another plane reduces to a 2D
//! split: the intersection of the two planes is projected into the `(u, v)`
//! frame and handed to [`ConvexArea::split`].

use na::Unit;

use crate::math::{Point2, Point3, Real, Tolerance, Vector2, Vector3, DEFAULT_EPSILON};
use crate::partition::{Hyperplane, HyperplaneConvexSubset, RegionBspTree, Split};
use crate::shape::{ConvexArea, Line, LineSubset, ShapeError};

/// An oriented plane in 3D space. Its **plus** side is the half-space
/// its normal points into.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    origin: Point3<Real>,
    u: Unit<Vector3<Real>>,
    v: Unit<Vector3<Real>>,
    w: Unit<Vector3<Real>>,
}

impl Plane {
    /// Creates a plane from a point it contains and its normal, choosing
    /// an arbitrary in-plane basis.
    pub fn from_point_and_normal(
        origin: Point3<Real>,
        normal: Vector3<Real>,
    ) -> Result<Self, ShapeError> {
        let w = Unit::try_new(normal, DEFAULT_EPSILON).ok_or(ShapeError::ZeroNormal)?;
        // Any axis not aligned with the normal seeds the in-plane basis.
        let seed = if w.x.abs() <= w.y.abs() && w.x.abs() <= w.z.abs() {
            Vector3::x()
        } else if w.y.abs() <= w.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = Unit::new_normalize(seed.cross(&w));
        let v = Unit::new_unchecked(w.cross(&u));
        Ok(Self { origin, u, v, w })
    }

    /// Creates the plane through three points, with the normal given by
    /// the right-hand rule on `(b - a, c - a)`.
    pub fn from_points(
        a: Point3<Real>,
        b: Point3<Real>,
        c: Point3<Real>,
    ) -> Result<Self, ShapeError> {
        let ab = b - a;
        let u = Unit::try_new(ab, DEFAULT_EPSILON).ok_or(ShapeError::CoincidentPoints)?;
        let w = Unit::try_new(ab.cross(&(c - a)), DEFAULT_EPSILON).ok_or(ShapeError::ZeroNormal)?;
        let v = Unit::new_unchecked(w.cross(&u));
        Ok(Self { origin: a, u, v, w })
    }

    /// A point on the plane.
    #[inline]
    pub fn origin(&self) -> Point3<Real> {
        self.origin
    }

    /// The unit normal, pointing into the plus half-space.
    #[inline]
    pub fn normal(&self) -> Unit<Vector3<Real>> {
        self.w
    }

    /// Projects a space point into in-plane `(u, v)` coordinates.
    #[inline]
    pub fn project(&self, pt: &Point3<Real>) -> Point2<Real> {
        let d = pt - self.origin;
        Point2::new(self.u.dot(&d), self.v.dot(&d))
    }

    /// Embeds in-plane coordinates back into space.
    #[inline]
    pub fn embed(&self, pt: &Point2<Real>) -> Point3<Real> {
        self.origin + self.u.into_inner() * pt.x + self.v.into_inner() * pt.y
    }

    /// The intersection of `other` with this plane, expressed as a line in
    /// this plane's `(u, v)` frame. `None` for (anti-)parallel planes.
    fn embedded_intersection(&self, other: &Plane, tol: &Tolerance) -> Option<Line> {
        let n2 = other.w.into_inner();
        let normal_2d = Vector2::new(n2.dot(&self.u), n2.dot(&self.v));
        let norm = normal_2d.norm();
        if tol.is_zero(norm) {
            return None;
        }
        // Offset of the embedded point (x, y) from `other` is
        // normal_2d . (x, y) + c; rescale so the 2D line is unit-normal.
        let c = n2.dot(&(self.origin - other.origin));
        Line::from_normal_offset(normal_2d, c / norm).ok()
    }
}

impl Hyperplane for Plane {
    type Point = Point3<Real>;
    type Subset = PlaneSubset;

    fn offset(&self, pt: &Point3<Real>) -> Real {
        self.w.dot(&(pt - self.origin))
    }

    fn reverse(&self) -> Self {
        // Swapping the in-plane axes flips w = u x v.
        Self {
            origin: self.origin,
            u: self.v,
            v: self.u,
            w: -self.w,
        }
    }

    fn similar_orientation(&self, other: &Self) -> bool {
        self.w.dot(&other.w) > 0.0
    }

    fn span(&self) -> PlaneSubset {
        PlaneSubset {
            plane: self.clone(),
            area: ConvexArea::full(),
        }
    }
}

/// A convex subset of a [`Plane`]: the plane plus a [`ConvexArea`] in its
/// `(u, v)` frame.
#[derive(Clone, Debug)]
pub struct PlaneSubset {
    plane: Plane,
    area: ConvexArea,
}

impl PlaneSubset {
    /// The subset of `plane` covering `area` in its `(u, v)` frame.
    pub fn new(plane: Plane, area: ConvexArea) -> Self {
        Self { plane, area }
    }

    /// The convex polygon with the given space vertices, wound
    /// counterclockwise around the plus-facing normal.
    pub fn from_vertices(vertices: &[Point3<Real>]) -> Result<Self, ShapeError> {
        if vertices.len() < 3 {
            return Err(ShapeError::CoincidentPoints);
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        let projected: Vec<Point2<Real>> = vertices.iter().map(|p| plane.project(p)).collect();
        let mut boundaries = Vec::with_capacity(projected.len());
        for (i, a) in projected.iter().enumerate() {
            let b = projected[(i + 1) % projected.len()];
            boundaries.push(LineSubset::segment(*a, b)?);
        }
        Ok(Self {
            plane,
            area: ConvexArea::from_boundaries(boundaries),
        })
    }

    /// The carrier plane.
    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// The in-plane extent of this subset.
    #[inline]
    pub fn area(&self) -> &ConvexArea {
        &self.area
    }

    /// The surface area of the subset; infinite for unbounded areas.
    pub fn surface_area(&self, tol: &Tolerance) -> Real {
        self.area.area(tol)
    }

    /// The space vertices of a bounded subset, wound counterclockwise
    /// around the plus-facing normal, or `None` when unbounded.
    pub fn vertices(&self, tol: &Tolerance) -> Option<Vec<Point3<Real>>> {
        Some(
            self.area
                .vertex_loop(tol)?
                .iter()
                .map(|p| self.plane.embed(p))
                .collect(),
        )
    }
}

impl HyperplaneConvexSubset for PlaneSubset {
    type Hyperplane = Plane;

    fn hyperplane(&self) -> &Plane {
        &self.plane
    }

    fn split(&self, splitter: &Plane, tol: &Tolerance) -> Split<Self> {
        use core::cmp::Ordering::*;

        match self.plane.embedded_intersection(splitter, tol) {
            Some(line) => self.area.split(&line, tol).map(|area| Self {
                plane: self.plane.clone(),
                area,
            }),
            None => match tol.sign(splitter.offset(&self.plane.origin)) {
                Less => Split::Minus(self.clone()),
                Equal => Split::On,
                Greater => Split::Plus(self.clone()),
            },
        }
    }

    fn reverse(&self) -> Self {
        let plane = self.plane.reverse();
        // Under the axis swap (x, y) -> (y, x) a boundary's minus side
        // lands on the image line's plus side, so each mapped line is
        // reversed to keep the area on its minus side.
        let boundaries = self
            .area
            .boundaries()
            .iter()
            .map(|b| {
                let line = b.line();
                let origin = line.origin();
                let dir = line.direction().into_inner();
                let swapped = Line::try_new(
                    Point2::new(origin.y, origin.x),
                    Vector2::new(dir.y, dir.x),
                )
                .map(|l| LineSubset::new(l, b.interval()))
                .unwrap_or_else(|_| b.clone());
                swapped.reverse()
            })
            .collect();
        Self {
            plane,
            area: ConvexArea::from_boundaries(boundaries),
        }
    }

    fn is_degenerate(&self, tol: &Tolerance) -> bool {
        let area = self.area.area(tol);
        area.is_finite() && tol.is_zero(area)
    }
}

/// A region of three-dimensional space.
pub type RegionTree3 = RegionBspTree<PlaneSubset>;

impl RegionTree3 {
    /// The volume of the region; infinite when any inside cell is
    /// unbounded.
    pub fn volume(&self) -> Real {
        match self.boundary_tetrahedra() {
            Some((volume, _)) => volume,
            None => Real::INFINITY,
        }
    }

    /// The barycenter of the region, or `None` for empty or unbounded
    /// regions.
    pub fn barycenter(&self) -> Option<Point3<Real>> {
        let (volume, moment) = self.boundary_tetrahedra()?;
        if self.tolerance().is_zero(volume) {
            None
        } else {
            Some(Point3::from(moment / volume))
        }
    }

    /// Decomposes the region into signed tetrahedra with an apex at the
    /// coordinate origin, one per boundary facet triangle. Facets carry
    /// outward normals, so the signed volumes sum to the region's volume.
    /// `None` for unbounded regions.
    fn boundary_tetrahedra(&self) -> Option<(Real, Vector3<Real>)> {
        if self.is_full() {
            return None;
        }

        let tol = *self.tolerance();
        let mut volume = 0.0;
        let mut moment = Vector3::zeros();
        for facet in self.boundaries() {
            let vertices = facet.vertices(&tol)?;
            let apex = vertices[0].coords;
            for pair in vertices[1..].windows(2) {
                let (b, c) = (pair[0].coords, pair[1].coords);
                let signed = apex.dot(&b.cross(&c)) / 6.0;
                volume += signed;
                moment += (apex + b + c) * (signed / 4.0);
            }
        }
        Some((volume, moment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::RegionLocation;
    use approx::assert_relative_eq;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn basis_is_right_handed() {
        let plane =
            Plane::from_point_and_normal(Point3::new(0.0, 0.0, 2.0), Vector3::z()).unwrap();
        let w = plane.normal().into_inner();
        assert_relative_eq!(w, Vector3::z(), epsilon = 1.0e-12);
        assert_relative_eq!(plane.offset(&Point3::new(1.0, 1.0, 3.0)), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(plane.offset(&Point3::new(0.0, 0.0, 0.0)), -2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn project_embed_round_trip() {
        let plane = Plane::from_points(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
        )
        .unwrap();
        let pt = Point3::new(1.0, 3.0, -2.0);
        let embedded = plane.embed(&plane.project(&pt));
        assert_relative_eq!(embedded, pt, epsilon = 1.0e-9);
    }

    #[test]
    fn reverse_negates_offsets() {
        let plane =
            Plane::from_point_and_normal(Point3::origin(), Vector3::new(1.0, 2.0, 3.0)).unwrap();
        let rev = plane.reverse();
        let pt = Point3::new(0.3, -0.4, 2.0);
        assert_relative_eq!(plane.offset(&pt), -rev.offset(&pt), epsilon = 1.0e-12);
        assert!(!plane.similar_orientation(&rev));
    }

    #[test]
    fn degenerate_planes_are_rejected() {
        assert!(Plane::from_point_and_normal(Point3::origin(), Vector3::zeros()).is_err());
        // Collinear points.
        assert_eq!(
            Plane::from_points(
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ),
            Err(ShapeError::ZeroNormal)
        );
    }

    #[test]
    fn facet_split_by_crossing_plane() {
        let facet = PlaneSubset::from_vertices(&[
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(2.0, 2.0, 1.0),
            Point3::new(0.0, 2.0, 1.0),
        ])
        .unwrap();
        // Split by the plane x = 1.
        let splitter =
            Plane::from_point_and_normal(Point3::new(1.0, 0.0, 0.0), Vector3::x()).unwrap();
        match facet.split(&splitter, &tol()) {
            Split::Both { minus, plus } => {
                assert_relative_eq!(minus.surface_area(&tol()), 2.0, epsilon = 1.0e-9);
                assert_relative_eq!(plus.surface_area(&tol()), 2.0, epsilon = 1.0e-9);
                for v in minus.vertices(&tol()).unwrap() {
                    assert!(v.x <= 1.0 + 1.0e-9);
                }
            }
            other => panic!("expected Both, got {other:?}"),
        }
    }

    #[test]
    fn facet_split_by_parallel_plane() {
        let facet = PlaneSubset::from_vertices(&[
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ])
        .unwrap();
        let below =
            Plane::from_point_and_normal(Point3::new(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        assert!(matches!(facet.split(&below, &tol()), Split::Plus(_)));
        let coincident =
            Plane::from_point_and_normal(Point3::new(0.0, 0.0, 1.0), Vector3::z()).unwrap();
        assert!(matches!(facet.split(&coincident, &tol()), Split::On));
    }

    #[test]
    fn reversed_facet_keeps_extent() {
        let facet = PlaneSubset::from_vertices(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        let rev = facet.reverse();
        assert_relative_eq!(
            rev.surface_area(&tol()),
            facet.surface_area(&tol()),
            epsilon = 1.0e-9
        );
        let pt = Point3::new(0.0, 0.0, 5.0);
        assert_relative_eq!(
            facet.hyperplane().offset(&pt),
            -rev.hyperplane().offset(&pt),
            epsilon = 1.0e-12
        );
    }

    fn unit_cube(tol: Tolerance) -> RegionTree3 {
        let v = |x, y, z| Point3::new(x, y, z);
        // Faces wound counterclockwise as seen from outside; the inside of
        // the region lies on each facet's minus side.
        let faces = [
            // z = 0, outward -z
            [v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 0.0, 0.0)],
            // z = 1, outward +z
            [v(0.0, 0.0, 1.0), v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0), v(0.0, 1.0, 1.0)],
            // y = 0, outward -y
            [v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 0.0, 1.0), v(0.0, 0.0, 1.0)],
            // y = 1, outward +y
            [v(0.0, 1.0, 0.0), v(0.0, 1.0, 1.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, 0.0)],
            // x = 0, outward -x
            [v(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(0.0, 1.0, 0.0)],
            // x = 1, outward +x
            [v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0), v(1.0, 0.0, 1.0)],
        ];
        RegionTree3::from_boundaries(
            tol,
            faces
                .iter()
                .map(|f| PlaneSubset::from_vertices(f).unwrap()),
        )
    }

    #[test]
    fn cube_region_classification() {
        let cube = unit_cube(tol());
        assert_eq!(
            cube.classify(&Point3::new(0.5, 0.5, 0.5)),
            RegionLocation::Inside
        );
        assert_eq!(
            cube.classify(&Point3::new(0.5, 0.5, 1.5)),
            RegionLocation::Outside
        );
        assert_eq!(
            cube.classify(&Point3::new(0.5, 0.5, 1.0)),
            RegionLocation::Boundary
        );
        assert_eq!(
            cube.classify(&Point3::new(1.0, 1.0, 1.0)),
            RegionLocation::Boundary
        );
    }

    #[test]
    fn cube_volume_and_barycenter() {
        let cube = unit_cube(tol());
        assert_relative_eq!(cube.volume(), 1.0, epsilon = 1.0e-9);
        assert_relative_eq!(
            cube.barycenter().unwrap(),
            Point3::new(0.5, 0.5, 0.5),
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn half_space_volume_is_infinite() {
        let mut region = RegionTree3::empty(tol());
        let root = region.root();
        let plane = Plane::from_point_and_normal(Point3::origin(), Vector3::z()).unwrap();
        assert!(region.insert_cut(root, &plane));
        assert_eq!(region.volume(), Real::INFINITY);
        assert!(region.barycenter().is_none());
    }
}
