//! Convex regions of the plane bounded by line subsets.

use crate::math::{Point2, Real, Tolerance};
use crate::partition::{Hyperplane, HyperplaneConvexSubset, RegionLocation, Split};
use crate::shape::{Line, LineSubset};

/// A convex region of the plane: the intersection of the minus
/// half-planes of its boundary lines.
///
/// An area with no boundaries is the full plane. The region is closed, so
/// boundary points are part of it.
#[derive(Clone, Debug, Default)]
pub struct ConvexArea {
    boundaries: Vec<LineSubset>,
}

impl ConvexArea {
    /// The full plane.
    pub fn full() -> Self {
        Self {
            boundaries: Vec::new(),
        }
    }

    /// An area from boundary subsets, each already trimmed against the
    /// others' minus half-planes.
    pub fn from_boundaries(boundaries: Vec<LineSubset>) -> Self {
        Self { boundaries }
    }

    /// The boundary subsets of this area.
    #[inline]
    pub fn boundaries(&self) -> &[LineSubset] {
        &self.boundaries
    }

    /// Returns `true` for the full plane.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Locates a point relative to this area.
    pub fn classify(&self, pt: &Point2<Real>, tol: &Tolerance) -> RegionLocation {
        use core::cmp::Ordering::*;

        let mut on_boundary = false;
        for b in &self.boundaries {
            match tol.sign(b.hyperplane().offset(pt)) {
                Greater => return RegionLocation::Outside,
                Equal => on_boundary = true,
                Less => {}
            }
        }
        if on_boundary {
            RegionLocation::Boundary
        } else {
            RegionLocation::Inside
        }
    }

    /// Clips `subset` against every boundary half-plane, keeping the part
    /// inside the area. Returns `None` when nothing of substance remains.
    pub fn trim(&self, subset: &LineSubset, tol: &Tolerance) -> Option<LineSubset> {
        let mut current = subset.clone();
        for b in &self.boundaries {
            current = match current.split(b.hyperplane(), tol) {
                Split::Minus(minus) | Split::Both { minus, .. } => minus,
                _ => return None,
            };
        }
        (!current.is_degenerate(tol)).then_some(current)
    }

    /// Splits this area by a line.
    pub fn split(&self, splitter: &Line, tol: &Tolerance) -> Split<Self> {
        // A boundary lying on the splitter means the area only touches it.
        for b in &self.boundaries {
            if matches!(b.split(splitter, tol), Split::On) {
                return if splitter.similar_orientation(b.hyperplane()) {
                    Split::Minus(self.clone())
                } else {
                    Split::Plus(self.clone())
                };
            }
        }

        match self.trim(&splitter.span(), tol) {
            Some(trimmed) => {
                let mut minus = Vec::with_capacity(self.boundaries.len() + 1);
                let mut plus = Vec::with_capacity(self.boundaries.len() + 1);
                for b in &self.boundaries {
                    match b.split(splitter, tol) {
                        Split::Minus(piece) => minus.push(piece),
                        Split::Plus(piece) => plus.push(piece),
                        Split::Both { minus: m, plus: p } => {
                            minus.push(m);
                            plus.push(p);
                        }
                        Split::On => {}
                    }
                }
                plus.push(trimmed.reverse());
                minus.push(trimmed);
                Split::Both {
                    minus: Self { boundaries: minus },
                    plus: Self { boundaries: plus },
                }
            }
            None => {
                // The splitter misses the interior; every boundary sits on
                // a single side.
                for b in &self.boundaries {
                    match b.split(splitter, tol) {
                        Split::Minus(_) => return Split::Minus(self.clone()),
                        Split::Plus(_) => return Split::Plus(self.clone()),
                        _ => {}
                    }
                }
                Split::Minus(self.clone())
            }
        }
    }

    /// The vertices of a bounded area, ordered counterclockwise, or `None`
    /// when the area is unbounded.
    pub fn vertex_loop(&self, tol: &Tolerance) -> Option<Vec<Point2<Real>>> {
        if self.boundaries.is_empty() {
            return None;
        }

        // Boundary segments run counterclockwise (inside on their left),
        // so chaining end points to start points walks the loop.
        let mut remaining: Vec<&LineSubset> = self.boundaries.iter().collect();
        let first = remaining.pop()?;
        let mut vertices = vec![first.start_point()?];
        let mut tail = first.end_point()?;

        while !remaining.is_empty() {
            let next = remaining.iter().position(|b| {
                b.start_point()
                    .is_some_and(|s| tol.is_zero((s - tail).norm()))
            })?;
            let edge = remaining.swap_remove(next);
            vertices.push(tail);
            tail = edge.end_point()?;
        }
        Some(vertices)
    }

    /// The area measure; infinite for unbounded regions.
    pub fn area(&self, tol: &Tolerance) -> Real {
        match self.vertex_loop(tol) {
            Some(loop_pts) => {
                let mut doubled = 0.0;
                for (i, a) in loop_pts.iter().enumerate() {
                    let b = &loop_pts[(i + 1) % loop_pts.len()];
                    doubled += a.x * b.y - a.y * b.x;
                }
                doubled / 2.0
            }
            None => Real::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector2;
    use approx::assert_relative_eq;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    fn triangle() -> ConvexArea {
        // Counterclockwise: (0,0) -> (2,0) -> (0,2).
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(0.0, 2.0);
        ConvexArea::from_boundaries(vec![
            LineSubset::segment(a, b).unwrap(),
            LineSubset::segment(b, c).unwrap(),
            LineSubset::segment(c, a).unwrap(),
        ])
    }

    #[test]
    fn classify_full_plane() {
        let full = ConvexArea::full();
        assert_eq!(
            full.classify(&Point2::new(100.0, -3.0), &tol()),
            RegionLocation::Inside
        );
    }

    #[test]
    fn classify_triangle() {
        let tri = triangle();
        assert_eq!(
            tri.classify(&Point2::new(0.5, 0.5), &tol()),
            RegionLocation::Inside
        );
        assert_eq!(
            tri.classify(&Point2::new(2.0, 2.0), &tol()),
            RegionLocation::Outside
        );
        assert_eq!(
            tri.classify(&Point2::new(1.0, 0.0), &tol()),
            RegionLocation::Boundary
        );
    }

    #[test]
    fn triangle_area_and_vertices() {
        let tri = triangle();
        assert_relative_eq!(tri.area(&tol()), 2.0, epsilon = 1.0e-9);
        assert_eq!(tri.vertex_loop(&tol()).unwrap().len(), 3);
    }

    #[test]
    fn split_through_interior() {
        let tri = triangle();
        // Vertical line x = 1.
        let splitter =
            Line::try_new(Point2::new(1.0, 0.0), Vector2::new(0.0, 1.0)).unwrap();
        match tri.split(&splitter, &tol()) {
            Split::Both { minus, plus } => {
                assert_relative_eq!(
                    minus.area(&tol()) + plus.area(&tol()),
                    2.0,
                    epsilon = 1.0e-9
                );
                // Minus of an upward line is x < 1.
                assert_eq!(
                    minus.classify(&Point2::new(0.2, 0.2), &tol()),
                    RegionLocation::Inside
                );
                assert_eq!(
                    plus.classify(&Point2::new(1.5, 0.1), &tol()),
                    RegionLocation::Inside
                );
            }
            other => panic!("expected Both, got {other:?}"),
        }
    }

    #[test]
    fn split_missing_the_area() {
        let tri = triangle();
        let splitter =
            Line::try_new(Point2::new(5.0, 0.0), Vector2::new(0.0, 1.0)).unwrap();
        assert!(matches!(tri.split(&splitter, &tol()), Split::Minus(_)));

        let splitter =
            Line::try_new(Point2::new(-5.0, 0.0), Vector2::new(0.0, 1.0)).unwrap();
        assert!(matches!(tri.split(&splitter, &tol()), Split::Plus(_)));
    }

    #[test]
    fn split_along_a_boundary() {
        let tri = triangle();
        // The bottom edge lies on the x-axis with matching orientation.
        assert!(matches!(
            tri.split(&Line::x_axis(), &tol()),
            Split::Minus(_)
        ));
        assert!(matches!(
            tri.split(&Line::x_axis().reverse(), &tol()),
            Split::Plus(_)
        ));
    }

    #[test]
    fn full_plane_split_yields_half_planes() {
        let full = ConvexArea::full();
        match full.split(&Line::x_axis(), &tol()) {
            Split::Both { minus, plus } => {
                assert_eq!(minus.boundaries().len(), 1);
                assert_eq!(plus.boundaries().len(), 1);
                assert_eq!(
                    minus.classify(&Point2::new(0.0, 1.0), &tol()),
                    RegionLocation::Inside
                );
                assert_eq!(
                    plus.classify(&Point2::new(0.0, -1.0), &tol()),
                    RegionLocation::Inside
                );
            }
            other => panic!("expected Both, got {other:?}"),
        }
    }
}
