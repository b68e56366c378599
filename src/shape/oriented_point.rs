//! Oriented points: the hyperplanes of the Euclidean line.

use crate::math::{Point1, Real, Tolerance};
use crate::partition::{Hyperplane, HyperplaneConvexSubset, RegionBspTree, RegionLocation, Split};

/// A point on the number line together with a facing direction, dividing
/// the line into a plus and a minus side.
///
/// A positive-facing point has its plus side toward increasing
/// coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrientedPoint {
    location: Point1<Real>,
    positive_facing: bool,
}

impl OrientedPoint {
    /// Creates an oriented point at `location`.
    pub fn new(location: Point1<Real>, positive_facing: bool) -> Self {
        Self {
            location,
            positive_facing,
        }
    }

    /// Creates an oriented point from a raw coordinate.
    pub fn from_location(x: Real, positive_facing: bool) -> Self {
        Self::new(Point1::new(x), positive_facing)
    }

    /// The location of this point.
    #[inline]
    pub fn location(&self) -> Point1<Real> {
        self.location
    }

    /// Returns `true` if the plus side points toward increasing
    /// coordinates.
    #[inline]
    pub fn is_positive_facing(&self) -> bool {
        self.positive_facing
    }
}

impl Hyperplane for OrientedPoint {
    type Point = Point1<Real>;
    type Subset = OrientedPointSubset;

    fn offset(&self, pt: &Point1<Real>) -> Real {
        if self.positive_facing {
            pt.x - self.location.x
        } else {
            self.location.x - pt.x
        }
    }

    fn reverse(&self) -> Self {
        Self {
            location: self.location,
            positive_facing: !self.positive_facing,
        }
    }

    fn similar_orientation(&self, other: &Self) -> bool {
        self.positive_facing == other.positive_facing
    }

    fn span(&self) -> OrientedPointSubset {
        OrientedPointSubset { hyperplane: *self }
    }
}

/// The convex subset of an [`OrientedPoint`]: the point itself.
///
/// A 0-dimensional hyperplane has no proper subsets, so this is a thin
/// wrapper whose split against another oriented point is a pure side
/// classification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrientedPointSubset {
    hyperplane: OrientedPoint,
}

impl OrientedPointSubset {
    /// The subset's location on the line.
    #[inline]
    pub fn location(&self) -> Point1<Real> {
        self.hyperplane.location()
    }
}

impl HyperplaneConvexSubset for OrientedPointSubset {
    type Hyperplane = OrientedPoint;

    fn hyperplane(&self) -> &OrientedPoint {
        &self.hyperplane
    }

    fn split(&self, splitter: &OrientedPoint, tol: &Tolerance) -> Split<Self> {
        match tol.sign(splitter.offset(&self.hyperplane.location())) {
            core::cmp::Ordering::Less => Split::Minus(*self),
            core::cmp::Ordering::Equal => Split::On,
            core::cmp::Ordering::Greater => Split::Plus(*self),
        }
    }

    fn reverse(&self) -> Self {
        Self {
            hyperplane: self.hyperplane.reverse(),
        }
    }

    fn is_degenerate(&self, _tol: &Tolerance) -> bool {
        // A point is the entire content of a 0-dimensional hyperplane.
        false
    }
}

/// A region of the Euclidean line: a union of intervals.
pub type RegionTree1 = RegionBspTree<OrientedPointSubset>;

impl RegionTree1 {
    /// The total length of the region; infinite when an unbounded cell is
    /// inside.
    pub fn size(&self) -> Real {
        self.size_node(self.root(), Real::NEG_INFINITY, Real::INFINITY)
    }

    fn size_node(&self, node: crate::partition::NodeId, lo: Real, hi: Real) -> Real {
        let Some(cut) = self.tree().cut(node) else {
            return match self.tree().value(node) {
                RegionLocation::Inside => hi - lo,
                _ => 0.0,
            };
        };
        let minus = self.tree().minus_child(node).expect("internal node");
        let plus = self.tree().plus_child(node).expect("internal node");
        let x = cut.location().x;

        // The minus side is the side with negative offsets.
        if cut.hyperplane().is_positive_facing() {
            self.size_node(minus, lo, x) + self.size_node(plus, x, hi)
        } else {
            self.size_node(minus, x, hi) + self.size_node(plus, lo, x)
        }
    }
}
