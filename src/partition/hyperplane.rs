//! Dimension-agnostic cutting-surface abstractions.

use core::cmp::Ordering;

use crate::math::{Real, Tolerance};

/// The side of a hyperplane a point lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// The point lies on the minus side (negative offset).
    Minus,
    /// The point lies on the hyperplane, within tolerance.
    On,
    /// The point lies on the plus side (positive offset).
    Plus,
}

/// The result of splitting a convex object by a hyperplane.
#[derive(Clone, Debug)]
pub enum Split<T> {
    /// The object lies entirely on the splitting hyperplane itself.
    On,
    /// The object lies entirely on the minus side.
    Minus(T),
    /// The object lies entirely on the plus side.
    Plus(T),
    /// The hyperplane passes through the object.
    Both {
        /// The part of the object on the minus side.
        minus: T,
        /// The part of the object on the plus side.
        plus: T,
    },
}

impl<T> Split<T> {
    /// The minus part, if any.
    pub fn minus(self) -> Option<T> {
        match self {
            Split::Minus(m) | Split::Both { minus: m, .. } => Some(m),
            _ => None,
        }
    }

    /// The plus part, if any.
    pub fn plus(self) -> Option<T> {
        match self {
            Split::Plus(p) | Split::Both { plus: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Maps both parts of the split through `f`.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Split<U> {
        match self {
            Split::On => Split::On,
            Split::Minus(m) => Split::Minus(f(m)),
            Split::Plus(p) => Split::Plus(f(p)),
            Split::Both { minus, plus } => Split::Both {
                minus: f(minus),
                plus: f(plus),
            },
        }
    }
}

/// An oriented codimension-1 surface dividing a Euclidean space into a plus
/// and a minus half-space.
///
/// Implementations are cheap to clone and carry no tolerance of their own;
/// fuzzy predicates take a [`Tolerance`] argument.
pub trait Hyperplane: Clone {
    /// The point type of the ambient space.
    type Point: Copy;
    /// The convex-subset type embedded in this hyperplane.
    type Subset: HyperplaneConvexSubset<Hyperplane = Self>;

    /// The signed offset of `pt` from this hyperplane. Positive on the plus
    /// side.
    fn offset(&self, pt: &Self::Point) -> Real;

    /// Classifies `pt` against this hyperplane.
    fn classify(&self, pt: &Self::Point, tol: &Tolerance) -> Side {
        match tol.sign(self.offset(pt)) {
            Ordering::Less => Side::Minus,
            Ordering::Equal => Side::On,
            Ordering::Greater => Side::Plus,
        }
    }

    /// Returns `true` if `pt` lies on this hyperplane within tolerance.
    fn contains(&self, pt: &Self::Point, tol: &Tolerance) -> bool {
        self.classify(pt, tol) == Side::On
    }

    /// This hyperplane with its orientation flipped: plus and minus sides
    /// swap.
    fn reverse(&self) -> Self;

    /// Returns `true` if `other` points in a similar direction as `self`,
    /// meaning their plus sides roughly agree.
    fn similar_orientation(&self, other: &Self) -> bool;

    /// The convex subset covering this entire hyperplane.
    fn span(&self) -> Self::Subset;
}

/// A convex subset of a hyperplane: the portion of the cutting surface that
/// lies inside a (convex) BSP cell.
pub trait HyperplaneConvexSubset: Clone {
    /// The hyperplane type this subset is embedded in.
    type Hyperplane: Hyperplane<Subset = Self>;

    /// The hyperplane containing this subset.
    fn hyperplane(&self) -> &Self::Hyperplane;

    /// Splits this subset by `splitter`, producing the parts on each side.
    ///
    /// Degenerate (point-like, within tolerance) parts are dropped, so a
    /// subset merely touching the splitter is classified entirely on one
    /// side.
    fn split(&self, splitter: &Self::Hyperplane, tol: &Tolerance) -> Split<Self>;

    /// This subset with the orientation of its hyperplane flipped.
    fn reverse(&self) -> Self;

    /// Returns `true` if this subset is degenerate (point-like or empty)
    /// within the tolerance.
    fn is_degenerate(&self, tol: &Tolerance) -> bool;
}
