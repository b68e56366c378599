//! Connecting 2D line subsets into polylines.

use core::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::math::{Point2, Real, Tolerance};
use crate::path::{Connectable, PathConnector};
use crate::shape::LineSubset;

impl Connectable for LineSubset {
    type Point = Point2<Real>;

    fn start(&self) -> Option<Point2<Real>> {
        self.start_point()
    }

    fn end(&self) -> Option<Point2<Real>> {
        self.end_point()
    }

    fn is_point_like(&self, tol: &Tolerance) -> bool {
        self.interval().is_degenerate(tol)
    }

    fn compare_points(a: &Point2<Real>, b: &Point2<Real>) -> Ordering {
        (OrderedFloat(a.x), OrderedFloat(a.y)).cmp(&(OrderedFloat(b.x), OrderedFloat(b.y)))
    }

    fn points_eq(a: &Point2<Real>, b: &Point2<Real>, tol: &Tolerance) -> bool {
        tol.is_zero((a - b).norm())
    }

    fn no_closer_match(key: &Point2<Real>, start: &Point2<Real>, tol: &Tolerance) -> bool {
        // Sorted lexicographically on x, so once x drifts past the
        // tolerance band no later entry can coincide with the key.
        (start.x - key.x).abs() > tol.epsilon()
    }

    fn relative_angle(&self, next: &Self) -> Real {
        let d = self.line().direction();
        let e = next.line().direction();
        let cross = d.x * e.y - d.y * e.x;
        cross.atan2(d.dot(&e))
    }
}

fn select_by_interior_angle(
    incoming: &LineSubset,
    candidates: &[&LineSubset],
    maximize: bool,
) -> usize {
    // The interior angle on the path's left is pi minus the signed turn,
    // so the widest interior angle is the sharpest turn to the right.
    let mut best = 0;
    let mut best_turn = incoming.relative_angle(candidates[0]);
    for (idx, candidate) in candidates.iter().enumerate().skip(1) {
        let turn = incoming.relative_angle(candidate);
        let better = if maximize {
            turn < best_turn
        } else {
            turn > best_turn
        };
        if better {
            best = idx;
            best_turn = turn;
        }
    }
    best
}

/// A polyline connector that resolves junctions by maximizing the
/// interior angle on the path's left, following convex outlines.
pub fn maximize_interior_angle(tol: Tolerance) -> PathConnector<LineSubset> {
    PathConnector::with_strategy(tol, |incoming, candidates| {
        select_by_interior_angle(incoming, candidates, true)
    })
}

/// A polyline connector that resolves junctions by minimizing the
/// interior angle on the path's left, hugging concave outlines.
pub fn minimize_interior_angle(tol: Tolerance) -> PathConnector<LineSubset> {
    PathConnector::with_strategy(tol, |incoming, candidates| {
        select_by_interior_angle(incoming, candidates, false)
    })
}
