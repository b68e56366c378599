//! Connecting 3D segments into chains.

use core::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::math::{Point3, Real, Tolerance};
use crate::path::{Connectable, ConnectedPath, PathConnector};
use crate::shape::Segment3;

impl Connectable for Segment3 {
    type Point = Point3<Real>;

    fn start(&self) -> Option<Point3<Real>> {
        Some(self.a)
    }

    fn end(&self) -> Option<Point3<Real>> {
        Some(self.b)
    }

    fn is_point_like(&self, tol: &Tolerance) -> bool {
        Segment3::is_point_like(self, tol)
    }

    fn compare_points(a: &Point3<Real>, b: &Point3<Real>) -> Ordering {
        (OrderedFloat(a.x), OrderedFloat(a.y), OrderedFloat(a.z)).cmp(&(
            OrderedFloat(b.x),
            OrderedFloat(b.y),
            OrderedFloat(b.z),
        ))
    }

    fn points_eq(a: &Point3<Real>, b: &Point3<Real>, tol: &Tolerance) -> bool {
        tol.is_zero((a - b).norm())
    }

    fn no_closer_match(key: &Point3<Real>, start: &Point3<Real>, tol: &Tolerance) -> bool {
        (start.x - key.x).abs() > tol.epsilon()
    }

    fn relative_angle(&self, next: &Self) -> Real {
        let d = self.scaled_direction();
        let e = next.scaled_direction();
        d.cross(&e).norm().atan2(d.dot(&e))
    }
}

/// Connects 3D segments into chains, resolving junctions by taking the
/// straightest continuation.
pub fn connect_segments(
    tol: Tolerance,
    segments: impl IntoIterator<Item = Segment3>,
) -> Vec<ConnectedPath<Segment3>> {
    let mut connector = PathConnector::with_strategy(tol, |incoming: &Segment3, candidates| {
        let mut best = 0;
        let mut best_angle = incoming.relative_angle(candidates[0]).abs();
        for (idx, candidate) in candidates.iter().enumerate().skip(1) {
            let angle = incoming.relative_angle(candidate).abs();
            if angle < best_angle {
                best = idx;
                best_angle = angle;
            }
        }
        best
    });
    connector.add_all(segments);
    connector.connect_all()
}
